pub mod passphrase;
pub mod public_key;
