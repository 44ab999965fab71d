pub mod decrypt;
pub mod decrypt_file;
pub mod encrypt;
pub mod encrypt_file;
pub mod input_helpers;
pub mod keys;
pub mod path_helpers;
pub mod sign;
pub mod verify;
