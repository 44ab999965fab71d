use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::core::errors::{GpgWrapError, Result};
use crate::core::models::public_key::PublicKey;
use crate::core::services::invoker::{BackendInvoker, text_output};
use crate::core::traits::parser::KeyListingParser;
use crate::core::traits::runner::CommandRunner;

/// The seven user-facing OpenPGP operations.
///
/// Inputs arrive already resolved (no prompting happens here) and are
/// validated before gpg is touched. Nothing is retried and no state is
/// kept between calls, so one instance can serve concurrent callers.
pub struct GpgOperations<R: CommandRunner, P: KeyListingParser> {
    pub invoker: BackendInvoker<R>,
    pub parser: P,
}

impl<R: CommandRunner, P: KeyListingParser> GpgOperations<R, P> {
    pub fn new(invoker: BackendInvoker<R>, parser: P) -> Self {
        Self { invoker, parser }
    }

    /// All public keys in the keyring, in listing order.
    pub fn list_keys(&self) -> Result<Vec<PublicKey>> {
        let raw = self.invoker.list_keys()?;
        let keys = self.parser.parse(&raw)?;
        tracing::debug!(count = keys.len(), "listed public keys");
        Ok(keys)
    }

    /// Encrypt `text` for `recipient_email`, returning armored ciphertext.
    pub fn encrypt(&self, text: &str, recipient_email: &str) -> Result<String> {
        require_text(text, "text to encrypt")?;
        let recipient = require_field(recipient_email, "recipient email")?;

        let ciphertext = self.invoker.encrypt(text.as_bytes(), recipient)?;
        text_output("encrypt", ciphertext)
    }

    /// Decrypt armored `text` with `passphrase`.
    pub fn decrypt(&self, text: &str, passphrase: &SecretString) -> Result<String> {
        require_text(text, "text to decrypt")?;
        require_passphrase(passphrase)?;

        let plaintext = self.invoker.decrypt(text.as_bytes(), passphrase)?;
        text_output("decrypt", plaintext)
    }

    /// Encrypt `source` into `dest` for `recipient_email`.
    ///
    /// `dest` is overwritten; confirming that is the caller's job.
    pub fn encrypt_file(
        &self,
        source: &Path,
        dest: &Path,
        recipient_email: &str,
        armored: bool,
    ) -> Result<PathBuf> {
        require_source(source)?;
        require_dest(source, dest)?;
        let recipient = require_field(recipient_email, "recipient email")?;

        self.invoker.encrypt_file(source, dest, recipient, armored)?;
        confirm_written("encrypt-file", dest)
    }

    /// Decrypt `source` into `dest` with `passphrase`.
    pub fn decrypt_file(
        &self,
        source: &Path,
        dest: &Path,
        passphrase: &SecretString,
    ) -> Result<PathBuf> {
        require_source(source)?;
        require_dest(source, dest)?;
        require_passphrase(passphrase)?;

        self.invoker.decrypt_file(source, dest, passphrase)?;
        confirm_written("decrypt-file", dest)
    }

    /// Clear-sign `text` with the key `signing_key_id`.
    pub fn clear_sign(&self, text: &str, signing_key_id: &str) -> Result<String> {
        require_text(text, "text to sign")?;
        let key_id = require_field(signing_key_id, "signing key id")?;

        let signed = self.invoker.clear_sign(text.as_bytes(), key_id)?;
        text_output("clearsign", signed)
    }

    /// Whether `text` carries a good signature.
    ///
    /// Never fails: a gpg error, an unknown key and a bad signature all
    /// come back as `false`.
    pub fn verify_signature(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        match self.invoker.verify_signature(text.as_bytes()) {
            Ok(verified) => verified,
            Err(e) => {
                tracing::debug!("signature not verified: {e}");
                false
            }
        }
    }
}

fn require_text(text: &str, what: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(GpgWrapError::invalid_input(format!("{what} is empty")));
    }
    Ok(())
}

fn require_field<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GpgWrapError::invalid_input(format!("{what} is missing")));
    }
    Ok(trimmed)
}

fn require_passphrase(passphrase: &SecretString) -> Result<()> {
    if passphrase.expose_secret().trim().is_empty() {
        return Err(GpgWrapError::invalid_input("no passphrase provided"));
    }
    Ok(())
}

fn require_source(source: &Path) -> Result<()> {
    if source.as_os_str().is_empty() || !source.is_file() {
        return Err(GpgWrapError::invalid_input(format!(
            "invalid file path: {}",
            source.display()
        )));
    }
    Ok(())
}

fn require_dest(source: &Path, dest: &Path) -> Result<()> {
    if dest.as_os_str().is_empty() {
        return Err(GpgWrapError::invalid_input("destination path is empty"));
    }
    if dest == source {
        return Err(GpgWrapError::invalid_input(format!(
            "destination is the same as the source: {}",
            dest.display()
        )));
    }
    Ok(())
}

fn confirm_written(operation: &'static str, dest: &Path) -> Result<PathBuf> {
    if !dest.exists() {
        return Err(GpgWrapError::Backend {
            operation,
            diagnostic: format!("gpg reported success but {} was not written", dest.display()),
            code: None,
        });
    }
    Ok(dest.to_path_buf())
}
