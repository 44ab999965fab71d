use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::core::errors::{GpgWrapError, Result};
use crate::core::services::staging::{SecretStaging, passphrase_stdin};
use crate::core::traits::runner::{CommandOutput, CommandRunner};

/// Marker gpg prints on stderr for a verified signature (English locale).
pub const DEFAULT_GOOD_SIGNATURE_MARKER: &str = "Good signature";

/// gpg `--trust-model` values.
///
/// The default is `Always`: recipients and signers are not checked against
/// the web of trust.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrustModel {
    #[default]
    Always,
    Direct,
    Pgp,
    Classic,
    Tofu,
    TofuPgp,
    Auto,
}

impl TrustModel {
    pub fn as_arg(self) -> &'static str {
        match self {
            TrustModel::Always => "always",
            TrustModel::Direct => "direct",
            TrustModel::Pgp => "pgp",
            TrustModel::Classic => "classic",
            TrustModel::Tofu => "tofu",
            TrustModel::TofuPgp => "tofu+pgp",
            TrustModel::Auto => "auto",
        }
    }
}

/// Fixed backend settings, chosen once when the invoker is built.
#[derive(Debug, Clone)]
pub struct BackendOptions {
    /// Applied to every trust-sensitive operation.
    pub trust_model: TrustModel,
    /// Passed as `--homedir` to every invocation when set.
    pub homedir: Option<PathBuf>,
    /// Text whose presence in gpg's diagnostics means a verified
    /// signature. Locale and version dependent, hence configurable.
    pub good_signature_marker: String,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            trust_model: TrustModel::Always,
            homedir: None,
            good_signature_marker: DEFAULT_GOOD_SIGNATURE_MARKER.to_string(),
        }
    }
}

/// Builds gpg argument vectors and runs them through a `CommandRunner`.
///
/// Every method is a single blocking invocation. Failures come back as
/// `GpgWrapError::Backend` carrying gpg's stderr.
pub struct BackendInvoker<R: CommandRunner> {
    runner: R,
    options: BackendOptions,
    staging: SecretStaging,
}

impl<R: CommandRunner> BackendInvoker<R> {
    pub fn new(runner: R, options: BackendOptions) -> Self {
        Self {
            runner,
            options,
            staging: SecretStaging::new(),
        }
    }

    /// Stage decryption input somewhere other than the system temp dir.
    pub fn with_staging(mut self, staging: SecretStaging) -> Self {
        self.staging = staging;
        self
    }

    pub fn options(&self) -> &BackendOptions {
        &self.options
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    // -- argument vectors -------------------------------------------------

    fn trust_args(&self) -> [String; 2] {
        [
            "--trust-model".to_string(),
            self.options.trust_model.as_arg().to_string(),
        ]
    }

    pub fn list_keys_args(&self) -> Vec<String> {
        strings(&[
            "--list-keys",
            "--fixed-list-mode",
            "--fingerprint",
            "--with-colons",
        ])
    }

    pub fn encrypt_args(&self, recipient: &str) -> Vec<String> {
        let mut args = strings(&["--batch", "--yes"]);
        args.extend(self.trust_args());
        args.extend(strings(&["--recipient", recipient, "--armor", "--encrypt"]));
        args
    }

    pub fn decrypt_args(&self, staged: &Path) -> Result<Vec<String>> {
        let mut args = strings(&[
            "--batch",
            "--no-tty",
            "--quiet",
            "--pinentry-mode",
            "loopback",
            "--passphrase-fd",
            "0",
            "--decrypt",
        ]);
        args.push(path_arg(staged)?);
        Ok(args)
    }

    pub fn encrypt_file_args(
        &self,
        source: &Path,
        dest: &Path,
        recipient: &str,
        armored: bool,
    ) -> Result<Vec<String>> {
        let mut args = strings(&["--batch", "--yes"]);
        args.extend(self.trust_args());
        args.extend(strings(&["--recipient", recipient]));
        if armored {
            args.push("--armor".to_string());
        }
        args.push("--output".to_string());
        args.push(path_arg(dest)?);
        args.push("--encrypt".to_string());
        args.push(path_arg(source)?);
        Ok(args)
    }

    pub fn decrypt_file_args(&self, source: &Path, dest: &Path) -> Result<Vec<String>> {
        let mut args = strings(&[
            "--batch",
            "--yes",
            "--no-tty",
            "--quiet",
            "--pinentry-mode",
            "loopback",
            "--passphrase-fd",
            "0",
            "--output",
        ]);
        args.push(path_arg(dest)?);
        args.push("--decrypt".to_string());
        args.push(path_arg(source)?);
        Ok(args)
    }

    pub fn clear_sign_args(&self, signing_key_id: &str) -> Vec<String> {
        let mut args = self.trust_args().to_vec();
        args.extend(strings(&["--default-key", signing_key_id, "--clearsign"]));
        args
    }

    pub fn verify_args(&self) -> Vec<String> {
        let mut args = self.trust_args().to_vec();
        args.push("--verify".to_string());
        args
    }

    // -- invocations ------------------------------------------------------

    /// Raw `--with-colons` listing.
    pub fn list_keys(&self) -> Result<String> {
        let output = self.execute("list-keys", self.list_keys_args(), None)?;
        text_output("list-keys", output.stdout)
    }

    /// ASCII-armored ciphertext of `plaintext` for one recipient.
    pub fn encrypt(&self, plaintext: &[u8], recipient: &str) -> Result<Vec<u8>> {
        let output = self.execute("encrypt", self.encrypt_args(recipient), Some(plaintext))?;
        Ok(output.stdout)
    }

    /// Decrypt `ciphertext`. stdin carries the passphrase, so the
    /// ciphertext goes through a staged file that is removed afterwards.
    pub fn decrypt(&self, ciphertext: &[u8], passphrase: &SecretString) -> Result<Vec<u8>> {
        let stdin = passphrase_stdin(passphrase);
        self.staging.with_staged(ciphertext, |staged| {
            let args = self.decrypt_args(staged)?;
            let output = self.execute("decrypt", args, Some(stdin.as_slice()))?;
            Ok(output.stdout)
        })
    }

    pub fn encrypt_file(
        &self,
        source: &Path,
        dest: &Path,
        recipient: &str,
        armored: bool,
    ) -> Result<()> {
        let args = self.encrypt_file_args(source, dest, recipient, armored)?;
        self.execute("encrypt-file", args, None)?;
        Ok(())
    }

    pub fn decrypt_file(&self, source: &Path, dest: &Path, passphrase: &SecretString) -> Result<()> {
        let args = self.decrypt_file_args(source, dest)?;
        let stdin = passphrase_stdin(passphrase);
        self.execute("decrypt-file", args, Some(stdin.as_slice()))?;
        Ok(())
    }

    /// Clear-signed copy of `text`, signed with `signing_key_id`.
    pub fn clear_sign(&self, text: &[u8], signing_key_id: &str) -> Result<Vec<u8>> {
        let output = self.execute("clearsign", self.clear_sign_args(signing_key_id), Some(text))?;
        Ok(output.stdout)
    }

    /// Whether gpg's diagnostics contain the good-signature marker.
    ///
    /// This is a plain case-insensitive text match on gpg's human-readable
    /// output, not a structured status check.
    pub fn verify_signature(&self, signed: &[u8]) -> Result<bool> {
        let output = self.execute("verify", self.verify_args(), Some(signed))?;
        let marker = self.options.good_signature_marker.to_lowercase();
        let found = [output.stderr.as_slice(), output.stdout.as_slice()]
            .iter()
            .any(|stream| String::from_utf8_lossy(stream).to_lowercase().contains(&marker));
        Ok(found)
    }

    /// Run gpg and turn a non-zero exit into a `Backend` error.
    fn execute(
        &self,
        operation: &'static str,
        args: Vec<String>,
        stdin: Option<&[u8]>,
    ) -> Result<CommandOutput> {
        let mut full = Vec::with_capacity(args.len() + 2);
        if let Some(homedir) = &self.options.homedir {
            full.push("--homedir".to_string());
            full.push(path_arg(homedir)?);
        }
        full.extend(args);

        tracing::debug!(operation, backend = self.runner.name(), args = ?full, "invoking backend");
        let output = self.runner.run(&full, stdin)?;
        tracing::debug!(operation, code = ?output.code, "backend exited");

        if !output.success {
            return Err(GpgWrapError::Backend {
                operation,
                diagnostic: output.diagnostic(),
                code: output.code,
            });
        }
        Ok(output)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn path_arg(path: &Path) -> Result<String> {
    path.to_str().map(str::to_string).ok_or_else(|| {
        GpgWrapError::invalid_input(format!("path is not valid UTF-8: {}", path.display()))
    })
}

/// Decode the text output of an operation.
pub(crate) fn text_output(operation: &'static str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| GpgWrapError::Backend {
        operation,
        diagnostic: "output was not valid UTF-8".into(),
        code: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoopRunner;

    impl CommandRunner for NoopRunner {
        fn run(&self, _args: &[String], _stdin: Option<&[u8]>) -> Result<CommandOutput> {
            Ok(CommandOutput {
                success: true,
                ..Default::default()
            })
        }

        fn name(&self) -> &str {
            "noop"
        }
    }

    fn invoker() -> BackendInvoker<NoopRunner> {
        BackendInvoker::new(NoopRunner, BackendOptions::default())
    }

    fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
        args.windows(2).any(|w| w[0] == flag && w[1] == value)
    }

    #[test]
    fn list_keys_uses_machine_readable_listing() {
        assert_eq!(
            invoker().list_keys_args(),
            vec![
                "--list-keys",
                "--fixed-list-mode",
                "--fingerprint",
                "--with-colons"
            ]
        );
    }

    #[test]
    fn trust_sensitive_operations_force_trust_model() {
        let inv = invoker();
        let src = Path::new("/tmp/a.txt");
        let dest = Path::new("/tmp/a.txt.asc");

        for args in [
            inv.encrypt_args("jane@example.com"),
            inv.encrypt_file_args(src, dest, "jane@example.com", true).unwrap(),
            inv.clear_sign_args("ABCD1234"),
            inv.verify_args(),
        ] {
            assert!(has_pair(&args, "--trust-model", "always"), "{args:?}");
        }
    }

    #[test]
    fn trust_model_comes_from_options() {
        let inv = BackendInvoker::new(
            NoopRunner,
            BackendOptions {
                trust_model: TrustModel::Direct,
                ..Default::default()
            },
        );
        assert!(has_pair(&inv.verify_args(), "--trust-model", "direct"));
    }

    #[test]
    fn encrypt_is_armored_for_single_recipient() {
        let args = invoker().encrypt_args("jane@example.com");
        assert!(has_pair(&args, "--recipient", "jane@example.com"));
        assert!(args.contains(&"--armor".to_string()));
        assert_eq!(args.iter().filter(|a| *a == "--recipient").count(), 1);
    }

    #[test]
    fn encrypt_file_armor_flag() {
        let inv = invoker();
        let src = Path::new("/tmp/a.txt");
        let dest = Path::new("/tmp/a.txt.gpg");

        let armored = inv.encrypt_file_args(src, dest, "jane@example.com", true).unwrap();
        let binary = inv.encrypt_file_args(src, dest, "jane@example.com", false).unwrap();

        assert!(armored.contains(&"--armor".to_string()));
        assert!(!binary.contains(&"--armor".to_string()));
        assert!(has_pair(&binary, "--output", "/tmp/a.txt.gpg"));
        assert!(has_pair(&binary, "--encrypt", "/tmp/a.txt"));
    }

    #[test]
    fn decrypt_reads_passphrase_from_stdin() {
        let args = invoker().decrypt_args(Path::new("/tmp/staged.asc")).unwrap();
        assert!(has_pair(&args, "--passphrase-fd", "0"));
        assert!(has_pair(&args, "--pinentry-mode", "loopback"));
        assert!(args.contains(&"--batch".to_string()));
        assert!(args.contains(&"--quiet".to_string()));
        assert!(!args.contains(&"--output".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("/tmp/staged.asc"));
    }

    #[test]
    fn decrypt_file_writes_to_explicit_output() {
        let args = invoker()
            .decrypt_file_args(Path::new("/tmp/a.txt.gpg"), Path::new("/tmp/a.txt"))
            .unwrap();
        assert!(has_pair(&args, "--output", "/tmp/a.txt"));
        assert!(has_pair(&args, "--decrypt", "/tmp/a.txt.gpg"));
        assert!(has_pair(&args, "--passphrase-fd", "0"));
    }

    #[test]
    fn clear_sign_uses_signing_key() {
        let args = invoker().clear_sign_args("ABCD1234");
        assert!(has_pair(&args, "--default-key", "ABCD1234"));
        assert_eq!(args.last().map(String::as_str), Some("--clearsign"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_invalid_input() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let bad = Path::new(OsStr::from_bytes(b"/tmp/\xff.gpg"));
        let err = invoker().decrypt_file_args(bad, Path::new("/tmp/out")).unwrap_err();
        assert!(matches!(err, GpgWrapError::InvalidInput { .. }));
    }
}
