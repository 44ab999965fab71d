use std::io::{self, BufRead, IsTerminal, Read, Stdin, StdinLock, Write};
use std::path::Path;

use gpgwrap::config::app_config::AppConfig;
use gpgwrap::core::errors::{GpgWrapError, Result};
use secrecy::{ExposeSecret, SecretString};

/// Env var checked for a passphrase when no saved entry is chosen.
pub const PASSPHRASE_ENV: &str = "GPGWRAP_PASSPHRASE";

/// Read command input from `input`, or all of stdin when it is `None`.
pub fn read_text(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => {
            if !path.is_file() {
                return Err(GpgWrapError::InvalidInput {
                    detail: format!("invalid file path: {}", path.display()),
                });
            }
            Ok(std::fs::read_to_string(path)?)
        }
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

/// Where a passphrase may come from, in priority order.
pub struct PassphraseSources<'a, R: BufRead> {
    /// `--passphrase-for <email>`
    pub saved_for: Option<&'a str>,
    /// Value of `GPGWRAP_PASSPHRASE`, if set.
    pub env_value: Option<String>,
    /// Interactive prompt; `None` when stdin already carries the
    /// command's text.
    pub prompt: Option<PassphrasePrompt<R>>,
}

/// How to ask for a passphrase.
pub enum PassphrasePrompt<R: BufRead> {
    /// Read from the controlling terminal with echo disabled.
    Terminal,
    /// Read one line from a non-interactive stream (piped stdin).
    Reader(R),
}

/// Prompt on the terminal when stdin is one, otherwise read a piped line.
pub fn stdin_prompt(stdin: &Stdin) -> PassphrasePrompt<StdinLock<'_>> {
    if stdin.is_terminal() {
        PassphrasePrompt::Terminal
    } else {
        PassphrasePrompt::Reader(stdin.lock())
    }
}

const PROMPT: &str = "  Passphrase: ";

/// Pick the passphrase for a decrypt command.
///
/// Order: the saved entry named by `--passphrase-for`, the env var, the
/// only saved entry when exactly one exists, then a prompt.
pub fn resolve_passphrase<R: BufRead>(
    config: &AppConfig,
    sources: PassphraseSources<'_, R>,
) -> Result<SecretString> {
    if let Some(email) = sources.saved_for {
        let entry = config
            .passphrase_for(email)
            .ok_or_else(|| GpgWrapError::InvalidInput {
                detail: format!("no saved passphrase for <{email}>"),
            })?;
        tracing::debug!(entry = %entry.label(), "using saved passphrase");
        return non_empty(SecretString::from(
            entry.passphrase.expose_secret().to_string(),
        ));
    }

    if let Some(value) = sources.env_value {
        tracing::debug!("using passphrase from {PASSPHRASE_ENV}");
        return non_empty(SecretString::from(value));
    }

    if let [entry] = config.passphrases.as_slice() {
        tracing::debug!(entry = %entry.label(), "using the only saved passphrase");
        return non_empty(SecretString::from(
            entry.passphrase.expose_secret().to_string(),
        ));
    }

    if let Some(prompt) = sources.prompt {
        let value = match prompt {
            PassphrasePrompt::Terminal => rpassword::prompt_password(PROMPT)?,
            PassphrasePrompt::Reader(mut reader) => {
                eprint!("{PROMPT}");
                io::stderr().flush()?;
                rpassword::read_password_from_bufread(&mut reader)?
            }
        };
        return non_empty(SecretString::from(value));
    }

    Err(GpgWrapError::InvalidInput {
        detail: format!(
            "no passphrase provided\n\n  \
             Solutions:\n    \
             → Save one in the config file under [[passphrases]]\n    \
             → Set {PASSPHRASE_ENV}\n    \
             → Pass the ciphertext with --input so you can be prompted"
        ),
    })
}

fn non_empty(passphrase: SecretString) -> Result<SecretString> {
    if passphrase.expose_secret().is_empty() {
        return Err(GpgWrapError::InvalidInput {
            detail: "no passphrase provided".into(),
        });
    }
    Ok(passphrase)
}

/// Ask before overwriting `dest`. Returns `true` when writing may go ahead.
pub fn confirm_overwrite<R: BufRead>(dest: &Path, force: bool, mut reader: R) -> Result<bool> {
    if force || !dest.exists() {
        return Ok(true);
    }
    eprint!("  Do you want to override {}? [y/N]: ", dest.display());
    io::stderr().flush()?;

    let mut answer = String::new();
    reader.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Error for a declined overwrite prompt.
pub fn not_overwriting(dest: &Path) -> GpgWrapError {
    GpgWrapError::InvalidInput {
        detail: format!("selected not to override {}", dest.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn config(toml: &str) -> AppConfig {
        AppConfig::parse(toml).unwrap()
    }

    const TWO_ENTRIES: &str = r#"
[[passphrases]]
email = "jane@example.com"
passphrase = "jane-pw"

[[passphrases]]
email = "joe@example.com"
description = "laptop"
passphrase = "joe-pw"
"#;

    fn sources<'a>(
        saved_for: Option<&'a str>,
        env_value: Option<&str>,
        prompt: Option<&'static str>,
    ) -> PassphraseSources<'a, Cursor<&'static str>> {
        PassphraseSources {
            saved_for,
            env_value: env_value.map(str::to_string),
            prompt: prompt.map(|p| PassphrasePrompt::Reader(Cursor::new(p))),
        }
    }

    #[test]
    fn saved_entry_wins() {
        let cfg = config(TWO_ENTRIES);
        let pw = resolve_passphrase(
            &cfg,
            sources(Some("joe@example.com"), Some("env-pw"), Some("typed\n")),
        )
        .unwrap();
        assert_eq!(pw.expose_secret(), "joe-pw");
    }

    #[test]
    fn unknown_saved_entry_fails() {
        let cfg = config(TWO_ENTRIES);
        let err = resolve_passphrase(&cfg, sources(Some("x@example.com"), None, None)).unwrap_err();
        assert!(err.to_string().contains("no saved passphrase"));
    }

    #[test]
    fn env_beats_prompt() {
        let cfg = config(TWO_ENTRIES);
        let pw = resolve_passphrase(&cfg, sources(None, Some("env-pw"), Some("typed\n"))).unwrap();
        assert_eq!(pw.expose_secret(), "env-pw");
    }

    #[test]
    fn single_saved_entry_is_used() {
        let cfg = config(
            r#"
[[passphrases]]
email = "jane@example.com"
passphrase = "jane-pw"
"#,
        );
        let pw = resolve_passphrase(&cfg, sources(None, None, Some("typed\n"))).unwrap();
        assert_eq!(pw.expose_secret(), "jane-pw");
    }

    #[test]
    fn prompt_used_when_ambiguous() {
        let cfg = config(TWO_ENTRIES);
        let pw = resolve_passphrase(&cfg, sources(None, None, Some("typed pw\r\n"))).unwrap();
        assert_eq!(pw.expose_secret(), "typed pw");
    }

    #[test]
    fn piped_prompt_without_newline_is_rejected() {
        let cfg = AppConfig::default();
        let err = resolve_passphrase(&cfg, sources(None, None, Some("partial"))).unwrap_err();
        assert!(matches!(err, GpgWrapError::Io(_)));
    }

    #[test]
    fn empty_prompt_is_invalid_input() {
        let cfg = AppConfig::default();
        let err = resolve_passphrase(&cfg, sources(None, None, Some("\n"))).unwrap_err();
        assert!(matches!(err, GpgWrapError::InvalidInput { .. }));
    }

    #[test]
    fn no_source_is_invalid_input() {
        let cfg = AppConfig::default();
        let err = resolve_passphrase(&cfg, sources(None, None, None)).unwrap_err();
        assert!(err.to_string().contains("no passphrase provided"));
    }

    #[test]
    fn overwrite_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("out.txt");
        std::fs::write(&existing, "x").unwrap();
        let missing = dir.path().join("new.txt");

        assert!(confirm_overwrite(&missing, false, Cursor::new("")).unwrap());
        assert!(confirm_overwrite(&existing, true, Cursor::new("")).unwrap());
        assert!(confirm_overwrite(&existing, false, Cursor::new("y\n")).unwrap());
        assert!(!confirm_overwrite(&existing, false, Cursor::new("n\n")).unwrap());
        assert!(!confirm_overwrite(&existing, false, Cursor::new("")).unwrap());
    }
}
