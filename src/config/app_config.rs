use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::errors::{GpgWrapError, Result};
use crate::core::models::passphrase::PassphraseEntry;
use crate::core::services::invoker::{BackendOptions, DEFAULT_GOOD_SIGNATURE_MARKER};

/// Top-level configuration read from `config.toml`.
///
/// Every section is optional; a missing default config file means
/// "all defaults".
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub gpg: GpgSection,
    #[serde(default)]
    pub files: FilesSection,
    #[serde(default)]
    pub passphrases: Vec<PassphraseEntry>,
}

impl AppConfig {
    /// Default config location, e.g. `~/.config/gpgwrap/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gpgwrap").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and its absence falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(GpgWrapError::InvalidConfig {
                        detail: format!("config file not found: {}", p.display()),
                    });
                }
                Self::from_file(p)
            }
            None => match Self::default_path() {
                Some(p) if p.exists() => Self::from_file(&p),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content).map_err(|e| match e {
            GpgWrapError::InvalidConfig { detail } => GpgWrapError::InvalidConfig {
                detail: format!("{}: {detail}", path.display()),
            },
            other => other,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Parse and validate TOML content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| GpgWrapError::InvalidConfig {
            detail: format!("failed to parse config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let suffix = &self.files.encrypted_suffix;
        if suffix.is_empty()
            || suffix.starts_with('.')
            || suffix.contains('/')
            || suffix.contains('\\')
        {
            return Err(GpgWrapError::InvalidConfig {
                detail: format!(
                    "files.encrypted_suffix must be a bare extension like \"asc\", got {suffix:?}"
                ),
            });
        }

        if self.gpg.good_signature_marker.trim().is_empty() {
            return Err(GpgWrapError::InvalidConfig {
                detail: "gpg.good_signature_marker must not be empty".into(),
            });
        }

        for entry in &self.passphrases {
            if entry.email.trim().is_empty() {
                return Err(GpgWrapError::InvalidConfig {
                    detail: "every [[passphrases]] entry needs an email".into(),
                });
            }
        }
        Ok(())
    }

    /// The saved passphrase entry for `email`, matched case-insensitively.
    pub fn passphrase_for(&self, email: &str) -> Option<&PassphraseEntry> {
        self.passphrases
            .iter()
            .find(|e| e.email.eq_ignore_ascii_case(email.trim()))
    }

    /// Backend settings derived from the `[gpg]` section. The trust model
    /// is not configurable and stays at its default.
    pub fn backend_options(&self) -> BackendOptions {
        BackendOptions {
            homedir: self.gpg.homedir.clone(),
            good_signature_marker: self.gpg.good_signature_marker.clone(),
            ..BackendOptions::default()
        }
    }
}

/// The `[gpg]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GpgSection {
    #[serde(default = "default_gpg_path")]
    pub path: PathBuf,
    pub homedir: Option<PathBuf>,
    #[serde(default = "default_marker")]
    pub good_signature_marker: String,
}

impl Default for GpgSection {
    fn default() -> Self {
        Self {
            path: default_gpg_path(),
            homedir: None,
            good_signature_marker: default_marker(),
        }
    }
}

fn default_gpg_path() -> PathBuf {
    PathBuf::from("gpg")
}

fn default_marker() -> String {
    DEFAULT_GOOD_SIGNATURE_MARKER.to_string()
}

/// The `[files]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilesSection {
    /// Appended to a file name when encrypting, without the dot.
    #[serde(default = "default_suffix")]
    pub encrypted_suffix: String,
}

impl Default for FilesSection {
    fn default() -> Self {
        Self {
            encrypted_suffix: default_suffix(),
        }
    }
}

fn default_suffix() -> String {
    "asc".to_string()
}
