use std::ffi::OsString;
use std::path::{Path, PathBuf};

use gpgwrap::core::errors::{GpgWrapError, Result};

/// Default output for `encrypt-file`: `FILE.<suffix>`.
pub fn encrypted_dest(source: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(source.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// Default output for `decrypt-file`: `FILE` minus a trailing `.asc`
/// and then a trailing `.gpg` (so `notes.gpg.asc` becomes `notes`).
pub fn decrypted_dest(source: &Path) -> Result<PathBuf> {
    let name = source
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| GpgWrapError::InvalidInput {
            detail: format!("not a usable file name: {}", source.display()),
        })?;

    let mut stripped = name.strip_suffix(".asc").unwrap_or(name);
    stripped = stripped.strip_suffix(".gpg").unwrap_or(stripped);

    if stripped == name || stripped.is_empty() {
        return Err(GpgWrapError::InvalidInput {
            detail: format!(
                "cannot derive an output name from {}; pass --output",
                source.display()
            ),
        });
    }
    Ok(source.with_file_name(stripped))
}
