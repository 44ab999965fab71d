use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use tempfile::NamedTempFile;
use zeroize::Zeroizing;

use crate::core::errors::Result;

/// Prefix for staged files, so leftovers are easy to recognise.
const STAGED_PREFIX: &str = ".gpgwrap-";

/// Build the stdin payload for `--passphrase-fd 0`.
///
/// gpg reads the passphrase up to the first newline. The buffer is wiped
/// when dropped.
pub fn passphrase_stdin(passphrase: &SecretString) -> Zeroizing<Vec<u8>> {
    let secret = passphrase.expose_secret().as_bytes();
    let mut buf = Zeroizing::new(Vec::with_capacity(secret.len() + 1));
    buf.extend_from_slice(secret);
    buf.push(b'\n');
    buf
}

/// Stages data into short-lived files for backend calls whose stdin is
/// already taken by the passphrase.
#[derive(Debug, Clone, Default)]
pub struct SecretStaging {
    /// Directory for staged files; the system temp dir when `None`.
    dir: Option<PathBuf>,
}

impl SecretStaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage files under `dir` instead of the system temp dir.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Write `contents` to a fresh file, hand its path to `f`, and remove
    /// the file afterwards whatever `f` returns.
    ///
    /// The file has a unique name and owner-only permissions, and is fully
    /// written and flushed before `f` runs. If writing fails the partial
    /// file is removed too.
    pub fn with_staged<T>(
        &self,
        contents: &[u8],
        f: impl FnOnce(&Path) -> Result<T>,
    ) -> Result<T> {
        let staged = self.stage(contents)?;
        let result = f(staged.path());
        staged.discard();
        result
    }

    fn stage(&self, contents: &[u8]) -> Result<StagedFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGED_PREFIX).suffix(".asc");
        let mut file = match &self.dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };

        // On error `file` drops here and the partial file is removed.
        file.write_all(contents).and_then(|()| file.flush())?;

        tracing::debug!(path = %file.path().display(), "staged ciphertext");
        Ok(StagedFile { file })
    }
}

/// A staged file that is deleted on drop.
struct StagedFile {
    file: NamedTempFile,
}

impl StagedFile {
    fn path(&self) -> &Path {
        self.file.path()
    }

    /// Remove the file now and report (but do not propagate) failures.
    fn discard(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            tracing::warn!(path = %path.display(), "failed to remove staged file: {e}");
        }
    }
}
