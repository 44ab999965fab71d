/// All errors surfaced by gpgwrap.
///
/// The three operation-level kinds are `InvalidInput`, `Backend` and
/// `Parse`; the rest cover configuration and local I/O.
#[derive(Debug, thiserror::Error)]
pub enum GpgWrapError {
    #[error("Invalid input: {detail}")]
    InvalidInput { detail: String },

    #[error(
        "gpg {operation} failed{}: {diagnostic}\n\n  \
         Solutions:\n    \
         → Check that gpg is installed: gpg --version\n    \
         → Check the key exists: gpgwrap keys\n    \
         → Re-run with -v to see the exact gpg invocation",
        exit_suffix(.code)
    )]
    Backend {
        operation: &'static str,
        diagnostic: String,
        code: Option<i32>,
    },

    #[error(
        "Malformed key listing at line {line}: {detail}\n\n  \
         Expected gpg --with-colons output (pub/fpr/uid records)."
    )]
    Parse { line: usize, detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GpgWrapError {
    pub(crate) fn invalid_input(detail: impl Into<String>) -> Self {
        Self::InvalidInput {
            detail: detail.into(),
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map(|c| format!(" (exit {c})")).unwrap_or_default()
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GpgWrapError>;
