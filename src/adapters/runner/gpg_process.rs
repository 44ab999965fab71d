use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::core::errors::{GpgWrapError, Result};
use crate::core::traits::runner::{CommandOutput, CommandRunner};

/// Runs the system `gpg` binary as a child process.
///
/// stdout and stderr are always captured. stdin is only piped when the
/// caller has data for it; otherwise it is closed so gpg never waits on
/// a terminal.
pub struct GpgProcess {
    /// Path to the gpg binary (defaults to "gpg").
    gpg_path: PathBuf,
}

impl GpgProcess {
    /// Use the `gpg` found on PATH.
    pub fn new() -> Self {
        Self {
            gpg_path: PathBuf::from("gpg"),
        }
    }

    /// Use a specific gpg binary (or a compatible wrapper).
    pub fn with_path(gpg_path: PathBuf) -> Self {
        Self { gpg_path }
    }

    /// Check if the configured binary runs at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.gpg_path)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|s| s.success())
    }

    fn spawn_error(&self, e: std::io::Error) -> GpgWrapError {
        GpgWrapError::Backend {
            operation: "spawn",
            diagnostic: format!("failed to run {}: {e}", self.gpg_path.display()),
            code: None,
        }
    }
}

impl Default for GpgProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for GpgProcess {
    fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput> {
        let mut cmd = Command::new(&self.gpg_path);
        cmd.args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| self.spawn_error(e))?;

        // Feed stdin from a separate thread so a large input cannot
        // deadlock against gpg filling its stdout pipe.
        let output = std::thread::scope(|scope| {
            let writer = match (child.stdin.take(), stdin) {
                (Some(mut pipe), Some(data)) => Some(scope.spawn(move || {
                    // gpg may exit early (e.g. unknown recipient) and close
                    // the pipe; its exit status carries the real error.
                    if let Err(e) = pipe.write_all(data) {
                        tracing::debug!("gpg closed stdin early: {e}");
                    }
                })),
                _ => None,
            };

            let output = child.wait_with_output();
            if let Some(handle) = writer {
                let _ = handle.join();
            }
            output
        })
        .map_err(|e| self.spawn_error(e))?;

        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn name(&self) -> &str {
        self.gpg_path.to_str().unwrap_or("gpg")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_reports_configured_binary() {
        assert_eq!(GpgProcess::new().name(), "gpg");
        let custom = GpgProcess::with_path(PathBuf::from("/opt/gnupg/bin/gpg2"));
        assert_eq!(custom.name(), "/opt/gnupg/bin/gpg2");
    }

    #[test]
    fn missing_binary_is_a_backend_error() {
        let runner = GpgProcess::with_path(PathBuf::from("/nonexistent/gpgwrap-test-gpg"));
        assert!(!runner.is_available());

        let err = runner.run(&["--version".to_string()], None).unwrap_err();
        assert!(matches!(err, GpgWrapError::Backend { code: None, .. }));
    }

    #[cfg(unix)]
    #[test]
    fn captures_exit_status_and_streams() {
        // `sh -c` stands in for gpg: echo stdin to stdout, complain, exit 3
        let runner = GpgProcess::with_path(PathBuf::from("sh"));
        let args = vec![
            "-c".to_string(),
            "cat; echo oops >&2; exit 3".to_string(),
        ];
        let output = runner.run(&args, Some(b"hello")).unwrap();

        assert!(!output.success);
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, b"hello");
        assert_eq!(output.diagnostic(), "oops");
    }
}
