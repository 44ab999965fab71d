use crate::core::errors::Result;

/// Captured result of one backend process run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Trimmed, lossily decoded stderr.
    pub fn diagnostic(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Port for running the OpenPGP backend program.
///
/// Implementations live in `adapters::runner` (e.g. `GpgProcess`).
/// The invoker only depends on this trait, so tests can swap in a
/// recording fake.
pub trait CommandRunner: Send + Sync {
    /// Run the backend with `args`, feeding `stdin` when given, and wait
    /// for it to exit. A non-zero exit is reported in the output, not as
    /// an error; `Err` means the process could not be run at all.
    fn run(&self, args: &[String], stdin: Option<&[u8]>) -> Result<CommandOutput>;

    /// Human-readable name of the backend program (e.g. "gpg").
    fn name(&self) -> &str;
}
