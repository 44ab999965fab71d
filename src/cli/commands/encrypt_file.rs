use std::io;
use std::path::Path;

use gpgwrap::core::errors::{GpgWrapError, Result};

use super::input_helpers::{confirm_overwrite, not_overwriting};
use super::path_helpers::encrypted_dest;
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap encrypt-file` command.
///
/// Default output is `FILE.<encrypted_suffix>` (or `FILE.gpg` for binary
/// output). An existing output is only replaced after confirmation.
pub fn execute(
    ctx: &Context,
    file: &Path,
    recipient: &str,
    output_path: Option<&Path>,
    binary: bool,
    force: bool,
) -> Result<()> {
    if !file.is_file() {
        return Err(GpgWrapError::InvalidInput {
            detail: format!("invalid file path: {}", file.display()),
        });
    }

    let dest = match output_path {
        Some(p) => p.to_path_buf(),
        None if binary => encrypted_dest(file, "gpg"),
        None => encrypted_dest(file, &ctx.config.files.encrypted_suffix),
    };

    if !confirm_overwrite(&dest, force, io::stdin().lock())? {
        return Err(not_overwriting(&dest));
    }

    output::detail(&format!("Source: {}", file.display()));
    output::detail(&format!("Destination: {}", dest.display()));

    let written = ctx.ops.encrypt_file(file, &dest, recipient, !binary)?;
    output::success(&format!("Encrypted {}", written.display()));
    Ok(())
}
