use std::io;
use std::path::Path;

use gpgwrap::core::errors::{GpgWrapError, Result};

use super::input_helpers::{
    PASSPHRASE_ENV, PassphraseSources, confirm_overwrite, not_overwriting, resolve_passphrase,
    stdin_prompt,
};
use super::path_helpers::decrypted_dest;
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap decrypt-file` command.
///
/// Default output is `FILE` without its `.gpg`/`.asc` extension. The
/// overwrite check happens before the passphrase is asked for.
pub fn execute(
    ctx: &Context,
    file: &Path,
    output_path: Option<&Path>,
    passphrase_for: Option<&str>,
    force: bool,
) -> Result<()> {
    if !file.is_file() {
        return Err(GpgWrapError::InvalidInput {
            detail: format!("invalid file path: {}", file.display()),
        });
    }

    let dest = match output_path {
        Some(p) => p.to_path_buf(),
        None => decrypted_dest(file)?,
    };

    let stdin = io::stdin();
    if !confirm_overwrite(&dest, force, stdin.lock())? {
        return Err(not_overwriting(&dest));
    }

    let passphrase = resolve_passphrase(
        &ctx.config,
        PassphraseSources {
            saved_for: passphrase_for,
            env_value: std::env::var(PASSPHRASE_ENV).ok(),
            prompt: Some(stdin_prompt(&stdin)),
        },
    )?;

    output::detail(&format!("Source: {}", file.display()));
    output::detail(&format!("Destination: {}", dest.display()));

    let written = ctx.ops.decrypt_file(file, &dest, &passphrase)?;
    output::success(&format!("Decrypted {}", written.display()));
    Ok(())
}
