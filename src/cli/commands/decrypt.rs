use std::io;
use std::path::Path;

use gpgwrap::core::errors::Result;

use super::input_helpers::{
    PASSPHRASE_ENV, PassphraseSources, read_text, resolve_passphrase, stdin_prompt,
};
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap decrypt` command.
///
/// Writes the plaintext to stdout. The passphrase can only be prompted
/// for when the ciphertext comes from `--input`.
pub fn execute(ctx: &Context, input: Option<&Path>, passphrase_for: Option<&str>) -> Result<()> {
    let text = read_text(input)?;

    let stdin = io::stdin();
    let passphrase = resolve_passphrase(
        &ctx.config,
        PassphraseSources {
            saved_for: passphrase_for,
            env_value: std::env::var(PASSPHRASE_ENV).ok(),
            prompt: input.map(|_| stdin_prompt(&stdin)),
        },
    )?;

    let decrypted = ctx.ops.decrypt(&text, &passphrase)?;
    print!("{decrypted}");
    output::success("Decrypted");
    Ok(())
}
