use std::path::Path;

use gpgwrap::core::errors::Result;

use super::input_helpers::read_text;
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap encrypt` command.
///
/// Writes the armored ciphertext to stdout.
pub fn execute(ctx: &Context, recipient: &str, input: Option<&Path>) -> Result<()> {
    let text = read_text(input)?;
    let encrypted = ctx.ops.encrypt(&text, recipient)?;
    print!("{encrypted}");
    output::success(&format!("Encrypted for <{}>", recipient.trim()));
    Ok(())
}
