use std::path::Path;

use gpgwrap::core::errors::Result;

use super::input_helpers::read_text;
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap sign` command.
pub fn execute(ctx: &Context, key: &str, input: Option<&Path>) -> Result<()> {
    let text = read_text(input)?;
    let signed = ctx.ops.clear_sign(&text, key)?;
    print!("{signed}");
    output::success(&format!("Signed with {}", key.trim()));
    Ok(())
}
