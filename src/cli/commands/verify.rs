use std::path::Path;

use gpgwrap::core::errors::Result;

use super::input_helpers::read_text;
use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap verify` command.
///
/// Returns whether the signature is good; the caller turns `false` into
/// a non-zero exit.
pub fn execute(ctx: &Context, input: Option<&Path>) -> Result<bool> {
    let text = read_text(input)?;
    let verified = ctx.ops.verify_signature(&text);
    if verified {
        output::success("Good signature");
    } else {
        output::warning("Signature could not be verified");
    }
    Ok(verified)
}
