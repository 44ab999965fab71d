use colored::Colorize;

use gpgwrap::core::errors::Result;
use gpgwrap::core::models::public_key::PublicKey;

use crate::cli::context::Context;
use crate::cli::output;

/// Execute the `gpgwrap keys` command.
///
/// Prints one line per public key, the way a recipient picker would show
/// them, or the raw records with `--json`.
pub fn execute(ctx: &Context, json: bool) -> Result<()> {
    let keys = ctx.ops.list_keys()?;

    if json {
        let rendered = serde_json::to_string_pretty(&keys).map_err(std::io::Error::from)?;
        println!("{rendered}");
        return Ok(());
    }

    if keys.is_empty() {
        output::warning("No public keys found");
        return Ok(());
    }

    for key in &keys {
        println!("  {}", describe(key));
        if let Some(fpr) = &key.fingerprint {
            println!("      {}", fpr.dimmed());
        }
    }
    output::success(&format!("{} key(s)", keys.len()));
    Ok(())
}

fn describe(key: &PublicKey) -> String {
    let mut caps = Vec::new();
    if key.encrypt {
        caps.push("encrypt");
    }
    if key.sign {
        caps.push("sign");
    }
    let caps = if caps.is_empty() {
        "-".to_string()
    } else {
        caps.join(",")
    };
    format!("{key}  [{caps}]  created {}", format_date(&key.creation_date))
}

/// gpg prints epoch seconds in fixed-list mode; anything else is shown as is.
fn format_date(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| chrono::DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| if raw.is_empty() { "?".into() } else { raw.to_string() })
}
