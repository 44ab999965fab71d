use std::sync::OnceLock;

use colored::Colorize;

// stdout carries ciphertext/plaintext for the text commands, so every
// status line goes to stderr.

static QUIET: OnceLock<bool> = OnceLock::new();

/// Suppress success and detail lines for the rest of the run.
pub fn set_quiet(quiet: bool) {
    let _ = QUIET.set(quiet);
}

fn quiet() -> bool {
    QUIET.get().copied().unwrap_or(false)
}

/// Print a success message.
pub fn success(msg: &str) {
    if !quiet() {
        eprintln!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print an indented detail line.
pub fn detail(msg: &str) {
    if !quiet() {
        eprintln!("    {}", msg.dimmed());
    }
}
