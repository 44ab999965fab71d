mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

/// Env var overriding the log filter (e.g. `GPGWRAP_LOG=gpgwrap=trace`).
const LOG_ENV: &str = "GPGWRAP_LOG";

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose);
    cli::output::set_quiet(args.quiet);

    let ctx = match cli::context::Context::load(
        args.config.as_deref(),
        args.gpg.as_deref(),
        args.homedir.as_deref(),
    ) {
        Ok(ctx) => ctx,
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    };

    // Ok(false) means the command ran but its check did not pass.
    let result = match &args.command {
        Commands::Keys { json } => cli::commands::keys::execute(&ctx, *json).map(|()| true),
        Commands::Encrypt { recipient, input } => {
            cli::commands::encrypt::execute(&ctx, recipient, input.as_deref()).map(|()| true)
        }
        Commands::Decrypt {
            input,
            passphrase_for,
        } => cli::commands::decrypt::execute(&ctx, input.as_deref(), passphrase_for.as_deref())
            .map(|()| true),
        Commands::EncryptFile {
            file,
            recipient,
            output,
            binary,
            force,
        } => cli::commands::encrypt_file::execute(
            &ctx,
            file,
            recipient,
            output.as_deref(),
            *binary,
            *force,
        )
        .map(|()| true),
        Commands::DecryptFile {
            file,
            output,
            passphrase_for,
            force,
        } => cli::commands::decrypt_file::execute(
            &ctx,
            file,
            output.as_deref(),
            passphrase_for.as_deref(),
            *force,
        )
        .map(|()| true),
        Commands::Sign { key, input } => {
            cli::commands::sign::execute(&ctx, key, input.as_deref()).map(|()| true)
        }
        Commands::Verify { input } => cli::commands::verify::execute(&ctx, input.as_deref()),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
