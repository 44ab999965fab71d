use std::path::Path;

use gpgwrap::adapters::parsers::colon_listing_parser::ColonListingParser;
use gpgwrap::adapters::runner::gpg_process::GpgProcess;
use gpgwrap::config::app_config::AppConfig;
use gpgwrap::core::errors::Result;
use gpgwrap::core::services::invoker::BackendInvoker;
use gpgwrap::core::services::operations::GpgOperations;

/// The operation facade as wired for the real gpg binary.
pub type Operations = GpgOperations<GpgProcess, ColonListingParser>;

/// Everything a command needs: the loaded config and the operations.
pub struct Context {
    pub config: AppConfig,
    pub ops: Operations,
}

impl Context {
    /// Load config and apply the global `--gpg` / `--homedir` overrides.
    pub fn load(
        config_path: Option<&Path>,
        gpg_path: Option<&Path>,
        homedir: Option<&Path>,
    ) -> Result<Self> {
        let mut config = AppConfig::load(config_path)?;
        if let Some(path) = gpg_path {
            config.gpg.path = path.to_path_buf();
        }
        if let Some(dir) = homedir {
            config.gpg.homedir = Some(dir.to_path_buf());
        }

        let runner = GpgProcess::with_path(config.gpg.path.clone());
        let invoker = BackendInvoker::new(runner, config.backend_options());
        let ops = GpgOperations::new(invoker, ColonListingParser);

        Ok(Self { config, ops })
    }
}
