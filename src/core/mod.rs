//! Domain layer: models, ports and the operation services.
//!
//! Nothing in here knows how gpg is launched; that lives behind the
//! `CommandRunner` port in `crate::adapters`.

pub mod errors;
pub mod models;
pub mod services;
pub mod traits;

pub use errors::{GpgWrapError, Result};
pub use models::public_key::PublicKey;
pub use services::invoker::{BackendInvoker, BackendOptions, TrustModel};
pub use services::operations::GpgOperations;
