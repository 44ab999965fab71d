//! Drive a local `gpg` to list keys, encrypt and decrypt text and files,
//! clear-sign and verify.
//!
//! The entry point is [`core::GpgOperations`], built from a
//! [`core::BackendInvoker`] over a [`core::traits::runner::CommandRunner`]
//! and a key-listing parser:
//!
//! ```no_run
//! use gpgwrap::adapters::parsers::colon_listing_parser::ColonListingParser;
//! use gpgwrap::adapters::runner::gpg_process::GpgProcess;
//! use gpgwrap::core::{BackendInvoker, BackendOptions, GpgOperations};
//!
//! let invoker = BackendInvoker::new(GpgProcess::new(), BackendOptions::default());
//! let ops = GpgOperations::new(invoker, ColonListingParser);
//! for key in ops.list_keys()? {
//!     println!("{key}");
//! }
//! # Ok::<(), gpgwrap::core::GpgWrapError>(())
//! ```
//!
//! Every trust-sensitive call runs with `--trust-model always`, so gpg
//! never asks whether a recipient's key is trusted. Keys are used as-is.

pub mod adapters;
pub mod config;
pub mod core;
