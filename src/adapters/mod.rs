//! Concrete implementations of the `core::traits` ports.

pub mod parsers;
pub mod runner;
