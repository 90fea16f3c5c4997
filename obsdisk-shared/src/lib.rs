//! ObsDisk shared definitions.
//!
//! This crate contains the error taxonomy and the constants that both the
//! `obsdisk` library and the `obsdisk` command-line tool depend on.

pub mod constants;
pub mod errors;

pub use errors::{ObsdiskError, ObsdiskResult};
