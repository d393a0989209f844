//! Shared types for the gatelink driver bridge.
//!
//! This crate holds the pieces every other gatelink crate builds on: the
//! closed [`Value`] variant that replaces untyped runtime values, the
//! [`coerce`] function that turns descriptor tokens into values, the
//! descriptor grammar constants and the common [`Error`] type.

pub mod coerce;
pub mod constants;
pub mod error;
pub mod value;

pub use coerce::{coerce, parse_bool};
pub use error::{Error, Result};
pub use value::Value;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
