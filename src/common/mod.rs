//! Common types and utilities shared across the crate.
//!
//! This module holds the unified error type and the XML escaping helpers
//! used at the parse and serialize boundaries.

// Submodule declarations
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
