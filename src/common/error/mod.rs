//! Unified error types for odstree.
//!
//! Every fallible operation in the crate returns [`Result`], whether it
//! navigates the tree or rewrites an ODF package.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
