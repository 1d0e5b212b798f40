//! OpenDocument spreadsheet editing.
//!
//! [`tree`] holds the generic, order-preserving node model and [`ods`] the
//! spreadsheet views over it. With the `odf` feature, [`core`] adds the XML
//! and archive boundaries and [`edit_bytes`]/[`edit_file`] tie them together.

pub mod constants;
pub mod coordinates;
pub mod ods;
pub mod tree;

#[cfg(feature = "odf")]
pub mod core;
#[cfg(feature = "odf")]
mod edit;

#[cfg(feature = "odf")]
pub use core::{CompressionMode, Package};
#[cfg(feature = "odf")]
pub use edit::{EditOptions, edit_bytes, edit_file};
