//! Parse and archive boundaries around the document tree.
//!
//! [`xml`] turns `content.xml` text into [`Item`](crate::odf::tree::Item)s and
//! back; [`Package`] reads an ODF archive and rewrites one member of it.

/// ODF package handling
mod package;
/// XML parsing and serialization
pub mod xml;

pub use package::{CompressionMode, Package};

#[cfg(test)]
pub(crate) use package::tests::build_package;
