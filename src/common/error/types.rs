//! Unified error types for odstree.
//!
//! Tree operations fail with the structural variants; the XML and package
//! layers add their own I/O flavoured variants on top.
use thiserror::Error;

/// Main error type for odstree operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No child with the requested tag exists
    #[error("Element not found: {tag}")]
    NotFound { tag: String },

    /// A logical row index does not match the start of any row
    #[error("No row starts at logical index {0}")]
    InvalidIndex(usize),

    /// Parent and child links of the tree disagree
    #[error("Tree invariant violated: {0}")]
    StructuralInvariant(String),

    /// A node handle was used with a node of another kind
    #[error("Invalid node: {0}")]
    InvalidNode(String),

    /// Invalid file format
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(String),
}

impl Error {
    pub(crate) fn not_found(tag: &str) -> Self {
        Error::NotFound {
            tag: tag.to_string(),
        }
    }
}

/// Result type for odstree operations.
pub type Result<T> = std::result::Result<T, Error>;
