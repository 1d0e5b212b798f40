//! Tag dispatch: which specialized view backs a node.
//!
//! The kind of a node is decided once, from its tag, when the node is
//! materialized. Callers never re-dispatch; they ask the document for the
//! typed view with [`Document::typed`](super::Document::typed) or cast a
//! handle with [`Document::cast`](super::Document::cast).

use super::NodeId;
use crate::odf::constants::{CELL_TAG, ROW_TAG, SPREADSHEET_TAG, TABLE_TAG, TEXT_TAG};
use crate::odf::ods::{Cell, Row, Spreadsheet, Table, TextNode};
use phf::{Map, phf_map};

/// Closed set of node variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Any element without a specialized view
    Generic,
    /// The synthetic root wrapping the top-level items
    Document,
    Text,
    Spreadsheet,
    Table,
    Row,
    Cell,
}

/// Tags with a specialized view (compile-time perfect hash map)
static TAG_KINDS: Map<&'static str, NodeKind> = phf_map! {
    "#text" => NodeKind::Text,
    "office:spreadsheet" => NodeKind::Spreadsheet,
    "table:table" => NodeKind::Table,
    "table:table-row" => NodeKind::Row,
    "table:table-cell" => NodeKind::Cell,
};

impl NodeKind {
    /// Resolve the kind for a tag, falling back to [`NodeKind::Generic`]
    ///
    /// # Examples
    ///
    /// ```
    /// use odstree::odf::tree::NodeKind;
    ///
    /// assert_eq!(NodeKind::for_tag("table:table-row"), NodeKind::Row);
    /// assert_eq!(NodeKind::for_tag("text:p"), NodeKind::Generic);
    /// ```
    #[inline]
    pub fn for_tag(tag: &str) -> Self {
        TAG_KINDS.get(tag).copied().unwrap_or(NodeKind::Generic)
    }

    /// Whether nodes of this kind carry a cached logical index
    #[inline]
    pub const fn has_logical_index(self) -> bool {
        matches!(self, NodeKind::Row | NodeKind::Cell)
    }

    /// Canonical tag for specialized kinds
    pub const fn tag(self) -> Option<&'static str> {
        match self {
            NodeKind::Text => Some(TEXT_TAG),
            NodeKind::Spreadsheet => Some(SPREADSHEET_TAG),
            NodeKind::Table => Some(TABLE_TAG),
            NodeKind::Row => Some(ROW_TAG),
            NodeKind::Cell => Some(CELL_TAG),
            NodeKind::Generic | NodeKind::Document => None,
        }
    }
}

/// A node handle that may only point at nodes of certain kinds
pub trait NodeHandle: Copy {
    /// Whether a node of `kind` can be viewed through this handle
    fn accepts(kind: NodeKind) -> bool;

    /// Wrap an id whose kind has already been checked
    fn from_id(id: NodeId) -> Self;

    fn id(self) -> NodeId;
}

impl NodeHandle for NodeId {
    #[inline]
    fn accepts(_: NodeKind) -> bool {
        true
    }

    #[inline]
    fn from_id(id: NodeId) -> Self {
        id
    }

    #[inline]
    fn id(self) -> NodeId {
        self
    }
}

/// Declare a `Copy` handle type bound to one node kind.
macro_rules! node_handle {
    ($(#[$meta:meta])* $name:ident => $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) $crate::odf::tree::NodeId);

        impl $crate::odf::tree::NodeHandle for $name {
            #[inline]
            fn accepts(kind: $crate::odf::tree::NodeKind) -> bool {
                kind == $crate::odf::tree::NodeKind::$kind
            }

            #[inline]
            fn from_id(id: $crate::odf::tree::NodeId) -> Self {
                Self(id)
            }

            #[inline]
            fn id(self) -> $crate::odf::tree::NodeId {
                self.0
            }
        }

        impl From<$name> for $crate::odf::tree::NodeId {
            fn from(handle: $name) -> Self {
                handle.0
            }
        }
    };
}

pub(crate) use node_handle;

/// A node wearing its most specific view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedNode {
    Generic(NodeId),
    Document(NodeId),
    Text(TextNode),
    Spreadsheet(Spreadsheet),
    Table(Table),
    Row(Row),
    Cell(Cell),
}

impl TypedNode {
    pub(crate) fn new(kind: NodeKind, id: NodeId) -> Self {
        match kind {
            NodeKind::Generic => TypedNode::Generic(id),
            NodeKind::Document => TypedNode::Document(id),
            NodeKind::Text => TypedNode::Text(TextNode(id)),
            NodeKind::Spreadsheet => TypedNode::Spreadsheet(Spreadsheet(id)),
            NodeKind::Table => TypedNode::Table(Table(id)),
            NodeKind::Row => TypedNode::Row(Row(id)),
            NodeKind::Cell => TypedNode::Cell(Cell(id)),
        }
    }

    /// The underlying node id
    pub fn id(self) -> NodeId {
        match self {
            TypedNode::Generic(id) | TypedNode::Document(id) => id,
            TypedNode::Text(node) => node.id(),
            TypedNode::Spreadsheet(node) => node.id(),
            TypedNode::Table(node) => node.id(),
            TypedNode::Row(node) => node.id(),
            TypedNode::Cell(node) => node.id(),
        }
    }
}
