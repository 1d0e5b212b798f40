//! Table rows and their logical indices.

use super::{Cell, Table};
use crate::odf::tree::{Document, NodeHandle, NodeKind, NodeSet, node_handle};

node_handle! {
    /// A `table:table-row`, possibly standing for several repeated rows
    Row => Row
}

impl Row {
    /// Zero-based logical row index, counting repeated rows.
    ///
    /// Computed for all rows of the table on first read after a structural
    /// change, then served from cache.
    pub fn index(self, doc: &Document) -> usize {
        doc.logical_index(self.id())
    }

    /// Number of logical rows this element stands for.
    pub fn repeat_count(self, doc: &Document) -> usize {
        doc.repeat_count(self.id())
    }

    /// The owning table, if the row is attached directly to one.
    pub fn table(self, doc: &Document) -> Option<Table> {
        doc.parent(self.id()).and_then(|parent| doc.cast(parent))
    }

    /// Direct cell children in document order.
    pub fn cells(self, doc: &Document) -> NodeSet<Cell> {
        doc.children_of::<Cell>(self.id())
    }

    pub fn for_each_cell<F: FnMut(Cell)>(self, doc: &Document, f: F) {
        self.cells(doc).into_iter().for_each(f);
    }

    /// The cell whose repeat run covers logical column `column`.
    pub fn cell_at(self, doc: &Document, column: usize) -> Option<Cell> {
        doc.child_covering(self.id(), NodeKind::Cell, column)
            .map(Cell)
    }
}
