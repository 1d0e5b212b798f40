//! Sheets: row iteration, row insertion and deletion, formula fan-out.
//!
//! Row operations address rows by logical index. A target index must be the
//! logical start of an existing row element; an index that falls inside a
//! repeat-compressed run (a row with `table:number-rows-repeated` > 1) is
//! not split and does not match.

use super::{Cell, Row};
use crate::common::{Error, Result};
use crate::odf::constants::{ROW_TAG, TABLE_NAME};
use crate::odf::tree::{Document, Item, NodeHandle, NodeKind, NodeSet, node_handle};
use log::debug;

node_handle! {
    /// A `table:table` element (one sheet)
    Table => Table
}

impl Table {
    pub fn name(self, doc: &Document) -> Option<&str> {
        doc.attribute(self.id(), TABLE_NAME)
    }

    /// Direct row children in document order.
    pub fn rows(self, doc: &Document) -> NodeSet<Row> {
        doc.children_of::<Row>(self.id())
    }

    pub fn for_each_row<F: FnMut(Row)>(self, doc: &Document, f: F) {
        self.rows(doc).into_iter().for_each(f);
    }

    /// Visit every cell of every row, row-major.
    pub fn for_each_cell<F: FnMut(Cell)>(self, doc: &Document, mut f: F) {
        self.for_each_row(doc, |row| row.for_each_cell(doc, &mut f));
    }

    /// The row whose repeat run covers logical row `row`.
    pub fn row_at(self, doc: &Document, row: usize) -> Option<Row> {
        doc.child_covering(self.id(), NodeKind::Row, row).map(Row)
    }

    /// The cell covering logical (`row`, `column`).
    pub fn cell_at(self, doc: &Document, row: usize, column: usize) -> Option<Cell> {
        self.row_at(doc, row)?.cell_at(doc, column)
    }

    /// Row element whose logical index is exactly `index`.
    fn row_starting_at(self, doc: &Document, index: usize) -> Option<Row> {
        self.rows(doc).iter().find(|row| row.index(doc) == index)
    }

    /// Shift relative row references below `from_row` in every cell.
    ///
    /// Returns the number of formulas rewritten.
    pub fn adjust_formulae(self, doc: &mut Document, from_row: i64, delta: i64) -> usize {
        let mut cells = Vec::new();
        self.for_each_cell(doc, |cell| cells.push(cell));
        cells
            .into_iter()
            .filter(|cell| cell.adjust_formulae(doc, from_row, delta))
            .count()
    }

    /// Insert an empty row before the row starting at logical `index`.
    ///
    /// Relative references to rows below that row move down by one; a
    /// reference to the row at `index` itself keeps its number.
    /// Fails with [`Error::InvalidIndex`] if no row starts at `index`; the
    /// table is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use odstree::odf::tree::{Document, Item};
    /// use odstree::odf::ods::Table;
    ///
    /// let mut doc = Document::from_items(vec![Item::element("table:table")
    ///     .with_child(Item::element("table:table-row"))
    ///     .with_child(Item::element("table:table-row").with_child(
    ///         Item::element("table:table-cell").with_attribute("table:formula", "of:=[.A1]+[.A2]+[.A3]"),
    ///     ))]);
    /// let table = doc.cast::<Table>(doc.children(doc.root())[0]).unwrap();
    ///
    /// table.insert_row(&mut doc, 1).unwrap();
    /// assert_eq!(table.rows(&doc).len(), 3);
    ///
    /// let cell = table.cell_at(&doc, 2, 0).unwrap();
    /// assert_eq!(cell.formula(&doc), Some("of:=[.A1]+[.A2]+[.A4]"));
    /// ```
    pub fn insert_row(self, doc: &mut Document, index: usize) -> Result<Row> {
        let target = self
            .row_starting_at(doc, index)
            .ok_or(Error::InvalidIndex(index))?;
        let position = doc.position_in_parent(target.id()).ok_or_else(|| {
            Error::StructuralInvariant("row is not listed among its table's children".to_string())
        })?;

        let rewritten = self.adjust_formulae(doc, index as i64, 1);
        let row = doc.insert_child(self.id(), position, Item::element(ROW_TAG))?;
        doc.propagate_dirty(self.id());

        debug!(
            "inserted row at logical {} (physical {}) in table {:?}, {} formulas rewritten",
            index,
            position,
            self.name(doc),
            rewritten
        );
        Ok(Row(row))
    }

    /// Delete the row element starting at logical `index`.
    ///
    /// References below it move up by one. Returns `false`, leaving the
    /// table untouched, if no row starts at `index`.
    pub fn delete_row(self, doc: &mut Document, index: usize) -> bool {
        let Some(target) = self.row_starting_at(doc, index) else {
            return false;
        };
        let Some(position) = doc.position_in_parent(target.id()) else {
            return false;
        };

        let rewritten = self.adjust_formulae(doc, index as i64, -1);
        if doc.remove_child(self.id(), position).is_err() {
            return false;
        }
        doc.propagate_dirty(self.id());

        debug!(
            "deleted row at logical {} (physical {}) in table {:?}, {} formulas rewritten",
            index,
            position,
            self.name(doc),
            rewritten
        );
        true
    }
}
