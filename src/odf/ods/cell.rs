//! Table cells: logical columns, formulas, and values.

use super::Row;
use super::formula::shift_row_references;
use crate::odf::constants::{
    CALCEXT_VALUE_TYPE, FORMULA, PARAGRAPH_TAG, STRING_VALUE, VALUE, VALUE_TYPE,
};
use crate::odf::coordinates::CellCoord;
use crate::odf::tree::{Document, NodeHandle, node_handle};
use std::borrow::Cow;

node_handle! {
    /// A `table:table-cell`, possibly standing for several repeated cells
    Cell => Cell
}

impl Cell {
    /// Zero-based logical column index, counting repeated cells.
    pub fn column_index(self, doc: &Document) -> usize {
        doc.logical_index(self.id())
    }

    /// Number of logical columns this element stands for.
    pub fn repeat_count(self, doc: &Document) -> usize {
        doc.repeat_count(self.id())
    }

    /// The owning row, if the cell is attached directly to one.
    pub fn row(self, doc: &Document) -> Option<Row> {
        doc.parent(self.id()).and_then(|parent| doc.cast(parent))
    }

    /// Logical (column, row) of the first cell this element stands for.
    pub fn coordinate(self, doc: &Document) -> Option<CellCoord> {
        let row = self.row(doc)?;
        Some(CellCoord::new(self.column_index(doc), row.index(doc)))
    }

    pub fn formula(self, doc: &Document) -> Option<&str> {
        doc.attribute(self.id(), FORMULA)
    }

    pub fn value_type(self, doc: &Document) -> Option<&str> {
        doc.attribute(self.id(), VALUE_TYPE)
    }

    /// Displayed text: every text run in the cell, concatenated.
    pub fn text(self, doc: &Document) -> String {
        doc.text_content(self.id())
    }

    /// Shift relative row references below `from_row` by `delta`.
    ///
    /// Returns whether the formula attribute was rewritten; a formula with no
    /// reference in range is left untouched.
    pub fn adjust_formulae(self, doc: &mut Document, from_row: i64, delta: i64) -> bool {
        let Some(formula) = self.formula(doc) else {
            return false;
        };
        let shifted = match shift_row_references(formula, from_row, delta) {
            Cow::Borrowed(_) => return false,
            Cow::Owned(shifted) => shifted,
        };
        doc.set_attrib(self.id(), FORMULA, shifted);
        true
    }

    /// Set the value type in both places ODF producers read it from.
    pub fn set_type(self, doc: &mut Document, value_type: &str) {
        doc.set_attrib(self.id(), VALUE_TYPE, value_type)
            .set_attrib(self.id(), CALCEXT_VALUE_TYPE, value_type);
    }

    /// Turn the cell into a formula cell.
    ///
    /// Cached literal values and all child content are dropped so the
    /// consumer recalculates on load.
    pub fn set_formula(self, doc: &mut Document, formula: &str, value_type: Option<&str>) {
        if let Some(value_type) = value_type {
            self.set_type(doc, value_type);
        }
        doc.set_attrib(self.id(), FORMULA, formula)
            .delete_attrib(self.id(), VALUE)
            .delete_attrib(self.id(), STRING_VALUE);
        doc.clear(self.id());
    }

    /// Drop value, type, formula, and content; the cell becomes empty.
    pub fn clear_value(self, doc: &mut Document) {
        for attr in [VALUE, STRING_VALUE, FORMULA, VALUE_TYPE, CALCEXT_VALUE_TYPE] {
            doc.delete_attrib(self.id(), attr);
        }
        doc.clear(self.id());
    }

    /// Store a string value as a single paragraph.
    pub fn set_string(self, doc: &mut Document, value: &str) {
        self.clear_value(doc);
        self.set_type(doc, "string");
        let paragraph = doc.add_node(self.id(), PARAGRAPH_TAG);
        doc.add_text(paragraph, value);
    }

    /// Store a float value and its text rendering.
    pub fn set_float(self, doc: &mut Document, value: f64) {
        self.clear_value(doc);
        self.set_type(doc, "float");
        doc.set_attrib(self.id(), VALUE, value.to_string());
        let paragraph = doc.add_node(self.id(), PARAGRAPH_TAG);
        doc.add_text(paragraph, &value.to_string());
    }
}
