//! Document entry point and the spreadsheet body.

use super::Table;
use crate::common::Result;
use crate::odf::constants::{BODY_TAG, DOCUMENT_CONTENT_TAG, SPREADSHEET_TAG, TABLE_NAME};
use crate::odf::tree::{Document, NodeHandle, NodeSet, node_handle};
use std::collections::HashMap;

node_handle! {
    /// The `office:spreadsheet` element holding the sheets
    Spreadsheet => Spreadsheet
}

impl Document {
    /// Locate the spreadsheet body of a `content.xml` tree.
    ///
    /// Fails with [`NotFound`](crate::Error::NotFound) when the
    /// document-content, body, spreadsheet nesting is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use odstree::odf::tree::{Document, Item};
    ///
    /// let doc = Document::from_items(vec![Item::element("office:document-content")
    ///     .with_child(Item::element("office:body")
    ///         .with_child(Item::element("office:spreadsheet")))]);
    /// assert!(doc.spreadsheet().is_ok());
    ///
    /// let text = Document::from_items(vec![Item::element("office:document-content")
    ///     .with_child(Item::element("office:body")
    ///         .with_child(Item::element("office:text")))]);
    /// assert!(text.spreadsheet().is_err());
    /// ```
    pub fn spreadsheet(&self) -> Result<Spreadsheet> {
        let id = self.dig(self.root(), &[DOCUMENT_CONTENT_TAG, BODY_TAG, SPREADSHEET_TAG])?;
        self.view(id)
    }
}

impl Spreadsheet {
    /// Sheets in document order.
    pub fn table_list(self, doc: &Document) -> NodeSet<Table> {
        doc.children_of::<Table>(self.id())
    }

    /// Sheets keyed by name; a later sheet wins over an earlier namesake.
    pub fn tables(self, doc: &Document) -> HashMap<String, Table> {
        self.table_list(doc).index_by(doc, TABLE_NAME)
    }

    /// Look up one sheet by name.
    pub fn table(self, doc: &Document, name: &str) -> Option<Table> {
        self.table_list(doc)
            .iter()
            .rev()
            .find(|table| table.name(doc) == Some(name))
    }
}
