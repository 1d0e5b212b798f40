//! OpenDocument spreadsheet views over the document tree.
//!
//! Each view is a `Copy` handle into a [`Document`](crate::odf::tree::Document):
//! navigation takes `&Document`, edits take `&mut Document`.
//!
//! # Examples
//!
//! ```
//! use odstree::odf::tree::{Document, Item};
//!
//! # fn main() -> odstree::Result<()> {
//! let sheet = Item::element("table:table")
//!     .with_attribute("table:name", "Sheet1")
//!     .with_child(Item::element("table:table-row")
//!         .with_child(Item::element("table:table-cell")))
//!     .with_child(Item::element("table:table-row")
//!         .with_child(Item::element("table:table-cell")
//!             .with_attribute("table:formula", "of:=[.A1]+[.A2]")));
//! let mut doc = Document::from_items(vec![Item::element("office:document-content")
//!     .with_child(Item::element("office:body")
//!         .with_child(Item::element("office:spreadsheet").with_child(sheet)))]);
//!
//! let table = doc.spreadsheet()?.tables(&doc)["Sheet1"];
//! table.insert_row(&mut doc, 0)?;
//!
//! let cell = table.cell_at(&doc, 2, 0).unwrap();
//! assert_eq!(cell.formula(&doc), Some("of:=[.A1]+[.A3]"));
//! # Ok(())
//! # }
//! ```

mod cell;
pub mod formula;
mod row;
mod spreadsheet;
mod table;
mod text;

pub use cell::Cell;
pub use row::Row;
pub use spreadsheet::Spreadsheet;
pub use table::Table;
pub use text::TextNode;
