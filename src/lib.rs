//! odstree - Order-preserving editing of OpenDocument spreadsheets
//!
//! An ODS file is edited by parsing its `content.xml` into a [`Document`]
//! tree, mutating it through typed views, and writing it back. Everything the
//! views do not touch (unknown elements, attribute order, whitespace,
//! comments, other archive members) survives byte for byte.
//!
//! # Features
//!
//! - **Generic tree**: any XML part, with sibling order and repeated tags kept
//! - **Spreadsheet views**: tables, rows and cells, with repeat-compressed
//!   rows and cells addressed by logical index
//! - **Row editing**: inserting or deleting a row shifts relative row
//!   references in every formula of the sheet
//! - **Package rewriting** (feature `odf`): one member is replaced, every
//!   other member is copied raw
//!
//! # Example - Insert a row into an ODS file
//!
//! ```no_run
//! use odstree::odf::{edit_file, EditOptions};
//!
//! # fn main() -> odstree::Result<()> {
//! edit_file("budget.ods", "budget.ods", &EditOptions::default(), |doc| {
//!     let table = doc.spreadsheet()?.tables(doc)["Expenses"];
//!     table.insert_row(doc, 4)?;
//!     if let Some(cell) = table.cell_at(doc, 4, 0) {
//!         cell.set_string(doc, "Travel");
//!     }
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Work on a tree directly
//!
//! ```
//! use odstree::Document;
//! use odstree::odf::tree::Item;
//!
//! let mut doc = Document::from_items(vec![Item::element("office:document-content")]);
//! let content = doc.single(doc.root(), "office:document-content").unwrap();
//! doc.set_attrib(content, "office:version", "1.3");
//! assert_eq!(doc.attribute(content, "office:version"), Some("1.3"));
//! ```

pub mod common;
pub mod odf;

pub use common::{Error, Result};
pub use odf::tree::Document;
