//! In-place editing of one XML member of an ODF package.
//!
//! The archive is read, the member is parsed into a [`Document`], the caller
//! mutates it, and a new archive is written with only that member replaced.

use crate::common::Result;
use crate::odf::constants::ODF_CONTENT;
use crate::odf::core::{CompressionMode, Package};
use crate::odf::tree::Document;
use log::debug;
use std::path::Path;

/// Options for [`edit_bytes`] and [`edit_file`].
///
/// # Examples
///
/// ```rust
/// use odstree::odf::{CompressionMode, EditOptions};
///
/// let options = EditOptions::default();
/// assert_eq!(options.member, "content.xml");
///
/// let options = EditOptions::new()
///     .with_member("styles.xml")
///     .with_compression(CompressionMode::Deflated);
/// assert_eq!(options.compression, CompressionMode::Deflated);
/// ```
#[derive(Debug, Clone)]
pub struct EditOptions {
    /// Archive member to parse and rewrite
    pub member: String,
    /// Compression of the rewritten member
    pub compression: CompressionMode,
}

impl Default for EditOptions {
    fn default() -> Self {
        Self {
            member: ODF_CONTENT.to_string(),
            compression: CompressionMode::Preserve,
        }
    }
}

impl EditOptions {
    /// Create options with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the member to edit.
    #[inline]
    pub fn with_member(mut self, member: impl Into<String>) -> Self {
        self.member = member.into();
        self
    }

    /// Set how the rewritten member is compressed.
    #[inline]
    pub fn with_compression(mut self, compression: CompressionMode) -> Self {
        self.compression = compression;
        self
    }
}

/// Edit a package held in memory and return the new archive bytes.
///
/// An error from `edit` aborts the whole operation.
///
/// # Examples
///
/// ```no_run
/// use odstree::odf::{edit_bytes, EditOptions};
///
/// # fn main() -> odstree::Result<()> {
/// let input = std::fs::read("budget.ods")?;
/// let output = edit_bytes(input, &EditOptions::default(), |doc| {
///     let table = doc.spreadsheet()?.table_list(doc)[0];
///     table.insert_row(doc, 3)?;
///     Ok(())
/// })?;
/// std::fs::write("budget-edited.ods", output)?;
/// # Ok(())
/// # }
/// ```
pub fn edit_bytes<F>(archive: Vec<u8>, options: &EditOptions, edit: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut Document) -> Result<()>,
{
    let package = Package::from_bytes(archive)?;
    let xml = String::from_utf8(package.member(&options.member)?)?;

    let mut doc = Document::parse_str(&xml)?;
    edit(&mut doc)?;
    let xml = doc.to_xml_string();
    debug!(
        "serialized {} ({} nodes, {} bytes)",
        options.member,
        doc.node_count(),
        xml.len()
    );

    package.replace_member(&options.member, xml.as_bytes(), options.compression)
}

/// Edit a package on disk, writing the result to `output`.
///
/// `output` is only written when every step succeeded; it may equal `input`.
pub fn edit_file<F, P, Q>(input: P, output: Q, options: &EditOptions, edit: F) -> Result<()>
where
    F: FnOnce(&mut Document) -> Result<()>,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let bytes = edit_bytes(std::fs::read(input)?, options, edit)?;
    std::fs::write(output, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::odf::core::build_package;

    const CONTENT: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<office:document-content><office:body><office:spreadsheet>"#,
        r#"<table:table table:name="Sheet1">"#,
        r#"<table:table-row><table:table-cell office:value-type="float" office:value="1"><text:p>1</text:p></table:table-cell></table:table-row>"#,
        r#"<table:table-row><table:table-cell table:formula="of:=[.A1]+1"/></table:table-row>"#,
        r#"</table:table></office:spreadsheet></office:body></office:document-content>"#,
    );

    fn formula_at(bytes: Vec<u8>, row: usize) -> Option<String> {
        let pkg = Package::from_bytes(bytes).unwrap();
        let xml = String::from_utf8(pkg.member(ODF_CONTENT).unwrap()).unwrap();
        let doc = Document::parse_str(&xml).unwrap();
        let table = doc.spreadsheet().unwrap().tables(&doc)["Sheet1"];
        table
            .cell_at(&doc, row, 0)
            .and_then(|cell| cell.formula(&doc).map(str::to_string))
    }

    #[test]
    fn test_edit_bytes_insert_row() {
        let output = edit_bytes(build_package(CONTENT), &EditOptions::default(), |doc| {
            let table = doc.spreadsheet()?.tables(doc)["Sheet1"];
            table.insert_row(doc, 0)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(formula_at(output, 2).as_deref(), Some("of:=[.A1]+1"));
    }

    #[test]
    fn test_edit_bytes_untouched_is_stable() {
        let output = edit_bytes(build_package(CONTENT), &EditOptions::default(), |_| Ok(())).unwrap();
        let pkg = Package::from_bytes(output).unwrap();
        assert_eq!(pkg.member(ODF_CONTENT).unwrap(), CONTENT.as_bytes());
    }

    #[test]
    fn test_edit_bytes_aborts_on_error() {
        let result = edit_bytes(build_package(CONTENT), &EditOptions::default(), |doc| {
            let table = doc.spreadsheet()?.tables(doc)["Sheet1"];
            table.insert_row(doc, 7)?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidIndex(7))));
    }

    #[test]
    fn test_edit_bytes_missing_member() {
        let options = EditOptions::new().with_member("settings.xml");
        let result = edit_bytes(build_package(CONTENT), &options, |_| Ok(()));
        assert!(matches!(result, Err(Error::NotFound { .. })));
    }

    #[test]
    fn test_edit_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ods");
        let output = dir.path().join("out.ods");
        std::fs::write(&input, build_package(CONTENT)).unwrap();

        edit_file(&input, &output, &EditOptions::default(), |doc| {
            let table = doc.spreadsheet()?.tables(doc)["Sheet1"];
            table.delete_row(doc, 0);
            Ok(())
        })
        .unwrap();

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(formula_at(bytes, 0).as_deref(), Some("of:=[.A1]+1"));
    }

    #[test]
    fn test_edit_file_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.ods");
        let output = dir.path().join("out.ods");
        std::fs::write(&input, build_package(CONTENT)).unwrap();

        let result = edit_file(&input, &output, &EditOptions::default(), |doc| {
            doc.single(doc.root(), "office:missing")?;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!output.exists());
    }
}
