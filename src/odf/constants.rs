//! ODF constants: MIME types, package parts, element tags, and attributes.
//!
//! Tag and attribute names are matched literally against the qualified names
//! found in `content.xml` (e.g. `table:table-row`), so the namespace prefixes
//! used here are the ones every ODF producer writes.

use phf::{Set, phf_set};

// ============================================================================
// MIME TYPES
// ============================================================================

/// MIME type for OpenDocument Spreadsheet (.ods)
pub const ODF_SPREADSHEET: &str = "application/vnd.oasis.opendocument.spreadsheet";

/// MIME type for OpenDocument Spreadsheet Template (.ots)
pub const ODF_SPREADSHEET_TEMPLATE: &str =
    "application/vnd.oasis.opendocument.spreadsheet-template";

/// MIME types accepted as spreadsheet packages
pub static SPREADSHEET_MIME_TYPES: Set<&'static str> = phf_set! {
    "application/vnd.oasis.opendocument.spreadsheet",
    "application/vnd.oasis.opendocument.spreadsheet-template",
};

// ============================================================================
// STANDARD ODF PARTS PATHS
// ============================================================================

/// Path to content.xml (main document content)
pub const ODF_CONTENT: &str = "content.xml";

/// Path to the uncompressed mimetype member
pub const ODF_MIMETYPE: &str = "mimetype";

// ============================================================================
// RESERVED ITEM TAGS
// ============================================================================

/// Tag of a text item
pub const TEXT_TAG: &str = "#text";

/// Tag of a comment item
pub const COMMENT_TAG: &str = "#comment";

/// Tag of the XML declaration item
pub const DECLARATION_TAG: &str = "?xml";

// ============================================================================
// ELEMENT TAGS
// ============================================================================

/// Root element of content.xml
pub const DOCUMENT_CONTENT_TAG: &str = "office:document-content";

/// Document body
pub const BODY_TAG: &str = "office:body";

/// Spreadsheet body
pub const SPREADSHEET_TAG: &str = "office:spreadsheet";

/// One sheet
pub const TABLE_TAG: &str = "table:table";

/// One row (possibly repeated)
pub const ROW_TAG: &str = "table:table-row";

/// One cell (possibly repeated)
pub const CELL_TAG: &str = "table:table-cell";

/// Text paragraph
pub const PARAGRAPH_TAG: &str = "text:p";

// ============================================================================
// ATTRIBUTES
// ============================================================================

/// Sheet name
pub const TABLE_NAME: &str = "table:name";

/// Row repeat count
pub const ROWS_REPEATED: &str = "table:number-rows-repeated";

/// Cell repeat count
pub const COLUMNS_REPEATED: &str = "table:number-columns-repeated";

/// Cell formula
pub const FORMULA: &str = "table:formula";

/// Cell value type
pub const VALUE_TYPE: &str = "office:value-type";

/// LibreOffice calculation extension copy of the value type
pub const CALCEXT_VALUE_TYPE: &str = "calcext:value-type";

/// Cached numeric value
pub const VALUE: &str = "office:value";

/// Cached string value
pub const STRING_VALUE: &str = "office:string-value";

/// Check if a MIME type names a spreadsheet package
///
/// # Examples
///
/// ```
/// use odstree::odf::constants::is_spreadsheet_mime_type;
///
/// assert!(is_spreadsheet_mime_type("application/vnd.oasis.opendocument.spreadsheet"));
/// assert!(!is_spreadsheet_mime_type("application/vnd.oasis.opendocument.text"));
/// ```
#[inline]
pub fn is_spreadsheet_mime_type(mime_type: &str) -> bool {
    SPREADSHEET_MIME_TYPES.contains(mime_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spreadsheet_mime_types() {
        assert!(is_spreadsheet_mime_type(ODF_SPREADSHEET));
        assert!(is_spreadsheet_mime_type(ODF_SPREADSHEET_TEMPLATE));
        assert!(!is_spreadsheet_mime_type("text/plain"));
    }

    #[test]
    fn test_reserved_tags_are_not_qualified_names() {
        for tag in [TEXT_TAG, COMMENT_TAG, DECLARATION_TAG] {
            assert!(!tag.contains(':'));
        }
    }
}
