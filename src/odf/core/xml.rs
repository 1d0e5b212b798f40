//! Parse and serialize `content.xml` as an ordered [`Item`] forest.
//!
//! Parsing keeps everything the tree needs to write the part back: sibling
//! order, attribute order, whitespace text, comments and the declaration.

use crate::common::xml::escape_xml;
use crate::common::{Error, Result};
use crate::odf::constants::{COMMENT_TAG, DECLARATION_TAG, TEXT_TAG};
use crate::odf::tree::{Attributes, Document, Item};
use log::debug;
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesRef, BytesStart, Event};

/// Parse an XML document into its top-level items.
///
/// # Examples
///
/// ```
/// use odstree::odf::core::xml::parse_items;
///
/// let items = parse_items(r#"<?xml version="1.0"?><a x="1">b &amp; c<d/></a>"#).unwrap();
/// assert_eq!(items[0].tag, "?xml");
/// assert_eq!(items[1].attribute("x"), Some("1"));
/// assert_eq!(items[1].children[0].text.as_deref(), Some("b & c"));
/// assert_eq!(items[1].children[1].tag, "d");
/// ```
pub fn parse_items(xml: &str) -> Result<Vec<Item>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut top: Vec<Item> = Vec::new();
    let mut stack: Vec<Item> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(ref e) => stack.push(element_from(e)?),
            Event::Empty(ref e) => {
                let element = element_from(e)?;
                push_item(&mut stack, &mut top, element);
            },
            Event::End(ref e) => {
                let element = stack.pop().ok_or_else(|| {
                    Error::XmlError(format!(
                        "Unexpected closing tag {}",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                push_item(&mut stack, &mut top, element);
            },
            Event::Text(ref t) => {
                let raw = String::from_utf8(t.to_vec())?;
                push_text(&mut stack, &mut top, &raw);
            },
            Event::GeneralRef(ref r) => {
                let resolved = resolve_reference(r)?;
                push_text(&mut stack, &mut top, &resolved);
            },
            Event::CData(ref c) => {
                let raw = String::from_utf8(c.to_vec())?;
                push_text(&mut stack, &mut top, &raw);
            },
            Event::Comment(ref c) => {
                let raw = String::from_utf8(c.to_vec())?;
                push_item(&mut stack, &mut top, Item::comment(raw));
            },
            Event::Decl(ref d) => {
                let mut decl = Item::element(DECLARATION_TAG);
                let version = d.version()?;
                decl = decl.with_attribute("version", String::from_utf8(version.to_vec())?);
                if let Some(encoding) = d.encoding() {
                    decl = decl.with_attribute("encoding", String::from_utf8(encoding?.to_vec())?);
                }
                if let Some(standalone) = d.standalone() {
                    decl =
                        decl.with_attribute("standalone", String::from_utf8(standalone?.to_vec())?);
                }
                push_item(&mut stack, &mut top, decl);
            },
            Event::PI(_) | Event::DocType(_) => {},
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::XmlError(format!("Unclosed element {}", open.tag)));
    }
    debug!("parsed {} top-level items", top.len());
    Ok(top)
}

/// Build an element item from a start or empty tag.
fn element_from(e: &BytesStart<'_>) -> Result<Item> {
    let tag = String::from_utf8(e.name().as_ref().to_vec())?;
    let mut attributes = Attributes::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.as_ref().to_vec())?;
        let value = attr.unescape_value()?;
        attributes.insert(key, value.into_owned());
    }
    Ok(Item {
        tag,
        attributes: (!attributes.is_empty()).then_some(attributes),
        ..Item::default()
    })
}

/// Text of a character or predefined entity reference.
///
/// Other entities cannot be written back unchanged, so they fail the parse.
fn resolve_reference(r: &BytesRef<'_>) -> Result<String> {
    if let Some(c) = r.resolve_char_ref()? {
        return Ok(c.to_string());
    }
    let name = String::from_utf8(r.to_vec())?;
    resolve_predefined_entity(&name)
        .map(str::to_string)
        .ok_or_else(|| Error::XmlError(format!("Unrecognized entity &{name};")))
}

fn push_item(stack: &mut [Item], top: &mut Vec<Item>, item: Item) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(item),
        None => top.push(item),
    }
}

/// Append text, merging with a directly preceding text item.
fn push_text(stack: &mut [Item], top: &mut Vec<Item>, value: &str) {
    if value.is_empty() {
        return;
    }
    let siblings = match stack.last_mut() {
        Some(parent) => &mut parent.children,
        None => top,
    };
    if let Some(last) = siblings.last_mut()
        && last.is_text()
    {
        last.text.get_or_insert_with(String::new).push_str(value);
        return;
    }
    siblings.push(Item::text(value));
}

/// Serialize items back to XML text.
///
/// Elements without children are written in their empty form.
pub fn write_items(items: &[Item]) -> String {
    let mut xml = String::with_capacity(items.iter().map(Item::subtree_len).sum::<usize>() * 32);
    for item in items {
        write_item(item, &mut xml);
    }
    xml
}

fn write_item(item: &Item, output: &mut String) {
    match item.tag.as_str() {
        TEXT_TAG => {
            if let Some(text) = &item.text {
                output.push_str(&escape_xml(text));
            }
        },
        COMMENT_TAG => {
            output.push_str("<!--");
            output.push_str(item.text.as_deref().unwrap_or_default());
            output.push_str("-->");
        },
        DECLARATION_TAG => {
            output.push_str("<?xml");
            write_attributes(item, output);
            output.push_str("?>");
        },
        tag => {
            output.push('<');
            output.push_str(tag);
            write_attributes(item, output);
            if item.children.is_empty() {
                output.push_str("/>");
                return;
            }
            output.push('>');
            for child in &item.children {
                write_item(child, output);
            }
            output.push_str("</");
            output.push_str(tag);
            output.push('>');
        },
    }
}

fn write_attributes(item: &Item, output: &mut String) {
    for (key, value) in item.attributes.iter().flatten() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_xml(value));
        output.push('"');
    }
}

impl Document {
    /// Parse XML text into a materialized document.
    pub fn parse_str(xml: &str) -> Result<Self> {
        Ok(Self::from_items(parse_items(xml)?))
    }

    /// Serialize the whole document back to XML text.
    pub fn to_xml_string(&self) -> String {
        write_items(&self.to_items())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<office:document-content office:version="1.3">"#,
        r#"<office:body><office:spreadsheet>"#,
        r#"<table:table table:name="Sheet1">"#,
        r#"<table:table-row table:number-rows-repeated="2">"#,
        r#"<table:table-cell office:value-type="string"><text:p>a &lt; b</text:p></table:table-cell>"#,
        r#"</table:table-row>"#,
        r#"</table:table></office:spreadsheet></office:body></office:document-content>"#,
    );

    #[test]
    fn test_parse_declaration() {
        let items = parse_items(CONTENT).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].tag, DECLARATION_TAG);
        assert_eq!(items[0].attribute("version"), Some("1.0"));
        assert_eq!(items[0].attribute("encoding"), Some("UTF-8"));
        assert_eq!(items[0].attribute("standalone"), None);
    }

    #[test]
    fn test_parse_write_identity() {
        let items = parse_items(CONTENT).unwrap();
        assert_eq!(write_items(&items), CONTENT);
    }

    #[test]
    fn test_parse_merges_entity_text() {
        let items = parse_items("<p>x &amp; y &#65;</p>").unwrap();
        assert_eq!(items[0].children.len(), 1);
        assert_eq!(items[0].children[0].text.as_deref(), Some("x & y A"));
    }

    #[test]
    fn test_parse_preserves_order_and_whitespace() {
        let items = parse_items("<r><b/> <a/><!-- note --><b/></r>").unwrap();
        let tags: Vec<&str> = items[0].children.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, ["b", TEXT_TAG, "a", COMMENT_TAG, "b"]);
        assert_eq!(items[0].children[1].text.as_deref(), Some(" "));
        assert_eq!(items[0].children[3].text.as_deref(), Some(" note "));
    }

    #[test]
    fn test_parse_attribute_order_and_escapes() {
        let items = parse_items(r#"<c z="1" a="&quot;q&quot;" m="x&amp;y"/>"#).unwrap();
        let keys: Vec<&str> = items[0]
            .attributes
            .iter()
            .flatten()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, ["z", "a", "m"]);
        assert_eq!(items[0].attribute("a"), Some("\"q\""));
        assert_eq!(items[0].attribute("m"), Some("x&y"));
    }

    #[test]
    fn test_unknown_entities_fail() {
        assert!(matches!(parse_items("<p>a &foo; b</p>"), Err(Error::XmlError(_))));
        assert!(matches!(parse_items(r#"<p a="&foo;"/>"#), Err(Error::XmlError(_))));
    }

    #[test]
    fn test_character_references_in_attributes() {
        let items = parse_items(r#"<p a="x&#65;&#x42;&lt;"/>"#).unwrap();
        assert_eq!(items[0].attribute("a"), Some("xAB<"));
        assert_eq!(write_items(&items), r#"<p a="xAB&lt;"/>"#);
    }

    #[test]
    fn test_cdata_becomes_text() {
        let items = parse_items("<p><![CDATA[<raw>]]></p>").unwrap();
        assert_eq!(items[0].children[0].text.as_deref(), Some("<raw>"));
        assert_eq!(write_items(&items), "<p>&lt;raw&gt;</p>");
    }

    #[test]
    fn test_unclosed_element_fails() {
        assert!(parse_items("<a><b></b>").is_err());
    }

    #[test]
    fn test_mismatched_close_fails() {
        assert!(parse_items("<a></b>").is_err());
    }

    #[test]
    fn test_document_round_trip_after_edit() {
        let mut doc = Document::parse_str(CONTENT).unwrap();
        let table = doc.spreadsheet().unwrap().tables(&doc)["Sheet1"];
        let cell = table.cell_at(&doc, 1, 0).unwrap();
        cell.set_float(&mut doc, 2.5);

        let reparsed = Document::parse_str(&doc.to_xml_string()).unwrap();
        let table = reparsed.spreadsheet().unwrap().tables(&reparsed)["Sheet1"];
        let cell = table.cell_at(&reparsed, 0, 0).unwrap();
        assert_eq!(cell.value_type(&reparsed), Some("float"));
        assert_eq!(cell.text(&reparsed), "2.5");
    }
}
