//! The generic, order-preserving parse-tree unit.
//!
//! An [`Item`] is what the XML layer produces and consumes: one element (or
//! text run, comment, declaration) with its attributes and ordered children.
//! Sibling order and repeated tag names survive untouched, which a keyed map
//! of children could not express.

use crate::odf::constants::{COMMENT_TAG, TEXT_TAG};
use indexmap::IndexMap;

/// Attribute map of one element, in source order
pub type Attributes = IndexMap<String, String>;

/// One node of the parsed document
///
/// # Examples
///
/// ```
/// use odstree::odf::tree::Item;
///
/// let cell = Item::element("table:table-cell")
///     .with_attribute("office:value-type", "string")
///     .with_child(Item::element("text:p").with_child(Item::text("Hello")));
///
/// assert_eq!(cell.attribute("office:value-type"), Some("string"));
/// assert_eq!(cell.children[0].children[0].text.as_deref(), Some("Hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Qualified element name, or one of the reserved markers
    pub tag: String,
    /// Attributes, absent until the first one is set
    pub attributes: Option<Attributes>,
    /// Payload of text and comment items
    pub text: Option<String>,
    /// Child items in document order
    pub children: Vec<Item>,
}

impl Item {
    /// An element with no attributes and no children
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// A text run
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            tag: TEXT_TAG.to_string(),
            text: Some(value.into()),
            ..Self::default()
        }
    }

    /// A comment
    pub fn comment(value: impl Into<String>) -> Self {
        Self {
            tag: COMMENT_TAG.to_string(),
            text: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Item) -> Self {
        self.children.push(child);
        self
    }

    /// Get attribute value by name
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .as_ref()
            .and_then(|attrs| attrs.get(key))
            .map(String::as_str)
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.tag == TEXT_TAG
    }

    /// Number of items in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(Item::subtree_len).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attributes_absent_until_set() {
        let item = Item::element("table:table");
        assert!(item.attributes.is_none());
        assert_eq!(item.attribute("table:name"), None);

        let item = item.with_attribute("table:name", "Sheet1");
        assert_eq!(item.attributes.as_ref().map(|a| a.len()), Some(1));
    }

    #[test]
    fn test_attribute_order_preserved() {
        let item = Item::element("table:table-cell")
            .with_attribute("b", "2")
            .with_attribute("a", "1")
            .with_attribute("c", "3");
        let keys: Vec<&str> = item
            .attributes
            .iter()
            .flat_map(|attrs| attrs.keys())
            .map(String::as_str)
            .collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_text_item() {
        let item = Item::text("abc");
        assert!(item.is_text());
        assert!(item.children.is_empty());
        assert_eq!(item.subtree_len(), 1);
    }
}
