//! Ordered collections of node handles.

use super::{Document, NodeHandle, NodeId};
use std::collections::HashMap;
use std::ops::Index;

/// An ordered, indexable set of nodes of one handle type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet<H = NodeId> {
    nodes: Vec<H>,
}

impl<H: NodeHandle> NodeSet<H> {
    pub fn new(nodes: Vec<H>) -> Self {
        Self { nodes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<H> {
        self.nodes.get(index).copied()
    }

    pub fn first(&self) -> Option<H> {
        self.nodes.first().copied()
    }

    pub fn last(&self) -> Option<H> {
        self.nodes.last().copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = H> + ExactSizeIterator + '_ {
        self.nodes.iter().copied()
    }

    pub fn as_slice(&self) -> &[H] {
        &self.nodes
    }

    /// Project into a map keyed by the value of attribute `key`.
    ///
    /// Later nodes win when values repeat; nodes without the attribute are
    /// skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use odstree::odf::tree::{Document, Item};
    ///
    /// let doc = Document::from_items(vec![
    ///     Item::element("t").with_attribute("name", "a"),
    ///     Item::element("t").with_attribute("name", "a"),
    /// ]);
    /// let by_name = doc.all(doc.root(), "t").index_by(&doc, "name");
    /// assert_eq!(by_name.len(), 1);
    /// assert_eq!(by_name["a"], doc.children(doc.root())[1]);
    /// ```
    pub fn index_by(&self, doc: &Document, key: &str) -> HashMap<String, H> {
        let mut map = HashMap::with_capacity(self.nodes.len());
        for &node in &self.nodes {
            if let Some(value) = doc.attribute(node.id(), key) {
                map.insert(value.to_string(), node);
            }
        }
        map
    }
}

impl<H> Default for NodeSet<H> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<H> Index<usize> for NodeSet<H> {
    type Output = H;

    fn index(&self, index: usize) -> &H {
        &self.nodes[index]
    }
}

impl<H> FromIterator<H> for NodeSet<H> {
    fn from_iter<I: IntoIterator<Item = H>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<H> IntoIterator for NodeSet<H> {
    type Item = H;
    type IntoIter = std::vec::IntoIter<H>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::odf::tree::{Document, Item};

    #[test]
    fn test_index_by_skips_missing_attribute() {
        let doc = Document::from_items(vec![
            Item::element("t").with_attribute("name", "a"),
            Item::element("t"),
            Item::element("t").with_attribute("name", "b"),
        ]);
        let set = doc.all(doc.root(), "t");
        assert_eq!(set.len(), 3);
        let by_name = set.index_by(&doc, "name");
        assert_eq!(by_name.len(), 2);
        assert_eq!(by_name["b"], set[2]);
    }

    #[test]
    fn test_positional_access() {
        let doc = Document::from_items(vec![Item::element("t"), Item::element("u")]);
        let set = doc.all(doc.root(), "u");
        assert_eq!(set.first(), set.last());
        assert_eq!(set.get(1), None);
        assert!(doc.all(doc.root(), "v").is_empty());
    }
}
