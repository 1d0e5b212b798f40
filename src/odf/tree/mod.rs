//! Arena-based document tree over parsed [`Item`]s.
//!
//! All nodes live in a `Vec<NodeData>` owned by the [`Document`] and are
//! referenced by [`NodeId`]. Each record holds the item fields (tag,
//! attributes, text) together with its parent link and the ordered ids of its
//! children, so the node list and the item's child sequence are one and the
//! same collection and cannot diverge.
//!
//! Navigation goes through `&Document`, mutation through `&mut Document`.
//! Nodes detached from the tree stay in the arena as unreachable records
//! until the document is dropped.
//!
//! # Examples
//!
//! ```
//! use odstree::odf::tree::{Document, Item};
//!
//! let mut doc = Document::from_items(vec![Item::element("office:document-content")]);
//! let content = doc.single(doc.root(), "office:document-content").unwrap();
//! let body = doc.add_node(content, "office:body");
//! doc.set_attrib(body, "xml:id", "b1");
//!
//! assert_eq!(doc.dig(doc.root(), &["office:document-content", "office:body"]).unwrap(), body);
//! assert_eq!(doc.attribute(body, "xml:id"), Some("b1"));
//! ```

mod dispatch;
mod index;
mod item;
mod node_set;

pub use dispatch::{NodeHandle, NodeKind, TypedNode};
pub(crate) use dispatch::node_handle;
pub use item::{Attributes, Item};
pub use node_set::NodeSet;

use crate::common::{Error, Result};
use index::IndexCache;
use log::trace;
use once_cell::sync::Lazy;

/// Shared empty map handed out for nodes without attributes
static EMPTY_ATTRIBUTES: Lazy<Attributes> = Lazy::new(Attributes::new);

/// A typed index into the document's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    /// Resolved tag; empty for the synthetic root
    name: String,
    attributes: Option<Attributes>,
    text: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Logical row/column index, valid only for the generation it records
    index_cache: std::cell::Cell<Option<IndexCache>>,
}

impl NodeData {
    fn new(kind: NodeKind, name: String) -> Self {
        Self {
            kind,
            name,
            attributes: None,
            text: None,
            parent: None,
            children: Vec::new(),
            index_cache: std::cell::Cell::new(None),
        }
    }
}

/// An editable document tree.
///
/// The root is a synthetic node with an empty name whose children are the
/// top-level items (XML declaration, root element). Every structural
/// mutation bumps the document generation, which invalidates all cached
/// logical indices at once.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    generation: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a document holding only the synthetic root.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        nodes.push(NodeData::new(NodeKind::Document, String::new()));
        Self {
            nodes,
            root: NodeId::from_index(0),
            generation: 0,
        }
    }

    /// Materialize a tree from the top-level items of a parsed document.
    ///
    /// Every node is dispatched to its specialized kind while it is built.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut doc = Self::new();
        let root = doc.root;
        for item in items {
            let child = doc.materialize(Some(root), item);
            doc.data_mut(root).children.push(child);
        }
        trace!("materialized document with {} nodes", doc.nodes.len());
        doc
    }

    /// Snapshot the top-level items, e.g. for serialization.
    pub fn to_items(&self) -> Vec<Item> {
        self.children(self.root)
            .iter()
            .map(|&child| self.to_item(child))
            .collect()
    }

    /// Deep snapshot of one subtree.
    pub fn to_item(&self, id: NodeId) -> Item {
        let data = self.data(id);
        Item {
            tag: data.name.clone(),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            children: data
                .children
                .iter()
                .map(|&child| self.to_item(child))
                .collect(),
        }
    }

    /// The synthetic root node.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of node records in the arena, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Structural generation; bumped by every structural mutation.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    #[inline]
    fn data_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    /// Allocate a node for `item` and, recursively, for its children.
    ///
    /// The new node is linked to `parent` but not yet listed among the
    /// parent's children; callers splice it in where they need it.
    fn materialize(&mut self, parent: Option<NodeId>, item: Item) -> NodeId {
        let Item {
            tag,
            attributes,
            text,
            children,
        } = item;
        let id = NodeId::from_index(self.nodes.len());
        let mut data = NodeData::new(NodeKind::for_tag(&tag), tag);
        data.attributes = attributes;
        data.text = text;
        data.parent = parent;
        self.nodes.push(data);

        let mut child_ids = Vec::with_capacity(children.len());
        for child in children {
            child_ids.push(self.materialize(Some(id), child));
        }
        self.data_mut(id).children = child_ids;
        id
    }

    /// Record a structural change.
    #[inline]
    fn touch(&mut self) {
        self.generation += 1;
    }

    // ------------------------------------------------------------------
    // Node accessors
    // ------------------------------------------------------------------

    /// Resolved tag of a node (empty for the synthetic root).
    pub fn name(&self, id: NodeId) -> &str {
        &self.data(id).name
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.data(id).kind
    }

    /// The node wearing its most specific view.
    pub fn typed(&self, id: NodeId) -> TypedNode {
        TypedNode::new(self.kind(id), id)
    }

    /// View a node through a typed handle, if its kind matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use odstree::odf::tree::{Document, Item};
    /// use odstree::odf::ods::{Row, Table};
    ///
    /// let doc = Document::from_items(vec![Item::element("table:table")]);
    /// let id = doc.children(doc.root())[0];
    /// assert!(doc.cast::<Table>(id).is_some());
    /// assert!(doc.cast::<Row>(id).is_none());
    /// ```
    pub fn cast<H: NodeHandle>(&self, id: NodeId) -> Option<H> {
        H::accepts(self.kind(id)).then(|| H::from_id(id))
    }

    /// Like [`cast`](Self::cast), failing with
    /// [`InvalidNode`](Error::InvalidNode) on a kind mismatch.
    pub fn view<H: NodeHandle>(&self, id: NodeId) -> Result<H> {
        self.cast(id).ok_or_else(|| {
            Error::InvalidNode(format!(
                "'{}' is a {:?} node",
                self.name(id),
                self.kind(id)
            ))
        })
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    /// Child ids in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    /// Text payload of text and comment nodes.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.data(id).text.as_deref()
    }

    /// Concatenated text of every text node in the subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut content = String::new();
        self.walk(id, |node| {
            if self.kind(node) == NodeKind::Text
                && let Some(text) = self.text(node)
            {
                content.push_str(text);
            }
        });
        content
    }

    /// Walk the parent chain up to the node that has no parent.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Physical position of a node among its parent's children.
    pub fn position_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute map of a node; empty when none was ever set.
    pub fn attrib(&self, id: NodeId) -> &Attributes {
        self.data(id).attributes.as_ref().unwrap_or(&*EMPTY_ATTRIBUTES)
    }

    /// Get attribute value by name
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&str> {
        self.data(id)
            .attributes
            .as_ref()
            .and_then(|attrs| attrs.get(key))
            .map(String::as_str)
    }

    /// Set an attribute, creating the attribute map on demand.
    pub fn set_attrib(
        &mut self,
        id: NodeId,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.data_mut(id)
            .attributes
            .get_or_insert_with(Attributes::new)
            .insert(key.into(), value.into());
        self
    }

    /// Remove an attribute; missing keys and missing maps are a no-op.
    pub fn delete_attrib(&mut self, id: NodeId, key: &str) -> &mut Self {
        if let Some(attrs) = self.data_mut(id).attributes.as_mut() {
            attrs.shift_remove(key);
        }
        self
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// First child whose tag equals `tag`.
    pub fn single(&self, id: NodeId, tag: &str) -> Result<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.name(child) == tag)
            .ok_or_else(|| Error::not_found(tag))
    }

    /// Repeated [`single`](Self::single), left to right.
    pub fn dig(&self, id: NodeId, path: &[&str]) -> Result<NodeId> {
        path.iter().try_fold(id, |current, tag| self.single(current, tag))
    }

    /// Every child whose tag equals `tag`, in document order.
    pub fn all(&self, id: NodeId, tag: &str) -> NodeSet<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.name(child) == tag)
            .collect()
    }

    /// Every child viewable through handle `H`, in document order.
    pub fn children_of<H: NodeHandle>(&self, id: NodeId) -> NodeSet<H> {
        self.children(id)
            .iter()
            .filter_map(|&child| self.cast::<H>(child))
            .collect()
    }

    /// Pre-order depth-first traversal, self before children.
    pub fn walk<F: FnMut(NodeId)>(&self, id: NodeId, mut visit: F) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            visit(current);
            stack.extend(self.children(current).iter().rev());
        }
    }

    // ------------------------------------------------------------------
    // Structural mutation
    // ------------------------------------------------------------------

    /// Drop every child of a node.
    pub fn clear(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.data_mut(id).children);
        for child in children {
            self.data_mut(child).parent = None;
        }
        self.touch();
    }

    /// Append a new empty element child and return it.
    pub fn add_node(&mut self, id: NodeId, tag: &str) -> NodeId {
        self.append(id, Item::element(tag))
    }

    /// Append a new text child and return it.
    pub fn add_text(&mut self, id: NodeId, value: &str) -> NodeId {
        self.append(id, Item::text(value))
    }

    /// Append a whole item subtree as the last child.
    pub fn append(&mut self, id: NodeId, item: Item) -> NodeId {
        let child = self.materialize(Some(id), item);
        self.data_mut(id).children.push(child);
        self.touch();
        child
    }

    /// Insert an item subtree at a physical position among the children.
    pub fn insert_child(&mut self, id: NodeId, position: usize, item: Item) -> Result<NodeId> {
        let len = self.children(id).len();
        if position > len {
            return Err(Error::StructuralInvariant(format!(
                "insert position {} past {} children of '{}'",
                position,
                len,
                self.name(id)
            )));
        }
        let child = self.materialize(Some(id), item);
        self.data_mut(id).children.insert(position, child);
        self.touch();
        Ok(child)
    }

    /// Detach the child at a physical position and return it.
    pub fn remove_child(&mut self, id: NodeId, position: usize) -> Result<NodeId> {
        let len = self.children(id).len();
        if position >= len {
            return Err(Error::StructuralInvariant(format!(
                "remove position {} past {} children of '{}'",
                position,
                len,
                self.name(id)
            )));
        }
        let child = self.data_mut(id).children.remove(position);
        self.data_mut(child).parent = None;
        self.touch();
        Ok(child)
    }

    /// Replace this node's content with a deep copy of `other`.
    ///
    /// The node keeps its id and its position among its parent's children;
    /// its tag, kind, attributes, text, and descendants become an unaliased
    /// copy of `other` as it was before the call.
    pub fn copy_contents_from(&mut self, id: NodeId, other: NodeId) -> Result<()> {
        if self.position_in_parent(id).is_none() {
            return Err(Error::StructuralInvariant(format!(
                "'{}' is not listed among its parent's children",
                self.name(id)
            )));
        }

        let Item {
            tag,
            attributes,
            text,
            children,
        } = self.to_item(other);

        let old_children = std::mem::take(&mut self.data_mut(id).children);
        for child in old_children {
            self.data_mut(child).parent = None;
        }

        let data = self.data_mut(id);
        data.kind = NodeKind::for_tag(&tag);
        data.name = tag;
        data.attributes = attributes;
        data.text = text;
        data.index_cache.set(None);

        let mut child_ids = Vec::with_capacity(children.len());
        for child in children {
            child_ids.push(self.materialize(Some(id), child));
        }
        self.data_mut(id).children = child_ids;
        self.touch();
        Ok(())
    }

    /// Replace the payload of a text node.
    pub(crate) fn set_text(&mut self, id: NodeId, value: &str) {
        self.data_mut(id).text = Some(value.to_string());
    }

    // ------------------------------------------------------------------
    // Dirty marking
    // ------------------------------------------------------------------

    /// Invalidate cached derived state of one node.
    ///
    /// Rows and cells drop their logical index; other kinds hold nothing.
    pub fn mark_as_dirty(&self, id: NodeId) {
        let data = self.data(id);
        if data.kind.has_logical_index() {
            data.index_cache.set(None);
        }
    }

    /// Mark a node and its whole subtree dirty.
    pub fn propagate_dirty(&self, id: NodeId) {
        self.walk(id, |node| self.mark_as_dirty(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> Document {
        Document::from_items(vec![
            Item::element("a")
                .with_child(Item::element("b").with_attribute("k", "1"))
                .with_child(Item::element("c").with_child(Item::text("x")))
                .with_child(Item::element("b").with_attribute("k", "2")),
        ])
    }

    /// Every child points back at its parent, recursively.
    fn assert_links(doc: &Document, id: NodeId) {
        for &child in doc.children(id) {
            assert_eq!(doc.parent(child), Some(id));
            assert_links(doc, child);
        }
    }

    #[test]
    fn test_root_is_nameless() {
        let doc = sample();
        assert_eq!(doc.name(doc.root()), "");
        assert_eq!(doc.kind(doc.root()), NodeKind::Document);
        assert_eq!(doc.parent(doc.root()), None);
    }

    #[test]
    fn test_single_and_dig() {
        let doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let b = doc.single(a, "b").unwrap();
        assert_eq!(doc.attribute(b, "k"), Some("1"));
        assert_eq!(doc.dig(doc.root(), &["a", "c", "#text"]).map(|t| doc.text(t)).unwrap(), Some("x"));
        assert!(matches!(
            doc.dig(doc.root(), &["a", "missing", "c"]),
            Err(Error::NotFound { tag }) if tag == "missing"
        ));
    }

    #[test]
    fn test_all_preserves_order() {
        let doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let bs = doc.all(a, "b");
        let values: Vec<_> = bs.iter().map(|b| doc.attribute(b, "k")).collect();
        assert_eq!(values, [Some("1"), Some("2")]);
    }

    #[test]
    fn test_walk_is_preorder() {
        let doc = sample();
        let mut names = Vec::new();
        doc.walk(doc.root(), |id| names.push(doc.name(id).to_string()));
        assert_eq!(names, ["", "a", "b", "c", "#text", "b"]);
    }

    #[test]
    fn test_attributes_created_lazily() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        assert!(doc.attrib(a).is_empty());

        doc.delete_attrib(a, "nothing");
        assert!(doc.attrib(a).is_empty());

        doc.set_attrib(a, "k", "v").set_attrib(a, "k", "w");
        assert_eq!(doc.attrib(a).len(), 1);
        assert_eq!(doc.attribute(a, "k"), Some("w"));

        doc.delete_attrib(a, "k");
        assert_eq!(doc.attribute(a, "k"), None);
    }

    #[test]
    fn test_add_and_clear() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let d = doc.add_node(a, "table:table-row");
        let t = doc.add_text(d, "hi");
        assert_eq!(doc.kind(d), NodeKind::Row);
        assert_eq!(doc.kind(t), NodeKind::Text);
        assert_eq!(doc.children(a).last(), Some(&d));
        assert_eq!(doc.to_item(a).children.len(), 4);

        doc.clear(a);
        assert!(doc.children(a).is_empty());
        assert_eq!(doc.parent(d), None);
        assert!(doc.to_item(a).children.is_empty());
    }

    #[test]
    fn test_copy_contents_from_is_deep() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let first_b = doc.children(a)[0];
        let c = doc.children(a)[1];
        let snapshot = doc.to_item(c);

        doc.copy_contents_from(first_b, c).unwrap();
        assert_eq!(doc.children(a)[0], first_b);
        assert_eq!(doc.to_item(first_b), snapshot);

        let source_text = doc.single(c, "#text").unwrap();
        doc.set_text(source_text, "changed");
        assert_eq!(doc.text_content(first_b), "x");
        assert_eq!(doc.text_content(c), "changed");
        assert_links(&doc, doc.root());
    }

    #[test]
    fn test_copy_contents_from_ancestor() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let c = doc.children(a)[1];
        let before = doc.to_item(a);

        doc.copy_contents_from(c, a).unwrap();
        assert_eq!(doc.to_item(c), before);
        assert_links(&doc, doc.root());
    }

    #[test]
    fn test_copy_contents_from_detached_node_fails() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let b = doc.children(a)[0];
        doc.remove_child(a, 0).unwrap();
        let before = doc.to_item(b);

        let result = doc.copy_contents_from(b, a);
        assert!(matches!(result, Err(Error::StructuralInvariant(_))));
        assert_eq!(doc.to_item(b), before);
        assert!(doc.copy_contents_from(doc.root(), a).is_err());
    }

    #[test]
    fn test_view_checks_kind() {
        let doc = Document::from_items(vec![Item::element("table:table-row")]);
        let row = doc.children(doc.root())[0];
        assert!(doc.view::<crate::odf::ods::Row>(row).is_ok());
        assert!(matches!(
            doc.view::<crate::odf::ods::Cell>(row),
            Err(Error::InvalidNode(_))
        ));
    }

    #[test]
    fn test_root_of() {
        let doc = sample();
        let text = doc.dig(doc.root(), &["a", "c", "#text"]).unwrap();
        assert_eq!(doc.root_of(text), doc.root());
    }

    #[test]
    fn test_insert_and_remove_child_bounds() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let before = doc.to_item(a);
        assert!(doc.insert_child(a, 4, Item::element("z")).is_err());
        assert!(doc.remove_child(a, 3).is_err());
        assert_eq!(doc.to_item(a), before);

        let z = doc.insert_child(a, 0, Item::element("z")).unwrap();
        assert_eq!(doc.position_in_parent(z), Some(0));
        assert_eq!(doc.remove_child(a, 0).unwrap(), z);
        assert_eq!(doc.to_item(a), before);
    }

    #[test]
    fn test_structural_mutations_bump_generation() {
        let mut doc = sample();
        let a = doc.single(doc.root(), "a").unwrap();
        let g = doc.generation();
        doc.set_attrib(a, "k", "v");
        assert_eq!(doc.generation(), g);
        doc.add_node(a, "b");
        assert!(doc.generation() > g);
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddNode(usize, bool),
        AddText(usize),
        Insert(usize, usize),
        Remove(usize, usize),
        Clear(usize),
        Copy(usize, usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (any::<usize>(), any::<bool>()).prop_map(|(n, row)| Op::AddNode(n, row)),
            any::<usize>().prop_map(Op::AddText),
            (any::<usize>(), any::<usize>()).prop_map(|(n, p)| Op::Insert(n, p)),
            (any::<usize>(), any::<usize>()).prop_map(|(n, p)| Op::Remove(n, p)),
            any::<usize>().prop_map(Op::Clear),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Copy(a, b)),
        ]
    }

    /// Nodes currently reachable from the root.
    fn attached(doc: &Document) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        doc.walk(doc.root(), |id| nodes.push(id));
        nodes
    }

    proptest! {
        #[test]
        fn prop_children_match_items(ops in proptest::collection::vec(op(), 0..40)) {
            let mut doc = sample();
            for op in ops {
                let nodes = attached(&doc);
                let pick = |n: usize| nodes[n % nodes.len()];
                match op {
                    Op::AddNode(n, row) => {
                        doc.add_node(pick(n), if row { "table:table-row" } else { "x" });
                    },
                    Op::AddText(n) => {
                        doc.add_text(pick(n), "t");
                    },
                    Op::Insert(n, p) => {
                        let id = pick(n);
                        let len = doc.children(id).len();
                        doc.insert_child(id, p % (len + 1), Item::element("i")).unwrap();
                    },
                    Op::Remove(n, p) => {
                        let id = pick(n);
                        let len = doc.children(id).len();
                        if len > 0 {
                            doc.remove_child(id, p % len).unwrap();
                        }
                    },
                    Op::Clear(n) => doc.clear(pick(n)),
                    Op::Copy(a, b) => {
                        let target = pick(a);
                        let source = pick(b);
                        if target != doc.root() && doc.to_item(source).subtree_len() < 64 {
                            doc.copy_contents_from(target, source).unwrap();
                        }
                    },
                }

                assert_links(&doc, doc.root());
                for id in attached(&doc) {
                    let item = doc.to_item(id);
                    prop_assert_eq!(item.children.len(), doc.children(id).len());
                    for (child_item, &child) in item.children.iter().zip(doc.children(id)) {
                        prop_assert_eq!(&child_item.tag, doc.name(child));
                        prop_assert_eq!(doc.kind(child), NodeKind::for_tag(&child_item.tag));
                    }
                }
            }
        }
    }
}
