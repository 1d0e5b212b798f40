//! Text leaves.

use crate::odf::tree::{Document, NodeHandle, node_handle};

node_handle! {
    /// A text run inside an element
    TextNode => Text
}

impl TextNode {
    pub fn text(self, doc: &Document) -> &str {
        doc.text(self.id()).unwrap_or_default()
    }

    pub fn set_text(self, doc: &mut Document, value: &str) {
        doc.set_text(self.id(), value);
    }
}
