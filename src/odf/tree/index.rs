//! Lazy logical indexing of repeat-compressed rows and cells.
//!
//! A row or cell may stand for several identical siblings through its
//! repeat-count attribute. Its logical index is the sum of the repeat counts
//! of the preceding siblings of the same kind. Indices are computed for all
//! siblings in one pass on first read and cached together with the document
//! generation; any structural mutation bumps the generation, which makes
//! every cached index stale at once.

use super::{Document, NodeId, NodeKind};
use crate::odf::constants::{COLUMNS_REPEATED, ROWS_REPEATED};
use log::{trace, warn};

/// A logical index and the generation it was computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndexCache {
    generation: u64,
    index: usize,
}

impl Document {
    /// Number of logical rows/columns a node stands for (default 1).
    ///
    /// Malformed or zero counts are treated as 1.
    pub fn repeat_count(&self, id: NodeId) -> usize {
        let attr = match self.kind(id) {
            NodeKind::Row => ROWS_REPEATED,
            NodeKind::Cell => COLUMNS_REPEATED,
            _ => return 1,
        };
        match self.attribute(id, attr) {
            None => 1,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => {
                    warn!("ignoring malformed {}=\"{}\"", attr, raw);
                    1
                },
            },
        }
    }

    /// Logical index of a row or cell among its siblings of the same kind.
    ///
    /// Detached nodes and nodes of other kinds report 0.
    pub fn logical_index(&self, id: NodeId) -> usize {
        let data = self.data(id);
        if !data.kind.has_logical_index() {
            return 0;
        }
        if let Some(cache) = data.index_cache.get()
            && cache.generation == self.generation
        {
            return cache.index;
        }

        let Some(parent) = data.parent else {
            return 0;
        };
        self.reindex_children(parent, data.kind);
        self.data(id)
            .index_cache
            .get()
            .map(|cache| cache.index)
            .unwrap_or(0)
    }

    /// Assign running logical indices to every child of `kind`.
    fn reindex_children(&self, parent: NodeId, kind: NodeKind) {
        let mut next = 0;
        for &child in self.children(parent) {
            let data = self.data(child);
            if data.kind != kind {
                continue;
            }
            data.index_cache.set(Some(IndexCache {
                generation: self.generation,
                index: next,
            }));
            next += self.repeat_count(child);
        }
        trace!(
            "reindexed {:?} children of '{}' (span {})",
            kind,
            self.name(parent),
            next
        );
    }

    /// Physical child whose logical span covers `logical`.
    pub(crate) fn child_covering(&self, parent: NodeId, kind: NodeKind, logical: usize) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&child| {
            if self.kind(child) != kind {
                return false;
            }
            let start = self.logical_index(child);
            start <= logical && logical < start + self.repeat_count(child)
        })
    }
}
