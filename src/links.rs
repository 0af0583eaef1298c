//! Splice primitives shared by every structural mutation.
//!
//! `link`/`unlink` are the only places that rewrite parent and sibling links
//! while a node changes its parent; bookkeeping deltas are applied there.
//! The `_raw` variants skip counter maintenance and are reserved for
//! reorders inside one band, which leave every counter unchanged.
//!
//! A detached root belongs to no band: it can neither be unlinked nor serve
//! as a sibling anchor until it is attached again.

use crate::node::{Node, NodeId};
use crate::tree::Tree;

/// Where an unlinked node is to be linked.
///
/// `None` as a parent designates the top-level band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Before(NodeId),
    After(NodeId),
    FirstChildOf(Option<NodeId>),
    LastChildOf(Option<NodeId>),
}

impl<T> Tree<T> {
    /// Allocates an unlinked node carrying the tree's flags for new nodes.
    pub(crate) fn alloc(&mut self, value: T) -> NodeId {
        #[allow(unused_mut)]
        let mut node = Node::unlinked(value);
        #[cfg(feature = "bookkeeping")]
        {
            node.stats.expanded = self.settings.expand_new;
        }
        self.insert_node(node)
    }

    pub(crate) fn insert_node(&mut self, node: Node<T>) -> NodeId {
        NodeId::new(self.tag, self.arena.insert(node))
    }

    fn assert_in_band(&self, id: NodeId) {
        assert!(
            !self.detached.contains(&id),
            "rstree: {id:?} is the root of a detached subtree"
        );
    }

    pub(crate) fn set_band_first(&mut self, parent: Option<NodeId>, first: Option<NodeId>) {
        match parent {
            Some(p) => self.node_mut(p).first_child = first,
            None => self.first_root = first,
        }
    }

    pub(crate) fn set_band_last(&mut self, parent: Option<NodeId>, last: Option<NodeId>) {
        match parent {
            Some(p) => self.node_mut(p).last_child = last,
            None => self.last_root = last,
        }
    }

    /// Links the unlinked node `id` at `at` without touching counters.
    pub(crate) fn link_raw(&mut self, id: NodeId, at: Anchor) {
        let (parent, prev, next) = match at {
            Anchor::Before(target) => {
                let t = self.node(target);
                if t.parent.is_none() {
                    self.assert_in_band(target);
                }
                (t.parent, t.prev_sibling, Some(target))
            }
            Anchor::After(target) => {
                let t = self.node(target);
                if t.parent.is_none() {
                    self.assert_in_band(target);
                }
                (t.parent, Some(target), t.next_sibling)
            }
            Anchor::FirstChildOf(parent) => (parent, None, self.band_first(parent)),
            Anchor::LastChildOf(parent) => (parent, self.band_last(parent), None),
        };
        if let Some(p) = parent {
            assert!(
                !self.is_in_subtree(p, id),
                "rstree: cannot link {id:?} below its own subtree"
            );
        }

        let node = self.node_mut(id);
        node.parent = parent;
        node.prev_sibling = prev;
        node.next_sibling = next;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = Some(id),
            None => self.set_band_first(parent, Some(id)),
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = Some(id),
            None => self.set_band_last(parent, Some(id)),
        }
    }

    /// Detaches `id` (with its subtree) from its band without touching counters.
    pub(crate) fn unlink_raw(&mut self, id: NodeId) {
        let node = self.node(id);
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if parent.is_none() {
            self.assert_in_band(id);
        }

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.set_band_first(parent, next),
        }
        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.set_band_last(parent, prev),
        }

        let node = self.node_mut(id);
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    pub(crate) fn link(&mut self, id: NodeId, at: Anchor) {
        self.link_raw(id, at);
        #[cfg(feature = "bookkeeping")]
        {
            let delta = self.contribution(id);
            let parent = self.node(id).parent;
            self.propagate(parent, delta);
        }
        self.checkpoint();
    }

    /// Unlinks `id` and links it again at `at`.
    pub(crate) fn relocate(&mut self, id: NodeId, at: Anchor) {
        self.unlink(id);
        self.link(id, at);
    }

    pub(crate) fn unlink(&mut self, id: NodeId) {
        #[cfg(feature = "bookkeeping")]
        {
            let delta = self.contribution(id).negate();
            let parent = self.node(id).parent;
            self.propagate(parent, delta);
        }
        self.unlink_raw(id);
        self.checkpoint();
    }

    /// Frees an unlinked subtree, children before their parent.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![(id, false)];
        while let Some((cur, visited)) = stack.pop() {
            if visited {
                self.arena.remove(cur.index);
                continue;
            }
            stack.push((cur, true));
            let mut child = self.node(cur).first_child;
            while let Some(c) = child {
                stack.push((c, false));
                child = self.node(c).next_sibling;
            }
        }
    }

    /// Deep-copies the subtree at `from` in `source` and links the copy at `at`.
    ///
    /// The copy is assembled unlinked, carrying the source's flags and
    /// counters, so linking it costs one propagation.
    pub(crate) fn graft(&mut self, source: &Tree<T>, from: NodeId, at: Anchor) -> NodeId
    where
        T: Clone,
    {
        let top = self.alloc_copy(source, from);
        let mut stack = vec![(from, top)];
        while let Some((src, dst)) = stack.pop() {
            let mut child = source.node(src).first_child;
            while let Some(c) = child {
                let copy = self.alloc_copy(source, c);
                self.link_raw(copy, Anchor::LastChildOf(Some(dst)));
                stack.push((c, copy));
                child = source.node(c).next_sibling;
            }
        }
        self.link(top, at);
        top
    }

    fn alloc_copy(&mut self, source: &Tree<T>, from: NodeId) -> NodeId
    where
        T: Clone,
    {
        let original = source.node(from);
        #[allow(unused_mut)]
        let mut node = Node::unlinked(original.data.clone());
        #[cfg(feature = "bookkeeping")]
        {
            node.stats = original.stats;
        }
        self.insert_node(node)
    }
}
