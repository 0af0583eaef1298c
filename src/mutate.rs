//! Insertion and replacement.

use tracing::instrument;

use crate::cursor::Sibling;
use crate::links::Anchor;
use crate::node::NodeId;
use crate::tree::Tree;

impl<T> Tree<T> {
    /// Makes `value` the root of an empty tree.
    ///
    /// # Panics
    /// If the tree already has a root.
    pub fn set_root(&mut self, value: T) -> NodeId {
        assert!(self.is_empty(), "rstree: set_root on a non-empty tree");
        self.push_root(value)
    }

    /// Appends `value` to the top-level band.
    pub fn push_root(&mut self, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link(id, Anchor::LastChildOf(None));
        id
    }

    /// New previous sibling of `position`.
    pub fn insert_before(&mut self, position: NodeId, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link(id, Anchor::Before(position));
        id
    }

    /// New node right before a sibling cursor; at a band end it becomes the
    /// band's last node.
    pub fn insert_before_sibling(&mut self, position: &Sibling, value: T) -> NodeId {
        let at = self.anchor_before(position);
        let id = self.alloc(value);
        self.link(id, at);
        id
    }

    /// New next sibling of `position`.
    pub fn insert_after(&mut self, position: NodeId, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link(id, Anchor::After(position));
        id
    }

    pub fn append_child(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link(id, Anchor::LastChildOf(Some(parent)));
        id
    }

    pub fn prepend_child(&mut self, parent: NodeId, value: T) -> NodeId {
        let id = self.alloc(value);
        self.link(id, Anchor::FirstChildOf(Some(parent)));
        id
    }

    /// Swaps the stored value in place; children are untouched.
    pub fn replace_value(&mut self, position: NodeId, value: T) -> T {
        std::mem::replace(&mut self.node_mut(position).data, value)
    }
}

impl<T: Clone> Tree<T> {
    /// Copy of the subtree at `from` in `source`, inserted before `position`.
    #[instrument(level = "trace", skip(self, source))]
    pub fn insert_subtree(&mut self, position: NodeId, source: &Tree<T>, from: NodeId) -> NodeId {
        self.graft(source, from, Anchor::Before(position))
    }

    #[instrument(level = "trace", skip(self, source))]
    pub fn insert_subtree_after(&mut self, position: NodeId, source: &Tree<T>, from: NodeId) -> NodeId {
        self.graft(source, from, Anchor::After(position))
    }

    pub fn insert_subtree_before_sibling(&mut self, position: &Sibling, source: &Tree<T>, from: NodeId) -> NodeId {
        let at = self.anchor_before(position);
        self.graft(source, from, at)
    }

    pub fn append_subtree(&mut self, parent: NodeId, source: &Tree<T>, from: NodeId) -> NodeId {
        self.graft(source, from, Anchor::LastChildOf(Some(parent)))
    }

    pub fn prepend_subtree(&mut self, parent: NodeId, source: &Tree<T>, from: NodeId) -> NodeId {
        self.graft(source, from, Anchor::FirstChildOf(Some(parent)))
    }

    /// Copies the source range `[begin, end)` as the last children of
    /// `parent`; returns the last node added.
    pub fn append_children(
        &mut self,
        parent: NodeId,
        source: &Tree<T>,
        begin: &Sibling,
        end: &Sibling,
    ) -> Option<NodeId> {
        source
            .range_ids(begin, end)
            .into_iter()
            .map(|from| self.append_subtree(parent, source, from))
            .last()
    }

    /// Copies the source range `[begin, end)` as the first children of
    /// `parent`, keeping its order; returns the first node added.
    pub fn prepend_children(
        &mut self,
        parent: NodeId,
        source: &Tree<T>,
        begin: &Sibling,
        end: &Sibling,
    ) -> Option<NodeId> {
        let mut first = None;
        let mut previous: Option<NodeId> = None;
        for from in source.range_ids(begin, end) {
            let at = match previous {
                Some(p) => Anchor::After(p),
                None => Anchor::FirstChildOf(Some(parent)),
            };
            let id = self.graft(source, from, at);
            first.get_or_insert(id);
            previous = Some(id);
        }
        first
    }

    /// Turns `position` into a copy of the subtree at `from`: the node keeps
    /// its identity, takes the source value and receives copies of the
    /// source's descendants in place of its own children.
    #[instrument(level = "trace", skip(self, source))]
    pub fn replace_with_subtree(&mut self, position: NodeId, source: &Tree<T>, from: NodeId) -> NodeId {
        self.erase_children(position);
        self.node_mut(position).data = source[from].clone();
        let mut child = source.first_child(from);
        while let Some(c) = child {
            self.graft(source, c, Anchor::LastChildOf(Some(position)));
            child = source.next_sibling(c);
        }
        position
    }

    /// Replaces the range `[orig_begin, orig_end)` by copies of the source
    /// range `[new_begin, new_end)`; returns the first copy.
    #[instrument(level = "debug", skip_all)]
    pub fn replace_range(
        &mut self,
        orig_begin: &Sibling,
        orig_end: &Sibling,
        source: &Tree<T>,
        new_begin: &Sibling,
        new_end: &Sibling,
    ) -> Option<NodeId> {
        let originals = self.range_ids(orig_begin, orig_end);
        let at = self.anchor_before(orig_begin);
        let mut first = None;
        let mut previous: Option<NodeId> = None;
        for from in source.range_ids(new_begin, new_end) {
            let anchor = previous.map_or(at, Anchor::After);
            let id = self.graft(source, from, anchor);
            first.get_or_insert(id);
            previous = Some(id);
        }
        for original in originals {
            self.erase(original);
        }
        first
    }
}
