//! Erasure and relinking of existing nodes: flatten, reparent, wrap, moves
//! and swaps. Nothing here copies a value.

use tracing::instrument;

use crate::cursor::{Cursor, Sibling};
use crate::links::Anchor;
use crate::node::NodeId;
use crate::tree::Tree;

impl<T> Tree<T> {
    /// Removes `position` with its subtree; returns the node that followed
    /// the subtree in pre-order.
    #[instrument(level = "trace", skip(self))]
    pub fn erase(&mut self, position: NodeId) -> Option<NodeId> {
        let next = self.subtree_end(position);
        self.unlink(position);
        self.free_subtree(position);
        next
    }

    pub fn erase_children(&mut self, position: NodeId) {
        while let Some(child) = self.first_child(position) {
            self.erase(child);
        }
    }

    /// Erases every sibling after `position`.
    pub fn erase_right_siblings(&mut self, position: NodeId) {
        while let Some(next) = self.next_sibling(position) {
            self.erase(next);
        }
    }

    /// Erases every sibling before `position`.
    pub fn erase_left_siblings(&mut self, position: NodeId) {
        while let Some(prev) = self.prev_sibling(position) {
            self.erase(prev);
        }
    }

    /// Promotes the children of `position` to be its following siblings.
    #[instrument(level = "trace", skip(self))]
    pub fn flatten(&mut self, position: NodeId) {
        let mut anchor = position;
        while let Some(child) = self.first_child(position) {
            self.relocate(child, Anchor::After(anchor));
            anchor = child;
        }
    }

    /// Moves the range `[begin, end)` below `position`, after its current
    /// children; returns the first node moved.
    ///
    /// # Panics
    /// If `position` lies inside one of the moved subtrees.
    #[instrument(level = "trace", skip(self))]
    pub fn reparent(&mut self, position: NodeId, begin: &Sibling, end: &Sibling) -> Option<NodeId> {
        let moved = self.range_ids(begin, end);
        for &id in &moved {
            self.relocate(id, Anchor::LastChildOf(Some(position)));
        }
        moved.first().copied()
    }

    /// Moves every child of `from` below `position`.
    pub fn reparent_children(&mut self, position: NodeId, from: NodeId) -> Option<NodeId> {
        let begin = self.begin_children(from);
        let end = self.end_children(from);
        self.reparent(position, &begin, &end)
    }

    /// Puts a new node holding `value` where `position` is and moves
    /// `position` below it.
    pub fn wrap(&mut self, position: NodeId, value: T) -> NodeId {
        let wrapper = self.insert_before(position, value);
        self.relocate(position, Anchor::LastChildOf(Some(wrapper)));
        wrapper
    }

    /// Puts a new node holding `value` before `begin` and moves the range
    /// `[begin, end)` below it.
    pub fn wrap_range(&mut self, begin: NodeId, end: &Sibling, value: T) -> NodeId {
        let first = Sibling::at(self, begin);
        let moved = self.range_ids(&first, end);
        let wrapper = self.insert_before(begin, value);
        for id in moved {
            self.relocate(id, Anchor::LastChildOf(Some(wrapper)));
        }
        wrapper
    }

    /// Makes `source` the next sibling of `target`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_after(&mut self, target: NodeId, source: NodeId) -> NodeId {
        if target != source && self.next_sibling(target) != Some(source) {
            self.relocate(source, Anchor::After(target));
        }
        source
    }

    /// Makes `source` the previous sibling of `target`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_before(&mut self, target: NodeId, source: NodeId) -> NodeId {
        if target != source && self.prev_sibling(target) != Some(source) {
            self.relocate(source, Anchor::Before(target));
        }
        source
    }

    /// Moves `source` before a sibling cursor; at a band end it becomes the
    /// band's last node.
    pub fn move_before_sibling(&mut self, target: &Sibling, source: NodeId) -> NodeId {
        match target.node() {
            Some(node) => self.move_before(node, source),
            None => {
                if self.band_last(target.parent()) != Some(source) {
                    self.relocate(source, Anchor::LastChildOf(target.parent()));
                }
                source
            }
        }
    }

    /// Moves `source` into the place of `target`, erasing `target` and its
    /// subtree.
    ///
    /// # Panics
    /// If `source` lies inside the subtree of `target`.
    #[instrument(level = "trace", skip(self))]
    pub fn move_ontop(&mut self, target: NodeId, source: NodeId) -> NodeId {
        if target == source {
            return source;
        }
        assert!(
            !self.is_in_subtree(source, target),
            "rstree: move_ontop source {source:?} lies below target {target:?}"
        );
        self.move_before(target, source);
        self.erase(target);
        source
    }

    /// Exchanges `position` with its next sibling; no-op on the band's last node.
    pub fn swap_next(&mut self, position: NodeId) {
        if let Some(next) = self.next_sibling(position) {
            self.unlink_raw(next);
            self.link_raw(next, Anchor::Before(position));
            self.checkpoint();
        }
    }

    /// Exchanges the positions of two nodes together with their subtrees.
    /// Both ids keep designating the same logical nodes.
    ///
    /// # Panics
    /// If one node is an ancestor of the other.
    #[instrument(level = "trace", skip(self))]
    pub fn swap(&mut self, one: NodeId, two: NodeId) {
        if one == two {
            return;
        }
        if self.next_sibling(one) == Some(two) {
            return self.swap_next(one);
        }
        if self.next_sibling(two) == Some(one) {
            return self.swap_next(two);
        }
        assert!(
            !self.is_in_subtree(one, two) && !self.is_in_subtree(two, one),
            "rstree: cannot swap a node with its ancestor"
        );
        let at_one = self.anchor_of(one);
        let at_two = self.anchor_of(two);
        self.unlink(one);
        self.unlink(two);
        self.link(two, at_one);
        self.link(one, at_two);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> (Tree<&'static str>, NodeId, [NodeId; 3]) {
        let mut tree = Tree::with_root("r");
        let r = tree.first_root().unwrap();
        let a = tree.append_child(r, "a");
        let b = tree.append_child(r, "b");
        let c = tree.append_child(r, "c");
        (tree, r, [a, b, c])
    }

    fn values(tree: &Tree<&'static str>) -> Vec<&'static str> {
        tree.values().copied().collect()
    }

    #[test]
    fn test_erase_returns_pre_order_successor() {
        let (mut tree, r, [a, b, _]) = abc();
        tree.append_child(a, "a1");
        assert_eq!(tree.erase(a), Some(b));
        assert_eq!(tree.erase(r), None);
        assert!(tree.is_empty());
        assert_eq!(tree.size(), 0);
    }

    #[test]
    fn test_flatten_promotes_children_in_order() {
        let (mut tree, _, [a, _, _]) = abc();
        tree.append_child(a, "a1");
        tree.append_child(a, "a2");
        tree.flatten(a);
        assert_eq!(values(&tree), vec!["r", "a", "a1", "a2", "b", "c"]);
        assert_eq!(tree.number_of_children(a), 0);
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_wrap_moves_node_below_new_parent() {
        let (mut tree, r, [_, b, _]) = abc();
        let w = tree.wrap(b, "w");
        assert_eq!(tree.parent(b), Some(w));
        assert_eq!(tree.parent(w), Some(r));
        assert_eq!(values(&tree), vec!["r", "a", "w", "b", "c"]);
    }

    #[test]
    fn test_wrap_range() {
        let (mut tree, r, [a, _, c]) = abc();
        let end = tree.sibling_at(c);
        let w = tree.wrap_range(a, &end, "w");
        assert_eq!(tree.number_of_children(w), 2);
        assert_eq!(tree.number_of_children(r), 2);
        assert_eq!(values(&tree), vec!["r", "w", "a", "b", "c"]);
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_moves_are_noops_when_already_in_place() {
        let (mut tree, _, [a, b, c]) = abc();
        tree.move_after(a, b);
        tree.move_before(c, b);
        assert_eq!(values(&tree), vec!["r", "a", "b", "c"]);
        tree.move_after(c, a);
        assert_eq!(values(&tree), vec!["r", "b", "c", "a"]);
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_move_ontop_replaces_target() {
        let (mut tree, _, [a, _, c]) = abc();
        tree.append_child(a, "a1");
        tree.move_ontop(a, c);
        assert_eq!(values(&tree), vec!["r", "c", "b"]);
        assert!(!tree.contains(a));
        assert_eq!(tree.size(), 3);
    }

    #[test]
    fn test_swap_keeps_identity() {
        let (mut tree, _, [a, b, c]) = abc();
        let a1 = tree.append_child(a, "a1");
        tree.swap(a, c);
        assert_eq!(values(&tree), vec!["r", "c", "b", "a", "a1"]);
        assert_eq!(tree.parent(a1), Some(a));
        tree.swap(b, c);
        assert_eq!(values(&tree), vec!["r", "b", "c", "a", "a1"]);
        tree.debug_verify_consistency();
    }

    #[test]
    #[should_panic(expected = "below its own subtree")]
    fn test_reparent_into_own_subtree_panics() {
        let (mut tree, _, [a, _, _]) = abc();
        let a1 = tree.append_child(a, "a1");
        let begin = tree.begin_roots();
        let end = tree.end_roots();
        tree.reparent(a1, &begin, &end);
    }
}
