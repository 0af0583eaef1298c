//! Structural equality between trees, ranges and subtrees.

use crate::cursor::{Cursor, PreOrder};
use crate::node::NodeId;
use crate::tree::Tree;

impl<T> Tree<T> {
    /// Compares the pre-order range `[begin, end)` of this tree with the
    /// nodes of `other` starting at `other_begin`.
    ///
    /// Values must match under `eq` and corresponding nodes must have the
    /// same number of children. Comparison stops early (and succeeds) when
    /// `other` runs out of nodes.
    pub fn equal_by<U, F>(
        &self,
        mut begin: PreOrder,
        end: &PreOrder,
        other: &Tree<U>,
        mut other_begin: PreOrder,
        mut eq: F,
    ) -> bool
    where
        F: FnMut(&T, &U) -> bool,
    {
        while begin != *end {
            let (Some(one), Some(two)) = (begin.node(), other_begin.node()) else {
                break;
            };
            if !eq(&self[one], &other[two]) {
                return false;
            }
            if self.number_of_children(one) != other.number_of_children(two) {
                return false;
            }
            begin.advance(self);
            other_begin.advance(other);
        }
        true
    }

    /// True when the subtrees at `one` and at `two` in `other` have the
    /// same shape and pairwise equal values.
    pub fn equal_subtree_by<U, F>(&self, one: NodeId, other: &Tree<U>, two: NodeId, mut eq: F) -> bool
    where
        F: FnMut(&T, &U) -> bool,
    {
        if !eq(&self[one], &other[two]) || self.number_of_children(one) != other.number_of_children(two) {
            return false;
        }
        self.pre_order_from(one)
            .zip(other.pre_order_from(two))
            .skip(1)
            .all(|((a, x), (b, y))| eq(x, y) && self.number_of_children(a) == other.number_of_children(b))
    }
}

impl<T: PartialEq> Tree<T> {
    pub fn equal(&self, begin: PreOrder, end: &PreOrder, other: &Tree<T>, other_begin: PreOrder) -> bool {
        self.equal_by(begin, end, other, other_begin, T::eq)
    }

    pub fn equal_subtree(&self, one: NodeId, other: &Tree<T>, two: NodeId) -> bool {
        self.equal_subtree_by(one, other, two, T::eq)
    }
}

impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size() && self.equal(self.begin(), &self.end(), other, other.begin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(shape: &[(&'static str, Option<usize>)]) -> (Tree<&'static str>, Vec<NodeId>) {
        let mut tree = Tree::new();
        let mut ids = Vec::new();
        for &(value, parent) in shape {
            let id = match parent {
                Some(p) => tree.append_child(ids[p], value),
                None => tree.push_root(value),
            };
            ids.push(id);
        }
        (tree, ids)
    }

    #[test]
    fn test_equal_trees() {
        let shape = [("r", None), ("a", Some(0)), ("b", Some(0))];
        let (one, _) = build(&shape);
        let (two, _) = build(&shape);
        assert_eq!(one, two);
    }

    #[test]
    fn test_shape_matters() {
        let (flat, _) = build(&[("r", None), ("a", Some(0)), ("b", Some(0))]);
        let (deep, _) = build(&[("r", None), ("a", Some(0)), ("b", Some(1))]);
        assert_ne!(flat, deep);
    }

    #[test]
    fn test_equal_subtree_with_comparator() {
        let (one, ids) = build(&[("r", None), ("A", Some(0)), ("x", Some(1))]);
        let (two, other) = build(&[("q", None), ("a", Some(0)), ("X", Some(1))]);
        assert!(!one.equal_subtree(ids[1], &two, other[1]));
        assert!(one.equal_subtree_by(ids[1], &two, other[1], |a, b| a.eq_ignore_ascii_case(b)));
        assert!(one.equal_subtree(ids[0], &one, ids[0]));
    }
}
