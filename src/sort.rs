use std::cmp::Ordering;

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cursor::{Cursor, Sibling};
use crate::links::Anchor;
use crate::node::NodeId;
use crate::tree::Tree;

impl<T> Tree<T> {
    /// Stable sort of the sibling range `[begin, end)` by `cmp`.
    ///
    /// Nodes keep their children; only the order inside the band changes.
    /// With `deep`, the children of every sorted node are sorted as well.
    #[instrument(level = "trace", skip(self, cmp))]
    pub fn sort_siblings_by<F>(&mut self, begin: &Sibling, end: &Sibling, deep: bool, mut cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut bands = vec![(self.range_ids(begin, end), end.node(), end.parent())];
        let mut sorted_bands = 0usize;
        while let Some((ids, stop, parent)) = bands.pop() {
            let sorted: Vec<NodeId> = ids
                .iter()
                .copied()
                .sorted_by(|&a, &b| cmp(&self[a], &self[b]))
                .collect();
            if sorted != ids {
                self.rewire(&sorted, stop, parent);
            }
            sorted_bands += 1;
            if deep {
                for id in sorted {
                    if self.has_children(id) {
                        bands.push((self.band(Some(id)).collect(), None, Some(id)));
                    }
                }
            }
        }
        debug!(bands = sorted_bands, deep, "sorted siblings");
    }

    /// Relinks `sorted` in order right before `stop` (the band end when `None`).
    fn rewire(&mut self, sorted: &[NodeId], stop: Option<NodeId>, parent: Option<NodeId>) {
        for &id in sorted {
            self.unlink_raw(id);
            let at = match stop {
                Some(next) => Anchor::Before(next),
                None => Anchor::LastChildOf(parent),
            };
            self.link_raw(id, at);
        }
        self.checkpoint();
    }

    /// Sorts the children of `id`.
    pub fn sort_children_by<F>(&mut self, id: NodeId, deep: bool, cmp: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let begin = self.begin_children(id);
        let end = self.end_children(id);
        self.sort_siblings_by(&begin, &end, deep, cmp);
    }
}

impl<T: Ord> Tree<T> {
    /// Stable sort of `[begin, end)` in the natural order of the values.
    pub fn sort_siblings(&mut self, begin: &Sibling, end: &Sibling, deep: bool) {
        self.sort_siblings_by(begin, end, deep, T::cmp);
    }

    pub fn sort_children(&mut self, id: NodeId, deep: bool) {
        self.sort_children_by(id, deep, T::cmp);
    }

    /// Sorts the top level, and with `deep` every level below it.
    pub fn sort_roots(&mut self, deep: bool) {
        let begin = self.begin_roots();
        let end = self.end_roots();
        self.sort_siblings(&begin, &end, deep);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tree: &Tree<&'static str>) -> Vec<&'static str> {
        tree.values().copied().collect()
    }

    fn sample() -> (Tree<&'static str>, NodeId) {
        let mut tree = Tree::with_root("r");
        let r = tree.first_root().unwrap();
        let c = tree.append_child(r, "c");
        tree.append_child(c, "z");
        tree.append_child(c, "y");
        tree.append_child(r, "a");
        tree.append_child(r, "b");
        (tree, r)
    }

    #[test]
    fn test_shallow_sort_keeps_children() {
        let (mut tree, r) = sample();
        tree.sort_children(r, false);
        assert_eq!(values(&tree), vec!["r", "a", "b", "c", "z", "y"]);
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_deep_sort() {
        let (mut tree, r) = sample();
        tree.sort_children(r, true);
        assert_eq!(values(&tree), vec!["r", "a", "b", "c", "y", "z"]);
    }

    #[test]
    fn test_partial_range_repairs_boundaries() {
        let mut tree = Tree::with_root("r");
        let r = tree.first_root().unwrap();
        let first = tree.append_child(r, "m");
        let d = tree.append_child(r, "d");
        tree.append_child(r, "c");
        let last = tree.append_child(r, "a");
        let begin = tree.sibling_at(d);
        let end = tree.sibling_at(last);
        tree.sort_siblings(&begin, &end, false);
        assert_eq!(values(&tree), vec!["r", "m", "c", "d", "a"]);
        assert_eq!(tree.first_child(r), Some(first));
        assert_eq!(tree.last_child(r), Some(last));
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_sort_is_stable() {
        let mut tree: Tree<(u8, char)> = Tree::new();
        for item in [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')] {
            tree.push_root(item);
        }
        let begin = tree.begin_roots();
        let end = tree.end_roots();
        tree.sort_siblings_by(&begin, &end, false, |x, y| x.0.cmp(&y.0));
        let order: String = tree.values().map(|v| v.1).collect();
        assert_eq!(order, "bdac");
    }
}
