use generational_arena::Arena;
use std::collections::HashSet;
use std::ops::{Index, IndexMut};
use tracing::{debug, instrument};

#[cfg(feature = "bookkeeping")]
use crate::bookkeeping::{selection::Selection, Totals};
use crate::config::TreeSettings;
use crate::cursor::{BidiCursor, Cursor, Sibling};
use crate::errors::{TreeError, TreeResult};
use crate::links::Anchor;
use crate::node::{Node, NodeId, TreeTag};

/// Ordered n-ary tree owning values of type `T`.
///
/// Nodes live in a generational arena and refer to each other through
/// [`NodeId`]s. The top level is an ordinary sibling chain delimited by
/// `first_root`/`last_root`; a tree may hold any number of roots.
///
/// Subtrees taken off the top level with [`Tree::move_out`] stay in the
/// arena, parked under their own root, until they are moved back in.
///
/// Operations that receive a `NodeId` which does not belong to this tree (or
/// was freed) panic: that is a caller bug, not a recoverable condition.
#[derive(Debug)]
pub struct Tree<T> {
    pub(crate) tag: TreeTag,
    pub(crate) arena: Arena<Node<T>>,
    /// Roots of detached subtrees.
    pub(crate) detached: HashSet<NodeId>,
    pub(crate) first_root: Option<NodeId>,
    pub(crate) last_root: Option<NodeId>,
    pub(crate) settings: TreeSettings,
    #[cfg(feature = "bookkeeping")]
    pub(crate) totals: Totals,
    #[cfg(feature = "bookkeeping")]
    pub(crate) selection: Selection,
}

fn reject(tag: TreeTag, id: NodeId) -> ! {
    if id.tree != tag {
        panic!("rstree: node id {id:?} belongs to another tree");
    }
    panic!("rstree: stale node id {id:?}");
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    pub fn new() -> Self {
        Self::with_settings(TreeSettings::default())
    }

    pub fn with_settings(settings: TreeSettings) -> Self {
        Self {
            tag: TreeTag::fresh(),
            arena: Arena::new(),
            detached: HashSet::new(),
            first_root: None,
            last_root: None,
            settings,
            #[cfg(feature = "bookkeeping")]
            totals: Totals::default(),
            #[cfg(feature = "bookkeeping")]
            selection: Selection::default(),
        }
    }

    /// Tree with `value` as its only root.
    pub fn with_root(value: T) -> Self {
        let mut tree = Self::new();
        tree.set_root(value);
        tree
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// Moves every node out of `self` into the returned tree, leaving `self`
    /// empty with its settings intact.
    pub fn take(&mut self) -> Tree<T> {
        let mut taken = Tree::with_settings(self.settings.clone());
        self.swap_with(&mut taken);
        taken
    }

    /// Exchanges the complete contents of two trees in O(1).
    pub fn swap_with(&mut self, other: &mut Tree<T>) {
        std::mem::swap(self, other);
    }

    /// Removes the first root until none remain, then frees every detached
    /// subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn clear(&mut self) {
        while let Some(root) = self.first_root {
            self.erase(root);
        }
        let parked: Vec<NodeId> = self.detached.drain().collect();
        for root in parked {
            self.free_subtree(root);
        }
        #[cfg(feature = "bookkeeping")]
        self.selection.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.first_root.is_none()
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    fn resolve(&self, id: NodeId) -> Option<&Node<T>> {
        (id.tree == self.tag).then(|| self.arena.get(id.index)).flatten()
    }

    fn resolve_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        if id.tree == self.tag {
            self.arena.get_mut(id.index)
        } else {
            None
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<T> {
        match self.resolve(id) {
            Some(node) => node,
            None => reject(self.tag, id),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        match self.arena.get_mut(id.index) {
            Some(node) if id.tree == self.tag => node,
            _ => reject(self.tag, id),
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.resolve(id).map(|node| &node.data)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.resolve_mut(id).map(|node| &mut node.data)
    }

    /// True if `id` refers to a live node of this tree, detached subtrees
    /// included.
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// A position is valid when it designates a live data node; `None`
    /// (the ghost position closing every traversal) is not.
    pub fn is_valid(&self, position: Option<NodeId>) -> bool {
        position.is_some_and(|id| self.contains(id))
    }

    /// True for nodes on the top-level sibling chain and for the roots of
    /// detached subtrees.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.node(id).parent.is_none()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn first_root(&self) -> Option<NodeId> {
        self.first_root
    }

    pub fn last_root(&self) -> Option<NodeId> {
        self.last_root
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        self.node(id).first_child.is_some()
    }

    /// First node of the band `parent` closes; `None` parent is the top level.
    pub(crate) fn band_first(&self, parent: Option<NodeId>) -> Option<NodeId> {
        match parent {
            Some(p) => self.node(p).first_child,
            None => self.first_root,
        }
    }

    pub(crate) fn band_last(&self, parent: Option<NodeId>) -> Option<NodeId> {
        match parent {
            Some(p) => self.node(p).last_child,
            None => self.last_root,
        }
    }

    /// Ids of the band closed by `parent`, left to right.
    pub(crate) fn band(&self, parent: Option<NodeId>) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.band_first(parent), move |&c| self.node(c).next_sibling)
    }

    /// Ids in the sibling range `[begin, end)`.
    pub(crate) fn range_ids(&self, begin: &Sibling, end: &Sibling) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut cur = begin.node();
        while let Some(c) = cur {
            if Some(c) == end.node() {
                break;
            }
            ids.push(c);
            cur = self.node(c).next_sibling;
        }
        ids
    }

    /// Anchor that places a node right before `position`; a band end
    /// appends to that band.
    pub(crate) fn anchor_before(&self, position: &Sibling) -> Anchor {
        match position.node() {
            Some(node) => Anchor::Before(node),
            None => Anchor::LastChildOf(position.parent()),
        }
    }

    /// Node that follows the whole subtree of `id` in pre-order.
    pub(crate) fn subtree_end(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = id;
        loop {
            if let Some(next) = self.node(cur).next_sibling {
                return Some(next);
            }
            cur = self.node(cur).parent?;
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of nodes in the tree.
    #[cfg(feature = "bookkeeping")]
    pub fn size(&self) -> usize {
        self.totals.count
    }

    /// Number of nodes in the tree.
    #[cfg(not(feature = "bookkeeping"))]
    pub fn size(&self) -> usize {
        self.iter().count()
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    #[cfg(feature = "bookkeeping")]
    pub fn size_of(&self, id: NodeId) -> usize {
        self.node(id).stats.count
    }

    /// Number of nodes in the subtree rooted at `id`, `id` included.
    #[cfg(not(feature = "bookkeeping"))]
    pub fn size_of(&self, id: NodeId) -> usize {
        self.pre_order_from(id).count()
    }

    /// Number of edges between `id` and its top-level ancestor.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = id;
        while let Some(parent) = self.node(cur).parent {
            depth += 1;
            cur = parent;
        }
        depth
    }

    /// Depth of `id` counted from `root` instead of the top level.
    ///
    /// Returns `Unreachable` when `root` is not an ancestor-or-self of `id`.
    pub fn depth_from(&self, id: NodeId, root: NodeId) -> TreeResult<usize> {
        let mut depth = 0;
        let mut cur = id;
        while cur != root {
            match self.node(cur).parent {
                Some(parent) => {
                    depth += 1;
                    cur = parent;
                }
                None => return Err(TreeError::Unreachable { node: id, anchor: root }),
            }
        }
        Ok(depth)
    }

    /// Deepest depth present in the tree; `None` for an empty tree.
    pub fn max_depth(&self) -> Option<usize> {
        self.roots().filter_map(|(root, _)| self.max_depth_of(root)).max()
    }

    /// Longest downward distance from `id` to one of its leaves (0 for a leaf).
    #[instrument(level = "trace", skip(self))]
    pub fn max_depth_of(&self, id: NodeId) -> Option<usize> {
        if !self.contains(id) {
            return None;
        }
        let mut best = 0;
        let mut stack = vec![(id, 0usize)];
        while let Some((cur, depth)) = stack.pop() {
            best = best.max(depth);
            let mut child = self.node(cur).first_child;
            while let Some(c) = child {
                stack.push((c, depth + 1));
                child = self.node(c).next_sibling;
            }
        }
        Some(best)
    }

    pub fn number_of_children(&self, id: NodeId) -> usize {
        self.children(id).count()
    }

    /// Siblings to the left and right of `id`, not counting `id`.
    pub fn number_of_siblings(&self, id: NodeId) -> usize {
        let mut count = 0;
        let mut left = self.node(id).prev_sibling;
        while let Some(l) = left {
            count += 1;
            left = self.node(l).prev_sibling;
        }
        let mut right = self.node(id).next_sibling;
        while let Some(r) = right {
            count += 1;
            right = self.node(r).next_sibling;
        }
        count
    }

    /// Position of `id` among its siblings, starting at 0.
    pub fn index(&self, id: NodeId) -> usize {
        let mut index = 0;
        let mut left = self.node(id).prev_sibling;
        while let Some(l) = left {
            index += 1;
            left = self.node(l).prev_sibling;
        }
        index
    }

    /// Child number `n` of `id`.
    pub fn child(&self, id: NodeId, n: usize) -> TreeResult<NodeId> {
        self.children(id)
            .nth(n)
            .map(|(child, _)| child)
            .ok_or_else(|| TreeError::IndexOutOfRange {
                context: "child",
                index: n,
                available: self.number_of_children(id),
            })
    }

    /// Node number `n` of the sibling band `id` belongs to.
    pub fn sibling(&self, id: NodeId, n: usize) -> TreeResult<NodeId> {
        let parent = self.node(id).parent;
        let mut cur = self.band_first(parent);
        let mut steps = 0;
        while let Some(c) = cur {
            if steps == n {
                return Ok(c);
            }
            steps += 1;
            cur = self.node(c).next_sibling;
        }
        Err(TreeError::IndexOutOfRange {
            context: "sibling",
            index: n,
            available: steps,
        })
    }

    /// Position of `id` in a whole-tree pre-order walk.
    pub fn pre_order_index(&self, id: NodeId) -> usize {
        let mut cursor = self.pre_order_at(id);
        let mut index = 0;
        loop {
            cursor.retreat(self);
            if cursor.node().is_none() {
                return index;
            }
            index += 1;
        }
    }

    /// True if `top` is `position` or one of its ancestors.
    pub fn is_in_subtree(&self, position: NodeId, top: NodeId) -> bool {
        let mut cur = Some(position);
        while let Some(c) = cur {
            if c == top {
                return true;
            }
            cur = self.node(c).parent;
        }
        false
    }

    /// True if `position` lies in the subtree of any node in `[begin, end)`.
    pub fn is_in_subtree_range(&self, position: NodeId, begin: &Sibling, end: &Sibling) -> bool {
        let band_parent = begin.parent();
        let mut cur = Some(position);
        while let Some(c) = cur {
            let parent = self.node(c).parent;
            if parent == band_parent {
                let mut walk = begin.node();
                while walk != end.node() {
                    match walk {
                        Some(w) if w == c => return true,
                        Some(w) => walk = self.node(w).next_sibling,
                        None => break,
                    }
                }
                return false;
            }
            cur = parent;
        }
        false
    }

    /// Deepest node that is a strict ancestor of both `one` and `two`.
    ///
    /// Returns `None` when the nodes share no ancestor (different top-level
    /// trees, or one of them is a root).
    #[instrument(level = "trace", skip(self))]
    pub fn lowest_common_ancestor(&self, one: NodeId, two: NodeId) -> Option<NodeId> {
        let mut parents = HashSet::new();
        let mut walk = self.node(one).parent;
        while let Some(w) = walk {
            parents.insert(w);
            walk = self.node(w).parent;
        }
        let mut walk = self.node(two).parent;
        while let Some(w) = walk {
            if parents.contains(&w) {
                return Some(w);
            }
            walk = self.node(w).parent;
        }
        None
    }

    // ------------------------------------------------------------------
    // Consistency
    // ------------------------------------------------------------------

    /// Walks the whole structure and checks every link invariant (and, with
    /// bookkeeping, every counter). Every node in the arena must be reached
    /// exactly once, from the top level or from a detached root.
    pub fn verify_consistency(&self) -> TreeResult<()> {
        let broken = |node: NodeId, reason: &'static str| Err(TreeError::Inconsistent { node, reason });
        let mut reached: HashSet<NodeId> = HashSet::with_capacity(self.arena.len());
        let mut pending: Vec<Option<NodeId>> = vec![None];

        for &root in &self.detached {
            let Some(node) = self.resolve(root) else {
                return broken(root, "detached root was freed");
            };
            if node.parent.is_some() || node.prev_sibling.is_some() || node.next_sibling.is_some() {
                return broken(root, "detached root is still linked");
            }
            reached.insert(root);
            pending.push(Some(root));
        }

        while let Some(parent) = pending.pop() {
            let first = self.band_first(parent);
            let last = self.band_last(parent);
            if first.is_none() != last.is_none() {
                if let Some(culprit) = parent.or(first).or(last) {
                    return broken(culprit, "band ends disagree");
                }
            }
            let mut prev: Option<NodeId> = None;
            let mut cur = first;
            while let Some(c) = cur {
                if !self.contains(c) {
                    return broken(c, "link to a freed node");
                }
                if !reached.insert(c) {
                    return broken(c, "node reached twice");
                }
                let node = self.node(c);
                if node.parent != parent {
                    return broken(c, "parent link does not match owning band");
                }
                if node.prev_sibling != prev {
                    return broken(c, "prev_sibling is not the left neighbour");
                }
                if node.next_sibling.is_none() && last != Some(c) {
                    return broken(c, "band ends before its recorded last node");
                }
                pending.push(Some(c));
                prev = Some(c);
                cur = node.next_sibling;
            }
        }

        if reached.len() != self.arena.len() {
            let leaked = self
                .arena
                .iter()
                .map(|(index, _)| NodeId::new(self.tag, index))
                .find(|id| !reached.contains(id));
            if let Some(leaked) = leaked {
                return broken(leaked, "node unreachable from any root");
            }
        }

        #[cfg(feature = "bookkeeping")]
        self.verify_counters()?;
        Ok(())
    }

    /// Panics with the first inconsistency found.
    pub fn debug_verify_consistency(&self) {
        if let Err(e) = self.verify_consistency() {
            panic!("rstree: {e}");
        }
    }

    /// Runs the consistency checker after a mutation when the tree is
    /// configured to do so (debug builds only).
    pub(crate) fn checkpoint(&self) {
        if cfg!(debug_assertions) && self.settings.verify_consistency {
            debug!("verifying consistency");
            self.debug_verify_consistency();
        }
    }

    pub(crate) fn anchor_of(&self, id: NodeId) -> Anchor {
        let node = self.node(id);
        match node.prev_sibling {
            Some(prev) => Anchor::After(prev),
            None => Anchor::FirstChildOf(node.parent),
        }
    }
}

impl<T: Clone> Tree<T> {
    /// Deep copy of the subtree rooted at `top` in `source`; `top` becomes
    /// the only root of the new tree.
    pub fn from_node(source: &Tree<T>, top: NodeId) -> Self {
        let mut tree = Tree::with_settings(source.settings.clone());
        tree.graft(source, top, Anchor::LastChildOf(None));
        tree
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        let mut tree = Tree::with_settings(self.settings.clone());
        let mut root = self.first_root;
        while let Some(r) = root {
            tree.graft(self, r, Anchor::LastChildOf(None));
            root = self.node(r).next_sibling;
        }
        #[cfg(feature = "bookkeeping")]
        {
            tree.selection = self.selection.clone();
        }
        tree
    }
}

impl<T> Index<NodeId> for Tree<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &T {
        &self.node(id).data
    }
}

impl<T> IndexMut<NodeId> for Tree<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut T {
        &mut self.node_mut(id).data
    }
}

// test
#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree<&'static str>, NodeId, [NodeId; 3]) {
        let mut tree = Tree::with_root("a");
        let a = tree.first_root().unwrap();
        let b = tree.append_child(a, "b");
        let c = tree.append_child(a, "c");
        let d = tree.append_child(c, "d");
        (tree, a, [b, c, d])
    }

    #[test]
    fn test_depth_and_max_depth() {
        let (tree, a, [b, c, d]) = sample();
        assert_eq!(tree.depth(a), 0);
        assert_eq!(tree.depth(d), 2);
        assert_eq!(tree.depth_from(d, c).unwrap(), 1);
        assert!(tree.depth_from(b, c).is_err());
        assert_eq!(tree.max_depth(), Some(2));
        assert_eq!(tree.max_depth_of(b), Some(0));
        assert_eq!(Tree::<u8>::new().max_depth(), None);
    }

    #[test]
    fn test_siblings_and_index() {
        let (tree, a, [b, c, _]) = sample();
        assert_eq!(tree.number_of_children(a), 2);
        assert_eq!(tree.number_of_siblings(b), 1);
        assert_eq!(tree.index(c), 1);
        assert_eq!(tree.child(a, 1).unwrap(), c);
        assert!(tree.child(a, 2).unwrap_err().is_out_of_range());
        assert_eq!(tree.sibling(c, 0).unwrap(), b);
    }

    #[test]
    fn test_lowest_common_ancestor_uses_strict_ancestors() {
        let (tree, a, [b, c, d]) = sample();
        assert_eq!(tree.lowest_common_ancestor(b, d), Some(a));
        assert_eq!(tree.lowest_common_ancestor(c, d), Some(a));
        assert_eq!(tree.lowest_common_ancestor(a, d), None);
    }

    #[test]
    fn test_subtree_end() {
        let (tree, a, [b, c, d]) = sample();
        assert_eq!(tree.subtree_end(b), Some(c));
        assert_eq!(tree.subtree_end(d), None);
        assert_eq!(tree.subtree_end(a), None);
    }

    #[test]
    fn test_clone_is_deep_and_consistent() {
        let (tree, _, _) = sample();
        let copy = tree.clone();
        copy.debug_verify_consistency();
        assert_eq!(copy.size(), 4);
        assert_eq!(copy.values().copied().collect::<Vec<_>>(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_unreachable_node_fails_consistency() {
        let (mut tree, _, _) = sample();
        let leaked = tree.alloc("leaked");
        let err = tree.verify_consistency().unwrap_err();
        assert!(matches!(
            err,
            TreeError::Inconsistent { node, reason: "node unreachable from any root" } if node == leaked
        ));
    }

    #[test]
    fn test_parked_nodes_are_reachable() {
        let (mut tree, a, [_, c, _]) = sample();
        let out = tree.move_out(c);
        assert_eq!(tree.size(), 2);
        assert!(tree.contains(c));
        assert!(tree.is_root(c));
        tree.debug_verify_consistency();
        tree.clear();
        assert!(!tree.contains(c));
        assert!(!tree.contains(a));
        assert_eq!(out.root(), Some(c));
        tree.debug_verify_consistency();
    }

    #[test]
    fn test_stale_id_is_not_contained() {
        let (mut tree, _, [b, _, _]) = sample();
        tree.erase(b);
        assert!(!tree.contains(b));
        assert!(tree.get(b).is_none());
        assert!(!tree.is_valid(Some(b)));
        assert!(!tree.is_valid(None));
    }
}
