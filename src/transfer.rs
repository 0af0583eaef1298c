//! Moving subtrees off and back onto the tree, subtree extraction and
//! merging.
//!
//! A subtree moved out stays in the arena under its own root, so moving it
//! out and back in only rewrites links: no node is allocated or freed and
//! every id keeps designating the same node.

use tracing::{debug, instrument};

use crate::cursor::Sibling;
use crate::errors::{TreeError, TreeResult};
use crate::links::Anchor;
use crate::node::NodeId;
use crate::tree::Tree;

/// Subtree parked off the top level of the [`Tree`] that produced it.
///
/// The handle is the only way back to the parked root; dropping it leaves
/// the nodes allocated until [`Tree::clear`] or the tree itself goes away.
#[must_use = "a detached subtree is reachable only through its handle"]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Detached {
    root: Option<NodeId>,
}

impl Detached {
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// True once the subtree was moved back in or dropped.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }
}

impl<T> Tree<T> {
    /// Takes the subtree at `id` off its band and parks it. The former
    /// neighbours of `id` become adjacent.
    #[instrument(level = "trace", skip(self))]
    pub fn move_out(&mut self, id: NodeId) -> Detached {
        self.unlink(id);
        self.detached.insert(id);
        debug!(moved = self.size_of(id), left = self.size(), "moved subtree out");
        Detached { root: Some(id) }
    }

    /// Parks a new single-node subtree holding `value`.
    pub fn new_detached(&mut self, value: T) -> Detached {
        let id = self.alloc(value);
        self.detached.insert(id);
        Detached { root: Some(id) }
    }

    /// Links the parked subtree before `loc`, leaving `other` empty; returns
    /// its root. `None` when `other` is already empty.
    ///
    /// # Panics
    /// If `other` came from another tree, or `loc` lies inside it.
    #[instrument(level = "trace", skip(self))]
    pub fn move_in(&mut self, loc: NodeId, other: &mut Detached) -> Option<NodeId> {
        self.attach(other, Anchor::Before(loc))
    }

    /// Links the parked subtree below `loc`, after its current children.
    #[instrument(level = "trace", skip(self))]
    pub fn move_in_below(&mut self, loc: NodeId, other: &mut Detached) -> Option<NodeId> {
        self.attach(other, Anchor::LastChildOf(Some(loc)))
    }

    /// Links the parked subtree as the last top-level root.
    pub fn move_in_as_root(&mut self, other: &mut Detached) -> Option<NodeId> {
        self.attach(other, Anchor::LastChildOf(None))
    }

    /// Links the parked subtree below `loc` as child number `n`. On an
    /// out-of-range `n` the subtree stays parked in `other`.
    pub fn move_in_as_nth_child(
        &mut self,
        loc: NodeId,
        n: usize,
        other: &mut Detached,
    ) -> TreeResult<Option<NodeId>> {
        if other.is_empty() {
            return Ok(None);
        }
        let at = match n {
            0 => Anchor::FirstChildOf(Some(loc)),
            _ => {
                let previous = self.child(loc, n - 1).map_err(|_| TreeError::IndexOutOfRange {
                    context: "move_in_as_nth_child",
                    index: n,
                    available: self.number_of_children(loc),
                })?;
                Anchor::After(previous)
            }
        };
        Ok(self.attach(other, at))
    }

    /// Frees a parked subtree, leaving `other` empty.
    pub fn drop_detached(&mut self, other: &mut Detached) {
        if let Some(root) = other.root.take() {
            self.release(root);
            self.free_subtree(root);
        }
    }

    fn attach(&mut self, other: &mut Detached, at: Anchor) -> Option<NodeId> {
        let root = other.root?;
        let target = match at {
            Anchor::Before(t) | Anchor::After(t) => Some(t),
            Anchor::FirstChildOf(p) | Anchor::LastChildOf(p) => p,
        };
        if let Some(t) = target {
            assert!(
                !self.is_in_subtree(t, root),
                "rstree: cannot move {root:?} in next to or below itself"
            );
        }
        self.release(root);
        other.root = None;
        self.link(root, at);
        debug!(?root, size = self.size(), "moved subtree in");
        Some(root)
    }

    fn release(&mut self, root: NodeId) {
        if !self.detached.remove(&root) {
            panic!("rstree: {root:?} is not a detached root of this tree");
        }
    }
}

impl<T: Clone + Default> Tree<T> {
    /// New tree with a default-valued root whose children are copies of the
    /// range `[from, to)`.
    ///
    /// # Panics
    /// If the range is empty.
    pub fn subtree(&self, from: &Sibling, to: &Sibling) -> Tree<T> {
        let mut tree = Tree::with_settings(self.settings.clone());
        self.subtree_into(&mut tree, from, to);
        tree
    }

    /// Like [`Tree::subtree`], writing into `target`, which is cleared first.
    pub fn subtree_into(&self, target: &mut Tree<T>, from: &Sibling, to: &Sibling) {
        assert!(from != to, "rstree: subtree of an empty range");
        target.clear();
        let root = target.set_root(T::default());
        target.append_children(root, self, from, to);
    }
}

impl<T: Clone + PartialEq> Tree<T> {
    /// Merges the source range `[from_begin, from_end)` into the range
    /// `[to_begin, to_end)` of this tree.
    ///
    /// A source node whose value already occurs in the destination range has
    /// its children merged into that node's children; an equal leaf is
    /// appended again only with `duplicate_leaves`. Any other source node is
    /// copied in before `to_end`. Source nodes are handled depth-first in
    /// order, and a matched node's children are read when its turn comes.
    #[instrument(level = "debug", skip_all, fields(duplicate_leaves))]
    pub fn merge(
        &mut self,
        to_begin: &Sibling,
        to_end: &Sibling,
        source: &Tree<T>,
        from_begin: &Sibling,
        from_end: &Sibling,
        duplicate_leaves: bool,
    ) {
        let mut frames = vec![(
            to_begin.clone(),
            to_end.clone(),
            source.range_ids(from_begin, from_end).into_iter(),
        )];
        loop {
            let Some((begin, end, sources)) = frames.last_mut() else {
                break;
            };
            let (begin, end, next) = (begin.clone(), end.clone(), sources.next());
            let Some(from) = next else {
                frames.pop();
                continue;
            };
            let found = self
                .range_ids(&begin, &end)
                .into_iter()
                .find(|&candidate| self[candidate] == source[from]);
            match found {
                Some(_) if !source.has_children(from) => {
                    if duplicate_leaves {
                        debug!(?from, "duplicating leaf");
                        self.graft(source, from, Anchor::LastChildOf(begin.parent()));
                    }
                }
                Some(matched) => {
                    let children: Vec<NodeId> = source.band(Some(from)).collect();
                    frames.push((
                        self.begin_children(matched),
                        self.end_children(matched),
                        children.into_iter(),
                    ));
                }
                None => {
                    debug!(?from, "copying missing subtree");
                    let at = self.anchor_before(&end);
                    self.graft(source, from, at);
                }
            }
        }
    }

    /// Merges the single source node `from` into the single node `to`.
    pub fn merge_nodes(&mut self, to: NodeId, source: &Tree<T>, from: NodeId, duplicate_leaves: bool) {
        let to_begin = Sibling::at(self, to);
        let to_end = to_begin.next(self);
        let from_begin = Sibling::at(source, from);
        let from_end = from_begin.next(source);
        self.merge(&to_begin, &to_end, source, &from_begin, &from_end, duplicate_leaves);
    }
}
