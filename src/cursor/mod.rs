//! Cursors: one small state machine per traversal strategy.
//!
//! A cursor holds a position plus a "skip children on next advance" flag.
//! Position `None` is the ghost that closes every traversal; stepping a
//! bidirectional cursor off the ghost re-enters its traversal from the
//! matching end.

mod breadth_first;
#[cfg(feature = "bookkeeping")]
mod filtered;
mod fixed_depth;
mod leaf;
mod post_order;
mod pre_order;
mod sibling;

pub use breadth_first::BreadthFirst;
#[cfg(feature = "bookkeeping")]
pub use filtered::{Expandable, Expanded};
pub use fixed_depth::FixedDepth;
pub use leaf::Leaf;
pub use post_order::PostOrder;
pub use pre_order::PreOrder;
pub use sibling::Sibling;

use crate::node::NodeId;
use crate::tree::Tree;

/// State every cursor kind shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CursorCore {
    pub(crate) node: Option<NodeId>,
    pub(crate) skip_children: bool,
}

impl CursorCore {
    pub(crate) fn at(node: Option<NodeId>) -> Self {
        Self {
            node,
            skip_children: false,
        }
    }

    /// Returns the skip flag and clears it.
    pub(crate) fn take_skip(&mut self) -> bool {
        std::mem::take(&mut self.skip_children)
    }
}

pub trait Cursor: Clone {
    fn core(&self) -> &CursorCore;
    fn core_mut(&mut self) -> &mut CursorCore;

    /// Moves to the next position of this traversal.
    fn advance<T>(&mut self, tree: &Tree<T>);

    fn node(&self) -> Option<NodeId> {
        self.core().node
    }

    fn is_end(&self) -> bool {
        self.core().node.is_none()
    }

    /// Do not descend below the current node on the next advance.
    fn skip_children(&mut self) {
        self.core_mut().skip_children = true;
    }

    fn set_skip_children(&mut self, skip: bool) {
        self.core_mut().skip_children = skip;
    }

    fn advance_by<T>(&mut self, tree: &Tree<T>, n: usize) {
        for _ in 0..n {
            self.advance(tree);
        }
    }

    fn value<'a, T>(&self, tree: &'a Tree<T>) -> Option<&'a T> {
        self.node().and_then(|id| tree.get(id))
    }
}

pub trait BidiCursor: Cursor {
    /// Moves to the previous position of this traversal.
    fn retreat<T>(&mut self, tree: &Tree<T>);

    fn retreat_by<T>(&mut self, tree: &Tree<T>, n: usize) {
        for _ in 0..n {
            self.retreat(tree);
        }
    }
}

macro_rules! impl_cursor_eq {
    ($($cursor:ty),+ $(,)?) => {
        $(
            impl PartialEq for $cursor {
                fn eq(&self, other: &Self) -> bool {
                    self.core.node == other.core.node
                }
            }

            impl Eq for $cursor {}
        )+
    };
}
pub(crate) use impl_cursor_eq;

/// Iterator over `(id, value)` pairs driven by a cursor, stopping at `end`.
///
/// The cursor is advanced lazily, so [`Walk::skip_current_children`] can
/// still prune the subtree of the item returned last.
pub struct Walk<'a, T, C> {
    tree: &'a Tree<T>,
    cursor: C,
    end: Option<NodeId>,
    started: bool,
    done: bool,
}

impl<'a, T, C: Cursor> Walk<'a, T, C> {
    pub(crate) fn new(tree: &'a Tree<T>, cursor: C, end: Option<NodeId>) -> Self {
        Self {
            tree,
            cursor,
            end,
            started: false,
            done: false,
        }
    }

    /// Cursor positioned on the item returned last.
    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Leaves out the descendants of the item returned last.
    pub fn skip_current_children(&mut self) {
        self.cursor.skip_children();
    }
}

impl<'a, T, C: Cursor> Iterator for Walk<'a, T, C> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started {
            self.cursor.advance(self.tree);
        }
        self.started = true;
        match self.cursor.node() {
            Some(id) if Some(id) != self.end => Some((id, &self.tree.node(id).data)),
            _ => {
                self.done = true;
                None
            }
        }
    }
}

impl<'a, T, C: Cursor> std::iter::FusedIterator for Walk<'a, T, C> {}

impl<T> Tree<T> {
    /// Walks from `begin` up to (excluding) `end`.
    pub fn walk<C: Cursor>(&self, begin: C, end: &C) -> Walk<'_, T, C> {
        Walk::new(self, begin, end.node())
    }

    /// Whole-tree pre-order walk.
    pub fn iter(&self) -> Walk<'_, T, PreOrder> {
        Walk::new(self, self.begin(), None)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Pre-order walk of the subtree rooted at `id`.
    pub fn pre_order_from(&self, id: NodeId) -> Walk<'_, T, PreOrder> {
        Walk::new(self, self.pre_order_at(id), self.subtree_end(id))
    }

    pub fn post_order(&self) -> Walk<'_, T, PostOrder> {
        Walk::new(self, self.begin_post(), None)
    }

    /// Post-order walk of the subtree rooted at `id`, ending with `id`.
    pub fn post_order_from(&self, id: NodeId) -> Walk<'_, T, PostOrder> {
        let mut after = PostOrder::new(Some(id));
        after.advance(self);
        Walk::new(self, PostOrder::first_below(self, id), after.node())
    }

    pub fn breadth_first(&self) -> Walk<'_, T, BreadthFirst> {
        Walk::new(self, self.begin_breadth_first(), None)
    }

    pub fn breadth_first_from(&self, id: NodeId) -> Walk<'_, T, BreadthFirst> {
        Walk::new(self, BreadthFirst::new(Some(id)), None)
    }

    pub fn leaves(&self) -> Walk<'_, T, Leaf> {
        Walk::new(self, self.begin_leaf(), None)
    }

    /// Leaves of the subtree rooted at `top`.
    pub fn leaves_of(&self, top: NodeId) -> Walk<'_, T, Leaf> {
        Walk::new(self, self.begin_leaf_in(top), None)
    }

    /// Nodes exactly `depth` levels below `anchor`, left to right.
    ///
    /// Empty when the subtree has no node at that depth.
    pub fn at_depth(&self, anchor: NodeId, depth: usize) -> Walk<'_, T, FixedDepth> {
        let cursor = self
            .begin_fixed(anchor, depth, false)
            .unwrap_or_else(|_| self.end_fixed(anchor));
        Walk::new(self, cursor, None)
    }

    pub fn roots(&self) -> Walk<'_, T, Sibling> {
        Walk::new(self, self.begin_roots(), None)
    }

    pub fn children(&self, id: NodeId) -> Walk<'_, T, Sibling> {
        Walk::new(self, self.begin_children(id), None)
    }

    #[cfg(feature = "bookkeeping")]
    pub fn expanded(&self) -> Walk<'_, T, Expanded> {
        Walk::new(self, self.begin_expanded(), None)
    }

    #[cfg(feature = "bookkeeping")]
    pub fn expandable(&self) -> Walk<'_, T, Expandable> {
        Walk::new(self, self.begin_expandable(), None)
    }
}
