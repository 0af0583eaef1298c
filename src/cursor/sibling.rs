use super::{impl_cursor_eq, BidiCursor, Cursor, CursorCore};
use crate::node::NodeId;
use crate::tree::Tree;

/// Walks one band of siblings.
///
/// The cursor remembers the band's parent (`None` for the top level), so an
/// end cursor can still name the band it closes.
#[derive(Debug, Clone, Default)]
pub struct Sibling {
    core: CursorCore,
    parent: Option<NodeId>,
}

impl_cursor_eq!(Sibling);

impl Sibling {
    /// Cursor on `node`, or the end of the band under `parent`.
    pub fn new(node: Option<NodeId>, parent: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
            parent,
        }
    }

    pub fn at<T>(tree: &Tree<T>, node: NodeId) -> Self {
        Self::new(Some(node), tree.parent(node))
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn range_first<T>(&self, tree: &Tree<T>) -> Option<NodeId> {
        tree.band_first(self.parent)
    }

    pub fn range_last<T>(&self, tree: &Tree<T>) -> Option<NodeId> {
        tree.band_last(self.parent)
    }

    /// The position after this one, leaving `self` in place.
    pub fn next<T>(&self, tree: &Tree<T>) -> Self {
        let mut next = self.clone();
        next.advance(tree);
        next
    }
}

impl Cursor for Sibling {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        self.core.node = match self.core.node {
            Some(node) => tree.next_sibling(node),
            None => self.range_first(tree),
        };
    }
}

impl BidiCursor for Sibling {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        self.core.node = match self.core.node {
            Some(node) => tree.prev_sibling(node),
            None => self.range_last(tree),
        };
    }
}

impl<T> Tree<T> {
    pub fn begin_children(&self, id: NodeId) -> Sibling {
        Sibling::new(self.first_child(id), Some(id))
    }

    pub fn end_children(&self, id: NodeId) -> Sibling {
        Sibling::new(None, Some(id))
    }

    pub fn begin_roots(&self) -> Sibling {
        Sibling::new(self.first_root(), None)
    }

    pub fn end_roots(&self) -> Sibling {
        Sibling::new(None, None)
    }

    pub fn sibling_at(&self, id: NodeId) -> Sibling {
        Sibling::at(self, id)
    }
}
