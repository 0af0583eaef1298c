use super::{impl_cursor_eq, BidiCursor, Cursor, CursorCore, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

/// Depth-first, parent before children.
#[derive(Debug, Clone, Default)]
pub struct PreOrder {
    core: CursorCore,
}

impl_cursor_eq!(PreOrder);

impl PreOrder {
    pub fn new(node: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
        }
    }

    /// Pre-order position equivalent to a sibling cursor; a band end resolves
    /// to whatever follows the band's last subtree.
    pub fn from_sibling<T>(tree: &Tree<T>, sibling: &Sibling) -> Self {
        if sibling.node().is_some() {
            return Self::new(sibling.node());
        }
        match sibling.range_last(tree).or(sibling.parent()) {
            Some(anchor) => {
                let mut cursor = Self::new(Some(anchor));
                cursor.skip_children();
                cursor.advance(tree);
                cursor
            }
            None => Self::default(),
        }
    }
}

impl Cursor for PreOrder {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        let Some(node) = self.core.node else {
            self.core = CursorCore::at(tree.first_root());
            return;
        };
        let skip = self.core.take_skip();
        self.core.node = match tree.first_child(node) {
            Some(child) if !skip => Some(child),
            _ => tree.subtree_end(node),
        };
    }
}

impl BidiCursor for PreOrder {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        self.core.node = match self.core.node {
            Some(node) => match tree.prev_sibling(node) {
                Some(prev) => Some(deepest_last(tree, prev)),
                None => tree.parent(node),
            },
            None => tree.last_root().map(|root| deepest_last(tree, root)),
        };
    }
}

fn deepest_last<T>(tree: &Tree<T>, mut node: NodeId) -> NodeId {
    while let Some(last) = tree.last_child(node) {
        node = last;
    }
    node
}

impl<T> Tree<T> {
    pub fn begin(&self) -> PreOrder {
        PreOrder::new(self.first_root())
    }

    pub fn end(&self) -> PreOrder {
        PreOrder::default()
    }

    pub fn pre_order_at(&self, id: NodeId) -> PreOrder {
        PreOrder::new(Some(id))
    }

    /// Pre-order position right after the subtree of `id`.
    pub fn end_subtree(&self, id: NodeId) -> PreOrder {
        PreOrder::new(self.subtree_end(id))
    }
}
