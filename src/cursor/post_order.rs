use super::{impl_cursor_eq, BidiCursor, Cursor, CursorCore, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

/// Depth-first, children before parent.
#[derive(Debug, Clone, Default)]
pub struct PostOrder {
    core: CursorCore,
}

impl_cursor_eq!(PostOrder);

impl PostOrder {
    pub fn new(node: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
        }
    }

    /// First post-order position of the subtree rooted at `top`.
    pub fn first_below<T>(tree: &Tree<T>, top: NodeId) -> Self {
        Self::new(Some(deepest_first(tree, top)))
    }

    /// A band end resolves to the band's parent (the ghost at the top level).
    pub fn from_sibling(sibling: &Sibling) -> Self {
        match sibling.node() {
            Some(node) => Self::new(Some(node)),
            None => Self::new(sibling.parent()),
        }
    }
}

fn deepest_first<T>(tree: &Tree<T>, mut node: NodeId) -> NodeId {
    while let Some(first) = tree.first_child(node) {
        node = first;
    }
    node
}

impl Cursor for PostOrder {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        let Some(node) = self.core.node else {
            *self = tree.begin_post();
            return;
        };
        let skip = self.core.take_skip();
        self.core.node = match tree.next_sibling(node) {
            Some(next) if skip => Some(next),
            Some(next) => Some(deepest_first(tree, next)),
            None => tree.parent(node),
        };
    }
}

impl BidiCursor for PostOrder {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        let Some(node) = self.core.node else {
            self.core = CursorCore::at(tree.last_root());
            return;
        };
        let skip = self.core.take_skip();
        if let Some(last) = tree.last_child(node).filter(|_| !skip) {
            self.core.node = Some(last);
            return;
        }
        let mut cur = node;
        self.core.node = loop {
            if let Some(prev) = tree.prev_sibling(cur) {
                break Some(prev);
            }
            match tree.parent(cur) {
                Some(parent) => cur = parent,
                None => break None,
            }
        };
    }
}

impl<T> Tree<T> {
    pub fn begin_post(&self) -> PostOrder {
        match self.first_root() {
            Some(root) => PostOrder::first_below(self, root),
            None => PostOrder::default(),
        }
    }

    pub fn end_post(&self) -> PostOrder {
        PostOrder::default()
    }
}
