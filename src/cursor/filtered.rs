//! Traversals restricted by the bookkeeping flags.

use super::{impl_cursor_eq, BidiCursor, Cursor, CursorCore, PreOrder, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

/// Pre-order over shown nodes: visible ones, never descending into a
/// collapsed node.
#[derive(Debug, Clone, Default)]
pub struct Expanded {
    core: CursorCore,
}

/// Pre-order over visible nodes that have children, regardless of the
/// expand state.
#[derive(Debug, Clone, Default)]
pub struct Expandable {
    core: CursorCore,
}

impl_cursor_eq!(Expanded, Expandable);

fn first_visible<T>(tree: &Tree<T>, mut cur: Option<NodeId>) -> Option<NodeId> {
    while let Some(c) = cur {
        if tree.is_visible(c) {
            return Some(c);
        }
        cur = tree.next_sibling(c);
    }
    None
}

fn last_visible<T>(tree: &Tree<T>, mut cur: Option<NodeId>) -> Option<NodeId> {
    while let Some(c) = cur {
        if tree.is_visible(c) {
            return Some(c);
        }
        cur = tree.prev_sibling(c);
    }
    None
}

/// Last shown node of the subtree at `node`.
fn deepest_shown<T>(tree: &Tree<T>, mut node: NodeId) -> NodeId {
    while tree.is_expanded(node) {
        match last_visible(tree, tree.last_child(node)) {
            Some(child) => node = child,
            None => break,
        }
    }
    node
}

impl Expanded {
    pub fn new(node: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
        }
    }

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

impl Cursor for Expanded {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        let Some(node) = self.core.node else {
            self.core.node = first_visible(tree, tree.first_root());
            return;
        };
        let skip = self.core.take_skip();
        if !skip && tree.is_expanded(node) {
            if let Some(child) = first_visible(tree, tree.first_child(node)) {
                self.core.node = Some(child);
                return;
            }
        }
        let mut cur = node;
        self.core.node = loop {
            if let Some(next) = first_visible(tree, tree.next_sibling(cur)) {
                break Some(next);
            }
            match tree.parent(cur) {
                Some(parent) => cur = parent,
                None => break None,
            }
        };
    }
}

impl BidiCursor for Expanded {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        self.core.node = match self.core.node {
            Some(node) => match last_visible(tree, tree.prev_sibling(node)) {
                Some(prev) => Some(deepest_shown(tree, prev)),
                None => tree.parent(node),
            },
            None => last_visible(tree, tree.last_root()).map(|root| deepest_shown(tree, root)),
        };
    }
}

impl Expandable {
    pub fn new(node: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
        }
    }

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

    fn qualifies<T>(tree: &Tree<T>, id: NodeId) -> bool {
        tree.is_visible(id) && tree.has_children(id)
    }

    fn settle<T>(&mut self, tree: &Tree<T>, mut inner: PreOrder, forward: bool) {
        loop {
            match inner.node() {
                Some(id) if Self::qualifies(tree, id) => break,
                Some(id) if forward => {
                    if !tree.is_visible(id) {
                        inner.skip_children();
                    }
                    inner.advance(tree);
                }
                Some(_) => inner.retreat(tree),
                None => break,
            }
        }
        self.core.node = inner.node();
    }
}

impl Cursor for Expandable {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        let mut inner = PreOrder::new(self.core.node);
        if self.core.take_skip() {
            inner.skip_children();
        }
        inner.advance(tree);
        self.settle(tree, inner, true);
    }
}

impl BidiCursor for Expandable {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        let mut inner = PreOrder::new(self.core.node);
        inner.retreat(tree);
        self.settle(tree, inner, false);
    }
}

impl<T> Tree<T> {
    pub fn begin_expanded(&self) -> Expanded {
        Expanded::new(first_visible(self, self.first_root()))
    }

    pub fn end_expanded(&self) -> Expanded {
        Expanded::default()
    }

    pub fn begin_expandable(&self) -> Expandable {
        let mut cursor = Expandable::default();
        cursor.settle(self, self.begin(), true);
        cursor
    }

    pub fn end_expandable(&self) -> Expandable {
        Expandable::default()
    }
}
