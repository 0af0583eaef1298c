use super::{BidiCursor, Cursor, CursorCore, Sibling};
use crate::node::NodeId;
use crate::tree::Tree;

/// Visits only childless nodes, optionally confined to the subtree of `top`.
#[derive(Debug, Clone, Default)]
pub struct Leaf {
    core: CursorCore,
    top: Option<NodeId>,
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.core.node == other.core.node && self.top == other.top
    }
}

impl Eq for Leaf {}

impl Leaf {
    pub fn new(node: Option<NodeId>, top: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
            top,
        }
    }

    pub fn top(&self) -> Option<NodeId> {
        self.top
    }

    /// A band end resolves to the first leaf after the band.
    pub fn from_sibling<T>(tree: &Tree<T>, sibling: &Sibling) -> Self {
        match sibling.node() {
            Some(node) => Self::new(Some(descend_first(tree, node)), None),
            None => {
                let mut cursor = Self::new(sibling.range_last(tree).or(sibling.parent()), None);
                if cursor.core.node.is_some() {
                    cursor.skip_children();
                    cursor.advance(tree);
                }
                cursor
            }
        }
    }

    fn first<T>(tree: &Tree<T>, top: Option<NodeId>) -> Option<NodeId> {
        top.or(tree.first_root()).map(|start| descend_first(tree, start))
    }

    fn last<T>(tree: &Tree<T>, top: Option<NodeId>) -> Option<NodeId> {
        top.or(tree.last_root()).map(|start| descend_last(tree, start))
    }
}

fn descend_first<T>(tree: &Tree<T>, mut node: NodeId) -> NodeId {
    while let Some(first) = tree.first_child(node) {
        node = first;
    }
    node
}

fn descend_last<T>(tree: &Tree<T>, mut node: NodeId) -> NodeId {
    while let Some(last) = tree.last_child(node) {
        node = last;
    }
    node
}

impl Cursor for Leaf {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    fn advance<T>(&mut self, tree: &Tree<T>) {
        let Some(node) = self.core.node else {
            self.core.node = Self::first(tree, self.top);
            return;
        };
        let skip = self.core.take_skip();
        // the current node may have gained children since it was reached
        if let Some(child) = tree.first_child(node).filter(|_| !skip) {
            self.core.node = Some(descend_first(tree, child));
            return;
        }
        let mut cur = node;
        self.core.node = loop {
            if Some(cur) == self.top {
                break None;
            }
            if let Some(next) = tree.next_sibling(cur) {
                break Some(descend_first(tree, next));
            }
            match tree.parent(cur) {
                Some(parent) => cur = parent,
                None => break None,
            }
        };
    }
}

impl BidiCursor for Leaf {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        self.core.skip_children = false;
        let Some(node) = self.core.node else {
            self.core.node = Self::last(tree, self.top);
            return;
        };
        let mut cur = node;
        self.core.node = loop {
            if Some(cur) == self.top {
                break None;
            }
            if let Some(prev) = tree.prev_sibling(cur) {
                break Some(descend_last(tree, prev));
            }
            match tree.parent(cur) {
                Some(parent) => cur = parent,
                None => break None,
            }
        };
    }
}

impl<T> Tree<T> {
    pub fn begin_leaf(&self) -> Leaf {
        Leaf::new(Leaf::first(self, None), None)
    }

    pub fn end_leaf(&self) -> Leaf {
        Leaf::default()
    }

    pub fn begin_leaf_in(&self, top: NodeId) -> Leaf {
        Leaf::new(Leaf::first(self, Some(top)), Some(top))
    }

    pub fn end_leaf_in(&self, top: NodeId) -> Leaf {
        Leaf::new(None, Some(top))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Tree<char>, NodeId, NodeId) {
        // a(b(c, d), e), f(g)
        let mut tree = Tree::with_root('a');
        let a = tree.first_root().unwrap();
        let b = tree.append_child(a, 'b');
        tree.append_child(b, 'c');
        tree.append_child(b, 'd');
        tree.append_child(a, 'e');
        let f = tree.push_root('f');
        tree.append_child(f, 'g');
        (tree, b, f)
    }

    #[test]
    fn test_whole_tree_leaves() {
        let (tree, _, _) = sample();
        let leaves: String = tree.leaves().map(|(_, v)| *v).collect();
        assert_eq!(leaves, "cdeg");
    }

    #[test]
    fn test_bounded_walk_does_not_escape_top() {
        let (tree, b, _) = sample();
        let leaves: String = tree.leaves_of(b).map(|(_, v)| *v).collect();
        assert_eq!(leaves, "cd");

        let mut cursor = tree.end_leaf_in(b);
        cursor.retreat(&tree);
        assert_eq!(cursor.value(&tree), Some(&'d'));
        cursor.retreat(&tree);
        assert_eq!(cursor.value(&tree), Some(&'c'));
        cursor.retreat(&tree);
        assert_eq!(cursor, tree.end_leaf_in(b));
    }

    #[test]
    fn test_leaf_that_gained_children_descends() {
        let (mut tree, _, f) = sample();
        let mut cursor = tree.begin_leaf_in(f);
        let g = cursor.node().unwrap();
        tree.append_child(g, 'h');
        cursor.advance(&tree);
        assert_eq!(cursor.value(&tree), Some(&'h'));
    }
}
