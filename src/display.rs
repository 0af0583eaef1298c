//! Terminal rendering through `termtree`.

use std::fmt;

use termtree::Tree as TermTree;
use tracing::instrument;

use crate::node::NodeId;
use crate::tree::Tree;

impl<T> Tree<T> {
    /// `termtree` view of the subtree at `id`, labels produced by `label`.
    pub fn to_termtree_with<F>(&self, id: NodeId, label: &mut F) -> TermTree<String>
    where
        F: FnMut(NodeId, &T) -> String,
    {
        let leaves: Vec<_> = self
            .children(id)
            .map(|(child, _)| self.to_termtree_with(child, label))
            .collect();
        TermTree::new(label(id, &self[id])).with_leaves(leaves)
    }

    /// Renders every root as its own `termtree`, one after another.
    #[instrument(level = "debug", skip_all)]
    pub fn render_with<F>(&self, mut label: F) -> String
    where
        F: FnMut(NodeId, &T) -> String,
    {
        if self.is_empty() {
            return "Empty tree\n".to_string();
        }
        self.roots()
            .map(|(root, _)| self.to_termtree_with(root, &mut label).to_string())
            .collect()
    }
}

impl<T: fmt::Display> fmt::Display for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with(|_, value| value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_nested() {
        let mut tree = Tree::with_root("root");
        let r = tree.first_root().unwrap();
        let a = tree.append_child(r, "a");
        tree.append_child(a, "a1");
        tree.append_child(r, "b");
        let expected = "root\n├── a\n│   └── a1\n└── b\n";
        assert_eq!(tree.to_string(), expected);
    }

    #[test]
    fn test_render_empty() {
        let tree: Tree<&str> = Tree::new();
        assert_eq!(tree.to_string(), "Empty tree\n");
    }
}
