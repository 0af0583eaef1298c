use std::fmt;
use std::str::FromStr;

use itertools::Itertools;
use tracing::instrument;

use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

/// Address of a node relative to an anchor.
///
/// The first step counts siblings to the right of the anchor, every later
/// step is a child index. The anchor itself is `[0]`. Written as dotted
/// indices, e.g. `0.2.1`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    pub fn steps(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(steps: Vec<usize>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("."))
    }
}

impl FromStr for NodePath {
    type Err = TreeError;

    /// Accepts `.` or `/` as separator; the empty string is the empty path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        trimmed
            .split(['.', '/'])
            .map(|step| {
                step.trim()
                    .parse::<usize>()
                    .map_err(|e| TreeError::InvalidPath(format!("{trimmed:?}: step {step:?}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl<T> Tree<T> {
    /// Path of `id` relative to `top`.
    ///
    /// `top` must be an ancestor of `id`, `id` itself, or a previous sibling
    /// of `id` or of one of its ancestors.
    #[instrument(level = "trace", skip(self))]
    pub fn path_from_node(&self, id: NodeId, top: NodeId) -> TreeResult<NodePath> {
        let mut steps = Vec::new();
        let mut walk = id;
        loop {
            let mut num = 0;
            while walk != top {
                match self.prev_sibling(walk) {
                    Some(prev) => {
                        num += 1;
                        walk = prev;
                    }
                    None => break,
                }
            }
            steps.push(num);
            if walk == top {
                break;
            }
            walk = self
                .parent(walk)
                .ok_or(TreeError::Unreachable { node: id, anchor: top })?;
        }
        steps.reverse();
        Ok(NodePath(steps))
    }

    /// Inverse of [`Tree::path_from_node`].
    #[instrument(level = "trace", skip(self))]
    pub fn node_from_path(&self, path: &NodePath, top: NodeId) -> TreeResult<NodeId> {
        let mut walk = top;
        for (step, &siblings) in path.steps().iter().enumerate() {
            if step > 0 {
                walk = self.first_child(walk).ok_or(TreeError::PathOutOfRange {
                    step,
                    reason: "no more nodes",
                })?;
            }
            for _ in 0..siblings {
                walk = self.next_sibling(walk).ok_or(TreeError::PathOutOfRange {
                    step,
                    reason: "out of siblings",
                })?;
            }
        }
        Ok(walk)
    }

    /// Path of `id` from the top level: root index first.
    pub fn path_of(&self, id: NodeId) -> TreeResult<NodePath> {
        let top = self.first_root().ok_or(TreeError::Unreachable { node: id, anchor: id })?;
        self.path_from_node(id, top)
    }

    /// Node at a path taken from the top level.
    pub fn node_at(&self, path: &NodePath) -> TreeResult<NodeId> {
        let top = self.first_root().ok_or(TreeError::PathOutOfRange {
            step: 0,
            reason: "empty tree",
        })?;
        self.node_from_path(path, top)
    }
}
