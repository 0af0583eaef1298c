use std::collections::VecDeque;

use super::{Cursor, CursorCore};
use crate::node::NodeId;
use crate::tree::Tree;

/// Level by level, driven by a FIFO queue. Forward only.
#[derive(Debug, Clone, Default)]
pub struct BreadthFirst {
    core: CursorCore,
    queue: VecDeque<NodeId>,
}

impl PartialEq for BreadthFirst {
    fn eq(&self, other: &Self) -> bool {
        self.core.node == other.core.node
    }
}

impl Eq for BreadthFirst {}

impl BreadthFirst {
    pub fn new(start: Option<NodeId>) -> Self {
        Self::seeded(start)
    }

    /// Queue seeded with several starting nodes, visited in order.
    pub fn seeded(starts: impl IntoIterator<Item = NodeId>) -> Self {
        let queue: VecDeque<NodeId> = starts.into_iter().collect();
        Self {
            core: CursorCore::at(queue.front().copied()),
            queue,
        }
    }
}

impl Cursor for BreadthFirst {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    /// Skipping children keeps the current node's children out of the queue.
    fn advance<T>(&mut self, tree: &Tree<T>) {
        let Some(current) = self.queue.pop_front() else {
            self.core.node = None;
            return;
        };
        if !self.core.take_skip() {
            self.queue.extend(tree.children(current).map(|(child, _)| child));
        }
        self.core.node = self.queue.front().copied();
    }
}

impl<T> Tree<T> {
    /// Breadth-first over the whole tree: all roots, then their children, ...
    pub fn begin_breadth_first(&self) -> BreadthFirst {
        BreadthFirst::seeded(self.roots().map(|(root, _)| root))
    }

    pub fn end_breadth_first(&self) -> BreadthFirst {
        BreadthFirst::default()
    }
}
