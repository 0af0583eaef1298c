use tracing::{instrument, trace};

use super::{BidiCursor, Cursor, CursorCore};
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::tree::Tree;

/// Visits the nodes at one depth below an anchor, left to right.
///
/// The walk never crosses or climbs past `top`; `top == None` allows it to
/// roam the whole top level.
#[derive(Debug, Clone, Default)]
pub struct FixedDepth {
    core: CursorCore,
    top: Option<NodeId>,
}

impl PartialEq for FixedDepth {
    fn eq(&self, other: &Self) -> bool {
        self.core.node == other.core.node && self.top == other.top
    }
}

impl Eq for FixedDepth {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// Moving to the parent of the current node.
    Climbing,
    /// Moving to the neighbouring sibling at the current level.
    Crossing,
    /// Moving down along first (or last) children until the target depth.
    Descending,
    Exhausted,
}

impl Direction {
    fn sibling<T>(self, tree: &Tree<T>, node: NodeId) -> Option<NodeId> {
        match self {
            Direction::Forward => tree.next_sibling(node),
            Direction::Backward => tree.prev_sibling(node),
        }
    }

    fn child<T>(self, tree: &Tree<T>, node: NodeId) -> Option<NodeId> {
        match self {
            Direction::Forward => tree.first_child(node),
            Direction::Backward => tree.last_child(node),
        }
    }
}

/// Runs the climb / cross / descend machine from `node`, which sits `below`
/// levels above the target depth, starting in `step`.
fn run<T>(
    tree: &Tree<T>,
    top: Option<NodeId>,
    direction: Direction,
    mut node: NodeId,
    mut below: usize,
    mut step: Step,
) -> Option<NodeId> {
    loop {
        step = match step {
            Step::Crossing => {
                if Some(node) == top {
                    Step::Exhausted
                } else if let Some(next) = direction.sibling(tree, node) {
                    node = next;
                    Step::Descending
                } else {
                    Step::Climbing
                }
            }
            Step::Climbing => match tree.parent(node) {
                Some(parent) => {
                    node = parent;
                    below += 1;
                    Step::Crossing
                }
                None => Step::Exhausted,
            },
            Step::Descending => {
                if below == 0 {
                    return Some(node);
                }
                match direction.child(tree, node) {
                    Some(child) => {
                        node = child;
                        below -= 1;
                        Step::Descending
                    }
                    None => Step::Crossing,
                }
            }
            Step::Exhausted => return None,
        };
    }
}

impl FixedDepth {
    pub fn new(node: Option<NodeId>, top: Option<NodeId>) -> Self {
        Self {
            core: CursorCore::at(node),
            top,
        }
    }

    pub fn top(&self) -> Option<NodeId> {
        self.top
    }

    fn step<T>(&mut self, tree: &Tree<T>, direction: Direction) -> TreeResult<NodeId> {
        self.core.skip_children = false;
        let Some(node) = self.core.node else {
            return Err(TreeError::FixedDepthExhausted { last: None });
        };
        match run(tree, self.top, direction, node, 0, Step::Crossing) {
            Some(next) => {
                self.core.node = Some(next);
                Ok(next)
            }
            None => {
                self.core.node = None;
                Err(TreeError::FixedDepthExhausted { last: Some(node) })
            }
        }
    }

    /// Moves right; `FixedDepthExhausted` once no node is left at this depth.
    pub fn try_advance<T>(&mut self, tree: &Tree<T>) -> TreeResult<NodeId> {
        self.step(tree, Direction::Forward)
    }

    /// Moves left; `FixedDepthExhausted` once no node is left at this depth.
    pub fn try_retreat<T>(&mut self, tree: &Tree<T>) -> TreeResult<NodeId> {
        self.step(tree, Direction::Backward)
    }
}

impl Cursor for FixedDepth {
    fn core(&self) -> &CursorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut CursorCore {
        &mut self.core
    }

    /// Moves to the ghost once the depth is exhausted.
    fn advance<T>(&mut self, tree: &Tree<T>) {
        if self.core.node.is_some() {
            if let Err(e) = self.try_advance(tree) {
                trace!(%e, "fixed-depth walk ended");
            }
        }
    }
}

impl BidiCursor for FixedDepth {
    fn retreat<T>(&mut self, tree: &Tree<T>) {
        if self.core.node.is_some() {
            if let Err(e) = self.try_retreat(tree) {
                trace!(%e, "fixed-depth walk ended");
            }
        }
    }
}

impl<T> Tree<T> {
    /// First node `depth` levels below `anchor`.
    ///
    /// With `walk_back` and `depth == 0` the cursor starts on the first
    /// sibling of `anchor` and walks the anchor's whole band.
    #[instrument(level = "trace", skip(self))]
    pub fn begin_fixed(&self, anchor: NodeId, depth: usize, walk_back: bool) -> TreeResult<FixedDepth> {
        if depth == 0 {
            return Ok(if walk_back {
                let parent = self.parent(anchor);
                FixedDepth::new(self.band_first(parent), parent)
            } else {
                FixedDepth::new(Some(anchor), Some(anchor))
            });
        }
        match run(self, Some(anchor), Direction::Forward, anchor, depth, Step::Descending) {
            Some(node) => Ok(FixedDepth::new(Some(node), Some(anchor))),
            None => Err(TreeError::DepthOutOfRange { anchor, depth }),
        }
    }

    pub fn end_fixed(&self, anchor: NodeId) -> FixedDepth {
        FixedDepth::new(None, Some(anchor))
    }

    /// Next node at the same depth as `id`, searching the whole tree.
    pub fn next_at_same_depth(&self, id: NodeId) -> TreeResult<NodeId> {
        FixedDepth::new(Some(id), None).try_advance(self)
    }

    /// Previous node at the same depth as `id`, searching the whole tree.
    pub fn previous_at_same_depth(&self, id: NodeId) -> TreeResult<NodeId> {
        FixedDepth::new(Some(id), None).try_retreat(self)
    }
}
