use generational_arena::Index;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Identity of one [`Tree`](crate::Tree) instance, stamped into every id it
/// hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TreeTag(u32);

impl TreeTag {
    pub(crate) fn fresh() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(0);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a node inside one [`Tree`](crate::Tree).
///
/// Ids are generation-tagged: once a node is freed, its id never resolves to
/// a node allocated later in the same slot. They also name the tree that
/// allocated them, so an id handed to another tree is rejected instead of
/// resolving to whatever sits in the same slot there.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) tree: TreeTag,
    pub(crate) index: Index,
}

impl NodeId {
    pub(crate) fn new(tree: TreeTag, index: Index) -> Self {
        Self { tree, index }
    }

    /// Arena slot and generation, mostly useful in diagnostics.
    pub fn into_raw_parts(self) -> (usize, u64) {
        self.index.into_raw_parts()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.index.into_raw_parts();
        write!(f, "NodeId({slot}v{generation}@t{})", self.tree.0)
    }
}

/// Counters and flags maintained incrementally by the bookkeeping feature.
#[cfg(feature = "bookkeeping")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stats {
    /// Nodes in this subtree, this node included.
    pub count: usize,
    /// Visible descendants reachable through visible parents.
    pub expandable: usize,
    /// Visible descendants shown under the current expand state; zero when collapsed.
    pub expanded_count: usize,
    pub expanded: bool,
    pub visible: bool,
}

#[cfg(feature = "bookkeeping")]
impl Stats {
    pub(crate) fn leaf(expanded: bool, visible: bool) -> Self {
        Self {
            count: 1,
            expandable: 0,
            expanded_count: 0,
            expanded,
            visible,
        }
    }
}

/// Node record: a value slot plus the five structural links.
///
/// Root nodes have no parent; their sibling links chain the top level.
#[derive(Debug)]
pub(crate) struct Node<T> {
    pub data: T,
    pub parent: Option<NodeId>,
    pub first_child: Option<NodeId>,
    pub last_child: Option<NodeId>,
    pub prev_sibling: Option<NodeId>,
    pub next_sibling: Option<NodeId>,
    #[cfg(feature = "bookkeeping")]
    pub stats: Stats,
}

impl<T> Node<T> {
    pub(crate) fn unlinked(data: T) -> Self {
        Self {
            data,
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
            #[cfg(feature = "bookkeeping")]
            stats: Stats::leaf(true, true),
        }
    }
}
