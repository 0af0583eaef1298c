//! Incremental subtree counters, expand/collapse state and visibility.
//!
//! For every node `n`:
//! - `count(n)` = 1 + sum of `count(c)` over children,
//! - `expandable(n)` = sum of `1 + expandable(c)` over visible children,
//! - `expanded(n)` = sum of `1 + expanded(c)` over visible children while `n`
//!   is expanded, 0 while it is collapsed.
//!
//! The tree totals apply the same sums to the top level, which is always
//! expanded. A visible node never has an invisible ancestor.

pub mod selection;

use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};
use crate::node::NodeId;
use crate::path::NodePath;
use crate::tree::Tree;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Totals {
    pub count: usize,
    pub expandable: usize,
    pub expanded: usize,
}

/// Signed change of a subtree's contribution to its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Delta {
    count: isize,
    expandable: isize,
    expanded: isize,
}

impl Delta {
    pub(crate) fn negate(self) -> Self {
        Self {
            count: -self.count,
            expandable: -self.expandable,
            expanded: -self.expanded,
        }
    }

    fn is_zero(&self) -> bool {
        *self == Delta::default()
    }
}

fn shift(value: usize, delta: isize) -> usize {
    value.saturating_add_signed(delta)
}

impl<T> Tree<T> {
    /// What the subtree at `id` adds to its parent's counters.
    pub(crate) fn contribution(&self, id: NodeId) -> Delta {
        let stats = self.node(id).stats;
        if stats.visible {
            Delta {
                count: stats.count as isize,
                expandable: 1 + stats.expandable as isize,
                expanded: 1 + stats.expanded_count as isize,
            }
        } else {
            Delta {
                count: stats.count as isize,
                ..Delta::default()
            }
        }
    }

    /// Applies `delta` to every ancestor starting at `from`, then to the
    /// totals unless the climb ended at a detached root.
    ///
    /// The expanded delta stops growing past a collapsed ancestor; a
    /// positive visible delta reaching an invisible ancestor reveals it.
    pub(crate) fn propagate(&mut self, from: Option<NodeId>, mut delta: Delta) {
        let mut cur = from;
        let mut top = None;
        while let Some(id) = cur {
            if delta.is_zero() {
                return;
            }
            let stats = &mut self.node_mut(id).stats;
            stats.count = shift(stats.count, delta.count);
            stats.expandable = shift(stats.expandable, delta.expandable);
            let own_expanded = if stats.expanded { delta.expanded } else { 0 };
            stats.expanded_count = shift(stats.expanded_count, own_expanded);

            if !stats.visible && delta.expandable > 0 {
                stats.visible = true;
                delta.expandable = 1 + stats.expandable as isize;
                delta.expanded = 1 + stats.expanded_count as isize;
            } else if !stats.visible {
                delta.expandable = 0;
                delta.expanded = 0;
            } else {
                delta.expanded = own_expanded;
            }
            top = Some(id);
            cur = self.node(id).parent;
        }
        if top.is_some_and(|t| self.detached.contains(&t)) {
            return;
        }
        self.totals.count = shift(self.totals.count, delta.count);
        self.totals.expandable = shift(self.totals.expandable, delta.expandable);
        self.totals.expanded = shift(self.totals.expanded, delta.expanded);
    }

    /// Sums of `(count, expandable, expanded)` contributions over a band.
    fn band_sums(&self, parent: Option<NodeId>) -> (usize, usize, usize) {
        self.band(parent).fold((0, 0, 0), |(count, expandable, expanded), c| {
            let stats = self.node(c).stats;
            if stats.visible {
                (
                    count + stats.count,
                    expandable + 1 + stats.expandable,
                    expanded + 1 + stats.expanded_count,
                )
            } else {
                (count + stats.count, expandable, expanded)
            }
        })
    }

    /// Re-derives every counter from the flags, bottom-up.
    pub(crate) fn recount(&mut self) {
        let order: Vec<NodeId> = self.post_order().map(|(id, _)| id).collect();
        for id in order {
            let (count, expandable, expanded) = self.band_sums(Some(id));
            let stats = &mut self.node_mut(id).stats;
            stats.count = 1 + count;
            stats.expandable = expandable;
            stats.expanded_count = if stats.expanded { expanded } else { 0 };
        }
        let (count, expandable, expanded) = self.band_sums(None);
        self.totals = Totals {
            count,
            expandable,
            expanded,
        };
    }

    pub(crate) fn verify_counters(&self) -> TreeResult<()> {
        let parked = self.detached.iter().flat_map(|&root| self.post_order_from(root));
        for (id, _) in self.post_order().chain(parked) {
            let (count, expandable, expanded) = self.band_sums(Some(id));
            let stats = self.node(id).stats;
            let reason = if stats.count != 1 + count {
                Some("subtree count does not match children")
            } else if stats.expandable != expandable {
                Some("expandable count does not match children")
            } else if stats.expanded_count != if stats.expanded { expanded } else { 0 } {
                Some("expanded count does not match children")
            } else if !stats.visible && expandable > 0 {
                Some("visible descendant below an invisible node")
            } else {
                None
            };
            if let Some(reason) = reason {
                return Err(TreeError::Inconsistent { node: id, reason });
            }
        }
        let (count, expandable, expanded) = self.band_sums(None);
        let totals = Totals {
            count,
            expandable,
            expanded,
        };
        if totals != self.totals {
            if let Some(root) = self.first_root {
                return Err(TreeError::Inconsistent {
                    node: root,
                    reason: "tree totals do not match the roots",
                });
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Counters
    // ------------------------------------------------------------------

    /// Cached number of nodes in the tree.
    pub fn count(&self) -> usize {
        self.totals.count
    }

    pub fn count_of(&self, id: NodeId) -> usize {
        self.node(id).stats.count
    }

    /// Number of nodes shown under the current expand state and filter.
    pub fn count_expanded(&self) -> usize {
        self.totals.expanded
    }

    pub fn count_expanded_of(&self, id: NodeId) -> usize {
        self.node(id).stats.expanded_count
    }

    /// Number of visible nodes, ignoring expand state.
    pub fn count_expandable(&self) -> usize {
        self.totals.expandable
    }

    pub fn count_expandable_of(&self, id: NodeId) -> usize {
        self.node(id).stats.expandable
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.node(id).stats.expanded
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).stats.visible
    }

    /// Expanded flag given to nodes created from now on.
    pub fn set_expand_new(&mut self, expand: bool) {
        self.settings.expand_new = expand;
    }

    // ------------------------------------------------------------------
    // Expand / collapse
    // ------------------------------------------------------------------

    /// Collapses every node; returns the new expanded total.
    #[instrument(level = "debug", skip(self))]
    pub fn collapse_all(&mut self) -> usize {
        let ids: Vec<NodeId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.node_mut(id).stats.expanded = false;
        }
        self.recount();
        self.totals.expanded
    }

    /// Expands every node; returns the new expanded total.
    #[instrument(level = "debug", skip(self))]
    pub fn expand_all(&mut self) -> usize {
        let ids: Vec<NodeId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.node_mut(id).stats.expanded = true;
        }
        self.recount();
        self.totals.expanded
    }

    /// Collapses `id`; returns the new expanded total.
    #[instrument(level = "trace", skip(self))]
    pub fn collapse(&mut self, id: NodeId) -> usize {
        let stats = self.node(id).stats;
        if stats.expanded {
            let node = &mut self.node_mut(id).stats;
            node.expanded = false;
            node.expanded_count = 0;
            if stats.visible {
                let parent = self.node(id).parent;
                self.propagate(
                    parent,
                    Delta {
                        expanded: -(stats.expanded_count as isize),
                        ..Delta::default()
                    },
                );
            }
            self.checkpoint();
        }
        self.totals.expanded
    }

    /// Expands `id`; returns the new expanded total.
    #[instrument(level = "trace", skip(self))]
    pub fn expand(&mut self, id: NodeId) -> usize {
        let stats = self.node(id).stats;
        if !stats.expanded {
            let (_, _, shown) = self.band_sums(Some(id));
            let node = &mut self.node_mut(id).stats;
            node.expanded = true;
            node.expanded_count = shown;
            if stats.visible {
                let parent = self.node(id).parent;
                self.propagate(
                    parent,
                    Delta {
                        expanded: shown as isize,
                        ..Delta::default()
                    },
                );
            }
            self.checkpoint();
        }
        self.totals.expanded
    }

    // ------------------------------------------------------------------
    // Visibility
    // ------------------------------------------------------------------

    /// Shows exactly the nodes matching `predicate` plus their ancestors, and
    /// expands every node with children; returns the new expanded total.
    #[instrument(level = "debug", skip(self, predicate))]
    pub fn filter(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let order: Vec<NodeId> = self.post_order().map(|(id, _)| id).collect();
        for id in order {
            let shown_below = self.band(Some(id)).any(|c| self.node(c).stats.visible);
            let has_children = self.node(id).first_child.is_some();
            let node = self.node_mut(id);
            let matched = predicate(&node.data);
            node.stats.visible = shown_below || matched;
            node.stats.expanded = has_children;
        }
        self.recount();
        self.selection.clear();
        debug!(shown = self.totals.expanded, "filter applied");
        self.checkpoint();
        self.totals.expanded
    }

    /// Sets the visible flag of every node at once.
    #[instrument(level = "debug", skip(self))]
    pub fn filter_all(&mut self, visible: bool) {
        let ids: Vec<NodeId> = self.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.node_mut(id).stats.visible = visible;
        }
        self.recount();
        self.selection.clear();
    }

    /// True if `id` is yielded by the expanded traversal.
    pub fn is_shown(&self, id: NodeId) -> bool {
        if !self.node(id).stats.visible {
            return false;
        }
        let mut cur = self.node(id).parent;
        while let Some(a) = cur {
            let stats = self.node(a).stats;
            if !stats.visible || !stats.expanded {
                return false;
            }
            cur = self.node(a).parent;
        }
        true
    }

    /// Position of `id` in the expanded traversal, `None` when it is hidden.
    pub fn expanded_index(&self, id: NodeId) -> Option<usize> {
        if !self.is_shown(id) {
            return None;
        }
        Some(self.expanded().take_while(|(cur, _)| *cur != id).count())
    }

    /// Path of `id` counting only visible siblings at each level, from the
    /// top-level band down.
    pub fn expanded_path(&self, id: NodeId) -> NodePath {
        let mut steps = Vec::new();
        let mut cur = Some(id);
        while let Some(c) = cur {
            let mut count = 0;
            let mut left = self.node(c).prev_sibling;
            while let Some(l) = left {
                if self.node(l).stats.visible {
                    count += 1;
                }
                left = self.node(l).prev_sibling;
            }
            steps.push(count);
            cur = self.node(c).parent;
        }
        steps.reverse();
        NodePath::from(steps)
    }
}
