//! Selection of expanded-traversal indices stored as closed ranges.

use std::collections::BTreeMap;
use tracing::instrument;

use crate::node::NodeId;
use crate::tree::Tree;

/// How a toggle combines with the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionAction {
    /// Select exactly the toggled index.
    Replace,
    /// Flip the toggled index, keeping everything else.
    ExtendToggle,
    /// Add every index between `origin` and the toggled one, both included.
    RangeExtend { origin: usize },
}

/// Ordered set of disjoint, non-adjacent closed ranges, keyed by range start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ranges: BTreeMap<usize, usize>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Number of selected indices.
    pub fn len(&self) -> usize {
        self.ranges.iter().map(|(begin, end)| end - begin + 1).sum()
    }

    /// Selected ranges as `(begin, end)`, both inclusive, in ascending order.
    pub fn ranges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.ranges.iter().map(|(&begin, &end)| (begin, end))
    }

    pub fn contains(&self, index: usize) -> bool {
        self.ranges
            .range(..=index)
            .next_back()
            .is_some_and(|(_, &end)| index <= end)
    }

    pub fn first(&self) -> Option<usize> {
        self.ranges.keys().next().copied()
    }

    pub fn clear(&mut self) {
        self.ranges.clear();
    }

    pub(crate) fn apply(&mut self, index: usize, action: SelectionAction) {
        match action {
            SelectionAction::Replace => {
                self.ranges.clear();
                self.ranges.insert(index, index);
            }
            SelectionAction::ExtendToggle => {
                if self.contains(index) {
                    self.remove_index(index);
                } else {
                    self.insert_range(index, index);
                }
            }
            SelectionAction::RangeExtend { origin } => {
                self.insert_range(origin.min(index), origin.max(index));
            }
        }
        self.normalize();
    }

    pub(crate) fn insert_range(&mut self, begin: usize, end: usize) {
        self.ranges
            .entry(begin)
            .and_modify(|e| *e = (*e).max(end))
            .or_insert(end);
    }

    fn remove_index(&mut self, index: usize) {
        let Some((&begin, &end)) = self.ranges.range(..=index).next_back() else {
            return;
        };
        if index > end {
            return;
        }
        self.ranges.remove(&begin);
        if begin < index {
            self.ranges.insert(begin, index - 1);
        }
        if index < end {
            self.ranges.insert(index + 1, end);
        }
    }

    /// Merges ranges that overlap, nest or touch.
    fn normalize(&mut self) {
        let mut merged: BTreeMap<usize, usize> = BTreeMap::new();
        let mut open: Option<(usize, usize)> = None;
        for (&begin, &end) in &self.ranges {
            open = match open {
                Some((b, e)) if begin <= e.saturating_add(1) => Some((b, e.max(end))),
                Some((b, e)) => {
                    merged.insert(b, e);
                    Some((begin, end))
                }
                None => Some((begin, end)),
            };
        }
        if let Some((b, e)) = open {
            merged.insert(b, e);
        }
        self.ranges = merged;
    }
}

impl<T> Tree<T> {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn multiple_selection(&self) -> bool {
        self.settings.multiple_selection
    }

    /// Switching to single selection keeps only the lowest selected index.
    pub fn set_multiple_selection(&mut self, multiple: bool) {
        self.settings.multiple_selection = multiple;
        if !multiple {
            if let Some(first) = self.selection.first() {
                self.selection.apply(first, SelectionAction::Replace);
            }
        }
    }

    /// Updates the selection for a click on expanded index `index`.
    ///
    /// Without multiple selection every action behaves as `Replace`.
    #[instrument(level = "trace", skip(self))]
    pub fn toggle(&mut self, index: usize, action: SelectionAction) {
        let action = if self.settings.multiple_selection {
            action
        } else {
            SelectionAction::Replace
        };
        self.selection.apply(index, action);
    }

    /// Selects every shown node; only with multiple selection enabled.
    pub fn select_all(&mut self) {
        if self.settings.multiple_selection && self.totals.expanded > 0 {
            self.selection.clear();
            self.selection.insert_range(0, self.totals.expanded - 1);
        }
    }

    pub fn unselect(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(index)
    }

    /// True if `id` is shown and its expanded index is selected.
    pub fn is_node_selected(&self, id: NodeId) -> bool {
        self.expanded_index(id)
            .is_some_and(|index| self.selection.contains(index))
    }
}
