//! Reconciliation engine: work loop, child diffing and commit.
//!
//! # Architecture: Render/Commit Separation
//!
//! ```text
//! perform_unit_of_work(fiber) -> next fiber   // resumable, no visible mutation
//!       |  (reconcile_children builds child/sibling links + deletion list)
//!       v
//! commit_root(wip)                            // runs to completion
//! ```
//!
//! The render phase only builds the work-in-progress tree. Host nodes it
//! creates stay detached until commit, so a pending render can be paused or
//! thrown away without the document ever showing part of it.
//!
//! # Algorithm
//!
//! 1. Walk fibers depth-first, one unit at a time
//! 2. Match each fiber's new children against the alternate's children by
//!    position and type
//! 3. Tag each new child `Placement` or `Update`; collect unmatched old
//!    fibers into the deletion list
//! 4. Commit deletions, then every tagged fiber in pre-order
//!
//! # Complexity
//!
//! - Time: O(n) per render, where n = max(old, new) fiber count
//! - Space: one extra tree while a render is pending

mod commit;
mod diff;
mod work;

#[cfg(test)]
mod tests;

pub(crate) use commit::{commit_root, remove_subtree};
pub(crate) use diff::reconcile_children;
pub(crate) use work::perform_unit_of_work;

use crate::fiber::FiberId;

/// Statistics from one render and commit
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RenderStats {
    /// Number of units of work performed
    pub units_of_work: usize,
    /// Number of fibers committed with `Placement`
    pub placements: usize,
    /// Number of fibers committed with `Update`
    pub updates: usize,
    /// Number of old fibers deleted (subtree roots only)
    pub deletions: usize,
    /// Number of fibers dropped from the arena after commit
    pub fibers_released: usize,
}

impl RenderStats {
    /// Check if the commit changed the document's structure.
    pub fn has_structural_changes(&self) -> bool {
        self.placements > 0 || self.deletions > 0
    }
}

/// A render that has been scheduled but not yet committed.
#[derive(Debug)]
pub(crate) struct WorkInProgress {
    /// Root record of the work-in-progress tree
    pub root: FiberId,
    /// Next fiber to process; `None` once the tree is complete
    pub next_unit: Option<FiberId>,
    /// Old fibers to remove at commit
    pub deletions: Vec<FiberId>,
    pub stats: RenderStats,
}

impl WorkInProgress {
    pub fn new(root: FiberId) -> Self {
        Self {
            root,
            next_unit: Some(root),
            deletions: Vec::new(),
            stats: RenderStats::default(),
        }
    }

    /// Check if every unit has been performed.
    pub fn is_complete(&self) -> bool {
        self.next_unit.is_none()
    }
}
