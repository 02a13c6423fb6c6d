//! Render roots: the public entry point.
//!
//! A [`Root`] owns a container node and the fiber arena for everything
//! rendered into it. Rendering is split into a resumable work loop and an
//! uninterruptible commit:
//!
//! ```text
//! schedule(element)        // new work-in-progress root, alternate = current
//! perform_unit / tick      // one or more units of work
//! commit                   // apply effects, swap current
//! ```
//!
//! [`Root::render`] runs all three synchronously.
//!
//! A commit that fails partway leaves the document matching neither tree.
//! The root then forgets both trees and the next commit first removes their
//! top-level nodes from the container and mounts the new tree from scratch.

use crate::config::ReconcilerConfig;
use crate::element::Element;
use crate::error::{RenderError, RenderResult};
use crate::fiber::{Fiber, FiberId, FiberTree};
use crate::host::HostDocument;
use crate::reconcile::{
    commit_root, perform_unit_of_work, remove_subtree, RenderStats, WorkInProgress,
};
use crate::scheduler::{Deadline, UnitBudget, Unbounded, WorkStatus};

/// Create a root that renders into `container`.
pub fn create_root<D: HostDocument>(container: D::Node) -> Root<D> {
    Root::new(container)
}

/// Render state for one container.
pub struct Root<D: HostDocument> {
    container: D::Node,
    tree: FiberTree<D::Node>,
    current: Option<FiberId>,
    wip: Option<WorkInProgress>,
    config: ReconcilerConfig,
    /// Top-level nodes left behind by a failed commit
    stale: Vec<D::Node>,
    /// Nodes no fiber refers to any more, awaiting release
    detached: Vec<D::Node>,
}

impl<D: HostDocument> Root<D> {
    /// Create a root with default configuration.
    pub fn new(container: D::Node) -> Self {
        Self::with_config(container, ReconcilerConfig::default())
    }

    /// Create a root with custom configuration.
    pub fn with_config(container: D::Node, config: ReconcilerConfig) -> Self {
        Self {
            container,
            tree: FiberTree::new(),
            current: None,
            wip: None,
            config,
            stale: Vec::new(),
            detached: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The container node.
    pub fn container(&self) -> &D::Node {
        &self.container
    }

    /// Active configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// The fiber arena.
    pub fn tree(&self) -> &FiberTree<D::Node> {
        &self.tree
    }

    /// Root record of the last committed tree.
    pub fn current_root(&self) -> Option<FiberId> {
        self.current
    }

    /// Root record of the pending render.
    pub fn work_in_progress(&self) -> Option<FiberId> {
        self.wip.as_ref().map(|wip| wip.root)
    }

    /// Check if a failed commit left the document out of sync with every
    /// tree. Cleared by the next successful commit.
    pub fn is_diverged(&self) -> bool {
        !self.stale.is_empty()
    }

    /// State of the pending render.
    pub fn status(&self) -> WorkStatus {
        match &self.wip {
            None => WorkStatus::Idle,
            Some(wip) if wip.is_complete() => WorkStatus::Ready,
            Some(_) => WorkStatus::Pending,
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render `element` into the container and commit, synchronously.
    ///
    /// A render already in progress is discarded first.
    pub fn render(&mut self, doc: &mut D, element: Element) -> RenderResult<RenderStats> {
        self.schedule(element);
        self.work_until(doc, Unbounded)?;
        self.commit(doc)
    }

    /// Start a new render of `element`. No work is performed yet.
    ///
    /// A render already in progress is discarded.
    pub fn schedule(&mut self, element: Element) {
        if self.cancel() {
            tracing::debug!("discarded uncommitted render");
        }
        tracing::debug!(element = element.ty.name(), "render scheduled");
        let fiber = Fiber::root(self.container.clone(), element, self.current);
        let root = self.tree.insert(fiber);
        self.wip = Some(WorkInProgress::new(root));
    }

    /// Perform a single unit of work.
    ///
    /// On error the pending render is discarded and the committed tree is
    /// left as it was.
    pub fn perform_unit(&mut self, doc: &mut D) -> RenderResult<WorkStatus> {
        let Some(wip) = self.wip.as_mut() else {
            return Ok(WorkStatus::Idle);
        };
        let Some(unit) = wip.next_unit else {
            return Ok(WorkStatus::Ready);
        };

        match perform_unit_of_work(&mut self.tree, wip, doc, &self.config, unit) {
            Ok(next) => {
                wip.next_unit = next;
                Ok(self.status())
            }
            Err(err) => {
                tracing::debug!(error = %err, "render failed; discarding work in progress");
                self.discard();
                Err(err)
            }
        }
    }

    /// Perform units until the work loop completes or `deadline` says yield.
    pub fn work_until(
        &mut self,
        doc: &mut D,
        mut deadline: impl Deadline,
    ) -> RenderResult<WorkStatus> {
        loop {
            let status = self.status();
            if !status.is_pending() || deadline.should_yield() {
                return Ok(status);
            }
            self.perform_unit(doc)?;
        }
    }

    /// One scheduler callback: work until `deadline`, then commit if the
    /// work loop finished.
    ///
    /// Returns the commit stats, or `None` if work remains (or nothing was
    /// scheduled).
    pub fn tick(
        &mut self,
        doc: &mut D,
        deadline: impl Deadline,
    ) -> RenderResult<Option<RenderStats>> {
        match self.work_until(doc, deadline)? {
            WorkStatus::Ready => self.commit(doc).map(Some),
            WorkStatus::Idle | WorkStatus::Pending => Ok(None),
        }
    }

    /// [`tick`](Self::tick) with a budget of `config.slice_units` units.
    pub fn tick_slice(&mut self, doc: &mut D) -> RenderResult<Option<RenderStats>> {
        let budget = UnitBudget::new(self.config.slice_units);
        self.tick(doc, budget)
    }

    /// Commit a finished render.
    ///
    /// Fails with [`RenderError::NoWorkInProgress`] or
    /// [`RenderError::WorkPending`] when there is nothing ready. If a host
    /// operation fails mid-commit, the root becomes diverged: both trees are
    /// dropped and the next commit remounts into a cleaned container.
    pub fn commit(&mut self, doc: &mut D) -> RenderResult<RenderStats> {
        match self.status() {
            WorkStatus::Idle => return Err(RenderError::NoWorkInProgress),
            WorkStatus::Pending => return Err(RenderError::WorkPending),
            WorkStatus::Ready => {}
        }
        let Some(mut wip) = self.wip.take() else {
            return Err(RenderError::NoWorkInProgress);
        };

        self.flush_released(doc);
        if let Err(err) = commit_root(&mut self.tree, doc, &mut wip) {
            tracing::error!(error = %err, "commit failed; remounting on next commit");
            self.diverge(wip.root);
            return Err(err);
        }

        self.current = Some(wip.root);
        wip.stats.fibers_released = self.tree.retain_tree(wip.root);
        tracing::debug!(
            units = wip.stats.units_of_work,
            placements = wip.stats.placements,
            updates = wip.stats.updates,
            deletions = wip.stats.deletions,
            released = wip.stats.fibers_released,
            "committed"
        );
        Ok(wip.stats)
    }

    /// Discard the pending render, if any. Returns `true` if one existed.
    ///
    /// Host nodes created for the discarded render are never attached.
    pub fn cancel(&mut self) -> bool {
        let Some(wip) = self.wip.take() else {
            return false;
        };
        self.drop_work_in_progress(wip.root);
        true
    }

    /// Remove everything rendered into the container.
    ///
    /// Discards any pending render. The root can be rendered into again.
    pub fn unmount(&mut self, doc: &mut D) -> RenderResult<()> {
        self.cancel();
        let Some(current) = self.current.take() else {
            self.flush_released(doc);
            return Ok(());
        };
        let children: Vec<FiberId> = self.tree.children(current).collect();
        let result = children
            .into_iter()
            .try_for_each(|child| remove_subtree(&self.tree, doc, child, &self.container));
        self.tree.clear();
        self.flush_released(doc);
        tracing::debug!("unmounted");
        result
    }

    fn discard(&mut self) {
        if let Some(wip) = self.wip.take() {
            self.drop_work_in_progress(wip.root);
        }
    }

    /// Drop every fiber that is not part of the committed tree. Nodes created
    /// for the dropped render were never attached and are queued for release.
    fn drop_work_in_progress(&mut self, root: FiberId) {
        let created = self.tree.created_nodes(root);
        self.detached.extend(created);
        match self.current {
            Some(current) => {
                self.tree.retain_tree(current);
            }
            None => self.tree.clear(),
        }
    }

    /// Forget both trees after a failed commit of `failed`.
    fn diverge(&mut self, failed: FiberId) {
        let mut stale = self
            .current
            .map(|current| self.tree.top_host_nodes(current))
            .unwrap_or_default();
        stale.extend(self.tree.top_host_nodes(failed));
        for node in stale {
            if !self.stale.contains(&node) {
                self.stale.push(node);
            }
        }
        for node in self.tree.created_nodes(failed) {
            if !self.stale.contains(&node) && !self.detached.contains(&node) {
                self.detached.push(node);
            }
        }
        self.current = None;
        self.tree.clear();
    }

    /// Remove stale nodes from the container and release every node the
    /// fibers no longer refer to. Failures are expected for nodes a failed
    /// commit already removed, and are ignored.
    fn flush_released(&mut self, doc: &mut D) {
        for node in std::mem::take(&mut self.stale) {
            if let Err(err) = doc.remove_child(&self.container, &node) {
                tracing::trace!(?node, error = %err, "stale node already detached");
            }
            doc.release_node(&node);
        }
        for node in std::mem::take(&mut self.detached) {
            doc.release_node(&node);
        }
    }
}

impl<D: HostDocument> std::fmt::Debug for Root<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("container", &self.container)
            .field("fibers", &self.tree.len())
            .field("current", &self.current)
            .field("status", &self.status())
            .field("diverged", &self.is_diverged())
            .finish()
    }
}
