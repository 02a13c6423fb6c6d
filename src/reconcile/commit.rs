//! Commit phase: apply a finished work-in-progress tree to the host.

use crate::error::{RenderError, RenderResult};
use crate::fiber::{EffectTag, FiberId, FiberTree};
use crate::host::{update_dom, HostDocument};

use super::{RenderStats, WorkInProgress};

/// Apply every effect of `wip` to `doc`.
///
/// Deletions run first, then the work-in-progress tree is walked in
/// pre-order and each fiber's effect is consumed. Runs to completion;
/// the first host failure is returned as is.
pub(crate) fn commit_root<D: HostDocument>(
    tree: &mut FiberTree<D::Node>,
    doc: &mut D,
    wip: &mut WorkInProgress,
) -> RenderResult<()> {
    for &old in &wip.deletions {
        commit_deletion(tree, doc, old)?;
        wip.stats.deletions += 1;
    }

    let root = wip.root;
    let mut next = tree[root].child;
    while let Some(id) = next {
        commit_work(tree, doc, id, &mut wip.stats)?;
        next = tree.next_in_subtree(id, root);
    }
    Ok(())
}

fn commit_work<D: HostDocument>(
    tree: &mut FiberTree<D::Node>,
    doc: &mut D,
    id: FiberId,
    stats: &mut RenderStats,
) -> RenderResult<()> {
    let Some(effect) = tree[id].effect.take() else {
        return Ok(());
    };
    let fiber = &tree[id];
    tracing::trace!(fiber = ?id, ty = fiber.name(), ?effect, "commit");

    match effect {
        EffectTag::Placement => {
            stats.placements += 1;
            if let (Some(dom), Some(parent)) = (&fiber.dom, host_parent(tree, id)) {
                doc.append_child(parent, dom).map_err(RenderError::document)?;
            }
        }
        EffectTag::Update => {
            stats.updates += 1;
            let prev = fiber.alternate.and_then(|alt| tree.get(alt));
            debug_assert!(prev.is_some(), "update fiber {id:?} lost its alternate");
            if let (Some(dom), Some(prev)) = (&fiber.dom, prev) {
                update_dom(doc, dom, &prev.props, &fiber.props)?;
            }
        }
        EffectTag::Deletion => {
            stats.deletions += 1;
            commit_deletion(tree, doc, id)?;
        }
    }
    Ok(())
}

/// Remove the host nodes of the old fiber `id` from its host parent.
fn commit_deletion<D: HostDocument>(
    tree: &FiberTree<D::Node>,
    doc: &mut D,
    id: FiberId,
) -> RenderResult<()> {
    match host_parent(tree, id) {
        Some(parent) => remove_subtree(tree, doc, id, parent),
        None => Ok(()),
    }
}

/// Remove the topmost host nodes under `id` from `parent` and release them.
///
/// A fiber with a node is removed whole. A component fiber has no node of
/// its own, so the removal descends into its children. A component that
/// rendered nothing removes nothing.
pub(crate) fn remove_subtree<D: HostDocument>(
    tree: &FiberTree<D::Node>,
    doc: &mut D,
    id: FiberId,
    parent: &D::Node,
) -> RenderResult<()> {
    if let Some(dom) = &tree[id].dom {
        doc.remove_child(parent, dom).map_err(RenderError::document)?;
        doc.release_node(dom);
        return Ok(());
    }
    for child in tree.children(id) {
        remove_subtree(tree, doc, child, parent)?;
    }
    Ok(())
}

fn host_parent<N>(tree: &FiberTree<N>, id: FiberId) -> Option<&N> {
    let parent = tree.host_parent(id);
    debug_assert!(parent.is_some(), "fiber {id:?} has no host ancestor");
    parent
}
