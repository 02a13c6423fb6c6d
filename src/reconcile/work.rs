//! Work loop step function.

use crate::config::ReconcilerConfig;
use crate::element::Component;
use crate::error::{RenderError, RenderResult};
use crate::fiber::{FiberId, FiberTree};
use crate::host::{create_dom, HostDocument};

use super::{reconcile_children, WorkInProgress};

/// Perform one unit of work on `id` and return the next unit, if any.
///
/// Component fibers are rendered and their single output reconciled as
/// their children. Host fibers get a (detached) host node if they lack one,
/// then their element children are reconciled. Nothing is attached to the
/// document here.
pub(crate) fn perform_unit_of_work<D: HostDocument>(
    tree: &mut FiberTree<D::Node>,
    wip: &mut WorkInProgress,
    doc: &mut D,
    config: &ReconcilerConfig,
    id: FiberId,
) -> RenderResult<Option<FiberId>> {
    let fiber = &tree[id];
    if fiber.depth > config.max_depth {
        return Err(RenderError::DepthExceeded {
            depth: fiber.depth,
            limit: config.max_depth,
        });
    }
    tracing::trace!(fiber = ?id, ty = fiber.name(), depth = fiber.depth, "perform unit of work");
    wip.stats.units_of_work += 1;

    let component = fiber.component().cloned();
    match component {
        Some(component) => update_function_component(tree, wip, id, &component)?,
        None => update_host_component(tree, wip, doc, id)?,
    }

    Ok(tree.next_in_subtree(id, wip.root))
}

fn update_function_component<N: Clone>(
    tree: &mut FiberTree<N>,
    wip: &mut WorkInProgress,
    id: FiberId,
    component: &Component,
) -> RenderResult<()> {
    let props = tree[id].props.clone();
    let child = component.call(&props)?;
    reconcile_children(tree, &mut wip.deletions, id, std::slice::from_ref(&child));
    Ok(())
}

fn update_host_component<D: HostDocument>(
    tree: &mut FiberTree<D::Node>,
    wip: &mut WorkInProgress,
    doc: &mut D,
    id: FiberId,
) -> RenderResult<()> {
    let fiber = &tree[id];
    let created = match (&fiber.dom, &fiber.ty) {
        (None, Some(ty)) => Some(create_dom(doc, ty, &fiber.props)?),
        _ => None,
    };
    if created.is_some() {
        tree[id].dom = created;
    }

    let props = tree[id].props.clone();
    reconcile_children(tree, &mut wip.deletions, id, &props.children);
    Ok(())
}
