//! Positional child reconciliation.

use crate::element::Element;
use crate::fiber::{EffectTag, Fiber, FiberId, FiberTree};

/// Build `wip_id`'s child fibers from `elements`.
///
/// Walks the new elements and the alternate's old children in lockstep.
/// At each position:
///
/// - same type: new fiber reusing the old host node, tagged `Update`
/// - new element only, or type changed: fresh fiber tagged `Placement`
/// - old fiber without a same-type match: pushed onto `deletions`
///
/// Old fibers are never modified. No keys and no move detection.
pub(crate) fn reconcile_children<N: Clone>(
    tree: &mut FiberTree<N>,
    deletions: &mut Vec<FiberId>,
    wip_id: FiberId,
    elements: &[Element],
) {
    let depth = tree[wip_id].depth + 1;
    let mut old = tree[wip_id].alternate.and_then(|alt| tree[alt].child);
    let mut elements = elements.iter();
    let mut prev: Option<FiberId> = None;

    loop {
        let element = elements.next();
        if element.is_none() && old.is_none() {
            break;
        }

        let same_type = match (old, element) {
            (Some(o), Some(e)) => tree[o].ty.as_ref() == Some(&e.ty),
            _ => false,
        };

        let new_fiber = match (old, element) {
            (Some(o), Some(e)) if same_type => Some(update_fiber(tree, o, e, wip_id, depth)),
            (_, Some(e)) => Some(placement_fiber(tree, e, wip_id, depth)),
            (_, None) => None,
        };

        if let Some(o) = old.filter(|_| !same_type) {
            tracing::trace!(fiber = ?o, ty = tree[o].name(), "schedule deletion");
            deletions.push(o);
        }
        old = old.and_then(|o| tree[o].sibling);

        if let Some(fiber) = new_fiber {
            match prev {
                None => tree[wip_id].child = Some(fiber),
                Some(p) => tree[p].sibling = Some(fiber),
            }
            prev = Some(fiber);
        }
    }
}

fn update_fiber<N: Clone>(
    tree: &mut FiberTree<N>,
    old: FiberId,
    element: &Element,
    parent: FiberId,
    depth: usize,
) -> FiberId {
    let mut fiber = Fiber::for_element(element, parent, depth);
    fiber.dom = tree[old].dom.clone();
    fiber.alternate = Some(old);
    fiber.effect = Some(EffectTag::Update);
    tree.insert(fiber)
}

fn placement_fiber<N>(
    tree: &mut FiberTree<N>,
    element: &Element,
    parent: FiberId,
    depth: usize,
) -> FiberId {
    let mut fiber = Fiber::for_element(element, parent, depth);
    fiber.effect = Some(EffectTag::Placement);
    tree.insert(fiber)
}
