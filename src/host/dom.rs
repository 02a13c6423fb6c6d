//! Host node materialization.
//!
//! `create_dom` allocates the host node for a fiber, `update_dom` diffs two
//! prop sets onto an existing node. The four passes of `update_dom` run in a
//! fixed order: stale listeners are removed before any new listener is
//! attached, so replacing a handler never leaves both registered.

use crate::element::{event_type, ElementType, Props};
use crate::error::{RenderError, RenderResult};

use super::HostDocument;

/// Allocate a host node for `ty` and apply all of `props` to it.
///
/// Components own no node; a component type fails with
/// [`RenderError::ComponentNode`].
pub fn create_dom<D: HostDocument>(
    doc: &mut D,
    ty: &ElementType,
    props: &Props,
) -> RenderResult<D::Node> {
    let node = match ty {
        ElementType::Text => doc.create_text(),
        ElementType::Host(tag) => doc.create_element(tag),
        ElementType::Component(c) => return Err(RenderError::ComponentNode(c.name())),
    }
    .map_err(RenderError::document)?;

    update_dom(doc, &node, &Props::new(), props)?;
    Ok(node)
}

/// Apply the difference between `prev` and `next` to `node`.
pub fn update_dom<D: HostDocument>(
    doc: &mut D,
    node: &D::Node,
    prev: &Props,
    next: &Props,
) -> RenderResult<()> {
    let changed = |name: &str| prev.get(name) != next.get(name);

    // 1. Remove old or changed event listeners
    for (name, value) in prev.events() {
        if !changed(name) {
            continue;
        }
        if let Some(listener) = value.as_listener() {
            doc.remove_event_listener(node, &event_type(name), listener)
                .map_err(RenderError::document)?;
        }
    }

    // 2. Remove old properties
    for (name, _) in prev.properties() {
        if !next.contains(name) {
            doc.clear_property(node, name)
                .map_err(RenderError::document)?;
        }
    }

    // 3. Set new or changed properties
    for (name, value) in next.properties() {
        if changed(name) {
            doc.set_property(node, name, value)
                .map_err(RenderError::document)?;
        }
    }

    // 4. Add new or changed event listeners
    for (name, value) in next.events() {
        if !changed(name) {
            continue;
        }
        match value.as_listener() {
            Some(listener) => doc
                .add_event_listener(node, &event_type(name), listener)
                .map_err(RenderError::document)?,
            None => tracing::warn!(prop = name, "ignoring non-listener value for event prop"),
        }
    }

    Ok(())
}
