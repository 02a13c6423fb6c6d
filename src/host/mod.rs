//! Host document boundary.
//!
//! The reconciler needs only a handful of capabilities from the platform it
//! renders into: create element and text nodes, set and clear named
//! properties, add and remove event listeners, and append or remove children.
//! [`HostDocument`] is that boundary. [`MemoryDocument`] implements it in
//! memory for tests, demos and headless use.

mod dom;
mod markup;
mod memory;

pub use dom::{create_dom, update_dom};
pub use markup::render_markup;
pub use memory::{DomOp, MemoryDocument, MemoryNode, NodeId, NodeKind};

use std::fmt::Debug;

use crate::element::{Listener, PropValue};

/// Platform the reconciler renders into.
///
/// Nodes are handles: cheap to clone, compared by identity. Every method may
/// fail with the host's own error type, which the engine propagates as
/// [`RenderError::Document`](crate::RenderError::Document).
pub trait HostDocument {
    /// Handle to a host node.
    type Node: Clone + PartialEq + Debug;

    /// Host failure.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a detached element node.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Create a detached, empty text node.
    fn create_text(&mut self) -> Result<Self::Node, Self::Error>;

    /// Set a named property.
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), Self::Error>;

    /// Reset a named property to the empty value.
    fn clear_property(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error> {
        self.set_property(node, name, &PropValue::empty())
    }

    /// Register a listener for an event type.
    fn add_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Listener,
    ) -> Result<(), Self::Error>;

    /// Unregister a listener previously added for an event type.
    fn remove_event_listener(
        &mut self,
        node: &Self::Node,
        event: &str,
        listener: &Listener,
    ) -> Result<(), Self::Error>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Remove `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// The engine holds no more references to `node` or its descendants.
    ///
    /// Hosts that own node storage may free the subtree. The engine never
    /// passes the handle to the document again. Unknown or already released
    /// handles must be ignored.
    fn release_node(&mut self, node: &Self::Node) {
        let _ = node;
    }
}
