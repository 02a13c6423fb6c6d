//! In-memory host document.
//!
//! An arena of element and text nodes with DOM-like semantics:
//! `append_child` moves a node that already has a parent, removed subtrees
//! stay alive (detached) until the engine releases them, and listeners are
//! stored per event type in registration order.
//!
//! Released subtrees are freed unless the document was created with
//! [`MemoryDocument::retaining_detached`].
//!
//! Every mutation made through [`HostDocument`] is recorded in an operation
//! log, which lets callers check exactly which host operations a render or
//! commit issued.

use compact_str::CompactString;
use slotmap::SlotMap;

use crate::element::{Event, Listener, PropKey, PropList, PropValue, PropsExt, NODE_VALUE};
use crate::error::{DocumentError, DocumentResult};

use super::HostDocument;

slotmap::new_key_type! {
    /// Handle to a node in a [`MemoryDocument`].
    pub struct NodeId;
}

// =============================================================================
// Node data
// =============================================================================

/// Kind of a memory node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element node with its tag name
    Element(CompactString),
    /// Text node; content is the `nodeValue` property
    Text,
}

/// Node stored in a [`MemoryDocument`].
#[derive(Debug, Clone)]
pub struct MemoryNode {
    /// Element tag or text
    pub kind: NodeKind,
    /// Properties in first-set order
    pub properties: PropList,
    /// Registered listeners as `(event type, listener)`
    pub listeners: Vec<(CompactString, Listener)>,
    /// Child nodes in document order
    pub children: Vec<NodeId>,
    /// Parent node, if attached
    pub parent: Option<NodeId>,
}

impl MemoryNode {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            properties: Vec::new(),
            listeners: Vec::new(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Tag name for element nodes.
    pub fn tag(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Element(tag) => Some(tag),
            NodeKind::Text => None,
        }
    }

    /// Check if this is a text node.
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }
}

/// Host operation recorded by [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomOp {
    CreateElement { node: NodeId, tag: CompactString },
    CreateText { node: NodeId },
    SetProperty { node: NodeId, name: PropKey },
    ClearProperty { node: NodeId, name: PropKey },
    AddListener { node: NodeId, event: CompactString },
    RemoveListener { node: NodeId, event: CompactString },
    AppendChild { parent: NodeId, child: NodeId },
    RemoveChild { parent: NodeId, child: NodeId },
}

impl DomOp {
    /// Check if this operation changes the shape of an attached tree.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::AppendChild { .. } | Self::RemoveChild { .. })
    }
}

// =============================================================================
// MemoryDocument
// =============================================================================

/// Arena-backed host document.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    nodes: SlotMap<NodeId, MemoryNode>,
    log: Vec<DomOp>,
    retain_detached: bool,
}

impl MemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document that keeps released nodes alive for inspection.
    pub fn retaining_detached() -> Self {
        Self {
            retain_detached: true,
            ..Self::default()
        }
    }

    /// Create a mount point. Not recorded in the operation log.
    pub fn create_container(&mut self, tag: impl Into<CompactString>) -> NodeId {
        self.nodes.insert(MemoryNode::new(NodeKind::Element(tag.into())))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Get a node.
    pub fn node(&self, id: NodeId) -> Option<&MemoryNode> {
        self.nodes.get(id)
    }

    /// Children of a node (empty for unknown nodes).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Parent of a node.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.parent)
    }

    /// Get a property of a node.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        self.nodes.get(id).and_then(|n| n.properties.get_prop(name))
    }

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.nodes.get(id).and_then(MemoryNode::tag)
    }

    /// Number of listeners registered for an event type.
    pub fn listener_count(&self, id: NodeId, event: &str) -> usize {
        self.nodes
            .get(id)
            .map(|n| n.listeners.iter().filter(|(e, _)| e == event).count())
            .unwrap_or(0)
    }

    /// Concatenated text of all text nodes under `id`, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if node.is_text() {
            if let Some(value) = node.properties.get_prop(NODE_VALUE) {
                out.push_str(&value.to_string());
            }
            return;
        }
        for &child in &node.children {
            self.collect_text(child, out);
        }
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Fire an event at a node. Returns the number of listeners invoked.
    ///
    /// Listeners registered on the node itself are called in registration
    /// order; there is no bubbling.
    pub fn dispatch(&self, id: NodeId, event: &Event) -> usize {
        let Some(node) = self.nodes.get(id) else {
            return 0;
        };
        let mut called = 0;
        for (kind, listener) in &node.listeners {
            if *kind == event.kind {
                listener.call(event);
                called += 1;
            }
        }
        called
    }

    /// Recorded operations since the last [`take_log`](Self::take_log).
    pub fn log(&self) -> &[DomOp] {
        &self.log
    }

    /// Drain the operation log.
    pub fn take_log(&mut self) -> Vec<DomOp> {
        std::mem::take(&mut self.log)
    }

    /// Serialize the subtree under `id` as markup.
    pub fn to_markup(&self, id: NodeId) -> String {
        super::render_markup(self, id)
    }

    fn get_mut(&mut self, id: NodeId) -> DocumentResult<&mut MemoryNode> {
        self.nodes.get_mut(id).ok_or(DocumentError::UnknownNode(id))
    }

    /// Drop `id` and everything under it.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(id) {
                stack.extend(node.children);
            }
        }
    }

    fn detach(&mut self, child: NodeId) {
        let Some(parent) = self.nodes.get(child).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }
}

impl HostDocument for MemoryDocument {
    type Node = NodeId;
    type Error = DocumentError;

    fn create_element(&mut self, tag: &str) -> DocumentResult<NodeId> {
        let node = self.nodes.insert(MemoryNode::new(NodeKind::Element(tag.into())));
        self.log.push(DomOp::CreateElement {
            node,
            tag: tag.into(),
        });
        Ok(node)
    }

    fn create_text(&mut self) -> DocumentResult<NodeId> {
        let node = self.nodes.insert(MemoryNode::new(NodeKind::Text));
        self.log.push(DomOp::CreateText { node });
        Ok(node)
    }

    fn set_property(&mut self, node: &NodeId, name: &str, value: &PropValue) -> DocumentResult<()> {
        self.get_mut(*node)?.properties.set_prop(name, value.clone());
        self.log.push(DomOp::SetProperty {
            node: *node,
            name: name.into(),
        });
        Ok(())
    }

    fn clear_property(&mut self, node: &NodeId, name: &str) -> DocumentResult<()> {
        self.get_mut(*node)?.properties.set_prop(name, PropValue::empty());
        self.log.push(DomOp::ClearProperty {
            node: *node,
            name: name.into(),
        });
        Ok(())
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Listener,
    ) -> DocumentResult<()> {
        let target = self.get_mut(*node)?;
        // Same listener for the same event registers once.
        if !target.listeners.iter().any(|(e, l)| e == event && l == listener) {
            target.listeners.push((event.into(), listener.clone()));
        }
        self.log.push(DomOp::AddListener {
            node: *node,
            event: event.into(),
        });
        Ok(())
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &Listener,
    ) -> DocumentResult<()> {
        self.get_mut(*node)?
            .listeners
            .retain(|(e, l)| !(e == event && l == listener));
        self.log.push(DomOp::RemoveListener {
            node: *node,
            event: event.into(),
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> DocumentResult<()> {
        if self.get_mut(*parent)?.is_text() {
            return Err(DocumentError::TextNodeParent(*parent));
        }
        self.get_mut(*child)?;
        self.detach(*child);

        self.get_mut(*parent)?.children.push(*child);
        self.get_mut(*child)?.parent = Some(*parent);
        self.log.push(DomOp::AppendChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> DocumentResult<()> {
        self.get_mut(*parent)?;
        if self.get_mut(*child)?.parent != Some(*parent) {
            return Err(DocumentError::NotAChild {
                parent: *parent,
                child: *child,
            });
        }
        self.detach(*child);
        self.log.push(DomOp::RemoveChild {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn release_node(&mut self, node: &NodeId) {
        if self.retain_detached || !self.nodes.contains_key(*node) {
            return;
        }
        self.detach(*node);
        self.free_subtree(*node);
    }
}

// =============================================================================
// Tests
// =============================================================================
