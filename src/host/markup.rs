//! Markup serialization for [`MemoryDocument`].
//!
//! Renders a subtree as HTML-like text for snapshots and debugging.
//! Properties are emitted as attributes in the order they were first set;
//! listeners are not emitted.

use super::{MemoryDocument, NodeId, NodeKind};
use crate::element::{PropsExt, NODE_VALUE};

/// Render the subtree rooted at `id`.
pub fn render_markup(doc: &MemoryDocument, id: NodeId) -> String {
    let mut output = String::new();
    render_node(doc, id, &mut output);
    output
}

fn render_node(doc: &MemoryDocument, id: NodeId, output: &mut String) {
    let Some(node) = doc.node(id) else {
        return;
    };

    let tag = match &node.kind {
        NodeKind::Text => {
            if let Some(value) = node.properties.get_prop(NODE_VALUE) {
                push_escaped(output, &value.to_string(), false);
            }
            return;
        }
        NodeKind::Element(tag) => tag,
    };

    output.push('<');
    output.push_str(tag);

    for (name, value) in &node.properties {
        if value.is_listener() {
            continue;
        }
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        push_escaped(output, &value.to_string(), true);
        output.push('"');
    }

    // Void elements
    if VOID_ELEMENTS.contains(&tag.as_str()) && node.children.is_empty() {
        output.push_str(" />");
        return;
    }

    output.push('>');
    for &child in &node.children {
        render_node(doc, child, output);
    }
    output.push_str("</");
    output.push_str(tag);
    output.push('>');
}

/// Elements serialized as `<tag />` when childless.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Append `s` to `output`, escaping markup characters. Inside an attribute
/// value `"` is escaped as well.
fn push_escaped(output: &mut String, s: &str, in_attr: bool) {
    for c in s.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' if in_attr => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}
