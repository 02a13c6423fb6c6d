//! Render scenarios against the in-memory document.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::ReconcilerConfig;
use crate::element::{Component, Element, Event, Props};
use crate::error::{DocumentError, RenderError};
use crate::fiber::{Fiber, FiberTree};
use crate::host::{DomOp, HostDocument, MemoryDocument, NodeId};
use crate::root::{create_root, Root};
use crate::scheduler::{Unbounded, UnitBudget, WorkStatus};

use super::remove_subtree;

fn fixture() -> (MemoryDocument, NodeId, Root<MemoryDocument>) {
    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    (doc, container, create_root(container))
}

fn app(items: &[&str]) -> Element {
    Element::host("div")
        .child(Element::host("h1").text("hello"))
        .child(list(items))
}

fn list(items: &[&str]) -> Element {
    Element::host("ul").children(items.iter().map(|item| Element::host("li").text(*item)))
}

/// Every node reachable from `id`, in document order.
fn node_ids(doc: &MemoryDocument, id: NodeId) -> Vec<NodeId> {
    let mut out = vec![id];
    for &child in doc.children(id) {
        out.extend(node_ids(doc, child));
    }
    out
}

fn wrapper(_: &Props) -> Element {
    Element::host("p").text("wrapped")
}

fn outer(_: &Props) -> Element {
    Element::component(Component::new(wrapper))
}

// =============================================================================
// First render and re-render
// =============================================================================

#[test]
fn test_first_render() {
    let (mut doc, container, mut root) = fixture();
    let stats = root.render(&mut doc, app(&["foo", "bar"])).unwrap();

    assert_eq!(
        doc.to_markup(container),
        "<root><div><h1>hello</h1><ul><li>foo</li><li>bar</li></ul></div></root>"
    );
    assert_eq!(stats.units_of_work, 9);
    assert_eq!(stats.placements, 8);
    assert_eq!(stats.updates, 0);
    assert_eq!(stats.deletions, 0);
    assert_eq!(stats.fibers_released, 0);
    assert_eq!(root.tree().len(), 9);
    assert_eq!(root.status(), WorkStatus::Idle);
}

#[test]
fn test_identical_render_is_noop() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo", "bar"])).unwrap();
    let before = node_ids(&doc, container);
    let first_root = root.current_root();
    doc.take_log();

    let stats = root.render(&mut doc, app(&["foo", "bar"])).unwrap();
    assert_eq!(stats.placements, 0);
    assert_eq!(stats.deletions, 0);
    assert_eq!(stats.updates, 8);
    assert_eq!(stats.fibers_released, 9);
    assert!(!stats.has_structural_changes());

    assert!(doc.log().is_empty(), "unexpected ops: {:?}", doc.log());
    assert_eq!(node_ids(&doc, container), before);
    assert_ne!(root.current_root(), first_root);
    assert_eq!(root.tree().len(), 9);
}

#[test]
fn test_committed_tree_has_no_alternates() {
    let (mut doc, _, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["a"])).unwrap();
    let _ = root.render(&mut doc, app(&["b"])).unwrap();

    let current = root.current_root().unwrap();
    let tree = root.tree();
    assert!(tree.descendants(current).all(|id| tree[id].alternate.is_none()));
    assert!(tree.descendants(current).all(|id| tree[id].effect.is_none()));
}

#[test]
fn test_text_change_updates_in_place() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo"])).unwrap();
    let before = node_ids(&doc, container);
    doc.take_log();

    let _ = root.render(&mut doc, app(&["baz"])).unwrap();
    assert_eq!(node_ids(&doc, container), before);
    let log = doc.take_log();
    assert_eq!(log.len(), 1);
    assert!(matches!(&log[0], DomOp::SetProperty { name, .. } if name == "nodeValue"));
    assert_eq!(doc.text_content(container), "hellobaz");
}

// =============================================================================
// Child reconciliation
// =============================================================================

/// Placement only appends, so a replacement in the middle of a list ends up
/// after its kept siblings. Known limitation: there is no insert-before.
#[test]
fn test_positional_type_change_appends_replacement_last() {
    let (mut doc, container, mut root) = fixture();
    let old = Element::host("div")
        .child(Element::host("p").text("a"))
        .child(Element::host("span").text("b"));
    let _ = root.render(&mut doc, old).unwrap();
    let div = doc.children(container)[0];
    let span = doc.children(div)[1];

    let new = Element::host("div")
        .child(Element::host("h2").text("c"))
        .child(Element::host("span").text("b"));
    let stats = root.render(&mut doc, new).unwrap();

    assert_eq!(stats.deletions, 1);
    // h2 and its text
    assert_eq!(stats.placements, 2);
    // div, span and its text
    assert_eq!(stats.updates, 3);

    // Placement appends, so the new node lands after the kept one
    let children = doc.children(div);
    assert_eq!(children.len(), 2);
    assert_eq!(children[0], span);
    assert_eq!(doc.tag(children[1]), Some("h2"));
    assert_eq!(doc.to_markup(div), "<div><span>b</span><h2>c</h2></div>");
}

#[test]
fn test_list_shrink_deletes_tail() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, list(&["a", "b", "c"])).unwrap();
    let ul = doc.children(container)[0];
    let first = doc.children(ul)[0];

    let stats = root.render(&mut doc, list(&["a"])).unwrap();
    assert_eq!(stats.deletions, 2);
    assert_eq!(stats.placements, 0);
    assert_eq!(doc.children(ul), &[first]);
    assert_eq!(doc.to_markup(container), "<root><ul><li>a</li></ul></root>");
}

#[test]
fn test_list_growth_appends_in_order() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, list(&["a"])).unwrap();
    let ul = doc.children(container)[0];
    let first = doc.children(ul)[0];

    let stats = root.render(&mut doc, list(&["a", "b", "c"])).unwrap();
    // two items, each with a text child
    assert_eq!(stats.placements, 4);
    assert_eq!(stats.deletions, 0);
    assert_eq!(doc.children(ul).len(), 3);
    assert_eq!(doc.children(ul)[0], first);
    assert_eq!(doc.text_content(ul), "abc");
}

#[test]
fn test_root_type_change_replaces_everything() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo"])).unwrap();
    let stats = root.render(&mut doc, Element::host("main").text("bye")).unwrap();

    assert_eq!(stats.deletions, 1);
    assert_eq!(doc.to_markup(container), "<root><main>bye</main></root>");
    assert_eq!(root.tree().len(), 3);
}

// =============================================================================
// Properties and listeners
// =============================================================================

#[test]
fn test_listener_swap_and_prop_removal() {
    let (mut doc, container, mut root) = fixture();
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));

    let hits = first.clone();
    let old = Element::host("button")
        .prop("id", "go")
        .prop("title", "press")
        .on("onClick", move |_| hits.set(hits.get() + 1));
    let _ = root.render(&mut doc, old).unwrap();
    let button = doc.children(container)[0];
    doc.take_log();

    let hits = second.clone();
    let new = Element::host("button")
        .prop("id", "go")
        .on("onClick", move |_| hits.set(hits.get() + 1));
    let _ = root.render(&mut doc, new).unwrap();

    assert_eq!(
        doc.take_log(),
        vec![
            DomOp::RemoveListener { node: button, event: "click".into() },
            DomOp::ClearProperty { node: button, name: "title".into() },
            DomOp::AddListener { node: button, event: "click".into() },
        ]
    );
    assert_eq!(doc.listener_count(button, "click"), 1);
    assert_eq!(doc.dispatch(button, &Event::new("click")), 1);
    assert_eq!(first.get(), 0);
    assert_eq!(second.get(), 1);
}

#[test]
fn test_same_listener_is_not_rebound() {
    let (mut doc, container, mut root) = fixture();
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    let listener = crate::element::Listener::new(move |_| counter.set(counter.get() + 1));

    let view = |label: &str| {
        Element::host("button")
            .listener("onClick", listener.clone())
            .text(label)
    };
    let _ = root.render(&mut doc, view("one")).unwrap();
    let button = doc.children(container)[0];
    doc.take_log();

    let _ = root.render(&mut doc, view("two")).unwrap();
    let rebound = doc
        .log()
        .iter()
        .any(|op| matches!(op, DomOp::AddListener { .. } | DomOp::RemoveListener { .. }));
    assert!(!rebound);
    doc.dispatch(button, &Event::new("click"));
    assert_eq!(hits.get(), 1);
}

// =============================================================================
// Components
// =============================================================================

#[test]
fn test_component_renders_props() {
    fn greet(props: &Props) -> Element {
        let name = props.get("name").map(ToString::to_string).unwrap_or_default();
        Element::host("p").text(format!("hi {name}"))
    }

    let (mut doc, container, mut root) = fixture();
    let view = |name: &str| Element::component(Component::new(greet)).prop("name", name);
    let stats = root.render(&mut doc, view("ada")).unwrap();
    // component, p, text
    assert_eq!(stats.placements, 3);
    assert_eq!(doc.to_markup(container), "<root><p>hi ada</p></root>");
    let p = doc.children(container)[0];

    let stats = root.render(&mut doc, view("grace")).unwrap();
    assert_eq!(stats.placements, 0);
    assert_eq!(doc.children(container), &[p]);
    assert_eq!(doc.to_markup(container), "<root><p>hi grace</p></root>");
}

#[test]
fn test_deletion_through_components() {
    let (mut doc, container, mut root) = fixture();
    let view = Element::host("div")
        .child(Element::component(Component::new(outer)))
        .child(Element::host("span"));
    let _ = root.render(&mut doc, view).unwrap();
    assert_eq!(doc.to_markup(container), "<root><div><p>wrapped</p><span></span></div></root>");

    let stats = root.render(&mut doc, Element::host("div")).unwrap();
    assert_eq!(stats.deletions, 2);
    assert_eq!(doc.to_markup(container), "<root><div></div></root>");
}

#[test]
fn test_component_type_change() {
    fn other(_: &Props) -> Element {
        Element::host("p").text("other")
    }

    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, Element::component(Component::new(wrapper))).unwrap();
    let old_p = doc.children(container)[0];

    let stats = root.render(&mut doc, Element::component(Component::new(other))).unwrap();
    assert_eq!(stats.deletions, 1);
    assert_ne!(doc.children(container)[0], old_p);
    assert_eq!(doc.to_markup(container), "<root><p>other</p></root>");
}

#[test]
fn test_fn_pointer_components_switch_by_allocation() {
    fn other(_: &Props) -> Element {
        Element::host("p").text("other")
    }

    let renders: [fn(&Props) -> Element; 2] = [wrapper, other];
    let first = Component::new(renders[0]);
    let second = Component::new(renders[1]);

    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, Element::component(first.clone())).unwrap();
    let stats = root.render(&mut doc, Element::component(first)).unwrap();
    assert_eq!(stats.placements, 0);

    let stats = root.render(&mut doc, Element::component(second)).unwrap();
    assert_eq!(stats.deletions, 1);
    // component, p, text
    assert_eq!(stats.placements, 3);
    assert_eq!(doc.to_markup(container), "<root><p>other</p></root>");
}

#[test]
fn test_childless_component_deletion_is_noop() {
    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut tree = FiberTree::new();
    let root = tree.insert(Fiber::root(container, Element::host("div"), None));
    let component = tree.insert(Fiber::for_element(
        &Element::component(Component::new(wrapper)),
        root,
        1,
    ));
    tree[root].child = Some(component);

    remove_subtree(&tree, &mut doc, component, &container).unwrap();
    assert!(doc.log().is_empty());
}

#[test]
fn test_component_error_leaves_document_untouched() {
    fn broken(_: &Props) -> Result<Element, crate::BoxError> {
        Err("boom".into())
    }

    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo"])).unwrap();
    let markup = doc.to_markup(container);
    let current = root.current_root();
    let fibers = root.tree().len();

    let view = Element::host("div")
        .child(Element::host("h1").text("new"))
        .child(Element::component(Component::fallible(broken)));
    let err = root.render(&mut doc, view).unwrap_err();

    assert!(err.is_component());
    assert_eq!(doc.to_markup(container), markup);
    assert_eq!(root.current_root(), current);
    assert_eq!(root.tree().len(), fibers);
    assert_eq!(root.status(), WorkStatus::Idle);

    // Still usable
    let _ = root.render(&mut doc, app(&["bar"])).unwrap();
    assert_eq!(doc.text_content(container), "hellobar");
}

#[test]
fn test_depth_limit() {
    fn forever(_: &Props) -> Element {
        Element::component(Component::new(forever))
    }

    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut root: Root<MemoryDocument> =
        Root::with_config(container, ReconcilerConfig::new(10, 4));

    let err = root.render(&mut doc, Element::component(Component::new(forever))).unwrap_err();
    assert!(matches!(err, RenderError::DepthExceeded { depth: 11, limit: 10 }));
    assert!(root.tree().is_empty());
    assert!(root.current_root().is_none());
}

// =============================================================================
// Scheduling
// =============================================================================

#[test]
fn test_nothing_visible_before_commit() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo"])).unwrap();
    let before = doc.to_markup(container);

    root.schedule(app(&["foo", "bar", "baz"]));
    while root.perform_unit(&mut doc).unwrap().is_pending() {
        assert_eq!(doc.to_markup(container), before);
    }
    assert_eq!(root.status(), WorkStatus::Ready);
    assert_eq!(doc.to_markup(container), before);

    let _ = root.commit(&mut doc).unwrap();
    assert_eq!(doc.text_content(container), "hellofoobarbaz");
}

#[test]
fn test_cancel_before_commit() {
    let (mut doc, container, mut root) = fixture();
    root.schedule(app(&["foo"]));
    assert_eq!(root.tick(&mut doc, UnitBudget::new(3)).unwrap(), None);
    assert_eq!(root.status(), WorkStatus::Pending);

    assert!(root.cancel());
    assert!(!root.cancel());
    assert_eq!(root.status(), WorkStatus::Idle);
    assert!(doc.children(container).is_empty());
    assert!(root.tree().is_empty());
    assert!(matches!(root.commit(&mut doc), Err(RenderError::NoWorkInProgress)));
}

#[test]
fn test_commit_requires_finished_work() {
    let (mut doc, _, mut root) = fixture();
    root.schedule(app(&["foo"]));
    let _ = root.perform_unit(&mut doc).unwrap();
    assert!(matches!(root.commit(&mut doc), Err(RenderError::WorkPending)));
    assert_eq!(root.status(), WorkStatus::Pending);
}

#[test]
fn test_ticks_match_sync_render() {
    let (mut sync_doc, sync_container, mut sync_root) = fixture();
    let expected = sync_root.render(&mut sync_doc, app(&["a", "b", "c"])).unwrap();

    let mut doc = MemoryDocument::new();
    let container = doc.create_container("root");
    let mut root: Root<MemoryDocument> =
        Root::with_config(container, ReconcilerConfig::new(100, 2));
    root.schedule(app(&["a", "b", "c"]));

    let mut ticks = 0;
    let stats = loop {
        ticks += 1;
        if let Some(stats) = root.tick_slice(&mut doc).unwrap() {
            break stats;
        }
    };
    assert!(ticks > 1);
    assert_eq!(stats, expected);
    assert_eq!(doc.to_markup(container), sync_doc.to_markup(sync_container));
}

#[test]
fn test_reschedule_discards_pending_render() {
    let (mut doc, container, mut root) = fixture();
    root.schedule(app(&["stale"]));
    let _ = root.work_until(&mut doc, UnitBudget::new(4)).unwrap();

    let _ = root.render(&mut doc, app(&["fresh"])).unwrap();
    assert_eq!(doc.text_content(container), "hellofresh");
    assert_eq!(root.tree().len(), 7);
}

#[test]
fn test_idle_root() {
    let (mut doc, _, mut root) = fixture();
    assert_eq!(root.perform_unit(&mut doc).unwrap(), WorkStatus::Idle);
    assert_eq!(root.tick_slice(&mut doc).unwrap(), None);
    assert!(root.work_in_progress().is_none());
}

#[test]
fn test_unmount() {
    let (mut doc, container, mut root) = fixture();
    let _ = root.render(&mut doc, app(&["foo"])).unwrap();
    root.unmount(&mut doc).unwrap();

    assert!(doc.children(container).is_empty());
    assert!(root.tree().is_empty());
    assert!(root.current_root().is_none());

    let stats = root.render(&mut doc, app(&["foo"])).unwrap();
    assert_eq!(stats.placements, 6);
}

// =============================================================================
// Host failures
// =============================================================================

/// Memory document whose appends start failing once a budget runs out.
#[derive(Default)]
struct FlakyDocument {
    inner: MemoryDocument,
    /// Appends allowed before failing; `None` never fails
    appends_left: Option<usize>,
}

impl HostDocument for FlakyDocument {
    type Node = NodeId;
    type Error = DocumentError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DocumentError> {
        self.inner.create_element(tag)
    }

    fn create_text(&mut self) -> Result<NodeId, DocumentError> {
        self.inner.create_text()
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &crate::element::PropValue,
    ) -> Result<(), DocumentError> {
        self.inner.set_property(node, name, value)
    }

    fn add_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &crate::element::Listener,
    ) -> Result<(), DocumentError> {
        self.inner.add_event_listener(node, event, listener)
    }

    fn remove_event_listener(
        &mut self,
        node: &NodeId,
        event: &str,
        listener: &crate::element::Listener,
    ) -> Result<(), DocumentError> {
        self.inner.remove_event_listener(node, event, listener)
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DocumentError> {
        match &mut self.appends_left {
            Some(0) => return Err(DocumentError::UnknownNode(*child)),
            Some(left) => *left -= 1,
            None => {}
        }
        self.inner.append_child(parent, child)
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), DocumentError> {
        self.inner.remove_child(parent, child)
    }

    fn release_node(&mut self, node: &NodeId) {
        self.inner.release_node(node)
    }
}

fn flaky_fixture() -> (FlakyDocument, NodeId, Root<FlakyDocument>) {
    let mut doc = FlakyDocument::default();
    let container = doc.inner.create_container("root");
    (doc, container, create_root(container))
}

#[test]
fn test_first_append_failure_remounts() {
    let (mut doc, container, mut root) = flaky_fixture();
    let _ = root.render(&mut doc, list(&["a"])).unwrap();

    doc.appends_left = Some(0);
    let err = root.render(&mut doc, list(&["a", "b"])).unwrap_err();
    assert!(matches!(err, RenderError::Document(_)));
    assert!(root.is_diverged());
    assert!(root.current_root().is_none());
    assert!(root.tree().is_empty());
    assert_eq!(root.status(), WorkStatus::Idle);

    doc.appends_left = None;
    let _ = root.render(&mut doc, list(&["a", "b"])).unwrap();
    assert!(!root.is_diverged());
    assert_eq!(
        doc.inner.to_markup(container),
        "<root><ul><li>a</li><li>b</li></ul></root>"
    );
}

#[test]
fn test_failure_after_deletion_recovers() {
    let (mut doc, container, mut root) = flaky_fixture();
    let _ = root.render(&mut doc, Element::host("p").text("old")).unwrap();

    // The old paragraph is removed before the first append fails
    doc.appends_left = Some(0);
    let _ = root.render(&mut doc, Element::host("span").text("new")).unwrap_err();
    assert!(doc.inner.children(container).is_empty());

    doc.appends_left = None;
    for _ in 0..3 {
        let _ = root.render(&mut doc, Element::host("span").text("new")).unwrap();
        assert_eq!(doc.inner.to_markup(container), "<root><span>new</span></root>");
    }
    // container, span, text
    assert_eq!(doc.inner.node_count(), 3);
}

#[test]
fn test_partial_commit_does_not_duplicate_nodes() {
    let (mut doc, container, mut root) = flaky_fixture();
    let _ = root.render(&mut doc, list(&["a"])).unwrap();

    // li b and its text attach, li c fails
    doc.appends_left = Some(2);
    let _ = root.render(&mut doc, list(&["a", "b", "c"])).unwrap_err();
    assert_eq!(doc.inner.text_content(container), "ab");

    doc.appends_left = None;
    let stats = root.render(&mut doc, list(&["a", "b", "c"])).unwrap();
    assert_eq!(stats.updates, 0);
    assert_eq!(
        doc.inner.to_markup(container),
        "<root><ul><li>a</li><li>b</li><li>c</li></ul></root>"
    );
    // container, ul, three items with text
    assert_eq!(doc.inner.node_count(), 8);
}

// =============================================================================
// Node lifetime
// =============================================================================

#[test]
fn test_node_count_bounded_across_type_changes() {
    let (mut doc, container, mut root) = fixture();
    for i in 0..100 {
        let tag = if i % 2 == 0 { "p" } else { "span" };
        let _ = root.render(&mut doc, Element::host(tag).text("x")).unwrap();
        assert_eq!(doc.node_count(), 3);
    }
    assert_eq!(doc.to_markup(container), "<root><span>x</span></root>");
}

#[test]
fn test_cancelled_render_nodes_are_released() {
    let (mut doc, _, mut root) = fixture();
    let _ = root.render(&mut doc, list(&["a"])).unwrap();
    assert_eq!(doc.node_count(), 4);

    root.schedule(list(&["a", "b", "c"]));
    let _ = root.work_until(&mut doc, Unbounded).unwrap();
    assert_eq!(doc.node_count(), 8);
    assert!(root.cancel());

    let _ = root.render(&mut doc, list(&["a"])).unwrap();
    assert_eq!(doc.node_count(), 4);
}

#[test]
fn test_retaining_document_keeps_removed_nodes() {
    let mut doc = MemoryDocument::retaining_detached();
    let container = doc.create_container("root");
    let mut root: Root<MemoryDocument> = create_root(container);

    let _ = root.render(&mut doc, Element::host("p").text("x")).unwrap();
    let p = doc.children(container)[0];
    let _ = root.render(&mut doc, Element::host("span").text("x")).unwrap();

    assert_eq!(doc.node_count(), 5);
    assert_eq!(doc.tag(p), Some("p"));
    assert!(doc.parent(p).is_none());
}
