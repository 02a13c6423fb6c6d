//! Element model: the immutable description of what should exist.
//!
//! An [`Element`] is a type tag plus shared [`Props`]. It never references a
//! fiber or a host node, so the same element tree can be rendered into any
//! number of roots.
//!
//! # Key Features
//!
//! - [`ElementType`] is a closed tagged variant: host tag, text, or component
//! - Component identity is the Rust type of the render function
//! - Builder methods for ergonomic tree construction

mod factory;
mod props;

pub use factory::{create_element, create_text_element};
pub use props::{
    event_type, is_event, is_property, Children, Event, Listener, PropKey, PropList, PropValue,
    Props, PropsExt, CHILDREN, EVENT_PREFIX, NODE_VALUE,
};

use std::any::TypeId;
use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;

use crate::error::{BoxError, RenderError, RenderResult};

/// Display name of the text sentinel type.
pub const TEXT_ELEMENT: &str = "TEXT_ELEMENT";

// =============================================================================
// Component
// =============================================================================

type RenderFn = dyn Fn(&Props) -> Result<Element, BoxError>;

/// Component: a function from props to a single child element.
///
/// Function items and non-capturing closures are zero-sized, so their Rust
/// type alone names them: two components built from the same one are the
/// same, and calling `Component::new(app)` on every render keeps identity.
///
/// Any other render function (a `fn` pointer, a capturing closure) is
/// identified by its allocation. Build such a component once and clone it
/// across renders; a freshly built one replaces the previous subtree.
#[derive(Clone)]
pub struct Component {
    id: Option<TypeId>,
    name: &'static str,
    render: Rc<RenderFn>,
}

impl Component {
    /// Create a component from an infallible render function.
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&Props) -> Element + 'static,
    {
        Self {
            id: type_identity::<F>(),
            name: std::any::type_name::<F>(),
            render: Rc::new(move |props| Ok(render(props))),
        }
    }

    /// Create a component whose render function may fail.
    pub fn fallible<F>(render: F) -> Self
    where
        F: Fn(&Props) -> Result<Element, BoxError> + 'static,
    {
        Self {
            id: type_identity::<F>(),
            name: std::any::type_name::<F>(),
            render: Rc::new(render),
        }
    }

    /// Type name of the render function.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Invoke the render function.
    pub fn call(&self, props: &Props) -> RenderResult<Element> {
        (self.render)(props).map_err(|source| RenderError::Component {
            component: self.name,
            source,
        })
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => Rc::ptr_eq(&self.render, &other.render),
        }
    }
}

/// `TypeId` of a zero-sized render function; `None` when values of `F`
/// differ from each other.
fn type_identity<F: 'static>() -> Option<TypeId> {
    (std::mem::size_of::<F>() == 0).then(TypeId::of::<F>)
}

impl Eq for Component {}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name).finish()
    }
}

// =============================================================================
// ElementType
// =============================================================================

/// What an element (and its fiber) renders as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementType {
    /// Host element node, tagged by name
    Host(CompactString),
    /// Host text node; content lives in the `nodeValue` prop
    Text,
    /// Component function
    Component(Component),
}

impl ElementType {
    /// Check if this is a component.
    #[inline]
    pub fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }

    /// Get the component, if any.
    #[inline]
    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(c) => Some(c),
            _ => None,
        }
    }

    /// Host tag name, text sentinel, or component name.
    pub fn name(&self) -> &str {
        match self {
            Self::Host(tag) => tag,
            Self::Text => TEXT_ELEMENT,
            Self::Component(c) => c.name(),
        }
    }
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        Self::Host(tag.into())
    }
}

impl From<String> for ElementType {
    fn from(tag: String) -> Self {
        Self::Host(tag.into())
    }
}

impl From<CompactString> for ElementType {
    fn from(tag: CompactString) -> Self {
        Self::Host(tag)
    }
}

impl From<Component> for ElementType {
    fn from(component: Component) -> Self {
        Self::Component(component)
    }
}

// =============================================================================
// Element
// =============================================================================

/// Immutable description of a node, with children inside its props.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Host tag, text sentinel or component
    pub ty: ElementType,
    /// Shared props; fibers hold onto these without copying
    pub props: Rc<Props>,
}

impl Element {
    /// Create an element from a type and props.
    pub fn new(ty: impl Into<ElementType>, props: Props) -> Self {
        Self {
            ty: ty.into(),
            props: Rc::new(props),
        }
    }

    /// Create a host element with no props.
    pub fn host(tag: impl Into<CompactString>) -> Self {
        Self::new(ElementType::Host(tag.into()), Props::new())
    }

    /// Create a component element with no props.
    pub fn component(component: Component) -> Self {
        Self::new(ElementType::Component(component), Props::new())
    }

    /// Create a text element (see [`create_text_element`]).
    pub fn text_node(value: impl Into<PropValue>) -> Self {
        create_text_element(value)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────────────────────

    /// Set a property.
    pub fn prop(mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) -> Self {
        Rc::make_mut(&mut self.props).set(name, value);
        self
    }

    /// Attach an event listener under a prop name such as `onClick`.
    pub fn on(self, name: impl Into<PropKey>, f: impl Fn(&Event) + 'static) -> Self {
        self.listener(name, Listener::new(f))
    }

    /// Attach an existing listener under a prop name such as `onClick`.
    pub fn listener(self, name: impl Into<PropKey>, listener: Listener) -> Self {
        self.prop(name, listener)
    }

    /// Append a child element.
    pub fn child(mut self, child: impl Into<Element>) -> Self {
        Rc::make_mut(&mut self.props).children.push(child.into());
        self
    }

    /// Append several child elements.
    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        Rc::make_mut(&mut self.props)
            .children
            .extend(children.into_iter().map(Into::into));
        self
    }

    /// Append a text child.
    pub fn text(self, value: impl Into<PropValue>) -> Self {
        self.child(create_text_element(value))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Inspection
    // ─────────────────────────────────────────────────────────────────────────

    /// Child elements.
    #[inline]
    pub fn child_elements(&self) -> &[Element] {
        &self.props.children
    }

    /// Check if this is a text element.
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.ty, ElementType::Text)
    }
}

impl From<&str> for Element {
    fn from(value: &str) -> Self {
        create_text_element(value)
    }
}

impl From<String> for Element {
    fn from(value: String) -> Self {
        create_text_element(value)
    }
}

impl From<i64> for Element {
    fn from(value: i64) -> Self {
        create_text_element(value)
    }
}

impl From<Component> for Element {
    fn from(component: Component) -> Self {
        Self::component(component)
    }
}

// =============================================================================
// Tests
// =============================================================================
