//! Property system for elements
//!
//! Follows the attribute design of the VDOM: properties are an
//! insertion-ordered `Vec` of `(name, value)` pairs rather than a map, so
//! they are applied to the host in the order they were written.
//!
//! `children` is kept apart from the property list. It is structural and
//! consumed only by the reconciler, never applied to a host node.

use std::fmt;
use std::rc::Rc;

use compact_str::CompactString;
use smallvec::SmallVec;

use super::Element;

/// Property name.
pub type PropKey = CompactString;

/// Ordered property list.
pub type PropList = Vec<(PropKey, PropValue)>;

/// Children collection.
pub type Children = SmallVec<[Element; 4]>;

/// Reserved property name for the children sequence.
pub const CHILDREN: &str = "children";

/// Property carrying a text node's content.
pub const NODE_VALUE: &str = "nodeValue";

/// Prefix that marks a property as an event listener.
pub const EVENT_PREFIX: &str = "on";

// =============================================================================
// Event / Listener
// =============================================================================

/// Event delivered to a [`Listener`].
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Event type, e.g. `click`
    pub kind: CompactString,
    /// Optional payload (input value, key name, ...)
    pub detail: Option<PropValue>,
}

impl Event {
    /// Create an event without payload.
    pub fn new(kind: impl Into<CompactString>) -> Self {
        Self {
            kind: kind.into(),
            detail: None,
        }
    }

    /// Attach a payload.
    pub fn with_detail(mut self, detail: impl Into<PropValue>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Event listener callback.
///
/// Listeners compare by identity: two listeners are equal only when they
/// share the same allocation. Re-creating a closure on every render therefore
/// counts as a changed listener, and the old one is detached.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn(&Event)>);

impl Listener {
    /// Wrap a callback.
    pub fn new(f: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the callback.
    #[inline]
    pub fn call(&self, event: &Event) {
        (self.0)(event)
    }

    /// Check if both listeners share the same callback allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// Value of a single property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Text(CompactString),
    Int(i64),
    Float(f64),
    Bool(bool),
    Listener(Listener),
}

impl PropValue {
    // text -> Text, int -> Int, ...
    impl_enum_accessors!(
        text: CompactString,
        int: i64,
        float: f64,
        bool: bool,
        listener: Listener,
    );

    /// The value a cleared property is reset to.
    pub fn empty() -> Self {
        Self::Text(CompactString::default())
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Listener(_) => f.write_str("[listener]"),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<CompactString> for PropValue {
    fn from(value: CompactString) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<usize> for PropValue {
    fn from(value: usize) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Listener> for PropValue {
    fn from(value: Listener) -> Self {
        Self::Listener(value)
    }
}

// =============================================================================
// Property classification
// =============================================================================

/// Check if a property name denotes an event listener (`on` prefix).
#[inline]
pub fn is_event(name: &str) -> bool {
    name.starts_with(EVENT_PREFIX)
}

/// Check if a property name is applied to the host as a plain property.
#[inline]
pub fn is_property(name: &str) -> bool {
    name != CHILDREN && !is_event(name)
}

/// Event type for a listener property: `onClick` -> `click`.
pub fn event_type(name: &str) -> CompactString {
    let stripped = name.strip_prefix(EVENT_PREFIX).unwrap_or(name);
    stripped.to_lowercase().into()
}

// =============================================================================
// PropsExt
// =============================================================================

/// Extension trait for lookups on a [`PropList`]
pub trait PropsExt {
    /// Get a property value by name
    fn get_prop(&self, name: &str) -> Option<&PropValue>;

    /// Check if a property exists
    fn has_prop(&self, name: &str) -> bool;

    /// Set a property value (insert or update)
    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>);

    /// Remove a property by name, returning the old value if present
    fn remove_prop(&mut self, name: &str) -> Option<PropValue>;
}

impl PropsExt for PropList {
    fn get_prop(&self, name: &str) -> Option<&PropValue> {
        self.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    fn has_prop(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_prop(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) {
        let name = name.into();
        let value = value.into();
        if let Some(prop) = self.iter_mut().find(|(k, _)| k == &name) {
            prop.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_prop(&mut self, name: &str) -> Option<PropValue> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }
}

// =============================================================================
// Props
// =============================================================================

/// Element properties: ordered values plus the children sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    /// Property values in insertion order
    pub values: PropList,
    /// Child elements
    pub children: Children,
}

impl Props {
    /// Create empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.values.get_prop(name)
    }

    /// Check if a property exists.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.has_prop(name)
    }

    /// Set a property. `children` is structural and is ignored here.
    pub fn set(&mut self, name: impl Into<PropKey>, value: impl Into<PropValue>) {
        let name = name.into();
        if name == CHILDREN {
            tracing::warn!("`children` cannot be set as a property; use the children list");
            return;
        }
        self.values.set_prop(name, value);
    }

    /// Remove a property.
    pub fn remove(&mut self, name: &str) -> Option<PropValue> {
        self.values.remove_prop(name)
    }

    /// Iterate over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over plain (non-event) properties.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.iter().filter(|(k, _)| is_property(k))
    }

    /// Iterate over listener properties.
    pub fn events(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.iter().filter(|(k, _)| is_event(k))
    }

    /// Number of property values (children excluded).
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no property values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Props
where
    K: Into<PropKey>,
    V: Into<PropValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.set(k, v);
        }
        props
    }
}

// =============================================================================
// Tests
// =============================================================================
