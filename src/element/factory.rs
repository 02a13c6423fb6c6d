//! Element factory
//!
//! The functional counterpart of the builder methods on [`Element`].

use super::{Element, ElementType, PropKey, PropValue, Props, NODE_VALUE};

/// Create an element from a type, props and children.
///
/// Children convert through `Into<Element>`, so primitive values such as
/// `&str` become text elements.
///
/// ```
/// use fiber_vdom::element::{create_element, Element};
///
/// let list = create_element(
///     "ul",
///     [("className", "items")],
///     [create_element("li", [("id", "a")], ["foo"])],
/// );
/// assert_eq!(list.child_elements().len(), 1);
/// assert!(list.child_elements()[0].child_elements()[0].is_text());
/// ```
pub fn create_element<T, P, K, V, C>(ty: T, props: P, children: C) -> Element
where
    T: Into<ElementType>,
    P: IntoIterator<Item = (K, V)>,
    K: Into<PropKey>,
    V: Into<PropValue>,
    C: IntoIterator,
    C::Item: Into<Element>,
{
    let mut props: Props = props.into_iter().collect();
    props.children.extend(children.into_iter().map(Into::into));
    Element::new(ty, props)
}

/// Wrap a primitive value as a text element.
///
/// The result has type [`ElementType::Text`], a single `nodeValue` prop and
/// no children.
pub fn create_text_element(value: impl Into<PropValue>) -> Element {
    let mut props = Props::new();
    props.set(NODE_VALUE, value);
    Element::new(ElementType::Text, props)
}
