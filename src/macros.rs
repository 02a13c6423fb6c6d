//! Enum accessor macros
//!
//! These macros eliminate repetitive match code on value enums.
//! They use `paste` internally for identifier concatenation.

/// Generate is_xxx, as_xxx, as_xxx_mut for enums with single-field variants
///
/// Uses paste's `:camel` modifier to convert the method name to the variant name.
///
/// # Generated methods per variant:
/// - `is_xxx(&self) -> bool`
/// - `as_xxx(&self) -> Option<&Type>`
/// - `as_xxx_mut(&mut self) -> Option<&mut Type>`
///
/// # Example
/// ```ignore
/// impl PropValue {
///     // text -> Text, listener -> Listener
///     impl_enum_accessors!(text: CompactString, listener: Listener);
/// }
/// ```
#[macro_export]
macro_rules! impl_enum_accessors {
    ($($method:ident : $ty:ty),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Check if this is a `" $method "` value"]
                #[inline]
                pub fn [<is_ $method>](&self) -> bool {
                    matches!(self, Self::[<$method:camel>](_))
                }

                #[doc = "Get a reference to the `" $method "` payload"]
                #[inline]
                pub fn [<as_ $method>](&self) -> Option<&$ty> {
                    match self {
                        Self::[<$method:camel>](v) => Some(v),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }

                #[doc = "Get a mutable reference to the `" $method "` payload"]
                #[inline]
                pub fn [<as_ $method _mut>](&mut self) -> Option<&mut $ty> {
                    match self {
                        Self::[<$method:camel>](v) => Some(v),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            )*
        }
    };
}
