//! Opaque values encoded through registered handlers.
//!
//! Types that are not built into the codec (third-party numbers, handles, anything with its own
//! binary or text form) implement [Extension] and are registered under an id with a
//! [crate::Handler]. The [crate::extension] macro provides the boilerplate.

use crate::{error::BoxError, kind::Type, value::Value};
use std::{
    any::{type_name, Any, TypeId},
    fmt::{self, Debug},
    hash::{Hash, Hasher},
};

/// A value whose encoding is delegated to a registered handler.
pub trait Extension: Any + Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Identity of the concrete type, used for registry lookups.
    fn type_key(&self) -> TypeKey;

    /// Compares with another extension value (false when the concrete types differ).
    fn eq_extension(&self, other: &dyn Extension) -> bool;

    fn clone_extension(&self) -> Box<dyn Extension>;

    /// Exposes the binary capability, if the type has one.
    fn as_binary(&self) -> Option<&dyn MarshalBinary> {
        None
    }

    fn as_binary_mut(&mut self) -> Option<&mut dyn MarshalBinary> {
        None
    }

    /// Exposes the text capability, if the type has one.
    fn as_text(&self) -> Option<&dyn MarshalText> {
        None
    }

    fn as_text_mut(&mut self) -> Option<&mut dyn MarshalText> {
        None
    }
}

impl Clone for Box<dyn Extension> {
    fn clone(&self) -> Self {
        self.clone_extension()
    }
}

/// Types with their own binary representation.
pub trait MarshalBinary {
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError>;

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Types with their own textual representation.
pub trait MarshalText {
    fn marshal_text(&self) -> Result<String, BoxError>;

    fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError>;
}

/// Identity of an extension type, able to construct a fresh (default) value of it.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    make: fn() -> Box<dyn Extension>,
}

fn make<T: Extension + Default>() -> Box<dyn Extension> {
    Box::new(T::default())
}

impl TypeKey {
    pub fn of<T: Extension + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            make: make::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Allocates a default value of the type.
    pub fn make(&self) -> Box<dyn Extension> {
        (self.make)()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Projects a dynamic value into an extension type.
///
/// Accepts the extension itself, or the fallback forms produced when a capability id is decoded
/// without a concrete type: a byte sequence (binary) or a string (text).
pub fn project<T: Extension + Default + Clone>(value: &Value) -> Option<T> {
    match value {
        Value::Extension(ext) => ext.as_any().downcast_ref::<T>().cloned(),
        Value::Sequence(Type::U8, items) => {
            let bytes = items
                .iter()
                .map(|item| match item {
                    Value::U8(b) => Some(*b),
                    _ => None,
                })
                .collect::<Option<Vec<u8>>>()?;
            let mut target = T::default();
            target.as_binary_mut()?.unmarshal_binary(&bytes).ok()?;
            Some(target)
        }
        Value::String(text) => {
            let mut target = T::default();
            target.as_text_mut()?.unmarshal_text(text).ok()?;
            Some(target)
        }
        _ => None,
    }
}

/// Implements [Extension] and the codec traits for a type, delegating its encoding to the
/// handler registered for it.
///
/// The type must implement `Clone`, `Debug`, `Default`, `PartialEq`, `Send` and `Sync`. List the
/// capabilities (`binary`, `text`) it exposes after a colon.
///
/// ```
/// use commonware_bin::{extension, BoxError, MarshalText};
///
/// #[derive(Clone, Debug, Default, PartialEq)]
/// struct Celsius(i32);
///
/// impl MarshalText for Celsius {
///     fn marshal_text(&self) -> Result<String, BoxError> {
///         Ok(format!("{}C", self.0))
///     }
///
///     fn unmarshal_text(&mut self, text: &str) -> Result<(), BoxError> {
///         self.0 = text.trim_end_matches('C').parse()?;
///         Ok(())
///     }
/// }
///
/// extension!(Celsius: text);
/// ```
#[macro_export]
macro_rules! extension {
    (@cap binary) => {
        fn as_binary(&self) -> ::core::option::Option<&dyn $crate::MarshalBinary> {
            ::core::option::Option::Some(self)
        }

        fn as_binary_mut(&mut self) -> ::core::option::Option<&mut dyn $crate::MarshalBinary> {
            ::core::option::Option::Some(self)
        }
    };
    (@cap text) => {
        fn as_text(&self) -> ::core::option::Option<&dyn $crate::MarshalText> {
            ::core::option::Option::Some(self)
        }

        fn as_text_mut(&mut self) -> ::core::option::Option<&mut dyn $crate::MarshalText> {
            ::core::option::Option::Some(self)
        }
    };
    (@impl $type:ty, [$($cap:ident),*]) => {
        impl $crate::Extension for $type {
            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn type_key(&self) -> $crate::TypeKey {
                $crate::TypeKey::of::<Self>()
            }

            fn eq_extension(&self, other: &dyn $crate::Extension) -> bool {
                other
                    .as_any()
                    .downcast_ref::<Self>()
                    .is_some_and(|other| other == self)
            }

            fn clone_extension(&self) -> ::std::boxed::Box<dyn $crate::Extension> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            $($crate::extension!(@cap $cap);)*
        }

        impl $crate::Describe for $type {
            fn describe() -> $crate::Type {
                $crate::Type::Extension($crate::ExtensionType::Local($crate::TypeKey::of::<Self>()))
            }
        }

        impl $crate::Write for $type {
            fn write(&self, encoder: &mut $crate::Encoder<'_>) -> ::core::result::Result<(), $crate::Error> {
                encoder.put_extension(self)
            }

            fn is_zero(&self) -> bool {
                *self == <Self as ::core::default::Default>::default()
            }
        }

        impl $crate::Read for $type {
            fn read(decoder: &mut $crate::Decoder<'_>) -> ::core::result::Result<Self, $crate::Error> {
                decoder.get_extension::<Self>()
            }
        }

        impl $crate::ToValue for $type {
            fn to_value(&self) -> $crate::Value {
                $crate::Value::Extension(::std::sync::Arc::new(::core::clone::Clone::clone(self)))
            }
        }

        impl $crate::FromValue for $type {
            fn from_value(value: &$crate::Value) -> ::core::option::Option<Self> {
                $crate::extension::project::<Self>(value)
            }
        }
    };
    ($type:ty : $($cap:ident),+) => {
        $crate::extension!(@impl $type, [$($cap),+]);
    };
    ($type:ty) => {
        $crate::extension!(@impl $type, []);
    };
}
