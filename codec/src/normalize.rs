//! Indirection.
//!
//! Wrappers such as `Option<T>` or `Box<T>` are transparent on the wire: they describe, write and
//! read as their target. Chains (`Option<Box<T>>`) resolve one layer at a time. Decoding always
//! allocates a fresh wrapper around a freshly read target.
//!
//! An absent `Option` is the zero value of its slot. It is omitted from records, becomes
//! [Value::Nil] in a dynamically typed slot, and cannot be written anywhere else ([Error::Absent]).

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};
use std::{rc::Rc, sync::Arc};

/// A wrapper around at most one value of its target type.
pub trait Indirect: Sized {
    type Target;

    /// Unwraps one layer (`None` if the wrapper is empty).
    fn resolve(&self) -> Option<&Self::Target>;

    /// Wraps a freshly decoded target.
    fn alloc(target: Self::Target) -> Self;

    /// Returns the empty wrapper, if the wrapper can be empty.
    fn absent() -> Option<Self> {
        None
    }
}

impl<T> Indirect for Option<T> {
    type Target = T;

    fn resolve(&self) -> Option<&T> {
        self.as_ref()
    }

    fn alloc(target: T) -> Self {
        Some(target)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

macro_rules! impl_pointer {
    ($($pointer:ident),+) => {
        $(
            impl<T> Indirect for $pointer<T> {
                type Target = T;

                fn resolve(&self) -> Option<&T> {
                    Some(&**self)
                }

                fn alloc(target: T) -> Self {
                    $pointer::new(target)
                }
            }
        )+
    };
}

impl_pointer!(Box, Arc, Rc);

// Implements the codec traits for wrappers in terms of their target.
macro_rules! impl_indirect {
    ($($wrapper:ident),+) => {
        $(
            impl<T: Describe> Describe for $wrapper<T> {
                fn describe() -> Type {
                    T::describe()
                }
            }

            impl<T: Write> Write for $wrapper<T> {
                fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
                    self.resolve().ok_or(Error::Absent)?.write(encoder)
                }

                // A present optional is never zero, even if its target is.
                fn is_zero(&self) -> bool {
                    match self.resolve() {
                        None => true,
                        Some(target) => Self::absent().is_none() && target.is_zero(),
                    }
                }
            }

            impl<T: Read> Read for $wrapper<T> {
                fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
                    T::read(decoder).map(Self::alloc)
                }
            }

            impl<T: ToValue> ToValue for $wrapper<T> {
                fn to_value(&self) -> Value {
                    self.resolve().map_or(Value::Nil, ToValue::to_value)
                }
            }

            impl<T: FromValue> FromValue for $wrapper<T> {
                fn from_value(value: &Value) -> Option<Self> {
                    if value.is_nil() {
                        if let Some(absent) = Self::absent() {
                            return Some(absent);
                        }
                    }
                    T::from_value(value).map(Self::alloc)
                }
            }
        )+
    };
}

impl_indirect!(Option, Box, Arc, Rc);
