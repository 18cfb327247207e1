//! Dynamically typed values.
//!
//! A [Value] holds anything the codec can put on the wire. It is what a dynamically typed slot
//! (a field of type [Value], or a top-level [crate::decode_dynamic]) holds after decoding, and it
//! is how statically typed data is presented to such a slot ([ToValue]). [FromValue] performs the
//! reverse conversion, leniently: values that cannot be represented in the target type yield
//! `None` rather than an error.

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    extension::Extension,
    kind::{ExtensionType, Kind, Type},
    record::GenericRecord,
    types::complex::Complex,
    Error,
};
use std::sync::Arc;

/// A self-describing value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    /// A platform-sized signed integer.
    Int(i64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    /// A platform-sized unsigned integer.
    Uint(u64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    C64(Complex<f32>),
    C128(Complex<f64>),
    String(String),
    /// Fixed-length array and its element type.
    Array(Type, Vec<Value>),
    /// Variable-length sequence and its element type.
    Sequence(Type, Vec<Value>),
    /// Map with its key and value types. Entries keep their decode (or insertion) order.
    Map(Type, Type, Vec<(Value, Value)>),
    Record(GenericRecord),
    Extension(Arc<dyn Extension>),
    /// Placeholder for channel and function kinds, which carry no data.
    Unsupported(Kind),
}

impl Value {
    /// Builds a byte sequence.
    pub fn bytes(bytes: &[u8]) -> Self {
        Self::Sequence(Type::U8, bytes.iter().copied().map(Self::U8).collect())
    }

    /// Returns the kind of the value.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Nil => Kind::Nil,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::I8(_) => Kind::I8,
            Self::I16(_) => Kind::I16,
            Self::I32(_) => Kind::I32,
            Self::I64(_) => Kind::I64,
            Self::Uint(_) => Kind::Uint,
            Self::U8(_) => Kind::U8,
            Self::U16(_) => Kind::U16,
            Self::U32(_) => Kind::U32,
            Self::U64(_) => Kind::U64,
            Self::F32(_) => Kind::F32,
            Self::F64(_) => Kind::F64,
            Self::C64(_) => Kind::C64,
            Self::C128(_) => Kind::C128,
            Self::String(_) => Kind::String,
            Self::Array(..) => Kind::Array,
            Self::Sequence(..) => Kind::Sequence,
            Self::Map(..) => Kind::Map,
            Self::Record(_) => Kind::Record,
            Self::Extension(_) => Kind::Extension,
            Self::Unsupported(kind) => *kind,
        }
    }

    /// Returns the full descriptor of the value.
    pub fn type_of(&self) -> Type {
        match self {
            Self::Array(elem, items) => Type::Array(items.len(), Box::new(elem.clone())),
            Self::Sequence(elem, _) => Type::Sequence(Box::new(elem.clone())),
            Self::Map(key, value, _) => Type::Map(Box::new(key.clone()), Box::new(value.clone())),
            Self::Extension(ext) => Type::Extension(ExtensionType::Local(ext.type_key())),
            Self::Unsupported(kind) => Type::Unsupported(*kind),
            // Every remaining kind is a scalar.
            other => Type::scalar(other.kind()).unwrap_or(Type::Nil),
        }
    }

    /// Returns true for the absent value.
    ///
    /// Only [Value::Nil] is zero: a dynamically typed slot holding `0` or `""` is still present.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&GenericRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Returns the elements of an array or sequence.
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Self::Array(_, items) | Self::Sequence(_, items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a map.
    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Map(_, _, entries) => Some(entries),
            _ => None,
        }
    }

    /// Returns any integer widened to `i128`.
    pub fn as_integer(&self) -> Option<i128> {
        Some(match *self {
            Self::Int(v) | Self::I64(v) => v.into(),
            Self::I8(v) => v.into(),
            Self::I16(v) => v.into(),
            Self::I32(v) => v.into(),
            Self::Uint(v) | Self::U64(v) => v.into(),
            Self::U8(v) => v.into(),
            Self::U16(v) => v.into(),
            Self::U32(v) => v.into(),
            _ => return None,
        })
    }

    /// Returns any float or integer as an `f64`.
    pub fn as_float(&self) -> Option<f64> {
        match *self {
            Self::F32(v) => Some(v.into()),
            Self::F64(v) => Some(v),
            _ => self.as_integer().map(|v| v as f64),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Nil, Self::Nil) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) | (Self::I64(a), Self::I64(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::Uint(a), Self::Uint(b)) | (Self::U64(a), Self::U64(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::C64(a), Self::C64(b)) => a == b,
            (Self::C128(a), Self::C128(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(ta, a), Self::Array(tb, b)) | (Self::Sequence(ta, a), Self::Sequence(tb, b)) => {
                ta == tb && a == b
            }
            (Self::Map(ka, va, a), Self::Map(kb, vb, b)) => ka == kb && va == vb && a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            (Self::Extension(a), Self::Extension(b)) => a.eq_extension(b.as_ref()),
            (Self::Unsupported(a), Self::Unsupported(b)) => a == b,
            _ => false,
        }
    }
}

/// Presents a value to a dynamically typed slot.
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Converts a dynamic value back into a concrete type.
///
/// Returns `None` when the value cannot be represented (wrong kind, integer out of range, or a
/// nested element that cannot be converted).
pub trait FromValue: Sized {
    fn from_value(value: &Value) -> Option<Self>;
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

// A value occupies a dynamically typed slot wherever it appears.
impl Describe for Value {
    fn describe() -> Type {
        Type::Any
    }
}

impl Write for Value {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_dynamic(self)
    }

    fn is_zero(&self) -> bool {
        self.is_nil()
    }
}

impl Read for Value {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        decoder.get_dynamic()
    }
}
