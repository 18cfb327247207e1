//! Wire kinds and type descriptors.
//!
//! Every value written through a dynamically typed slot is prefixed with a [Kind] identifier (a
//! varint). Ids `0..=127` are reserved for built-in kinds, ids `128..` for registered extensions.
//! A [Type] is the decoder's view of a type: the tree of kinds needed to decode a payload.

use crate::{extension::TypeKey, Error};

/// Identifier of a registered extension kind.
pub type Id = u64;

/// First id available to user registrations.
pub const FIRST_USER_ID: Id = 128;

/// Built-in wire kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Kind {
    Nil = 0,
    Bool = 1,
    Int = 2,
    I8 = 3,
    I16 = 4,
    I32 = 5,
    I64 = 6,
    Uint = 7,
    U8 = 8,
    U16 = 9,
    U32 = 10,
    U64 = 11,
    F32 = 13,
    F64 = 14,
    C64 = 15,
    C128 = 16,
    Array = 17,
    Chan = 18,
    Func = 19,
    Any = 20,
    Map = 21,
    Sequence = 23,
    String = 24,
    Record = 25,
    /// Any id at or above 65 (built-in extensions and user registrations).
    Extension = 65,
}

impl Kind {
    /// Resolves a wire id into a kind.
    pub fn from_id(id: u64) -> Result<Self, Error> {
        Ok(match id {
            0 => Self::Nil,
            1 => Self::Bool,
            2 => Self::Int,
            3 => Self::I8,
            4 => Self::I16,
            5 => Self::I32,
            6 => Self::I64,
            7 => Self::Uint,
            8 => Self::U8,
            9 => Self::U16,
            10 => Self::U32,
            11 => Self::U64,
            13 => Self::F32,
            14 => Self::F64,
            15 => Self::C64,
            16 => Self::C128,
            17 => Self::Array,
            18 => Self::Chan,
            19 => Self::Func,
            20 => Self::Any,
            21 => Self::Map,
            23 => Self::Sequence,
            24 => Self::String,
            25 => Self::Record,
            65.. => Self::Extension,
            _ => return Err(Error::InvalidKind(id)),
        })
    }

    /// Returns true for kinds that can be used as map keys.
    pub fn is_comparable(self) -> bool {
        !matches!(self, Self::Sequence | Self::Map)
    }
}

/// How an extension type is identified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExtensionType {
    /// A Rust type known to this process (resolved through the registry when encoding).
    Local(TypeKey),
    /// A registered id read from the wire.
    Wire(Id),
}

/// Descriptor of a (possibly nested) type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Bool,
    Int,
    I8,
    I16,
    I32,
    I64,
    Uint,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    C64,
    C128,
    String,
    Array(usize, Box<Type>),
    Sequence(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Record,
    /// A dynamically typed slot. Values stored here carry their own kind.
    Any,
    Extension(ExtensionType),
    /// Channel and function kinds. They carry no payload.
    Unsupported(Kind),
}

impl Type {
    /// Returns the kind written for this type.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Nil => Kind::Nil,
            Self::Bool => Kind::Bool,
            Self::Int => Kind::Int,
            Self::I8 => Kind::I8,
            Self::I16 => Kind::I16,
            Self::I32 => Kind::I32,
            Self::I64 => Kind::I64,
            Self::Uint => Kind::Uint,
            Self::U8 => Kind::U8,
            Self::U16 => Kind::U16,
            Self::U32 => Kind::U32,
            Self::U64 => Kind::U64,
            Self::F32 => Kind::F32,
            Self::F64 => Kind::F64,
            Self::C64 => Kind::C64,
            Self::C128 => Kind::C128,
            Self::String => Kind::String,
            Self::Array(..) => Kind::Array,
            Self::Sequence(_) => Kind::Sequence,
            Self::Map(..) => Kind::Map,
            Self::Record => Kind::Record,
            Self::Any => Kind::Any,
            Self::Extension(_) => Kind::Extension,
            Self::Unsupported(kind) => *kind,
        }
    }

    /// Returns the descriptor of a scalar kind (`None` for kinds that need more information).
    pub fn scalar(kind: Kind) -> Option<Self> {
        Some(match kind {
            Kind::Nil => Self::Nil,
            Kind::Bool => Self::Bool,
            Kind::Int => Self::Int,
            Kind::I8 => Self::I8,
            Kind::I16 => Self::I16,
            Kind::I32 => Self::I32,
            Kind::I64 => Self::I64,
            Kind::Uint => Self::Uint,
            Kind::U8 => Self::U8,
            Kind::U16 => Self::U16,
            Kind::U32 => Self::U32,
            Kind::U64 => Self::U64,
            Kind::F32 => Self::F32,
            Kind::F64 => Self::F64,
            Kind::C64 => Self::C64,
            Kind::C128 => Self::C128,
            Kind::String => Self::String,
            Kind::Record => Self::Record,
            Kind::Any => Self::Any,
            Kind::Chan | Kind::Func => Self::Unsupported(kind),
            Kind::Array | Kind::Sequence | Kind::Map | Kind::Extension => return None,
        })
    }

    /// Minimum number of bytes a payload of this type occupies.
    ///
    /// Used to bound declared lengths against the remaining input before allocating.
    pub fn min_size(&self) -> usize {
        match self {
            Self::Array(len, elem) => len.saturating_mul(elem.min_size()),
            Self::C64 | Self::C128 => 2,
            Self::Any => 1,
            // Channel and function kinds carry no payload.
            Self::Extension(_) | Self::Unsupported(_) => 0,
            _ => 1,
        }
    }

    /// Returns the key and element types of a map, or the element type of an array or sequence.
    pub fn key_elem(&self) -> (Option<&Type>, Option<&Type>) {
        match self {
            Self::Map(key, value) => (Some(key), Some(value)),
            Self::Array(_, elem) | Self::Sequence(elem) => (None, Some(elem)),
            _ => (None, None),
        }
    }
}
