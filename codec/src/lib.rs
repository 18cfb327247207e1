//! Serialize self-describing data.
//!
//! # Overview
//!
//! A binary serialization library that writes values into a compact byte stream and reads them
//! back without a pre-shared schema:
//! - Values of a known type are written in their static form: only the payload the type implies.
//! - Values held as [Value] are written in their dynamic form: a type descriptor (a [Kind] id
//!   plus the shape of nested containers) then the payload. A reader without the writer's types
//!   can rebuild them, including structs (as [GenericRecord]s), and project them back into
//!   concrete types later.
//! - Opaque or third-party types are carried by [Handler]s registered under an extension id in a
//!   [Registry].
//!
//! # Supported Types
//!
//! Natively supports:
//! - Primitives: `bool`, `i8`..`i64`, `isize`, `u8`..`u64`, `usize`, `f32`, `f64`, [Complex]
//! - Strings: `String` and `str`
//! - Collections: `Vec<T>`, `[T]`, `[T; N]`, `HashMap<K, V>`, `BTreeMap<K, V>`, [bytes::Bytes]
//! - Indirection: `Option<T>`, `Box<T>`, `Arc<T>`, `Rc<T>`
//! - Structs with tagged fields, via `#[derive(Record)]`
//! - Arbitrary precision numbers from `num-bigint` and `num-rational` (feature `big`)
//!
//! Integers and floats are written as varints (see [varint]). Struct fields holding their zero
//! value are omitted from the wire and restored as defaults when decoding.
//!
//! # Example
//!
//! ```
//! use commonware_bin::{decode, decode_dynamic, encode, Record, ToValue};
//!
//! #[derive(Clone, Debug, Default, PartialEq, Record)]
//! struct Item {
//!     id: u64,
//!     #[bin(tag = 10)]
//!     name: String,
//!     labels: Vec<String>,
//! }
//!
//! let item = Item {
//!     id: 7,
//!     name: "widget".into(),
//!     labels: Vec::new(),
//! };
//!
//! // Static form: the empty `labels` field is omitted
//! let encoded = encode(&item).unwrap();
//! assert_eq!(decode::<Item>(encoded).unwrap(), item);
//!
//! // Dynamic form: decoded without knowing `Item`
//! let encoded = encode(&item.to_value()).unwrap();
//! let value = decode_dynamic(encoded).unwrap();
//! let record = value.as_record().unwrap();
//! assert_eq!(record.get(10).and_then(|name| name.as_str()), Some("widget"));
//! assert_eq!(record.project::<Item>(), item);
//! ```
//!
//! # Untrusted Input
//!
//! Decoding bounds every declared length by [Config::length] and by the remaining input before
//! allocating, and limits nesting to [Config::max_depth]. Use [decode_cfg] to tighten the limits.

// Allows the derive macro to refer to this crate by name in its own tests.
extern crate self as commonware_bin;

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod extension;
pub mod handler;
pub mod kind;
pub mod normalize;
pub mod record;
pub mod registry;
pub mod shape;
pub mod types;
pub mod value;
pub mod varint;

// Re-export main types and traits
pub use codec::{Codec, Describe, Read, Write};
pub use commonware_bin_derive::Record;
pub use config::{Config, RangeCfg};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::{BoxError, Error};
pub use extension::{Extension, MarshalBinary, MarshalText, TypeKey};
pub use handler::Handler;
pub use kind::{ExtensionType, Id, Kind, Type};
pub use record::{FromRecord, GenericRecord, Tag};
pub use registry::{Capability, Registry};
pub use types::complex::Complex;
pub use value::{FromValue, ToValue, Value};

use bytes::{Buf, BytesMut};
use std::any::type_name;

/// Encodes a value in its static form, resolving extensions through [Registry::global].
pub fn encode<T: Write + ?Sized>(value: &T) -> Result<BytesMut, Error> {
    encode_with(value, Registry::global())
}

/// Encodes a value in its static form, resolving extensions through `registry`.
pub fn encode_with<T: Write + ?Sized>(value: &T, registry: &Registry) -> Result<BytesMut, Error> {
    let mut buf = BytesMut::new();
    Encoder::with_registry(&mut buf, registry).encode(value)?;
    Ok(buf)
}

/// Decodes a value in its static form with the default [Config].
///
/// Fails with [Error::ExtraData] if the input is not fully consumed.
pub fn decode<T: Read>(buf: impl Buf) -> Result<T, Error> {
    decode_cfg(buf, Config::default())
}

/// Decodes a value in its static form with the given limits.
pub fn decode_cfg<T: Read>(buf: impl Buf, cfg: Config) -> Result<T, Error> {
    decode_with(buf, Registry::global(), cfg)
}

/// Decodes a value in its static form, resolving extensions through `registry`.
pub fn decode_with<T: Read>(mut buf: impl Buf, registry: &Registry, cfg: Config) -> Result<T, Error> {
    let value = Decoder::with_registry(&mut buf, registry, cfg).decode()?;
    if buf.has_remaining() {
        return Err(Error::ExtraData(buf.remaining()));
    }
    Ok(value)
}

/// Decodes a value written in its dynamic form (for example, by encoding a [Value]).
pub fn decode_dynamic(buf: impl Buf) -> Result<Value, Error> {
    decode::<Value>(buf)
}

/// Decodes a value written in its dynamic form and projects it into `T`.
///
/// Fails with [Error::Projection] if the decoded value cannot be represented as a `T`.
pub fn decode_as<T: FromValue>(buf: impl Buf) -> Result<T, Error> {
    let value = decode_dynamic(buf)?;
    T::from_value(&value).ok_or(Error::Projection(type_name::<T>()))
}

/// Registers an extension type in [Registry::global]. See [Registry::register].
pub fn register<T: Extension + Default>(id: Id, handler: Handler) {
    Registry::global().register::<T>(id, handler);
}

/// Associates an extension type with an id already in [Registry::global]. See [Registry::alias].
pub fn alias<T: Extension + Default>(id: Id) {
    Registry::global().alias::<T>(id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, Default, PartialEq, Record)]
    struct Inner {
        flag: bool,
        score: f64,
    }

    #[derive(Clone, Debug, Default, PartialEq, Record)]
    struct Outer {
        #[bin(tag = 5)]
        inner: Inner,
        values: Vec<i32>,
        #[bin(skip)]
        cache: u32,
    }

    #[test]
    fn test_decode_as() {
        let outer = Outer {
            inner: Inner {
                flag: true,
                score: 0.5,
            },
            values: vec![1, 2],
            cache: 9,
        };
        let encoded = encode(&outer.to_value()).unwrap();
        let decoded = decode_as::<Outer>(encoded).unwrap();
        assert_eq!(
            decoded,
            Outer {
                cache: 0,
                ..outer
            }
        );
    }

    #[test]
    fn test_decode_as_mismatch() {
        let encoded = encode(&"text".to_value()).unwrap();
        assert!(matches!(
            decode_as::<u32>(encoded),
            Err(Error::Projection(_))
        ));
    }

    #[test]
    fn test_custom_registry() {
        let registry = Registry::new();
        let encoded = encode_with(&Value::Bool(true), &registry).unwrap();
        let decoded: Value = decode_with(encoded, &registry, Config::default()).unwrap();
        assert_eq!(decoded, Value::Bool(true));
    }
}
