//! Records whose structure is discovered while decoding.
//!
//! When a struct is decoded into a dynamically typed slot there is no concrete type to fill, so its
//! fields are collected into a [GenericRecord] keyed by field tag. [GenericRecord::project] turns
//! it back into a concrete type.

use crate::{
    codec::{Describe, Read, Write},
    kind::Type,
    value::{FromValue, ToValue, Value},
    Decoder, Encoder, Error,
};
use std::collections::BTreeMap;

/// Positive integer identifying a struct field on the wire.
pub type Tag = u64;

/// Mapping from field tag to value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericRecord {
    fields: BTreeMap<Tag, Value>,
}

impl GenericRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, replacing (and returning) any previous value with the same tag.
    pub(crate) fn insert(&mut self, tag: Tag, value: Value) -> Option<Value> {
        self.fields.insert(tag, value)
    }

    pub fn get(&self, tag: Tag) -> Option<&Value> {
        self.fields.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over the fields in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &Value)> {
        self.fields.iter().map(|(tag, value)| (*tag, value))
    }

    /// Converts the record into a concrete type.
    ///
    /// Fields missing from the record (or that cannot be converted) are left at their defaults,
    /// and tags the target does not declare are dropped.
    pub fn project<T: FromRecord>(&self) -> T {
        T::from_record(self)
    }

    /// Projects the nested record stored under `tag`.
    pub fn sub<T: FromRecord>(&self, tag: Tag) -> Option<T> {
        self.get(tag)?.as_record().map(|record| record.project())
    }

    /// Converts the record into a map from tag to value.
    ///
    /// Nested records become maps as well, including those held in maps, sequences and arrays.
    /// Map keys are left untouched.
    pub fn to_map(&self) -> Value {
        let entries = self
            .fields
            .iter()
            .map(|(tag, value)| (Value::U64(*tag), convert(value)))
            .collect();
        Value::Map(Type::U64, Type::Any, entries)
    }
}

fn convert(value: &Value) -> Value {
    match value {
        Value::Record(nested) => nested.to_map(),
        Value::Array(elem, items) => {
            Value::Array(convert_type(elem), items.iter().map(convert).collect())
        }
        Value::Sequence(elem, items) => {
            Value::Sequence(convert_type(elem), items.iter().map(convert).collect())
        }
        Value::Map(key, elem, entries) => Value::Map(
            key.clone(),
            convert_type(elem),
            entries
                .iter()
                .map(|(key, value)| (key.clone(), convert(value)))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn convert_type(ty: &Type) -> Type {
    match ty {
        Type::Record => Type::Map(Box::new(Type::U64), Box::new(Type::Any)),
        Type::Array(len, elem) => Type::Array(*len, Box::new(convert_type(elem))),
        Type::Sequence(elem) => Type::Sequence(Box::new(convert_type(elem))),
        Type::Map(key, elem) => Type::Map(key.clone(), Box::new(convert_type(elem))),
        other => other.clone(),
    }
}

impl FromIterator<(Tag, Value)> for GenericRecord {
    fn from_iter<I: IntoIterator<Item = (Tag, Value)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Types that can be built from a [GenericRecord].
///
/// Implemented by `#[derive(Record)]`.
pub trait FromRecord: Sized {
    fn from_record(record: &GenericRecord) -> Self;
}

impl FromRecord for GenericRecord {
    fn from_record(record: &GenericRecord) -> Self {
        record.clone()
    }
}

impl Describe for GenericRecord {
    fn describe() -> Type {
        Type::Record
    }
}

impl Write for GenericRecord {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_record(self)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Read for GenericRecord {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        decoder.get_record()
    }
}

impl ToValue for GenericRecord {
    fn to_value(&self) -> Value {
        Value::Record(self.clone())
    }
}

impl FromValue for GenericRecord {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_record().cloned()
    }
}
