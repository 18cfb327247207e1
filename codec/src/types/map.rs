//! Codec implementations for maps.
//!
//! A map is written as the varint of its entry count followed by each key and value in their
//! static forms. Entries of a [HashMap] are written in iteration order, so two encodings of the
//! same map may differ; [BTreeMap] entries are written in key order.
//!
//! Keys must be of a comparable kind (not a sequence or map). When decoding, a repeated key keeps
//! the last value.

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};
use std::{
    collections::{BTreeMap, HashMap},
    hash::{BuildHasher, Hash},
};

fn check_key<K: Describe>() -> Result<(), Error> {
    let kind = K::describe().kind();
    if !kind.is_comparable() {
        return Err(Error::NotComparable(kind));
    }
    Ok(())
}

fn write_entries<'a, K, V>(
    encoder: &mut Encoder<'_>,
    len: usize,
    entries: impl Iterator<Item = (&'a K, &'a V)>,
) -> Result<(), Error>
where
    K: Describe + Write + 'a,
    V: Write + 'a,
{
    check_key::<K>()?;
    encoder.put_len(len);
    for (key, value) in entries {
        key.write(encoder)?;
        value.write(encoder)?;
    }
    Ok(())
}

fn read_entries<K: Read, V: Read>(
    decoder: &mut Decoder<'_>,
    mut insert: impl FnMut(K, V),
) -> Result<(), Error> {
    check_key::<K>()?;
    let min_size = decoder
        .min_size(&K::describe())
        .saturating_add(decoder.min_size(&V::describe()));
    let len = decoder.get_len(min_size)?;
    decoder.nested(|decoder| {
        for _ in 0..len {
            let key = K::read(decoder)?;
            let value = V::read(decoder)?;
            insert(key, value);
        }
        Ok(())
    })
}

fn to_map_value<'a, K, V>(entries: impl Iterator<Item = (&'a K, &'a V)>) -> Value
where
    K: Describe + ToValue + 'a,
    V: Describe + ToValue + 'a,
{
    Value::Map(
        K::describe(),
        V::describe(),
        entries.map(|(k, v)| (k.to_value(), v.to_value())).collect(),
    )
}

fn from_map_value<K: FromValue, V: FromValue, M: FromIterator<(K, V)>>(
    value: &Value,
) -> Option<M> {
    value
        .as_entries()?
        .iter()
        .map(|(k, v)| Some((K::from_value(k)?, V::from_value(v)?)))
        .collect()
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe() -> Type {
        Type::Map(Box::new(K::describe()), Box::new(V::describe()))
    }
}

impl<K: Describe + Write, V: Write, S> Write for HashMap<K, V, S> {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        write_entries(encoder, self.len(), self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K, V, S> Read for HashMap<K, V, S>
where
    K: Read + Eq + Hash,
    V: Read,
    S: BuildHasher + Default,
{
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut map = HashMap::default();
        read_entries(decoder, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }
}

impl<K, V, S> ToValue for HashMap<K, V, S>
where
    K: Describe + ToValue,
    V: Describe + ToValue,
{
    fn to_value(&self) -> Value {
        to_map_value(self.iter())
    }
}

impl<K, V, S> FromValue for HashMap<K, V, S>
where
    K: FromValue + Eq + Hash,
    V: FromValue,
    S: BuildHasher + Default,
{
    fn from_value(value: &Value) -> Option<Self> {
        from_map_value(value)
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe() -> Type {
        Type::Map(Box::new(K::describe()), Box::new(V::describe()))
    }
}

impl<K: Describe + Write, V: Write> Write for BTreeMap<K, V> {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        write_entries(encoder, self.len(), self.iter())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<K: Read + Ord, V: Read> Read for BTreeMap<K, V> {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        let mut map = BTreeMap::new();
        read_entries(decoder, |k, v| {
            map.insert(k, v);
        })?;
        Ok(map)
    }
}

impl<K: Describe + ToValue, V: Describe + ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        to_map_value(self.iter())
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: &Value) -> Option<Self> {
        from_map_value(value)
    }
}
