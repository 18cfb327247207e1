//! Codec implementations for sequences and fixed-size arrays.
//!
//! A sequence (`Vec<T>`, `[T]`) is written as the varint of its length followed by each element in
//! its static form. A fixed-size array (`[T; N]`) omits the length, which is part of its type.
//!
//! When decoding, the declared length is bounded by [crate::Config::length] and by the remaining
//! input (using the minimum encoded size of an element) before anything is allocated.

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};

impl<T: Describe> Describe for [T] {
    fn describe() -> Type {
        Type::Sequence(Box::new(T::describe()))
    }
}

impl<T: Write> Write for [T] {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_len(self.len());
        for item in self {
            item.write(encoder)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Describe + ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        Value::Sequence(T::describe(), self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe() -> Type {
        <[T]>::describe()
    }
}

impl<T: Write> Write for Vec<T> {
    #[inline]
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self.as_slice().write(encoder)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Read> Read for Vec<T> {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        let len = decoder.get_len(decoder.min_size(&T::describe()))?;
        decoder.nested(|decoder| {
            let mut items = Vec::with_capacity(len.min(decoder.remaining()));
            for _ in 0..len {
                items.push(T::read(decoder)?);
            }
            Ok(items)
        })
    }
}

impl<T: Describe + ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        self.as_slice().to_value()
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Sequence(_, items) | Value::Array(_, items) => {
                items.iter().map(T::from_value).collect()
            }
            _ => None,
        }
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe() -> Type {
        Type::Array(N, Box::new(T::describe()))
    }
}

impl<T: Write, const N: usize> Write for [T; N] {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        for item in self {
            item.write(encoder)?;
        }
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.iter().all(Write::is_zero)
    }
}

impl<T: Read, const N: usize> Read for [T; N] {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        decoder.check_len(N, decoder.min_size(&T::describe()))?;
        let items = decoder.nested(|decoder| {
            let mut items = Vec::with_capacity(N);
            for _ in 0..N {
                items.push(T::read(decoder)?);
            }
            Ok(items)
        })?;
        items
            .try_into()
            .map_err(|items: Vec<T>| Error::InvalidLength(items.len() as u64))
    }
}

impl<T: Describe + ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        Value::Array(T::describe(), self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_items()?;
        if items.len() != N {
            return None;
        }
        let items: Vec<T> = items.iter().map(T::from_value).collect::<Option<_>>()?;
        items.try_into().ok()
    }
}
