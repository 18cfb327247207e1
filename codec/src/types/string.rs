//! Codec implementations for strings.
//!
//! A string is written as the varint of its length in bytes followed by its UTF-8 bytes.

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};

impl Describe for str {
    fn describe() -> Type {
        Type::String
    }
}

impl Write for str {
    #[inline]
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_bytes(self.as_bytes());
        Ok(())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl Describe for String {
    fn describe() -> Type {
        Type::String
    }
}

impl Write for String {
    #[inline]
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self.as_str().write(encoder)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Read for String {
    #[inline]
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        decoder.get_string()
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}
