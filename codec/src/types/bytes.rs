//! Codec implementation for [Bytes].
//!
//! [Bytes] is a sequence of `u8` and shares its encoding with `Vec<u8>`: the varint of its length,
//! then each byte as a varint (bytes at or above `0x80` take two).

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};
use bytes::Bytes;

impl Describe for Bytes {
    fn describe() -> Type {
        Type::Sequence(Box::new(Type::U8))
    }
}

impl Write for Bytes {
    #[inline]
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self[..].write(encoder)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Read for Bytes {
    #[inline]
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        Vec::<u8>::read(decoder).map(Bytes::from)
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::bytes(self)
    }
}

impl FromValue for Bytes {
    fn from_value(value: &Value) -> Option<Self> {
        Vec::<u8>::from_value(value).map(Bytes::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode};

    #[test]
    fn test_bytes() {
        let values = [
            Bytes::new(),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from(vec![0xAB; 300]),
        ];
        for value in values {
            let encoded = encode(&value).unwrap();
            assert_eq!(encoded, encode(&value.to_vec()).unwrap());
            assert_eq!(decode::<Bytes>(encoded).unwrap(), value);
        }
    }

    #[test]
    fn test_high_bytes_take_two() {
        let encoded = encode(&Bytes::from_static(&[0x7F, 0x80])).unwrap();
        assert_eq!(&encoded[..], &[2, 0x7F, 0x80, 0x01]);
    }
}
