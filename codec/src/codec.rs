//! Core codec traits

use crate::{
    decoder::Decoder,
    encoder::Encoder,
    error::Error,
    kind::Type,
    value::{FromValue, ToValue},
};

/// Trait for types that know their own wire descriptor.
pub trait Describe {
    /// Returns the descriptor written when a value of this type enters a dynamically typed slot.
    fn describe() -> Type;
}

/// Trait for types that can be written (encoded) through an [Encoder].
pub trait Write {
    /// Encodes this value using its static (schema-implied) form.
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error>;

    /// Returns true if this is the zero value of its type.
    ///
    /// Zero-valued record fields are omitted from the wire and restored as defaults when decoding.
    fn is_zero(&self) -> bool {
        false
    }
}

/// Trait for types that can be read (decoded) through a [Decoder].
pub trait Read: Describe + Sized {
    /// Reads a value using its static (schema-implied) form, consuming the necessary bytes.
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error>;
}

/// Trait for types that can be encoded, decoded, and converted to and from dynamic values.
pub trait Codec: Write + Read + ToValue + FromValue {}

// Automatically implement `Codec` for types that implement all of its parts.
impl<T: Write + Read + ToValue + FromValue> Codec for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode, Value};

    #[derive(Debug, PartialEq)]
    struct Celsius(i16);

    impl Describe for Celsius {
        fn describe() -> Type {
            Type::I16
        }
    }

    impl Write for Celsius {
        fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
            self.0.write(encoder)
        }

        fn is_zero(&self) -> bool {
            self.0 == 0
        }
    }

    impl Read for Celsius {
        fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
            i16::read(decoder).map(Self)
        }
    }

    #[test]
    fn test_manual_impl() {
        let encoded = encode(&Celsius(21)).unwrap();
        assert_eq!(&encoded[..], &[21]);
        assert_eq!(decode::<Celsius>(encoded).unwrap(), Celsius(21));
        assert!(Celsius(0).is_zero());
    }

    #[test]
    fn test_insufficient_buffer() {
        assert!(matches!(decode::<Celsius>(&[][..]), Err(Error::Truncated)));
    }

    #[test]
    fn test_extra_data() {
        assert!(matches!(
            decode::<Celsius>(&[0x01, 0x02][..]),
            Err(Error::ExtraData(1))
        ));
    }

    #[test]
    fn test_default_is_not_zero() {
        assert!(!Value::I16(0).is_zero());
        assert!(Value::Nil.is_zero());
    }
}
