//! Codec implementations for Rust primitive types.
//!
//! Every integer is written as a varint: unsigned integers directly, signed integers as the
//! varint of their sign-extended two's-complement bits (so negative values always occupy ten
//! bytes). Floats are written as the varint of their IEEE 754 bits.
//!
//! `isize` and `usize` map to the platform-sized kinds ([Kind::Int] and [Kind::Uint]) and are
//! always carried as 64-bit values, keeping the wire format identical across architectures.
//!
//! `()` is the static carrier of [Kind::Nil].
//!
//! [Kind::Nil]: crate::Kind::Nil
//! [Kind::Int]: crate::Kind::Int
//! [Kind::Uint]: crate::Kind::Uint

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};
use paste::paste;

// The unit type carries nil: a single zero byte.
impl Describe for () {
    fn describe() -> Type {
        Type::Nil
    }
}

impl Write for () {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_varint(0);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        true
    }
}

impl Read for () {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        match decoder.get_varint()? {
            0 => Ok(()),
            raw => Err(Error::InvalidValue("nil", format!("{raw}"))),
        }
    }
}

impl ToValue for () {
    fn to_value(&self) -> Value {
        Value::Nil
    }
}

impl FromValue for () {
    fn from_value(value: &Value) -> Option<Self> {
        matches!(value, Value::Nil).then_some(())
    }
}

impl Describe for bool {
    fn describe() -> Type {
        Type::Bool
    }
}

impl Write for bool {
    #[inline]
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        encoder.put_bool(*self);
        Ok(())
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Read for bool {
    #[inline]
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        decoder.get_bool()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for bool {
    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }
}

// Integers convert from any integer value that fits.
macro_rules! impl_integer {
    ($type:ident, $put:ident, $get:ident) => {
        paste! {
            impl Describe for $type {
                fn describe() -> Type {
                    Type::[<$type:upper>]
                }
            }

            impl Write for $type {
                #[inline]
                fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
                    encoder.$put(*self);
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    *self == 0
                }
            }

            impl Read for $type {
                #[inline]
                fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
                    decoder.$get::<$type>()
                }
            }

            impl ToValue for $type {
                fn to_value(&self) -> Value {
                    Value::[<$type:upper>](*self)
                }
            }

            impl FromValue for $type {
                fn from_value(value: &Value) -> Option<Self> {
                    value.as_integer().and_then(|v| $type::try_from(v).ok())
                }
            }
        }
    };
}

impl_integer!(i8, put_signed, get_signed);
impl_integer!(i16, put_signed, get_signed);
impl_integer!(i32, put_signed, get_signed);
impl_integer!(i64, put_signed, get_signed);
impl_integer!(u8, put_unsigned, get_unsigned);
impl_integer!(u16, put_unsigned, get_unsigned);
impl_integer!(u32, put_unsigned, get_unsigned);
impl_integer!(u64, put_unsigned, get_unsigned);

// Platform-sized integers travel as their 64-bit counterparts.
macro_rules! impl_platform {
    ($type:ident, $wide:ident, $kind:ident) => {
        impl Describe for $type {
            fn describe() -> Type {
                Type::$kind
            }
        }

        impl Write for $type {
            #[inline]
            fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
                (*self as $wide).write(encoder)
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }

        impl Read for $type {
            #[inline]
            fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
                let wide = $wide::read(decoder)?;
                $type::try_from(wide).map_err(|_| {
                    Error::InvalidValue(stringify!($type), format!("{wide} out of range"))
                })
            }
        }

        impl ToValue for $type {
            fn to_value(&self) -> Value {
                Value::$kind(*self as $wide)
            }
        }

        impl FromValue for $type {
            fn from_value(value: &Value) -> Option<Self> {
                value.as_integer().and_then(|v| $type::try_from(v).ok())
            }
        }
    };
}

impl_platform!(isize, i64, Int);
impl_platform!(usize, u64, Uint);

// Floats convert from any float or integer value (possibly losing precision).
macro_rules! impl_float {
    ($type:ident) => {
        paste! {
            impl Describe for $type {
                fn describe() -> Type {
                    Type::[<$type:upper>]
                }
            }

            impl Write for $type {
                #[inline]
                fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
                    encoder.[<put_ $type>](*self);
                    Ok(())
                }

                // Negative zero is not zero.
                fn is_zero(&self) -> bool {
                    self.to_bits() == 0
                }
            }

            impl Read for $type {
                #[inline]
                fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
                    decoder.[<get_ $type>]()
                }
            }

            impl ToValue for $type {
                fn to_value(&self) -> Value {
                    Value::[<$type:upper>](*self)
                }
            }

            impl FromValue for $type {
                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        // Exact match keeps the bits (including NaN payloads).
                        Value::[<$type:upper>](v) => Some(*v),
                        _ => value.as_float().map(|v| v as $type),
                    }
                }
            }
        }
    };
}

impl_float!(f32);
impl_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode};
    use test_case::test_case;

    #[test_case(&(), &[0x00]; "nil")]
    #[test_case(&true, &[0xFF]; "bool")]
    #[test_case(&false, &[0x00]; "bool false")]
    #[test_case(&768u16, &[0x80, 0x06]; "uint16")]
    #[test_case(&10240u64, &[0x80, 0x50]; "uint64")]
    #[test_case(&64u8, &[0x40]; "uint8")]
    #[test_case(&768i32, &[0x80, 0x06]; "int32")]
    #[test_case(&-1i8, &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]; "negative int8")]
    #[test_case(&1.0f32, &[0x80, 0x80, 0x80, 0xFC, 0x03]; "float32")]
    fn test_fixtures(value: &dyn Write, expected: &[u8]) {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).encode(value).unwrap();
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_nil() {
        assert_eq!(<()>::describe(), Type::Nil);
        decode::<()>(&[0x00][..]).unwrap();
        assert!(matches!(
            decode::<()>(&[0x01][..]),
            Err(Error::InvalidValue("nil", _))
        ));
        assert_eq!(().to_value(), Value::Nil);
        assert_eq!(<()>::from_value(&Value::Nil), Some(()));
        assert_eq!(<()>::from_value(&Value::Bool(false)), None);

        // Nil in a dynamically typed slot decodes back to the unit value
        let encoded = encode(&().to_value()).unwrap();
        assert_eq!(&encoded[..], &[0x00, 0x00]);
        crate::decode_as::<()>(encoded).unwrap();
    }

    #[test]
    fn test_round_trip() {
        for value in [0i64, 1, -1, i64::MIN, i64::MAX] {
            assert_eq!(decode::<i64>(encode(&value).unwrap()).unwrap(), value);
        }
        for value in [0usize, 1, usize::MAX] {
            assert_eq!(decode::<usize>(encode(&value).unwrap()).unwrap(), value);
        }
        for value in [0.0f64, -0.0, 1.5, f64::MAX, f64::INFINITY] {
            let decoded = decode::<f64>(encode(&value).unwrap()).unwrap();
            assert_eq!(decoded.to_bits(), value.to_bits());
        }
    }

    #[test]
    fn test_narrowing() {
        let encoded = encode(&300u32).unwrap();
        assert!(matches!(
            decode::<u8>(encoded),
            Err(Error::InvalidValue(_, _))
        ));
        let encoded = encode(&-200i16).unwrap();
        assert!(matches!(
            decode::<i8>(encoded),
            Err(Error::InvalidValue(_, _))
        ));
        let encoded = encode(&-1i32).unwrap();
        assert_eq!(decode::<i64>(encoded).unwrap(), -1);
    }

    #[test]
    fn test_zero() {
        assert!(0u32.is_zero());
        assert!(!1u32.is_zero());
        assert!(0.0f64.is_zero());
        assert!(!(-0.0f64).is_zero());
        assert!(false.is_zero());
    }

    #[test]
    fn test_values() {
        assert_eq!(5usize.to_value(), Value::Uint(5));
        assert_eq!((-5isize).to_value(), Value::Int(-5));
        assert_eq!(u8::from_value(&Value::I64(200)), Some(200));
        assert_eq!(u8::from_value(&Value::I64(-1)), None);
        assert_eq!(i16::from_value(&Value::U64(u64::MAX)), None);
        assert_eq!(f32::from_value(&Value::U8(3)), Some(3.0));
        assert_eq!(bool::from_value(&Value::U8(1)), None);
    }
}
