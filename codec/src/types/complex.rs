//! Complex numbers.

use crate::{
    codec::{Describe, Read, Write},
    decoder::Decoder,
    encoder::Encoder,
    kind::Type,
    value::{FromValue, ToValue, Value},
    Error,
};

/// A complex number with real part `re` and imaginary part `im`.
///
/// Written as the two parts in order, each as a float.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Complex<T> {
    pub re: T,
    pub im: T,
}

impl<T> Complex<T> {
    pub const fn new(re: T, im: T) -> Self {
        Self { re, im }
    }
}

pub type Complex64 = Complex<f32>;
pub type Complex128 = Complex<f64>;

impl Describe for Complex64 {
    fn describe() -> Type {
        Type::C64
    }
}

impl Describe for Complex128 {
    fn describe() -> Type {
        Type::C128
    }
}

impl Write for Complex64 {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self.re.write(encoder)?;
        self.im.write(encoder)
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl Write for Complex128 {
    fn write(&self, encoder: &mut Encoder<'_>) -> Result<(), Error> {
        self.re.write(encoder)?;
        self.im.write(encoder)
    }

    fn is_zero(&self) -> bool {
        self.re.is_zero() && self.im.is_zero()
    }
}

impl Read for Complex64 {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(Self::new(f32::read(decoder)?, f32::read(decoder)?))
    }
}

impl Read for Complex128 {
    fn read(decoder: &mut Decoder<'_>) -> Result<Self, Error> {
        Ok(Self::new(f64::read(decoder)?, f64::read(decoder)?))
    }
}

impl ToValue for Complex64 {
    fn to_value(&self) -> Value {
        Value::C64(*self)
    }
}

impl ToValue for Complex128 {
    fn to_value(&self) -> Value {
        Value::C128(*self)
    }
}

impl FromValue for Complex64 {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::C64(v) => Some(v),
            Value::C128(v) => Some(Self::new(v.re as f32, v.im as f32)),
            _ => None,
        }
    }
}

impl FromValue for Complex128 {
    fn from_value(value: &Value) -> Option<Self> {
        match *value {
            Value::C64(v) => Some(Self::new(v.re.into(), v.im.into())),
            Value::C128(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode, encode};

    #[test]
    fn test_complex() {
        let value = Complex128::new(1.5, -2.0);
        let encoded = encode(&value).unwrap();
        assert_eq!(decode::<Complex128>(encoded).unwrap(), value);
        assert!(Complex64::default().is_zero());
        assert!(!Complex64::new(0.0, 1.0).is_zero());
    }

    #[test]
    fn test_widening() {
        let value = Complex64::new(0.5, 0.25).to_value();
        assert_eq!(
            Complex128::from_value(&value),
            Some(Complex128::new(0.5, 0.25))
        );
    }
}
