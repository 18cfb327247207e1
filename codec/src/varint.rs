//! Variable-length integer encoding and decoding
//!
//! Each byte uses:
//! - 7 bits for the value
//! - 1 "continuation" bit to indicate if more bytes follow
//!
//! Every integer on the wire is carried as a `u64`. Signed integers are sign-extended to 64 bits
//! and reinterpreted bit-for-bit (no ZigZag), so small negative numbers always take 10 bytes.
//! Floats are carried as their IEEE-754 bit pattern.

use crate::Error;
use bytes::{Buf, BufMut};

const BITS_PER_BYTE: usize = 8;
const DATA_BITS_PER_BYTE: usize = 7;
const DATA_BITS_MASK: u8 = 0x7F;
const CONTINUATION_BIT_MASK: u8 = 0x80;

/// Maximum number of bytes a `u64` varint can occupy.
pub const MAX_LEN: usize = 10;

/// A trait for unsigned integers that widen losslessly into the wire representation.
pub trait UInt: Copy + Into<u64> + TryFrom<u64> {}

impl UInt for u8 {}
impl UInt for u16 {}
impl UInt for u32 {}
impl UInt for u64 {}

/// A trait for signed integers that are carried by reinterpreting their sign-extended bits.
pub trait SInt: Copy {
    /// Sign-extends to 64 bits and reinterprets the result as unsigned.
    fn as_raw(self) -> u64;

    /// Reinterprets a raw value as a signed 64-bit integer and narrows it (if it fits).
    fn from_raw(value: u64) -> Option<Self>;
}

// Implements the `SInt` trait for all signed integer types.
macro_rules! impl_sint {
    ($type:ty) => {
        impl SInt for $type {
            #[inline]
            fn as_raw(self) -> u64 {
                i64::from(self) as u64
            }

            #[inline]
            fn from_raw(value: u64) -> Option<Self> {
                <$type>::try_from(value as i64).ok()
            }
        }
    };
}
impl_sint!(i8);
impl_sint!(i16);
impl_sint!(i32);
impl_sint!(i64);

/// Encodes an unsigned integer as a varint.
pub fn write(value: u64, buf: &mut (impl BufMut + ?Sized)) {
    if value < u64::from(CONTINUATION_BIT_MASK) {
        // Fast path for small values (common case for lengths and tags).
        buf.put_u8(value as u8);
        return;
    }

    let mut val = value;
    while val >= u64::from(CONTINUATION_BIT_MASK) {
        buf.put_u8((val as u8) | CONTINUATION_BIT_MASK);
        val >>= DATA_BITS_PER_BYTE;
    }
    buf.put_u8(val as u8);
}

/// Decodes an unsigned integer from a varint.
///
/// Fails with [Error::Truncated] if the buffer runs out or the varint overflows 64 bits.
pub fn read(buf: &mut (impl Buf + ?Sized)) -> Result<u64, Error> {
    let max_bits = u64::BITS as usize;
    let mut result = 0u64;
    let mut shift = 0;

    loop {
        if !buf.has_remaining() {
            return Err(Error::Truncated);
        }
        let byte = buf.get_u8();

        // If this must be the last byte, check for overflow (i.e. set bits beyond 64). Because the
        // continuation bit is the most-significant bit, this also rejects an 11th byte.
        let remaining_bits = max_bits - shift;
        if remaining_bits <= DATA_BITS_PER_BYTE {
            let relevant_bits = BITS_PER_BYTE - byte.leading_zeros() as usize;
            if relevant_bits > remaining_bits {
                return Err(Error::Truncated);
            }
        }

        result |= u64::from(byte & DATA_BITS_MASK) << shift;
        if byte & CONTINUATION_BIT_MASK == 0 {
            return Ok(result);
        }
        shift += DATA_BITS_PER_BYTE;
    }
}

/// Calculates the number of bytes needed to encode an unsigned integer as a varint.
pub fn size(value: u64) -> usize {
    let data_bits = (u64::BITS - value.leading_zeros()) as usize;
    usize::max(1, data_bits.div_ceil(DATA_BITS_PER_BYTE))
}

/// Encodes an unsigned integer of any width.
#[inline]
pub fn write_unsigned<U: UInt>(value: U, buf: &mut (impl BufMut + ?Sized)) {
    write(value.into(), buf);
}

/// Decodes an unsigned integer and narrows it to `U`.
pub fn read_unsigned<U: UInt>(buf: &mut (impl Buf + ?Sized)) -> Result<U, Error> {
    let raw = read(buf)?;
    U::try_from(raw).map_err(|_| {
        Error::InvalidValue(std::any::type_name::<U>(), format!("{raw} out of range"))
    })
}

/// Encodes a signed integer using its sign-extended bit pattern.
#[inline]
pub fn write_signed<S: SInt>(value: S, buf: &mut (impl BufMut + ?Sized)) {
    write(value.as_raw(), buf);
}

/// Decodes a signed integer and narrows it to `S`.
pub fn read_signed<S: SInt>(buf: &mut (impl Buf + ?Sized)) -> Result<S, Error> {
    let raw = read(buf)?;
    S::from_raw(raw).ok_or_else(|| {
        Error::InvalidValue(
            std::any::type_name::<S>(),
            format!("{} out of range", raw as i64),
        )
    })
}

/// Encodes an `f32` as the varint of its bits.
#[inline]
pub fn write_f32(value: f32, buf: &mut (impl BufMut + ?Sized)) {
    write(u64::from(value.to_bits()), buf);
}

/// Decodes an `f32` from the varint of its bits.
pub fn read_f32(buf: &mut (impl Buf + ?Sized)) -> Result<f32, Error> {
    read_unsigned::<u32>(buf).map(f32::from_bits)
}

/// Encodes an `f64` as the varint of its bits.
#[inline]
pub fn write_f64(value: f64, buf: &mut (impl BufMut + ?Sized)) {
    write(value.to_bits(), buf);
}

/// Decodes an `f64` from the varint of its bits.
pub fn read_f64(buf: &mut (impl Buf + ?Sized)) -> Result<f64, Error> {
    read(buf).map(f64::from_bits)
}
