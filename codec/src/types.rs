//! Codec implementations for common types.

#[cfg(feature = "big")]
pub mod big;
pub mod bytes;
pub mod complex;
pub mod map;
pub mod primitives;
pub mod string;
pub mod unsupported;
pub mod vec;
