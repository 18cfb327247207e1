//! Arbitrary precision numbers.
//!
//! Carried through the binary handler: [BigInt] as its big-endian two's-complement bytes,
//! [BigUint] as its big-endian magnitude, and [BigRational] as the varint length of its
//! numerator's bytes, then the numerator's and denominator's signed bytes.

use crate::{extension, varint, BoxError, MarshalBinary};
use bytes::Buf;
pub use num_bigint::{BigInt, BigUint};
pub use num_rational::BigRational;
use num_traits::Zero;

impl MarshalBinary for BigInt {
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.to_signed_bytes_be())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError> {
        *self = BigInt::from_signed_bytes_be(data);
        Ok(())
    }
}

impl MarshalBinary for BigUint {
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError> {
        Ok(self.to_bytes_be())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError> {
        *self = BigUint::from_bytes_be(data);
        Ok(())
    }
}

impl MarshalBinary for BigRational {
    fn marshal_binary(&self) -> Result<Vec<u8>, BoxError> {
        let numer = self.numer().to_signed_bytes_be();
        let denom = self.denom().to_signed_bytes_be();
        let prefix = varint::size(numer.len() as u64);
        let mut data = Vec::with_capacity(prefix + numer.len() + denom.len());
        varint::write(numer.len() as u64, &mut data);
        data.extend_from_slice(&numer);
        data.extend_from_slice(&denom);
        Ok(data)
    }

    fn unmarshal_binary(&mut self, mut data: &[u8]) -> Result<(), BoxError> {
        let len = varint::read(&mut data)?;
        let len = usize::try_from(len)?;
        if len > data.remaining() {
            return Err("numerator exceeds payload".into());
        }
        let numer = BigInt::from_signed_bytes_be(&data[..len]);
        let denom = BigInt::from_signed_bytes_be(&data[len..]);
        if denom.is_zero() {
            return Err("zero denominator".into());
        }
        *self = BigRational::new(numer, denom);
        Ok(())
    }
}

extension!(BigInt: binary);
extension!(BigUint: binary);
extension!(BigRational: binary);
