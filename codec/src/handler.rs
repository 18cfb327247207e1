//! Encode and decode functions for extension kinds.

use crate::{
    decoder::Decoder,
    encoder::Encoder,
    extension::Extension,
    kind::Type,
    value::Value,
    Error,
};
use std::{any::type_name, fmt, sync::Arc};

type EncodeFn = dyn Fn(&mut Encoder<'_>, &dyn Extension) -> Result<(), Error> + Send + Sync;
type DecodeFn = dyn Fn(&mut Decoder<'_>, &mut dyn Extension) -> Result<(), Error> + Send + Sync;

/// Decodes a payload without a concrete target type.
pub type FallbackFn = fn(&mut Decoder<'_>) -> Result<Value, Error>;

/// Pair of functions that encode an extension value and decode into a fresh one.
///
/// Errors returned by either function are propagated to the caller unmodified.
#[derive(Clone)]
pub struct Handler {
    encode: Arc<EncodeFn>,
    decode: Arc<DecodeFn>,
    fallback: Option<(Type, FallbackFn)>,
    min_size: usize,
}

impl Handler {
    /// Creates a handler that works on type-erased values.
    pub fn new<E, D>(encode: E, decode: D) -> Self
    where
        E: Fn(&mut Encoder<'_>, &dyn Extension) -> Result<(), Error> + Send + Sync + 'static,
        D: Fn(&mut Decoder<'_>, &mut dyn Extension) -> Result<(), Error> + Send + Sync + 'static,
    {
        Self {
            encode: Arc::new(encode),
            decode: Arc::new(decode),
            fallback: None,
            min_size: 0,
        }
    }

    /// Creates a handler for a single concrete type.
    ///
    /// Values of any other type are rejected with [Error::NotSettable].
    pub fn typed<T: Extension>(
        encode: fn(&mut Encoder<'_>, &T) -> Result<(), Error>,
        decode: fn(&mut Decoder<'_>, &mut T) -> Result<(), Error>,
    ) -> Self {
        Self::new(
            move |encoder, value| {
                let value = value
                    .as_any()
                    .downcast_ref::<T>()
                    .ok_or(Error::NotSettable(type_name::<T>()))?;
                encode(encoder, value)
            },
            move |decoder, target| {
                let target = target
                    .as_any_mut()
                    .downcast_mut::<T>()
                    .ok_or(Error::NotSettable(type_name::<T>()))?;
                decode(decoder, target)
            },
        )
    }

    /// Sets the function used when a payload of this kind is decoded without a target type.
    ///
    /// Every value the function returns must be of type `ty`, which replaces the extension kind
    /// in the descriptors of decoded containers.
    pub fn with_fallback(mut self, ty: Type, fallback: FallbackFn) -> Self {
        self.fallback = Some((ty, fallback));
        self
    }

    /// Declares the minimum number of bytes every payload written by this handler occupies.
    ///
    /// Used to bound declared lengths of extension sequences against the remaining input. Handlers
    /// declaring zero (the default) are charged against [crate::Config::max_zero_sized].
    pub fn with_min_size(mut self, min_size: usize) -> Self {
        self.min_size = min_size;
        self
    }

    /// Writes the payload as the length-prefixed output of [crate::MarshalBinary].
    ///
    /// Decoding an empty payload leaves the target untouched.
    pub fn binary() -> Self {
        Self::new(
            |encoder, value| {
                let binary = value
                    .as_binary()
                    .ok_or(Error::NotSettable(value.type_key().name()))?;
                let data = binary.marshal_binary().map_err(Error::Handler)?;
                encoder.put_bytes(&data);
                Ok(())
            },
            |decoder, target| {
                let data = decoder.get_bytes()?;
                if data.is_empty() {
                    return Ok(());
                }
                let name = target.type_key().name();
                target
                    .as_binary_mut()
                    .ok_or(Error::NotSettable(name))?
                    .unmarshal_binary(&data)
                    .map_err(Error::Handler)
            },
        )
        .with_fallback(Type::Sequence(Box::new(Type::U8)), |decoder| {
            Ok(Value::bytes(&decoder.get_bytes()?))
        })
        .with_min_size(1)
    }

    /// Writes the payload as the output of [crate::MarshalText].
    pub fn text() -> Self {
        Self::new(
            |encoder, value| {
                let text = value
                    .as_text()
                    .ok_or(Error::NotSettable(value.type_key().name()))?;
                let data = text.marshal_text().map_err(Error::Handler)?;
                encoder.put_bytes(data.as_bytes());
                Ok(())
            },
            |decoder, target| {
                let data = decoder.get_string()?;
                let name = target.type_key().name();
                target
                    .as_text_mut()
                    .ok_or(Error::NotSettable(name))?
                    .unmarshal_text(&data)
                    .map_err(Error::Handler)
            },
        )
        .with_fallback(Type::String, |decoder| {
            decoder.get_string().map(Value::String)
        })
        .with_min_size(1)
    }

    pub fn encode(&self, encoder: &mut Encoder<'_>, value: &dyn Extension) -> Result<(), Error> {
        (self.encode)(encoder, value)
    }

    pub fn decode(&self, decoder: &mut Decoder<'_>, target: &mut dyn Extension) -> Result<(), Error> {
        (self.decode)(decoder, target)
    }

    /// Decodes a payload into a dynamic value, if the handler supports it.
    pub fn fallback(&self, decoder: &mut Decoder<'_>) -> Option<Result<Value, Error>> {
        self.fallback.as_ref().map(|(_, fallback)| fallback(decoder))
    }

    /// Type of the values produced by [Handler::fallback].
    pub fn fallback_type(&self) -> Option<&Type> {
        self.fallback.as_ref().map(|(ty, _)| ty)
    }

    pub fn min_size(&self) -> usize {
        self.min_size
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("fallback", &self.fallback_type())
            .field("min_size", &self.min_size)
            .finish_non_exhaustive()
    }
}
