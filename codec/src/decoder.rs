//! Reading values.
//!
//! Mirrors [crate::Encoder]: a statically typed target consumes the bytes its type implies, while a
//! dynamically typed target ([Value]) first reads a type descriptor to decide what to build.
//!
//! Every declared length is checked against [Config::length] and against the remaining input
//! (given the minimum encoded size of one element) before anything is allocated, and nesting is
//! limited to [Config::max_depth].

use crate::{
    codec::Read,
    config::Config,
    extension::{Extension, TypeKey},
    kind::{ExtensionType, Id, Kind, Type},
    record::{GenericRecord, Tag},
    registry::{Direction, Key, Registry},
    shape::{Level, Shape},
    types::complex::Complex,
    value::Value,
    varint, Error,
};
use bytes::Buf;
use std::sync::Arc;
use tracing::debug;

/// Reads values from a buffer.
pub struct Decoder<'a> {
    buf: &'a mut dyn Buf,
    registry: &'a Registry,
    cfg: Config,
    depth: usize,
    zero_sized: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder with the default [Config] that resolves extension kinds through
    /// [Registry::global].
    pub fn new(buf: &'a mut dyn Buf) -> Self {
        Self::with_registry(buf, Registry::global(), Config::default())
    }

    pub fn with_config(buf: &'a mut dyn Buf, cfg: Config) -> Self {
        Self::with_registry(buf, Registry::global(), cfg)
    }

    pub fn with_registry(buf: &'a mut dyn Buf, registry: &'a Registry, cfg: Config) -> Self {
        Self {
            buf,
            registry,
            cfg,
            depth: 0,
            zero_sized: 0,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Number of bytes left in the input.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Reads a value in its static form.
    pub fn decode<T: Read>(&mut self) -> Result<T, Error> {
        T::read(self)
    }

    /// Runs `f` one nesting level deeper.
    pub fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        if self.depth >= self.cfg.max_depth {
            debug!(limit = self.cfg.max_depth, "nesting too deep");
            return Err(Error::DepthExceeded(self.cfg.max_depth));
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    pub fn get_u8(&mut self) -> Result<u8, Error> {
        if !self.buf.has_remaining() {
            return Err(Error::Truncated);
        }
        Ok(self.buf.get_u8())
    }

    pub fn get_varint(&mut self) -> Result<u64, Error> {
        varint::read(&mut *self.buf)
    }

    pub fn get_unsigned<U: varint::UInt>(&mut self) -> Result<U, Error> {
        varint::read_unsigned(&mut *self.buf)
    }

    pub fn get_signed<S: varint::SInt>(&mut self) -> Result<S, Error> {
        varint::read_signed(&mut *self.buf)
    }

    pub fn get_f32(&mut self) -> Result<f32, Error> {
        varint::read_f32(&mut *self.buf)
    }

    pub fn get_f64(&mut self) -> Result<f64, Error> {
        varint::read_f64(&mut *self.buf)
    }

    pub fn get_bool(&mut self) -> Result<bool, Error> {
        match self.get_u8()? {
            0x00 => Ok(false),
            0xFF => Ok(true),
            _ => Err(Error::InvalidBool),
        }
    }

    /// Reads a declared length for elements occupying at least `min_size` bytes each.
    pub fn get_len(&mut self, min_size: usize) -> Result<usize, Error> {
        let raw = self.get_varint()?;
        let len = usize::try_from(raw).map_err(|_| Error::InvalidLength(raw))?;
        self.check_len(len, min_size)?;
        Ok(len)
    }

    /// Checks that `len` elements occupying at least `min_size` bytes each may follow.
    pub fn check_len(&mut self, len: usize, min_size: usize) -> Result<(), Error> {
        if !self.cfg.length.contains(&len) {
            debug!(len, "declared length out of range");
            return Err(Error::InvalidLength(len as u64));
        }
        if min_size == 0 {
            self.zero_sized = self.zero_sized.saturating_add(len);
            if self.zero_sized > self.cfg.max_zero_sized {
                return Err(Error::ZeroSizedExceeded(self.cfg.max_zero_sized));
            }
        } else if len.saturating_mul(min_size) > self.buf.remaining() {
            return Err(Error::Truncated);
        }
        Ok(())
    }

    /// Minimum number of bytes a payload of type `ty` occupies.
    ///
    /// Extension kinds report the minimum declared by their handler (zero when unregistered).
    pub fn min_size(&self, ty: &Type) -> usize {
        match ty {
            Type::Extension(ext) => {
                let id = match ext {
                    ExtensionType::Wire(id) => Some(*id),
                    ExtensionType::Local(key) => self.registry.lookup(key),
                };
                id.and_then(|id| self.registry.handler(id))
                    .map_or(0, |handler| handler.min_size())
            }
            Type::Array(len, elem) => len.saturating_mul(self.min_size(elem)),
            other => other.min_size(),
        }
    }

    /// Returns the type of the values decoded from slots of type `ty`.
    ///
    /// Extension kinds without a registered concrete type decode through their handler's
    /// fallback, so containers of them hold values of the fallback type.
    fn decoded_type(&self, ty: &Type) -> Type {
        match ty {
            Type::Extension(ExtensionType::Wire(id)) if self.registry.maker(*id).is_none() => self
                .registry
                .handler(*id)
                .and_then(|handler| handler.fallback_type().cloned())
                .unwrap_or_else(|| ty.clone()),
            Type::Array(len, elem) => Type::Array(*len, Box::new(self.decoded_type(elem))),
            Type::Sequence(elem) => Type::Sequence(Box::new(self.decoded_type(elem))),
            Type::Map(key, value) => Type::Map(
                Box::new(self.decoded_type(key)),
                Box::new(self.decoded_type(value)),
            ),
            other => other.clone(),
        }
    }

    /// Reads a length-prefixed run of raw bytes.
    pub fn get_bytes(&mut self) -> Result<Vec<u8>, Error> {
        let len = self.get_len(1)?;
        let mut bytes = vec![0; len];
        self.buf.copy_to_slice(&mut bytes);
        Ok(bytes)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn get_string(&mut self) -> Result<String, Error> {
        String::from_utf8(self.get_bytes()?)
            .map_err(|err| Error::InvalidValue("String", err.to_string()))
    }

    pub fn get_tag(&mut self) -> Result<Tag, Error> {
        self.get_varint()
    }

    /// Reads the field count of a record (each field occupies at least one byte).
    pub fn get_field_count(&mut self) -> Result<usize, Error> {
        self.get_len(1)
    }

    /// Reads a type descriptor.
    pub fn get_type(&mut self) -> Result<Type, Error> {
        let id = self.get_varint()?;
        self.nested(|decoder| decoder.type_from(id))
    }

    fn type_from(&mut self, id: Id) -> Result<Type, Error> {
        let kind = Kind::from_id(id)?;
        match kind {
            Kind::Array | Kind::Sequence => {
                let shape = self.get_shape(kind)?;
                let leaf = self.get_type()?;
                if let Type::Unsupported(kind) = leaf {
                    return Err(Error::InvalidKind(kind as u64));
                }
                Ok(shape.wrap(leaf))
            }
            Kind::Map => {
                let key = self.get_type()?;
                if !key.kind().is_comparable() {
                    return Err(Error::NotComparable(key.kind()));
                }
                let value = self.get_type()?;
                Ok(Type::Map(Box::new(key), Box::new(value)))
            }
            Kind::Extension => Ok(Type::Extension(ExtensionType::Wire(id))),
            other => Type::scalar(other).ok_or(Error::InvalidKind(id)),
        }
    }

    fn get_shape(&mut self, first: Kind) -> Result<Shape, Error> {
        let depth = self.get_varint()?;
        if depth == 0 {
            return Err(Error::InvalidValue("shape", "empty".into()));
        }
        if depth > self.cfg.max_depth as u64 {
            return Err(Error::DepthExceeded(self.cfg.max_depth));
        }
        let jagged = self.get_bool()?;
        let mut levels = Vec::with_capacity(depth as usize);
        for i in 0..depth {
            let kind = if i == 0 {
                first
            } else {
                let id = self.get_varint()?;
                match Kind::from_id(id)? {
                    kind @ (Kind::Array | Kind::Sequence) => kind,
                    _ => return Err(Error::InvalidKind(id)),
                }
            };
            let level = match kind {
                Kind::Array => {
                    let raw = self.get_varint()?;
                    let len = usize::try_from(raw).map_err(|_| Error::InvalidLength(raw))?;
                    if !self.cfg.length.contains(&len) {
                        return Err(Error::InvalidLength(raw));
                    }
                    Level::Array(len)
                }
                // Sequence lengths are hints and are not trusted.
                _ if jagged => Level::Sequence(None),
                _ => Level::Sequence(usize::try_from(self.get_varint()?).ok()),
            };
            levels.push(level);
        }
        Ok(Shape::new(levels, jagged))
    }

    /// Reads a value in its dynamic form (descriptor then payload).
    pub fn get_dynamic(&mut self) -> Result<Value, Error> {
        let ty = self.get_type()?;
        self.get_value(&ty)
    }

    /// Reads the payload of a slot of type `ty`.
    pub fn get_value(&mut self, ty: &Type) -> Result<Value, Error> {
        self.nested(|decoder| decoder.get_payload(ty))
    }

    fn get_payload(&mut self, ty: &Type) -> Result<Value, Error> {
        Ok(match ty {
            Type::Nil => {
                let raw = self.get_varint()?;
                if raw != 0 {
                    return Err(Error::InvalidValue("nil", format!("{raw}")));
                }
                Value::Nil
            }
            Type::Bool => Value::Bool(self.get_bool()?),
            Type::Int => Value::Int(varint::read_signed(&mut *self.buf)?),
            Type::I8 => Value::I8(varint::read_signed(&mut *self.buf)?),
            Type::I16 => Value::I16(varint::read_signed(&mut *self.buf)?),
            Type::I32 => Value::I32(varint::read_signed(&mut *self.buf)?),
            Type::I64 => Value::I64(varint::read_signed(&mut *self.buf)?),
            Type::Uint => Value::Uint(self.get_varint()?),
            Type::U8 => Value::U8(varint::read_unsigned(&mut *self.buf)?),
            Type::U16 => Value::U16(varint::read_unsigned(&mut *self.buf)?),
            Type::U32 => Value::U32(varint::read_unsigned(&mut *self.buf)?),
            Type::U64 => Value::U64(self.get_varint()?),
            Type::F32 => Value::F32(varint::read_f32(&mut *self.buf)?),
            Type::F64 => Value::F64(varint::read_f64(&mut *self.buf)?),
            Type::C64 => Value::C64(Complex::new(
                varint::read_f32(&mut *self.buf)?,
                varint::read_f32(&mut *self.buf)?,
            )),
            Type::C128 => Value::C128(Complex::new(
                varint::read_f64(&mut *self.buf)?,
                varint::read_f64(&mut *self.buf)?,
            )),
            Type::String => Value::String(self.get_string()?),
            Type::Array(len, elem) => {
                self.check_len(*len, self.min_size(elem))?;
                let mut items = Vec::with_capacity(*len);
                for _ in 0..*len {
                    items.push(self.get_value(elem)?);
                }
                Value::Array(self.decoded_type(elem), items)
            }
            Type::Sequence(elem) => {
                let len = self.get_len(self.min_size(elem))?;
                let mut items = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    items.push(self.get_value(elem)?);
                }
                Value::Sequence(self.decoded_type(elem), items)
            }
            Type::Map(key, value) => {
                if !key.kind().is_comparable() {
                    return Err(Error::NotComparable(key.kind()));
                }
                let len = self.get_len(self.min_size(key).saturating_add(self.min_size(value)))?;
                let mut entries = Vec::with_capacity(len.min(self.remaining()));
                for _ in 0..len {
                    let k = self.get_value(key)?;
                    if !k.kind().is_comparable() {
                        return Err(Error::NotComparable(k.kind()));
                    }
                    let v = self.get_value(value)?;
                    entries.push((k, v));
                }
                Value::Map(self.decoded_type(key), self.decoded_type(value), entries)
            }
            Type::Record => Value::Record(self.get_record()?),
            Type::Any => self.get_dynamic()?,
            Type::Extension(ExtensionType::Wire(id)) => self.get_extension_value(*id)?,
            Type::Extension(ExtensionType::Local(key)) => {
                let id = self
                    .registry
                    .lookup(key)
                    .ok_or(Error::Unregistered(key.name()))?;
                self.get_extension_value(id)?
            }
            Type::Unsupported(kind) => Value::Unsupported(*kind),
        })
    }

    /// Reads a record in its dynamic form.
    ///
    /// Every field carries its own descriptor, so fields of any tag can be read (a repeated tag
    /// keeps the last value).
    pub fn get_record(&mut self) -> Result<GenericRecord, Error> {
        // Tag, kind, and at least one payload byte.
        let count = self.get_len(2)?;
        let mut record = GenericRecord::new();
        for _ in 0..count {
            let tag = self.get_tag()?;
            let value = self.get_dynamic()?;
            record.insert(tag, value);
        }
        Ok(record)
    }

    /// Reads an extension payload into a fresh value of a registered type.
    pub fn get_extension<T: Extension + Default>(&mut self) -> Result<T, Error> {
        let registry = self.registry;
        let key = TypeKey::of::<T>();
        let mut target = T::default();
        if registry.run(Key::Type(&key), Direction::Decode(self, &mut target))? {
            return Ok(target);
        }
        Err(Error::Unregistered(key.name()))
    }

    fn get_extension_value(&mut self, id: Id) -> Result<Value, Error> {
        let registry = self.registry;
        let handler = registry.handler(id).ok_or(Error::InvalidKind(id))?;
        if let Some(maker) = registry.maker(id) {
            let mut target = maker.make();
            handler.decode(self, target.as_mut())?;
            return Ok(Value::Extension(Arc::from(target)));
        }
        handler
            .fallback(self)
            .unwrap_or(Err(Error::InvalidKind(id)))
    }
}
