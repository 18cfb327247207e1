//! Writing values.
//!
//! Values are written in one of two forms. The static form is implied by the type of the slot
//! being written (a `u32` field writes a varint, a `Vec<T>` writes a length and its elements). The
//! dynamic form is used for slots of type [Value] and first writes a type descriptor, so that a
//! reader without the writer's types can rebuild the value.

use crate::{
    codec::Write,
    extension::Extension,
    kind::{ExtensionType, Id, Kind, Type},
    record::{GenericRecord, Tag},
    registry::{Direction, Key, Registry},
    shape::{Level, Shape},
    value::Value,
    varint, Error,
};
use bytes::BufMut;

/// Writes values into a buffer.
pub struct Encoder<'a> {
    buf: &'a mut dyn BufMut,
    registry: &'a Registry,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder that resolves extension kinds through [Registry::global].
    pub fn new(buf: &'a mut dyn BufMut) -> Self {
        Self::with_registry(buf, Registry::global())
    }

    pub fn with_registry(buf: &'a mut dyn BufMut, registry: &'a Registry) -> Self {
        Self { buf, registry }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Writes a value in its static form.
    pub fn encode<T: Write + ?Sized>(&mut self, value: &T) -> Result<(), Error> {
        value.write(self)
    }

    pub fn put_varint(&mut self, value: u64) {
        varint::write(value, &mut *self.buf);
    }

    pub fn put_unsigned<U: varint::UInt>(&mut self, value: U) {
        varint::write_unsigned(value, &mut *self.buf);
    }

    pub fn put_signed<S: varint::SInt>(&mut self, value: S) {
        varint::write_signed(value, &mut *self.buf);
    }

    pub fn put_f32(&mut self, value: f32) {
        varint::write_f32(value, &mut *self.buf);
    }

    pub fn put_f64(&mut self, value: f64) {
        varint::write_f64(value, &mut *self.buf);
    }

    pub fn put_len(&mut self, len: usize) {
        self.put_varint(len as u64);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(if value { 0xFF } else { 0x00 });
    }

    /// Writes a length-prefixed run of raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.put_len(bytes.len());
        self.buf.put_slice(bytes);
    }

    /// Writes a record field (tag then static payload).
    pub fn put_field<T: Write + ?Sized>(&mut self, tag: Tag, value: &T) -> Result<(), Error> {
        self.put_varint(tag);
        value.write(self)
    }

    fn put_kind(&mut self, kind: Kind) {
        self.put_varint(kind as u64);
    }

    /// Writes the descriptor of `ty`.
    ///
    /// `sample` is the value being described, used to record representative sequence lengths.
    pub fn put_type(&mut self, ty: &Type, sample: Option<&Value>) -> Result<(), Error> {
        match ty {
            Type::Array(..) | Type::Sequence(_) => {
                let (shape, leaf) = Shape::resolve(ty, sample);
                self.put_kind(ty.kind());
                self.put_len(shape.depth());
                self.put_bool(shape.is_jagged());
                for (i, level) in shape.levels().iter().enumerate() {
                    if i > 0 {
                        self.put_kind(match level {
                            Level::Array(_) => Kind::Array,
                            Level::Sequence(_) => Kind::Sequence,
                        });
                    }
                    match level {
                        Level::Array(len) | Level::Sequence(Some(len)) => self.put_len(*len),
                        Level::Sequence(None) => {}
                    }
                }
                self.put_type(leaf, None)
            }
            Type::Map(key, value) => {
                self.put_kind(Kind::Map);
                self.put_type(key, None)?;
                self.put_type(value, None)
            }
            Type::Extension(ext) => {
                let id = self.extension_id(ext)?;
                self.put_varint(id);
                Ok(())
            }
            other => {
                self.put_kind(other.kind());
                Ok(())
            }
        }
    }

    fn extension_id(&self, ext: &ExtensionType) -> Result<Id, Error> {
        match ext {
            ExtensionType::Wire(id) => Ok(*id),
            ExtensionType::Local(key) => self
                .registry
                .lookup(key)
                .ok_or(Error::Unregistered(key.name())),
        }
    }

    /// Writes a value in its dynamic form (descriptor then payload).
    pub fn put_dynamic(&mut self, value: &Value) -> Result<(), Error> {
        let ty = value.type_of();
        self.put_type(&ty, Some(value))?;
        self.put_payload(&ty, value)
    }

    /// Writes a value into a slot of type `ty`.
    ///
    /// Slots of type [Type::Any] receive the dynamic form. Any other slot receives the payload,
    /// which must be of the slot's kind. Elements of containers are written into the slots their
    /// container's type declares.
    pub fn put_value(&mut self, ty: &Type, value: &Value) -> Result<(), Error> {
        if let Type::Any = ty {
            return self.put_dynamic(value);
        }
        if ty.kind() != value.kind() {
            return Err(Error::Mismatch {
                expected: ty.kind(),
                found: value.kind(),
            });
        }
        self.put_payload(ty, value)
    }

    fn put_payload(&mut self, ty: &Type, value: &Value) -> Result<(), Error> {
        match (ty, value) {
            // Nil carries a single zero byte.
            (_, Value::Nil) => self.put_varint(0),
            (_, Value::Bool(v)) => self.put_bool(*v),
            (_, Value::Int(v) | Value::I64(v)) => varint::write_signed(*v, &mut *self.buf),
            (_, Value::I8(v)) => varint::write_signed(*v, &mut *self.buf),
            (_, Value::I16(v)) => varint::write_signed(*v, &mut *self.buf),
            (_, Value::I32(v)) => varint::write_signed(*v, &mut *self.buf),
            (_, Value::Uint(v) | Value::U64(v)) => self.put_varint(*v),
            (_, Value::U8(v)) => self.put_varint((*v).into()),
            (_, Value::U16(v)) => self.put_varint((*v).into()),
            (_, Value::U32(v)) => self.put_varint((*v).into()),
            (_, Value::F32(v)) => varint::write_f32(*v, &mut *self.buf),
            (_, Value::F64(v)) => varint::write_f64(*v, &mut *self.buf),
            (_, Value::C64(v)) => {
                varint::write_f32(v.re, &mut *self.buf);
                varint::write_f32(v.im, &mut *self.buf);
            }
            (_, Value::C128(v)) => {
                varint::write_f64(v.re, &mut *self.buf);
                varint::write_f64(v.im, &mut *self.buf);
            }
            (_, Value::String(v)) => self.put_bytes(v.as_bytes()),
            (Type::Array(len, elem), Value::Array(_, items)) => {
                if *len != items.len() {
                    return Err(Error::InvalidLength(items.len() as u64));
                }
                for item in items {
                    self.put_value(elem, item)?;
                }
            }
            (Type::Sequence(elem), Value::Sequence(_, items)) => {
                self.put_len(items.len());
                for item in items {
                    self.put_value(elem, item)?;
                }
            }
            (Type::Map(key, value), Value::Map(_, _, entries)) => {
                if !key.kind().is_comparable() {
                    return Err(Error::NotComparable(key.kind()));
                }
                self.put_len(entries.len());
                for (k, v) in entries {
                    if !k.kind().is_comparable() {
                        return Err(Error::NotComparable(k.kind()));
                    }
                    self.put_value(key, k)?;
                    self.put_value(value, v)?;
                }
            }
            (_, Value::Record(record)) => self.put_record(record)?,
            (Type::Extension(slot), Value::Extension(ext)) => {
                let key = ext.type_key();
                if let ExtensionType::Wire(_) = slot {
                    let expected = self.extension_id(slot)?;
                    let found = self.extension_id(&ExtensionType::Local(key))?;
                    if expected != found {
                        return Err(Error::InvalidKind(found));
                    }
                }
                self.put_extension(ext.as_ref())?;
            }
            (_, Value::Unsupported(_)) => {}
            (ty, value) => {
                return Err(Error::Mismatch {
                    expected: ty.kind(),
                    found: value.kind(),
                })
            }
        }
        Ok(())
    }

    /// Writes a record in its dynamic form: the field count, then (tag, descriptor, payload) for
    /// every field.
    pub fn put_record(&mut self, record: &GenericRecord) -> Result<(), Error> {
        self.put_len(record.len());
        for (tag, value) in record.iter() {
            self.put_varint(tag);
            self.put_dynamic(value)?;
        }
        Ok(())
    }

    /// Writes an extension value through its registered handler.
    pub fn put_extension(&mut self, value: &dyn Extension) -> Result<(), Error> {
        let registry = self.registry;
        let key = value.type_key();
        if registry.run(Key::Type(&key), Direction::Encode(self, value))? {
            return Ok(());
        }
        Err(Error::Unregistered(key.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use test_case::test_case;

    fn dynamic(value: &Value) -> Vec<u8> {
        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_dynamic(value).unwrap();
        buf
    }

    #[test_case(Value::Nil, &[0x00, 0x00]; "nil")]
    #[test_case(Value::Bool(true), &[0x01, 0xFF]; "bool")]
    #[test_case(Value::U16(768), &[0x09, 0x80, 0x06]; "uint16")]
    #[test_case(Value::String("A".into()), &[0x18, 0x01, 0x41]; "string")]
    #[test_case(Value::I8(-1), &[0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]; "negative")]
    fn test_dynamic_scalars(value: Value, expected: &[u8]) {
        assert_eq!(dynamic(&value), expected);
    }

    #[test]
    fn test_dynamic_array() {
        let value = Value::Array(
            Type::U64,
            vec![Value::U64(1), Value::U64(256), Value::U64(1024)],
        );
        assert_eq!(
            dynamic(&value),
            [17, 1, 0, 3, 11, 1, 128, 2, 128, 8]
        );
    }

    #[test]
    fn test_dynamic_nested_sequence() {
        let inner = |values: &[u8]| Value::bytes(values);
        let value = Value::Sequence(
            Type::Sequence(Box::new(Type::U8)),
            vec![inner(&[1, 2]), inner(&[3, 4])],
        );
        assert_eq!(
            dynamic(&value),
            [23, 2, 0x00, 2, 23, 2, 8, 2, 2, 1, 2, 2, 3, 4]
        );

        let jagged = Value::Sequence(
            Type::Sequence(Box::new(Type::U8)),
            vec![inner(&[1]), inner(&[])],
        );
        assert_eq!(dynamic(&jagged), [23, 2, 0xFF, 23, 8, 2, 1, 1, 0]);
    }

    #[test]
    fn test_dynamic_map() {
        let value = Value::Map(
            Type::U8,
            Type::Int,
            vec![(Value::U8(16), Value::Int(1024))],
        );
        assert_eq!(dynamic(&value), [21, 8, 2, 1, 16, 128, 8]);
    }

    #[test]
    fn test_dynamic_record() {
        let record: GenericRecord = [
            (100, Value::String("one".into())),
            (200, Value::U64(2)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            dynamic(&Value::Record(record)),
            [25, 2, 100, 24, 3, b'o', b'n', b'e', 200, 1, 11, 2]
        );
    }

    #[test]
    fn test_mismatch() {
        let value = Value::Sequence(Type::U8, vec![Value::String("x".into())]);
        let mut buf = Vec::new();
        assert!(matches!(
            Encoder::new(&mut buf).put_dynamic(&value),
            Err(Error::Mismatch {
                expected: Kind::U8,
                found: Kind::String
            })
        ));
    }

    #[test]
    fn test_any_elements() {
        let value = Value::Sequence(
            Type::Any,
            vec![Value::U8(1), Value::String("a".into())],
        );
        assert_eq!(dynamic(&value), [23, 1, 0, 2, 20, 2, 8, 1, 24, 1, b'a']);
    }

    #[test]
    fn test_array_length_mismatch() {
        let value = Value::Sequence(
            Type::Array(2, Box::new(Type::U8)),
            vec![Value::Array(Type::U8, vec![Value::U8(1)])],
        );
        let mut buf = Vec::new();
        assert!(matches!(
            Encoder::new(&mut buf).put_dynamic(&value),
            Err(Error::InvalidLength(1))
        ));
    }

    #[test]
    fn test_not_comparable() {
        let value = Value::Map(
            Type::Sequence(Box::new(Type::U8)),
            Type::Bool,
            Vec::new(),
        );
        assert!(matches!(
            encode(&value),
            Err(Error::NotComparable(Kind::Sequence))
        ));

        let value = Value::Map(
            Type::Any,
            Type::Bool,
            vec![(Value::bytes(&[1]), Value::Bool(true))],
        );
        assert!(matches!(
            encode(&value),
            Err(Error::NotComparable(Kind::Sequence))
        ));
    }

    #[test]
    fn test_unsupported_is_empty() {
        assert_eq!(dynamic(&Value::Unsupported(Kind::Chan)), [18]);
    }
}
