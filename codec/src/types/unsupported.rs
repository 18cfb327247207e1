//! Channels and functions.
//!
//! These carry no data: they are written as their kind alone when they appear in a dynamically
//! typed slot and contribute nothing to a statically typed one. They cannot be decoded.

use crate::{
    codec::{Describe, Write},
    encoder::Encoder,
    kind::{Kind, Type},
    value::{ToValue, Value},
    Error,
};
use std::sync::mpsc::{Sender, SyncSender};

macro_rules! impl_unsupported {
    ($kind:ident, [$($type:ty),+]) => {
        $(
            impl<T> Describe for $type {
                fn describe() -> Type {
                    Type::Unsupported(Kind::$kind)
                }
            }

            impl<T> Write for $type {
                fn write(&self, _: &mut Encoder<'_>) -> Result<(), Error> {
                    Ok(())
                }

                fn is_zero(&self) -> bool {
                    true
                }
            }

            impl<T> ToValue for $type {
                fn to_value(&self) -> Value {
                    Value::Unsupported(Kind::$kind)
                }
            }
        )+
    };
}

impl_unsupported!(Chan, [Sender<T>, SyncSender<T>]);
impl_unsupported!(Func, [fn() -> T]);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode;
    use std::sync::mpsc::channel;

    #[test]
    fn test_channel() {
        let (sender, _receiver) = channel::<u8>();
        assert!(encode(&sender).unwrap().is_empty());
        assert!(sender.is_zero());

        let mut buf = Vec::new();
        Encoder::new(&mut buf).put_dynamic(&sender.to_value()).unwrap();
        assert_eq!(buf, [18]);
    }

    #[test]
    fn test_function() {
        fn answer() -> u8 {
            42
        }
        let f: fn() -> u8 = answer;
        assert!(f.is_zero());
        assert_eq!(f.to_value(), Value::Unsupported(Kind::Func));
        assert_eq!(<fn() -> u8>::describe().kind(), Kind::Func);
    }
}
