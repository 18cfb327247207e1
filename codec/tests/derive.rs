use commonware_bin::{
    decode, decode_dynamic, encode, Error, FromValue, GenericRecord, Record, ToValue, Type, Value,
    Write,
};
use std::sync::mpsc::{channel, Sender};

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Basic {
    a: u8,
    b: String,
    #[bin(tag = 9)]
    c: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Skipping {
    id: u32,
    #[bin(skip)]
    cached: Vec<u8>,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Inner {
    x: i32,
    y: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Outer {
    name: String,
    inner: Inner,
    boxed: Option<Box<Inner>>,
    extra: Value,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Narrow {
    a: u8,
}

#[derive(Debug, Default, Record)]
struct Wired {
    id: u32,
    notify: Option<Sender<u32>>,
    hook: Option<fn() -> u8>,
    name: String,
}

#[test]
fn test_default_tags() {
    let value = Basic {
        a: 1,
        b: "x".into(),
        c: true,
    };
    let encoded = encode(&value).unwrap();
    assert_eq!(&encoded[..], &[3, 1, 1, 2, 1, b'x', 9, 0xFF]);
    assert_eq!(decode::<Basic>(encoded).unwrap(), value);
}

#[test]
fn test_zero_fields_omitted() {
    let value = Basic {
        c: true,
        ..Default::default()
    };
    let encoded = encode(&value).unwrap();
    assert_eq!(&encoded[..], &[1, 9, 0xFF]);
    assert_eq!(decode::<Basic>(encoded).unwrap(), value);

    let encoded = encode(&Basic::default()).unwrap();
    assert_eq!(&encoded[..], &[0]);
    assert_eq!(decode::<Basic>(encoded).unwrap(), Basic::default());
}

#[test]
fn test_skipped_field() {
    let value = Skipping {
        id: 5,
        cached: vec![1, 2, 3],
    };
    let encoded = encode(&value).unwrap();
    assert_eq!(&encoded[..], &[1, 1, 5]);
    assert_eq!(
        decode::<Skipping>(encoded).unwrap(),
        Skipping {
            id: 5,
            cached: Vec::new(),
        }
    );
}

#[test]
fn test_unknown_tag() {
    let result = decode::<Basic>(&[1, 7, 1][..]);
    assert!(matches!(result, Err(Error::UnknownTag(7, "Basic"))));
}

#[test]
fn test_truncated_record() {
    let result = decode::<Basic>(&[2, 1, 1][..]);
    assert!(matches!(result, Err(Error::Truncated)));
}

#[test]
fn test_nested_records() {
    let value = Outer {
        name: "outer".into(),
        inner: Inner { x: -1, y: 2 },
        boxed: Some(Box::new(Inner::default())),
        extra: Value::Sequence(Type::Any, vec![Value::Bool(true), Value::Int(3)]),
    };
    let encoded = encode(&value).unwrap();
    assert_eq!(decode::<Outer>(encoded).unwrap(), value);

    // A present option is kept even though its target is zero
    let empty = Outer {
        boxed: Some(Box::default()),
        ..Default::default()
    };
    let encoded = encode(&empty).unwrap();
    assert_eq!(&encoded[..], &[1, 3, 0]);
    assert_eq!(decode::<Outer>(encoded).unwrap(), empty);

    let encoded = encode(&Outer::default()).unwrap();
    assert_eq!(&encoded[..], &[0]);
}

#[test]
fn test_dynamic_projection() {
    let items = vec![
        Basic {
            a: 4,
            b: "four".into(),
            c: false,
        },
        Basic {
            a: 0,
            b: String::new(),
            c: true,
        },
    ];
    let encoded = encode(&items.to_value()).unwrap();
    let value = decode_dynamic(encoded).unwrap();

    let records = value.as_items().unwrap();
    assert_eq!(records.len(), 2);
    let first = records[0].as_record().unwrap();
    assert_eq!(first.get(1), Some(&Value::U8(4)));
    assert_eq!(first.get(2).and_then(Value::as_str), Some("four"));
    assert_eq!(first.get(9), None);

    assert_eq!(Vec::<Basic>::from_value(&value).unwrap(), items);
}

#[test]
fn test_projection_drops_extra_tags() {
    let encoded = encode(&Basic {
        a: 7,
        b: "dropped".into(),
        c: true,
    }
    .to_value())
    .unwrap();
    let value = decode_dynamic(encoded).unwrap();
    let record: &GenericRecord = value.as_record().unwrap();
    assert_eq!(record.len(), 3);
    assert_eq!(record.project::<Narrow>(), Narrow { a: 7 });
}

#[test]
fn test_projection_of_mismatched_field() {
    let record: GenericRecord = [(1, Value::String("seven".into())), (2, Value::Int(1))]
        .into_iter()
        .collect();
    assert_eq!(record.project::<Basic>(), Basic::default());
}

#[test]
fn test_channel_and_function_fields() {
    fn seven() -> u8 {
        7
    }
    let (sender, _receiver) = channel();
    let value = Wired {
        id: 7,
        notify: Some(sender),
        hook: Some(seven),
        name: "n".into(),
    };
    assert!(!value.is_zero());
    assert!(Wired::default().is_zero());

    // Channel and function fields keep their tags (2 and 3) but are never written
    let encoded = encode(&value).unwrap();
    assert_eq!(&encoded[..], &[2, 1, 7, 4, 1, b'n']);
    let decoded = decode::<Wired>(encoded).unwrap();
    assert_eq!(decoded.id, 7);
    assert_eq!(decoded.name, "n");
    assert!(decoded.notify.is_none());
    assert!(decoded.hook.is_none());

    // Their tags are accepted with an empty payload
    let decoded = decode::<Wired>(&[4, 1, 7, 2, 3, 4, 1, b'n'][..]).unwrap();
    assert_eq!(decoded.id, 7);
    assert_eq!(decoded.name, "n");
    assert!(decoded.notify.is_none());

    let record = value.to_value();
    assert_eq!(record.as_record().unwrap().len(), 2);
    let encoded = encode(&record).unwrap();
    let decoded = Wired::from_value(&decode_dynamic(encoded).unwrap()).unwrap();
    assert_eq!(decoded.id, 7);
    assert_eq!(decoded.name, "n");
    assert!(decoded.hook.is_none());
}
