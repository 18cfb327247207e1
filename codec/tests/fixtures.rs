//! Byte-exact fixtures for static and dynamic encodings.

use commonware_bin::{
    decode, decode_as, decode_dynamic, encode,
    types::complex::{Complex128, Complex64},
    Record, ToValue, Type, Value, Write,
};
use std::collections::BTreeMap;
use test_case::test_case;

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Struct1 {
    #[bin(tag = 100)]
    field_one: String,
    #[bin(tag = 200)]
    field_two: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct StructNumbers {
    #[bin(tag = 10)]
    int: isize,
    #[bin(tag = 20)]
    int8: i8,
    #[bin(tag = 30)]
    int16: i16,
    #[bin(tag = 40)]
    int32: i32,
    #[bin(tag = 50)]
    int64: i64,
    #[bin(tag = 60)]
    uint: usize,
    #[bin(tag = 70)]
    uint8: u8,
    #[bin(tag = 80)]
    uint16: u16,
    #[bin(tag = 90)]
    uint32: u32,
    #[bin(tag = 100)]
    uint64: u64,
    #[bin(tag = 110)]
    float32: f32,
    #[bin(tag = 120)]
    float64: f64,
    #[bin(tag = 130)]
    complex64: Complex64,
    #[bin(tag = 140)]
    complex128: Complex128,
}

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct StructArray {
    #[bin(tag = 10)]
    numbers: Vec<isize>,
    #[bin(tag = 20)]
    stuff: Vec<Value>,
}

fn struct1() -> Struct1 {
    Struct1 {
        field_one: "one".into(),
        field_two: 2,
    }
}

fn struct_numbers() -> StructNumbers {
    StructNumbers {
        int: 1,
        int8: 2,
        int16: 4,
        int32: 8,
        int64: 16,
        uint: 32,
        uint8: 64,
        uint16: 128,
        uint32: 256,
        uint64: 512,
        float32: 10.24,
        float64: 20.48,
        complex64: Complex64::new(40.0, 96.0),
        complex128: Complex128::new(81.0, 92.0),
    }
}

fn struct_array() -> StructArray {
    StructArray {
        numbers: vec![3, 9, 27, 81],
        stuff: vec![
            Value::String("Hello".into()),
            Value::Int(13),
            Value::String("World".into()),
            Value::String("!".into()),
        ],
    }
}

const STRUCT_NUMBERS: &[u8] = &[
    10, 1, 20, 2, 30, 4, 40, 8, 50, 16, 60, 32, 70, 64, 80, 128, 1, 90, 128, 2, 100, 128, 4, 110,
    138, 174, 143, 137, 4, 120, 251, 168, 184, 189, 148, 220, 158, 154, 64, 130, 1, 128, 128, 128,
    145, 4, 128, 128, 128, 150, 4, 140, 1, 128, 128, 128, 128, 128, 128, 144, 170, 64, 128, 128,
    128, 128, 128, 128, 192, 171, 64,
];

const DYNAMIC_STRUCT_NUMBERS: &[u8] = &[
    25, 14, 10, 2, 1, 20, 3, 2, 30, 4, 4, 40, 5, 8, 50, 6, 16, 60, 7, 32, 70, 8, 64, 80, 9, 128, 1,
    90, 10, 128, 2, 100, 11, 128, 4, 110, 13, 138, 174, 143, 137, 4, 120, 14, 251, 168, 184, 189,
    148, 220, 158, 154, 64, 130, 1, 15, 128, 128, 128, 145, 4, 128, 128, 128, 150, 4, 140, 1, 16,
    128, 128, 128, 128, 128, 128, 144, 170, 64, 128, 128, 128, 128, 128, 128, 192, 171, 64,
];

#[test_case(&(), &[0]; "nil")]
#[test_case(&true, &[255]; "bool")]
#[test_case(&768isize, &[128, 6]; "int")]
#[test_case(&10240usize, &[128, 80]; "uint")]
#[test_case(&42.69f64, &[184, 189, 148, 220, 158, 138, 214, 162, 64]; "float")]
#[test_case(
    &Complex128::new(69.0, 42.0),
    &[128, 128, 128, 128, 128, 128, 208, 168, 64, 128, 128, 128, 128, 128, 128, 192, 162, 64];
    "complex"
)]
#[test_case(&[1u64, 256, 1024], &[1, 128, 2, 128, 8]; "array")]
#[test_case(&BTreeMap::from([(16u8, 1024isize)]), &[1, 16, 128, 8]; "map")]
#[test_case(&vec![24isize, 69, 128, 512], &[4, 24, 69, 128, 1, 128, 4]; "sequence")]
#[test_case(&Vec::<i32>::new(), &[0]; "empty sequence")]
#[test_case(&String::from("A"), &[1, 65]; "short string")]
#[test_case(
    &String::from("Hello, World!"),
    &[13, 72, 101, 108, 108, 111, 44, 32, 87, 111, 114, 108, 100, 33];
    "string"
)]
#[test_case(&struct1(), &[2, 100, 3, 111, 110, 101, 200, 1, 2]; "record")]
fn test_static(value: &dyn Write, expected: &[u8]) {
    assert_eq!(&encode(value).unwrap()[..], expected);
}

#[test_case(Value::Nil, &[0, 0]; "nil")]
#[test_case(Value::Bool(true), &[1, 255]; "bool")]
#[test_case([1u64, 256, 1024].to_value(), &[17, 1, 0, 3, 11, 1, 128, 2, 128, 8]; "array")]
#[test_case(
    BTreeMap::from([(16u8, 1024isize)]).to_value(),
    &[21, 8, 2, 1, 16, 128, 8];
    "map"
)]
#[test_case(
    Value::Map(Type::Any, Type::Any, vec![(Value::String("string".into()), Value::Int(10))]),
    &[21, 20, 20, 1, 24, 6, 115, 116, 114, 105, 110, 103, 2, 10];
    "map of any"
)]
#[test_case(
    Value::Map(Type::Any, Type::String, vec![(Value::Int(20), Value::String("twenty".into()))]),
    &[21, 20, 24, 1, 2, 20, 6, 116, 119, 101, 110, 116, 121];
    "map with any keys"
)]
#[test_case(
    Value::Map(Type::String, Type::Any, vec![(Value::String("fifth".into()), Value::Int(50))]),
    &[21, 24, 20, 1, 5, 102, 105, 102, 116, 104, 2, 50];
    "map with any values"
)]
#[test_case(
    vec![24isize, 69, 128, 512].to_value(),
    &[23, 1, 0, 4, 2, 4, 24, 69, 128, 1, 128, 4];
    "sequence"
)]
#[test_case(
    Value::Sequence(
        Type::Any,
        vec![Value::String("twenty".into()), Value::Int(50), Value::String("hundreds".into())],
    ),
    &[
        23, 1, 0, 3, 20, 3, 24, 6, 116, 119, 101, 110, 116, 121, 2, 50, 24, 8, 104, 117, 110, 100,
        114, 101, 100, 115,
    ];
    "sequence of any"
)]
#[test_case(
    "Hello, World!".to_value(),
    &[24, 13, 72, 101, 108, 108, 111, 44, 32, 87, 111, 114, 108, 100, 33];
    "string"
)]
#[test_case(
    struct1().to_value(),
    &[25, 2, 100, 24, 3, 111, 110, 101, 200, 1, 11, 2];
    "record"
)]
fn test_dynamic(value: Value, expected: &[u8]) {
    let encoded = encode(&value).unwrap();
    assert_eq!(&encoded[..], expected);
    assert_eq!(decode_dynamic(encoded).unwrap(), value);
}

#[test]
fn test_struct_numbers() {
    let value = struct_numbers();

    // Static form: field count, then (tag, payload) pairs
    let encoded = encode(&value).unwrap();
    assert_eq!(encoded[0], 14);
    assert_eq!(&encoded[1..], STRUCT_NUMBERS);
    assert_eq!(decode::<StructNumbers>(encoded).unwrap(), value);

    // Dynamic form: every field carries its kind
    let encoded = encode(&value.to_value()).unwrap();
    assert_eq!(&encoded[..], DYNAMIC_STRUCT_NUMBERS);
    assert_eq!(decode_as::<StructNumbers>(encoded).unwrap(), value);
}

#[test]
fn test_struct_array() {
    let value = struct_array();

    let encoded = encode(&value).unwrap();
    assert_eq!(
        &encoded[..],
        &[
            2, 10, 4, 3, 9, 27, 81, 20, 4, 24, 5, 72, 101, 108, 108, 111, 2, 13, 24, 5, 87, 111,
            114, 108, 100, 24, 1, 33,
        ]
    );
    assert_eq!(decode::<StructArray>(encoded).unwrap(), value);

    let encoded = encode(&value.to_value()).unwrap();
    assert_eq!(
        &encoded[..],
        &[
            25, 2, 10, 23, 1, 0, 4, 2, 4, 3, 9, 27, 81, 20, 23, 1, 0, 4, 20, 4, 24, 5, 72, 101,
            108, 108, 111, 2, 13, 24, 5, 87, 111, 114, 108, 100, 24, 1, 33,
        ]
    );
    assert_eq!(decode_as::<StructArray>(encoded).unwrap(), value);
}
