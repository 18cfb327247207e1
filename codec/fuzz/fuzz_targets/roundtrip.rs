#![no_main]

use arbitrary::Arbitrary;
use commonware_bin::{decode, decode_as, encode, Record, ToValue};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Record)]
struct Inner {
    flag: bool,
    small: i8,
    label: String,
}

#[derive(Arbitrary, Clone, Debug, Default, PartialEq, Record)]
struct Outer {
    id: u64,
    delta: i64,
    ratio: f32,
    precise: f64,
    #[bin(tag = 10)]
    bytes: Vec<u8>,
    #[bin(tag = 11)]
    fixed: [u16; 4],
    #[bin(tag = 20)]
    table: BTreeMap<String, i32>,
    #[bin(tag = 30)]
    inner: Inner,
    #[bin(tag = 31)]
    optional: Option<Box<Inner>>,
    #[bin(tag = 40)]
    children: Vec<Inner>,
}

fn fuzz(value: Outer) {
    // Static form (floats are compared through their encoding)
    let encoded = encode(&value).expect("failed to encode");
    let decoded = decode::<Outer>(&encoded[..]).expect("failed to decode");
    assert_eq!(encode(&decoded).expect("failed to re-encode"), encoded);

    // Dynamic form
    let dynamic = value.to_value();
    let encoded = encode(&dynamic).expect("failed to encode dynamically");
    let projected = decode_as::<Outer>(&encoded[..]).expect("failed to project");
    assert_eq!(
        encode(&projected.to_value()).expect("failed to re-encode dynamically"),
        encoded
    );
}

fuzz_target!(|value: Outer| {
    fuzz(value);
});
