#![no_main]

use arbitrary::Arbitrary;
use commonware_bin::{decode_cfg, decode_dynamic, encode, Config, RangeCfg, Value};
use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

#[derive(Arbitrary, Debug)]
enum Target {
    Dynamic,
    Bytes,
    Strings,
    Map,
    Nested,
}

#[derive(Arbitrary, Debug)]
struct Input {
    target: Target,
    data: Vec<u8>,
}

fn cfg() -> Config {
    Config {
        length: RangeCfg::new(..=4096),
        ..Config::default()
    }
}

fn fuzz(input: Input) {
    let data = &input.data[..];
    match input.target {
        Target::Dynamic => {
            let Ok(value) = decode_dynamic(data) else {
                return;
            };

            // Anything decoded must re-encode, and the re-encoding must be stable
            let first = encode(&value).expect("failed to re-encode a decoded value");
            let decoded: Value = decode_cfg(&first[..], Config::default())
                .expect("failed to decode a re-encoded value");
            let second = encode(&decoded).expect("failed to re-encode twice");
            assert_eq!(first, second);
        }
        Target::Bytes => {
            let _ = decode_cfg::<Vec<u8>>(data, cfg());
        }
        Target::Strings => {
            let _ = decode_cfg::<Vec<String>>(data, cfg());
        }
        Target::Map => {
            let _ = decode_cfg::<BTreeMap<u32, Vec<i64>>>(data, cfg());
        }
        Target::Nested => {
            let _ = decode_cfg::<Vec<Vec<Option<Box<f64>>>>>(data, cfg());
        }
    }
}

fuzz_target!(|input: Input| {
    fuzz(input);
});
