use commonware_bin::{decode, decode_dynamic, encode, Record, ToValue};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

#[derive(Clone, Debug, Default, PartialEq, Record)]
struct Entry {
    id: u64,
    name: String,
    scores: Vec<i32>,
    weight: f64,
}

fn entries(n: usize) -> Vec<Entry> {
    (0..n)
        .map(|i| Entry {
            id: i as u64,
            name: format!("entry-{i}"),
            scores: (0..16).map(|s| s * i as i32 - 64).collect(),
            weight: i as f64 / 3.0,
        })
        .collect()
}

fn bench_static(c: &mut Criterion) {
    let mut group = c.benchmark_group("static");
    for &n in &[1, 64, 1024] {
        let items = entries(n);
        let encoded = encode(&items).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", n), &items, |b, items| {
            b.iter(|| encode(black_box(items)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, encoded| {
            b.iter(|| decode::<Vec<Entry>>(black_box(&encoded[..])).unwrap());
        });
    }
    group.finish();
}

fn bench_dynamic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic");
    for &n in &[1, 64, 1024] {
        let value = entries(n).to_value();
        let encoded = encode(&value).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", n), &value, |b, value| {
            b.iter(|| encode(black_box(value)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, encoded| {
            b.iter(|| decode_dynamic(black_box(&encoded[..])).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_static, bench_dynamic);
criterion_main!(benches);
