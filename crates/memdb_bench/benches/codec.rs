//! Record codec benchmarks.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use memdb_bench::random_account;
use memdb_codec::{from_cbor, to_canonical_cbor, CanonicalEncoder, Value};
use memdb_core::Record;

/// A record-shaped map value.
fn user_map() -> Value {
    Value::map([
        ("Id", Value::from("42")),
        ("Name", Value::from("Alice")),
        ("Email", Value::from("alice@example.com")),
        ("Age", Value::Integer(30)),
        ("Score", Value::Float(97.5)),
    ])
}

/// Create a nested value.
fn nested_value(depth: usize, width: usize) -> Value {
    if depth == 0 {
        Value::Text("leaf".into())
    } else {
        Value::Map(
            (0..width)
                .map(|i| (format!("key_{i}"), nested_value(depth - 1, width)))
                .collect(),
        )
    }
}

/// Benchmark encoding values.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    group.bench_function("integer", |b| {
        let value = Value::Integer(42);
        b.iter(|| black_box(to_canonical_cbor(black_box(&value)).unwrap()));
    });

    group.bench_function("user_map", |b| {
        let value = user_map();
        b.iter(|| black_box(to_canonical_cbor(black_box(&value)).unwrap()));
    });

    group.bench_function("nested_depth3_width5", |b| {
        let value = nested_value(3, 5);
        b.iter(|| black_box(to_canonical_cbor(black_box(&value)).unwrap()));
    });

    group.finish();
}

/// Benchmark decoding values.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.bench_function("user_map", |b| {
        let encoded = to_canonical_cbor(&user_map()).unwrap();
        b.iter(|| black_box(from_cbor(black_box(&encoded)).unwrap()));
    });

    for size in [256, 1024, 4096].iter() {
        group.throughput(Throughput::Bytes(*size as u64));
        group.bench_with_input(BenchmarkId::new("bytes", size), size, |b, &size| {
            let encoded = to_canonical_cbor(&Value::Bytes(vec![0u8; size])).unwrap();
            b.iter(|| black_box(from_cbor(black_box(&encoded)).unwrap()));
        });
    }

    group.finish();
}

/// Benchmark the record round trip the store performs on every add and read.
fn bench_record_roundtrip(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_roundtrip");

    for size in [64, 1024].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let account = random_account(16, size);
            b.iter(|| {
                let bytes = black_box(&account).encode().unwrap();
                black_box(memdb_bench::Account::decode(&bytes).unwrap());
            });
        });
    }

    group.finish();
}

/// Benchmark encoder reuse.
fn bench_encoder_reuse(c: &mut Criterion) {
    c.bench_function("encoder_reuse_100", |b| {
        let values: Vec<_> = (0..100).map(Value::Integer).collect();

        b.iter(|| {
            let mut encoder = CanonicalEncoder::with_capacity(512);
            for value in &values {
                encoder.encode(black_box(value)).unwrap();
            }
            black_box(encoder.into_bytes());
        });
    });
}

criterion_group!(
    benches,
    bench_encode,
    bench_decode,
    bench_record_roundtrip,
    bench_encoder_reuse,
);

criterion_main!(benches);
