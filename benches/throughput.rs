//! Throughput Benchmark for bytecache
//!
//! This benchmark measures the performance of the cache and the wire codec
//! under various workloads.

use bytecache::protocol::{parse_frame, Response};
use bytecache::storage::{Cache, MemoryCache};
use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;

/// Benchmark set operations
fn bench_set(c: &mut Criterion) {
    let cache = Arc::new(MemoryCache::new());

    let mut group = c.benchmark_group("set");
    group.throughput(Throughput::Elements(1));

    group.bench_function("set_small", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            let value = Bytes::from("small_value");
            cache.set(key, value).unwrap();
            i += 1;
        });
    });

    group.bench_function("set_medium", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(1024)); // 1KB value
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            cache.set(key, value.clone()).unwrap();
            i += 1;
        });
    });

    group.bench_function("set_large", |b| {
        let mut i = 0u64;
        let value = Bytes::from("x".repeat(64 * 1024)); // 64KB value
        b.iter(|| {
            let key = Bytes::from(format!("key:{}", i));
            cache.set(key, value.clone()).unwrap();
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark get operations
fn bench_get(c: &mut Criterion) {
    let cache = Arc::new(MemoryCache::new());

    // Pre-populate with data
    for i in 0..100_000 {
        let key = Bytes::from(format!("key:{}", i));
        let value = Bytes::from(format!("value:{}", i));
        cache.set(key, value).unwrap();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key:{}", i % 100_000);
            black_box(cache.get(key.as_bytes()).unwrap());
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("missing:{}", i);
            black_box(cache.get(key.as_bytes()).unwrap());
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark the wire codec
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1));

    let set_frame = {
        let value = "x".repeat(1024);
        format!("S3 {} key{}", value.len(), value).into_bytes()
    };

    group.bench_function("parse_set_1k", |b| {
        b.iter(|| {
            black_box(parse_frame(&set_frame).unwrap());
        });
    });

    group.bench_function("parse_get", |b| {
        b.iter(|| {
            black_box(parse_frame(b"G3 key").unwrap());
        });
    });

    let response = Response::value(Bytes::from("x".repeat(1024)));
    group.bench_function("serialize_value_1k", |b| {
        let mut buf = Vec::with_capacity(2048);
        b.iter(|| {
            buf.clear();
            response.serialize_into(&mut buf);
            black_box(buf.len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_codec);
criterion_main!(benches);
