//! Throughput Benchmark for duokv
//!
//! This benchmark measures the store engine and the full parse-execute-
//! format path under simple workloads. Keys and values stay within the
//! 10-character limit the store enforces.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use duokv::commands::{CommandHandler, ResponseStyle};
use duokv::storage::StoreEngine;
use std::sync::Arc;

/// Benchmark PUT operations
fn bench_put(c: &mut Criterion) {
    let mut group = c.benchmark_group("put");
    group.throughput(Throughput::Elements(1));

    group.bench_function("put_new", |b| {
        let engine = StoreEngine::new();
        let mut i = 0u64;
        b.iter(|| {
            // Unique key per iteration, at most 10 characters
            let key = format!("k{}", i);
            let _ = black_box(engine.put(&key, "v"));
            i += 1;
        });
    });

    group.bench_function("put_duplicate", |b| {
        let engine = StoreEngine::new();
        engine.put("hot", "v").unwrap();
        b.iter(|| {
            // Exercises the rejection path
            black_box(engine.put("hot", "other"))
        });
    });

    group.finish();
}

/// Benchmark GET operations
fn bench_get(c: &mut Criterion) {
    let engine = StoreEngine::new();

    // Pre-populate with data
    for i in 0..1_000 {
        engine.put(&format!("k{}", i), &format!("v{}", i)).unwrap();
    }

    let mut group = c.benchmark_group("get");
    group.throughput(Throughput::Elements(1));

    group.bench_function("get_existing", |b| {
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("k{}", i % 1_000);
            black_box(engine.get(&key)).ok();
            i += 1;
        });
    });

    group.bench_function("get_missing", |b| {
        b.iter(|| black_box(engine.get("absent")));
    });

    group.bench_function("get_mixed_case", |b| {
        let mut i = 0u64;
        b.iter(|| {
            // Forces the lowercase normalization path
            let key = format!("K{}", i % 1_000);
            black_box(engine.get(&key)).ok();
            i += 1;
        });
    });

    group.finish();
}

/// Benchmark the full line-in, line-out path
fn bench_handler(c: &mut Criterion) {
    let storage = Arc::new(StoreEngine::new());
    let handler = CommandHandler::new(Arc::clone(&storage), ResponseStyle::Stream);

    for i in 0..100 {
        storage.put(&format!("k{}", i), "v").unwrap();
    }

    let mut group = c.benchmark_group("handler");
    group.throughput(Throughput::Elements(1));

    group.bench_function("execute_get", |b| {
        b.iter(|| black_box(handler.execute("GET k42")));
    });

    group.bench_function("execute_keys", |b| {
        b.iter(|| black_box(handler.execute("KEYS")));
    });

    group.bench_function("execute_invalid", |b| {
        b.iter(|| black_box(handler.execute("FROB k42")));
    });

    group.finish();
}

criterion_group!(benches, bench_put, bench_get, bench_handler);
criterion_main!(benches);
