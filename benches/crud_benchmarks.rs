use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use mbtree::{MBTreeMap, Order};
use std::collections::BTreeMap;

const N: usize = 10_000;

/// Orders compared against `BTreeMap`: the minimum, the default, and a wide fan-out.
const ORDERS: [usize; 3] = [3, 12, 64];

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

fn key_patterns() -> [(&'static str, Vec<i64>); 3] {
    [
        ("ordered", ordered_keys(N)),
        ("reverse", reverse_ordered_keys(N)),
        ("random", random_keys(N)),
    ]
}

fn build(order: usize, keys: &[i64]) -> MBTreeMap<i64, i64> {
    let mut map = MBTreeMap::with_order(Order::new(order).unwrap());
    for &k in keys {
        map.insert(k, k);
    }
    map
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("map_insert_{pattern}"));

        for order in ORDERS {
            group.bench_function(BenchmarkId::new("MBTreeMap", order), |b| {
                b.iter(|| build(order, &keys));
            });
        }

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>());
        });

        group.finish();
    }
}

fn bench_map_get(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("map_get_{pattern}"));

        for order in ORDERS {
            let map = build(order, &keys);
            group.bench_function(BenchmarkId::new("MBTreeMap", order), |b| {
                b.iter(|| {
                    let mut sum = 0i64;
                    for k in &keys {
                        if let Some(&v) = map.get(k) {
                            sum = sum.wrapping_add(v);
                        }
                    }
                    sum
                });
            });
        }

        let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter(|| {
                let mut sum = 0i64;
                for k in &keys {
                    if let Some(&v) = map.get(k) {
                        sum = sum.wrapping_add(v);
                    }
                }
                sum
            });
        });

        group.finish();
    }
}

fn bench_map_remove(c: &mut Criterion) {
    for (pattern, keys) in key_patterns() {
        let mut group = c.benchmark_group(format!("map_remove_{pattern}"));

        for order in ORDERS {
            group.bench_function(BenchmarkId::new("MBTreeMap", order), |b| {
                b.iter_batched(
                    || build(order, &keys),
                    |mut map| {
                        for k in &keys {
                            map.remove(k);
                        }
                        map
                    },
                    BatchSize::SmallInput,
                );
            });
        }

        group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
            b.iter_batched(
                || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
                |mut map| {
                    for k in &keys {
                        map.remove(k);
                    }
                    map
                },
                BatchSize::SmallInput,
            );
        });

        group.finish();
    }
}

fn bench_map_iter(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_iter");

    for order in ORDERS {
        let map = build(order, &keys);
        group.bench_function(BenchmarkId::new("MBTreeMap", order), |b| {
            b.iter(|| map.values().fold(0i64, |acc, &v| acc.wrapping_add(v)));
        });
    }

    let map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| map.values().fold(0i64, |acc, &v| acc.wrapping_add(v)));
    });

    group.finish();
}

// ─── Criterion Groups ───────────────────────────────────────────────────────

criterion_group!(map_benches, bench_map_insert, bench_map_get, bench_map_remove, bench_map_iter,);

criterion_main!(map_benches);
