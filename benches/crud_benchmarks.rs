use avl_ost::AvlTreeMap;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn reverse_ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).rev().collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // LCG keeps the sequence identical between runs.
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Insert ─────────────────────────────────────────────────────────────────

fn bench_insert(c: &mut Criterion, name: &str, keys: &[i64]) {
    let mut group = c.benchmark_group(name);

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| {
            let mut map = AvlTreeMap::new();
            for &k in keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_ordered(c: &mut Criterion) {
    bench_insert(c, "map_insert_ordered", &ordered_keys(N));
}

fn bench_map_insert_reverse(c: &mut Criterion) {
    bench_insert(c, "map_insert_reverse", &reverse_ordered_keys(N));
}

fn bench_map_insert_random(c: &mut Criterion) {
    bench_insert(c, "map_insert_random", &random_keys(N));
}

// ─── Lookup and removal ─────────────────────────────────────────────────────

fn bench_map_get(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let mut group = c.benchmark_group("map_get");

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| keys.iter().filter(|k| avl.get(k).is_some()).count());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| keys.iter().filter(|k| bt.get(k).is_some()).count());
    });

    group.finish();
}

fn bench_map_remove(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let mut group = c.benchmark_group("map_remove");

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter_batched(
            || avl.clone(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_batched(
            || bt.clone(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
            criterion::BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ─── Order statistics ───────────────────────────────────────────────────────

fn bench_map_select(c: &mut Criterion) {
    let avl: AvlTreeMap<i64, i64> = random_keys(N).into_iter().map(|k| (k, k)).collect();
    let bt: BTreeMap<i64, i64> = avl.iter().map(|(&k, &v)| (k, v)).collect();
    let mut group = c.benchmark_group("map_select");

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| {
            for rank in (0..avl.len()).step_by(7) {
                black_box(avl.select(rank).ok());
            }
        });
    });

    // BTreeMap has no rank index, so a linear walk is the baseline.
    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            for rank in (0..bt.len()).step_by(7) {
                black_box(bt.iter().nth(rank));
            }
        });
    });

    group.finish();
}

fn bench_map_rank(c: &mut Criterion) {
    let keys = random_keys(N);
    let avl: AvlTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let mut group = c.benchmark_group("map_rank");

    group.bench_function(BenchmarkId::new("AvlTreeMap", N), |b| {
        b.iter(|| keys.iter().map(|k| avl.rank(k)).sum::<usize>());
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert_ordered,
    bench_map_insert_reverse,
    bench_map_insert_random,
    bench_map_get,
    bench_map_remove,
    bench_map_select,
    bench_map_rank,
);
criterion_main!(benches);
