//! Criterion micro-benchmarks for `DynamicArray` against `Vec`.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use trove_array::DynamicArray;
use trove_bench::{filled_array, insertion_points, values, SEED};

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

/// Benchmark: n appends into an empty array, growth included.
fn bench_push_back(c: &mut Criterion) {
    let mut group = c.benchmark_group("array_push_back");
    for n in SIZES {
        let input = values(n, SEED);
        group.bench_with_input(BenchmarkId::new("DynamicArray", n), &input, |b, input| {
            b.iter(|| {
                let mut array = DynamicArray::new();
                for &v in input {
                    array.push_back(v).unwrap();
                }
                black_box(array.len());
            });
        });
        group.bench_with_input(BenchmarkId::new("Vec", n), &input, |b, input| {
            b.iter(|| {
                let mut vec = Vec::new();
                for &v in input {
                    vec.push(v);
                }
                black_box(vec.len());
            });
        });
    }
    group.finish();
}

/// Benchmark: inserts at random positions of a growing array.
fn bench_random_insert(c: &mut Criterion) {
    let n = 10_000;
    let points = insertion_points(n, SEED);
    c.bench_function("array_random_insert_10k", |b| {
        b.iter(|| {
            let mut array = DynamicArray::new();
            for (i, &at) in points.iter().enumerate() {
                array.insert(at, i as u64).unwrap();
            }
            black_box(array.len());
        });
    });
}

/// Benchmark: erase the middle half of a 100K array.
fn bench_erase_range(c: &mut Criterion) {
    let n = 100_000;
    c.bench_function("array_erase_range_100k", |b| {
        b.iter_batched(
            || filled_array(n),
            |mut array| {
                array.erase_range(n / 4..3 * n / 4).unwrap();
                black_box(array.len());
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: exact-size clone of a 100K array.
fn bench_clone(c: &mut Criterion) {
    let array = filled_array(100_000);
    c.bench_function("array_clone_100k", |b| {
        b.iter(|| black_box(array.try_clone().unwrap()));
    });
}

criterion_group!(
    benches,
    bench_push_back,
    bench_random_insert,
    bench_erase_range,
    bench_clone
);
criterion_main!(benches);
