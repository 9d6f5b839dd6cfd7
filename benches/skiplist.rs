//! Benchmarks for this crate's [`SkipList`].

use criterion::{AxisScale, BenchmarkId, Criterion, PlotConfiguration, black_box};
use rand::{Rng, SeedableRng, rngs::StdRng};
use skipset::SkipList;

/// Benchmarking sizes.
const SIZES: [usize; 6] = [1, 10, 100, 1000, 10_000, 100_000];

/// Builds a list of `size` random keys, returning the keys that were drawn.
fn populate(rng: &mut StdRng, size: usize) -> (SkipList<u64>, Vec<u64>) {
    let keys: Vec<u64> = std::iter::repeat_with(|| rng.random()).take(size).collect();
    (keys.iter().copied().collect(), keys)
}

/// Benchmarking insertion.
#[inline]
pub fn insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Insert");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let (mut sl, _) = populate(&mut rng, size);

            b.iter(|| {
                sl.insert(rng.random());
            });
        });
    }
}

/// Benchmarking search, with roughly half the probes present.
#[inline]
pub fn search(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Search");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let (sl, keys) = populate(&mut rng, size);
            let probes: Vec<u64> = std::iter::repeat_with(|| {
                if rng.random_bool(0.5) {
                    keys[rng.random_range(0..keys.len())]
                } else {
                    rng.random()
                }
            })
            .take(10)
            .collect();

            b.iter(|| {
                for probe in &probes {
                    black_box(sl.search(probe));
                }
            });
        });
    }
}

/// Benchmarking deletion, reinserting each deleted key to keep the size fixed.
#[inline]
pub fn delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("SkipList Delete");
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for size in SIZES {
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            let mut rng = StdRng::seed_from_u64(0x1234_abcd);
            let (mut sl, keys) = populate(&mut rng, size);

            b.iter(|| {
                let key = keys[rng.random_range(0..keys.len())];
                black_box(sl.delete(&key));
                sl.insert(key);
            });
        });
    }
}

/// Benchmarking iteration.
#[inline]
pub fn iter(c: &mut Criterion) {
    c.bench_function("SkipList Iter", |b| {
        let mut rng = StdRng::seed_from_u64(0x1234_abcd);
        let (sl, _) = populate(&mut rng, 100_000);

        b.iter(|| {
            for el in &sl {
                black_box(el);
            }
        });
    });
}
