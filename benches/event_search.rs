//! Benchmarks for the windowed event search
//!
//! Run with:
//!   cargo bench --bench event_search
//!   cargo bench --bench event_search -- event_search/lunar_quarter
//!
//! RAYON_NUM_THREADS=1 gives a single threaded baseline for the parallel variant.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use geofinder::ephemeris::{Aberration, Body, LowPrecisionEphemeris};
use geofinder::geometry::distance_signal;
use geofinder::predicate::{Predicate, Relation};
use geofinder::search::{EventSearch, SearchConfig};
use geofinder::time::str_to_et;
use geofinder::windows::WindowSet;

/// First quarter of 2007, as in the lunar distance demo.
fn lunar_confinement() -> WindowSet {
    WindowSet::from_bounds(
        str_to_et("2007 JAN 01 00:00:00 TDB").unwrap(),
        str_to_et("2007 APR 01 00:00:00 TDB").unwrap(),
    )
    .unwrap()
}

/// Moon beyond 400000 km over three months, one day step, one second tolerance.
fn bench_lunar_quarter(c: &mut Criterion) {
    let eph = LowPrecisionEphemeris::new();
    let signal = distance_signal(&eph, Body::Moon, Aberration::None, Body::Earth);
    let predicate = Predicate::new(Relation::Greater, 400_000.0);
    let confinement = lunar_confinement();
    let search = EventSearch::new(SearchConfig::new(86_400.0, 1.0).unwrap());

    c.bench_function("event_search/lunar_quarter", |b| {
        b.iter(|| {
            let result = search
                .find_intervals(&signal, &predicate, black_box(&confinement))
                .unwrap();
            black_box(result);
        })
    });
}

/// Cheap analytic signal over a fragmented confinement, sequential vs parallel.
fn bench_fragmented_confinement(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x5EED);
    let confinement = WindowSet::from_pairs((0..200).map(|_| {
        let start = rng.random_range(0.0..1.0e6);
        (start, start + rng.random_range(100.0..5_000.0))
    }))
    .unwrap();
    let signal = |t: f64| (t / 500.0).sin() + 0.3 * (t / 77.0).cos();
    let predicate = Predicate::new(Relation::Greater, 0.8);
    let search = EventSearch::new(SearchConfig::new(20.0, 1e-6).unwrap());

    c.bench_function("event_search/fragmented_sequential", |b| {
        b.iter(|| black_box(search.find_intervals(&signal, &predicate, &confinement)))
    });

    c.bench_function("event_search/fragmented_parallel", |b| {
        b.iter(|| black_box(search.find_intervals_par(&signal, &predicate, &confinement)))
    });
}

/// Window algebra on random sets of a few thousand intervals.
fn bench_window_union(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xA11CE);
    let samples = 2_000usize;

    c.bench_function("windows/union_intersect", |b| {
        b.iter_batched(
            || {
                let mut random = || {
                    WindowSet::from_pairs((0..samples).map(|_| {
                        let start = rng.random_range(0.0..1.0e7);
                        (start, start + rng.random_range(0.0..1.0e4))
                    }))
                    .unwrap()
                };
                (random(), random())
            },
            |(a, b)| {
                let u = a.union(&b);
                black_box(u.intersect(&a));
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench_lunar_quarter, bench_fragmented_confinement, bench_window_union
);
criterion_main!(benches);
