#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use geofinder::{
    constants::Second,
    time::str_to_et,
    windows::{Interval, WindowSet},
};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Confinement window of the lunar distance scenario: the first quarter of 2007.
pub fn first_quarter_2007() -> WindowSet {
    WindowSet::from_bounds(
        str_to_et("2007-01-01").unwrap(),
        str_to_et("2007-04-01").unwrap(),
    )
    .unwrap()
}

pub fn assert_windows_close(actual: &WindowSet, expected: &WindowSet, epsilon: Second) {
    assert_eq!(
        actual.cardinality(),
        expected.cardinality(),
        "{actual} vs {expected}"
    );
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_abs_diff_eq!(a.start(), e.start(), epsilon = epsilon);
        assert_abs_diff_eq!(a.end(), e.end(), epsilon = epsilon);
    }
}

/// Random intervals with integer bounds in `[0, span]`, possibly degenerate.
pub fn random_intervals(rng: &mut StdRng, count: usize, span: u32) -> Vec<Interval> {
    (0..count)
        .map(|_| {
            let start = rng.random_range(0..span) as f64;
            let len = rng.random_range(0..=span / 10) as f64;
            Interval::new(start, (start + len).min(span as f64)).unwrap()
        })
        .collect()
}

pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
