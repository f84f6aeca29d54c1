use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_abs_diff_eq;
use geofinder::{
    predicate::{Predicate, Relation},
    refine::bisect,
    search::{find_intervals, CancelToken, EventSearch, SearchConfig},
    signal::Fallible,
    GeoFinderError, WindowSet,
};

mod common;
use common::{assert_windows_close, init_logger};

fn config(step: f64, tolerance: f64) -> SearchConfig {
    SearchConfig::new(step, tolerance).unwrap()
}

#[test]
fn test_bisect_linear_root() {
    let root = bisect(
        &|t: f64| t - 5.0,
        &Predicate::new(Relation::Greater, 0.0),
        0.0,
        10.0,
        0.001,
    )
    .unwrap();
    assert_abs_diff_eq!(root, 5.0, epsilon = 0.001);
}

#[test]
fn test_line_crossing_zero() {
    init_logger();
    let result = find_intervals(
        &|t: f64| 10.0 - t,
        &Predicate::new(Relation::Greater, 0.0),
        &WindowSet::from_bounds(0.0, 20.0).unwrap(),
        &config(1.0, 0.01),
    )
    .unwrap();

    assert_windows_close(
        &result,
        &WindowSet::from_bounds(0.0, 10.0).unwrap(),
        0.01,
    );
}

#[test]
fn test_constant_predicates() {
    let confinement = WindowSet::from_bounds(0.0, 100.0).unwrap();
    let predicate = Predicate::new(Relation::LessEq, 1.0);

    let always = find_intervals(&|_t: f64| 0.0, &predicate, &confinement, &config(7.0, 0.1)).unwrap();
    assert_eq!(always, confinement);

    let never = find_intervals(&|_t: f64| 2.0, &predicate, &confinement, &config(7.0, 0.1)).unwrap();
    assert!(never.is_empty());
}

#[test]
fn test_invalid_configs() {
    for (step, tolerance) in [(0.0, 0.1), (-1.0, 0.1), (1.0, 0.0), (1.0, 1.0), (1.0, 2.0)] {
        assert!(matches!(
            SearchConfig::new(step, tolerance),
            Err(GeoFinderError::InvalidConfig(_))
        ));
    }

    let strict = SearchConfig::builder()
        .step(10.0)
        .tolerance(0.5)
        .allow_empty_confinement(false)
        .build()
        .unwrap();
    assert_eq!(
        find_intervals(
            &|t: f64| t,
            &Predicate::new(Relation::Greater, 0.0),
            &WindowSet::new(),
            &strict
        ),
        Err(GeoFinderError::EmptyConfinement)
    );
}

#[test]
fn test_config_from_json() {
    let config: SearchConfig = serde_json::from_str(r#"{"step": 3600.0, "tolerance": 0.5}"#).unwrap();
    assert_eq!(config, SearchConfig::new(3600.0, 0.5).unwrap());
    assert!(config.allow_empty_confinement);

    let predicate: Predicate =
        serde_json::from_str(r#"{"relation": "Greater", "reference": 400000.0}"#).unwrap();
    assert_eq!(predicate, Predicate::new(Relation::Greater, 400_000.0));
}

#[test]
fn test_search_over_split_confinement() {
    // sin(t) > 0.5 on [π/6, 5π/6] + 2kπ
    let confinement = WindowSet::from_pairs([(0.0, 2.0), (6.0, 9.0), (13.5, 14.0)]).unwrap();
    let result = find_intervals(
        &|t: f64| t.sin(),
        &Predicate::new(Relation::Greater, 0.5),
        &confinement,
        &config(0.1, 1e-6),
    )
    .unwrap();

    let pi = std::f64::consts::PI;
    let expected = WindowSet::from_pairs([
        (pi / 6.0, 2.0),
        (2.0 * pi + pi / 6.0, 2.0 * pi + 5.0 * pi / 6.0),
        (13.5, 14.0),
    ])
    .unwrap();
    assert_windows_close(&result, &expected, 1e-6);
}

#[test]
fn test_equality_crossings_are_instants() {
    let result = find_intervals(
        &|t: f64| (t - 3.0) * (t - 7.0),
        &Predicate::new(Relation::Equal, 0.0),
        &WindowSet::from_bounds(0.0, 10.0).unwrap(),
        &config(0.5, 1e-6),
    )
    .unwrap();

    assert_eq!(result.cardinality(), 2);
    assert!(result.iter().all(|iv| iv.is_degenerate()));
    assert_abs_diff_eq!(result.at(0).unwrap().start(), 3.0, epsilon = 1e-6);
    assert_abs_diff_eq!(result.at(1).unwrap().start(), 7.0, epsilon = 1e-6);
    assert_eq!(result.measure(), 0.0);
}

#[test]
fn test_cancellation_from_signal() {
    let token = CancelToken::new();
    let calls = AtomicUsize::new(0);
    let signal = Fallible(|t: f64| {
        if calls.fetch_add(1, Ordering::SeqCst) == 5 {
            token.cancel();
        }
        Ok(t)
    });

    let search = EventSearch::new(config(1.0, 0.1)).with_cancel_token(token.clone());
    let outcome = search.find_intervals(
        &signal,
        &Predicate::new(Relation::Greater, 50.0),
        &WindowSet::from_bounds(0.0, 100.0).unwrap(),
    );

    assert_eq!(outcome, Err(GeoFinderError::Cancelled));
    assert!(calls.load(Ordering::SeqCst) < 10);
}

#[test]
fn test_signal_errors_abort_the_search() {
    let signal = Fallible(|t: f64| {
        if t > 42.0 {
            Err(GeoFinderError::SignalEvaluation(format!("no data at {t}")))
        } else {
            Ok(t)
        }
    });
    let outcome = find_intervals(
        &signal,
        &Predicate::new(Relation::Greater, 10.0),
        &WindowSet::from_bounds(0.0, 100.0).unwrap(),
        &config(1.0, 0.1),
    );
    assert_eq!(
        outcome,
        Err(GeoFinderError::SignalEvaluation("no data at 43".into()))
    );
}
