use approx::assert_abs_diff_eq;
use geofinder::{
    constants::{AU, SECONDS_PER_DAY},
    ephemeris::{Aberration, Body, EphemerisProvider, LowPrecisionEphemeris},
    frames::Frame,
    geometry::{distance_signal, gf_distance, gf_distance_with},
    predicate::{Predicate, Relation},
    search::{find_intervals, EventSearch, SearchConfig},
    signal::SignalFunction,
    time::{et_to_string, str_to_et},
    windows::WindowSet,
};
use nalgebra::Vector3;

mod common;
use common::{first_quarter_2007, init_logger};

#[test]
fn test_moon_beyond_400000_km() {
    init_logger();
    let eph = LowPrecisionEphemeris::new();
    let confinement = first_quarter_2007();
    let signal = distance_signal(&eph, Body::Moon, Aberration::None, Body::Earth);
    let predicate = Predicate::new(Relation::Greater, 400_000.0);
    let config = SearchConfig::new(SECONDS_PER_DAY, 1.0).unwrap();

    let result = find_intervals(&signal, &predicate, &confinement, &config).unwrap();

    assert!(result.cardinality() > 0);
    let bound = confinement.hull().unwrap();
    for interval in &result {
        assert!(interval.duration() < 10.0 * SECONDS_PER_DAY, "{interval}");

        let mid = 0.5 * (interval.start() + interval.end());
        assert!(signal.evaluate(mid).unwrap() > 400_000.0);

        // the radial speed of the Moon stays below 0.1 km/s
        for t in [interval.start(), interval.end()] {
            if t != bound.start() && t != bound.end() {
                assert_abs_diff_eq!(signal.evaluate(t).unwrap(), 400_000.0, epsilon = 0.2);
            }
        }
    }

    // apogees come back once per anomalistic month
    let starts: Vec<f64> = result
        .iter()
        .map(|iv| iv.start())
        .filter(|&t| t != bound.start())
        .collect();
    for pair in starts.windows(2) {
        let gap = (pair[1] - pair[0]) / SECONDS_PER_DAY;
        assert!((24.0..31.0).contains(&gap), "{gap}");
    }
}

#[test]
fn test_gf_distance_matches_generic_search() {
    init_logger();
    let eph = LowPrecisionEphemeris::new();
    let confinement = first_quarter_2007();

    let direct = gf_distance(
        &eph,
        Body::Moon,
        Aberration::None,
        Body::Earth,
        Relation::Greater,
        400_000.0,
        0.0,
        SECONDS_PER_DAY,
        &confinement,
    )
    .unwrap();

    let signal = distance_signal(&eph, Body::Moon, Aberration::None, Body::Earth);
    let generic = find_intervals(
        &signal,
        &Predicate::new(Relation::Greater, 400_000.0),
        &confinement,
        &SearchConfig::new(SECONDS_PER_DAY, 1.0).unwrap(),
    )
    .unwrap();

    common::assert_windows_close(&direct, &generic, 1.0);
    for interval in &direct {
        println!(
            "{} -> {}",
            et_to_string(interval.start()),
            et_to_string(interval.end())
        );
    }
}

#[test]
fn test_light_time_barely_moves_lunar_events() {
    let eph = LowPrecisionEphemeris::new();
    let confinement = first_quarter_2007();
    let search = EventSearch::new(SearchConfig::new(SECONDS_PER_DAY, 1e-3).unwrap());
    let predicate = Predicate::new(Relation::Greater, 400_000.0);

    let geometric = gf_distance_with(
        &search,
        &eph,
        Body::Moon,
        Aberration::None,
        Body::Earth,
        &predicate,
        &confinement,
    )
    .unwrap();
    let corrected = gf_distance_with(
        &search,
        &eph,
        Body::Moon,
        Aberration::Lt,
        Body::Earth,
        &predicate,
        &confinement,
    )
    .unwrap();

    // the Moon moves about 40 km along its barycentric path during the light time
    common::assert_windows_close(&geometric, &corrected, 7200.0);
}

#[test]
fn test_parallel_search_on_split_confinement() {
    let eph = LowPrecisionEphemeris::new();
    let signal = distance_signal(&eph, Body::Moon, Aberration::None, Body::Earth);
    let predicate = Predicate::new(Relation::Less, 375_000.0);

    let start = str_to_et("2007 JAN 01 00:00:00 TDB").unwrap();
    let confinement = WindowSet::from_pairs((0..6).map(|k| {
        let offset = k as f64 * 20.0 * SECONDS_PER_DAY;
        (start + offset, start + offset + 15.0 * SECONDS_PER_DAY)
    }))
    .unwrap();

    let search = EventSearch::new(SearchConfig::new(SECONDS_PER_DAY / 4.0, 1.0).unwrap());
    let sequential = search
        .find_intervals(&signal, &predicate, &confinement)
        .unwrap();
    let parallel = search
        .find_intervals_par(&signal, &predicate, &confinement)
        .unwrap();

    assert_eq!(sequential, parallel);
    assert!(sequential.cardinality() > 0);
    assert!(sequential.intersect(&confinement) == sequential);
}

#[test]
fn test_mars_position_with_aberration() {
    let eph = LowPrecisionEphemeris::new();
    let et = str_to_et("July 4, 2003 11:00 AM PST").unwrap();

    let (position, lt) = eph
        .position(
            Body::MarsBarycenter,
            et,
            Frame::J2000,
            Aberration::LtS,
            Body::Earth,
        )
        .unwrap();

    let reference = Vector3::<f64>::new(73_822_235.33, -27_127_919.18, -18_741_306.31);
    assert!((position.norm() / reference.norm() - 1.0).abs() < 5e-3);
    assert!(position.angle(&reference).to_degrees() < 0.2);
    assert_abs_diff_eq!(lt, 269.7, epsilon = 1.5);
}

#[test]
fn test_planetary_distances() {
    let eph = LowPrecisionEphemeris::new();

    // closest approach of Mars in 2003
    let et = str_to_et("2003-08-27T09:51:00").unwrap();
    let (mars, _) = eph
        .position(
            Body::MarsBarycenter,
            et,
            Frame::J2000,
            Aberration::None,
            Body::Earth,
        )
        .unwrap();
    assert!((5.50e7..5.66e7).contains(&mars.norm()), "{}", mars.norm());

    let et = str_to_et("2010-03-20").unwrap();
    let (sun, lt) = eph
        .position(Body::Sun, et, Frame::J2000, Aberration::Cn, Body::Earth)
        .unwrap();
    assert_abs_diff_eq!(sun.norm() / AU, 1.0, epsilon = 0.02);
    assert_abs_diff_eq!(lt, 499.0, epsilon = 10.0);

    let (moon, _) = eph
        .position(Body::Moon, et, Frame::J2000, Aberration::None, Body::Earth)
        .unwrap();
    assert!((356_000.0..407_000.0).contains(&moon.norm()));
}
