//! Intervals of the first quarter of 2007 during which the Moon is farther than
//! 400000 km from the Earth.
//!
//!   RUST_LOG=debug cargo run --example lunar_distance_events
use geofinder::ephemeris::{Aberration, Body, LowPrecisionEphemeris};
use geofinder::geometry::gf_distance;
use geofinder::predicate::Relation;
use geofinder::time::{et_to_string, str_to_et};
use geofinder::windows::WindowSet;
use geofinder::GeoFinderError;

fn main() -> Result<(), GeoFinderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let eph = LowPrecisionEphemeris::new();

    let et0 = str_to_et("2007 JAN 01 00:00:00 TDB")?;
    let et1 = str_to_et("2007 APR 01 00:00:00 TDB")?;
    let confinement = WindowSet::new().insert(et0, et1)?;

    let result = gf_distance(
        &eph,
        Body::Moon,
        Aberration::None,
        Body::Earth,
        Relation::Greater,
        400_000.0,
        0.0,
        86_400.0,
        &confinement,
    )?;

    log::info!("{} intervals found", result.cardinality());
    for i in 0..result.cardinality() {
        let interval = result.at(i)?;
        println!("{}", et_to_string(interval.start()));
        println!("{}", et_to_string(interval.end()));
    }
    Ok(())
}
