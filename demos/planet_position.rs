//! Position of the Mars system barycenter as seen from the Earth, corrected for light
//! time and stellar aberration.
//!
//!   cargo run --example planet_position
use geofinder::ephemeris::{Aberration, Body, EphemerisProvider, LowPrecisionEphemeris};
use geofinder::frames::Frame;
use geofinder::time::str_to_et;
use geofinder::GeoFinderError;

fn main() -> Result<(), GeoFinderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let eph = LowPrecisionEphemeris::new();

    let target: Body = "Mars Barycenter".parse()?;
    let observer: Body = "Earth".parse()?;
    let frame: Frame = "J2000".parse()?;
    let correction: Aberration = "LT+S".parse()?;

    let date = "July 4, 2003 11:00 AM PST";
    let et = str_to_et(date)?;

    let (position, light_time) = eph.position(target, et, frame, correction, observer)?;

    println!("{date}");
    println!(
        "{target} relative to {observer} (km): [{:.3}, {:.3}, {:.3}]",
        position.x, position.y, position.z
    );
    println!("light time (s): {light_time:.6}");
    Ok(())
}
