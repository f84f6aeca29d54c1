//! Convert an Earth-fixed state vector to the J2000 inertial frame.
//!
//!   cargo run --example frame_transform
use geofinder::frames::{state_from_slice, transform_state, EarthModelFrames, Frame, FrameProvider};
use geofinder::time::str_to_et;
use geofinder::GeoFinderError;

fn main() -> Result<(), GeoFinderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames = EarthModelFrames;
    let from: Frame = "IAU_EARTH".parse()?;
    let to: Frame = "J2000".parse()?;

    let et = str_to_et("2013-01-01T12:00:00")?;
    let xform = frames.state_transform_matrix(from, to, et);

    // x, y, z (km), vx, vy, vz (km/s)
    let state_ecf = state_from_slice(&[-1000.0, 2000.0, 5000.0, 1.0, -0.5, 2.0])?;
    let state_j2000 = transform_state(&xform, &state_ecf);

    println!("{from} state: {:?}", state_ecf.as_slice());
    println!("{to} state: {:?}", state_j2000.as_slice());
    Ok(())
}
