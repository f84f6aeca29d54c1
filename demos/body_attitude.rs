//! Attitude of the Earth-fixed frame with respect to J2000, as a direction cosine matrix
//! and as 3-2-1 Euler angles.
//!
//!   cargo run --example body_attitude
use geofinder::frames::{euler_angles_zyx, EarthModelFrames, Frame, FrameProvider};
use geofinder::time::str_to_et;
use geofinder::GeoFinderError;

fn main() -> Result<(), GeoFinderError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let frames = EarthModelFrames;
    let (from, to) = (Frame::IauEarth, Frame::J2000);

    let date = "2013-01-01T12:00:00";
    let et = str_to_et(date)?;
    let rot = frames.attitude_matrix(from, to, et);

    println!("{date}: direction cosine matrix from {from} to {to}:{rot}");

    let (a3, a2, a1) = euler_angles_zyx(&rot);
    println!(
        "Euler angles (ZYX, deg): [{:.9}, {:.9}, {:.9}]",
        a3.to_degrees(),
        a2.to_degrees(),
        a1.to_degrees()
    );
    Ok(())
}
