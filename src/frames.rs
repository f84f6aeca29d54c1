//! # Reference frames
//!
//! Frame orientation is supplied to the rest of the crate through the [`FrameProvider`]
//! trait, the counterpart of the orientation kernels of a full astrodynamics toolkit. The
//! crate ships one implementation, [`EarthModelFrames`], good to a few arcseconds:
//!
//! | frame | definition |
//! |-------|------------|
//! | [`Frame::J2000`] | mean equator and equinox of J2000 |
//! | [`Frame::EclipJ2000`] | mean ecliptic and equinox of J2000 (IAU 1976 obliquity) |
//! | [`Frame::IauEarth`] | Earth body-fixed: IAU 1976 precession then GMST about the pole, nutation and polar motion neglected |
//!
//! Matrix conventions: a matrix returned for `(from, to)` maps coordinates expressed in
//! `from` to coordinates expressed in `to` (`x_to = M · x_from`). State transformation
//! matrices are 6×6 and act on `[x, y, z, vx, vy, vz]`:
//!
//! ```text
//! | R     0 |
//! | dR/dt R |
//! ```
use std::{fmt, str::FromStr};

use nalgebra::{Matrix3, Matrix6, Rotation3, Vector3, Vector6};

use crate::{
    constants::{Radian, Second, DAYS_PER_CENTURY, EARTH_ROTATION_RATE, RADEG, RADSEC, T2000},
    geofinder_errors::GeoFinderError,
    time::{et_to_mjd_tdb, et_to_mjd_utc, gmst},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frame {
    J2000,
    EclipJ2000,
    IauEarth,
}

impl Frame {
    pub fn name(&self) -> &'static str {
        match self {
            Frame::J2000 => "J2000",
            Frame::EclipJ2000 => "ECLIPJ2000",
            Frame::IauEarth => "IAU_EARTH",
        }
    }
}

impl FromStr for Frame {
    type Err = GeoFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "J2000" | "EME2000" => Ok(Frame::J2000),
            "ECLIPJ2000" => Ok(Frame::EclipJ2000),
            "IAU_EARTH" | "ITRF93" => Ok(Frame::IauEarth),
            _ => Err(GeoFinderError::UnknownFrame(s.to_string())),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Orientation of reference frames with respect to each other.
pub trait FrameProvider {
    /// 3×3 rotation from `from` to `to` at ephemeris time `et`.
    fn attitude_matrix(&self, from: Frame, to: Frame, et: Second) -> Matrix3<f64>;

    /// 6×6 state transformation from `from` to `to` at ephemeris time `et`.
    fn state_transform_matrix(&self, from: Frame, to: Frame, et: Second) -> Matrix6<f64>;
}

/// Analytic Earth orientation model (precession + sidereal rotation).
#[derive(Debug, Clone, Copy, Default)]
pub struct EarthModelFrames;

impl EarthModelFrames {
    /// Rotation from J2000 to `frame` and its time derivative.
    fn from_j2000(&self, frame: Frame, et: Second) -> (Matrix3<f64>, Matrix3<f64>) {
        match frame {
            Frame::J2000 => (Matrix3::identity(), Matrix3::zeros()),
            Frame::EclipJ2000 => (
                axis_rotation(-obliquity(T2000), Axis::X),
                Matrix3::zeros(),
            ),
            Frame::IauEarth => {
                let prec = precession_matrix(et_to_mjd_tdb(et));
                let theta = gmst(et_to_mjd_utc(et));
                let spin = axis_rotation(-theta, Axis::Z);
                // d/dt Rz(-θ) = -θ' · dRz/dα evaluated at α = -θ
                let (s, c) = (-theta).sin_cos();
                let dspin = Matrix3::new(-s, -c, 0.0, c, -s, 0.0, 0.0, 0.0, 0.0)
                    * (-EARTH_ROTATION_RATE);
                (spin * prec, dspin * prec)
            }
        }
    }
}

impl FrameProvider for EarthModelFrames {
    fn attitude_matrix(&self, from: Frame, to: Frame, et: Second) -> Matrix3<f64> {
        let (r_from, _) = self.from_j2000(from, et);
        let (r_to, _) = self.from_j2000(to, et);
        r_to * r_from.transpose()
    }

    fn state_transform_matrix(&self, from: Frame, to: Frame, et: Second) -> Matrix6<f64> {
        let (r_from, dr_from) = self.from_j2000(from, et);
        let (r_to, dr_to) = self.from_j2000(to, et);

        let rot = r_to * r_from.transpose();
        let drot = dr_to * r_from.transpose() + r_to * dr_from.transpose();
        block_state_matrix(&rot, &drot)
    }
}

/// Principal axes for elementary rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Active right-handed rotation of a vector by `alpha` radians around `axis`.
///
/// A change of basis by `alpha` (the "frame rotation" of classical astronomy) is
/// `axis_rotation(-alpha, axis)`.
pub fn axis_rotation(alpha: Radian, axis: Axis) -> Matrix3<f64> {
    let axis = match axis {
        Axis::X => Vector3::x_axis(),
        Axis::Y => Vector3::y_axis(),
        Axis::Z => Vector3::z_axis(),
    };
    Rotation3::from_axis_angle(&axis, alpha).into()
}

/// Mean obliquity of the ecliptic (IAU 1976) at a Modified Julian Date (TT), in radians.
pub fn obliquity(tjm: f64) -> Radian {
    let ob0 = ((23.0 * 3600.0 + 26.0 * 60.0) + 21.448) * RADSEC;
    let ob1 = -46.815 * RADSEC;
    let ob2 = -0.0006 * RADSEC;
    let ob3 = 0.00181 * RADSEC;

    let t = (tjm - T2000) / DAYS_PER_CENTURY;
    ((ob3 * t + ob2) * t + ob1) * t + ob0
}

/// IAU 1976 precession matrix mapping J2000 mean equatorial coordinates to the mean
/// equator and equinox of date `tjm` (MJD, TT).
///
/// ```text
/// P = R3(-z) · R2(θ) · R3(-ζ)    (frame rotations)
/// ```
pub fn precession_matrix(tjm: f64) -> Matrix3<f64> {
    let t = (tjm - T2000) / DAYS_PER_CENTURY;

    let zeta = ((0.0000050 * t + 0.0000839) * t + 0.6406161) * t * RADEG;
    let z = ((0.0000051 * t + 0.0003041) * t + 0.6406161) * t * RADEG;
    let theta = ((-0.0000116 * t - 0.0001185) * t + 0.5567530) * t * RADEG;

    axis_rotation(z, Axis::Z) * axis_rotation(-theta, Axis::Y) * axis_rotation(zeta, Axis::Z)
}

/// Rotation from the ecliptic of date to the J2000 equator, used for theories expressed in
/// mean ecliptic coordinates of date.
pub fn ecliptic_of_date_to_j2000(tjm: f64) -> Matrix3<f64> {
    precession_matrix(tjm).transpose() * axis_rotation(obliquity(tjm), Axis::X)
}

/// Assemble the 6×6 state matrix `[[R, 0], [dR, R]]`.
pub fn block_state_matrix(rot: &Matrix3<f64>, drot: &Matrix3<f64>) -> Matrix6<f64> {
    let mut m = Matrix6::zeros();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
    m.fixed_view_mut::<3, 3>(3, 3).copy_from(rot);
    m.fixed_view_mut::<3, 3>(3, 0).copy_from(drot);
    m
}

/// Apply a 6×6 state transformation matrix to a state vector.
pub fn transform_state(matrix: &Matrix6<f64>, state: &Vector6<f64>) -> Vector6<f64> {
    matrix * state
}

/// Build a state vector from a slice, checking its dimension.
pub fn state_from_slice(values: &[f64]) -> Result<Vector6<f64>, GeoFinderError> {
    if values.len() != 6 {
        return Err(GeoFinderError::DimensionMismatch {
            expected: 6,
            got: values.len(),
        });
    }
    Ok(Vector6::from_column_slice(values))
}

/// Decompose a rotation matrix into 3-2-1 (Z-Y-X) Euler angles `(a3, a2, a1)` such that
///
/// ```text
/// M = [a3]_Z · [a2]_Y · [a1]_X
/// ```
///
/// where `[a]_k` is a frame rotation of `a` radians about axis `k`. `a3` and `a1` lie in
/// (-π, π], `a2` in [-π/2, π/2]. At the gimbal lock (`|a2| = π/2`) `a1` is set to zero.
pub fn euler_angles_zyx(m: &Matrix3<f64>) -> (Radian, Radian, Radian) {
    let sin_a2 = m[(2, 0)].clamp(-1.0, 1.0);
    let a2 = sin_a2.asin();

    if sin_a2.abs() < 1.0 - 1e-12 {
        let a3 = (-m[(1, 0)]).atan2(m[(0, 0)]);
        let a1 = (-m[(2, 1)]).atan2(m[(2, 2)]);
        (a3, a2, a1)
    } else {
        let a3 = m[(0, 1)].atan2(m[(1, 1)]);
        (a3, a2, 0.0)
    }
}

/// Inverse of [`euler_angles_zyx`].
pub fn rotation_from_euler_zyx(a3: Radian, a2: Radian, a1: Radian) -> Matrix3<f64> {
    axis_rotation(-a3, Axis::Z) * axis_rotation(-a2, Axis::Y) * axis_rotation(-a1, Axis::X)
}

#[cfg(test)]
mod frames_test {
    use approx::assert_relative_eq;

    use super::*;
    use crate::time::str_to_et;

    const TOLERANCE: f64 = 1e-10;

    #[test]
    fn test_frame_names() {
        assert_eq!("j2000".parse::<Frame>().unwrap(), Frame::J2000);
        assert_eq!("IAU_EARTH".parse::<Frame>().unwrap(), Frame::IauEarth);
        assert_eq!(
            "IAU_MARS".parse::<Frame>(),
            Err(GeoFinderError::UnknownFrame("IAU_MARS".into()))
        );
        assert_eq!(Frame::EclipJ2000.to_string(), "ECLIPJ2000");
    }

    #[test]
    fn test_obliquity() {
        assert_relative_eq!(obliquity(T2000), 0.40909280422232897, epsilon = 1e-15);
    }

    #[test]
    fn test_j2000_to_ecliptic() {
        let m = EarthModelFrames.attitude_matrix(Frame::J2000, Frame::EclipJ2000, 0.0);
        let expected = Matrix3::new(
            1.0,
            0.0,
            0.0,
            0.0,
            0.9174820620691818,
            0.3977771559319137,
            0.0,
            -0.3977771559319137,
            0.9174820620691818,
        );
        assert_relative_eq!(m, expected, epsilon = TOLERANCE);

        // the ecliptic pole lies in the y-z plane of J2000, tilted towards -y
        let pole = m.transpose() * Vector3::z();
        assert!(pole.y < 0.0 && pole.z > 0.9);
    }

    #[test]
    fn test_precession_identity_at_j2000() {
        assert_relative_eq!(precession_matrix(T2000), Matrix3::identity(), epsilon = 1e-15);
    }

    #[test]
    fn test_precession_moves_equinox_eastward() {
        // After a century the J2000 equinox has a positive right ascension in the frame of date.
        let p = precession_matrix(T2000 + DAYS_PER_CENTURY);
        let x = p * Vector3::x();
        assert!(x.y > 0.0);
        assert_relative_eq!(x.y.atan2(x.x), 1.2811 * RADEG, epsilon = 2e-3 * RADEG);
    }

    #[test]
    fn test_matrices_are_rotations() {
        let et = str_to_et("2013-01-01T12:00:00").unwrap();
        let frames = [Frame::J2000, Frame::EclipJ2000, Frame::IauEarth];
        for from in frames {
            for to in frames {
                let m = EarthModelFrames.attitude_matrix(from, to, et);
                assert_relative_eq!(m * m.transpose(), Matrix3::identity(), epsilon = TOLERANCE);
                assert_relative_eq!(m.determinant(), 1.0, epsilon = TOLERANCE);

                let back = EarthModelFrames.attitude_matrix(to, from, et);
                assert_relative_eq!(back, m.transpose(), epsilon = TOLERANCE);
            }
        }
    }

    #[test]
    fn test_state_transform_blocks() {
        let et = str_to_et("2013-01-01T12:00:00").unwrap();
        let provider = EarthModelFrames;
        let sx = provider.state_transform_matrix(Frame::IauEarth, Frame::J2000, et);
        let r = provider.attitude_matrix(Frame::IauEarth, Frame::J2000, et);

        assert_relative_eq!(sx.fixed_view::<3, 3>(0, 0).into_owned(), r, epsilon = TOLERANCE);
        assert_relative_eq!(sx.fixed_view::<3, 3>(3, 3).into_owned(), r, epsilon = TOLERANCE);
        assert_relative_eq!(
            sx.fixed_view::<3, 3>(0, 3).into_owned(),
            Matrix3::zeros(),
            epsilon = 0.0
        );

        // derivative block against a central finite difference
        let h = 1.0;
        let numeric = (provider.attitude_matrix(Frame::IauEarth, Frame::J2000, et + h)
            - provider.attitude_matrix(Frame::IauEarth, Frame::J2000, et - h))
            / (2.0 * h);
        assert_relative_eq!(
            sx.fixed_view::<3, 3>(3, 0).into_owned(),
            numeric,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_earth_fixed_point_moves_eastward() {
        // A point at rest on the equator, seen from J2000, moves at ~465 m/s
        let et = str_to_et("2013-01-01T12:00:00").unwrap();
        let sx = EarthModelFrames.state_transform_matrix(Frame::IauEarth, Frame::J2000, et);
        let state = Vector6::new(6378.137, 0.0, 0.0, 0.0, 0.0, 0.0);
        let inertial = transform_state(&sx, &state);
        let speed = inertial.fixed_rows::<3>(3).norm();
        assert_relative_eq!(speed, 0.4651, epsilon = 1e-3);
        assert_relative_eq!(inertial.fixed_rows::<3>(0).norm(), 6378.137, epsilon = 1e-9);
    }

    #[test]
    fn test_state_from_slice() {
        assert!(state_from_slice(&[1.0, 2.0, 3.0]).is_err());
        let s = state_from_slice(&[-1000.0, 2000.0, 5000.0, 1.0, -0.5, 2.0]).unwrap();
        assert_eq!(s[4], -0.5);
    }

    #[test]
    fn test_euler_round_trip() {
        for (a3, a2, a1) in [
            (0.3, -0.2, 1.1),
            (-2.5, 1.2, -3.0),
            (3.0, 0.0, 0.0),
            (0.0, -1.5, 0.4),
        ] {
            let m = rotation_from_euler_zyx(a3, a2, a1);
            let (b3, b2, b1) = euler_angles_zyx(&m);
            assert_relative_eq!(b3, a3, epsilon = 1e-12);
            assert_relative_eq!(b2, a2, epsilon = 1e-12);
            assert_relative_eq!(b1, a1, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_euler_gimbal_lock() {
        let m = rotation_from_euler_zyx(0.7, std::f64::consts::FRAC_PI_2, 0.0);
        let (a3, a2, a1) = euler_angles_zyx(&m);
        assert_relative_eq!(a2, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(a1, 0.0);
        assert_relative_eq!(rotation_from_euler_zyx(a3, a2, a1), m, epsilon = 1e-12);
    }

    #[test]
    fn test_earth_rotation_euler_angle_tracks_sidereal_time() {
        // the Z angle of the IAU_EARTH -> J2000 rotation advances by ~360.9856° per day
        let et = str_to_et("2013-01-01T12:00:00").unwrap();
        let frames = EarthModelFrames;
        let (z0, _, _) = euler_angles_zyx(&frames.attitude_matrix(Frame::IauEarth, Frame::J2000, et));
        let (z1, _, _) = euler_angles_zyx(&frames.attitude_matrix(
            Frame::IauEarth,
            Frame::J2000,
            et + 3600.0,
        ));
        let advance = (z0 - z1).rem_euclid(std::f64::consts::TAU);
        assert_relative_eq!(advance, 15.041 * RADEG, epsilon = 0.01 * RADEG);
    }
}
