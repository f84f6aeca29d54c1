//! # Low precision analytic ephemeris
//!
//! [`LowPrecisionEphemeris`] evaluates body positions without any kernel file:
//!
//! * **Planets and the Earth-Moon barycenter**: mean Keplerian elements referred to the
//!   J2000 ecliptic with linear secular rates (Standish, *Keplerian Elements for
//!   Approximate Positions of the Major Planets*, table 1). Valid between 1800 and 2050,
//!   with errors of a few arcminutes at worst.
//! * **Moon**: truncated ELP-2000/82 series (Meeus, *Astronomical Algorithms*, ch. 47),
//!   geocentric, referred to the mean ecliptic of date, good to about 10" and 20 km.
//! * **Sun**: offset from the solar system barycenter by the mass-weighted planet positions.
//!
//! Velocities are obtained by central differences of the positions.
use std::f64::consts::PI;

use nalgebra::{Vector3, Vector6};
use roots::{find_root_newton_raphson, SimpleConvergency};

use super::{Body, EphemerisProvider};
use crate::{
    constants::{Kilometer, Radian, Second, AU, EMRAT, RADEG, SECONDS_PER_CENTURY, T2000},
    frames::{axis_rotation, ecliptic_of_date_to_j2000, obliquity, Axis, EarthModelFrames, FrameProvider},
    geofinder_errors::GeoFinderError,
    time::{et_to_centuries, et_to_mjd_tdb},
};

/// Validity span of the mean elements, in Julian centuries from J2000 (1800 to 2050).
const COVERAGE: (f64, f64) = (-2.0, 0.5);

/// Half step of the central difference used for velocities.
const VELOCITY_STEP: Second = 60.0;

/// Mean elements at J2000 and their rates per Julian century.
///
/// Angles in degrees, semi-major axis in AU.
#[derive(Debug, Clone, Copy)]
struct MeanElements {
    a: [f64; 2],
    e: [f64; 2],
    incl: [f64; 2],
    mean_longitude: [f64; 2],
    long_peri: [f64; 2],
    long_node: [f64; 2],
    /// Sun mass divided by the mass of the planetary system
    mass_ratio: f64,
}

const MERCURY: MeanElements = MeanElements {
    a: [0.38709927, 0.00000037],
    e: [0.20563593, 0.00001906],
    incl: [7.00497902, -0.00594749],
    mean_longitude: [252.25032350, 149472.67411175],
    long_peri: [77.45779628, 0.16047689],
    long_node: [48.33076593, -0.12534081],
    mass_ratio: 6_023_600.0,
};

const VENUS: MeanElements = MeanElements {
    a: [0.72333566, 0.00000390],
    e: [0.00677672, -0.00004107],
    incl: [3.39467605, -0.00078890],
    mean_longitude: [181.97909950, 58517.81538729],
    long_peri: [131.60246718, 0.00268329],
    long_node: [76.67984255, -0.27769418],
    mass_ratio: 408_523.71,
};

const EARTH_MOON: MeanElements = MeanElements {
    a: [1.00000261, 0.00000562],
    e: [0.01671123, -0.00004392],
    incl: [-0.00001531, -0.01294668],
    mean_longitude: [100.46457166, 35999.37244981],
    long_peri: [102.93768193, 0.32327364],
    long_node: [0.0, 0.0],
    mass_ratio: 328_900.56,
};

const MARS: MeanElements = MeanElements {
    a: [1.52371034, 0.00001847],
    e: [0.09339410, 0.00007882],
    incl: [1.84969142, -0.00813131],
    mean_longitude: [-4.55343205, 19140.30268499],
    long_peri: [-23.94362959, 0.44441088],
    long_node: [49.55953891, -0.29257343],
    mass_ratio: 3_098_708.0,
};

const JUPITER: MeanElements = MeanElements {
    a: [5.20288700, -0.00011607],
    e: [0.04838624, -0.00013253],
    incl: [1.30439695, -0.00183714],
    mean_longitude: [34.39644051, 3034.74612775],
    long_peri: [14.72847983, 0.21252668],
    long_node: [100.47390909, 0.20469106],
    mass_ratio: 1_047.3486,
};

const SATURN: MeanElements = MeanElements {
    a: [9.53667594, -0.00125060],
    e: [0.05386179, -0.00050991],
    incl: [2.48599187, 0.00193609],
    mean_longitude: [49.95424423, 1222.49362201],
    long_peri: [92.59887831, -0.41897216],
    long_node: [113.66242448, -0.28867794],
    mass_ratio: 3_497.898,
};

const URANUS: MeanElements = MeanElements {
    a: [19.18916464, -0.00196176],
    e: [0.04725744, -0.00004397],
    incl: [0.77263783, -0.00242939],
    mean_longitude: [313.23810451, 428.48202785],
    long_peri: [170.95427630, 0.40805281],
    long_node: [74.01692503, 0.04240589],
    mass_ratio: 22_902.98,
};

const NEPTUNE: MeanElements = MeanElements {
    a: [30.06992276, 0.00026291],
    e: [0.00859048, 0.00005105],
    incl: [1.77004347, 0.00035372],
    mean_longitude: [-55.12002969, 218.45945325],
    long_peri: [44.96476227, -0.32241464],
    long_node: [131.78422574, -0.01262724],
    mass_ratio: 19_412.24,
};

const PLANETS: [MeanElements; 8] = [
    MERCURY, VENUS, EARTH_MOON, MARS, JUPITER, SATURN, URANUS, NEPTUNE,
];

/// Periodic terms of the lunar longitude and distance:
/// multiples of (D, M, M', F), longitude coefficient (1e-6 deg), distance coefficient (m).
#[rustfmt::skip]
const MOON_LR: [(i8, i8, i8, i8, f64, f64); 38] = [
    (0, 0, 1, 0, 6288774.0, -20905355.0),
    (2, 0, -1, 0, 1274027.0, -3699111.0),
    (2, 0, 0, 0, 658314.0, -2955968.0),
    (0, 0, 2, 0, 213618.0, -569925.0),
    (0, 1, 0, 0, -185116.0, 48888.0),
    (0, 0, 0, 2, -114332.0, -3149.0),
    (2, 0, -2, 0, 58793.0, 246158.0),
    (2, -1, -1, 0, 57066.0, -152138.0),
    (2, 0, 1, 0, 53322.0, -170733.0),
    (2, -1, 0, 0, 45758.0, -204586.0),
    (0, 1, -1, 0, -40923.0, -129620.0),
    (1, 0, 0, 0, -34720.0, 108743.0),
    (0, 1, 1, 0, -30383.0, 104755.0),
    (2, 0, 0, -2, 15327.0, 10321.0),
    (0, 0, 1, 2, -12528.0, 0.0),
    (0, 0, 1, -2, 10980.0, 79661.0),
    (4, 0, -1, 0, 10675.0, -34782.0),
    (0, 0, 3, 0, 10034.0, -23210.0),
    (4, 0, -2, 0, 8548.0, -21636.0),
    (2, 1, -1, 0, -7888.0, 24208.0),
    (2, 1, 0, 0, -6766.0, 30824.0),
    (1, 0, -1, 0, -5163.0, -8379.0),
    (1, 1, 0, 0, 4987.0, -16675.0),
    (2, -1, 1, 0, 4036.0, -12831.0),
    (2, 0, 2, 0, 3994.0, -10445.0),
    (4, 0, 0, 0, 3861.0, -11650.0),
    (2, 0, -3, 0, 3665.0, 14403.0),
    (0, 1, -2, 0, -2689.0, -7003.0),
    (2, 0, -1, 2, -2602.0, 0.0),
    (2, -1, -2, 0, 2390.0, 10056.0),
    (1, 0, 1, 0, -2348.0, 6322.0),
    (2, -2, 0, 0, 2236.0, -9884.0),
    (0, 1, 2, 0, -2120.0, 5751.0),
    (0, 2, 0, 0, -2069.0, 0.0),
    (2, -2, -1, 0, 2048.0, -4950.0),
    (2, 0, 1, -2, -1773.0, 4130.0),
    (2, 0, 0, 2, -1595.0, 0.0),
    (4, -1, -1, 0, 1215.0, -3958.0),
];

/// Periodic terms of the lunar latitude: multiples of (D, M, M', F), coefficient (1e-6 deg).
#[rustfmt::skip]
const MOON_B: [(i8, i8, i8, i8, f64); 30] = [
    (0, 0, 0, 1, 5128122.0),
    (0, 0, 1, 1, 280602.0),
    (0, 0, 1, -1, 277693.0),
    (2, 0, 0, -1, 173237.0),
    (2, 0, -1, 1, 55413.0),
    (2, 0, -1, -1, 46271.0),
    (2, 0, 0, 1, 32573.0),
    (0, 0, 2, 1, 17198.0),
    (2, 0, 1, -1, 9266.0),
    (0, 0, 2, -1, 8822.0),
    (2, -1, 0, -1, 8216.0),
    (2, 0, -2, -1, 4324.0),
    (2, 0, 1, 1, 4200.0),
    (2, 1, 0, -1, -3359.0),
    (2, -1, -1, 1, 2463.0),
    (2, -1, 0, 1, 2211.0),
    (2, -1, -1, -1, 2065.0),
    (0, 1, -1, -1, -1870.0),
    (4, 0, -1, -1, 1828.0),
    (0, 1, 0, 1, -1794.0),
    (0, 0, 0, 3, -1749.0),
    (0, 1, -1, 1, -1565.0),
    (1, 0, 0, 1, -1491.0),
    (0, 1, 1, 1, -1475.0),
    (0, 1, 1, -1, -1410.0),
    (0, 1, 0, -1, -1344.0),
    (1, 0, 0, -1, -1335.0),
    (0, 0, 3, 1, 1107.0),
    (4, 0, 0, -1, 1021.0),
    (4, 0, -1, 1, 833.0),
];

/// Analytic ephemeris provider, see the module documentation for the models used.
///
/// The frame provider is used only to rotate states into frames other than J2000.
#[derive(Debug, Clone, Default)]
pub struct LowPrecisionEphemeris<F = EarthModelFrames> {
    frames: F,
}

impl LowPrecisionEphemeris {
    pub fn new() -> Self {
        LowPrecisionEphemeris {
            frames: EarthModelFrames,
        }
    }
}

impl<F: FrameProvider> LowPrecisionEphemeris<F> {
    pub fn with_frames(frames: F) -> Self {
        LowPrecisionEphemeris { frames }
    }

    /// Barycentric J2000 position of `body`, in km.
    pub fn barycentric_position(
        &self,
        body: Body,
        et: Second,
    ) -> Result<Vector3<f64>, GeoFinderError> {
        let t = et_to_centuries(et);
        if !(COVERAGE.0..=COVERAGE.1).contains(&t) {
            return Err(GeoFinderError::EphemerisOutOfRange(et));
        }

        let sun = sun_offset(t)?;
        let heliocentric = |elements: &MeanElements| heliocentric_position(elements, t);

        let position = match body {
            Body::SolarSystemBarycenter => Vector3::zeros(),
            Body::Sun => sun,
            Body::MercuryBarycenter => sun + heliocentric(&MERCURY)?,
            Body::VenusBarycenter => sun + heliocentric(&VENUS)?,
            Body::EarthMoonBarycenter => sun + heliocentric(&EARTH_MOON)?,
            Body::MarsBarycenter => sun + heliocentric(&MARS)?,
            Body::JupiterBarycenter => sun + heliocentric(&JUPITER)?,
            Body::SaturnBarycenter => sun + heliocentric(&SATURN)?,
            Body::UranusBarycenter => sun + heliocentric(&URANUS)?,
            Body::NeptuneBarycenter => sun + heliocentric(&NEPTUNE)?,
            Body::Earth => {
                sun + heliocentric(&EARTH_MOON)? - geocentric_moon(et) / (1.0 + EMRAT)
            }
            Body::Moon => {
                sun + heliocentric(&EARTH_MOON)? + geocentric_moon(et) * (EMRAT / (1.0 + EMRAT))
            }
        };
        Ok(position)
    }
}

impl<F: FrameProvider> EphemerisProvider for LowPrecisionEphemeris<F> {
    fn barycentric_state(&self, body: Body, et: Second) -> Result<Vector6<f64>, GeoFinderError> {
        let position = self.barycentric_position(body, et)?;
        let before = self.barycentric_position(body, et - VELOCITY_STEP)?;
        let after = self.barycentric_position(body, et + VELOCITY_STEP)?;
        let velocity = (after - before) / (2.0 * VELOCITY_STEP);
        Ok(Vector6::new(
            position.x, position.y, position.z, velocity.x, velocity.y, velocity.z,
        ))
    }

    fn frame_provider(&self) -> &dyn FrameProvider {
        &self.frames
    }
}

/// Solve Kepler's equation `E - e sin E = M` for the eccentric anomaly.
fn eccentric_anomaly(mean_anomaly: Radian, e: f64) -> Result<Radian, GeoFinderError> {
    let m = (mean_anomaly + PI).rem_euclid(2.0 * PI) - PI;
    let f = |ecc: f64| ecc - e * ecc.sin() - m;
    let df = |ecc: f64| 1.0 - e * ecc.cos();

    let mut convergency = SimpleConvergency {
        eps: 1e-14,
        max_iter: 30,
    };
    find_root_newton_raphson(m + e * m.sin(), &f, &df, &mut convergency)
        .map_err(|err| GeoFinderError::KeplerSolve(err.to_string()))
}

/// Heliocentric position in the J2000 equator, in km, `t` in Julian centuries from J2000.
fn heliocentric_position(elements: &MeanElements, t: f64) -> Result<Vector3<f64>, GeoFinderError> {
    let at = |coeffs: [f64; 2]| coeffs[0] + coeffs[1] * t;

    let a = at(elements.a) * AU;
    let e = at(elements.e);
    let incl = at(elements.incl) * RADEG;
    let long_peri = at(elements.long_peri) * RADEG;
    let node = at(elements.long_node) * RADEG;
    let mean_anomaly = at(elements.mean_longitude) * RADEG - long_peri;

    let ecc = eccentric_anomaly(mean_anomaly, e)?;
    let orbital = Vector3::new(
        a * (ecc.cos() - e),
        a * (1.0 - e * e).sqrt() * ecc.sin(),
        0.0,
    );

    let to_ecliptic = axis_rotation(node, Axis::Z)
        * axis_rotation(incl, Axis::X)
        * axis_rotation(long_peri - node, Axis::Z);
    Ok(axis_rotation(obliquity(T2000), Axis::X) * to_ecliptic * orbital)
}

/// Position of the Sun relative to the solar system barycenter.
fn sun_offset(t: f64) -> Result<Vector3<f64>, GeoFinderError> {
    let mut weighted = Vector3::zeros();
    let mut total = 1.0;
    for planet in PLANETS.iter() {
        weighted += heliocentric_position(planet, t)? / planet.mass_ratio;
        total += 1.0 / planet.mass_ratio;
    }
    Ok(-weighted / total)
}

/// Geocentric ecliptic longitude, latitude (mean equinox of date) and distance of the Moon.
pub(crate) fn moon_ecliptic_of_date(t: f64) -> (Radian, Radian, Kilometer) {
    let poly = |c: [f64; 5]| (((c[4] * t + c[3]) * t + c[2]) * t + c[1]) * t + c[0];

    let lp = poly([218.3164477, 481267.88123421, -0.0015786, 1.0 / 538841.0, -1.0 / 65194000.0]);
    let d = poly([297.8501921, 445267.1114034, -0.0018819, 1.0 / 545868.0, -1.0 / 113065000.0]);
    let m = poly([357.5291092, 35999.0502909, -0.0001536, 1.0 / 24490000.0, 0.0]);
    let mp = poly([134.9633964, 477198.8675055, 0.0087414, 1.0 / 69699.0, -1.0 / 14712000.0]);
    let f = poly([93.2720950, 483202.0175233, -0.0036539, -1.0 / 3526000.0, 1.0 / 863310000.0]);

    let a1 = 119.75 + 131.849 * t;
    let a2 = 53.09 + 479264.290 * t;
    let a3 = 313.45 + 481266.484 * t;
    let ecc = 1.0 - 0.002516 * t - 0.0000074 * t * t;

    let argument = |cd: i8, cm: i8, cmp: i8, cf: i8| {
        let angle = (cd as f64 * d + cm as f64 * m + cmp as f64 * mp + cf as f64 * f) * RADEG;
        (angle, ecc.powi(cm.unsigned_abs() as i32))
    };

    let (mut sum_l, mut sum_r) = (0.0, 0.0);
    for &(cd, cm, cmp, cf, l, r) in MOON_LR.iter() {
        let (angle, factor) = argument(cd, cm, cmp, cf);
        sum_l += factor * l * angle.sin();
        sum_r += factor * r * angle.cos();
    }

    let mut sum_b = 0.0;
    for &(cd, cm, cmp, cf, b) in MOON_B.iter() {
        let (angle, factor) = argument(cd, cm, cmp, cf);
        sum_b += factor * b * angle.sin();
    }

    let sin_deg = |x: f64| (x * RADEG).sin();
    sum_l += 3958.0 * sin_deg(a1) + 1962.0 * sin_deg(lp - f) + 318.0 * sin_deg(a2);
    sum_b += -2235.0 * sin_deg(lp)
        + 382.0 * sin_deg(a3)
        + 175.0 * sin_deg(a1 - f)
        + 175.0 * sin_deg(a1 + f)
        + 127.0 * sin_deg(lp - mp)
        - 115.0 * sin_deg(lp + mp);

    let longitude = ((lp + sum_l / 1e6) * RADEG).rem_euclid(2.0 * PI);
    let latitude = sum_b / 1e6 * RADEG;
    let distance = 385_000.56 + sum_r / 1000.0;
    (longitude, latitude, distance)
}

/// Geocentric J2000 position of the Moon, in km.
fn geocentric_moon(et: Second) -> Vector3<f64> {
    let (lon, lat, dist) = moon_ecliptic_of_date(et_to_centuries(et));
    let ecliptic = Vector3::new(
        dist * lat.cos() * lon.cos(),
        dist * lat.cos() * lon.sin(),
        dist * lat.sin(),
    );
    ecliptic_of_date_to_j2000(et_to_mjd_tdb(et)) * ecliptic
}

/// First and last epochs (ET) covered by the mean elements.
pub fn coverage() -> (Second, Second) {
    (
        COVERAGE.0 * SECONDS_PER_CENTURY,
        COVERAGE.1 * SECONDS_PER_CENTURY,
    )
}
