//! # Ephemeris access
//!
//! Positions of solar system bodies are supplied through the [`EphemerisProvider`] trait.
//! An implementation only has to provide **geometric barycentric states** in the J2000
//! frame; observer-relative states, light-time and stellar aberration corrections and the
//! final frame rotation are derived by the provided methods of the trait.
//!
//! ## Structure
//!
//! ```text
//! ephemeris
//! ├── Body / Aberration        (identifiers, parsed from SPICE-style strings)
//! ├── EphemerisProvider        (trait: barycentric_state → state / position)
//! ├── light_time               (LT, LT+S, CN, CN+S corrections)
//! └── low_precision            (LowPrecisionEphemeris: mean elements + lunar series)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use geofinder::ephemeris::{Aberration, Body, EphemerisProvider, LowPrecisionEphemeris};
//! use geofinder::frames::Frame;
//! use geofinder::time::str_to_et;
//!
//! let eph = LowPrecisionEphemeris::new();
//! let et = str_to_et("2007 JAN 15 00:00:00 TDB").unwrap();
//! let (pos, lt) = eph
//!     .position(Body::Moon, et, Frame::J2000, Aberration::None, Body::Earth)
//!     .unwrap();
//! assert!(pos.norm() > 350_000.0 && pos.norm() < 410_000.0);
//! assert!(lt > 1.1 && lt < 1.4);
//! ```
pub mod light_time;
pub mod low_precision;

use std::{fmt, str::FromStr};

use nalgebra::{Vector3, Vector6};

use crate::{
    constants::Second,
    frames::{transform_state, Frame, FrameProvider},
    geofinder_errors::GeoFinderError,
};

pub use low_precision::LowPrecisionEphemeris;

/// Bodies known to the crate, identified by their NAIF integer codes.
///
/// Planets with satellites are represented by their system barycenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    SolarSystemBarycenter,
    MercuryBarycenter,
    VenusBarycenter,
    EarthMoonBarycenter,
    MarsBarycenter,
    JupiterBarycenter,
    SaturnBarycenter,
    UranusBarycenter,
    NeptuneBarycenter,
    Sun,
    Moon,
    Earth,
}

impl Body {
    pub fn naif_id(&self) -> i32 {
        match self {
            Body::SolarSystemBarycenter => 0,
            Body::MercuryBarycenter => 1,
            Body::VenusBarycenter => 2,
            Body::EarthMoonBarycenter => 3,
            Body::MarsBarycenter => 4,
            Body::JupiterBarycenter => 5,
            Body::SaturnBarycenter => 6,
            Body::UranusBarycenter => 7,
            Body::NeptuneBarycenter => 8,
            Body::Sun => 10,
            Body::Moon => 301,
            Body::Earth => 399,
        }
    }

    pub fn from_naif_id(id: i32) -> Option<Body> {
        let body = match id {
            0 => Body::SolarSystemBarycenter,
            1 | 199 => Body::MercuryBarycenter,
            2 | 299 => Body::VenusBarycenter,
            3 => Body::EarthMoonBarycenter,
            4 | 499 => Body::MarsBarycenter,
            5 | 599 => Body::JupiterBarycenter,
            6 | 699 => Body::SaturnBarycenter,
            7 | 799 => Body::UranusBarycenter,
            8 | 899 => Body::NeptuneBarycenter,
            10 => Body::Sun,
            301 => Body::Moon,
            399 => Body::Earth,
            _ => return None,
        };
        Some(body)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Body::SolarSystemBarycenter => "SOLAR SYSTEM BARYCENTER",
            Body::MercuryBarycenter => "MERCURY BARYCENTER",
            Body::VenusBarycenter => "VENUS BARYCENTER",
            Body::EarthMoonBarycenter => "EARTH BARYCENTER",
            Body::MarsBarycenter => "MARS BARYCENTER",
            Body::JupiterBarycenter => "JUPITER BARYCENTER",
            Body::SaturnBarycenter => "SATURN BARYCENTER",
            Body::UranusBarycenter => "URANUS BARYCENTER",
            Body::NeptuneBarycenter => "NEPTUNE BARYCENTER",
            Body::Sun => "SUN",
            Body::Moon => "MOON",
            Body::Earth => "EARTH",
        }
    }
}

impl FromStr for Body {
    type Err = GeoFinderError;

    /// Accepts NAIF names (case and spacing insensitive) and NAIF integer codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || GeoFinderError::UnknownBody(s.to_string());
        let normalized = s
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace('_', " ")
            .to_ascii_uppercase();

        if let Ok(id) = normalized.parse::<i32>() {
            return Body::from_naif_id(id).ok_or_else(unknown);
        }

        let body = match normalized.as_str() {
            "SSB" | "SOLAR SYSTEM BARYCENTER" => Body::SolarSystemBarycenter,
            "MERCURY" | "MERCURY BARYCENTER" => Body::MercuryBarycenter,
            "VENUS" | "VENUS BARYCENTER" => Body::VenusBarycenter,
            "EMB" | "EARTH BARYCENTER" | "EARTH MOON BARYCENTER" | "EARTH-MOON BARYCENTER" => {
                Body::EarthMoonBarycenter
            }
            "MARS" | "MARS BARYCENTER" => Body::MarsBarycenter,
            "JUPITER" | "JUPITER BARYCENTER" => Body::JupiterBarycenter,
            "SATURN" | "SATURN BARYCENTER" => Body::SaturnBarycenter,
            "URANUS" | "URANUS BARYCENTER" => Body::UranusBarycenter,
            "NEPTUNE" | "NEPTUNE BARYCENTER" => Body::NeptuneBarycenter,
            "SUN" => Body::Sun,
            "MOON" => Body::Moon,
            "EARTH" => Body::Earth,
            _ => return Err(unknown()),
        };
        Ok(body)
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aberration corrections applied to observer-relative states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Aberration {
    /// Geometric state
    #[default]
    None,
    /// One-iteration light time
    Lt,
    /// One-iteration light time and stellar aberration
    LtS,
    /// Converged light time
    Cn,
    /// Converged light time and stellar aberration
    CnS,
}

impl Aberration {
    pub fn uses_light_time(&self) -> bool {
        !matches!(self, Aberration::None)
    }

    pub fn uses_stellar(&self) -> bool {
        matches!(self, Aberration::LtS | Aberration::CnS)
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Aberration::Cn | Aberration::CnS)
    }
}

impl FromStr for Aberration {
    type Err = GeoFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_ascii_uppercase().as_str() {
            "NONE" => Ok(Aberration::None),
            "LT" => Ok(Aberration::Lt),
            "LT+S" => Ok(Aberration::LtS),
            "CN" => Ok(Aberration::Cn),
            "CN+S" => Ok(Aberration::CnS),
            _ => Err(GeoFinderError::UnknownAberration(s.to_string())),
        }
    }
}

impl fmt::Display for Aberration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Aberration::None => "NONE",
            Aberration::Lt => "LT",
            Aberration::LtS => "LT+S",
            Aberration::Cn => "CN",
            Aberration::CnS => "CN+S",
        })
    }
}

/// Source of solar system body states.
pub trait EphemerisProvider {
    /// Geometric state `[x, y, z, vx, vy, vz]` (km, km/s) of `body` relative to the solar
    /// system barycenter, in the J2000 frame.
    fn barycentric_state(&self, body: Body, et: Second) -> Result<Vector6<f64>, GeoFinderError>;

    /// Orientation model used to express states in frames other than J2000.
    fn frame_provider(&self) -> &dyn FrameProvider;

    /// State of `target` relative to `observer` in `frame`, with the one-way light time.
    fn state(
        &self,
        target: Body,
        et: Second,
        frame: Frame,
        correction: Aberration,
        observer: Body,
    ) -> Result<(Vector6<f64>, Second), GeoFinderError> {
        let (inertial, lt) = light_time::corrected_state(self, target, et, correction, observer)?;
        if frame == Frame::J2000 {
            return Ok((inertial, lt));
        }
        let xform = self
            .frame_provider()
            .state_transform_matrix(Frame::J2000, frame, et);
        Ok((transform_state(&xform, &inertial), lt))
    }

    /// Position of `target` relative to `observer` in `frame`, with the one-way light time.
    fn position(
        &self,
        target: Body,
        et: Second,
        frame: Frame,
        correction: Aberration,
        observer: Body,
    ) -> Result<(Vector3<f64>, Second), GeoFinderError> {
        let (state, lt) = self.state(target, et, frame, correction, observer)?;
        Ok((Vector3::new(state[0], state[1], state[2]), lt))
    }
}
