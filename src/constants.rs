//! # Constants and type definitions for geofinder
//!
//! This module centralizes the **physical constants**, **conversion factors**, and **common type
//! aliases** used throughout the crate.
//!
//! ## Overview
//!
//! - Time scale constants (J2000 epoch, day and century lengths)
//! - Unit conversions (degrees ↔ radians, arcseconds ↔ radians, AU ↔ km)
//! - Physical constants used by the light-time and low precision ephemeris models
//! - Core type aliases used across the crate

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Number of days in a Julian century
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Number of seconds in a Julian century
pub const SECONDS_PER_CENTURY: f64 = DAYS_PER_CENTURY * SECONDS_PER_DAY;

/// MJD epoch of J2000.0 (2000-01-01 12:00:00 TT)
pub const T2000: f64 = 51544.5;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Speed of light in km/s
pub const VLIGHT: f64 = 2.99792458e5;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Arcseconds → radians
pub const RADSEC: f64 = std::f64::consts::PI / 648000.0;

/// Earth/Moon mass ratio (DE430)
pub const EMRAT: f64 = 81.300_569_074_190_62;

/// Ratio of the sidereal day rate to the solar day rate
pub const SIDEREAL_RATE: f64 = 1.002_737_909_34;

/// Earth rotation rate in rad/s, derived from [`SIDEREAL_RATE`]
pub const EARTH_ROTATION_RATE: f64 = DPI * SIDEREAL_RATE / SECONDS_PER_DAY;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Seconds on a uniform time scale; ephemeris time (TDB seconds past J2000) when used as an epoch
pub type Second = f64;

/// Distance in kilometers
pub type Kilometer = f64;

/// Angle in radians
pub type Radian = f64;

/// Modified Julian Date (days)
pub type MJD = f64;
