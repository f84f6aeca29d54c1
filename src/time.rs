//! # Time axis
//!
//! All searches run on **ephemeris time** (ET): TDB seconds elapsed since the J2000 epoch
//! (2000-01-01 12:00:00 TDB). This module converts calendar strings to ET and back, using
//! [hifitime](https://docs.rs/hifitime) for the leap-second aware time scale arithmetic.
//!
//! ## Accepted calendar formats
//!
//! - ISO 8601: `2007-01-01`, `2013-01-01T12:00:00`, `2013-01-01 12:00:00.250 TDB`
//! - Month abbreviations: `2007 JAN 01 00:00:00 TDB`, `2007-APR-01`
//! - US civil dates with an AM/PM clock and a zone: `July 4, 2003 11:00 AM PST`
//! - Anything else understood by [`hifitime::Epoch`]'s `FromStr` implementation
//!
//! Strings without an explicit time scale are read as UTC.
use std::{str::FromStr, sync::LazyLock};

use hifitime::{Duration, Epoch, TimeScale, Unit};
use regex::Regex;

use crate::{
    constants::{Second, DAYS_PER_CENTURY, DPI, MJD, SECONDS_PER_DAY, SIDEREAL_RATE, T2000},
    geofinder_errors::GeoFinderError,
};

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*
        (?P<year>\d{4})[-\s/]+(?P<month>\d{1,2}|[a-z]{3,9})[-\s/]+(?P<day>\d{1,2})
        (?:[T\s]+(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}(?:\.\d+)?))?)?
        (?:\s*(?:\((?P<scale_p>[a-z]+)\)|(?P<scale>[a-z]+)))?
        \s*$",
    )
    .expect("static regex")
});

static CIVIL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^\s*
        (?P<month>[a-z]{3,9})\.?\s+(?P<day>\d{1,2}),?\s+(?P<year>\d{4})
        (?:\s+(?P<hour>\d{1,2}):(?P<minute>\d{2})(?::(?P<second>\d{2}(?:\.\d+)?))?
            (?:\s*(?P<meridiem>am|pm))?)?
        (?:\s+(?P<zone>[a-z]{2,4}))?
        \s*$",
    )
    .expect("static regex")
});

/// Convert a calendar string to ephemeris time (TDB seconds past J2000).
///
/// Errors
/// ------
/// * [`GeoFinderError::MalformedTimestamp`] when the string matches none of the accepted
///   formats or describes an invalid calendar date.
pub fn str_to_et(input: &str) -> Result<Second, GeoFinderError> {
    Ok(epoch_to_et(parse_epoch(input)?))
}

/// Parse a calendar string into a [`hifitime::Epoch`].
pub fn parse_epoch(input: &str) -> Result<Epoch, GeoFinderError> {
    let malformed = |reason: &str| GeoFinderError::MalformedTimestamp(format!("{input}: {reason}"));

    if let Some(caps) = NUMERIC_DATE.captures(input) {
        let scale = match caps.name("scale").or_else(|| caps.name("scale_p")) {
            Some(s) => parse_time_scale(s.as_str()).ok_or_else(|| malformed("unknown time scale"))?,
            None => TimeScale::UTC,
        };
        let fields = CalendarFields::from_captures(&caps).ok_or_else(|| malformed("bad field"))?;
        return fields.to_epoch(scale).map_err(|e| malformed(&e));
    }

    if let Some(caps) = CIVIL_DATE.captures(input) {
        let mut fields =
            CalendarFields::from_captures(&caps).ok_or_else(|| malformed("bad field"))?;
        if let Some(meridiem) = caps.name("meridiem") {
            if fields.hour == 0 || fields.hour > 12 {
                return Err(malformed("hour out of range for a 12-hour clock"));
            }
            let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
            fields.hour = match (fields.hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (h, true) => h + 12,
                (h, false) => h,
            };
        }

        let (scale, utc_offset_hours) = match caps.name("zone") {
            Some(zone) => zone_offset(zone.as_str())
                .or_else(|| parse_time_scale(zone.as_str()).map(|s| (s, 0.0)))
                .ok_or_else(|| malformed("unknown zone"))?,
            None => (TimeScale::UTC, 0.0),
        };
        let local = fields.to_epoch(scale).map_err(|e| malformed(&e))?;
        return Ok(local - Duration::from_seconds(utc_offset_hours * 3600.0));
    }

    Epoch::from_str(input.trim()).map_err(|e| malformed(&e.to_string()))
}

/// Ephemeris time of an epoch.
pub fn epoch_to_et(epoch: Epoch) -> Second {
    epoch.to_tdb_seconds()
}

/// Epoch in the TDB time scale for an ephemeris time.
pub fn et_to_epoch(et: Second) -> Epoch {
    Epoch::from_tdb_seconds(et)
}

/// Render an ephemeris time as a TDB calendar string rounded to the millisecond,
/// e.g. `2007-01-01T00:00:00 TDB`.
pub fn et_to_string(et: Second) -> String {
    format!("{}", et_to_epoch(et).round(Unit::Millisecond * 1))
}

/// Modified Julian Date in the TDB scale (used as TT for the low precision models).
pub fn et_to_mjd_tdb(et: Second) -> MJD {
    T2000 + et / SECONDS_PER_DAY
}

/// Modified Julian Date in the UTC scale.
pub fn et_to_mjd_utc(et: Second) -> MJD {
    et_to_epoch(et).to_mjd_utc_days()
}

/// Julian centuries of TDB elapsed since J2000.
pub fn et_to_centuries(et: Second) -> f64 {
    et / (DAYS_PER_CENTURY * SECONDS_PER_DAY)
}

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// This function implements the IAU 1982 polynomial formula for the mean sidereal time at
/// 0h UT1, plus the fractional-day correction term due to Earth's rotation rate.
///
/// # Arguments
/// * `tjm` - Modified Julian Date (MJD, UT1 time scale; UTC is an acceptable stand-in
///   at the low precision this crate targets)
///
/// # Returns
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> f64 {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / DAYS_PER_CENTURY;

    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / SECONDS_PER_DAY;

    // fraction of the solar day, scaled to sidereal rotation
    let h = tjm.fract() * DPI;
    (gmst0 + h * SIDEREAL_RATE).rem_euclid(DPI)
}

/// Map a SPICE-style time scale label to a [`TimeScale`].
fn parse_time_scale(label: &str) -> Option<TimeScale> {
    match label.to_ascii_uppercase().as_str() {
        "UTC" | "UT" | "Z" | "GMT" => Some(TimeScale::UTC),
        "TDB" | "ET" => Some(TimeScale::TDB),
        "TT" | "TDT" => Some(TimeScale::TT),
        "TAI" => Some(TimeScale::TAI),
        "GPST" | "GPS" => Some(TimeScale::GPST),
        _ => None,
    }
}

/// North American civil zones accepted in calendar strings, as (scale, hours east of UTC).
fn zone_offset(label: &str) -> Option<(TimeScale, f64)> {
    let hours = match label.to_ascii_uppercase().as_str() {
        "EST" => -5.0,
        "EDT" => -4.0,
        "CST" => -6.0,
        "CDT" => -5.0,
        "MST" => -7.0,
        "MDT" => -6.0,
        "PST" => -8.0,
        "PDT" => -7.0,
        _ => return None,
    };
    Some((TimeScale::UTC, hours))
}

fn parse_month(label: &str) -> Option<u8> {
    if let Ok(m) = label.parse::<u8>() {
        return (1..=12).contains(&m).then_some(m);
    }
    const MONTHS: [&str; 12] = [
        "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
    ];
    let upper = label.to_ascii_uppercase();
    let prefix = upper.get(..3)?;
    MONTHS
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u8 + 1)
}

struct CalendarFields {
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: f64,
}

impl CalendarFields {
    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let number = |name: &str| caps.name(name).map(|m| m.as_str());
        Some(CalendarFields {
            year: number("year")?.parse().ok()?,
            month: parse_month(number("month")?)?,
            day: number("day")?.parse().ok()?,
            hour: number("hour").map_or(Some(0), |h| h.parse().ok())?,
            minute: number("minute").map_or(Some(0), |m| m.parse().ok())?,
            second: number("second").map_or(Some(0.0), |s| s.parse().ok())?,
        })
    }

    fn to_epoch(&self, scale: TimeScale) -> Result<Epoch, String> {
        if self.hour > 23 || self.minute > 59 || self.second >= 61.0 {
            return Err("clock field out of range".into());
        }
        let whole = self.second.trunc();
        let nanos = ((self.second - whole) * 1e9).round() as u32;
        Epoch::maybe_from_gregorian(
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            whole as u8,
            nanos.min(999_999_999),
            scale,
        )
        .map_err(|e| e.to_string())
    }
}
