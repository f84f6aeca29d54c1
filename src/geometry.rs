//! # Geometric event finders
//!
//! Builders turning an [`EphemerisProvider`] query into a [`SignalFunction`](crate::signal::SignalFunction), and the
//! distance event search built on top of them.
//!
//! ```rust
//! use geofinder::ephemeris::{Aberration, Body, LowPrecisionEphemeris};
//! use geofinder::geometry::gf_distance;
//! use geofinder::predicate::Relation;
//! use geofinder::time::str_to_et;
//! use geofinder::windows::WindowSet;
//!
//! let eph = LowPrecisionEphemeris::new();
//! let confinement = WindowSet::from_bounds(
//!     str_to_et("2007-01-01").unwrap(),
//!     str_to_et("2007-04-01").unwrap(),
//! )
//! .unwrap();
//!
//! let apogees = gf_distance(
//!     &eph,
//!     Body::Moon,
//!     Aberration::None,
//!     Body::Earth,
//!     Relation::Greater,
//!     400_000.0,
//!     0.0,
//!     86_400.0,
//!     &confinement,
//! )
//! .unwrap();
//! assert!(apogees.cardinality() > 0);
//! ```
use log::debug;

use crate::{
    constants::{Kilometer, Second},
    ephemeris::{Aberration, Body, EphemerisProvider},
    frames::Frame,
    geofinder_errors::GeoFinderError,
    predicate::{Predicate, Relation},
    search::{EventSearch, SearchConfig},
    signal::Fallible,
    windows::WindowSet,
};

/// Convergence tolerance of [`gf_distance`], in seconds.
pub const DEFAULT_TOLERANCE: Second = 1e-6;

/// Observer to target distance (km) as a function of ephemeris time.
pub fn distance_signal<'a, E>(
    provider: &'a E,
    target: Body,
    correction: Aberration,
    observer: Body,
) -> Fallible<impl Fn(Second) -> Result<Kilometer, GeoFinderError> + 'a>
where
    E: EphemerisProvider + ?Sized,
{
    Fallible(move |et: Second| {
        let (position, _) = provider.position(target, et, Frame::J2000, correction, observer)?;
        Ok(position.norm())
    })
}

/// Find the sub-intervals of `confinement` where the observer to target distance satisfies
/// `relation` against `refval` (km), within `adjust` km.
///
/// The coarse scan uses `step` seconds and crossings are refined to
/// [`DEFAULT_TOLERANCE`]; `step` must be shorter than the shortest event of interest.
#[allow(clippy::too_many_arguments)]
pub fn gf_distance<E>(
    provider: &E,
    target: Body,
    correction: Aberration,
    observer: Body,
    relation: Relation,
    refval: Kilometer,
    adjust: Kilometer,
    step: Second,
    confinement: &WindowSet,
) -> Result<WindowSet, GeoFinderError>
where
    E: EphemerisProvider + ?Sized,
{
    let predicate = Predicate::new(relation, refval).with_adjustment(adjust)?;
    let config = SearchConfig::builder()
        .step(step)
        .tolerance(DEFAULT_TOLERANCE)
        .build()?;
    gf_distance_with(
        &EventSearch::new(config),
        provider,
        target,
        correction,
        observer,
        &predicate,
        confinement,
    )
}

/// Distance event search with a caller supplied engine (custom tolerance, cancellation).
pub fn gf_distance_with<E>(
    search: &EventSearch,
    provider: &E,
    target: Body,
    correction: Aberration,
    observer: Body,
    predicate: &Predicate,
    confinement: &WindowSet,
) -> Result<WindowSet, GeoFinderError>
where
    E: EphemerisProvider + ?Sized,
{
    debug!("distance search {observer} -> {target} ({correction}), condition {predicate}");
    let signal = distance_signal(provider, target, correction, observer);
    search.find_intervals(&signal, predicate, confinement)
}
