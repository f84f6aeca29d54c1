//! Boundary refinement by bisection on the predicate state.
//!
//! Classical bisection narrows a sign-change bracket; here the "sign" is the truth value
//! of a [`Predicate`] applied to the signal. As long as the predicate changes state only
//! once inside the bracket, the refined time is within `tolerance` of the true boundary.
use crate::{
    constants::Second, geofinder_errors::GeoFinderError, predicate::Predicate,
    signal::SignalFunction,
};

/// Bisection driver for predicate-state crossings.
#[derive(Debug, Clone, Copy)]
pub struct RootRefiner {
    tolerance: Second,
}

impl RootRefiner {
    /// Fails with [`GeoFinderError::InvalidConfig`] if `tolerance` is not strictly positive.
    pub fn new(tolerance: Second) -> Result<Self, GeoFinderError> {
        if !(tolerance > 0.0) || !tolerance.is_finite() {
            return Err(GeoFinderError::InvalidConfig(format!(
                "refinement tolerance must be a positive finite duration, got {tolerance}"
            )));
        }
        Ok(RootRefiner { tolerance })
    }

    pub fn tolerance(&self) -> Second {
        self.tolerance
    }

    /// Locate the predicate-state change inside `[lo, hi]`.
    ///
    /// Both endpoints are evaluated first; [`GeoFinderError::NoBracket`] is returned when
    /// the predicate has the same state at both. The returned time is the midpoint of the
    /// final bracket, whose width is at most the tolerance.
    pub fn bisect<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        lo: Second,
        hi: Second,
    ) -> Result<Second, GeoFinderError>
    where
        S: SignalFunction + ?Sized,
    {
        if !(lo <= hi) {
            return Err(GeoFinderError::InvalidInterval { start: lo, end: hi });
        }
        let lo_state = predicate.holds(signal.evaluate(lo)?);
        let hi_state = predicate.holds(signal.evaluate(hi)?);
        if lo_state == hi_state {
            return Err(GeoFinderError::NoBracket { lo, hi });
        }
        self.bisect_known(signal, predicate, lo, hi, lo_state)
    }

    /// Same as [`RootRefiner::bisect`] when the state at `lo` is already known and the
    /// state at `hi` is known to differ, saving the two endpoint evaluations.
    pub(crate) fn bisect_known<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        mut lo: Second,
        mut hi: Second,
        lo_state: bool,
    ) -> Result<Second, GeoFinderError>
    where
        S: SignalFunction + ?Sized,
    {
        while hi - lo > self.tolerance {
            let mid = lo + 0.5 * (hi - lo);
            // bracket narrower than the float spacing, cannot shrink further
            if mid <= lo || mid >= hi {
                break;
            }
            if predicate.holds(signal.evaluate(mid)?) == lo_state {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok(lo + 0.5 * (hi - lo))
    }
}

/// Convenience wrapper: build a [`RootRefiner`] and run [`RootRefiner::bisect`].
pub fn bisect<S>(
    signal: &S,
    predicate: &Predicate,
    lo: Second,
    hi: Second,
    tolerance: Second,
) -> Result<Second, GeoFinderError>
where
    S: SignalFunction + ?Sized,
{
    RootRefiner::new(tolerance)?.bisect(signal, predicate, lo, hi)
}
