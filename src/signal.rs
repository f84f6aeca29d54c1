//! # Scalar signals and coarse sampling
//!
//! The event search works on any scalar function of time implementing
//! [`SignalFunction`]. Plain closures `Fn(Second) -> f64` implement it directly; closures
//! that can fail (typically because they query an ephemeris) are wrapped in
//! [`Fallible`].
//!
//! [`SampledSignal`] walks a domain at a fixed step and yields [`Sample`]s carrying the
//! signal value and the predicate state. The last sample is always clipped to the end of
//! the domain, so the final step may be shorter than the others.
//!
//! ```rust
//! use geofinder::predicate::{Predicate, Relation};
//! use geofinder::signal::SampledSignal;
//! use geofinder::windows::Interval;
//!
//! let signal = |t: f64| 10.0 - t;
//! let predicate = Predicate::new(Relation::Greater, 0.0);
//! let domain = Interval::new(0.0, 2.5).unwrap();
//!
//! let times: Vec<f64> = SampledSignal::scan(&signal, &predicate, domain, 1.0)
//!     .unwrap()
//!     .map(|s| s.unwrap().time)
//!     .collect();
//! assert_eq!(times, vec![0.0, 1.0, 2.0, 2.5]);
//! ```
use crate::{
    constants::Second, geofinder_errors::GeoFinderError, predicate::Predicate,
    windows::Interval,
};

/// A pure scalar function of time.
///
/// Implementations must be free of hidden state: two evaluations at the same instant
/// return the same value. Evaluation may be expensive.
pub trait SignalFunction {
    fn evaluate(&self, t: Second) -> Result<f64, GeoFinderError>;
}

impl<F> SignalFunction for F
where
    F: Fn(Second) -> f64,
{
    fn evaluate(&self, t: Second) -> Result<f64, GeoFinderError> {
        Ok(self(t))
    }
}

/// Adapter for closures returning `Result<f64, GeoFinderError>`.
pub struct Fallible<F>(pub F);

impl<F> SignalFunction for Fallible<F>
where
    F: Fn(Second) -> Result<f64, GeoFinderError>,
{
    fn evaluate(&self, t: Second) -> Result<f64, GeoFinderError> {
        (self.0)(t)
    }
}

/// One evaluated point of a scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: Second,
    pub value: f64,
    pub holds: bool,
}

/// Lazy fixed-step scan of a signal over a closed domain.
///
/// The iterator is finite and can be rewound with [`SampledSignal::restart`]. Sample
/// times are computed as `start + k * step` to avoid drift from repeated additions.
pub struct SampledSignal<'a, S: ?Sized> {
    signal: &'a S,
    predicate: &'a Predicate,
    domain: Interval,
    step: Second,
    index: u64,
    done: bool,
}

impl<'a, S> SampledSignal<'a, S>
where
    S: SignalFunction + ?Sized,
{
    /// Prepare a scan of `domain` with the given `step`.
    ///
    /// Fails with [`GeoFinderError::InvalidConfig`] if `step` is not strictly positive.
    pub fn scan(
        signal: &'a S,
        predicate: &'a Predicate,
        domain: Interval,
        step: Second,
    ) -> Result<Self, GeoFinderError> {
        if !(step > 0.0) || !step.is_finite() {
            return Err(GeoFinderError::InvalidConfig(format!(
                "sampling step must be a positive finite duration, got {step}"
            )));
        }
        Ok(SampledSignal {
            signal,
            predicate,
            domain,
            step,
            index: 0,
            done: false,
        })
    }

    /// Rewind the scan to the start of the domain.
    pub fn restart(&mut self) {
        self.index = 0;
        self.done = false;
    }

    /// Total number of samples of a full scan.
    pub fn sample_count(&self) -> u64 {
        let (start, end) = (self.domain.start(), self.domain.end());
        let before_end = |k: u64| start + k as f64 * self.step < end;

        // number of grid points strictly before the end, the clipped end sample comes on top
        let mut k = (self.domain.duration() / self.step).ceil() as u64;
        while before_end(k) {
            k += 1;
        }
        while k > 0 && !before_end(k - 1) {
            k -= 1;
        }
        k + 1
    }

    fn next_time(&mut self) -> Option<Second> {
        if self.done {
            return None;
        }
        let t = self.domain.start() + self.index as f64 * self.step;
        self.index += 1;
        if t >= self.domain.end() {
            self.done = true;
            Some(self.domain.end())
        } else {
            Some(t)
        }
    }
}

impl<S> Iterator for SampledSignal<'_, S>
where
    S: SignalFunction + ?Sized,
{
    type Item = Result<Sample, GeoFinderError>;

    fn next(&mut self) -> Option<Self::Item> {
        let time = self.next_time()?;
        Some(self.signal.evaluate(time).map(|value| Sample {
            time,
            value,
            holds: self.predicate.holds(value),
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = self.sample_count().saturating_sub(self.index) as usize;
        (remaining, Some(remaining))
    }
}
