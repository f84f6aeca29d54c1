//! # Windowed event search
//!
//! This module answers the question: *for every instant of a confinement window, where
//! does `predicate(signal(t))` hold?* The answer is a [`WindowSet`] accurate to the
//! configured time tolerance.
//!
//! ## Algorithm
//!
//! Each interval (component) of the confinement window is handled independently:
//!
//! 1. The signal is sampled every [`SearchConfig::step`] seconds with a
//!    [`SampledSignal`]; the last sample is clipped to the end of the component.
//! 2. Each pair of consecutive samples whose predicate states differ brackets a crossing.
//! 3. The crossing is refined by bisection ([`RootRefiner`]) down to
//!    [`SearchConfig::tolerance`], reusing the two known sample states.
//! 4. Runs of samples where the predicate holds are closed by their refined crossings,
//!    or by the component edges when the predicate already holds there.
//! 5. The runs are merged into the result window.
//!
//! Exact equality conditions (`==` with no adjustment) are handled by locating the
//! crossings of the reference value and reporting them as degenerate intervals.
//!
//! ## Limitations
//!
//! The coarse grid is never refined adaptively: an event shorter than the step can fall
//! between two samples and go unnoticed. Choosing a step smaller than the shortest event
//! of interest is the caller's responsibility.
//!
//! ## Example
//!
//! ```rust
//! use geofinder::predicate::{Predicate, Relation};
//! use geofinder::search::{find_intervals, SearchConfig};
//! use geofinder::windows::WindowSet;
//!
//! let line = |t: f64| 10.0 - t;
//! let predicate = Predicate::new(Relation::Greater, 0.0);
//! let confinement = WindowSet::from_bounds(0.0, 20.0).unwrap();
//! let config = SearchConfig::new(1.0, 0.01).unwrap();
//!
//! let result = find_intervals(&line, &predicate, &confinement, &config).unwrap();
//! assert_eq!(result.cardinality(), 1);
//! assert!((result.at(0).unwrap().end() - 10.0).abs() < 0.01);
//! ```
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use hifitime::Duration;
use log::{debug, trace};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    constants::Second,
    geofinder_errors::GeoFinderError,
    predicate::Predicate,
    refine::RootRefiner,
    signal::{Sample, SampledSignal, SignalFunction},
    windows::{Interval, WindowSet},
};

/// Step and tolerance of an event search, in seconds.
///
/// Invariants checked by [`SearchConfig::validate`]: `step > 0`, `tolerance > 0` and
/// `tolerance < step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum gap between two coarse samples.
    pub step: Second,
    /// Width of the bracket at which boundary refinement stops.
    pub tolerance: Second,
    /// When `false`, an empty confinement window is an error instead of an empty result.
    #[serde(default = "default_allow_empty")]
    pub allow_empty_confinement: bool,
}

fn default_allow_empty() -> bool {
    true
}

impl SearchConfig {
    /// Build and validate a configuration.
    pub fn new(step: Second, tolerance: Second) -> Result<Self, GeoFinderError> {
        SearchConfig::builder()
            .step(step)
            .tolerance(tolerance)
            .build()
    }

    /// Same as [`SearchConfig::new`] with `hifitime` durations.
    pub fn from_durations(step: Duration, tolerance: Duration) -> Result<Self, GeoFinderError> {
        SearchConfig::new(step.to_seconds(), tolerance.to_seconds())
    }

    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::new()
    }

    /// Check the step/tolerance invariants.
    pub fn validate(&self) -> Result<(), GeoFinderError> {
        if !(self.step > 0.0) || !self.step.is_finite() {
            return Err(GeoFinderError::InvalidConfig(format!(
                "step must be > 0, got {}",
                self.step
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(GeoFinderError::InvalidConfig(format!(
                "tolerance must be > 0, got {}",
                self.tolerance
            )));
        }
        if self.tolerance >= self.step {
            return Err(GeoFinderError::InvalidConfig(format!(
                "tolerance ({}) must be smaller than step ({})",
                self.tolerance, self.step
            )));
        }
        Ok(())
    }
}

/// Builder for [`SearchConfig`], with validation.
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchConfigBuilder {
    /// Start from a one day step and a one second tolerance.
    pub fn new() -> Self {
        Self {
            config: SearchConfig {
                step: 86_400.0,
                tolerance: 1.0,
                allow_empty_confinement: true,
            },
        }
    }

    pub fn step(mut self, v: Second) -> Self {
        self.config.step = v;
        self
    }

    pub fn tolerance(mut self, v: Second) -> Self {
        self.config.tolerance = v;
        self
    }

    pub fn allow_empty_confinement(mut self, v: bool) -> Self {
        self.config.allow_empty_confinement = v;
        self
    }

    pub fn build(self) -> Result<SearchConfig, GeoFinderError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Shared flag used to abort a running search.
///
/// The search checks it once per coarse sample; a tripped token makes the search fail
/// with [`GeoFinderError::Cancelled`] without returning partial results.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Stateless event search engine.
#[derive(Debug, Clone)]
pub struct EventSearch {
    config: SearchConfig,
    cancel: Option<CancelToken>,
}

impl EventSearch {
    pub fn new(config: SearchConfig) -> Self {
        EventSearch {
            config,
            cancel: None,
        }
    }

    /// Attach a cancellation token checked once per coarse sample.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find every sub-interval of `confinement` where `predicate(signal(t))` holds.
    ///
    /// Errors
    /// ------
    /// * [`GeoFinderError::InvalidConfig`] if the configuration breaks its invariants.
    /// * [`GeoFinderError::EmptyConfinement`] if the window is empty and the configuration
    ///   disallows it.
    /// * [`GeoFinderError::Cancelled`] if the cancel token was tripped.
    /// * Any error raised by the signal itself.
    pub fn find_intervals<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        confinement: &WindowSet,
    ) -> Result<WindowSet, GeoFinderError>
    where
        S: SignalFunction + ?Sized,
    {
        if !self.precheck(confinement)? {
            return Ok(WindowSet::new());
        }
        let refiner = RootRefiner::new(self.config.tolerance)?;

        let mut result = WindowSet::new();
        for component in confinement {
            for interval in self.search_component(signal, predicate, *component, &refiner)? {
                result.merge_in_place(interval);
            }
        }

        debug!(
            "event search for {predicate} over {} components: {} intervals found",
            confinement.cardinality(),
            result.cardinality()
        );
        Ok(result)
    }

    /// Parallel variant of [`EventSearch::find_intervals`]: components are searched on the
    /// rayon thread pool and merged with [`WindowSet::union`].
    pub fn find_intervals_par<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        confinement: &WindowSet,
    ) -> Result<WindowSet, GeoFinderError>
    where
        S: SignalFunction + Sync + ?Sized,
    {
        if !self.precheck(confinement)? {
            return Ok(WindowSet::new());
        }
        let refiner = RootRefiner::new(self.config.tolerance)?;

        let partials = confinement
            .as_slice()
            .par_iter()
            .map(|component| {
                self.search_component(signal, predicate, *component, &refiner)
                    .map(WindowSet::from_intervals)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result = partials
            .iter()
            .fold(WindowSet::new(), |acc, partial| acc.union(partial));

        debug!(
            "parallel event search for {predicate} over {} components: {} intervals found",
            confinement.cardinality(),
            result.cardinality()
        );
        Ok(result)
    }

    /// Validate the configuration and the confinement. `Ok(false)` means there is nothing
    /// to search.
    fn precheck(&self, confinement: &WindowSet) -> Result<bool, GeoFinderError> {
        self.config.validate()?;
        if confinement.is_empty() {
            if self.config.allow_empty_confinement {
                return Ok(false);
            }
            return Err(GeoFinderError::EmptyConfinement);
        }
        Ok(true)
    }

    fn check_cancel(&self) -> Result<(), GeoFinderError> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(GeoFinderError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Scan one connected component and return its true-intervals in increasing order.
    fn search_component<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        component: Interval,
        refiner: &RootRefiner,
    ) -> Result<Vec<Interval>, GeoFinderError>
    where
        S: SignalFunction + ?Sized,
    {
        if predicate.is_point_condition() {
            return self.search_crossings(signal, predicate, component, refiner);
        }

        let mut found = Vec::new();
        let mut run_start: Option<Second> = None;
        let mut prev: Option<Sample> = None;

        for sample in SampledSignal::scan(signal, predicate, component, self.config.step)? {
            self.check_cancel()?;
            let sample = sample?;

            match prev {
                None => {
                    if sample.holds {
                        run_start = Some(component.start());
                    }
                }
                Some(p) if p.holds != sample.holds => {
                    let crossing =
                        refiner.bisect_known(signal, predicate, p.time, sample.time, p.holds)?;
                    trace!(
                        "crossing of {predicate} refined to {crossing} in [{}, {}]",
                        p.time,
                        sample.time
                    );
                    if sample.holds {
                        run_start = Some(crossing);
                    } else if let Some(start) = run_start.take() {
                        found.push(Interval::new(start, crossing)?);
                    }
                }
                Some(_) => {}
            }
            prev = Some(sample);
        }

        if let Some(start) = run_start {
            found.push(Interval::new(start, component.end())?);
        }

        debug!(
            "component {component}: {} intervals where {predicate}",
            found.len()
        );
        Ok(found)
    }

    /// Crossings of the reference value, reported as degenerate intervals.
    fn search_crossings<S>(
        &self,
        signal: &S,
        predicate: &Predicate,
        component: Interval,
        refiner: &RootRefiner,
    ) -> Result<Vec<Interval>, GeoFinderError>
    where
        S: SignalFunction + ?Sized,
    {
        let side = predicate.crossing_state();
        let mut found = Vec::new();
        let mut prev: Option<Sample> = None;

        for sample in SampledSignal::scan(signal, &side, component, self.config.step)? {
            self.check_cancel()?;
            let sample = sample?;

            if sample.value == predicate.reference() {
                found.push(Interval::new(sample.time, sample.time)?);
            } else if let Some(p) = prev.filter(|p| p.holds != sample.holds) {
                if p.value != predicate.reference() {
                    let crossing =
                        refiner.bisect_known(signal, &side, p.time, sample.time, p.holds)?;
                    trace!("{predicate} met at {crossing}");
                    found.push(Interval::new(crossing, crossing)?);
                }
            }
            prev = Some(sample);
        }

        Ok(found)
    }
}

/// Run an [`EventSearch`] with `config` and no cancellation.
pub fn find_intervals<S>(
    signal: &S,
    predicate: &Predicate,
    confinement: &WindowSet,
    config: &SearchConfig,
) -> Result<WindowSet, GeoFinderError>
where
    S: SignalFunction + ?Sized,
{
    EventSearch::new(config.clone()).find_intervals(signal, predicate, confinement)
}
