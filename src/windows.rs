//! # Time windows and window algebra
//!
//! A [`WindowSet`] is an ordered collection of disjoint closed [`Interval`]s on the
//! ephemeris time axis. It is the currency of the event search: the caller confines a
//! search with one, and the search answers with another.
//!
//! ## Invariants
//!
//! Every `WindowSet` produced by this module satisfies:
//!
//! - intervals are sorted by `start`,
//! - no two intervals overlap or touch (`end_i < start_{i+1}`),
//! - every interval has `start <= end`.
//!
//! Degenerate intervals (`start == end`) are allowed; they mark isolated instants
//! (e.g. equality crossings) and contribute nothing to [`WindowSet::measure`].
//!
//! ## Value semantics
//!
//! Public operations never mutate their receiver: [`WindowSet::insert`],
//! [`WindowSet::union`], [`WindowSet::intersect`], [`WindowSet::complement`] and friends
//! all return a new set. Clone a set if you need to keep the previous value around.
//!
//! ## Example
//!
//! ```rust
//! use geofinder::windows::{Interval, WindowSet};
//!
//! let a = WindowSet::from_pairs([(0.0, 2.0), (5.0, 8.0)]).unwrap();
//! let b = WindowSet::from_bounds(1.0, 6.0).unwrap();
//!
//! let both = a.intersect(&b);
//! assert_eq!(both.as_slice(), &[Interval::new(1.0, 2.0).unwrap(), Interval::new(5.0, 6.0).unwrap()]);
//! assert_eq!(both.measure(), 2.0);
//! ```
use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{constants::Second, geofinder_errors::GeoFinderError};

/// Closed time interval `[start, end]`, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Interval {
    pub(crate) start: Second,
    pub(crate) end: Second,
}

impl Interval {
    /// Build an interval, rejecting `start > end` and non-finite bounds.
    pub fn new(start: Second, end: Second) -> Result<Self, GeoFinderError> {
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(GeoFinderError::InvalidInterval { start, end });
        }
        Ok(Interval { start, end })
    }

    pub fn start(&self) -> Second {
        self.start
    }

    pub fn end(&self) -> Second {
        self.end
    }

    /// Length `end - start`.
    pub fn duration(&self) -> Second {
        self.end - self.start
    }

    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, t: Second) -> bool {
        self.start <= t && t <= self.end
    }

    /// Overlap of two intervals, including a degenerate overlap when they only touch.
    pub fn overlap(&self, other: &Interval) -> Option<Interval> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start <= end).then_some(Interval { start, end })
    }
}

impl TryFrom<[f64; 2]> for Interval {
    type Error = GeoFinderError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Interval::new(value[0], value[1])
    }
}

impl From<Interval> for [f64; 2] {
    fn from(value: Interval) -> Self {
        [value.start, value.end]
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// Ordered set of disjoint, non-adjacent closed intervals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Interval>", into = "Vec<Interval>")]
pub struct WindowSet {
    intervals: Vec<Interval>,
}

impl WindowSet {
    /// An empty window.
    pub fn new() -> Self {
        WindowSet::default()
    }

    /// A window made of the single interval `[t0, t1]`.
    pub fn from_bounds(t0: Second, t1: Second) -> Result<Self, GeoFinderError> {
        Ok(WindowSet {
            intervals: vec![Interval::new(t0, t1)?],
        })
    }

    /// Build a normalized window from arbitrary, possibly unsorted or overlapping, intervals.
    pub fn from_intervals<I>(intervals: I) -> Self
    where
        I: IntoIterator<Item = Interval>,
    {
        let mut window = WindowSet::new();
        for interval in intervals
            .into_iter()
            .sorted_by(|a, b| a.start.total_cmp(&b.start))
        {
            window.merge_in_place(interval);
        }
        window
    }

    /// Build a normalized window from raw `(start, end)` pairs.
    ///
    /// Fails with [`GeoFinderError::InvalidInterval`] on the first pair with `start > end`.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, GeoFinderError>
    where
        I: IntoIterator<Item = (Second, Second)>,
    {
        let intervals = pairs
            .into_iter()
            .map(|(start, end)| Interval::new(start, end))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(WindowSet::from_intervals(intervals))
    }

    /// Return a new window with `[start, end]` added.
    ///
    /// Any stored interval that overlaps or touches the new one is merged with it.
    pub fn insert(&self, start: Second, end: Second) -> Result<WindowSet, GeoFinderError> {
        let interval = Interval::new(start, end)?;
        let mut window = self.clone();
        window.merge_in_place(interval);
        Ok(window)
    }

    /// In-place merge used by the builders of this crate; keeps every invariant.
    pub(crate) fn merge_in_place(&mut self, interval: Interval) {
        // first stored interval that reaches the new start, first one strictly past the new end
        let first = self.intervals.partition_point(|iv| iv.end < interval.start);
        let last = self.intervals.partition_point(|iv| iv.start <= interval.end);

        if first == last {
            self.intervals.insert(first, interval);
            return;
        }

        let merged = Interval {
            start: interval.start.min(self.intervals[first].start),
            end: interval.end.max(self.intervals[last - 1].end),
        };
        self.intervals.splice(first..last, std::iter::once(merged));
    }

    /// Intervals common to both windows, computed with a single two-pointer sweep.
    pub fn intersect(&self, other: &WindowSet) -> WindowSet {
        let mut out = Vec::with_capacity(self.intervals.len().max(other.intervals.len()));
        let (mut i, mut j) = (0, 0);

        while i < self.intervals.len() && j < other.intervals.len() {
            let a = &self.intervals[i];
            let b = &other.intervals[j];

            if let Some(overlap) = a.overlap(b) {
                out.push(overlap);
            }

            if a.end < b.end {
                i += 1;
            } else {
                j += 1;
            }
        }

        WindowSet { intervals: out }
    }

    /// Gaps between the stored intervals, clipped to `bound`.
    ///
    /// Parts of the window lying outside `bound` are ignored. Touching gaps produced by
    /// degenerate intervals are merged, so the result always satisfies the window invariants.
    pub fn complement(&self, bound: &Interval) -> WindowSet {
        let mut gaps = WindowSet::new();
        let mut cursor = bound.start;
        // whether some interval covers the instant `cursor`
        let mut covered = false;

        for interval in &self.intervals {
            if interval.end < bound.start {
                continue;
            }
            if interval.start > bound.end {
                break;
            }
            if interval.start > cursor {
                gaps.merge_in_place(Interval {
                    start: cursor,
                    end: interval.start,
                });
            }
            cursor = cursor.max(interval.end);
            covered = true;
        }

        if cursor < bound.end || (!covered && cursor == bound.end) {
            gaps.merge_in_place(Interval {
                start: cursor,
                end: bound.end,
            });
        }

        gaps
    }

    /// Every instant covered by either window.
    pub fn union(&self, other: &WindowSet) -> WindowSet {
        let mut window = self.clone();
        for interval in &other.intervals {
            window.merge_in_place(*interval);
        }
        window
    }

    /// Instants of `self` not covered by `other`.
    pub fn difference(&self, other: &WindowSet) -> WindowSet {
        match self.hull() {
            Some(hull) => self.intersect(&other.complement(&hull)),
            None => WindowSet::new(),
        }
    }

    /// Number of stored intervals.
    pub fn cardinality(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval at index `i`.
    pub fn at(&self, i: usize) -> Result<Interval, GeoFinderError> {
        self.intervals
            .get(i)
            .copied()
            .ok_or(GeoFinderError::IndexOutOfRange {
                index: i,
                cardinality: self.intervals.len(),
            })
    }

    /// Total covered duration, degenerate intervals contribute zero.
    pub fn measure(&self) -> Second {
        self.intervals.iter().map(Interval::duration).sum()
    }

    /// Smallest interval covering the whole window, `None` when empty.
    pub fn hull(&self) -> Option<Interval> {
        let first = self.intervals.first()?;
        let last = self.intervals.last()?;
        Some(Interval {
            start: first.start,
            end: last.end,
        })
    }

    /// `true` if `t` lies in one of the intervals.
    pub fn contains(&self, t: Second) -> bool {
        let idx = self.intervals.partition_point(|iv| iv.end < t);
        self.intervals.get(idx).is_some_and(|iv| iv.contains(t))
    }

    /// Merge every pair of consecutive intervals separated by a gap of at most `max_gap`.
    pub fn fill_gaps(&self, max_gap: Second) -> WindowSet {
        let mut out: Vec<Interval> = Vec::with_capacity(self.intervals.len());
        for interval in &self.intervals {
            match out.last_mut() {
                Some(prev) if interval.start - prev.end <= max_gap => prev.end = interval.end,
                _ => out.push(*interval),
            }
        }
        WindowSet { intervals: out }
    }

    /// Drop every interval whose duration is at most `min_len`.
    pub fn filter_short(&self, min_len: Second) -> WindowSet {
        WindowSet {
            intervals: self
                .intervals
                .iter()
                .filter(|iv| iv.duration() > min_len)
                .copied()
                .collect(),
        }
    }

    /// Move every left endpoint right by `left` and every right endpoint left by `right`.
    ///
    /// Intervals that would become inverted are removed.
    pub fn contract(&self, left: Second, right: Second) -> WindowSet {
        WindowSet {
            intervals: self
                .intervals
                .iter()
                .filter_map(|iv| Interval::new(iv.start + left, iv.end - right).ok())
                .collect(),
        }
    }

    /// Move every left endpoint left by `left` and every right endpoint right by `right`.
    ///
    /// Intervals that come to overlap are merged; intervals that would become inverted
    /// (negative expansion) are removed.
    pub fn expand(&self, left: Second, right: Second) -> WindowSet {
        WindowSet::from_intervals(
            self.intervals
                .iter()
                .filter_map(|iv| Interval::new(iv.start - left, iv.end + right).ok()),
        )
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interval> {
        self.intervals.iter()
    }

    pub fn as_slice(&self) -> &[Interval] {
        &self.intervals
    }

    /// Check the window invariants; used by tests and debug assertions.
    pub fn is_normalized(&self) -> bool {
        self.intervals.iter().all(|iv| iv.start <= iv.end)
            && self
                .intervals
                .iter()
                .tuple_windows()
                .all(|(a, b)| a.end < b.start)
    }
}

impl TryFrom<Vec<Interval>> for WindowSet {
    type Error = GeoFinderError;

    fn try_from(value: Vec<Interval>) -> Result<Self, Self::Error> {
        Ok(WindowSet::from_intervals(value))
    }
}

impl From<WindowSet> for Vec<Interval> {
    fn from(value: WindowSet) -> Self {
        value.intervals
    }
}

impl<'a> IntoIterator for &'a WindowSet {
    type Item = &'a Interval;
    type IntoIter = std::slice::Iter<'a, Interval>;

    fn into_iter(self) -> Self::IntoIter {
        self.intervals.iter()
    }
}

impl fmt::Display for WindowSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.intervals.iter().join(", "))
    }
}
