//! Windowed geometric event search: find the time intervals, inside a confinement window,
//! where a scalar function of time (typically a distance between two solar system bodies)
//! satisfies a relational condition.
pub mod constants;
pub mod ephemeris;
pub mod frames;
pub mod geofinder_errors;
pub mod geometry;
pub mod predicate;
pub mod refine;
pub mod search;
pub mod signal;
pub mod time;
pub mod windows;

pub use geofinder_errors::GeoFinderError;
pub use predicate::{Predicate, Relation};
pub use search::{find_intervals, CancelToken, EventSearch, SearchConfig};
pub use windows::{Interval, WindowSet};
