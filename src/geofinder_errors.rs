use thiserror::Error;

use crate::constants::Second;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoFinderError {
    #[error("Invalid interval [{start}, {end}]: bounds must be finite with start <= end")]
    InvalidInterval { start: Second, end: Second },

    #[error("Interval index {index} out of range for a window of {cardinality} intervals")]
    IndexOutOfRange { index: usize, cardinality: usize },

    #[error("No predicate state change between {lo} and {hi}")]
    NoBracket { lo: Second, hi: Second },

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Confinement window is empty")]
    EmptyConfinement,

    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Unknown body: {0}")]
    UnknownBody(String),

    #[error("Unknown reference frame: {0}")]
    UnknownFrame(String),

    #[error("Unknown aberration correction: {0}")]
    UnknownAberration(String),

    #[error("Unknown relational operator: {0}")]
    UnknownRelation(String),

    #[error("Invalid predicate adjustment: {0}")]
    InvalidAdjustment(f64),

    #[error("Epoch {0} s past J2000 is outside the ephemeris coverage")]
    EphemerisOutOfRange(Second),

    #[error("Expected {expected} components, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Kepler equation did not converge: {0}")]
    KeplerSolve(String),

    #[error("Signal evaluation failed: {0}")]
    SignalEvaluation(String),
}
