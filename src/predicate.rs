//! Relational conditions applied to a scalar signal.
//!
//! A [`Predicate`] couples a [`Relation`] with a reference value and an optional
//! non-negative adjustment. The adjustment widens the accepted region:
//!
//! | relation | holds when |
//! |----------|------------|
//! | `<`  | `v <  ref + adj` |
//! | `<=` | `v <= ref + adj` |
//! | `>`  | `v >  ref - adj` |
//! | `>=` | `v >= ref - adj` |
//! | `==` | `abs(v - ref) <= adj` |
//! | `!=` | `abs(v - ref) >  adj` |
//!
//! With a zero adjustment `==` only holds on isolated instants; the event search
//! reports those as degenerate intervals (see [`Predicate::is_point_condition`]).
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geofinder_errors::GeoFinderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Equal,
    NotEqual,
}

impl Relation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Relation::Less => "<",
            Relation::LessEq => "<=",
            Relation::Greater => ">",
            Relation::GreaterEq => ">=",
            Relation::Equal => "==",
            Relation::NotEqual => "!=",
        }
    }
}

impl FromStr for Relation {
    type Err = GeoFinderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Relation::Less),
            "<=" => Ok(Relation::LessEq),
            ">" => Ok(Relation::Greater),
            ">=" => Ok(Relation::GreaterEq),
            "=" | "==" => Ok(Relation::Equal),
            "!=" | "<>" => Ok(Relation::NotEqual),
            other => Err(GeoFinderError::UnknownRelation(other.to_string())),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PredicateFields")]
pub struct Predicate {
    relation: Relation,
    reference: f64,
    #[serde(default)]
    adjustment: f64,
}

/// Unchecked serialized form of a [`Predicate`].
#[derive(Deserialize)]
struct PredicateFields {
    relation: Relation,
    reference: f64,
    #[serde(default)]
    adjustment: f64,
}

impl TryFrom<PredicateFields> for Predicate {
    type Error = GeoFinderError;

    fn try_from(value: PredicateFields) -> Result<Self, Self::Error> {
        Predicate::new(value.relation, value.reference).with_adjustment(value.adjustment)
    }
}

impl Predicate {
    pub fn new(relation: Relation, reference: f64) -> Self {
        Predicate {
            relation,
            reference,
            adjustment: 0.0,
        }
    }

    /// Widen the predicate by `adjustment`; it must be finite and non-negative.
    pub fn with_adjustment(self, adjustment: f64) -> Result<Self, GeoFinderError> {
        if !adjustment.is_finite() || adjustment < 0.0 {
            return Err(GeoFinderError::InvalidAdjustment(adjustment));
        }
        Ok(Predicate { adjustment, ..self })
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    pub fn reference(&self) -> f64 {
        self.reference
    }

    pub fn adjustment(&self) -> f64 {
        self.adjustment
    }

    /// Evaluate the predicate on a signal value. NaN never satisfies a predicate.
    pub fn holds(&self, value: f64) -> bool {
        let (r, adj) = (self.reference, self.adjustment);
        match self.relation {
            Relation::Less => value < r + adj,
            Relation::LessEq => value <= r + adj,
            Relation::Greater => value > r - adj,
            Relation::GreaterEq => value >= r - adj,
            Relation::Equal => (value - r).abs() <= adj,
            Relation::NotEqual => (value - r).abs() > adj,
        }
    }

    /// `true` for an exact equality, which can only hold at isolated instants.
    pub fn is_point_condition(&self) -> bool {
        self.relation == Relation::Equal && self.adjustment == 0.0
    }

    /// State used to locate the crossings of the reference value for point conditions.
    pub(crate) fn crossing_state(&self) -> Predicate {
        Predicate::new(Relation::GreaterEq, self.reference)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.adjustment > 0.0 {
            write!(
                f,
                "{} {} (adjustment {})",
                self.relation, self.reference, self.adjustment
            )
        } else {
            write!(f, "{} {}", self.relation, self.reference)
        }
    }
}
