//! Closed numeric intervals.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::kind::ValueKind;

/// A closed interval `[min, max]` over `f64`.
///
/// Interval columns order values by [`Interval::center`], so two intervals
/// with the same center compare equal even if their widths differ.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl Interval {
    /// Creates an interval, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Creates a degenerate interval holding a single point.
    #[must_use]
    pub const fn point(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// Midpoint of the interval.
    #[must_use]
    pub fn center(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Distance between the bounds.
    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    /// Returns true if `v` lies inside the interval.
    #[must_use]
    pub fn contains(self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }

    /// Smallest interval covering both.
    #[must_use]
    pub fn hull(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl FromStr for Interval {
    type Err = Error;

    /// Parses `[min, max]`, with or without the brackets.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fail = |message: &str| Error::parse(s, ValueKind::Interval, message);
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);
        let (lo, hi) = inner
            .split_once(',')
            .ok_or_else(|| fail("expected `min, max`"))?;
        let lo: f64 = lo.trim().parse().map_err(|_| fail("bad lower bound"))?;
        let hi: f64 = hi.trim().parse().map_err(|_| fail("bad upper bound"))?;
        Ok(Self::new(lo, hi))
    }
}
