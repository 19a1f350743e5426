//! Row identifiers, row ranges, and valid-row bounds.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Logical row identifier.
///
/// A row id is valid only while it is allocated in its owning domain
/// (a column, a table, or an id manager).
pub type RowId = usize;

/// An inclusive range of rows touched by a mutation.
///
/// Ranges are always normalized so that `first <= last`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RowRange {
    /// First row in the range.
    pub first: RowId,
    /// Last row in the range (inclusive).
    pub last: RowId,
}

impl RowRange {
    /// Creates a range covering `a..=b`, in whichever order they are given.
    #[must_use]
    pub const fn new(a: RowId, b: RowId) -> Self {
        if a <= b {
            Self { first: a, last: b }
        } else {
            Self { first: b, last: a }
        }
    }

    /// Creates a range covering a single row.
    #[must_use]
    pub const fn single(row: RowId) -> Self {
        Self {
            first: row,
            last: row,
        }
    }

    /// Returns the smallest range covering both `self` and `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    /// Returns true if `row` falls inside the range.
    #[must_use]
    pub const fn contains(self, row: RowId) -> bool {
        row >= self.first && row <= self.last
    }

    /// Returns true if the two ranges overlap or touch.
    #[must_use]
    pub const fn is_adjacent_or_overlapping(self, other: Self) -> bool {
        self.first <= other.last.saturating_add(1) && other.first <= self.last.saturating_add(1)
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn len(self) -> usize {
        self.last - self.first + 1
    }

    /// Ranges are never empty; provided for clippy symmetry with `len`.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        false
    }
}

impl fmt::Display for RowRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}..={}", self.first, self.last)
        }
    }
}

/// The rows currently accepted by a domain, reported in invalid-row errors.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RowBounds {
    /// The domain holds no rows at all.
    Empty,
    /// Rows `min..=max` (a dynamic domain may still contain holes).
    Inclusive {
        /// Lowest acceptable row.
        min: RowId,
        /// Highest acceptable row.
        max: RowId,
    },
}

impl RowBounds {
    /// Bounds of a dense domain holding `count` rows starting at zero.
    #[must_use]
    pub const fn dense(count: usize) -> Self {
        if count == 0 {
            Self::Empty
        } else {
            Self::Inclusive {
                min: 0,
                max: count - 1,
            }
        }
    }

    /// Bounds spanning `min..=max`, or empty when either end is missing.
    #[must_use]
    pub fn spanning(min: Option<RowId>, max: Option<RowId>) -> Self {
        match (min, max) {
            (Some(min), Some(max)) => Self::Inclusive { min, max },
            _ => Self::Empty,
        }
    }

    /// Returns true if `row` lies within the bounds.
    #[must_use]
    pub const fn contains(self, row: RowId) -> bool {
        match self {
            Self::Empty => false,
            Self::Inclusive { min, max } => row >= min && row <= max,
        }
    }
}

impl fmt::Display for RowBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Inclusive { min, max } => write!(f, "{min}..={max}"),
        }
    }
}
