//! Value kind descriptors for columns.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The kind of value a column stores.
///
/// Used to report type mismatches and to pick default formats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ValueKind {
    /// Boolean.
    Bool,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit floating point.
    Float,
    /// 64-bit floating point.
    Double,
    /// Shared string.
    Text,
    /// Closed numeric interval.
    Interval,
    /// Categorical code with a category dictionary.
    Category,
    /// Arbitrary object values (row handles, user data).
    Object,
}

impl ValueKind {
    /// Returns true for kinds with a meaningful `f64` projection.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Int | Self::Long | Self::Float | Self::Double | Self::Interval | Self::Category
        )
    }

    /// Returns true for integral kinds.
    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(self, Self::Int | Self::Long | Self::Category)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Long => "long",
            Self::Float => "float",
            Self::Double => "double",
            Self::Text => "text",
            Self::Interval => "interval",
            Self::Category => "category",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}
