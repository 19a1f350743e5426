//! Semantic orderings for column values.

use std::cmp::Ordering;
use std::sync::Arc;

use super::ColumnValue;

/// Compares two values of a column.
///
/// Implemented for any `Fn(&T, &T) -> Ordering` closure.
pub trait ValueOrder<T> {
    /// Orders `a` relative to `b`.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

impl<T, F> ValueOrder<T> for F
where
    F: Fn(&T, &T) -> Ordering,
{
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self(a, b)
    }
}

/// The value kind's natural order.
#[derive(Copy, Clone, Debug, Default)]
pub struct NaturalOrder;

impl<T: ColumnValue> ValueOrder<T> for NaturalOrder {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        a.natural_cmp(b)
    }
}

/// Reverses another order.
#[derive(Copy, Clone, Debug, Default)]
pub struct Reversed<O>(pub O);

impl<T, O: ValueOrder<T>> ValueOrder<T> for Reversed<O> {
    fn compare(&self, a: &T, b: &T) -> Ordering {
        self.0.compare(a, b).reverse()
    }
}

/// Orders strings ignoring case.
#[derive(Copy, Clone, Debug, Default)]
pub struct CaseInsensitive;

impl ValueOrder<Arc<str>> for CaseInsensitive {
    fn compare(&self, a: &Arc<str>, b: &Arc<str>) -> Ordering {
        a.chars()
            .flat_map(char::to_lowercase)
            .cmp(b.chars().flat_map(char::to_lowercase))
    }
}
