//! Named table attributes.

use std::sync::Arc;

use im::OrdMap;
use tabula_foundation::Value;

/// Name to value map attached to a table, kept in name order.
///
/// Tables carry two of these: metadata describing the data, and client
/// properties owned by whoever displays or processes the table. Both are
/// emptied by [`Table::clear`](crate::table::Table::clear).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attributes {
    entries: OrdMap<Arc<str>, Value>,
}

impl Attributes {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    /// Stores `value` under `name`, returning the previous value.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(Arc::from(name), value.into())
    }

    /// Removes and returns the value stored under `name`.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.entries.remove(name)
    }

    /// Returns true if `name` has a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|name| &**name)
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every attribute.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
