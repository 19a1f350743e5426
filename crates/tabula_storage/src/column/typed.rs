//! Generic typed column.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tabula_foundation::{Error, Result, RowBounds, RowId, RowRange, Value, ValueKind};
use tracing::trace;

use super::undefined::UndefinedMask;
use super::{Column, ColumnValue, Format, ValueOrder};
use crate::iter::{Direction, RowIterator, RowRemover, Stamped};
use crate::notify::{ChangeManager, ColumnEvent, Listener, ListenerId, ListenerList};

/// A resizable column of `T` values with an undefined bit per row.
pub struct TypedColumn<T: ColumnValue> {
    name: Arc<str>,
    values: Vec<T>,
    undefined: UndefinedMask,
    format: Option<Rc<dyn Format<T>>>,
    order: Option<Rc<dyn ValueOrder<T>>>,
    changes: ChangeManager,
    listeners: ListenerList<ColumnEvent>,
    /// Bumped when the row domain changes size.
    stamp: u64,
}

impl<T: ColumnValue> fmt::Debug for TypedColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedColumn")
            .field("name", &self.name)
            .field("kind", &T::KIND)
            .field("size", &self.values.len())
            .field("format", &self.format)
            .field("ordered", &self.order.is_some())
            .field("listeners", &self.listeners)
            .finish_non_exhaustive()
    }
}

impl<T: ColumnValue> TypedColumn<T> {
    /// Creates an empty column.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self::with_capacity(name, 0)
    }

    /// Creates an empty column with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(name: impl Into<Arc<str>>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            values: Vec::with_capacity(capacity),
            undefined: UndefinedMask::with_capacity(capacity),
            format: None,
            order: None,
            changes: ChangeManager::new(),
            listeners: ListenerList::new(),
            stamp: 0,
        }
    }

    /// Creates a column holding `values`, all defined.
    #[must_use]
    pub fn from_values(name: impl Into<Arc<str>>, values: impl IntoIterator<Item = T>) -> Self {
        let mut column = Self::new(name);
        column.values = values.into_iter().collect();
        let len = column.values.len();
        column.undefined.resize(len);
        column.undefined.fill(0, len, false);
        column
    }

    /// Attaches a format used by `format_value` and `parse_value`.
    #[must_use]
    pub fn with_format(mut self, format: impl Format<T> + 'static) -> Self {
        self.format = Some(Rc::new(format));
        self
    }

    /// Attaches an ordering used by `compare_rows`.
    #[must_use]
    pub fn with_order(mut self, order: impl ValueOrder<T> + 'static) -> Self {
        self.order = Some(Rc::new(order));
        self
    }

    fn check_row(&self, row: RowId) -> Result<()> {
        if row < self.values.len() {
            Ok(())
        } else {
            Err(Error::invalid_row(row, RowBounds::dense(self.values.len())))
        }
    }

    /// Value at `row`, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    pub fn get(&self, row: RowId) -> Result<Option<&T>> {
        self.check_row(row)?;
        Ok((!self.undefined.get(row)).then(|| &self.values[row]))
    }

    /// Value at `row`, or `T::default()` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    pub fn get_or_default(&self, row: RowId) -> Result<T> {
        Ok(self.get(row)?.cloned().unwrap_or_default())
    }

    /// Value at `row`, failing if it is undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`, or an undefined value
    /// error if the row is undefined.
    pub fn get_defined(&self, row: RowId) -> Result<&T> {
        self.get(row)?.ok_or_else(|| Error::undefined_value(row))
    }

    /// Stores `value` at an existing row and marks it defined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    pub fn set(&mut self, row: RowId, value: T) -> Result<()> {
        self.check_row(row)?;
        self.values[row] = value;
        self.mark_undefined(row, false);
        self.notify(RowRange::single(row));
        Ok(())
    }

    /// Stores `value`, growing the column to fit `row`.
    pub fn set_extend(&mut self, row: RowId, value: T) {
        if row >= self.values.len() {
            self.disable_notify();
            self.resize(row + 1);
            self.values[row] = value;
            self.mark_undefined(row, false);
            self.notify(RowRange::single(row));
            self.enable_notify();
        } else {
            self.values[row] = value;
            self.mark_undefined(row, false);
            self.notify(RowRange::single(row));
        }
    }

    /// Replaces the slot of an existing row without touching its undefined
    /// bit. Out-of-range rows are ignored.
    pub(crate) fn overwrite(&mut self, row: RowId, value: T) {
        if let Some(slot) = self.values.get_mut(row) {
            *slot = value;
            self.notify(RowRange::single(row));
        }
    }

    /// Appends a defined value and returns its row.
    pub fn push(&mut self, value: T) -> RowId {
        let row = self.values.len();
        self.set_extend(row, value);
        row
    }

    /// Stores `value` in every row, marking all rows defined.
    pub fn fill(&mut self, value: &T) {
        let len = self.values.len();
        if len == 0 {
            return;
        }
        self.values.fill(value.clone());
        if self.undefined.defined_count() != len {
            self.undefined.fill(0, len, false);
            self.stamp += 1;
        }
        self.notify(RowRange::new(0, len - 1));
    }

    /// Raw storage slots, including those of undefined rows.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of defined rows.
    #[must_use]
    pub fn defined_count(&self) -> usize {
        self.undefined.defined_count()
    }

    /// Orders two values with the column's ordering.
    #[must_use]
    pub fn compare_values(&self, a: &T, b: &T) -> Ordering {
        match &self.order {
            Some(order) => order.compare(a, b),
            None => a.natural_cmp(b),
        }
    }

    /// Smallest and largest defined values under the column's ordering.
    #[must_use]
    pub fn min_max(&self) -> Option<(T, T)> {
        let mut defined = (0..self.values.len())
            .filter(|&row| !self.undefined.get(row))
            .map(|row| &self.values[row]);
        let first = defined.next()?;
        let (min, max) = defined.fold((first, first), |(min, max), v| {
            let min = if self.compare_values(v, min) == Ordering::Less { v } else { min };
            let max = if self.compare_values(v, max) == Ordering::Greater { v } else { max };
            (min, max)
        });
        Some((min.clone(), max.clone()))
    }

    /// Flips the undefined bit of `row`. The defined rows are the column's
    /// iteration domain, so a flip moves the stamp.
    fn mark_undefined(&mut self, row: RowId, undefined: bool) -> bool {
        if self.undefined.get(row) == undefined {
            return false;
        }
        self.undefined.set(row, undefined);
        self.stamp += 1;
        true
    }

    fn resize(&mut self, size: usize) {
        let old = self.values.len();
        if size == old {
            return;
        }
        self.values.resize(size, T::default());
        self.undefined.resize(size);
        self.stamp += 1;
        self.notify(RowRange::new(old.min(size), old.max(size) - 1));
    }

    fn notify(&mut self, rows: RowRange) {
        if let Some(range) = self.changes.record(rows) {
            self.publish(range);
        }
    }

    fn publish(&self, rows: RowRange) {
        trace!(column = %self.name, %rows, "column changed");
        self.listeners.dispatch(&ColumnEvent {
            column: Arc::clone(&self.name),
            rows,
        });
    }

    fn format_one(&self, value: &T) -> String {
        match &self.format {
            Some(format) => format.format(value),
            None => value.format_default(),
        }
    }

    fn parse_one(&self, text: &str) -> Result<T> {
        match &self.format {
            Some(format) => format.parse(text),
            None => T::parse_default(text),
        }
    }

    fn defined_rows(&self) -> Vec<RowId> {
        self.undefined.defined_rows()
    }
}

impl<T: ColumnValue> Column for TypedColumn<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ValueKind {
        T::KIND
    }

    fn size(&self) -> usize {
        self.values.len()
    }

    fn set_size(&mut self, size: usize) {
        self.resize(size);
    }

    fn clear(&mut self) {
        let old = self.values.len();
        if old == 0 {
            return;
        }
        self.values.clear();
        self.undefined.clear();
        self.stamp += 1;
        self.notify(RowRange::new(0, old - 1));
    }

    fn is_value_undefined(&self, row: RowId) -> bool {
        self.undefined.get(row)
    }

    fn set_value_undefined(&mut self, row: RowId, undefined: bool) -> Result<()> {
        self.check_row(row)?;
        if self.mark_undefined(row, undefined) {
            self.notify(RowRange::single(row));
        }
        Ok(())
    }

    fn value(&self, row: RowId) -> Result<Option<Value>> {
        match self.get(row)? {
            None => Ok(None),
            Some(v) => v.to_value().map(Some).ok_or_else(|| {
                Error::invalid_argument(format!(
                    "column {} holds objects with no dynamic value",
                    self.name
                ))
            }),
        }
    }

    fn set_value(&mut self, row: RowId, value: &Value) -> Result<()> {
        let typed = T::from_value(value).ok_or_else(|| Error::type_mismatch(T::KIND, value.kind()))?;
        self.set_extend(row, typed);
        Ok(())
    }

    fn get_f64(&self, row: RowId) -> Result<Option<f64>> {
        if T::default().to_f64().is_none() {
            return Err(Error::type_mismatch(ValueKind::Double, T::KIND));
        }
        Ok(self.get(row)?.and_then(ColumnValue::to_f64))
    }

    fn format_value(&self, row: RowId) -> Result<Option<String>> {
        Ok(self.get(row)?.map(|v| self.format_one(v)))
    }

    fn parse_value(&mut self, row: RowId, text: &str) -> Result<()> {
        if T::KIND != ValueKind::Text && text.trim().is_empty() {
            if row >= self.values.len() {
                self.resize(row + 1);
            } else {
                self.set_value_undefined(row, true)?;
            }
            return Ok(());
        }
        let value = self.parse_one(text)?;
        self.set_extend(row, value);
        Ok(())
    }

    fn compare_rows(&self, a: RowId, b: RowId) -> Ordering {
        let va = self.get(a).ok().flatten();
        let vb = self.get(b).ok().flatten();
        match (va, vb) {
            (Some(x), Some(y)) => self.compare_values(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    fn iter(&self) -> RowIterator {
        RowIterator::listed(self.defined_rows(), Direction::Ascending).with_stamp(self.stamp)
    }

    fn iter_rev(&self) -> RowIterator {
        RowIterator::listed(self.defined_rows(), Direction::Descending).with_stamp(self.stamp)
    }

    fn disable_notify(&mut self) {
        self.changes.disable();
    }

    fn enable_notify(&mut self) {
        if let Some(range) = self.changes.enable() {
            self.publish(range);
        }
    }

    fn add_change_listener(&mut self, listener: &Rc<dyn Listener<ColumnEvent>>) -> ListenerId {
        self.listeners.add(listener)
    }

    fn remove_change_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn mod_count(&self) -> u64 {
        self.changes.mod_count()
    }

    fn forget_row(&mut self, row: RowId) {
        if row < self.values.len() {
            self.values[row] = T::default();
            self.mark_undefined(row, true);
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl<T: ColumnValue> Stamped for TypedColumn<T> {
    fn modification_stamp(&self) -> u64 {
        self.stamp
    }
}

impl<T: ColumnValue> RowRemover for TypedColumn<T> {
    /// Marks the row undefined; the row domain keeps its size.
    fn remove_row(&mut self, row: RowId) -> Result<()> {
        self.set_value_undefined(row, true)
    }
}
