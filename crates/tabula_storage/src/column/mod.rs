//! Typed, resizable columns with per-row undefined tracking.
//!
//! [`TypedColumn<T>`] implements storage, undefined bits, formats, orderings
//! and change notification once; each value kind plugs in through
//! [`ColumnValue`]. Tables hold columns as `Box<dyn Column>` and recover the
//! concrete type with [`Table::column_as`](crate::table::Table::column_as).

mod categorical;
mod format;
mod order;
mod typed;
mod undefined;

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use tabula_foundation::{Error, Interval, Result, RowId, Value, ValueKind};

use crate::iter::RowIterator;
use crate::notify::{ColumnEvent, Listener, ListenerId};

pub use categorical::{CategoricalColumn, CategoryDictionary};
pub use format::{DecimalFormat, DefaultFormat, Format};
pub use order::{CaseInsensitive, NaturalOrder, Reversed, ValueOrder};
pub use typed::TypedColumn;

/// Boolean column.
pub type BooleanColumn = TypedColumn<bool>;
/// 32-bit integer column.
pub type IntColumn = TypedColumn<i32>;
/// 64-bit integer column.
pub type LongColumn = TypedColumn<i64>;
/// 32-bit float column.
pub type FloatColumn = TypedColumn<f32>;
/// 64-bit float column.
pub type DoubleColumn = TypedColumn<f64>;
/// String column.
pub type StringColumn = TypedColumn<Arc<str>>;
/// Interval column, ordered by interval center.
pub type IntervalColumn = TypedColumn<Interval>;
/// Column of arbitrary object values.
pub type ObjectColumn<T> = TypedColumn<T>;

/// A value type that can be stored in a [`TypedColumn`].
pub trait ColumnValue: Clone + Default + fmt::Debug + 'static {
    /// Kind reported by columns of this type.
    const KIND: ValueKind;

    /// Dynamic form of the value, `None` for object kinds.
    fn to_value(&self) -> Option<Value>;

    /// Converts a dynamic value, `None` if the kinds are incompatible.
    fn from_value(value: &Value) -> Option<Self>;

    /// Numeric projection, `None` for non-numeric kinds.
    fn to_f64(&self) -> Option<f64> {
        None
    }

    /// Order used when the column has no explicit [`ValueOrder`].
    fn natural_cmp(&self, other: &Self) -> Ordering;

    /// Text used when the column has no explicit [`Format`].
    fn format_default(&self) -> String;

    /// Parses text when the column has no explicit [`Format`].
    ///
    /// # Errors
    ///
    /// Returns a parse error if `text` is not a valid value.
    fn parse_default(text: &str) -> Result<Self>;
}

fn parse_trimmed<T: std::str::FromStr>(text: &str, kind: ValueKind) -> Result<T>
where
    T::Err: fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e| Error::parse(text, kind, format!("{e}")))
}

impl ColumnValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        value.as_bool()
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::KIND)
    }
}

impl ColumnValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Int(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            Value::Long(v) => Self::try_from(*v).ok(),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(f64::from(*self))
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::KIND)
    }
}

impl ColumnValue for i64 {
    const KIND: ValueKind = ValueKind::Long;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Long(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(Self::from(*v)),
            Value::Long(v) => Some(*v),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn to_f64(&self) -> Option<f64> {
        Some(*self as f64)
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::KIND)
    }
}

impl ColumnValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Float(*self))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v as Self),
            Value::Long(v) => Some(*v as Self),
            Value::Float(v) => Some(*v),
            Value::Double(v) => Some(*v as Self),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(f64::from(*self))
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::KIND)
    }
}

impl ColumnValue for f64 {
    const KIND: ValueKind = ValueKind::Double;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Double(*self))
    }

    #[allow(clippy::cast_precision_loss)]
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(Self::from(*v)),
            Value::Long(v) => Some(*v as Self),
            Value::Float(v) => Some(Self::from(*v)),
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(*self)
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        parse_trimmed(text, Self::KIND)
    }
}

impl ColumnValue for Arc<str> {
    const KIND: ValueKind = ValueKind::Text;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Text(Arc::clone(self)))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(Arc::clone(s)),
            _ => None,
        }
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        Ok(text.into())
    }
}

impl ColumnValue for Interval {
    const KIND: ValueKind = ValueKind::Interval;

    fn to_value(&self) -> Option<Value> {
        Some(Value::Interval(*self))
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Interval(i) => Some(*i),
            other => other.as_f64().map(Self::point),
        }
    }

    fn to_f64(&self) -> Option<f64> {
        Some(self.center())
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        self.center().total_cmp(&other.center())
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        text.parse()
    }
}

/// Dynamic interface shared by every column type.
///
/// Reads and writes outside `[0, size)` fail with an invalid row error
/// unless the method says it extends the column.
pub trait Column: fmt::Debug + Any {
    /// Column name. Names starting with `#` are internal.
    fn name(&self) -> &str;

    /// Kind of value stored.
    fn kind(&self) -> ValueKind;

    /// Number of rows, defined or not.
    fn size(&self) -> usize;

    /// Grows or truncates to `size` rows. New rows are undefined.
    fn set_size(&mut self, size: usize);

    /// Removes every row.
    fn clear(&mut self);

    /// Returns true if `row` holds no meaningful value, including rows
    /// past the end.
    fn is_value_undefined(&self, row: RowId) -> bool;

    /// Marks `row` undefined or defined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    fn set_value_undefined(&mut self, row: RowId, undefined: bool) -> Result<()>;

    /// Dynamic value at `row`, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`, or an invalid argument
    /// error for object columns.
    fn value(&self, row: RowId) -> Result<Option<Value>>;

    /// Stores a dynamic value, extending the column if needed.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error if the value kind does not fit.
    fn set_value(&mut self, row: RowId, value: &Value) -> Result<()>;

    /// Numeric view of `row`, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns a type mismatch error for non-numeric columns.
    fn get_f64(&self, row: RowId) -> Result<Option<f64>> {
        let _ = row;
        Err(Error::type_mismatch(ValueKind::Double, self.kind()))
    }

    /// Text form of `row` through the column format, `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row >= size`.
    fn format_value(&self, row: RowId) -> Result<Option<String>>;

    /// Parses `text` through the column format and stores it, extending the
    /// column if needed. Blank text marks non-text rows undefined.
    ///
    /// # Errors
    ///
    /// Returns a parse error if `text` is not a valid value.
    fn parse_value(&mut self, row: RowId, text: &str) -> Result<()>;

    /// Orders two rows by value. Undefined rows sort last.
    fn compare_rows(&self, a: RowId, b: RowId) -> Ordering;

    /// Returns true for bookkeeping columns hidden from users.
    fn is_internal(&self) -> bool {
        self.name().starts_with('#')
    }

    /// Iterates defined rows in ascending order.
    fn iter(&self) -> RowIterator;

    /// Iterates defined rows in descending order.
    fn iter_rev(&self) -> RowIterator;

    /// Opens (or nests) a notification batch.
    fn disable_notify(&mut self);

    /// Closes a batch level, publishing one aggregated event when the
    /// outermost level closes.
    fn enable_notify(&mut self);

    /// Registers a weakly-held change listener.
    fn add_change_listener(&mut self, listener: &Rc<dyn Listener<ColumnEvent>>) -> ListenerId;

    /// Unregisters a change listener.
    fn remove_change_listener(&mut self, id: ListenerId) -> bool;

    /// Number of changes recorded since creation.
    fn mod_count(&self) -> u64;

    /// Marks `row` undefined without notifying. Used by tables that
    /// publish their own row events.
    fn forget_row(&mut self, row: RowId);

    /// Upcast for downcasting to the concrete column type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete column type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
