//! Stable row handles.

use std::cmp::Ordering;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tabula_foundation::{Error, Result, RowId, Value, ValueKind};

use crate::column::ColumnValue;

static NEXT_TABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique table identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u64);

impl TableId {
    pub(crate) fn next() -> Self {
        Self(NEXT_TABLE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Identity handle for a row of a table, optionally narrowed to one column.
///
/// Two items are equal when they name the same table, row, column and row
/// generation. An item whose row was removed (or removed and reused) no
/// longer resolves; see [`Table::resolve`](crate::table::Table::resolve).
///
/// The default item is the null item, which names nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Item {
    table: Option<TableId>,
    row: Option<RowId>,
    column: Option<usize>,
    generation: u32,
}

impl Item {
    pub(crate) const fn new(table: TableId, row: RowId, generation: u32) -> Self {
        Self {
            table: Some(table),
            row: Some(row),
            column: None,
            generation,
        }
    }

    /// The null item.
    #[must_use]
    pub const fn null() -> Self {
        Self {
            table: None,
            row: None,
            column: None,
            generation: 0,
        }
    }

    /// Narrows this item to one column.
    #[must_use]
    pub const fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Row id, `None` for the null item.
    #[must_use]
    pub const fn id(&self) -> Option<RowId> {
        self.row
    }

    /// Owning table, `None` for the null item.
    #[must_use]
    pub const fn table(&self) -> Option<TableId> {
        self.table
    }

    /// Column index, if the item is narrowed to one column.
    #[must_use]
    pub const fn column(&self) -> Option<usize> {
        self.column
    }

    /// Generation of the row when the item was created.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns true for the null item.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        self.row.is_none()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.table, self.row) {
            (Some(table), Some(row)) => {
                write!(f, "{table}[{row}")?;
                if let Some(column) = self.column {
                    write!(f, ", {column}")?;
                }
                f.write_str("]")
            }
            _ => f.write_str("null"),
        }
    }
}

impl ColumnValue for Item {
    const KIND: ValueKind = ValueKind::Object;

    fn to_value(&self) -> Option<Value> {
        None
    }

    fn from_value(_value: &Value) -> Option<Self> {
        None
    }

    fn natural_cmp(&self, other: &Self) -> Ordering {
        (self.table, self.row, self.column).cmp(&(other.table, other.row, other.column))
    }

    fn format_default(&self) -> String {
        self.to_string()
    }

    fn parse_default(text: &str) -> Result<Self> {
        Err(Error::parse(text, ValueKind::Object, "items have no text form"))
    }
}
