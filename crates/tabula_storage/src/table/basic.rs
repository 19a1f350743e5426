//! Tables whose rows are a dense range.

use tabula_foundation::{Result, RowBounds, RowId};

use super::columns::ColumnSet;
use super::item::Item;
use super::{Table, parse_into};
use crate::config::StoreConfig;
use crate::iter::{Direction, RowIterator};

/// A table whose rows are `0..row_count`, with `row_count` the largest
/// column size.
///
/// Adding a shorter column never shrinks the table; writing past the end
/// of a column grows it. Rows have no individual generations: every item
/// goes stale together when the table is cleared or loses rows.
#[derive(Debug)]
pub struct BasicTable {
    columns: ColumnSet,
}

impl Default for BasicTable {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicTable {
    /// Creates an empty table with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty table.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            columns: ColumnSet::new(config),
        }
    }
}

impl Table for BasicTable {
    fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    fn row_count(&self) -> usize {
        self.columns.max_size()
    }

    fn is_row_valid(&self, row: RowId) -> bool {
        row < self.row_count()
    }

    fn row_bounds(&self) -> RowBounds {
        RowBounds::dense(self.row_count())
    }

    fn last_row(&self) -> Option<RowId> {
        self.row_count().checked_sub(1)
    }

    fn iter(&self) -> RowIterator {
        RowIterator::dense(self.row_count(), Direction::Ascending)
    }

    fn iter_rev(&self) -> RowIterator {
        RowIterator::dense(self.row_count(), Direction::Descending)
    }

    fn row_generation(&self, _row: RowId) -> u32 {
        self.columns.epoch()
    }

    fn item(&mut self, row: RowId) -> Result<Item> {
        self.columns.observe_extent();
        self.check_row_valid(row)?;
        Ok(self.columns.item(row, self.columns.epoch()))
    }

    /// Writes past the current row count grow the target column.
    fn set_value_at(&mut self, row: RowId, column: usize, text: &str) -> bool {
        parse_into(&mut self.columns, row, column, text)
    }
}
