//! Tables whose rows are recycled ids.

use tabula_foundation::{Error, Result, RowBounds, RowId, RowRange};
use tracing::debug;

use super::columns::ColumnSet;
use super::item::Item;
use super::{Table, parse_into};
use crate::config::StoreConfig;
use crate::id_manager::IdManager;
use crate::iter::{RowIterator, RowRemover, Stamped};
use crate::notify::{ChangeKind, TableEvent};

/// A table whose rows are the ids currently allocated by its own
/// [`IdManager`].
///
/// Removing a row leaves a hole that the next [`add_row`](Self::add_row)
/// fills. Column values of a removed row are forgotten, so a reused row
/// starts out undefined in every column.
#[derive(Debug)]
pub struct DynamicTable {
    columns: ColumnSet,
    ids: IdManager,
}

impl Default for DynamicTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DynamicTable {
    /// Creates an empty table with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates an empty table.
    #[must_use]
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            ids: config.id_manager(),
            columns: ColumnSet::new(config),
        }
    }

    /// Creates a table with rows `0..count` already allocated.
    #[must_use]
    pub fn with_rows(count: usize) -> Self {
        let mut table = Self::new();
        table.ids.preallocate(count);
        table
    }

    /// The table's id manager.
    #[must_use]
    pub const fn ids(&self) -> &IdManager {
        &self.ids
    }

    /// Allocates a row, reusing the smallest hole if there is one.
    ///
    /// Publishes an insert event when the row extends the table and an
    /// update event when it fills a hole.
    pub fn add_row(&mut self) -> RowId {
        let prior = self.row_count();
        let row = self.ids.new_id();
        let kind = if row == prior {
            ChangeKind::Insert
        } else {
            ChangeKind::Update
        };
        debug!(table = %self.id(), row, ?kind, "row added");
        self.columns
            .publish(TableEvent::rows(RowRange::single(row), kind));
        row
    }

    /// Allocates a specific row. Returns false if it is already in use.
    pub fn add_row_at(&mut self, row: RowId) -> bool {
        if !self.ids.claim(row) {
            return false;
        }
        let kind = if self.ids.max_allocated_id() == Some(row) {
            ChangeKind::Insert
        } else {
            ChangeKind::Update
        };
        debug!(table = %self.id(), row, ?kind, "row claimed");
        self.columns
            .publish(TableEvent::rows(RowRange::single(row), kind));
        true
    }

    /// Removes `row`, returning false if it was not valid.
    ///
    /// Publishes a delete event when the highest row goes away and an
    /// update event when a hole opens inside the table.
    pub fn remove_row(&mut self, row: RowId) -> bool {
        if !self.is_row_valid(row) {
            return false;
        }
        let was_last = self.ids.max_allocated_id() == Some(row);
        if !self.ids.free(row).unwrap_or(false) {
            return false;
        }
        self.columns.forget_row(row);
        let kind = if was_last {
            ChangeKind::Delete
        } else {
            ChangeKind::Update
        };
        debug!(table = %self.id(), row, ?kind, "row removed");
        self.columns
            .publish(TableEvent::rows(RowRange::single(row), kind));
        true
    }

    /// Allocates a row and returns its handle.
    pub fn add_item(&mut self) -> Item {
        let row = self.add_row();
        let generation = self.row_generation(row);
        self.columns.item(row, generation)
    }

    /// Removes the row named by `item`. Returns false if the item is stale
    /// or belongs to another table.
    pub fn remove_item(&mut self, item: &Item) -> bool {
        match self.resolve(item) {
            Some(row) => self.remove_row(row),
            None => false,
        }
    }
}

impl Table for DynamicTable {
    fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    fn columns_mut(&mut self) -> &mut ColumnSet {
        &mut self.columns
    }

    fn row_count(&self) -> usize {
        self.ids.id_count()
    }

    fn is_row_valid(&self, row: RowId) -> bool {
        self.ids.is_allocated(row)
    }

    fn row_bounds(&self) -> RowBounds {
        RowBounds::spanning(self.ids.min_id(), self.ids.max_allocated_id())
    }

    fn last_row(&self) -> Option<RowId> {
        self.ids.max_allocated_id()
    }

    fn iter(&self) -> RowIterator {
        self.ids.iter()
    }

    fn iter_rev(&self) -> RowIterator {
        self.ids.iter_rev()
    }

    fn row_generation(&self, row: RowId) -> u32 {
        self.ids.generation(row).unwrap_or(0)
    }

    /// Only valid rows can be written.
    fn set_value_at(&mut self, row: RowId, column: usize, text: &str) -> bool {
        if !self.is_row_valid(row) {
            debug!(table = %self.id(), row, "set_value_at on invalid row");
            return false;
        }
        parse_into(&mut self.columns, row, column, text)
    }

    /// Also releases every row id.
    fn clear(&mut self) {
        self.ids.clear();
        self.columns.clear();
    }
}

impl Stamped for DynamicTable {
    fn modification_stamp(&self) -> u64 {
        self.ids.modification_stamp()
    }
}

impl RowRemover for DynamicTable {
    fn remove_row(&mut self, row: RowId) -> Result<()> {
        if Self::remove_row(self, row) {
            Ok(())
        } else {
            Err(Error::invalid_row(row, self.row_bounds()))
        }
    }
}
