//! Tables: named columns sharing one row domain.
//!
//! Two row-domain semantics exist and are kept apart:
//! - [`BasicTable`]: rows are the dense range `0..row_count`, where
//!   `row_count` is the largest column size.
//! - [`DynamicTable`]: rows are the ids currently allocated by an
//!   [`IdManager`](crate::id_manager::IdManager); removed rows leave holes
//!   that later additions reuse.
//!
//! Everything that does not depend on the row domain is provided by the
//! [`Table`] trait on top of a [`ColumnSet`].

mod attributes;
mod basic;
mod channel;
mod columns;
mod dynamic;
mod item;

use std::any::type_name;
use std::rc::Rc;

use tabula_foundation::{Error, ErrorContext, Result, RowBounds, RowId, Value};
use tracing::{debug, warn};

use crate::column::Column;
use crate::iter::{RowIterator, Rows};
use crate::notify::{Listener, ListenerId, TableEvent};

pub use attributes::Attributes;
pub use basic::BasicTable;
pub use columns::{ColumnSet, ITEM_COLUMN};
pub use dynamic::DynamicTable;
pub use item::{Item, TableId};

/// Common table interface.
pub trait Table {
    /// The table's columns.
    fn columns(&self) -> &ColumnSet;

    /// Mutable access to the table's columns.
    fn columns_mut(&mut self) -> &mut ColumnSet;

    /// Number of rows.
    fn row_count(&self) -> usize;

    /// Returns true if `row` belongs to the table.
    fn is_row_valid(&self, row: RowId) -> bool;

    /// Rows currently accepted, for error reports.
    fn row_bounds(&self) -> RowBounds;

    /// Highest valid row.
    fn last_row(&self) -> Option<RowId>;

    /// Detached iterator over valid rows, ascending.
    fn iter(&self) -> RowIterator;

    /// Detached iterator over valid rows, descending.
    fn iter_rev(&self) -> RowIterator;

    /// Generation of `row`, used to detect stale items.
    fn row_generation(&self, row: RowId) -> u32;

    /// Parses `text` into the cell at (`row`, `column`).
    ///
    /// Returns false if the row cannot be written, the column does not
    /// exist, or the text does not parse.
    fn set_value_at(&mut self, row: RowId, column: usize, text: &str) -> bool;

    /// Identifier of this table.
    fn id(&self) -> TableId {
        self.columns().table_id()
    }

    /// Borrowing iterator over valid rows, ascending.
    fn rows(&self) -> Rows<'_> {
        Rows::new(self.iter())
    }

    /// Number of columns.
    fn column_count(&self) -> usize {
        self.columns().len()
    }

    /// Column at `index`.
    fn column_at(&self, index: usize) -> Option<&dyn Column> {
        self.columns().get(index)
    }

    /// Mutable column at `index`.
    fn column_at_mut(&mut self, index: usize) -> Option<&mut dyn Column> {
        self.columns_mut().get_mut(index)
    }

    /// Column named `name`.
    fn column(&self, name: &str) -> Option<&dyn Column> {
        let index = self.index_of(name)?;
        self.column_at(index)
    }

    /// Mutable column named `name`.
    fn column_mut(&mut self, name: &str) -> Option<&mut dyn Column> {
        let index = self.index_of(name)?;
        self.column_at_mut(index)
    }

    /// Index of the column named `name`.
    fn index_of(&self, name: &str) -> Option<usize> {
        self.columns().index_of(name)
    }

    /// Column named `name`, downcast to its concrete type.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if no column has that name, or an
    /// invalid argument error if it has a different type.
    fn column_as<C: Column>(&self, name: &str) -> Result<&C>
    where
        Self: Sized,
    {
        let column = self
            .column(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        column
            .as_any()
            .downcast_ref::<C>()
            .ok_or_else(|| not_a::<C>(name))
    }

    /// Mutable column named `name`, downcast to its concrete type.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if no column has that name, or an
    /// invalid argument error if it has a different type.
    fn column_as_mut<C: Column>(&mut self, name: &str) -> Result<&mut C>
    where
        Self: Sized,
    {
        let column = self
            .column_mut(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        column
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or_else(|| not_a::<C>(name))
    }

    /// Appends a column and returns its index.
    ///
    /// # Errors
    ///
    /// Returns a duplicate column error if the name is taken.
    fn add_column(&mut self, column: Box<dyn Column>) -> Result<usize> {
        self.columns_mut().push(column)
    }

    /// Removes the column named `name`.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if no column has that name.
    fn remove_column(&mut self, name: &str) -> Result<Box<dyn Column>> {
        let index = self
            .index_of(name)
            .ok_or_else(|| Error::column_not_found(name))?;
        self.columns_mut().remove(index)
    }

    /// Replaces the column at `index`, returning the old one.
    ///
    /// # Errors
    ///
    /// Returns a column not found error if `index` is out of range, or a
    /// duplicate column error if another column has the new name.
    fn set_column_at(&mut self, index: usize, column: Box<dyn Column>) -> Result<Box<dyn Column>> {
        self.columns_mut().replace(index, column)
    }

    /// Returns true if the column named `name` is internal.
    fn is_column_internal(&self, name: &str) -> bool {
        self.column(name).is_some_and(Column::is_internal)
    }

    /// Registers a weakly-held table listener.
    fn add_listener(&mut self, listener: &Rc<dyn Listener<TableEvent>>) -> ListenerId {
        self.columns_mut().add_listener(listener)
    }

    /// Unregisters a table listener.
    fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.columns_mut().remove_listener(id)
    }

    /// Opens (or nests) a batch covering the table and all its columns.
    fn disable_notify(&mut self) {
        self.columns_mut().disable_notify();
    }

    /// Closes a batch level.
    fn enable_notify(&mut self) {
        self.columns_mut().enable_notify();
    }

    /// Metadata describing the table's data.
    fn metadata(&self) -> &Attributes {
        self.columns().metadata()
    }

    /// Metadata value stored under `name`.
    fn get_metadata(&self, name: &str) -> Option<&Value> {
        self.columns().metadata().get(name)
    }

    /// Stores a metadata value, returning the previous one.
    fn set_metadata(&mut self, name: &str, value: Value) -> Option<Value> {
        self.columns_mut().metadata_mut().set(name, value)
    }

    /// Removes a metadata value.
    fn remove_metadata(&mut self, name: &str) -> Option<Value> {
        self.columns_mut().metadata_mut().remove(name)
    }

    /// Properties attached by the table's users.
    fn client_properties(&self) -> &Attributes {
        self.columns().client_properties()
    }

    /// Client property stored under `name`.
    fn get_client_property(&self, name: &str) -> Option<&Value> {
        self.columns().client_properties().get(name)
    }

    /// Stores a client property, returning the previous one.
    fn set_client_property(&mut self, name: &str, value: Value) -> Option<Value> {
        self.columns_mut().client_properties_mut().set(name, value)
    }

    /// Removes a client property.
    fn remove_client_property(&mut self, name: &str) -> Option<Value> {
        self.columns_mut().client_properties_mut().remove(name)
    }

    /// Clears every column, the item cache, metadata and client
    /// properties.
    fn clear(&mut self) {
        self.columns_mut().clear();
    }

    /// Fails with an invalid row error if `row` is not valid.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error carrying the current row bounds.
    fn check_row_valid(&self, row: RowId) -> Result<()> {
        if self.is_row_valid(row) {
            return Ok(());
        }
        let bounds = self.row_bounds();
        warn!(table = %self.id(), row, %bounds, "invalid row");
        Err(Error::invalid_row(row, bounds)
            .with_context(ErrorContext::new().with_source(self.id().to_string())))
    }

    /// Stable handle for `row`.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row` is not valid.
    fn item(&mut self, row: RowId) -> Result<Item> {
        self.check_row_valid(row)?;
        let generation = self.row_generation(row);
        Ok(self.columns_mut().item(row, generation))
    }

    /// Row named by `item`, or `None` if it belongs to another table or
    /// its row was removed since the item was created.
    fn resolve(&self, item: &Item) -> Option<RowId> {
        let row = item.id()?;
        (item.table() == Some(self.id())
            && self.is_row_valid(row)
            && self.row_generation(row) == item.generation())
        .then_some(row)
    }

    /// Formatted cell at (`row`, `column`), `None` if undefined.
    ///
    /// # Errors
    ///
    /// Returns an invalid row error if `row` is not valid, or a column not
    /// found error if `column` is out of range.
    fn value_at(&self, row: RowId, column: usize) -> Result<Option<String>> {
        self.check_row_valid(row)?;
        let column = self
            .column_at(column)
            .ok_or_else(|| Error::column_not_found(format!("#{column}")))?;
        if row >= column.size() {
            return Ok(None);
        }
        column.format_value(row)
    }
}

fn not_a<C>(name: &str) -> Error {
    Error::invalid_argument(format!("column {name} is not a {}", type_name::<C>()))
}

/// Parses `text` into a column cell, logging rejected input.
fn parse_into(columns: &mut ColumnSet, row: RowId, column: usize, text: &str) -> bool {
    let Some(target) = columns.get_mut(column) else {
        debug!(column, "set_value_at on missing column");
        return false;
    };
    match target.parse_value(row, text) {
        Ok(()) => true,
        Err(error) => {
            debug!(row, column, %error, "set_value_at rejected");
            false
        }
    }
}
