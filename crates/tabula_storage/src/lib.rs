//! Columnar row storage for Tabula.
//!
//! This crate provides:
//! - [`IdManager`] - Free-list row id allocation with generations
//! - [`Permutation`] - Row reorderings with O(1) lookups both ways
//! - [`Column`] and [`TypedColumn`] - Typed columns with undefined tracking
//! - [`BasicTable`] and [`DynamicTable`] - Columns sharing a row domain
//! - [`RowIterator`] and [`Item`] - Row traversal and stable row handles
//! - [`notify`] - Change listeners, batching, and events

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod column;
pub mod config;
pub mod id_manager;
pub mod iter;
pub mod notify;
pub mod permutation;
pub mod table;

pub use column::{
    BooleanColumn, CategoricalColumn, Column, ColumnValue, DoubleColumn, FloatColumn, IntColumn,
    IntervalColumn, LongColumn, ObjectColumn, StringColumn, TypedColumn,
};
pub use config::StoreConfig;
pub use id_manager::IdManager;
pub use iter::{Direction, RowIterator, RowRemover, Rows, Stamped};
pub use notify::{ChangeKind, ColumnEvent, ColumnScope, Listener, ListenerId, TableEvent};
pub use permutation::Permutation;
pub use table::{Attributes, BasicTable, DynamicTable, Item, Table, TableId};
