//! Tabula - In-memory columnar table store
//!
//! This crate re-exports both layers of the Tabula system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 1: tabula_storage    - Id manager, permutations, columns, tables, notification
//! Layer 0: tabula_foundation - Core types (RowId, RowRange, Value, Interval, Error)
//! ```

pub use tabula_foundation as foundation;
pub use tabula_storage as storage;
