//! Core types for the Tabula columnar store.
//!
//! This crate provides:
//! - [`RowId`], [`RowRange`], [`RowBounds`] - Row identifiers and ranges
//! - [`Value`] and [`ValueKind`] - Dynamic cell values and their kinds
//! - [`Interval`] - Closed numeric intervals
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod interval;
pub mod kind;
pub mod row;
pub mod value;

pub use error::{Error, ErrorContext, ErrorKind};
pub use interval::Interval;
pub use kind::ValueKind;
pub use row::{RowBounds, RowId, RowRange};
pub use value::Value;

/// Result alias used throughout Tabula.
pub type Result<T> = std::result::Result<T, Error>;
