//! Error types for the Tabula store.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

use crate::kind::ValueKind;
use crate::row::{RowBounds, RowId};

/// The main error type for Tabula operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an invalid row error.
    #[must_use]
    pub fn invalid_row(row: RowId, bounds: RowBounds) -> Self {
        Self::new(ErrorKind::InvalidRow { row, bounds })
    }

    /// Creates an undefined value access error.
    #[must_use]
    pub fn undefined_value(row: RowId) -> Self {
        Self::new(ErrorKind::UndefinedValue { row })
    }

    /// Creates a structural mismatch error.
    #[must_use]
    pub fn structural_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StructuralMismatch(message.into()))
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }

    /// Creates a concurrent modification error.
    #[must_use]
    pub fn concurrent_modification(expected: u64, actual: u64) -> Self {
        Self::new(ErrorKind::ConcurrentModification { expected, actual })
    }

    /// Creates a type mismatch error.
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, actual: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(input: &str, kind: ValueKind, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse {
            input: input.to_string(),
            kind,
            message: message.into(),
        })
    }

    /// Creates a column not found error.
    #[must_use]
    pub fn column_not_found(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::ColumnNotFound(name.into()))
    }

    /// Creates a duplicate column error.
    #[must_use]
    pub fn duplicate_column(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateColumn(name.into()))
    }

    /// Returns true if this is an invalid row error.
    #[must_use]
    pub const fn is_invalid_row(&self) -> bool {
        matches!(self.kind, ErrorKind::InvalidRow { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Row is outside the currently valid range.
    #[error("invalid row {row} (valid rows: {bounds})")]
    InvalidRow {
        /// The row that was accessed.
        row: RowId,
        /// The rows the domain accepted at the time.
        bounds: RowBounds,
    },

    /// Strict read of a row marked undefined.
    #[error("value at row {row} is undefined")]
    UndefinedValue {
        /// The row that was read.
        row: RowId,
    },

    /// Two structures that must agree in shape do not.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),

    /// An argument is outside the accepted domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The source changed structurally while an iterator was live.
    #[error("concurrent modification: expected stamp {expected}, found {actual}")]
    ConcurrentModification {
        /// Stamp recorded when the iterator was created.
        expected: u64,
        /// Stamp observed on the source.
        actual: u64,
    },

    /// Value kind mismatch on a typed accessor.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The kind the caller asked for.
        expected: ValueKind,
        /// The kind the column stores.
        actual: ValueKind,
    },

    /// Text could not be parsed into a column value.
    #[error("cannot parse {input:?} as {kind}: {message}")]
    Parse {
        /// The text that failed to parse.
        input: String,
        /// The target value kind.
        kind: ValueKind,
        /// Description of the failure.
        message: String,
    },

    /// No column with this name exists.
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    /// A column with this name already exists.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Table or column name.
    pub source: Option<String>,
    /// Stack of operations that led to the error, outermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source (table or column) name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Adds an operation frame.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  during {frame}")?;
            }
        }
        Ok(())
    }
}
