//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use tabula_foundation::{Error, ErrorContext, ErrorKind, RowBounds, ValueKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_invalid_row_carries_bounds() {
    let err = Error::invalid_row(7, RowBounds::dense(3));
    assert!(err.is_invalid_row());
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidRow {
            row: 7,
            bounds: RowBounds::Inclusive { min: 0, max: 2 }
        }
    ));
}

#[test]
fn error_undefined_value() {
    let err = Error::undefined_value(4);
    assert!(matches!(err.kind, ErrorKind::UndefinedValue { row: 4 }));
    assert!(!err.is_invalid_row());
}

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch(ValueKind::Double, ValueKind::Text);
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("double"));
    assert!(msg.contains("text"));
}

#[test]
fn error_concurrent_modification() {
    let err = Error::concurrent_modification(3, 5);
    assert!(matches!(
        err.kind,
        ErrorKind::ConcurrentModification {
            expected: 3,
            actual: 5
        }
    ));
}

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn error_display_invalid_row() {
    let msg = format!("{}", Error::invalid_row(9, RowBounds::Empty));
    assert!(msg.contains('9'));
    assert!(msg.contains("empty"));
}

#[test]
fn error_display_parse() {
    let msg = format!("{}", Error::parse("abc", ValueKind::Int, "not a number"));
    assert!(msg.contains("\"abc\""));
    assert!(msg.contains("int"));
    assert!(msg.contains("not a number"));
}

#[test]
fn error_display_columns() {
    assert!(format!("{}", Error::column_not_found("age")).contains("age"));
    assert!(format!("{}", Error::duplicate_column("name")).contains("name"));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn error_with_context() {
    let err = Error::structural_mismatch("sizes differ").with_context(
        ErrorContext::new()
            .with_source("people")
            .with_frame("sort")
            .with_frame("apply"),
    );
    let context = err.context.expect("context attached");
    assert_eq!(context.source.as_deref(), Some("people"));
    assert_eq!(context.stack, vec!["sort".to_string(), "apply".to_string()]);
}

#[test]
fn error_is_std_error() {
    fn takes_error(_: &dyn std::error::Error) {}
    takes_error(&Error::invalid_argument("bad"));
}
