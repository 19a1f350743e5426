//! Integration tests for Value types
//!
//! Tests Value variants, kinds, numeric projection, display, and intervals.

use std::sync::Arc;

use tabula_foundation::{Interval, Value, ValueKind};

// =============================================================================
// Value Construction
// =============================================================================

#[test]
fn value_from_primitives() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(3_i32), Value::Int(3));
    assert_eq!(Value::from(3_i64), Value::Long(3));
    assert_eq!(Value::from(1.5_f32), Value::Float(1.5));
    assert_eq!(Value::from(1.5_f64), Value::Double(1.5));
    assert_eq!(Value::from("abc"), Value::Text(Arc::from("abc")));
}

#[test]
fn value_kinds() {
    assert_eq!(Value::Bool(false).kind(), ValueKind::Bool);
    assert_eq!(Value::Long(0).kind(), ValueKind::Long);
    assert_eq!(Value::from("x").kind(), ValueKind::Text);
    assert_eq!(
        Value::from(Interval::point(1.0)).kind(),
        ValueKind::Interval
    );
}

// =============================================================================
// Projections
// =============================================================================

#[test]
fn numeric_projection() {
    assert_eq!(Value::Int(4).as_f64(), Some(4.0));
    assert_eq!(Value::Long(-2).as_f64(), Some(-2.0));
    assert_eq!(Value::from(Interval::new(2.0, 4.0)).as_f64(), Some(3.0));
    assert_eq!(Value::Bool(true).as_f64(), None);
    assert_eq!(Value::from("7").as_f64(), None);
}

#[test]
fn payload_accessors() {
    assert_eq!(Value::Bool(true).as_bool(), Some(true));
    assert_eq!(Value::Int(1).as_bool(), None);
    assert_eq!(Value::from("hello").as_str(), Some("hello"));
    assert_eq!(Value::Double(1.0).as_str(), None);
}

#[test]
fn value_display() {
    assert_eq!(Value::Int(42).to_string(), "42");
    assert_eq!(Value::from("plain").to_string(), "plain");
    assert_eq!(Value::from(Interval::new(1.0, 2.5)).to_string(), "[1, 2.5]");
}

#[test]
fn kind_classification() {
    assert!(ValueKind::Category.is_numeric());
    assert!(ValueKind::Category.is_integral());
    assert!(ValueKind::Interval.is_numeric());
    assert!(!ValueKind::Interval.is_integral());
    assert!(!ValueKind::Text.is_numeric());
    assert!(!ValueKind::Object.is_numeric());
}

// =============================================================================
// Intervals
// =============================================================================

#[test]
fn interval_parse_forms() {
    assert_eq!(
        "[0.5, 1.5]".parse::<Interval>().unwrap(),
        Interval::new(0.5, 1.5)
    );
    assert_eq!(" 3 , 1 ".parse::<Interval>().unwrap(), Interval::new(1.0, 3.0));
    assert!("[1 2]".parse::<Interval>().is_err());
    assert!("[a, 2]".parse::<Interval>().is_err());
}

#[test]
fn interval_geometry() {
    let a = Interval::new(1.0, 3.0);
    assert_eq!(a.center(), 2.0);
    assert_eq!(a.width(), 2.0);
    assert!(a.contains(1.0));
    assert!(!a.contains(3.5));
    assert_eq!(a.hull(Interval::point(5.0)), Interval::new(1.0, 5.0));
}
