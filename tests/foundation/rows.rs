//! Integration tests for row ranges and bounds

use tabula_foundation::{RowBounds, RowRange};

#[test]
fn range_is_normalized() {
    let range = RowRange::new(8, 2);
    assert_eq!((range.first, range.last), (2, 8));
    assert_eq!(range.len(), 7);
    assert!(range.contains(2));
    assert!(range.contains(8));
    assert!(!range.contains(9));
}

#[test]
fn range_union_and_adjacency() {
    let a = RowRange::new(0, 3);
    let b = RowRange::new(4, 6);
    let c = RowRange::new(9, 9);
    assert!(a.is_adjacent_or_overlapping(b));
    assert!(!a.is_adjacent_or_overlapping(c));
    assert_eq!(a.union(c), RowRange::new(0, 9));
}

#[test]
fn range_display() {
    assert_eq!(RowRange::single(5).to_string(), "5");
    assert_eq!(RowRange::new(1, 4).to_string(), "1..=4");
}

#[test]
fn bounds_from_counts() {
    assert_eq!(RowBounds::dense(0), RowBounds::Empty);
    assert_eq!(RowBounds::dense(4), RowBounds::Inclusive { min: 0, max: 3 });
    assert_eq!(RowBounds::spanning(Some(2), None), RowBounds::Empty);
    assert_eq!(
        RowBounds::spanning(Some(2), Some(6)),
        RowBounds::Inclusive { min: 2, max: 6 }
    );
}

#[test]
fn bounds_contain_rows() {
    let bounds = RowBounds::spanning(Some(2), Some(6));
    assert!(bounds.contains(2));
    assert!(bounds.contains(6));
    assert!(!bounds.contains(1));
    assert!(!RowBounds::Empty.contains(0));
    assert_eq!(bounds.to_string(), "2..=6");
}
