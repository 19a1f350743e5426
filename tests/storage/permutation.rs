//! Integration tests for permutations
//!
//! Tests construction, sorting by columns, composition, and filtering.

use tabula_foundation::ErrorKind;
use tabula_storage::column::{NaturalOrder, Reversed};
use tabula_storage::{
    BasicTable, Column, DoubleColumn, IdManager, IntColumn, Permutation, StringColumn, Table,
};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn identity_maps_rows_to_themselves() {
    let p = Permutation::identity(4);
    assert!(p.is_identity());
    for row in 0..4 {
        assert_eq!(p.direct(row), Some(row));
        assert_eq!(p.inverse(row), Some(row));
    }
    assert_eq!(p.direct(4), None);
}

#[test]
fn from_rows_rejects_duplicates() {
    let err = Permutation::from_rows([0, 2, 0]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::StructuralMismatch(_)));
}

#[test]
fn from_iterator_follows_id_manager() {
    let mut ids = IdManager::with_allocated(5);
    ids.free(1).unwrap();
    let p = Permutation::from_iterator(ids.iter()).unwrap();
    assert_eq!(p.rows(), &[0, 2, 3, 4]);
    assert_eq!(p.inverse(3), Some(2));
    assert!(!p.contains(1));
}

#[test]
fn select_renumbers_parent_positions() {
    let parent = Permutation::from_rows([4, 3, 2, 1, 0]).unwrap();
    let child = Permutation::select(&parent, &[0, 2, 4]).unwrap();
    assert_eq!(child.rows(), &[4, 2, 0]);
    assert!(Permutation::select(&parent, &[9]).is_err());
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn sort_by_column_keeps_ties_and_undefined_last() {
    let mut scores = DoubleColumn::from_values("score", [3.0, 1.0, 3.0, 0.5, 2.0]);
    scores.set_value_undefined(1, true).unwrap();

    let mut p = Permutation::identity(scores.size());
    p.sort_by_column(&scores);
    assert_eq!(p.rows(), &[3, 4, 0, 2, 1]);
}

#[test]
fn sort_by_column_with_custom_order() {
    let column = IntColumn::from_values("n", [1, 5, 3]).with_order(Reversed(NaturalOrder));
    let mut p = Permutation::identity(3);
    p.sort_by_column(&column);
    assert_eq!(p.rows(), &[1, 2, 0]);
}

#[test]
fn sort_table_view_by_name() {
    let mut table = BasicTable::new();
    table
        .add_column(Box::new(StringColumn::from_values(
            "name",
            ["carol", "alice", "bob"].map(Into::into),
        )))
        .unwrap();

    let mut view = Permutation::from_iterator(table.iter()).unwrap();
    view.sort_by_column(table.column("name").unwrap());
    let names: Vec<_> = view
        .iter()
        .map(|row| table.value_at(row, 0).unwrap().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "bob", "carol"]);
}

// =============================================================================
// Composition and Filtering
// =============================================================================

#[test]
fn permute_composes_positions() {
    let mut p = Permutation::from_rows([0, 1, 2]).unwrap();
    let swap_ends = Permutation::from_rows([2, 1, 0]).unwrap();
    p.permute(&swap_ends).unwrap();
    assert_eq!(p.rows(), &[2, 1, 0]);

    let too_far = Permutation::from_rows([0, 3]).unwrap();
    assert!(p.permute(&too_far).is_err());
}

#[test]
fn filter_drops_and_unmaps() {
    let mut p = Permutation::identity(6);
    assert_eq!(p.filter(|row| row % 3 != 0), 2);
    assert_eq!(p.rows(), &[1, 2, 4, 5]);
    assert_eq!(p.inverse(0), None);
    assert_eq!(p.inverse(4), Some(2));

    let q = Permutation::filtered(6, |row| row % 3 != 0);
    assert_eq!(p, q);
}

#[test]
fn shuffle_is_deterministic_bijection() {
    let mut a = Permutation::identity(32);
    let mut b = Permutation::identity(32);
    a.shuffle(7);
    b.shuffle(7);
    assert_eq!(a, b);

    let mut rows = a.rows().to_vec();
    rows.sort_unstable();
    assert_eq!(rows, (0..32).collect::<Vec<_>>());
    for position in 0..32 {
        assert_eq!(a.inverse(a.direct(position).unwrap()), Some(position));
    }
}

#[test]
fn apply_to_gathers_values() {
    let p = Permutation::from_rows([2, 0, 1]).unwrap();
    assert_eq!(p.apply_to(&["a", "b", "c"]).unwrap(), vec!["c", "a", "b"]);
    assert!(p.apply_to(&["a"]).is_err());
    assert_eq!(p.to_string(), "[2 0 1]");
}
