//! End-to-end scenario across ids, tables, columns, and permutations

use tabula_storage::{DynamicTable, IntColumn, Permutation, StringColumn, Table};

#[test]
fn holes_are_skipped_and_reused() {
    let mut table = DynamicTable::new();
    table.add_column(Box::new(IntColumn::new("value"))).unwrap();
    for row in 0..5 {
        assert_eq!(table.add_row(), row);
        let text = (row * 10).to_string();
        assert!(table.set_value_at(row, 0, &text));
    }

    assert!(table.remove_row(2));
    assert_eq!(table.row_count(), 4);
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
    assert_eq!(table.iter_rev().collect::<Vec<_>>(), vec![4, 3, 1, 0]);
    assert_eq!(table.last_row(), Some(4));

    assert_eq!(table.add_row(), 2);
    assert_eq!(table.row_count(), 5);
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    assert_eq!(table.value_at(2, 0).unwrap(), None);
    assert_eq!(table.value_at(3, 0).unwrap(), Some("30".to_string()));
}

#[test]
fn sorted_view_over_a_dynamic_table() {
    let mut table = DynamicTable::new();
    table.add_column(Box::new(StringColumn::new("city"))).unwrap();
    for city in ["Oslo", "Lima", "Cairo", "Perth"] {
        let row = table.add_row();
        table.set_value_at(row, 0, city);
    }
    table.remove_row(1);

    let mut view = Permutation::from_iterator(table.iter()).unwrap();
    view.sort_by_column(table.column("city").unwrap());
    let cities: Vec<_> = view
        .iter()
        .filter_map(|row| table.value_at(row, 0).ok().flatten())
        .collect();
    assert_eq!(cities, vec!["Cairo", "Oslo", "Perth"]);
    assert_eq!(view.inverse(0), Some(1));
    assert_eq!(view.inverse(1), None);
}
