//! Integration tests for tables
//!
//! Tests dense and dynamic row domains, column management, string cell
//! access, and row handles.

use tabula_foundation::{ErrorKind, RowBounds, Value};
use tabula_storage::{
    BasicTable, Column, DoubleColumn, DynamicTable, IntColumn, Item, StoreConfig, StringColumn,
    Table,
};

fn people() -> DynamicTable {
    let mut table = DynamicTable::new();
    table.add_column(Box::new(StringColumn::new("name"))).unwrap();
    table.add_column(Box::new(IntColumn::new("age"))).unwrap();
    for (name, age) in [("ann", "31"), ("bo", "27"), ("cy", "45")] {
        let row = table.add_row();
        assert!(table.set_value_at(row, 0, name));
        assert!(table.set_value_at(row, 1, age));
    }
    table
}

// =============================================================================
// Basic Tables
// =============================================================================

#[test]
fn basic_table_rows_follow_longest_column() {
    let mut table = BasicTable::new();
    table
        .add_column(Box::new(IntColumn::from_values("a", [1, 2])))
        .unwrap();
    table
        .add_column(Box::new(DoubleColumn::from_values("b", [0.5; 4])))
        .unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(table.value_at(3, 0).unwrap(), None);
    assert_eq!(table.value_at(3, 1).unwrap(), Some("0.5".to_string()));
    assert_eq!(table.rows().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
}

#[test]
fn basic_table_writes_extend() {
    let mut table = BasicTable::new();
    table.add_column(Box::new(StringColumn::new("s"))).unwrap();
    assert!(table.set_value_at(5, 0, "late"));
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.row_bounds(), RowBounds::Inclusive { min: 0, max: 5 });
}

// =============================================================================
// Dynamic Tables
// =============================================================================

#[test]
fn dynamic_table_string_cells() {
    let table = people();
    assert_eq!(table.row_count(), 3);
    assert_eq!(table.value_at(1, 0).unwrap(), Some("bo".to_string()));
    assert_eq!(table.column_as::<IntColumn>("age").unwrap().get(2).unwrap(), Some(&45));
}

#[test]
fn dynamic_table_rejects_writes_to_holes() {
    let mut table = people();
    assert!(table.remove_row(1));
    assert!(!table.set_value_at(1, 0, "ghost"));
    assert!(table.value_at(1, 0).unwrap_err().is_invalid_row());
    assert!(!table.remove_row(1));
}

#[test]
fn reused_rows_start_undefined() {
    let mut table = people();
    table.remove_row(1);
    assert_eq!(table.add_row(), 1);
    assert_eq!(table.value_at(1, 0).unwrap(), None);
    assert_eq!(table.value_at(1, 1).unwrap(), None);
    assert_eq!(table.value_at(2, 0).unwrap(), Some("cy".to_string()));
}

#[test]
fn invalid_row_reports_bounds_with_holes() {
    let mut table = DynamicTable::with_rows(5);
    table.remove_row(0);
    table.remove_row(2);
    let err = table.check_row_valid(2).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::InvalidRow {
            row: 2,
            bounds: RowBounds::Inclusive { min: 1, max: 4 }
        }
    ));
    assert_eq!(
        err.context.and_then(|c| c.source),
        Some(table.id().to_string())
    );
}

#[test]
fn add_row_at_fills_a_chosen_id() {
    let mut table = DynamicTable::new();
    assert!(table.add_row_at(3));
    assert!(!table.add_row_at(3));
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.add_row(), 0);
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![0, 3]);
}

#[test]
fn clear_releases_rows_and_values() {
    let mut table = people();
    table.clear();
    assert_eq!(table.row_count(), 0);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.column("name").map(Column::size), Some(0));
    assert_eq!(table.add_row(), 0);
}

#[test]
fn removal_during_iteration() {
    let mut table = people();
    let mut it = table.iter();
    while let Some(row) = it.next_row() {
        let age = table.column_as::<IntColumn>("age").unwrap().get_or_default(row).unwrap();
        if age > 30 {
            it.remove_from(&mut table).unwrap();
        }
    }
    assert_eq!(table.iter().collect::<Vec<_>>(), vec![1]);
}

// =============================================================================
// Items
// =============================================================================

#[test]
fn items_go_stale_when_rows_are_recycled() {
    let mut table = people();
    let item = table.item(1).unwrap();
    assert_eq!(table.resolve(&item), Some(1));

    assert!(table.remove_item(&item));
    assert_eq!(table.resolve(&item), None);
    assert!(!table.remove_item(&item));

    assert_eq!(table.add_row(), 1);
    assert_eq!(table.resolve(&item), None);
    let fresh = table.item(1).unwrap();
    assert_ne!(fresh, item);
    assert_eq!(table.resolve(&fresh), Some(1));
}

#[test]
fn items_belong_to_one_table() {
    let mut a = DynamicTable::with_rows(2);
    let b = DynamicTable::with_rows(2);
    let item = a.add_item();
    assert_eq!(item.id(), Some(2));
    assert_eq!(b.resolve(&item), None);
    assert_eq!(b.resolve(&Item::null()), None);
}

#[test]
fn item_cache_can_be_disabled() {
    let mut cached = DynamicTable::new();
    let mut plain = DynamicTable::with_config(StoreConfig::compact());
    cached.add_row();
    plain.add_row();

    assert_eq!(cached.item(0).unwrap(), cached.item(0).unwrap());
    assert_eq!(plain.item(0).unwrap(), plain.item(0).unwrap());
    assert!(cached.columns().items().is_some());
    assert!(plain.columns().items().is_none());
}

#[test]
fn metadata_and_client_properties() {
    let mut table = people();
    assert_eq!(table.set_metadata("origin", Value::from("survey.csv")), None);
    assert_eq!(table.set_metadata("header", Value::Bool(true)), None);
    assert_eq!(
        table.set_metadata("header", Value::Bool(false)),
        Some(Value::Bool(true))
    );
    table.set_client_property("dot::overlap", Value::from("false"));

    assert_eq!(table.get_metadata("origin"), Some(&Value::from("survey.csv")));
    assert_eq!(table.metadata().names().collect::<Vec<_>>(), vec!["header", "origin"]);
    assert_eq!(table.remove_metadata("origin"), Some(Value::from("survey.csv")));
    assert_eq!(table.get_metadata("origin"), None);
    assert_eq!(
        table.get_client_property("dot::overlap"),
        Some(&Value::from("false"))
    );
    assert_eq!(
        table.remove_client_property("dot::overlap"),
        Some(Value::from("false"))
    );
    assert!(table.client_properties().is_empty());
}

#[test]
fn clear_wipes_metadata_and_client_properties() {
    let mut table = BasicTable::new();
    table
        .add_column(Box::new(IntColumn::from_values("n", [1, 2])))
        .unwrap();
    table.set_metadata("version", Value::Int(3));
    table.set_client_property("zoom", Value::Double(1.5));

    table.clear();
    assert!(table.metadata().is_empty());
    assert!(table.client_properties().is_empty());
    assert_eq!(table.column_count(), 1);
    assert_eq!(table.row_count(), 0);
}
