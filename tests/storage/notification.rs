//! Integration tests for change notification
//!
//! Tests column listeners, table event forwarding, nested batches, and
//! weak listener registration.

use std::cell::Cell;
use std::rc::Rc;

use tabula_foundation::{RowRange, Value};
use tabula_storage::notify::EventLog;
use tabula_storage::{
    BasicTable, ChangeKind, Column, ColumnEvent, DynamicTable, IntColumn, Listener, Table,
    TableEvent,
};

fn column_log(column: &mut dyn Column) -> (Rc<EventLog<ColumnEvent>>, Rc<dyn Listener<ColumnEvent>>) {
    let log: Rc<EventLog<ColumnEvent>> = EventLog::new();
    let listener: Rc<dyn Listener<ColumnEvent>> = log.clone();
    column.add_change_listener(&listener);
    (log, listener)
}

fn table_log(table: &mut impl Table) -> (Rc<EventLog<TableEvent>>, Rc<dyn Listener<TableEvent>>) {
    let log: Rc<EventLog<TableEvent>> = EventLog::new();
    let listener: Rc<dyn Listener<TableEvent>> = log.clone();
    table.add_listener(&listener);
    (log, listener)
}

// =============================================================================
// Column Events
// =============================================================================

#[test]
fn each_write_notifies_outside_a_batch() {
    let mut column = IntColumn::from_values("n", [0; 4]);
    let (log, _keep) = column_log(&mut column);
    column.set(1, 5).unwrap();
    column.set(3, 5).unwrap();

    let rows: Vec<_> = log.events().into_iter().map(|e| e.rows).collect();
    assert_eq!(rows, vec![RowRange::single(1), RowRange::single(3)]);
    assert_eq!(column.mod_count(), 2);
}

#[test]
fn nested_batches_publish_once() {
    let mut column = IntColumn::from_values("n", [0; 10]);
    let (log, _keep) = column_log(&mut column);

    column.disable_notify();
    column.set(2, 1).unwrap();
    column.disable_notify();
    column.set(7, 1).unwrap();
    column.enable_notify();
    assert!(log.is_empty());
    column.enable_notify();

    assert_eq!(log.len(), 1);
    assert_eq!(log.events()[0].rows, RowRange::new(2, 7));
    assert_eq!(&*log.events()[0].column, "n");
}

#[test]
fn empty_batch_is_silent() {
    let mut column = IntColumn::new("n");
    let (log, _keep) = column_log(&mut column);
    column.disable_notify();
    column.enable_notify();
    assert!(log.is_empty());
}

#[test]
fn dropped_listener_is_not_called() {
    let mut column = IntColumn::from_values("n", [0]);
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let listener: Rc<dyn Listener<ColumnEvent>> = Rc::new(move |_: &ColumnEvent| {
        counter.set(counter.get() + 1);
    });
    column.add_change_listener(&listener);

    column.set(0, 1).unwrap();
    drop(listener);
    column.set(0, 2).unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn removed_listener_is_not_called() {
    let mut column = IntColumn::from_values("n", [0]);
    let log: Rc<EventLog<ColumnEvent>> = EventLog::new();
    let listener: Rc<dyn Listener<ColumnEvent>> = log.clone();
    let id = column.add_change_listener(&listener);
    assert!(column.remove_change_listener(id));
    assert!(!column.remove_change_listener(id));
    column.set(0, 1).unwrap();
    assert!(log.is_empty());
}

// =============================================================================
// Table Events
// =============================================================================

#[test]
fn row_lifecycle_events() {
    let mut table = DynamicTable::new();
    let (log, _keep) = table_log(&mut table);

    for _ in 0..3 {
        table.add_row();
    }
    table.remove_row(1);
    table.remove_row(2);
    table.add_row();

    let kinds: Vec<_> = log.events().iter().filter_map(TableEvent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ChangeKind::Insert,
            ChangeKind::Insert,
            ChangeKind::Insert,
            ChangeKind::Update,
            ChangeKind::Delete,
            ChangeKind::Insert,
        ]
    );
}

#[test]
fn column_added_later_is_forwarded() {
    let mut table = BasicTable::new();
    let (log, _keep) = table_log(&mut table);
    table
        .add_column(Box::new(IntColumn::from_values("a", [0, 0])))
        .unwrap();
    log.clear();

    table.column_as_mut::<IntColumn>("a").unwrap().set(1, 9).unwrap();
    assert_eq!(log.events(), vec![TableEvent::cells(RowRange::single(1), 0)]);
}

#[test]
fn structure_changes_are_reported() {
    let mut table = BasicTable::new();
    let (log, _keep) = table_log(&mut table);
    table.add_column(Box::new(IntColumn::new("a"))).unwrap();
    table.remove_column("a").unwrap();
    assert_eq!(log.events(), vec![TableEvent::Structure, TableEvent::Structure]);
}

#[test]
fn table_batch_merges_row_events() {
    let mut table = DynamicTable::new();
    let (log, _keep) = table_log(&mut table);

    table.disable_notify();
    for _ in 0..5 {
        table.add_row();
    }
    table.enable_notify();

    assert_eq!(
        log.events(),
        vec![TableEvent::rows(RowRange::new(0, 4), ChangeKind::Insert)]
    );
}

#[test]
fn removed_column_stops_forwarding() {
    let mut table = BasicTable::new();
    table
        .add_column(Box::new(IntColumn::from_values("a", [0])))
        .unwrap();
    let (log, _keep) = table_log(&mut table);

    let mut column = table.remove_column("a").unwrap();
    log.clear();
    column.set_value(0, &Value::Int(1)).unwrap();
    assert!(log.is_empty());
}
