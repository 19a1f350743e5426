//! Integration tests for row id allocation
//!
//! Tests hole reuse, trailing shrink, claims, generations, and iteration.

use tabula_foundation::ErrorKind;
use tabula_storage::{IdManager, StoreConfig};

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn ids_are_dense_until_freed() {
    let mut ids = IdManager::new();
    let allocated: Vec<_> = (0..4).map(|_| ids.new_id()).collect();
    assert_eq!(allocated, vec![0, 1, 2, 3]);
    assert_eq!(ids.id_count(), 4);
    assert_eq!(ids.max_id(), Some(3));
}

#[test]
fn smallest_hole_is_reused_first() {
    let mut ids = IdManager::with_allocated(6);
    ids.free(4).unwrap();
    ids.free(1).unwrap();
    assert_eq!(ids.free_count(), 2);

    assert_eq!(ids.new_id(), 1);
    assert_eq!(ids.new_id(), 4);
    assert_eq!(ids.new_id(), 6);
}

#[test]
fn trailing_free_shrinks_past_holes() {
    let mut ids = IdManager::with_allocated(5);
    ids.free(2).unwrap();
    ids.free(3).unwrap();
    ids.free(4).unwrap();
    assert_eq!(ids.max_id(), Some(1));
    assert_eq!(ids.free_count(), 0);
    assert_eq!(ids.id_count(), 2);
}

#[test]
fn monotonic_keeps_max_id() {
    let mut ids = StoreConfig::monotonic().id_manager();
    for _ in 0..3 {
        ids.new_id();
    }
    ids.free(2).unwrap();
    assert_eq!(ids.max_id(), Some(2));
    assert_eq!(ids.max_allocated_id(), Some(1));
    assert!(ids.is_free(2));
    assert_eq!(ids.new_id(), 2);
}

#[test]
fn claim_marks_skipped_ids_free() {
    let mut ids = IdManager::new();
    assert!(ids.claim(3));
    assert_eq!(ids.id_count(), 1);
    assert_eq!(ids.free_count(), 3);
    assert!(!ids.claim(3));
    assert!(ids.claim(1));
    assert_eq!(ids.new_id(), 0);
}

// =============================================================================
// Freeing
// =============================================================================

#[test]
fn double_free_is_reported_not_fatal() {
    let mut ids = IdManager::with_allocated(3);
    assert!(ids.free(0).unwrap());
    assert!(!ids.free(0).unwrap());
    assert_eq!(ids.id_count(), 2);
}

#[test]
fn free_beyond_domain_fails() {
    let mut ids = IdManager::with_allocated(2);
    let err = ids.free(5).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));

    let mut empty = IdManager::new();
    assert!(empty.free(0).is_err());
}

// =============================================================================
// Generations
// =============================================================================

#[test]
fn generations_advance_on_free() {
    let mut ids = IdManager::with_allocated(3);
    let before = ids.generation(1).unwrap();
    ids.free(1).unwrap();
    assert!(!ids.is_generation_current(1, before));

    assert_eq!(ids.new_id(), 1);
    assert_eq!(ids.generation(1), Some(before + 1));
    assert!(ids.is_generation_current(1, before + 1));
}

#[test]
fn clear_invalidates_every_generation() {
    let mut ids = IdManager::with_allocated(3);
    let generations: Vec<_> = (0..3).map(|id| ids.generation(id).unwrap()).collect();
    ids.clear();
    assert!(ids.is_empty());
    for (id, generation) in generations.into_iter().enumerate() {
        assert!(!ids.is_generation_current(id, generation));
    }
    assert_eq!(ids.new_id(), 0);
}

// =============================================================================
// Iteration
// =============================================================================

#[test]
fn iteration_skips_holes_both_ways() {
    let mut ids = IdManager::with_allocated(6);
    ids.free(1).unwrap();
    ids.free(3).unwrap();
    assert_eq!(ids.iter().collect::<Vec<_>>(), vec![0, 2, 4, 5]);
    assert_eq!(ids.iter_rev().collect::<Vec<_>>(), vec![5, 4, 2, 0]);
    assert_eq!(ids.min_id(), Some(0));
}

#[test]
fn removal_through_iterator() {
    let mut ids = IdManager::with_allocated(5);
    let mut it = ids.iter();
    while let Some(id) = it.next_row() {
        if id % 2 == 1 {
            it.remove_from(&mut ids).unwrap();
        }
    }
    assert_eq!(ids.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
}

#[test]
fn outside_change_invalidates_iterator() {
    let mut ids = IdManager::with_allocated(3);
    let mut it = ids.iter();
    it.next_row();
    ids.new_id();
    let err = it.remove_from(&mut ids).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ConcurrentModification { .. }));
}
