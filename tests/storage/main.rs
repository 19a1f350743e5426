//! Integration tests for Layer 1: Storage
//!
//! Tests for id allocation, permutations, columns, tables, row handles,
//! and change notification.

mod id_manager;
mod notification;
mod permutation;
mod scenario;
mod tables;
