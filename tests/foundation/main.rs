//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: row ranges and bounds, values, intervals, and errors.

mod errors;
mod rows;
mod values;
