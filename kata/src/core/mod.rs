//! Deterministic, pure utilities.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod account;
pub mod flatten;
pub mod fuzzy;
pub mod ranges;
pub mod registry;
