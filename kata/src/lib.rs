//! Small, independent utility exercises.
//!
//! The crate keeps the same split the binaries rely on:
//!
//! - **[`core`]**: Pure, deterministic utilities (accounts, deep flatten,
//!   fuzzy strings, range parsing). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting helpers (config files, timeout-guarded worker
//!   threads).
//!
//! The `kata` binary wires both together behind a small CLI.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use crate::core::account::{Account, ValidationError};
pub use crate::core::flatten::{DeepFlatten, Nested, deep_flatten};
pub use crate::core::fuzzy::{FoldMode, FuzzyString, FuzzyText};
pub use crate::core::ranges::{ArrowPolicy, ParseRanges, RangeError, RangeParser, parse_ranges};
pub use crate::core::registry::{AccountNumber, AccountRegistry, RegistryError};
