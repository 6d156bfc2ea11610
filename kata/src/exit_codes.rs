//! Stable exit codes for `kata` CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Command failed due to invalid input, config, or a rejected operation.
pub const INVALID: i32 = 1;
/// The operation did not finish within the configured timeout.
pub const TIMEOUT: i32 = 2;
