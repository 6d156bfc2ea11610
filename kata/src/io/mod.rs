//! I/O helpers for `kata` commands.

pub mod config;
pub mod timeout;
