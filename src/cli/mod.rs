//! Command implementations for the `dscore` binary.

pub mod commands;
