//! Shared library modules providing error types, argument formatting, and telemetry initialization.

pub mod errors;
pub mod format;
pub mod telemetry;
