//! Single-instance launch of the configured target.
pub mod config;
pub mod guard;
pub mod runtime;
