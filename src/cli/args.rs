//! CLI argument definitions and `LaunchProfile` construction.
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use super::{resolve_config_path, LaunchProfile};

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    version,
    about = "Single-instance QEMU launcher",
    long_about = "Starts the emulator described by the [QEMU] section of an INI file, \
waits for it to exit and returns its exit code. Exits 0 immediately when another \
instance is already running and -1 when the launch could not be performed."
)]
pub struct LaunchProfileArgs {
    /// Path to the INI file (overrides QEMU_CONTROL_CONFIG).
    #[arg(value_name = "CONFIG")]
    pub config: Option<PathBuf>,
}

impl LaunchProfileArgs {
    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let (config_path, config_source) = resolve_config_path(self.config)?;
        Ok(LaunchProfile {
            config_path,
            config_source,
        })
    }
}
