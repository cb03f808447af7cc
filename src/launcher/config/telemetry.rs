use std::path::Path;

use tracing::{debug, info};

use super::{LaunchArguments, LaunchParameters};

pub fn log_missing_section(path: &Path, section: &str) {
    debug!(
        target: "qemu_control::config",
        path = %path.display(),
        section,
        "Section not found; every field defaults to empty"
    );
}

pub fn log_loaded(path: &Path, params: &LaunchParameters) {
    let variant = match params.arguments {
        LaunchArguments::Verbatim(_) => "verbatim",
        LaunchArguments::Positional(_) => "positional",
    };
    info!(
        target: "qemu_control::config",
        path = %path.display(),
        command = %params.command,
        startup_path = %params.startup_path,
        arguments = variant,
        "Configuration file loaded successfully"
    );
}
