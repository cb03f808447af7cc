//! LaunchProfile and config path resolution.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub const DEFAULT_CONFIG: &str = "qemu-control.ini";
pub const CONFIG_ENV: &str = "QEMU_CONTROL_CONFIG";

/// Where the configuration path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    Env,
    Default,
}

impl ConfigSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Cli => "cli",
            ConfigSource::Env => "env",
            ConfigSource::Default => "default",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    pub config_source: ConfigSource,
}

/// Resolve config path in the order: CLI argument → env var → default.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Result<(PathBuf, ConfigSource)> {
    resolve_config_path_from(cli_path, env::var_os(CONFIG_ENV))
}

fn resolve_config_path_from(
    cli_path: Option<PathBuf>,
    env_path: Option<OsString>,
) -> Result<(PathBuf, ConfigSource)> {
    let (path, source) = match (cli_path, env_path) {
        (Some(path), _) if !path.as_os_str().is_empty() => (path, ConfigSource::Cli),
        (_, Some(value)) if !value.is_empty() => (PathBuf::from(value), ConfigSource::Env),
        _ => (PathBuf::from(DEFAULT_CONFIG), ConfigSource::Default),
    };

    Ok((absolutize(&path)?, source))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(cwd.join(path))
}
