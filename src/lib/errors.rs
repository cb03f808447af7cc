use std::{io, path::PathBuf};

use ini::ParseError as IniParseError;
use thiserror::Error;

/// Errors that can occur while loading launch parameters from the INI file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was read but is not valid INI.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: IniParseError,
    },
    /// A value does not fit into its field.
    #[error(
        "Configuration file {path} has `{field}` of {length} characters (limit {limit})",
        limit = .capacity - 2
    )]
    FieldTooLong {
        path: PathBuf,
        field: &'static str,
        length: usize,
        capacity: usize,
    },
}

impl ConfigError {
    /// Helper to wrap an INI syntax error as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: IniParseError) -> Self {
        Self::Parse { path, source }
    }
}

/// Template validation failures reported by `Template::parse`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("unsupported conversion `%{conversion}` at byte {offset}; only `%s` and `%%` are allowed")]
    UnsupportedConversion { conversion: char, offset: usize },
    #[error("template ends with a lone `%` at byte {offset}")]
    DanglingPercent { offset: usize },
}

/// Failures while acquiring the single-instance lock.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Failed to create instance lock {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Terminal failures of the launch sequence. Every variant exits with -1.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("instance lock could not be created")]
    LockCreationFailed(#[source] GuardError),
    #[error("configuration field overflow")]
    ConfigFieldOverflow(#[source] ConfigError),
    #[error("configuration could not be loaded")]
    Config(#[source] ConfigError),
    #[error("`Command` is empty; nothing to launch")]
    CommandEmpty,
    #[error("argument template is invalid")]
    InvalidTemplate(#[source] FormatError),
    #[error("failed to split arguments `{arguments}`")]
    ArgumentSplit {
        arguments: String,
        #[source]
        source: shell_words::ParseError,
    },
    #[error("failed to launch `{program}`: {message}")]
    LaunchFailed { program: String, message: String },
    #[error("failed waiting for `{program}`")]
    WaitFailed {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("`{program}` terminated without an exit code ({status})")]
    ExitCodeUnavailable { program: String, status: String },
}

impl From<GuardError> for LaunchError {
    fn from(value: GuardError) -> Self {
        Self::LockCreationFailed(value)
    }
}

impl From<FormatError> for LaunchError {
    fn from(value: FormatError) -> Self {
        Self::InvalidTemplate(value)
    }
}

impl From<ConfigError> for LaunchError {
    fn from(value: ConfigError) -> Self {
        match value {
            ConfigError::FieldTooLong { .. } => Self::ConfigFieldOverflow(value),
            other => Self::Config(other),
        }
    }
}

impl LaunchError {
    /// Stable snake_case code used in telemetry.
    pub const fn code(&self) -> &'static str {
        match self {
            LaunchError::LockCreationFailed(_) => "lock_creation_failed",
            LaunchError::ConfigFieldOverflow(_) => "config_field_overflow",
            LaunchError::Config(_) => "config_unreadable",
            LaunchError::CommandEmpty => "command_empty",
            LaunchError::InvalidTemplate(_) => "invalid_template",
            LaunchError::ArgumentSplit { .. } => "argument_split_failed",
            LaunchError::LaunchFailed { .. } => "launch_failed",
            LaunchError::WaitFailed { .. } => "wait_failed",
            LaunchError::ExitCodeUnavailable { .. } => "exit_code_unavailable",
        }
    }
}
