//! Load launch parameters from the INI configuration file.
use std::{collections::HashMap, fs, io, path::Path};

use ini::{Ini, ParseOption, Properties};
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod fields;
pub mod telemetry;

pub use fields::{
    check_capacity, FieldKey, LaunchArguments, LaunchParameters, PositionalArguments,
    FIELD_CAPACITY,
};

/// Section holding the launch keys.
pub const LAUNCH_SECTION: &str = "QEMU";

const BYTE_ORDER_MARK: char = '\u{feff}';

impl LaunchParameters {
    /// Read every recognized key of `section` from the INI file at `path`.
    ///
    /// A missing file, section or key yields empty strings. Section and key
    /// names are matched case-insensitively and the first occurrence wins.
    /// Values are taken as written: quotes and backslashes are not
    /// interpreted. The only content check is the per-field length limit.
    pub fn load(path: &Path, section: &str) -> Result<Self, ConfigError> {
        info!(
            target: "qemu_control::config",
            path = %path.display(),
            section,
            "Starting configuration load"
        );

        let document = read_document(path)?;
        let entries = match document.as_ref().and_then(|ini| find_section(ini, section)) {
            Some(entries) => entries,
            None => {
                telemetry::log_missing_section(path, section);
                Vec::new()
            }
        };

        let params = Self::from_entries(path, entries).map_err(|err| {
            error!(
                target: "qemu_control::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(path, &params);
        Ok(params)
    }

    fn from_entries(path: &Path, entries: Vec<(String, String)>) -> Result<Self, ConfigError> {
        let mut values = HashMap::with_capacity(FieldKey::ALL.len());
        for key in FieldKey::ALL {
            let Some(value) = lookup(&entries, key.key()) else {
                continue;
            };
            check_capacity(path, key, value)?;
            values.insert(key, value.to_string());
        }

        let verbatim = values.remove(&FieldKey::Arguments);
        let mut take = |key: FieldKey| values.remove(&key).unwrap_or_default();
        let command = take(FieldKey::Command);
        let startup_path = take(FieldKey::StartupPath);
        let arguments = match verbatim {
            Some(verbatim) => LaunchArguments::Verbatim(verbatim),
            None => LaunchArguments::Positional(PositionalArguments {
                boot: take(FieldKey::Boot),
                machine: take(FieldKey::Machine),
                display: take(FieldKey::Display),
                clock: take(FieldKey::Clock),
                tablet: take(FieldKey::Tablet),
                virt: take(FieldKey::Virtual),
                network: take(FieldKey::Network),
            }),
        };

        Ok(Self {
            command,
            startup_path,
            arguments,
        })
    }
}

/// Parse the file at `path`, or `None` when it does not exist.
fn read_document(path: &Path) -> Result<Option<Ini>, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            let error = ConfigError::Read {
                path: path.to_path_buf(),
                source,
            };
            log_failure(path, &error);
            return Err(error);
        }
    };

    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
    };
    let body = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(&text);
    Ini::load_from_str_opt(body, options)
        .map(Some)
        .map_err(|err| {
            let error = ConfigError::from_parse_error(path.to_path_buf(), err);
            log_failure(path, &error);
            error
        })
}

fn log_failure(path: &Path, error: &ConfigError) {
    error!(
        target: "qemu_control::config",
        path = %path.display(),
        reason = %error,
        "Failed to load configuration file"
    );
}

/// Entries of the first section named `section`, in file order.
fn find_section(document: &Ini, section: &str) -> Option<Vec<(String, String)>> {
    document
        .iter()
        .find(|(name, _)| name.is_some_and(|name| name.eq_ignore_ascii_case(section)))
        .map(|(_, properties)| collect_entries(properties))
}

fn collect_entries(properties: &Properties) -> Vec<(String, String)> {
    properties
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// First entry whose key matches, ignoring case.
fn lookup<'a>(entries: &'a [(String, String)], key: &str) -> Option<&'a str> {
    entries
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.as_str())
}
