use std::path::Path;

use crate::lib::errors::ConfigError;

/// Size of every configuration field, terminator included.
pub const FIELD_CAPACITY: usize = 256;

/// INI keys read from the launch section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    Command,
    StartupPath,
    Arguments,
    Boot,
    Machine,
    Display,
    Clock,
    Tablet,
    Virtual,
    Network,
}

impl FieldKey {
    pub const ALL: [FieldKey; 10] = [
        FieldKey::Command,
        FieldKey::StartupPath,
        FieldKey::Arguments,
        FieldKey::Boot,
        FieldKey::Machine,
        FieldKey::Display,
        FieldKey::Clock,
        FieldKey::Tablet,
        FieldKey::Virtual,
        FieldKey::Network,
    ];

    pub const fn key(&self) -> &'static str {
        match self {
            FieldKey::Command => "Command",
            FieldKey::StartupPath => "StartupPath",
            FieldKey::Arguments => "Arguments",
            FieldKey::Boot => "Boot",
            FieldKey::Machine => "Machine",
            FieldKey::Display => "Display",
            FieldKey::Clock => "Clock",
            FieldKey::Tablet => "Tablet",
            FieldKey::Virtual => "Virtual",
            FieldKey::Network => "Network",
        }
    }
}

/// The seven positional fields, joined in this order at launch time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalArguments {
    pub boot: String,
    pub machine: String,
    pub display: String,
    pub clock: String,
    pub tablet: String,
    pub virt: String,
    pub network: String,
}

impl PositionalArguments {
    pub fn in_launch_order(&self) -> [&str; 7] {
        [
            &self.boot,
            &self.machine,
            &self.display,
            &self.clock,
            &self.tablet,
            &self.virt,
            &self.network,
        ]
    }
}

/// How the child's argument string is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchArguments {
    /// `Arguments` key present: passed through unmodified.
    Verbatim(String),
    /// No `Arguments` key: the positional fields are rendered and joined.
    Positional(PositionalArguments),
}

/// Launch settings read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchParameters {
    pub command: String,
    pub startup_path: String,
    pub arguments: LaunchArguments,
}

/// Reject values that would not fit a `FIELD_CAPACITY` buffer with room to spare.
pub fn check_capacity(path: &Path, key: FieldKey, value: &str) -> Result<(), ConfigError> {
    let length = value.chars().count();
    if length >= FIELD_CAPACITY - 1 {
        return Err(ConfigError::FieldTooLong {
            path: path.to_path_buf(),
            field: key.key(),
            length,
            capacity: FIELD_CAPACITY,
        });
    }
    Ok(())
}
