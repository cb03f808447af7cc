//! CLI entrypoint module structure.
use clap::{error::ErrorKind, Parser};

pub mod args;
pub mod profile;

pub use args::LaunchProfileArgs;
pub use profile::{resolve_config_path, ConfigSource, LaunchProfile, CONFIG_ENV, DEFAULT_CONFIG};

/// Result of parsing the process command line.
#[derive(Debug)]
pub enum ParsedCommand {
    /// Run the launch sequence with these arguments.
    Launch(LaunchProfileArgs),
    /// `--help` or `--version` was requested; the text was already printed.
    Informational,
    /// The command line was rejected; the message was already printed.
    Rejected,
}

/// Parse the process command line without letting clap exit the process.
///
/// clap's own exit code for usage errors would collide with the child's
/// pass-through codes, so usage errors are reported as `Rejected` instead.
pub fn parse_command_line<I, T>(args: I) -> ParsedCommand
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match LaunchProfileArgs::try_parse_from(args) {
        Ok(args) => ParsedCommand::Launch(args),
        Err(err) => {
            let _ = err.print();
            match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ParsedCommand::Informational,
                _ => ParsedCommand::Rejected,
            }
        }
    }
}
