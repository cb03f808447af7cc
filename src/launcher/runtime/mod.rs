//! Launch orchestration: lock, configuration, child process, exit code.
mod process;
mod startup;

pub use process::{
    build_argument_string, ChildProcess, LaunchRequest, ProcessLauncher, SystemLauncher,
    POSITIONAL_TEMPLATE,
};
pub use startup::{run, LaunchOutcome, FAILURE_EXIT_CODE};
