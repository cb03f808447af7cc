//! Child process construction, launch and exit-code collection.
use std::{future::Future, path::PathBuf, process::ExitStatus};

use tokio::process::{Child, Command};
use tracing::info;

use crate::{
    launcher::config::{LaunchArguments, LaunchParameters},
    lib::{
        errors::{FormatError, LaunchError},
        format::{is_valid_template, FormatBuffer, Template, ARGUMENT_CAPACITY},
    },
};

/// Template joining the seven positional fields.
pub const POSITIONAL_TEMPLATE: &str = "%s %s %s %s %s %s %s";

const _: () = assert!(is_valid_template(POSITIONAL_TEMPLATE));

/// Everything needed to start the target executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub program: String,
    /// The argument string before splitting, as configured or rendered.
    pub arguments: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl LaunchRequest {
    /// Turn loaded parameters into a launch request.
    ///
    /// Fails with `CommandEmpty` when there is nothing to launch and with
    /// `ArgumentSplit` when the argument string has unbalanced quoting.
    pub fn from_parameters(params: &LaunchParameters) -> Result<Self, LaunchError> {
        if params.command.is_empty() {
            return Err(LaunchError::CommandEmpty);
        }

        let arguments = build_argument_string(&params.arguments)?;
        let args = match shell_words::split(&arguments) {
            Ok(args) => args,
            Err(source) => return Err(LaunchError::ArgumentSplit { arguments, source }),
        };
        let working_dir = (!params.startup_path.is_empty())
            .then(|| PathBuf::from(&params.startup_path));

        Ok(Self {
            program: params.command.clone(),
            arguments,
            args,
            working_dir,
        })
    }

    /// Build the `tokio` command for this request.
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

/// Produce the argument string: verbatim, or the positional fields rendered
/// through [`POSITIONAL_TEMPLATE`] within [`ARGUMENT_CAPACITY`].
pub fn build_argument_string(arguments: &LaunchArguments) -> Result<String, FormatError> {
    match arguments {
        LaunchArguments::Verbatim(text) => Ok(text.clone()),
        LaunchArguments::Positional(fields) => {
            let template = Template::parse(POSITIONAL_TEMPLATE)?;
            let mut buffer = FormatBuffer::<ARGUMENT_CAPACITY>::new();
            buffer.print(&template, &fields.in_launch_order());
            Ok(buffer.into_string())
        }
    }
}

/// Seam between the orchestrator and the operating system.
pub trait ProcessLauncher {
    /// Start `request`, block until it exits and return its exit code.
    fn run(&self, request: &LaunchRequest) -> impl Future<Output = Result<i32, LaunchError>>;
}

/// Launches real processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    async fn run(&self, request: &LaunchRequest) -> Result<i32, LaunchError> {
        let child = ChildProcess::spawn(request)?;
        child.wait_for_exit_code().await
    }
}

/// A launched target, owned until its exit code has been collected.
#[derive(Debug)]
pub struct ChildProcess {
    child: Child,
    program: String,
}

impl ChildProcess {
    pub fn spawn(request: &LaunchRequest) -> Result<Self, LaunchError> {
        let child = request
            .command()
            .spawn()
            .map_err(|err| LaunchError::LaunchFailed {
                program: request.program.clone(),
                message: err.to_string(),
            })?;

        info!(
            target: "qemu_control::runtime",
            program = %request.program,
            arguments = %request.arguments,
            working_dir = ?request.working_dir,
            pid = child.id(),
            "Started child process"
        );

        Ok(Self {
            child,
            program: request.program.clone(),
        })
    }

    /// Wait without a timeout, then extract the exit code.
    pub async fn wait_for_exit_code(mut self) -> Result<i32, LaunchError> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|source| LaunchError::WaitFailed {
                program: self.program.clone(),
                source,
            })?;
        exit_code(&self.program, status)
    }
}

fn exit_code(program: &str, status: ExitStatus) -> Result<i32, LaunchError> {
    status
        .code()
        .ok_or_else(|| LaunchError::ExitCodeUnavailable {
            program: program.to_string(),
            status: status.to_string(),
        })
}
