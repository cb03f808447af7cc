use tracing::{warn, Instrument};

use crate::{
    cli::LaunchProfile,
    launcher::{
        config::{LaunchParameters, LAUNCH_SECTION},
        guard::{Acquisition, SingleInstanceGuard},
        runtime::process::{LaunchRequest, ProcessLauncher},
    },
    lib::{errors::LaunchError, telemetry::LaunchSpan},
};

/// Exit status for every orchestration failure.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// How a run ended, and the exit status it maps to.
#[derive(Debug)]
pub enum LaunchOutcome {
    /// The child ran to completion with this exit code.
    Completed(i32),
    /// Another instance holds the lock; nothing was done.
    AlreadyRunning,
    /// The sequence stopped before the child produced an exit code.
    Failed(LaunchError),
}

impl LaunchOutcome {
    /// `0` when another instance is active, the child's code on completion,
    /// `-1` on any failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            LaunchOutcome::Completed(code) => *code,
            LaunchOutcome::AlreadyRunning => 0,
            LaunchOutcome::Failed(_) => FAILURE_EXIT_CODE,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            LaunchOutcome::Completed(_) => "completed",
            LaunchOutcome::AlreadyRunning => "already_running",
            LaunchOutcome::Failed(err) => err.code(),
        }
    }

    pub fn error(&self) -> Option<&LaunchError> {
        match self {
            LaunchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Record failures through `tracing` and return the exit status.
    pub fn report(self) -> i32 {
        if let Some(err) = self.error() {
            warn!(
                target: "qemu_control::runtime",
                code = err.code(),
                reason = %DisplayChain(err),
                "Launch failed"
            );
        }
        self.exit_code()
    }
}

/// Run the full launch sequence once.
///
/// The instance lock lives until this function returns, whichever way the
/// sequence ends.
pub async fn run<L: ProcessLauncher>(
    profile: &LaunchProfile,
    guard: &SingleInstanceGuard,
    launcher: &L,
) -> LaunchOutcome {
    let span = LaunchSpan::start(&profile.config_path.to_string_lossy());
    let outcome = execute(profile, guard, launcher)
        .instrument(span.span().clone())
        .await
        .unwrap_or_else(LaunchOutcome::Failed);
    span.finish(outcome.status(), outcome.exit_code());
    outcome
}

async fn execute<L: ProcessLauncher>(
    profile: &LaunchProfile,
    guard: &SingleInstanceGuard,
    launcher: &L,
) -> Result<LaunchOutcome, LaunchError> {
    let _lock = match guard.acquire()? {
        Acquisition::Created(lock) => lock,
        Acquisition::AlreadyRunning(_) => return Ok(LaunchOutcome::AlreadyRunning),
    };

    let params = LaunchParameters::load(&profile.config_path, LAUNCH_SECTION)?;
    let request = LaunchRequest::from_parameters(&params)?;
    let code = launcher.run(&request).await?;
    Ok(LaunchOutcome::Completed(code))
}

/// Renders an error followed by its `source()` chain.
struct DisplayChain<'a>(&'a LaunchError);

impl std::fmt::Display for DisplayChain<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = std::error::Error::source(self.0);
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
