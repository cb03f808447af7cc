//! Entry point for qemu-control.
use std::process;

use qemu_control::{
    cli::{parse_command_line, ParsedCommand},
    launcher::{
        guard::{SingleInstanceGuard, LOCK_NAME},
        runtime::{self, SystemLauncher, FAILURE_EXIT_CODE},
    },
    lib::telemetry,
};
use tracing::{info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = bootstrap().await;
    process::exit(code);
}

async fn bootstrap() -> i32 {
    // Logging is optional; a failed subscriber setup must not change the exit status.
    let _ = telemetry::init_tracing();

    let args = match parse_command_line(std::env::args_os()) {
        ParsedCommand::Launch(args) => args,
        ParsedCommand::Informational => return 0,
        ParsedCommand::Rejected => return FAILURE_EXIT_CODE,
    };
    let profile = match args.build() {
        Ok(profile) => profile,
        Err(err) => {
            warn!(target: "qemu_control::runtime", reason = ?err, "Failed to resolve launch profile");
            return FAILURE_EXIT_CODE;
        }
    };

    info!(
        target: "qemu_control::config",
        path = %profile.config_path.display(),
        source = profile.config_source.as_str(),
        "Resolved configuration path"
    );

    let guard = SingleInstanceGuard::system(LOCK_NAME);
    runtime::run(&profile, &guard, &SystemLauncher)
        .await
        .report()
}
