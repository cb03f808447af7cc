use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use tempfile::TempDir;

pub const BINARY_PATH: &str = env!("CARGO_BIN_EXE_qemu-control");
/// `-1` as seen by a Unix parent.
pub const FAILURE_STATUS: i32 = 255;

/// Scratch directory holding config files, the lock directory and a work directory.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create sandbox")?;
        fs::create_dir_all(dir.path().join("locks")).context("failed to create lock dir")?;
        fs::create_dir_all(dir.path().join("work")).context("failed to create work dir")?;
        Ok(Self { dir })
    }

    pub fn lock_dir(&self) -> PathBuf {
        self.dir.path().join("locks")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    pub fn write_config(&self, name: &str, body: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(name);
        fs::write(&path, body).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Launcher command isolated to this sandbox's lock directory.
    pub fn launcher(&self) -> Command {
        let mut command = Command::new(BINARY_PATH);
        command
            .env("TMPDIR", self.lock_dir())
            .env_remove("RUST_LOG")
            .env_remove("QEMU_CONTROL_CONFIG")
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }

    pub fn run_with(&self, config: &Path) -> Result<Option<i32>> {
        let status = self
            .launcher()
            .arg(config)
            .status()
            .context("failed to run launcher")?;
        Ok(status.code())
    }
}

pub fn wait_for_file(path: &Path, timeout: Duration) -> Result<()> {
    let deadline = Instant::now() + timeout;
    while !path.exists() {
        if Instant::now() > deadline {
            bail!("timed out waiting for {}", path.display());
        }
        thread::sleep(Duration::from_millis(20));
    }
    Ok(())
}
