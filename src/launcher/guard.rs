//! Cross-process single-instance lock.
//!
//! The lock is an exclusive OS file lock on `<dir>/<name>.lock` (`flock` on
//! Unix, `LockFileEx` on Windows). Every process using the same directory and
//! name competes for the same lock, so only one of them sees
//! [`Acquisition::Created`]. The OS drops the lock with the last handle, also
//! when the process is killed. The lock file itself is never removed. Handles
//! are not inherited, so a launched child never keeps the lock alive.

use std::{
    env, fmt,
    fs::{File, OpenOptions, TryLockError},
    io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::lib::errors::GuardError;

/// Fixed identifier shared by every copy of the launcher on this machine.
pub const LOCK_NAME: &str = "qemu-control-c154b33e36c329488700dae19dae8ddf";

/// Outcome of [`SingleInstanceGuard::acquire`].
#[derive(Debug)]
pub enum Acquisition {
    /// This call took the lock; proceed with the launch.
    Created(InstanceLock),
    /// Another instance holds the lock. The handle is still ours to drop.
    AlreadyRunning(InstanceLock),
}

impl Acquisition {
    pub fn is_created(&self) -> bool {
        matches!(self, Acquisition::Created(_))
    }
}

/// Named exclusive lock shared between independently started processes.
#[derive(Debug, Clone)]
pub struct SingleInstanceGuard {
    path: PathBuf,
}

impl SingleInstanceGuard {
    /// Lock `name` inside `dir`.
    pub fn new(dir: impl AsRef<Path>, name: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{name}.lock")),
        }
    }

    /// Lock `name` inside the system temporary directory.
    pub fn system(name: &str) -> Self {
        Self::new(env::temp_dir(), name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Try to take the lock without blocking.
    pub fn acquire(&self) -> Result<Acquisition, GuardError> {
        let create_error = |source: io::Error| GuardError::Create {
            path: self.path.clone(),
            source,
        };

        let file = open_lock_file(&self.path).map_err(create_error)?;
        let held = try_lock_exclusive(&file).map_err(create_error)?;
        let lock = InstanceLock {
            file: Some(file),
            path: self.path.clone(),
            owned: held,
        };
        let acquisition = if held {
            Acquisition::Created(lock)
        } else {
            Acquisition::AlreadyRunning(lock)
        };
        debug!(
            target: "qemu_control::guard",
            path = %self.path.display(),
            acquired = acquisition.is_created(),
            "Instance lock requested"
        );
        Ok(acquisition)
    }
}

/// Open or create the lock file.
///
/// A lock file left behind by another user may not be writable; a read-only
/// handle locks just as well.
fn open_lock_file(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).read(true).write(true).truncate(false);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o666);
    }

    match options.open(path) {
        Err(err) if err.kind() == io::ErrorKind::PermissionDenied => {
            debug!(
                target: "qemu_control::guard",
                path = %path.display(),
                "Lock file not writable, opening read-only"
            );
            File::open(path)
        }
        other => other,
    }
}

/// Handle returned by [`SingleInstanceGuard::acquire`]; released on drop.
pub struct InstanceLock {
    file: Option<File>,
    path: PathBuf,
    owned: bool,
}

impl InstanceLock {
    /// Whether this handle holds the lock.
    pub fn is_owner(&self) -> bool {
        self.owned
    }
}

impl fmt::Debug for InstanceLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceLock")
            .field("path", &self.path)
            .field("owned", &self.owned)
            .finish_non_exhaustive()
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        // Closing the handle releases the lock.
        drop(self.file.take());
        debug!(
            target: "qemu_control::guard",
            path = %self.path.display(),
            owned = self.is_owner(),
            "Instance lock released"
        );
    }
}

/// Try to take an exclusive lock on `file` without blocking.
///
/// Returns `Ok(false)` when another handle holds the lock.
fn try_lock_exclusive(file: &File) -> io::Result<bool> {
    match file.try_lock() {
        Ok(()) => Ok(true),
        Err(TryLockError::WouldBlock) => Ok(false),
        Err(TryLockError::Error(err)) => Err(err),
    }
}
