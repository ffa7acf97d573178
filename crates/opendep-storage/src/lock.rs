//! Advisory file locking for record files.
//!
//! Every record file has a companion `.lock` file next to it; readers take
//! a shared OS lock on it, writers an exclusive one. Locks are advisory:
//! any process honoring the same convention shares the repository safely.
//! The lock-file contents are irrelevant and need not be preserved.
//!
//! Acquisition polls within a bounded wait budget rather than blocking
//! indefinitely, so a crashed peer holding a lock surfaces as an error
//! instead of a hang.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::RepositoryError;

/// Total time an acquisition may spend waiting for a contended lock.
pub const LOCK_WAIT_BUDGET: Duration = Duration::from_secs(30);
/// Pause between acquisition attempts on a contended lock.
pub const LOCK_RETRY_INTERVAL: Duration = Duration::from_millis(500);

/// An acquired advisory lock on a companion lock file.
///
/// The lock is released when the guard is dropped. Call
/// [`release`](Self::release) instead when an unlock failure must be
/// observed; `Drop` can only release best-effort.
#[derive(Debug)]
pub struct FileLock {
    path: PathBuf,
    file: Option<File>,
}

enum LockMode {
    Shared,
    Exclusive,
}

impl FileLock {
    /// Acquires an exclusive lock on the lock file at `path`, creating the
    /// file if needed.
    ///
    /// Retries every [`LOCK_RETRY_INTERVAL`] while the lock is contended and
    /// fails with [`RepositoryError::Lock`] once [`LOCK_WAIT_BUDGET`] is
    /// exhausted.
    pub fn acquire_exclusive(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        Self::acquire(path.into(), LockMode::Exclusive)
    }

    /// Acquires a shared lock on the lock file at `path`, creating the file
    /// if needed. Same retry policy as [`acquire_exclusive`](Self::acquire_exclusive).
    pub fn acquire_shared(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        Self::acquire(path.into(), LockMode::Shared)
    }

    fn acquire(path: PathBuf, mode: LockMode) -> Result<Self, RepositoryError> {
        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
        {
            Ok(file) => file,
            Err(_) => return Err(RepositoryError::Lock { path }),
        };

        let deadline = Instant::now() + LOCK_WAIT_BUDGET;
        loop {
            let attempt = match mode {
                LockMode::Shared => fs2::FileExt::try_lock_shared(&file),
                LockMode::Exclusive => fs2::FileExt::try_lock_exclusive(&file),
            };

            match attempt {
                Ok(()) => {
                    return Ok(FileLock {
                        path,
                        file: Some(file),
                    })
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    if Instant::now() >= deadline {
                        return Err(RepositoryError::Lock { path });
                    }
                    thread::sleep(LOCK_RETRY_INTERVAL);
                }
                Err(_) => return Err(RepositoryError::Lock { path }),
            }
        }
    }

    /// Path of the lock file this guard holds.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Releases the lock, reporting an unlock failure to the caller.
    pub fn release(mut self) -> Result<(), io::Error> {
        match self.file.take() {
            Some(file) => file.unlock(),
            None => Ok(()),
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
        }
    }
}
