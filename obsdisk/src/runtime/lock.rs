//! Registry lock: one provisioning at a time per working directory.
//!
//! An exclusive `flock` on `<home>/.lock`. flock locks belong to the open
//! file description, so a second acquisition conflicts whether it comes from
//! another thread or another process. The kernel drops the lock if the
//! holder dies.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use obsdisk_shared::errors::{ObsdiskError, ObsdiskResult};

use crate::runtime::constants::filenames;

/// Held for the whole check-format-register sequence; released on drop.
#[derive(Debug)]
pub(crate) struct RegistryLock {
    file: File,
    lock_path: PathBuf,
}

impl RegistryLock {
    /// Take the lock or fail immediately with `RegistryLocked`.
    pub(crate) fn acquire(home_dir: &Path) -> ObsdiskResult<Self> {
        let lock_path = home_dir.join(filenames::LOCK_FILE);

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| {
                ObsdiskError::Storage(format!(
                    "failed to open registry lock {}: {}",
                    lock_path.display(),
                    e
                ))
            })?;

        if unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) } != 0 {
            let err = io::Error::last_os_error();
            return Err(match err.kind() {
                io::ErrorKind::WouldBlock => ObsdiskError::RegistryLocked(format!(
                    "another obsdisk operation is modifying the registry in {}",
                    home_dir.display()
                )),
                _ => ObsdiskError::Storage(format!("failed to lock registry: {}", err)),
            });
        }

        tracing::debug!(lock_path = %lock_path.display(), "Acquired registry lock");
        Ok(Self { file, lock_path })
    }
}

impl Drop for RegistryLock {
    fn drop(&mut self) {
        unsafe {
            libc::flock(self.file.as_raw_fd(), libc::LOCK_UN);
        }
        tracing::debug!(lock_path = %self.lock_path.display(), "Released registry lock");
    }
}
