//! Working directory lock
//!
//! Provides exclusive locking so two prepare runs never stage into the
//! same directory at once.

use super::error::{Result, StageError};
use fs2::FileExt;
use std::fs::File;
use std::path::Path;

/// Lock file name, created inside the working directory.
///
/// The file is never removed: every run must lock the same inode. Only the
/// `fs2` lock on it matters, and the OS drops that when its holder exits.
pub const LOCK_FILE_NAME: &str = ".prepare.lock";

/// Acquire an exclusive lock on a working directory.
/// Returns a guard that releases the lock when dropped.
pub fn acquire_dir_lock(work_dir: &Path) -> Result<DirLock> {
    let lock_path = work_dir.join(LOCK_FILE_NAME);

    let lock_file = File::options()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .map_err(StageError::io("create lock file", &lock_path))?;

    if lock_file.try_lock_exclusive().is_err() {
        return Err(StageError::Locked(lock_path));
    }

    Ok(DirLock { file: lock_file })
}

/// RAII guard for the directory lock - releases the lock when dropped
#[derive(Debug)]
pub struct DirLock {
    file: File,
}

impl Drop for DirLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
