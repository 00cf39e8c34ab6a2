//! RAII index lock.
//!
//! libgit2 already takes its own internal lock when `Index::write()` runs;
//! this wrapper additionally enforces *our* mutual-exclusion contract so two
//! merge operations in this process (or two invocations racing on the same
//! working copy) don't interleave index mutations. A marker file is created
//! on acquire and removed on both `commit` and `rollback`, matching "every
//! acquired index lock is released on both success and failure paths."

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::error::{GithookedError, Result};

/// Holds an on-disk marker for the duration of an index-mutating operation.
pub struct LockedIndex {
    marker: PathBuf,
    active: bool,
}

impl LockedIndex {
    /// Acquire the lock for the repository rooted at `git_dir`.
    ///
    /// Fails if another `LockedIndex` for this repository is already held.
    pub fn acquire(git_dir: &Path) -> Result<Self> {
        let marker = git_dir.join("githooked-merge.lock");
        match File::options().write(true).create_new(true).open(&marker) {
            Ok(_) => Ok(Self {
                marker,
                active: true,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                Err(GithookedError::IndexLocked(marker))
            }
            Err(e) => Err(GithookedError::Io(e)),
        }
    }

    /// Release the lock after a successful write. Identical to `rollback`
    /// except for what it communicates at the call site.
    pub fn commit(mut self) -> Result<()> {
        self.release()
    }

    /// Release the lock after an aborted operation.
    pub fn rollback(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if self.active {
            self.active = false;
            match fs::remove_file(&self.marker) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(GithookedError::Io(e)),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for LockedIndex {
    fn drop(&mut self) {
        if self.active {
            let _ = fs::remove_file(&self.marker);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn acquire_then_commit_clears_marker() {
        let dir = TempDir::new().unwrap();
        let lock = LockedIndex::acquire(dir.path()).unwrap();
        let marker = dir.path().join("githooked-merge.lock");
        assert!(marker.exists());
        lock.commit().unwrap();
        assert!(!marker.exists());
    }

    #[test]
    fn double_acquire_fails() {
        let dir = TempDir::new().unwrap();
        let _lock = LockedIndex::acquire(dir.path()).unwrap();
        assert!(LockedIndex::acquire(dir.path()).is_err());
    }

    #[test]
    fn drop_without_commit_releases() {
        let dir = TempDir::new().unwrap();
        let marker = dir.path().join("githooked-merge.lock");
        {
            let _lock = LockedIndex::acquire(dir.path()).unwrap();
            assert!(marker.exists());
        }
        assert!(!marker.exists());
    }
}
