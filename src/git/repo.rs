//! Repository handle threaded explicitly through the hook dispatcher and
//! merge engine, rather than relying on a process-wide current-repository
//! static.

use std::path::{Path, PathBuf};

use git2::{Config, IndexEntry, Oid, Repository as Git2Repository};

use crate::error::{GithookedError, Result};
use crate::git::lock::LockedIndex;

const STAGE_MASK: u16 = 0x3000;
const STAGE_SHIFT: u32 = 12;

/// One unmerged index entry, reduced to what the merge walker needs.
#[derive(Debug, Clone)]
pub struct IndexStageEntry {
    pub path: String,
    pub stage: u16,
    pub id: Oid,
    pub mode: u32,
}

/// Wraps a `git2::Repository` and exposes exactly the object-store/index
/// operations the merge engine and hook dispatcher need.
pub struct Repository {
    inner: Git2Repository,
}

impl Repository {
    pub fn discover(start: &Path) -> Result<Self> {
        Ok(Self {
            inner: Git2Repository::discover(start)?,
        })
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            inner: Git2Repository::open(path)?,
        })
    }

    pub fn git_dir(&self) -> &Path {
        self.inner.path()
    }

    pub fn workdir(&self) -> Result<&Path> {
        self.inner
            .workdir()
            .ok_or(GithookedError::Invariant("repository has no working tree"))
    }

    pub fn config(&self) -> Result<Config> {
        Ok(self.inner.config()?)
    }

    pub fn lock_index(&self) -> Result<LockedIndex> {
        LockedIndex::acquire(self.git_dir())
    }

    /// Path to the legacy per-event hook script, without probing existence.
    pub fn hook_path(&self, event: &str) -> PathBuf {
        self.git_dir().join("hooks").join(event)
    }

    // -- object store --------------------------------------------------

    pub fn read_blob(&self, oid: Oid) -> Result<Vec<u8>> {
        Ok(self.inner.find_blob(oid)?.content().to_vec())
    }

    pub fn write_blob(&self, data: &[u8]) -> Result<Oid> {
        Ok(self.inner.blob(data)?)
    }

    pub fn find_commit(&self, oid: Oid) -> Result<git2::Commit<'_>> {
        Ok(self.inner.find_commit(oid)?)
    }

    pub fn find_tree(&self, oid: Oid) -> Result<git2::Tree<'_>> {
        Ok(self.inner.find_tree(oid)?)
    }

    pub fn resolve_to_tree(&self, spec: &str) -> Result<git2::Tree<'_>> {
        let obj = self.inner.revparse_single(spec)?;
        Ok(obj.peel_to_tree()?)
    }

    pub fn resolve_to_commit(&self, spec: &str) -> Result<git2::Commit<'_>> {
        let obj = self.inner.revparse_single(spec)?;
        Ok(obj.peel_to_commit()?)
    }

    /// True iff the index has no differences against `tree`.
    pub fn diff_tree_to_index_empty(&self, tree: &git2::Tree<'_>, index: &git2::Index) -> Result<bool> {
        let diff = self.inner.diff_tree_to_index(Some(tree), Some(index), None)?;
        Ok(diff.deltas().len() == 0)
    }

    /// Paths that differ between `tree` and the index, for a dirty-working-copy diagnostic.
    pub fn diff_tree_to_index_paths(&self, tree: &git2::Tree<'_>, index: &git2::Index) -> Result<Vec<String>> {
        let diff = self.inner.diff_tree_to_index(Some(tree), Some(index), None)?;
        Ok(diff
            .deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.display().to_string()))
            .collect())
    }

    pub fn merge_base_many(&self, oids: &[Oid]) -> Result<Oid> {
        Ok(self.inner.merge_base_many(oids)?)
    }

    /// Best-effort "pretty" name for a commit: the shortest local branch or
    /// tag pointing at it, falling back to an abbreviated oid.
    pub fn describe_commit(&self, oid: Oid) -> String {
        if let Ok(refs) = self.inner.references() {
            for r in refs.flatten() {
                if r.target() == Some(oid) {
                    if let Some(shorthand) = r.shorthand() {
                        return shorthand.to_string();
                    }
                }
            }
        }
        let hex = oid.to_string();
        hex[..hex.len().min(12)].to_string()
    }

    // -- index -----------------------------------------------------------

    pub fn index(&self) -> Result<git2::Index> {
        Ok(self.inner.index()?)
    }

    pub fn set_index(&self, index: &mut git2::Index) -> Result<()> {
        Ok(self.inner.set_index(index)?)
    }

    pub fn write_tree_from(&self, index: &mut git2::Index) -> Result<Oid> {
        Ok(index.write_tree_to(&self.inner)?)
    }

    pub fn is_head_unborn(&self) -> Result<bool> {
        Ok(self.inner.head().is_err())
    }

    pub fn merge_trees(
        &self,
        ancestor: Option<&git2::Tree<'_>>,
        ours: &git2::Tree<'_>,
        theirs: &git2::Tree<'_>,
        opts: Option<&git2::MergeOptions>,
    ) -> Result<git2::Index> {
        Ok(self.inner.merge_trees(ancestor, ours, theirs, opts)?)
    }

    pub fn checkout_index(&self, index: Option<&mut git2::Index>, opts: Option<&mut git2::build::CheckoutBuilder<'_>>) -> Result<()> {
        Ok(self.inner.checkout_index(index, opts)?)
    }

    /// All entries with stage != 0, grouped by path in index order.
    pub fn unmerged_entries(index: &git2::Index) -> Vec<IndexStageEntry> {
        index
            .iter()
            .filter_map(|e| {
                let stage = entry_stage(&e);
                if stage == 0 {
                    return None;
                }
                let path = String::from_utf8_lossy(&e.path).into_owned();
                Some(IndexStageEntry {
                    path,
                    stage,
                    id: e.id,
                    mode: e.mode,
                })
            })
            .collect()
    }

    /// The (orig, ours, theirs) triple of stage entries for a single path,
    /// assuming the index entries for that path are contiguous, which holds
    /// immediately after a tree unpack or merge.
    pub fn stage_triple(index: &git2::Index, path: &str) -> [Option<IndexStageEntry>; 3] {
        let mut out: [Option<IndexStageEntry>; 3] = [None, None, None];
        for e in index.iter() {
            if e.path != path.as_bytes() {
                continue;
            }
            let stage = entry_stage(&e);
            if stage == 0 {
                continue;
            }
            out[(stage - 1) as usize] = Some(IndexStageEntry {
                path: path.to_string(),
                stage,
                id: e.id,
                mode: e.mode,
            });
        }
        out
    }

    pub fn remove_all_stages(index: &mut git2::Index, path: &str) -> Result<()> {
        for stage in 1..=3i32 {
            let _ = index.remove(Path::new(path), stage);
        }
        let _ = index.remove(Path::new(path), 0);
        Ok(())
    }

    pub fn stage_clean(index: &mut git2::Index, path: &str, id: Oid, mode: u32) -> Result<()> {
        Self::remove_all_stages(index, path)?;
        let entry = make_entry(path, id, mode, 0);
        index.add(&entry)?;
        Ok(())
    }

    // -- working tree ------------------------------------------------------

    pub fn worktree_path(&self, path: &str) -> Result<PathBuf> {
        Ok(self.workdir()?.join(path))
    }

    pub fn worktree_file_exists(&self, path: &str) -> Result<bool> {
        Ok(self.worktree_path(path)?.exists())
    }

    pub fn unlink_worktree_file(&self, path: &str) -> Result<()> {
        let full = self.worktree_path(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GithookedError::WriteFailed { path: full, source: e }),
        }
    }

    /// Writes `content` to the working tree at `path` with the executable
    /// or symlink bit implied by `mode`, unlinking any existing file first.
    pub fn checkout_blob(&self, path: &str, content: &[u8], mode: u32) -> Result<()> {
        let full = self.worktree_path(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| GithookedError::WriteFailed { path: parent.to_path_buf(), source: e })?;
        }
        self.unlink_worktree_file(path)?;

        if is_symlink_mode(mode) {
            let target = String::from_utf8_lossy(content).into_owned();
            #[cfg(unix)]
            {
                std::os::unix::fs::symlink(&target, &full)
                    .map_err(|e| GithookedError::WriteFailed { path: full.clone(), source: e })?;
            }
            #[cfg(not(unix))]
            {
                std::fs::write(&full, content)
                    .map_err(|e| GithookedError::WriteFailed { path: full.clone(), source: e })?;
            }
            return Ok(());
        }

        std::fs::write(&full, content)
            .map_err(|e| GithookedError::WriteFailed { path: full.clone(), source: e })?;

        #[cfg(unix)]
        if is_executable_mode(mode) {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&full)
                .map_err(|e| GithookedError::WriteFailed { path: full.clone(), source: e })?
                .permissions();
            perms.set_mode(perms.mode() | 0o111);
            std::fs::set_permissions(&full, perms)
                .map_err(|e| GithookedError::WriteFailed { path: full.clone(), source: e })?;
        }

        Ok(())
    }
}

fn entry_stage(entry: &IndexEntry) -> u16 {
    (entry.flags & STAGE_MASK) >> STAGE_SHIFT
}

fn make_entry(path: &str, id: Oid, mode: u32, stage: u16) -> IndexEntry {
    IndexEntry {
        ctime: git2::IndexTime::new(0, 0),
        mtime: git2::IndexTime::new(0, 0),
        dev: 0,
        ino: 0,
        mode,
        uid: 0,
        gid: 0,
        file_size: 0,
        id,
        flags: (stage << STAGE_SHIFT) & STAGE_MASK,
        flags_extended: 0,
        path: path.as_bytes().to_vec(),
    }
}

pub fn is_executable_mode(mode: u32) -> bool {
    mode & 0o111 != 0 && !is_symlink_mode(mode) && !is_tree_mode(mode)
}

pub fn is_symlink_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o120000
}

pub fn is_gitlink_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o160000
}

pub fn is_tree_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o040000
}

pub fn is_regular_mode(mode: u32) -> bool {
    mode & 0o170000 == 0o100000
}
