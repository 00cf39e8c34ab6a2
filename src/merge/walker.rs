//! Index-Wide Merge Walker: iterates unmerged index entries, grouped by
//! path, and feeds each triple to the merge dispatcher.

use crate::error::Result;
use crate::git::Repository;
use crate::merge::content::ContentMerger;
use crate::merge::dispatch::merge_three_way;
use crate::merge::types::{GitMode, MergeOutcome, MergeTriple};

/// Merges a single path. No-op if it is already at stage 0 (merged).
pub fn merge_index_path(
    repo: &Repository,
    index: &mut git2::Index,
    merger: &dyn ContentMerger,
    path: &str,
) -> Result<MergeOutcome> {
    let [orig, ours, theirs] = Repository::stage_triple(index, path);
    if orig.is_none() && ours.is_none() && theirs.is_none() {
        return Ok(MergeOutcome::Resolved);
    }

    let triple = MergeTriple::new(
        path,
        orig.map(|e| (e.id, GitMode(e.mode))),
        ours.map(|e| (e.id, GitMode(e.mode))),
        theirs.map(|e| (e.id, GitMode(e.mode))),
    );

    merge_three_way(repo, index, merger, &triple)
}

/// Sweeps every unmerged path in the index. The set of paths to visit is
/// snapshotted up front, so collapsing a path's three stage entries into
/// one (as `merge_index_path` does on success) can never desynchronize a
/// cursor the way a raw position index into the live index would: every
/// path recorded in the snapshot is visited exactly once regardless of how
/// much the live index shrinks underneath it.
///
/// `quiet` suppresses per-path failure diagnostics; `oneshot` keeps going
/// after a failure and reports an aggregate non-zero status at the end
/// instead of returning on the first one.
pub fn merge_all_index(
    repo: &Repository,
    index: &mut git2::Index,
    merger: &dyn ContentMerger,
    quiet: bool,
    oneshot: bool,
) -> Result<i32> {
    let mut seen = std::collections::HashSet::new();
    let mut paths = Vec::new();
    for entry in Repository::unmerged_entries(index) {
        if seen.insert(entry.path.clone()) {
            paths.push(entry.path);
        }
    }

    let mut rc = 0;
    for path in paths {
        match merge_index_path(repo, index, merger, &path) {
            Ok(MergeOutcome::Resolved) => {}
            Ok(MergeOutcome::ConflictKept) => {
                rc = 1;
                if !quiet {
                    eprintln!("{path}: merge program failed to merge");
                }
                if !oneshot {
                    return Ok(rc);
                }
            }
            Err(e) => {
                rc = 1;
                if !quiet {
                    eprintln!("{path}: {e}");
                }
                if !oneshot {
                    return Err(e);
                }
            }
        }
    }
    Ok(rc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_outcome_is_copy_and_comparable() {
        assert_eq!(MergeOutcome::Resolved, MergeOutcome::Resolved);
        assert_ne!(MergeOutcome::Resolved, MergeOutcome::ConflictKept);
    }
}
