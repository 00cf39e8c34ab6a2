//! Per-Entry Merge Dispatcher (`merge_three_way`): classifies a
//! `MergeTriple` into the correct merge case and applies it.

use crate::error::{GithookedError, Result};
use crate::git::Repository;
use crate::merge::content::{merge_content, ContentMerger};
use crate::merge::types::{MergeOutcome, MergeTriple, Side};

/// Classifies `triple` by the presence bitmap of (orig, ours, theirs) and
/// applies the corresponding action, updating `index` and the working tree.
/// Total over every presence pattern: no input combination panics.
pub fn merge_three_way(
    repo: &Repository,
    index: &mut git2::Index,
    merger: &dyn ContentMerger,
    triple: &MergeTriple,
) -> Result<MergeOutcome> {
    let path = triple.path.as_str();

    match (triple.orig, triple.ours, triple.theirs) {
        // both sides deleted
        (Some(_), None, None) => {
            Repository::remove_all_stages(index, path)?;
            Ok(MergeOutcome::Resolved)
        }

        // deleted in theirs
        (Some(orig), Some(ours), None) => {
            if orig.0 == ours.0 && orig.1 == ours.1 {
                Repository::remove_all_stages(index, path)?;
                repo.unlink_worktree_file(path)?;
                Ok(MergeOutcome::Resolved)
            } else {
                Err(GithookedError::DeletedWithModeChange { path: path.to_string() })
            }
        }

        // deleted in ours
        (Some(orig), None, Some(theirs)) => {
            if orig.0 == theirs.0 && orig.1 == theirs.1 {
                Repository::remove_all_stages(index, path)?;
                repo.unlink_worktree_file(path)?;
                Ok(MergeOutcome::Resolved)
            } else {
                Err(GithookedError::DeletedWithModeChange { path: path.to_string() })
            }
        }

        // added in ours only
        (None, Some(ours), None) => {
            Repository::stage_clean(index, path, ours.0, ours.1 .0)?;
            Ok(MergeOutcome::Resolved)
        }

        // added in theirs only
        (None, None, Some(theirs)) => {
            if repo.worktree_file_exists(path)? {
                return Err(GithookedError::UntrackedOverwritten { path: path.to_string() });
            }
            let content = repo.read_blob(theirs.0)?;
            repo.checkout_blob(path, &content, theirs.1 .0)?;
            Repository::stage_clean(index, path, theirs.0, theirs.1 .0)?;
            Ok(MergeOutcome::Resolved)
        }

        // added identically (same oid) in both
        (None, Some(ours), Some(theirs)) if ours.0 == theirs.0 => {
            if ours.1 != theirs.1 {
                return Err(GithookedError::PermissionsConflict {
                    path: path.to_string(),
                    ours: ours.1 .0,
                    theirs: theirs.1 .0,
                });
            }
            let content = repo.read_blob(ours.0)?;
            repo.checkout_blob(path, &content, ours.1 .0)?;
            Repository::stage_clean(index, path, ours.0, ours.1 .0)?;
            Ok(MergeOutcome::Resolved)
        }

        // true three-way content merge
        (Some(orig), Some(ours), Some(theirs)) => {
            refuse_special(path, ours, theirs)?;
            merge_content(repo, index, merger, path, Some(orig), ours, theirs)
        }

        // add/add with differing content, base treated as empty
        (None, Some(ours), Some(theirs)) => {
            refuse_special(path, ours, theirs)?;
            merge_content(repo, index, merger, path, None, ours, theirs)
        }

        // both absent: not a valid input to this dispatcher
        (None, None, None) => Err(GithookedError::UnhandledCase {
            path: path.to_string(),
            orig: hex(triple.orig),
            ours: hex(triple.ours),
            theirs: hex(triple.theirs),
        }),
    }
}

fn refuse_special(path: &str, ours: (git2::Oid, crate::merge::types::GitMode), theirs: (git2::Oid, crate::merge::types::GitMode)) -> Result<()> {
    if ours.1.is_symlink() || theirs.1.is_symlink() {
        return Err(GithookedError::RefusingSpecialMerge {
            path: path.to_string(),
            kind: "symlink",
        });
    }
    if ours.1.is_gitlink() || theirs.1.is_gitlink() {
        return Err(GithookedError::RefusingSpecialMerge {
            path: path.to_string(),
            kind: "gitlink",
        });
    }
    Ok(())
}

fn hex(side: Side) -> String {
    match side {
        Some((oid, _)) => oid.to_string(),
        None => "0".repeat(40),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_add_identical_mode_mismatch_is_fatal() {
        let oid = git2::Oid::zero();
        let triple = MergeTriple::new(
            "f.txt",
            None,
            Some((oid, crate::merge::types::GitMode::REGULAR)),
            Some((oid, crate::merge::types::GitMode::EXECUTABLE)),
        );
        // This test exercises classification only; dispatching through
        // merge_three_way requires a live Repository + Index, covered by
        // the integration tests. Here we confirm the match arm selection
        // is reachable without a repo by checking the well-formedness and
        // bitmap directly.
        assert!(triple.is_well_formed());
        assert_eq!(triple.ours.unwrap().0, triple.theirs.unwrap().0);
        assert_ne!(triple.ours.unwrap().1, triple.theirs.unwrap().1);
    }
}
