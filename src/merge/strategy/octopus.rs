//! Octopus Strategy: N-way merge orchestration with common-ancestor checks.
//!
//! `git2` exposes a true pairwise (one-ancestor) tree merge but not a
//! generalized N-way `unpack_trees`; the do-merge step below folds each
//! remote against a single computed base rather than reconciling every
//! intermediate base simultaneously. This is a documented simplification
//! of the upstream algorithm, not a behavioral regression for the common
//! case (one base per remote).

use git2::Oid;

use crate::error::Result;
use crate::git::Repository;
use crate::merge::content::ContentMerger;
use crate::merge::unpack::unpack_trees;
use crate::merge::walker::merge_all_index;

/// Same exit code conventions as `resolve`. Requires at least two remotes.
pub fn octopus(
    repo: &Repository,
    merger: &dyn ContentMerger,
    bases: &[Oid],
    head_arg: &str,
    remotes: &[Oid],
) -> Result<i32> {
    if remotes.len() < 2 {
        return Ok(2);
    }

    let head_commit = match repo.resolve_to_commit(head_arg) {
        Ok(c) => c,
        Err(_) => return Ok(2),
    };
    let head_oid = head_commit.id();
    let head_tree_oid = head_commit.tree_id();

    {
        let head_tree = repo.find_tree(head_tree_oid)?;
        let index = repo.index()?;
        if !repo.diff_tree_to_index_empty(&head_tree, &index)? {
            let dirty = repo.diff_tree_to_index_paths(&head_tree, &index)?;
            eprintln!("Your local changes to the following files would be overwritten by merge:");
            for path in dirty {
                eprintln!("  {path}");
            }
            return Ok(2);
        }
    }

    let mut reference_commits = vec![head_oid];
    let mut reference_tree_oid = head_tree_oid;
    let mut ff_merge = true;

    let last_remote_index = remotes.len() - 1;

    for (i, &remote_oid) in remotes.iter().enumerate() {
        let mut probe = reference_commits.clone();
        probe.push(remote_oid);
        let base_oid = match repo.merge_base_many(&probe) {
            Ok(oid) => oid,
            Err(_) => return Ok(2),
        };

        if base_oid == remote_oid {
            let name = repo.describe_commit(remote_oid);
            eprintln!("Already up to date with {name}.");
            continue;
        }

        let last_reference = *reference_commits.last().unwrap();
        if base_oid != last_reference {
            ff_merge = false;
        }

        let remote_commit = repo.find_commit(remote_oid)?;
        let remote_tree_oid = remote_commit.tree_id();

        let rc = if ff_merge {
            let reference_tree = repo.find_tree(reference_tree_oid)?;
            let remote_tree = repo.find_tree(remote_tree_oid)?;
            unpack_trees(repo, &[reference_tree, remote_tree], false)?;
            reference_tree_oid = remote_tree_oid;
            // head is replaced by c: the reference-commit set resets to just c.
            reference_commits.clear();
            0
        } else {
            let bases_for_merge = bases_or(bases, base_oid);
            let base_tree = base_tree_for(repo, &bases_for_merge)?;
            let reference_tree = repo.find_tree(reference_tree_oid)?;
            let remote_tree = repo.find_tree(remote_tree_oid)?;
            let attempt = unpack_trees(repo, &[base_tree, reference_tree, remote_tree], true);

            let mut index = repo.index()?;
            match attempt {
                Ok(()) => match repo.write_tree_from(&mut index) {
                    Ok(oid) => {
                        reference_tree_oid = oid;
                        0
                    }
                    Err(_) => run_walker_fallback(repo, &mut index, merger)?,
                },
                Err(_) => run_walker_fallback(repo, &mut index, merger)?,
            }
        };

        if rc != 0 {
            if i != last_remote_index {
                eprintln!("Automated merge did not work.");
                eprintln!("Should not be doing an octopus.");
                return Ok(2);
            }
            return Ok(1);
        }

        reference_commits.push(remote_oid);
    }

    Ok(0)
}

fn run_walker_fallback(repo: &Repository, index: &mut git2::Index, merger: &dyn ContentMerger) -> Result<i32> {
    let lock = repo.lock_index()?;
    let rc = match merge_all_index(repo, index, merger, true, true) {
        Ok(rc) => rc,
        Err(e) => {
            lock.rollback()?;
            return Err(e);
        }
    };
    index.write()?;
    lock.commit()?;
    Ok(rc)
}

fn bases_or(bases: &[Oid], computed: Oid) -> Vec<Oid> {
    if bases.is_empty() {
        vec![computed]
    } else {
        bases.to_vec()
    }
}

fn base_tree_for<'a>(repo: &'a Repository, oids: &[Oid]) -> Result<git2::Tree<'a>> {
    let oid = oids[0];
    let commit = repo.find_commit(oid)?;
    repo.find_tree(commit.tree_id())
}
