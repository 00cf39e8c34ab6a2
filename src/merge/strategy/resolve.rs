//! Resolve Strategy: straight two-way merge orchestration atop the tree
//! unpacker, falling back to the per-path walker when a simple unpack
//! would not converge.

use git2::Oid;

use crate::error::Result;
use crate::git::Repository;
use crate::merge::content::ContentMerger;
use crate::merge::unpack::unpack_trees;
use crate::merge::walker::merge_all_index;

/// Exit code contract: 0 clean, 1 content conflicts left in the working
/// tree, 2 refused or fatal. Requires exactly one remote.
pub fn resolve(
    repo: &Repository,
    merger: &dyn ContentMerger,
    bases: &[Oid],
    remotes: &[Oid],
    head_arg: &str,
) -> Result<i32> {
    if remotes.len() != 1 {
        return Ok(2);
    }

    let head_tree = match repo.resolve_to_tree(head_arg) {
        Ok(t) => t,
        Err(_) => return Ok(2),
    };

    eprintln!("Trying simple merge.");

    let mut trees = Vec::with_capacity(bases.len() + 2);
    for base in bases {
        match repo.find_commit(*base).and_then(|c| repo.find_tree(c.tree_id())) {
            Ok(t) => trees.push(t),
            Err(_) => return Ok(2),
        }
    }
    trees.push(head_tree);
    let remote_tree = match repo.find_commit(remotes[0]).and_then(|c| repo.find_tree(c.tree_id())) {
        Ok(t) => t,
        Err(_) => return Ok(2),
    };
    trees.push(remote_tree);

    if unpack_trees(repo, &trees, true).is_err() {
        return Ok(2);
    }

    let mut index = repo.index()?;
    if repo.write_tree_from(&mut index).is_ok() {
        return Ok(0);
    }

    eprintln!("Simple merge failed, trying Automatic merge.");
    let lock = repo.lock_index()?;
    let rc = match merge_all_index(repo, &mut index, merger, true, true) {
        Ok(rc) => rc,
        Err(e) => {
            lock.rollback()?;
            return Err(e);
        }
    };
    index.write()?;
    lock.commit()?;
    Ok(if rc != 0 { 1 } else { 0 })
}
