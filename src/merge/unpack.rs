//! Fast-Forward / Tree Unpacker Wrapper: applies 1..=MAX_UNPACK_TREES tree
//! descriptors to the index under the index lock.

use git2::Tree;

use crate::error::{GithookedError, Result};
use crate::git::Repository;

/// Matches upstream's own ceiling on simultaneous unpack-trees inputs.
pub const MAX_UNPACK_TREES: usize = 8;

/// Applies `trees` to the index and checks the result out into the working
/// tree, holding the index lock for the duration. Maps arity to the
/// matching inner strategy: one tree is a plain checkout, two is a
/// fast-forward merge, three or more is a three-way (or approximated
/// N-way, see below) merge with `head_idx = trees.len() - 1`.
pub fn unpack_trees(repo: &Repository, trees: &[Tree<'_>], aggressive: bool) -> Result<()> {
    if trees.is_empty() {
        return Err(GithookedError::Invariant("unpack_trees requires at least one tree"));
    }
    if trees.len() > MAX_UNPACK_TREES {
        return Err(GithookedError::Invariant("too many trees for unpack_trees"));
    }

    let lock = repo.lock_index()?;
    let outcome = (|| -> Result<()> {
        match trees.len() {
            1 => oneway(repo, &trees[0]),
            2 => twoway(repo, &trees[0], &trees[1], aggressive),
            _ => multiway(repo, trees, aggressive),
        }
    })();

    match outcome {
        Ok(()) => {
            lock.commit()?;
            Ok(())
        }
        Err(e) => {
            lock.rollback()?;
            Err(e)
        }
    }
}

fn oneway(repo: &Repository, tree: &Tree<'_>) -> Result<()> {
    let mut index = repo.index()?;
    index.read_tree(tree)?;
    apply(repo, index)
}

/// Two trees: a fast-forward merge with no ancestor. If HEAD is unborn
/// (the "initial checkout" case), there is nothing to merge against —
/// simply read the second tree in directly.
fn twoway(repo: &Repository, ours: &Tree<'_>, theirs: &Tree<'_>, aggressive: bool) -> Result<()> {
    if repo.is_head_unborn()? {
        return oneway(repo, theirs);
    }
    let opts = merge_options(aggressive);
    let index = repo.merge_trees(None, ours, theirs, Some(&opts))?;
    apply(repo, index)
}

/// Three or more trees. `git2` only exposes a true 3-way merge primitive
/// (one ancestor, two sides); for exactly three trees this is exact. For
/// more than three (the multi-base octopus unpack case) this is a
/// documented approximation: the first tree is used as the sole ancestor
/// against the last two, rather than reconciling every intermediate base —
/// a real generalized N-way `unpack_trees` is not something the `git2`
/// bindings expose.
fn multiway(repo: &Repository, trees: &[Tree<'_>], aggressive: bool) -> Result<()> {
    let head_idx = trees.len() - 1;
    let ours_idx = head_idx - 1;
    let opts = merge_options(aggressive);
    let index = repo.merge_trees(Some(&trees[0]), &trees[ours_idx], &trees[head_idx], Some(&opts))?;
    apply(repo, index)
}

fn merge_options(aggressive: bool) -> git2::MergeOptions {
    let mut opts = git2::MergeOptions::new();
    if aggressive {
        opts.find_renames(true);
    }
    opts
}

fn apply(repo: &Repository, mut index: git2::Index) -> Result<()> {
    repo.set_index(&mut index)?;
    let mut checkout = git2::build::CheckoutBuilder::new();
    checkout.safe();
    repo.checkout_index(Some(&mut index), Some(&mut checkout))
}
