//! `merge-one-file <orig> <ours> <theirs> <path> <orig_mode> <ours_mode> <theirs_mode>`
//!
//! The eight-argument calling convention `merge-index` uses to invoke either
//! this binary or an external merge program.

use clap::Args;
use git2::Oid;

use githooked::error::GithookedError;
use githooked::git::Repository;
use githooked::merge::content::DiffyMerger;
use githooked::merge::dispatch::merge_three_way;
use githooked::merge::types::{GitMode, MergeOutcome, MergeTriple, Side};

#[derive(Debug, Args)]
pub struct MergeOneFileArgs {
    /// 40-hex object id of the common ancestor, or empty if absent.
    pub orig: String,
    /// 40-hex object id of our version, or empty if absent.
    pub ours: String,
    /// 40-hex object id of their version, or empty if absent.
    pub theirs: String,
    /// Path being merged.
    pub path: String,
    /// Octal mode for `orig`, empty iff `orig` is empty.
    pub orig_mode: String,
    /// Octal mode for `ours`, empty iff `ours` is empty.
    pub ours_mode: String,
    /// Octal mode for `theirs`, empty iff `theirs` is empty.
    pub theirs_mode: String,
}

fn parse_side(field: &'static str, oid: &str, mode: &str) -> githooked::Result<Side> {
    if oid.is_empty() != mode.is_empty() {
        return Err(GithookedError::ModeWithoutOid { field });
    }
    if oid.is_empty() {
        return Ok(None);
    }
    let oid = Oid::from_str(oid).map_err(|_| GithookedError::InvalidMode {
        field,
        reason: format!("'{oid}' is not a valid object id"),
    })?;
    let raw = u32::from_str_radix(mode, 8).map_err(|_| GithookedError::InvalidMode {
        field,
        reason: format!("'{mode}' is not a valid octal mode"),
    })?;
    let parsed = GitMode(raw);
    if !parsed.is_valid_for_merge_one_file() {
        return Err(GithookedError::InvalidMode {
            field,
            reason: format!("mode '{mode}' must be regular, directory, or symlink"),
        });
    }
    Ok(Some((oid, parsed)))
}

pub fn run(repo: &Repository, args: &MergeOneFileArgs) -> anyhow::Result<i32> {
    let orig = parse_side("orig", &args.orig, &args.orig_mode)?;
    let ours = parse_side("ours", &args.ours, &args.ours_mode)?;
    let theirs = parse_side("theirs", &args.theirs, &args.theirs_mode)?;

    let triple = MergeTriple::new(args.path.clone(), orig, ours, theirs);
    if !triple.is_well_formed() {
        anyhow::bail!("'{}' is not a valid path for a three-way merge", args.path);
    }

    let lock = repo.lock_index()?;
    let mut index = repo.index()?;
    let merger = DiffyMerger;
    let outcome = merge_three_way(repo, &mut index, &merger, &triple)?;

    match outcome {
        MergeOutcome::Resolved => {
            index.write()?;
            lock.commit()?;
            Ok(0)
        }
        MergeOutcome::ConflictKept => {
            lock.rollback()?;
            Ok(1)
        }
    }
}
