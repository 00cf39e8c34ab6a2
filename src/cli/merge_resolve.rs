//! `merge-resolve <bases>… -- <head> <remote>`: two-way resolve strategy.

use clap::Args;
use git2::Oid;

use githooked::git::Repository;
use githooked::merge::content::DiffyMerger;
use githooked::merge::strategy::resolve::resolve;

#[derive(Debug, Args)]
pub struct MergeResolveArgs {
    /// Base commits, then `--`, then `<head> <remote>`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

pub fn run(repo: &Repository, args: &MergeResolveArgs) -> anyhow::Result<i32> {
    let Some(sep) = args.rest.iter().position(|a| a == "--") else {
        anyhow::bail!("usage: merge-resolve <bases>... -- <head> <remote>");
    };
    let bases = &args.rest[..sep];
    let after = &args.rest[sep + 1..];

    let Some((head_arg, remotes)) = after.split_first() else {
        anyhow::bail!("usage: merge-resolve <bases>... -- <head> <remote>");
    };

    let base_oids = resolve_commit_oids(repo, bases)?;
    let remote_oids = resolve_commit_oids(repo, remotes)?;

    let merger = DiffyMerger;
    Ok(resolve(repo, &merger, &base_oids, &remote_oids, head_arg)?)
}

fn resolve_commit_oids(repo: &Repository, specs: &[String]) -> anyhow::Result<Vec<Oid>> {
    specs
        .iter()
        .map(|s| Ok(repo.resolve_to_commit(s)?.id()))
        .collect()
}
