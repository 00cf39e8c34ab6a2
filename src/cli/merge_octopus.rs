//! `merge-octopus [<bases>…] -- <head> <remote1> <remote2> [<more>…]`:
//! N-way octopus strategy.

use clap::Args;
use git2::Oid;

use githooked::git::Repository;
use githooked::merge::content::DiffyMerger;
use githooked::merge::strategy::octopus::octopus;

#[derive(Debug, Args)]
pub struct MergeOctopusArgs {
    /// Optional base commits, then `--`, then `<head> <remote1> <remote2> [more]`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub rest: Vec<String>,
}

pub fn run(repo: &Repository, args: &MergeOctopusArgs) -> anyhow::Result<i32> {
    let Some(sep) = args.rest.iter().position(|a| a == "--") else {
        anyhow::bail!("usage: merge-octopus [<bases>...] -- <head> <remote1> <remote2> [<more>...]");
    };
    let bases = &args.rest[..sep];
    let after = &args.rest[sep + 1..];

    let Some((head_arg, remotes)) = after.split_first() else {
        anyhow::bail!("usage: merge-octopus [<bases>...] -- <head> <remote1> <remote2> [<more>...]");
    };

    if remotes.len() < 2 {
        return Ok(2);
    }

    let base_oids = resolve_commit_oids(repo, bases)?;
    let remote_oids = resolve_commit_oids(repo, remotes)?;

    let merger = DiffyMerger;
    Ok(octopus(repo, &merger, &base_oids, head_arg, &remote_oids)?)
}

fn resolve_commit_oids(repo: &Repository, specs: &[String]) -> anyhow::Result<Vec<Oid>> {
    specs
        .iter()
        .map(|s| Ok(repo.resolve_to_commit(s)?.id()))
        .collect()
}
