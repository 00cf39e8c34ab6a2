//! `merge-index [-o] [-q] (<program>|--use=merge-one-file) (-a | [--] <files>…)`

use std::process::Command;

use clap::Args;

use githooked::git::repo::IndexStageEntry;
use githooked::git::Repository;
use githooked::merge::content::DiffyMerger;
use githooked::merge::types::{GitMode, MergeOutcome, MergeTriple, Side};
use githooked::merge::walker::{merge_all_index, merge_index_path};

#[derive(Debug, Args)]
pub struct MergeIndexArgs {
    /// Keep going on per-path failure, report an aggregate status at the end.
    #[arg(short = 'o')]
    pub oneshot: bool,

    /// Suppress "Merge program failed" per-path diagnostics.
    #[arg(short = 'q')]
    pub quiet: bool,

    /// Select the in-process merger instead of an external program.
    #[arg(long = "use")]
    pub use_builtin: Option<String>,

    /// External merge program, given in place of `--use=merge-one-file`.
    pub program: Option<String>,

    /// Walk every unmerged path in the index.
    #[arg(short = 'a')]
    pub all: bool,

    /// Explicit file list; ignored when `-a` is given.
    pub files: Vec<String>,
}

const BUILTIN_NAME: &str = "merge-one-file";

pub fn run(repo: &Repository, args: &MergeIndexArgs) -> anyhow::Result<i32> {
    let use_builtin = args.use_builtin.as_deref() == Some(BUILTIN_NAME);
    if !use_builtin && args.program.is_none() {
        anyhow::bail!("merge-index requires a <program> or --use=merge-one-file");
    }

    let mut index = repo.index()?;
    let paths = if args.all {
        let mut seen = std::collections::HashSet::new();
        Repository::unmerged_entries(&index)
            .into_iter()
            .filter_map(|e| seen.insert(e.path.clone()).then_some(e.path))
            .collect::<Vec<_>>()
    } else {
        args.files.clone()
    };

    if use_builtin {
        run_builtin(repo, &mut index, &paths, args.quiet, args.oneshot)
    } else {
        let program = args.program.as_deref().unwrap();
        run_external(repo, &mut index, program, &paths, args.quiet, args.oneshot)
    }
}

fn run_builtin(
    repo: &Repository,
    index: &mut git2::Index,
    paths: &[String],
    quiet: bool,
    oneshot: bool,
) -> anyhow::Result<i32> {
    let lock = repo.lock_index()?;
    let merger = DiffyMerger;

    let rc = if paths.is_empty() {
        merge_all_index(repo, index, &merger, quiet, oneshot)
    } else {
        let mut rc = 0;
        for path in paths {
            match merge_index_path(repo, index, &merger, path) {
                Ok(MergeOutcome::Resolved) => {}
                Ok(MergeOutcome::ConflictKept) => {
                    rc = 1;
                    if !quiet {
                        eprintln!("{path}: merge program failed to merge");
                    }
                    if !oneshot {
                        break;
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
    };

    match rc {
        Ok(0) => {
            index.write()?;
            lock.commit()?;
            Ok(0)
        }
        Ok(rc) => {
            lock.rollback()?;
            Ok(rc)
        }
        Err(e) => {
            lock.rollback()?;
            Err(e.into())
        }
    }
}

fn run_external(
    repo: &Repository,
    index: &mut git2::Index,
    program: &str,
    paths: &[String],
    quiet: bool,
    oneshot: bool,
) -> anyhow::Result<i32> {
    // Each spawned program owns its own index write; this lock only
    // serializes our own reads of the stage triples against other
    // in-process mergers, and is released without writing anything back.
    let lock = repo.lock_index()?;
    let mut rc = 0;

    for path in paths {
        let [orig, ours, theirs] = Repository::stage_triple(index, path);
        if orig.is_none() && ours.is_none() && theirs.is_none() {
            continue;
        }
        let triple = MergeTriple::new(
            path.clone(),
            to_side(orig.as_ref()),
            to_side(ours.as_ref()),
            to_side(theirs.as_ref()),
        );

        let status = match spawn_external(program, &triple) {
            Ok(status) => status,
            Err(e) => {
                if !quiet {
                    eprintln!("{path}: couldn't start '{program}': {e}");
                }
                rc = 1;
                if !oneshot {
                    break;
                }
                continue;
            }
        };

        if !status.success() {
            rc = 1;
            if !quiet {
                eprintln!("{path}: merge program failed to merge");
            }
            if !oneshot {
                break;
            }
        }
    }

    lock.rollback()?;
    Ok(rc)
}

fn to_side(entry: Option<&IndexStageEntry>) -> Side {
    entry.map(|e| (e.id, GitMode(e.mode)))
}

fn spawn_external(program: &str, triple: &MergeTriple) -> std::io::Result<std::process::ExitStatus> {
    let (orig_oid, orig_mode) = format_side(triple.orig);
    let (ours_oid, ours_mode) = format_side(triple.ours);
    let (theirs_oid, theirs_mode) = format_side(triple.theirs);

    Command::new(program)
        .arg(orig_oid)
        .arg(ours_oid)
        .arg(theirs_oid)
        .arg(&triple.path)
        .arg(orig_mode)
        .arg(ours_mode)
        .arg(theirs_mode)
        .status()
}

fn format_side(side: Side) -> (String, String) {
    match side {
        Some((oid, mode)) => (oid.to_string(), format!("{:o}", mode.0)),
        None => (String::new(), String::new()),
    }
}
