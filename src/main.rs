//! `githooked`: dispatches configured hooks for a named event, and drives
//! the per-file three-way merge helpers `merge-one-file`/`merge-resolve`/
//! `merge-octopus`/`merge-index`.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, Command};
use githooked::config::GitConfig;
use githooked::git::Repository;

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => to_exit_code(code),
        Err(e) => {
            eprintln!("{} {e:#}", console::style("error:").red().bold());
            ExitCode::from(2)
        }
    }
}

/// Clamps an aggregated hook/merge status into a process exit code. Hook
/// exit statuses are bitwise-or'd across children and may exceed 255; we
/// only need "zero or not" plus the documented 0/1/2 merge contract to
/// survive the clamp.
fn to_exit_code(code: i32) -> ExitCode {
    ExitCode::from((code & 0xff) as u8)
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;

    match cli.command {
        Command::Hook(hook_cmd) => {
            let repo = Repository::discover(&cwd)?;
            let config = GitConfig::from_config(repo.config()?);
            match hook_cmd {
                cli::hook::HookCommand::List(args) => cli::hook::list(&repo, &config, &args),
                cli::hook::HookCommand::Run(args) => cli::hook::run(&repo, &config, &args),
            }
        }
        Command::MergeOneFile(args) => {
            let repo = Repository::discover(&cwd)?;
            cli::merge_one_file::run(&repo, &args)
        }
        Command::MergeResolve(args) => {
            let repo = Repository::discover(&cwd)?;
            cli::merge_resolve::run(&repo, &args)
        }
        Command::MergeOctopus(args) => {
            let repo = Repository::discover(&cwd)?;
            cli::merge_octopus::run(&repo, &args)
        }
        Command::MergeIndex(args) => {
            let repo = Repository::discover(&cwd)?;
            cli::merge_index::run(&repo, &args)
        }
        Command::Completions { shell } => {
            cli::completions::generate_completions(shell);
            Ok(0)
        }
    }
}
