//! `hook list` and `hook run` subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use githooked::config::{scope_display, ConfigSource, GitConfig};
use githooked::error::GithookedError;
use githooked::git::Repository;
use githooked::hooks::exec::{resolve_hookdir_policy, run_hooks};
use githooked::hooks::list::build_hook_list;
use githooked::hooks::types::{HookDirPolicy, RunHooksOptions};

#[derive(Debug, Subcommand)]
pub enum HookCommand {
    /// Print the ordered hook list configured for `event`.
    List(HookListArgs),
    /// Run every configured hook for `event` to completion.
    Run(HookRunArgs),
}

#[derive(Debug, Args)]
pub struct HookListArgs {
    /// The event name, e.g. `pre-commit`.
    pub event: String,

    /// Override `hook.runhookdir` for annotation purposes only.
    #[arg(long = "run-hookdir")]
    pub run_hookdir: Option<String>,
}

#[derive(Debug, Args)]
pub struct HookRunArgs {
    /// `KEY=VALUE` pairs exported to every child, may repeat.
    #[arg(long = "env")]
    pub env: Vec<String>,

    /// Extra arguments appended after the command, may repeat.
    #[arg(long = "arg")]
    pub arg: Vec<String>,

    /// Path reopened fresh as stdin for every child.
    #[arg(long = "to-stdin")]
    pub to_stdin: Option<PathBuf>,

    /// Degree of parallelism; defaults to `hook.jobs` or the detected CPU count.
    #[arg(long = "jobs")]
    pub jobs: Option<usize>,

    /// Override `hook.runhookdir` for this run.
    #[arg(long = "run-hookdir")]
    pub run_hookdir: Option<String>,

    /// The event name, e.g. `pre-commit`.
    pub event: String,
}

fn parse_run_hookdir(raw: &Option<String>) -> anyhow::Result<HookDirPolicy> {
    match raw {
        None => Ok(HookDirPolicy::UseConfig),
        Some(v) => HookDirPolicy::parse(v)
            .ok_or_else(|| GithookedError::InvalidHookDirPolicy(v.clone()).into()),
    }
}

pub fn list(repo: &Repository, config: &GitConfig, args: &HookListArgs) -> anyhow::Result<i32> {
    let requested = parse_run_hookdir(&args.run_hookdir)?;
    let hooks_dir = repo.git_dir().join("hooks");
    let list = build_hook_list(config, Some(&hooks_dir), &args.event)?;

    if list.is_empty() {
        println!("no commands configured for hook '{}'", args.event);
        return Ok(0);
    }

    let policy = resolve_hookdir_policy(config, requested)?;
    for entry in list.iter() {
        let scope = if entry.from_hookdir {
            "hookdir"
        } else {
            scope_display(entry.origin)
        };
        let annotation = if entry.from_hookdir { policy.annotation() } else { "" };
        println!("{scope}: {}{annotation}", entry.command);
    }
    Ok(0)
}

pub fn run(repo: &Repository, config: &GitConfig, args: &HookRunArgs) -> anyhow::Result<i32> {
    let run_hookdir = parse_run_hookdir(&args.run_hookdir)?;

    let jobs = match args.jobs {
        Some(n) => n,
        None => match config.get_string("hook.jobs")?.and_then(|v| v.parse().ok()) {
            Some(n) => n,
            None => std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1),
        },
    };

    let mut options = RunHooksOptions::new(jobs);
    options.env = args.env.clone();
    options.args = args.arg.clone();
    options.stdin_path = args.to_stdin.clone();
    options.hookdir_policy = run_hookdir;

    let rc = run_hooks(repo, config, &args.event, &options)?;
    Ok(rc)
}
