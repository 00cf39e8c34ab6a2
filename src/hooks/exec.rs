//! Hook Execution Driver: runs a built hook list to completion.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::config::ConfigSource;
use crate::error::{GithookedError, Result};
use crate::git::Repository;
use crate::hooks::list::build_hook_list;
use crate::hooks::parallel::{run_parallel, TaskOutcome};
use crate::hooks::policy::{should_run_hookdir, Prompter, TerminalPrompter};
use crate::hooks::types::{HookDirPolicy, HookEntry, RunHooksOptions};

/// Resolves `options.hookdir_policy` against config: an explicit override
/// (anything but `UseConfig`) wins outright; `UseConfig` falls back to
/// `hook.runhookdir`, defaulting to `Yes` when unset.
pub fn resolve_hookdir_policy(config: &dyn ConfigSource, requested: HookDirPolicy) -> Result<HookDirPolicy> {
    if requested != HookDirPolicy::UseConfig {
        return Ok(requested);
    }
    match config.get_string("hook.runhookdir")? {
        None => Ok(HookDirPolicy::Yes),
        Some(v) => Ok(HookDirPolicy::parse(&v.to_lowercase()).unwrap_or(HookDirPolicy::Unknown)),
    }
}

/// Runs every eligible hook for `event` to completion and returns the
/// bitwise-or of every child's exit status (0 iff every hook succeeded and
/// every start succeeded).
pub fn run_hooks(
    repo: &Repository,
    config: &dyn ConfigSource,
    event: &str,
    options: &RunHooksOptions,
) -> Result<i32> {
    if options.stdin_path.is_some() && options.feed_pipe.is_some() {
        return Err(GithookedError::Invariant(
            "stdin_path and feed_pipe are mutually exclusive",
        ));
    }

    let hooks_dir = repo.git_dir().join("hooks");
    let list = build_hook_list(config, Some(&hooks_dir), event)?;

    let policy = resolve_hookdir_policy(config, options.hookdir_policy)?;
    let mut prompter: Box<dyn Prompter> = Box::new(TerminalPrompter);
    let mut entries: Vec<HookEntry> = list.iter().cloned().collect();
    if let Some(last) = entries.last() {
        if last.from_hookdir {
            let path = std::path::PathBuf::from(&last.command);
            if !should_run_hookdir(&path, policy, prompter.as_mut())? {
                entries.pop();
            }
        }
    }

    if entries.is_empty() {
        return Ok(0);
    }
    let env = options.env.clone();
    let args = options.args.clone();
    let stdin_path = options.stdin_path.clone();
    let feed_pipe = options.feed_pipe.clone();
    let dir = options.dir.clone();

    let outcomes = run_parallel(entries.clone(), options.jobs, move |entry| {
        spawn_one(&entry, &env, &args, stdin_path.as_deref(), feed_pipe.as_deref(), dir.as_deref())
    })?;

    let mut rc: i32 = 0;
    for (entry, outcome) in entries.iter().zip(outcomes.iter()) {
        if outcome.start_failed {
            rc |= 1;
            let scope = if entry.from_hookdir {
                "hookdir".to_string()
            } else {
                crate::config::scope_display(entry.origin).to_string()
            };
            eprintln!("Couldn't start '{}', configured in '{scope}'", entry.command);
            continue;
        }
        rc |= outcome.exit_code;
        if let Some(sink) = &options.consume_sideband {
            sink(&outcome.stderr);
        }
    }

    Ok(rc)
}

fn spawn_one(
    entry: &HookEntry,
    env: &[String],
    args: &[String],
    stdin_path: Option<&std::path::Path>,
    feed_pipe: Option<&(dyn Fn(&HookEntry) -> Option<Vec<u8>> + Send + Sync)>,
    dir: Option<&std::path::Path>,
) -> TaskOutcome {
    let mut cmd = if entry.from_hookdir {
        Command::new(&entry.command)
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&entry.command);
        c
    };

    for kv in env {
        if let Some((k, v)) = kv.split_once('=') {
            cmd.env(k, v);
        }
    }
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    cmd.stdout(Stdio::inherit());
    cmd.stderr(Stdio::piped());

    let feed_bytes = feed_pipe.and_then(|f| f(entry));
    if let Some(path) = stdin_path {
        match std::fs::File::open(path) {
            Ok(f) => {
                cmd.stdin(Stdio::from(f));
            }
            Err(_) => {
                return TaskOutcome {
                    start_failed: true,
                    exit_code: 0,
                    stderr: Vec::new(),
                };
            }
        }
    } else if feed_bytes.is_some() {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }

    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(_) => {
            return TaskOutcome {
                start_failed: true,
                exit_code: 0,
                stderr: Vec::new(),
            };
        }
    };

    if let Some(bytes) = feed_bytes {
        if let Some(mut stdin) = child.stdin.take() {
            let _ = stdin.write_all(&bytes);
        }
    }

    match child.wait_with_output() {
        Ok(output) => TaskOutcome {
            start_failed: false,
            exit_code: output.status.code().unwrap_or(1),
            stderr: output.stderr,
        },
        Err(_) => TaskOutcome {
            start_failed: true,
            exit_code: 0,
            stderr: Vec::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FakeConfig;

    #[test]
    fn unset_policy_defaults_to_yes() {
        let cfg = FakeConfig::new();
        let resolved = resolve_hookdir_policy(&cfg, HookDirPolicy::UseConfig).unwrap();
        assert_eq!(resolved, HookDirPolicy::Yes);
    }

    #[test]
    fn explicit_override_wins_over_config() {
        let mut cfg = FakeConfig::new();
        cfg.set_string("hook.runhookdir", "warn");
        let resolved = resolve_hookdir_policy(&cfg, HookDirPolicy::No).unwrap();
        assert_eq!(resolved, HookDirPolicy::No);
    }

    #[test]
    fn unrecognized_config_value_is_unknown() {
        let mut cfg = FakeConfig::new();
        cfg.set_string("hook.runhookdir", "sometimes");
        let resolved = resolve_hookdir_policy(&cfg, HookDirPolicy::UseConfig).unwrap();
        assert_eq!(resolved, HookDirPolicy::Unknown);
    }
}
