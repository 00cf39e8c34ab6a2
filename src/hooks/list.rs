//! Hook List Builder: materializes an ordered `HookList` from configuration
//! plus the legacy per-event executable file.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::ConfigSource;
use crate::error::Result;
use crate::hooks::types::{HookEntry, HookList};

/// Suppresses repeat "advice.ignoredHook"-style messages within one process.
static ADVISED_EVENTS: once_cell::sync::Lazy<std::sync::Mutex<std::collections::HashSet<String>>> =
    once_cell::sync::Lazy::new(|| std::sync::Mutex::new(std::collections::HashSet::new()));

static SUPPRESS_ADVICE: AtomicBool = AtomicBool::new(false);

pub fn set_suppress_advice(suppress: bool) {
    SUPPRESS_ADVICE.store(suppress, Ordering::SeqCst);
}

/// Builds the ordered hook list for `event` from `config`, then appends the
/// legacy hookdir entry (if present and executable) under `hooks_dir`.
pub fn build_hook_list(config: &dyn ConfigSource, hooks_dir: Option<&Path>, event: &str) -> Result<HookList> {
    let mut list = HookList::new();

    let key_glob = format!("hook.{event}.command");
    for entry in config.entries(&key_glob)? {
        let v = &entry.value;

        let skip_key = format!("hookcmd.{v}.skip");
        if config.get_bool(&skip_key)?.unwrap_or(false) {
            let resolved = resolved_command(config, v)?;
            list.remove_by_command(&resolved);
            continue;
        }

        let resolved = resolved_command(config, v)?;
        list.upsert_tail(HookEntry::new(resolved, entry.scope, false));
    }

    if let Some(hooks_dir) = hooks_dir {
        if let Some(legacy) = probe_legacy_hook(hooks_dir, event)? {
            let command = legacy.to_string_lossy().into_owned();
            list.upsert_tail(HookEntry::new(command, crate::config::ConfigScope::Unknown, true));
        }
    }

    Ok(list)
}

fn resolved_command(config: &dyn ConfigSource, v: &str) -> Result<String> {
    let command_key = format!("hookcmd.{v}.command");
    Ok(config.get_string(&command_key)?.unwrap_or_else(|| v.to_string()))
}

/// Probes `<hooks_dir>/<event>` (and a platform-extension variant, unused on
/// Unix) for an executable legacy hook. Returns `None` if absent, emits a
/// one-shot advisory on permission-denied.
fn probe_legacy_hook(hooks_dir: &Path, event: &str) -> Result<Option<PathBuf>> {
    let candidate = hooks_dir.join(event);
    match std::fs::metadata(&candidate) {
        Ok(meta) => {
            if is_executable(&meta) {
                Ok(Some(candidate))
            } else {
                advise_not_executable(event);
                Ok(None)
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            advise_not_executable(event);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(unix)]
fn is_executable(meta: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_meta: &std::fs::Metadata) -> bool {
    true
}

fn advise_not_executable(event: &str) {
    if SUPPRESS_ADVICE.load(Ordering::SeqCst) {
        return;
    }
    let mut seen = ADVISED_EVENTS.lock().unwrap();
    if seen.insert(event.to_string()) {
        eprintln!(
            "hint: The '{event}' hook was ignored because it's not set as executable.\n\
             hint: You can disable this warning with `git config advice.ignoredHook false`."
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigScope, FakeConfig};

    #[test]
    fn later_redefinition_wins_origin_and_position() {
        let mut cfg = FakeConfig::new();
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Global);
        cfg.push("hook.pre-commit.command", "test", ConfigScope::Local);
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Local);

        let list = build_hook_list(&cfg, None, "pre-commit").unwrap();
        let commands: Vec<_> = list.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["test", "lint"]);
        assert_eq!(list.find("lint", false).unwrap().origin, ConfigScope::Local);
    }

    #[test]
    fn skip_directive_removes_entry_regardless_of_redefinitions() {
        let mut cfg = FakeConfig::new();
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Global);
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Local);
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Worktree);
        cfg.set_bool("hookcmd.lint.skip", true);

        let list = build_hook_list(&cfg, None, "pre-commit").unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn inlined_name_redirected_through_hookcmd_command() {
        let mut cfg = FakeConfig::new();
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Local);
        cfg.set_string("hookcmd.lint.command", "cargo clippy --all-targets");

        let list = build_hook_list(&cfg, None, "pre-commit").unwrap();
        assert_eq!(list.as_slice()[0].command, "cargo clippy --all-targets");
    }

    #[test]
    fn no_hooks_dir_means_no_legacy_entry() {
        let cfg = FakeConfig::new();
        let list = build_hook_list(&cfg, None, "pre-commit").unwrap();
        assert!(list.is_empty());
    }
}
