//! Config key/value lookup, scope labelling, and boolean interpretation.
//!
//! Modeled as a small trait over `git2::Config` so the hook list builder can
//! be tested against an in-memory fixture instead of a real `.git/config`.

use git2::{Config as Git2Config, ConfigLevel};

use crate::error::Result;

/// Provenance of a configuration value, surfaced to the user for display
/// only — never used to decide precedence beyond what `git2` already
/// resolves for us while iterating entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigScope {
    System,
    Global,
    Local,
    Worktree,
    Command,
    Submodule,
    Unknown,
}

impl ConfigScope {
    fn from_level(level: ConfigLevel) -> Self {
        match level {
            ConfigLevel::System => Self::System,
            ConfigLevel::XDG | ConfigLevel::Global => Self::Global,
            ConfigLevel::Local => Self::Local,
            ConfigLevel::Worktree => Self::Worktree,
            ConfigLevel::App => Self::Command,
            ConfigLevel::ProgramData => Self::Unknown,
            _ => Self::Unknown,
        }
    }
}

/// Pure formatter, split out from `ConfigScope` derivation so display logic
/// can change independently of how a scope was determined.
pub fn scope_display(scope: ConfigScope) -> &'static str {
    match scope {
        ConfigScope::System => "system",
        ConfigScope::Global => "global",
        ConfigScope::Local => "local",
        ConfigScope::Worktree => "worktree",
        ConfigScope::Command => "command",
        ConfigScope::Submodule => "submodule",
        ConfigScope::Unknown => "unknown",
    }
}

/// One `(key, value)` pair observed while walking config entries matching a
/// prefix, in the order `git2` delivers them (system, global, local,
/// worktree, command-line overrides).
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    pub name: String,
    pub value: String,
    pub scope: ConfigScope,
}

/// Config key/value lookup, narrowed to what the hook and merge commands
/// need: multi-valued ordered iteration and boolean/string single lookups.
pub trait ConfigSource {
    /// All entries whose name matches `glob`, in config read order.
    fn entries(&self, glob: &str) -> Result<Vec<ConfigEntry>>;

    fn get_string(&self, key: &str) -> Result<Option<String>>;

    fn get_bool(&self, key: &str) -> Result<Option<bool>>;
}

/// `ConfigSource` backed by a real `git2::Config` (system+global+local+
/// worktree layers already merged by libgit2's config-open-default chain).
pub struct GitConfig {
    inner: Git2Config,
}

impl GitConfig {
    pub fn open_default() -> Result<Self> {
        Ok(Self {
            inner: Git2Config::open_default()?,
        })
    }

    pub fn from_repo(repo: &git2::Repository) -> Result<Self> {
        Ok(Self {
            inner: repo.config()?,
        })
    }

    /// Wraps an already-opened `git2::Config`, e.g. the one returned by
    /// `git::Repository::config`.
    pub fn from_config(inner: Git2Config) -> Self {
        Self { inner }
    }
}

impl ConfigSource for GitConfig {
    fn entries(&self, glob: &str) -> Result<Vec<ConfigEntry>> {
        let mut out = Vec::new();
        let entries = self.inner.entries(Some(glob))?;
        for entry in &entries {
            let entry = entry?;
            let Some(name) = entry.name() else { continue };
            let Some(value) = entry.value() else { continue };
            let scope = ConfigScope::from_level(entry.level());
            out.push(ConfigEntry {
                name: name.to_string(),
                value: value.to_string(),
                scope,
            });
        }
        Ok(out)
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        match self.inner.get_string(key) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.inner.get_bool(key) {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory fixture for unit tests: entries supplied in the exact order
/// they should be walked, no real `.git/config` required.
#[derive(Debug, Default, Clone)]
pub struct FakeConfig {
    pub entries: Vec<ConfigEntry>,
    pub strings: std::collections::HashMap<String, String>,
    pub bools: std::collections::HashMap<String, bool>,
}

impl FakeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &str, value: &str, scope: ConfigScope) -> &mut Self {
        self.entries.push(ConfigEntry {
            name: name.to_string(),
            value: value.to_string(),
            scope,
        });
        self
    }

    pub fn set_string(&mut self, key: &str, value: &str) -> &mut Self {
        self.strings.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> &mut Self {
        self.bools.insert(key.to_string(), value);
        self
    }
}

impl ConfigSource for FakeConfig {
    fn entries(&self, glob: &str) -> Result<Vec<ConfigEntry>> {
        let pattern = glob_to_prefix_suffix(glob);
        Ok(self
            .entries
            .iter()
            .filter(|e| matches_glob(&e.name, &pattern))
            .cloned()
            .collect())
    }

    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.strings.get(key).cloned())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.bools.get(key).copied())
    }
}

/// Splits a single-`*` glob like `hook.*.command` into its prefix and
/// suffix; good enough for the key shapes this crate reads.
fn glob_to_prefix_suffix(glob: &str) -> (String, String) {
    match glob.split_once('*') {
        Some((pre, post)) => (pre.to_string(), post.to_string()),
        None => (glob.to_string(), String::new()),
    }
}

fn matches_glob(name: &str, (prefix, suffix): &(String, String)) -> bool {
    name.starts_with(prefix.as_str()) && name.ends_with(suffix.as_str()) && name.len() >= prefix.len() + suffix.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_display_matches_names() {
        assert_eq!(scope_display(ConfigScope::System), "system");
        assert_eq!(scope_display(ConfigScope::Worktree), "worktree");
        assert_eq!(scope_display(ConfigScope::Unknown), "unknown");
    }

    #[test]
    fn fake_config_filters_by_glob() {
        let mut cfg = FakeConfig::new();
        cfg.push("hook.pre-commit.command", "lint", ConfigScope::Global);
        cfg.push("hook.pre-commit.command", "test", ConfigScope::Local);
        cfg.push("hookcmd.lint.command", "cargo clippy", ConfigScope::Local);

        let matches = cfg.entries("hook.*.command").unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].value, "lint");
        assert_eq!(matches[1].value, "test");
    }
}
