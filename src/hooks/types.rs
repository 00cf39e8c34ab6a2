//! Hook list data model: `HookEntry`, `HookList`, `HookDirPolicy`,
//! `RunHooksOptions`.

use std::collections::HashMap;

use crate::config::ConfigScope;

/// One element of a hook list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookEntry {
    /// The literal command line to execute. Shell-interpreted iff
    /// `from_hookdir` is false.
    pub command: String,
    /// Provenance of this entry, purely informational.
    pub origin: ConfigScope,
    /// True iff this entry came from the legacy per-event executable file
    /// rather than from configuration.
    pub from_hookdir: bool,
}

impl HookEntry {
    pub fn new(command: impl Into<String>, origin: ConfigScope, from_hookdir: bool) -> Self {
        Self {
            command: command.into(),
            origin,
            from_hookdir,
        }
    }

    /// Identity for move-to-end/dedup purposes: two entries with the same
    /// command and the same `from_hookdir` are the same logical hook.
    fn key(&self) -> (&str, bool) {
        (self.command.as_str(), self.from_hookdir)
    }
}

/// Ordered sequence of `HookEntry`, insertion order equal to execution
/// order. A small side index keeps move-to-end at O(1) without intrusive
/// links.
#[derive(Debug, Default, Clone)]
pub struct HookList {
    entries: Vec<HookEntry>,
    index: HashMap<(String, bool), usize>,
}

impl HookList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HookEntry> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[HookEntry] {
        &self.entries
    }

    /// Removes any existing entry with the same `(command, from_hookdir)`
    /// identity, then appends `entry` at the tail, updating the origin to
    /// the entry just given (last-setter wins for display and position).
    pub fn upsert_tail(&mut self, entry: HookEntry) {
        self.remove_by_key(entry.key().0, entry.key().1);
        self.push_tail(entry);
    }

    fn push_tail(&mut self, entry: HookEntry) {
        let key = (entry.command.clone(), entry.from_hookdir);
        self.index.insert(key, self.entries.len());
        self.entries.push(entry);
    }

    /// Removal directive: delete any entry whose resolved command equals
    /// `command`, regardless of `from_hookdir`. Used by `hookcmd.*.skip`.
    pub fn remove_by_command(&mut self, command: &str) {
        self.remove_by_key(command, false);
        self.remove_by_key(command, true);
    }

    fn remove_by_key(&mut self, command: &str, from_hookdir: bool) {
        let key = (command.to_string(), from_hookdir);
        if self.index.remove(&key).is_none() {
            return;
        }
        self.entries.retain(|e| e.key() != (command, from_hookdir));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, e) in self.entries.iter().enumerate() {
            self.index.insert((e.command.clone(), e.from_hookdir), i);
        }
    }

    pub fn find(&self, command: &str, from_hookdir: bool) -> Option<&HookEntry> {
        self.index
            .get(&(command.to_string(), from_hookdir))
            .map(|&i| &self.entries[i])
    }
}

/// Policy for legacy (hookdir) hook inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookDirPolicy {
    No,
    Error,
    Warn,
    Interactive,
    Yes,
    /// Sentinel meaning "resolve from config at this moment"; never appears
    /// in a stored decision.
    UseConfig,
    Unknown,
}

impl HookDirPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "no" => Some(Self::No),
            "error" => Some(Self::Error),
            "warn" => Some(Self::Warn),
            "interactive" => Some(Self::Interactive),
            "yes" => Some(Self::Yes),
            _ => None,
        }
    }

    /// The annotation shown by `hook list` for legacy entries. Empty for
    /// `Yes`, `Unknown`, and any other default-accepting policy.
    pub fn annotation(self) -> &'static str {
        match self {
            Self::No => " (will not run)",
            Self::Error => " (will error and not run)",
            Self::Interactive => " (will prompt)",
            Self::Warn => " (will warn but run)",
            Self::Yes | Self::UseConfig | Self::Unknown => "",
        }
    }
}

impl Default for HookDirPolicy {
    fn default() -> Self {
        Self::Yes
    }
}

/// Configuration bundle passed to the execution driver.
#[derive(Debug, Clone, Default)]
pub struct RunHooksOptions {
    /// `KEY=VALUE` strings exported for every child, in order.
    pub env: Vec<String>,
    /// Strings appended after the command.
    pub args: Vec<String>,
    /// Filesystem path reopened fresh for every child's stdin.
    pub stdin_path: Option<std::path::PathBuf>,
    /// Shared stdin-feeder callback; mutually exclusive with `stdin_path`.
    pub feed_pipe: Option<std::sync::Arc<dyn Fn(&HookEntry) -> Option<Vec<u8>> + Send + Sync>>,
    /// Aggregated child stderr sink.
    pub consume_sideband: Option<std::sync::Arc<dyn Fn(&[u8]) + Send + Sync>>,
    /// Degree of parallelism; must be positive.
    pub jobs: usize,
    /// Initial working directory for each child.
    pub dir: Option<std::path::PathBuf>,
    /// Controls legacy-hook inclusion.
    pub hookdir_policy: HookDirPolicy,
}

impl RunHooksOptions {
    pub fn new(jobs: usize) -> Self {
        Self {
            jobs: jobs.max(1),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cmd: &str, hookdir: bool) -> HookEntry {
        HookEntry::new(cmd, ConfigScope::Local, hookdir)
    }

    #[test]
    fn upsert_tail_moves_existing_entry_to_end() {
        let mut list = HookList::new();
        list.upsert_tail(entry("lint", false));
        list.upsert_tail(entry("test", false));
        list.upsert_tail(entry("lint", false));

        let commands: Vec<_> = list.iter().map(|e| e.command.as_str()).collect();
        assert_eq!(commands, vec!["test", "lint"]);
    }

    #[test]
    fn remove_by_command_drops_all_matching_entries() {
        let mut list = HookList::new();
        list.upsert_tail(entry("lint", false));
        list.remove_by_command("lint");
        assert!(list.is_empty());
    }

    #[test]
    fn annotation_is_empty_for_yes_and_unknown() {
        assert_eq!(HookDirPolicy::Yes.annotation(), "");
        assert_eq!(HookDirPolicy::Unknown.annotation(), "");
        assert_eq!(HookDirPolicy::Warn.annotation(), " (will warn but run)");
    }
}
