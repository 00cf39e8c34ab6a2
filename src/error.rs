//! Library-level error taxonomy: configuration errors, resource errors,
//! classification errors, conflicts, and fatal invariant violations.
//!
//! The CLI binary wraps these in `anyhow` at the command boundary; library
//! code that wants to match on a specific failure works against this enum
//! directly.

use std::path::PathBuf;

/// Errors produced by the hook dispatcher and merge engine.
#[derive(Debug, thiserror::Error)]
pub enum GithookedError {
    /// A `--run-hookdir`/config value did not match a recognized policy.
    #[error("'{0}' is not a valid option for --run-hookdir (yes, warn, interactive, no, error)")]
    InvalidHookDirPolicy(String),

    /// A mode argument was malformed or not one of regular/dir/symlink.
    #[error("invalid '{field}' mode: {reason}")]
    InvalidMode { field: &'static str, reason: String },

    /// An oid argument and its corresponding mode argument disagree on presence.
    #[error("no '{field}' object id given, but a mode was still given")]
    ModeWithoutOid { field: &'static str },

    /// The index lock could not be acquired.
    #[error("Unable to create '{0}': file already exists")]
    IndexLocked(PathBuf),

    /// A working-tree file could not be written.
    #[error("unable to write file '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The (orig, ours, theirs) presence combination did not match any
    /// recognized merge case.
    #[error("{path}: Not handling case {orig} -> {ours} -> {theirs}")]
    UnhandledCase {
        path: String,
        orig: String,
        ours: String,
        theirs: String,
    },

    /// A file was deleted on one side but had its permissions changed on the other.
    #[error("{path}: File was deleted on one branch but had its permissions changed")]
    DeletedWithModeChange { path: String },

    /// An add/add with differing modes, or an ours/theirs mode mismatch.
    #[error("{path}: permissions conflict: {ours:o}->{theirs:o}")]
    PermissionsConflict {
        path: String,
        ours: u32,
        theirs: u32,
    },

    /// The merge would add a path that already exists untracked in the working tree.
    #[error("{path}: untracked file would be overwritten by merge")]
    UntrackedOverwritten { path: String },

    /// A symlink or gitlink entry was routed into the content merge path.
    #[error("{path}: refusing to content-merge a {kind}")]
    RefusingSpecialMerge { path: String, kind: &'static str },

    /// The content merge backend reported an internal failure.
    #[error("Failed to execute internal merge")]
    ContentMergeFailed,

    /// A programmer error / invariant violation: this is a bug, not a user error.
    #[error("BUG: {0}")]
    Invariant(&'static str),

    #[error(transparent)]
    Git(#[from] git2::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GithookedError>;
