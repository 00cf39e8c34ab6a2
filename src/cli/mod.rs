//! CLI surface: `hook list`, `hook run`, `merge-one-file`, `merge-resolve`,
//! `merge-octopus`, `merge-index`, plus shell completions.

pub mod completions;
pub mod hook;
pub mod merge_index;
pub mod merge_octopus;
pub mod merge_one_file;
pub mod merge_resolve;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(name = "githooked", version, about = "Git hook dispatcher and three-way merge helper")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Inspect or run configured hooks for an event.
    #[command(subcommand)]
    Hook(hook::HookCommand),

    /// Three-way merge of a single file, invoked by the index-wide merger.
    MergeOneFile(merge_one_file::MergeOneFileArgs),

    /// Two-way resolve merge strategy.
    MergeResolve(merge_resolve::MergeResolveArgs),

    /// N-way octopus merge strategy.
    MergeOctopus(merge_octopus::MergeOctopusArgs),

    /// Merge every unmerged path in the index (or a given file list).
    MergeIndex(merge_index::MergeIndexArgs),

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}
