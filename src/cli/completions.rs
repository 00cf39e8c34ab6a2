//! Shell completion generation.

use clap::CommandFactory;
use clap_complete::Shell;

use super::Cli;

/// Writes a completion script for `shell` to stdout.
///
/// There is no configured-target list to enumerate dynamically here, so
/// the generated script is plain static `clap_complete` output.
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
}
