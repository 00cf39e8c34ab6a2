//! Hook Policy Resolver: decides whether a legacy hook path should run.

use std::path::Path;

use crate::error::Result;
use crate::hooks::types::HookDirPolicy;

/// Reads a line of user input and writes prompts, isolated behind a trait so
/// the interactive re-prompt loop is testable without a real terminal.
pub trait Prompter {
    fn prompt(&mut self, message: &str) -> Result<String>;
}

/// Reads from stdin, writes prompts to stderr.
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn prompt(&mut self, message: &str) -> Result<String> {
        use std::io::Write;
        eprint!("{}", console::style(message).dim());
        std::io::stderr().flush().ok();
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line)
    }
}

/// Given a legacy hook path and a resolved `HookDirPolicy`, returns whether
/// it should run, performing any user-facing messaging as a side effect.
/// `policy` must already have `UseConfig` resolved by the caller.
pub fn should_run_hookdir(path: &Path, policy: HookDirPolicy, prompter: &mut dyn Prompter) -> Result<bool> {
    if path.as_os_str().is_empty() {
        return Ok(false);
    }

    match policy {
        HookDirPolicy::No => Ok(false),
        HookDirPolicy::Error => {
            eprintln!("Skipping legacy hook at '{}'", path.display());
            Ok(false)
        }
        HookDirPolicy::Warn => {
            eprintln!("Running legacy hook at '{}'", path.display());
            Ok(true)
        }
        HookDirPolicy::Yes => Ok(true),
        HookDirPolicy::Unknown => {
            eprintln!("Unrecognized value for 'hook.runHookDir'. Is there a typo? ");
            Ok(true)
        }
        HookDirPolicy::Interactive => prompt_loop(path, prompter),
        HookDirPolicy::UseConfig => Err(crate::error::GithookedError::Invariant(
            "UseConfig must be resolved before reaching should_run_hookdir",
        )),
    }
}

fn prompt_loop(path: &Path, prompter: &mut dyn Prompter) -> Result<bool> {
    loop {
        let line = prompter.prompt(&format!("Run '{}'? [Yn] ", path.display()))?;
        let answer = line.trim().to_lowercase();
        if answer.is_empty() || answer.starts_with('y') {
            return Ok(true);
        }
        if answer.starts_with('n') {
            return Ok(false);
        }
        // anything else: re-prompt
    }
}
