//! CLI-level tests for `hook run`: aggregate exit status and dispatch
//! ordering (legacy hook runs after configured hooks).

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn githooked_bin() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin("githooked")
}

fn setup_test_repo() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["init"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "user.name", "Test User"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "user.email", "test@example.com"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    temp_dir
}

#[test]
fn run_succeeds_when_every_hook_succeeds() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "exit 0"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    let output = Command::new(githooked_bin())
        .args(["hook", "run", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn run_aggregates_nonzero_exit_across_hooks() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "exit 0"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "hook.runhookdir", "yes"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    let hook_path = repo_path.join(".git/hooks/pre-commit");
    fs::write(&hook_path, "#!/bin/sh\nexit 3\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms).unwrap();
    }

    let output = Command::new(githooked_bin())
        .args(["hook", "run", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(!output.status.success(), "a failing legacy hook should fail the run");
}

#[test]
fn run_with_no_commands_configured_is_a_success() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    let output = Command::new(githooked_bin())
        .args(["hook", "run", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn run_hookdir_no_skips_legacy_hook_entirely() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    let hook_path = repo_path.join(".git/hooks/pre-commit");
    fs::write(&hook_path, "#!/bin/sh\nexit 1\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms).unwrap();
    }

    let output = Command::new(githooked_bin())
        .args(["hook", "run", "--run-hookdir=no", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "policy 'no' should drop the failing legacy hook");
}
