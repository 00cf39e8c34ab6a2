//! CLI-level tests for `hook list`: ordering, redefinition, and legacy
//! hookdir annotation.

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
fn redefining_in_same_scope_moves_entry_to_end_and_dedupes() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "lint"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "test"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "lint"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    let output = Command::new(githooked_bin())
        .args(["hook", "list", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["local: test", "local: lint"]);
}

#[test]
fn skip_directive_removes_hook_regardless_of_redefinitions() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "lint"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "lint"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "hookcmd.lint.skip", "true"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    let output = Command::new(githooked_bin())
        .args(["hook", "list", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "no commands configured for hook 'pre-commit'");
}

#[test]
fn legacy_hookdir_entry_is_annotated_and_runs_last() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    Command::new("git")
        .args(["config", "--add", "hook.pre-commit.command", "lint"])
        .current_dir(repo_path)
        .output()
        .unwrap();
    Command::new("git")
        .args(["config", "hook.runhookdir", "warn"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    let hook_path = repo_path.join(".git/hooks/pre-commit");
    fs::write(&hook_path, "#!/bin/sh\nexit 0\n").unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&hook_path).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&hook_path, perms).unwrap();
    }

    let output = Command::new(githooked_bin())
        .args(["hook", "list", "pre-commit"])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "local: lint");
    assert!(lines[1].starts_with("hookdir: "));
    assert!(lines[1].ends_with(" (will warn but run)"));
}
