//! CLI-level tests for `merge-octopus`: the short-circuit scenarios from
//! the testable-properties section (too few remotes, remotes already
//! ancestors of head).

use std::process::Command;

use tempfile::TempDir;

fn githooked_bin() -> std::path::PathBuf {
    assert_cmd::cargo::cargo_bin("githooked")
}

fn git(repo_path: &std::path::Path, args: &[&str]) -> String {
    let output = Command::new("git").args(args).current_dir(repo_path).output().unwrap();
    assert!(output.status.success(), "git {args:?} failed: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn setup_linear_history() -> (TempDir, String, String, String) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().to_path_buf();

    git(&repo_path, &["init"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);
    git(&repo_path, &["config", "commit.gpgsign", "false"]);

    std::fs::write(repo_path.join("a.txt"), "a\n").unwrap();
    git(&repo_path, &["add", "a.txt"]);
    git(&repo_path, &["commit", "-m", "A"]);
    let commit_a = git(&repo_path, &["rev-parse", "HEAD"]);

    std::fs::write(repo_path.join("b.txt"), "b\n").unwrap();
    git(&repo_path, &["add", "b.txt"]);
    git(&repo_path, &["commit", "-m", "B"]);
    let commit_b = git(&repo_path, &["rev-parse", "HEAD"]);

    std::fs::write(repo_path.join("c.txt"), "c\n").unwrap();
    git(&repo_path, &["add", "c.txt"]);
    git(&repo_path, &["commit", "-m", "C"]);
    let commit_c = git(&repo_path, &["rev-parse", "HEAD"]);

    (temp_dir, commit_a, commit_b, commit_c)
}

#[test]
fn single_remote_is_refused() {
    let (temp_dir, commit_a, _commit_b, commit_c) = setup_linear_history();
    let repo_path = temp_dir.path();

    let output = Command::new(githooked_bin())
        .args(["merge-octopus", "--", &commit_c, &commit_a])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn remotes_already_ancestors_of_head_are_up_to_date() {
    let (temp_dir, commit_a, commit_b, commit_c) = setup_linear_history();
    let repo_path = temp_dir.path();

    let output = Command::new(githooked_bin())
        .args(["merge-octopus", "--", &commit_c, &commit_a, &commit_b])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("Already up to date").count(), 2);

    let status = Command::new("git").args(["status", "--porcelain"]).current_dir(repo_path).output().unwrap();
    assert!(String::from_utf8_lossy(&status.stdout).trim().is_empty(), "no index mutation expected");
}
