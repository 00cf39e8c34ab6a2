//! CLI-level tests for `merge-one-file`, covering the add/add and
//! symmetric-delete scenarios from the merge dispatch table.

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

fn hash_object(repo_path: &std::path::Path, content: &str) -> String {
    use std::io::Write;
    let mut child = Command::new("git")
        .args(["hash-object", "-w", "--stdin"])
        .current_dir(repo_path)
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

#[test]
fn add_add_identical_content_differing_mode_is_a_permissions_conflict() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();
    let oid = hash_object(repo_path, "same content\n");

    let output = Command::new(githooked_bin())
        .args([
            "merge-one-file",
            "",
            &oid,
            &oid,
            "file.txt",
            "",
            "100644",
            "100755",
        ])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(!output.status.success(), "expected non-zero exit on permissions conflict");
    assert!(!repo_path.join("file.txt").exists(), "no file should be written on a fatal classification error");
}

#[test]
fn symmetric_delete_unstages_and_unlinks() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();
    let oid = hash_object(repo_path, "gone\n");

    let working_file = repo_path.join("deleted.txt");
    std::fs::write(&working_file, "gone\n").unwrap();

    let output = Command::new(githooked_bin())
        .args([
            "merge-one-file",
            &oid,
            &oid,
            "",
            "deleted.txt",
            "100644",
            "100644",
            "",
        ])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(output.status.success(), "symmetric delete should resolve cleanly: {:?}", output);
    assert!(!working_file.exists(), "working-tree file should be unlinked");
}

#[test]
fn mode_without_oid_is_a_configuration_error() {
    let temp_dir = setup_test_repo();
    let repo_path = temp_dir.path();

    let output = Command::new(githooked_bin())
        .args([
            "merge-one-file", "", "", "", "file.txt", "", "100644", "",
        ])
        .current_dir(repo_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
}
