use crate::common::COMMIT_DATE;
use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// A repository with one commit tracking `1.txt`, `a/2.txt` and `a/b/3.txt`
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    let dir = init_repository_dir.path();
    for (path, content) in [("1.txt", "one"), ("a/2.txt", "two"), ("a/b/3.txt", "three")] {
        write_file(FileSpec::new(dir.join(path), content.to_string()));
        run_twig_command(dir, &["add", path]).assert().success();
    }
    twig_commit(dir, "Initial commit").assert().success();

    init_repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE);
    cmd.env_remove("TWIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    run_twig_command(dir, &["commit", message])
}

/// Write `content` to `path`, stage it and commit it
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));
    run_twig_command(dir, &["add", path]).assert().success();
    twig_commit(dir, message).assert().success().stdout("");
}

/// Run a command that is expected to fail with a user-facing message
pub fn assert_user_error(dir: &Path, args: &[&str], message: &str) {
    run_twig_command(dir, args)
        .assert()
        .success()
        .stdout(format!("{}\n", message));
}

/// Commit id a branch points at
pub fn branch_commit_id(dir: &Path, branch: &str) -> String {
    let ref_path = dir.join(".twig").join("refs").join("heads").join(branch);

    std::fs::read_to_string(&ref_path)
        .unwrap_or_else(|e| panic!("Failed to read branch {:?}: {}", ref_path, e))
        .trim()
        .to_string()
}

/// Name of the branch HEAD points at
pub fn current_branch(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".twig").join("HEAD"))
        .expect("Failed to read HEAD");

    head.trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD is not a symbolic reference")
        .to_string()
}

pub fn head_commit_id(dir: &Path) -> String {
    branch_commit_id(dir, &current_branch(dir))
}

/// Standard output of a successful command
pub fn twig_output(dir: &Path, args: &[&str]) -> String {
    let output = run_twig_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("Output is not valid UTF-8")
}
