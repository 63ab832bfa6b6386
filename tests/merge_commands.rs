use crate::common::command::{
    assert_user_error, branch_commit_id, commit_file, head_commit_id, init_repository_dir,
    run_twig_command, twig_output,
};
use crate::common::file::{count_objects, list_working_files};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::{Path, PathBuf};

mod common;

fn checkout(dir: &Path, branch: &str) {
    run_twig_command(dir, &["checkout", branch])
        .assert()
        .success()
        .stdout("");
}

fn branch(dir: &Path, name: &str) {
    run_twig_command(dir, &["branch", name]).assert().success();
}

fn short(id: &str) -> &str {
    &id[..7]
}

#[rstest]
fn merging_an_ancestor_changes_nothing(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "a.txt", "a", "A");
    branch(dir, "old");
    commit_file(dir, "a.txt", "b", "B");
    let head_before = head_commit_id(dir);
    let commits_before = count_objects(dir, "commits");

    run_twig_command(dir, &["merge", "old"])
        .assert()
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");

    assert_eq!(head_commit_id(dir), head_before);
    assert_eq!(count_objects(dir, "commits"), commits_before);
    init_repository_dir.child("a.txt").assert("b");
}

#[rstest]
fn merging_a_descendant_fast_forwards(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "a.txt", "a", "A");
    branch(dir, "feature");
    checkout(dir, "feature");
    commit_file(dir, "b.txt", "b", "B");
    commit_file(dir, "a.txt", "a2", "C");
    let feature_id = head_commit_id(dir);
    checkout(dir, "master");
    let commits_before = count_objects(dir, "commits");

    run_twig_command(dir, &["merge", "feature"])
        .assert()
        .success()
        .stdout("Current branch fast-forwarded.\n");

    assert_eq!(branch_commit_id(dir, "master"), feature_id);
    assert_eq!(count_objects(dir, "commits"), commits_before);
    assert_eq!(
        list_working_files(dir),
        vec![PathBuf::from("a.txt"), PathBuf::from("b.txt")]
    );
    init_repository_dir.child("a.txt").assert("a2");
}

/// A - B - C - D  (master)
///      \
///       E        (other)
///
/// `f.txt` only changes between A and B and again in E; merging from the
/// first common ancestor B takes E's version without a conflict.
#[rstest]
fn split_point_on_linear_history_is_the_branching_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "f.txt", "a", "A");
    commit_file(dir, "f.txt", "b", "B");
    branch(dir, "other");
    commit_file(dir, "g.txt", "c", "C");
    commit_file(dir, "g.txt", "d", "D");
    checkout(dir, "other");
    commit_file(dir, "f.txt", "e", "E");
    checkout(dir, "master");

    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("");

    init_repository_dir.child("f.txt").assert("e");
    init_repository_dir.child("g.txt").assert("d");
    let log = twig_output(dir, &["log"]);
    assert!(log.starts_with("===\ncommit "));
    assert!(log.contains("\nMerged other into master.\n"));
}

#[rstest]
fn conflicting_changes_are_marked_and_committed(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "a.txt", "1", "C1");
    branch(dir, "other");
    checkout(dir, "other");
    commit_file(dir, "a.txt", "2", "C2");
    let other_id = head_commit_id(dir);
    checkout(dir, "master");
    commit_file(dir, "a.txt", "3", "C3");
    let master_id = head_commit_id(dir);

    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    init_repository_dir
        .child("a.txt")
        .assert("<<<<<<< HEAD\n3=======\n2>>>>>>>\n");
    let log = twig_output(dir, &["log"]);
    let merge_entry = log.split("===\n").nth(1).unwrap();
    assert!(merge_entry.starts_with(&format!("commit {}\n", head_commit_id(dir))));
    assert!(merge_entry.contains(&format!(
        "\nMerge: {} {}\n",
        short(&master_id),
        short(&other_id)
    )));
    assert!(merge_entry.ends_with("Merged other into master.\n\n"));
    // log follows first parents only
    assert!(!log.contains(&format!("commit {other_id}")));
}

#[rstest]
fn clean_merge_takes_given_changes_and_stages_them(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "changed.txt", "base", "base 1");
    commit_file(dir, "deleted.txt", "base", "base 2");
    commit_file(dir, "kept.txt", "base", "base 3");
    branch(dir, "other");
    checkout(dir, "other");
    commit_file(dir, "changed.txt", "theirs", "change");
    commit_file(dir, "added/new.txt", "theirs", "add");
    run_twig_command(dir, &["rm", "deleted.txt"]).assert().success();
    run_twig_command(dir, &["commit", "delete"]).assert().success();
    checkout(dir, "master");
    commit_file(dir, "kept.txt", "mine", "keep mine");

    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("");

    init_repository_dir.child("changed.txt").assert("theirs");
    init_repository_dir.child("added/new.txt").assert("theirs");
    init_repository_dir.child("kept.txt").assert("mine");
    init_repository_dir
        .child("deleted.txt")
        .assert(predicate::path::missing());
    // everything the merge did is in the merge commit
    assert_eq!(
        twig_output(dir, &["status"]),
        "=== Branches ===\n*master\nother\n\n\
         === Staged Files ===\n\n\
         === Removed Files ===\n\n\
         === Modifications Not Staged For Commit ===\n\n\
         === Untracked Files ===\n\n"
    );
}

#[rstest]
fn untracked_file_in_the_way_aborts_the_merge(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "base.txt", "base", "base");
    branch(dir, "other");
    checkout(dir, "other");
    commit_file(dir, "base.txt", "theirs", "change base");
    commit_file(dir, "new.txt", "theirs", "add new");
    checkout(dir, "master");
    commit_file(dir, "mine.txt", "mine", "mine");
    init_repository_dir.child("new.txt").write_str("untracked").unwrap();
    let head_before = head_commit_id(dir);

    assert_user_error(
        dir,
        &["merge", "other"],
        "There is an untracked file in the way; delete it, or add and commit it first.",
    );

    assert_eq!(head_commit_id(dir), head_before);
    init_repository_dir.child("new.txt").assert("untracked");
    init_repository_dir.child("base.txt").assert("base");
    init_repository_dir
        .child(".twig/staging/additions")
        .assert(predicate::path::missing());
}

#[rstest]
fn merge_preconditions(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "a.txt", "a", "A");
    branch(dir, "other");

    assert_user_error(dir, &["merge", "master"], "Cannot merge a branch with itself.");
    assert_user_error(
        dir,
        &["merge", "ghost"],
        "A branch with that name does not exist.",
    );

    init_repository_dir.child("a.txt").write_str("dirty").unwrap();
    run_twig_command(dir, &["add", "a.txt"]).assert().success();
    assert_user_error(dir, &["merge", "ghost"], "You have uncommitted changes.");
}

fn remove_and_commit(dir: &Path, path: &str, message: &str) {
    run_twig_command(dir, &["rm", path]).assert().success();
    run_twig_command(dir, &["commit", message])
        .assert()
        .success()
        .stdout("");
}

#[rstest]
fn untracked_file_where_a_deleted_file_was_modified_aborts_the_merge(
    init_repository_dir: TempDir,
) {
    let dir = init_repository_dir.path();
    commit_file(dir, "f.txt", "base", "base");
    branch(dir, "other");
    checkout(dir, "other");
    commit_file(dir, "f.txt", "theirs", "modify f");
    checkout(dir, "master");
    remove_and_commit(dir, "f.txt", "delete f");
    init_repository_dir.child("f.txt").write_str("untracked").unwrap();
    let head_before = head_commit_id(dir);
    let blobs_before = count_objects(dir, "blobs");

    assert_user_error(
        dir,
        &["merge", "other"],
        "There is an untracked file in the way; delete it, or add and commit it first.",
    );

    assert_eq!(head_commit_id(dir), head_before);
    assert_eq!(count_objects(dir, "blobs"), blobs_before);
    init_repository_dir.child("f.txt").assert("untracked");
}

/// `kept.txt`: modified on master, deleted on other
/// `gone.txt`: deleted on master, modified on other
/// `new.txt`:  added with different contents on both
#[rstest]
fn one_sided_and_added_conflicts_are_written_with_markers(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "kept.txt", "base", "base kept");
    commit_file(dir, "gone.txt", "base", "base gone");
    branch(dir, "other");
    commit_file(dir, "kept.txt", "mine", "modify kept");
    remove_and_commit(dir, "gone.txt", "delete gone");
    commit_file(dir, "new.txt", "mine", "add new");
    checkout(dir, "other");
    remove_and_commit(dir, "kept.txt", "delete kept");
    commit_file(dir, "gone.txt", "theirs", "modify gone");
    commit_file(dir, "new.txt", "theirs", "add new");
    checkout(dir, "master");

    run_twig_command(dir, &["merge", "other"])
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    init_repository_dir
        .child("kept.txt")
        .assert("<<<<<<< HEAD\nmine=======\n>>>>>>>\n");
    init_repository_dir
        .child("gone.txt")
        .assert("<<<<<<< HEAD\n=======\ntheirs>>>>>>>\n");
    init_repository_dir
        .child("new.txt")
        .assert("<<<<<<< HEAD\nmine=======\ntheirs>>>>>>>\n");
    assert_eq!(
        list_working_files(dir),
        vec![
            PathBuf::from("gone.txt"),
            PathBuf::from("kept.txt"),
            PathBuf::from("new.txt"),
        ]
    );
    assert!(twig_output(dir, &["status"]).contains("=== Staged Files ===\n\n"));
}
