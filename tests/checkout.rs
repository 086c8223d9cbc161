use crate::common::command::{
    branch_tip, committed_repository_dir, current_branch, run_sprig_command, stage_and_commit,
    stdout_of,
};
use crate::common::file::{FileSpec, read_file, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

const IN_THE_WAY: &str =
    "There is an untracked file in the way; delete it, or add and commit it first.\n";

#[rstest]
fn checkout_file_restores_the_tip_version(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "scribbles".to_string()));

    run_sprig_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(read_file(&dir.join("a.txt")), "a");

    Ok(())
}

#[rstest]
fn checkout_file_from_an_abbreviated_commit_id(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    let first = branch_tip(dir, "master");
    stage_and_commit(dir, &[("a.txt", "a2")], "second");

    run_sprig_command(dir, &["checkout", &first[..8], "--", "a.txt"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "a");
    // the staging area is left alone
    assert!(!dir.join(".sprig/staging/add/a.txt").exists());

    Ok(())
}

#[rstest]
#[case(&["checkout", "0000000", "--", "a.txt"], "No commit with that id exists.\n")]
#[case(&["checkout", "--", "ghost.txt"], "File does not exist in that commit.\n")]
#[case(&["checkout", "nowhere"], "No such branch exists.\n")]
#[case(&["reset", "0000000"], "No commit with that id exists.\n")]
fn unknown_references_are_reported(
    committed_repository_dir: TempDir,
    #[case] args: &[&str],
    #[case] message: &'static str,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(committed_repository_dir.path(), args)
        .assert()
        .code(4)
        .stdout(message);

    Ok(())
}

#[rstest]
fn checking_out_the_current_branch_fails(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(committed_repository_dir.path(), &["checkout", "master"])
        .assert()
        .code(3)
        .stdout("No need to checkout the current branch.\n");

    Ok(())
}

#[rstest]
fn checkout_branch_replaces_the_working_directory(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    run_sprig_command(dir, &["branch", "other"])
        .assert()
        .success();
    run_sprig_command(dir, &["rm", "b.txt"]).assert().success();
    stage_and_commit(dir, &[("a.txt", "a2"), ("c.txt", "c")], "second");
    write_file(FileSpec::new(dir.join("untracked.txt"), "u".to_string()));

    run_sprig_command(dir, &["checkout", "other"])
        .assert()
        .success();

    assert_eq!(current_branch(dir), "other");
    assert_eq!(read_file(&dir.join("a.txt")), "a");
    assert_eq!(read_file(&dir.join("b.txt")), "b");
    assert!(!dir.join("c.txt").exists());
    assert_eq!(read_file(&dir.join("untracked.txt")), "u");

    run_sprig_command(dir, &["checkout", "master"])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("a.txt")), "a2");
    assert_eq!(read_file(&dir.join("c.txt")), "c");
    assert!(!dir.join("b.txt").exists());

    Ok(())
}

#[rstest]
fn checkout_branch_refuses_to_overwrite_unsaved_work(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    run_sprig_command(dir, &["branch", "other"])
        .assert()
        .success();
    run_sprig_command(dir, &["checkout", "other"])
        .assert()
        .success();
    stage_and_commit(dir, &[("c.txt", "c from other")], "other work");
    run_sprig_command(dir, &["checkout", "master"])
        .assert()
        .success();

    // untracked on master, but other would write it
    write_file(FileSpec::new(dir.join("c.txt"), "mine".to_string()));
    std::fs::remove_file(dir.join("b.txt"))?;

    run_sprig_command(dir, &["checkout", "other"])
        .assert()
        .code(5)
        .stdout(IN_THE_WAY);

    assert_eq!(current_branch(dir), "master");
    assert_eq!(read_file(&dir.join("c.txt")), "mine");
    assert_eq!(read_file(&dir.join("a.txt")), "a");
    assert!(!dir.join("b.txt").exists());

    Ok(())
}

#[rstest]
fn reset_moves_the_branch_and_clears_the_staging_area(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    let first = branch_tip(dir, "master");
    stage_and_commit(dir, &[("a.txt", "a2"), ("c.txt", "c")], "second");
    write_file(FileSpec::new(dir.join("d.txt"), "d".to_string()));
    run_sprig_command(dir, &["add", "d.txt"]).assert().success();

    run_sprig_command(dir, &["reset", &first[..10]])
        .assert()
        .success();

    assert_eq!(current_branch(dir), "master");
    assert_eq!(branch_tip(dir, "master"), first);
    assert_eq!(read_file(&dir.join("a.txt")), "a");
    assert!(!dir.join("c.txt").exists());
    assert!(dir.join("d.txt").exists());
    assert!(stdout_of(dir, &["status"]).contains("=== Staged Files ===\n\n"));

    Ok(())
}

#[rstest]
fn reset_refuses_to_overwrite_unsaved_work(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    let first = branch_tip(dir, "master");
    stage_and_commit(dir, &[("a.txt", "a2")], "second");
    let second = branch_tip(dir, "master");
    write_file(FileSpec::new(dir.join("a.txt"), "unsaved".to_string()));

    run_sprig_command(dir, &["reset", &first])
        .assert()
        .code(5)
        .stdout(IN_THE_WAY);

    assert_eq!(branch_tip(dir, "master"), second);
    assert_eq!(read_file(&dir.join("a.txt")), "unsaved");

    Ok(())
}
