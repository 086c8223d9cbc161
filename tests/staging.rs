use crate::common::command::{
    committed_repository_dir, init_repository_dir, repository_dir, run_sprig_command,
    sprig_commit, stdout_of,
};
use crate::common::commit_ids;
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

#[rstest]
fn add_stores_the_file_in_the_staging_area(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("notes.txt"), "hello\n".to_string()));

    run_sprig_command(dir, &["add", "notes.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let staged = std::fs::read_to_string(dir.join(".sprig/staging/add/notes.txt"))?;
    assert_eq!(staged, "hello\n");

    Ok(())
}

#[rstest]
fn adding_a_missing_file_fails(
    init_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(init_repository_dir.path(), &["add", "ghost.txt"])
        .assert()
        .code(4)
        .stdout("File does not exist.\n");

    Ok(())
}

#[rstest]
#[case("sub/f.txt")]
#[case(".sprig/HEAD")]
#[case(".sprig")]
fn only_top_level_files_can_be_added(
    init_repository_dir: TempDir,
    #[case] name: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = init_repository_dir.path();
    std::fs::create_dir(dir.join("sub"))?;
    write_file(FileSpec::new(dir.join("sub/f.txt"), "nested".to_string()));

    run_sprig_command(dir, &["add", name])
        .assert()
        .code(4)
        .stdout("File does not exist.\n");

    // the staging area is still readable by every later command
    assert!(std::fs::read_dir(dir.join(".sprig/staging/add"))?.next().is_none());
    run_sprig_command(dir, &["status"]).assert().success();
    run_sprig_command(dir, &["rm", name])
        .assert()
        .code(3)
        .stdout("No reason to remove the file.\n");
    sprig_commit(dir, "m")
        .assert()
        .code(3)
        .stdout("No changes added to the commit.\n");

    Ok(())
}

#[rstest]
fn staging_a_file_identical_to_the_tip_leaves_nothing_to_commit(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    let log_before = stdout_of(dir, &["log"]);

    run_sprig_command(dir, &["add", "a.txt"]).assert().success();
    sprig_commit(dir, "nothing new")
        .assert()
        .code(3)
        .stdout("No changes added to the commit.\n");

    assert_eq!(stdout_of(dir, &["log"]), log_before);
    assert_eq!(commit_ids(&log_before).len(), 2);

    Ok(())
}

#[rstest]
fn re_adding_the_tip_version_unstages_an_earlier_edit(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("a.txt"), "edited".to_string()));
    run_sprig_command(dir, &["add", "a.txt"]).assert().success();

    write_file(FileSpec::new(dir.join("a.txt"), "a".to_string()));
    run_sprig_command(dir, &["add", "a.txt"]).assert().success();

    assert!(!dir.join(".sprig/staging/add/a.txt").exists());
    sprig_commit(dir, "nothing new").assert().code(3);

    Ok(())
}

#[rstest]
fn removing_an_unknown_file_fails_and_keeps_the_staging_area(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("staged.txt"), "s".to_string()));
    write_file(FileSpec::new(dir.join("loose.txt"), "l".to_string()));
    run_sprig_command(dir, &["add", "staged.txt"])
        .assert()
        .success();

    run_sprig_command(dir, &["rm", "loose.txt"])
        .assert()
        .code(3)
        .stdout("No reason to remove the file.\n");

    assert!(dir.join("loose.txt").exists());
    assert!(dir.join(".sprig/staging/add/staged.txt").exists());
    assert!(stdout_of(dir, &["status"]).contains("=== Staged Files ===\nstaged.txt\n"));

    Ok(())
}

#[rstest]
fn removing_a_tracked_file_deletes_it_and_stages_the_removal(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();

    run_sprig_command(dir, &["rm", "a.txt"]).assert().success();

    assert!(!dir.join("a.txt").exists());
    assert!(dir.join(".sprig/staging/remove/a.txt").exists());

    sprig_commit(dir, "drop a").assert().success();
    run_sprig_command(dir, &["checkout", "--", "a.txt"])
        .assert()
        .code(4)
        .stdout("File does not exist in that commit.\n");

    Ok(())
}

#[rstest]
fn removing_a_staged_only_file_keeps_it_in_the_working_directory(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    write_file(FileSpec::new(dir.join("new.txt"), "n".to_string()));
    run_sprig_command(dir, &["add", "new.txt"]).assert().success();

    run_sprig_command(dir, &["rm", "new.txt"]).assert().success();

    assert!(dir.join("new.txt").exists());
    assert!(!dir.join(".sprig/staging/add/new.txt").exists());
    assert!(!dir.join(".sprig/staging/remove/new.txt").exists());

    Ok(())
}

#[rstest]
fn adding_a_removed_file_again_cancels_the_removal(
    committed_repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let dir = committed_repository_dir.path();
    run_sprig_command(dir, &["rm", "a.txt"]).assert().success();

    write_file(FileSpec::new(dir.join("a.txt"), "a".to_string()));
    run_sprig_command(dir, &["add", "a.txt"]).assert().success();

    assert!(!dir.join(".sprig/staging/remove/a.txt").exists());
    sprig_commit(dir, "nothing").assert().code(3);

    Ok(())
}

#[rstest]
fn removing_outside_a_repository_fails(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_sprig_command(repository_dir.path(), &["rm", "a.txt"])
        .assert()
        .code(3);

    Ok(())
}
