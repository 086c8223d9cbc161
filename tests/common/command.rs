use crate::common::COMMIT_DATE;
use crate::common::file::{FileSpec, read_file, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// A fresh repository holding only the initial commit
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_sprig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    repository_dir
}

/// A repository whose master tip tracks `a.txt` ("a") and `b.txt` ("b")
#[fixture]
pub fn committed_repository_dir(init_repository_dir: TempDir) -> TempDir {
    stage_and_commit(
        init_repository_dir.path(),
        &[("a.txt", "a"), ("b.txt", "b")],
        "first",
    );

    init_repository_dir
}

pub fn run_sprig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("sprig").expect("Failed to find sprig binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("SPRIG_COMMIT_DATE", COMMIT_DATE)]);
    cmd.env_remove("SPRIG_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn sprig_commit(dir: &Path, message: &str) -> Command {
    run_sprig_command(dir, &["commit", message])
}

/// Write every file, stage it and commit the lot
pub fn stage_and_commit(dir: &Path, files: &[(&str, &str)], message: &str) {
    for (name, content) in files {
        write_file(FileSpec::new(dir.join(name), content.to_string()));
        run_sprig_command(dir, &["add", name]).assert().success();
    }

    sprig_commit(dir, message).assert().success();
}

pub fn branch_tip(dir: &Path, branch: &str) -> String {
    read_file(&dir.join(".sprig").join("branches").join(branch))
        .trim()
        .to_string()
}

pub fn current_branch(dir: &Path) -> String {
    read_file(&dir.join(".sprig").join("HEAD")).trim().to_string()
}

pub fn head_commit_id(dir: &Path) -> String {
    branch_tip(dir, &current_branch(dir))
}

pub fn stdout_of(dir: &Path, args: &[&str]) -> String {
    let output = run_sprig_command(dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output).expect("stdout is not UTF-8")
}
