#![allow(dead_code)]

pub mod command;
pub mod file;

/// Fixed commit date handed to every command, so runs are reproducible
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

/// `COMMIT_DATE` as shown by `log`
pub const COMMIT_DATE_DISPLAY: &str = "Sun Jan 1 04:00:00 2023 -0800";

/// Timestamp of the root commit as shown by `log`
pub const ROOT_DATE_DISPLAY: &str = "Wed Dec 31 16:00:00 1969 -0800";

/// Ids printed on `commit <id>` lines, in output order
pub fn commit_ids(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}
