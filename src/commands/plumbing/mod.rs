//! Plumbing shared by the porcelain commands
//!
//! - `write_commit`: freeze the staging area into a commit on the current branch
//! - `migrate`: move the working directory from one snapshot to another

mod migrate;
mod write_commit;
