//! User-facing commands
//!
//! - `init`: create the repository with its root commit
//! - `add`, `rm`: stage a file for addition or removal
//! - `commit`: freeze the staging area into a new commit
//! - `log`, `global_log`, `find`: inspect history
//! - `status`: branches, staging area and working directory changes
//! - `checkout`: restore a file or switch branches
//! - `branch`: create and remove branches
//! - `reset`: move the current branch to any commit
//! - `merge`: merge another branch into the current one

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod global_log;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
