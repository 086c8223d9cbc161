//! Command implementations
//!
//! Every command is an `impl Repository` block:
//!
//! - `plumbing`: internal building blocks (commit writing, working-directory migration)
//! - `porcelain`: the user-facing commands
//!
//! Commands report rejected requests as [`crate::errors::RepositoryError`] and
//! check every precondition before changing anything.

mod plumbing;
pub mod porcelain;
