//! Stateful repository areas
//!
//! - `storage`: storage backends every other area reads and writes through
//! - `database`: content-addressed store for blobs and commits
//! - `index`: staging area (pending additions and removals)
//! - `refs`: branch pointers and HEAD
//! - `workspace`: the flat working directory
//! - `repository`: the handle tying the areas together

pub(crate) mod database;
pub(crate) mod index;
pub(crate) mod refs;
pub mod repository;
pub mod storage;
pub(crate) mod workspace;
