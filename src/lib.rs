//! sprig: a small local version-control engine
//!
//! A single-repository, content-addressed store with branches, a staging area
//! and a two-parent merge that locates a split point and performs a three-way
//! file merge with conflict markers.
//!
//! - `areas`: stateful parts of a repository (storage, objects, staging, refs, workspace)
//! - `artifacts`: data structures and algorithms (objects, ancestry, merge, checkout, status)
//! - `commands`: user-facing operations, implemented on [`areas::repository::Repository`]
//! - `config`: environment-driven settings
//! - `errors`: the user-facing error taxonomy and its exit codes
//! - `logging`: tracing subscriber bootstrap

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod config;
pub mod errors;
pub mod logging;
