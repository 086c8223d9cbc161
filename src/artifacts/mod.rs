//! Data structures and algorithms
//!
//! - `branch`: branch name validation
//! - `checkout`: working-directory migration plans and the overwrite guard
//! - `core`: shared output helpers (pager writer, colouring)
//! - `merge`: ancestry resolution and three-way file merge
//! - `objects`: object ids, blobs, commits and snapshots
//! - `status`: working tree status report

pub mod branch;
pub mod checkout;
pub mod core;
pub mod merge;
pub mod objects;
pub mod status;
