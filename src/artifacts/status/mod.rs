//! Working tree status inspection
//!
//! Compares the working directory against the staging area and the current
//! branch tip.
//!
//! ## Components
//!
//! - `file_change`: how an unstaged working file differs from what would be committed
//! - `status_info`: the five-section report and its rendering

pub mod file_change;
pub mod status_info;
