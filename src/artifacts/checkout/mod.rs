//! Working-directory synchronisation
//!
//! Moving the working directory to another snapshot happens in two steps:
//! - Plan the file writes and deletions and run the overwrite guard over them
//! - Apply the resulting [`migration::Migration`] to the workspace
//!
//! Nothing is written until the whole plan has passed the guard, so a refused
//! checkout, reset or merge leaves the working directory untouched.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;

pub mod guard;
pub mod migration;

/// Files currently in the working directory, by name, with the blob id their
/// content would have if it were staged
pub type WorkingFiles = BTreeMap<String, ObjectId>;
