//! Repository object types
//!
//! Every persisted object is addressed by the SHA-1 of its wire form:
//!
//! - **Blob**: one version of one file, `blob <name>\0<content>`
//! - **Commit**: message, timestamp, parents and snapshot, `commit <size>\0<content>`
//!
//! Because the blob header carries the file name, a blob id is a hash of
//! (name, content), and a commit id changes whenever any part of the commit does.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod snapshot;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;

/// Length of the abbreviated form used in log output
pub const SHORT_OBJECT_ID_LENGTH: usize = 7;
