use crate::artifacts::checkout::WorkingFiles;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::collections::BTreeSet;

/// Collects the working files a pending operation would silently clobber
///
/// A file is in the way when it exists in the working directory and its
/// content matches none of the versions the operation considers safe to
/// overwrite (typically the current tip's version and the version being
/// written).
#[derive(Debug)]
pub struct OverwriteGuard<'w> {
    working: &'w WorkingFiles,
    blocked: BTreeSet<String>,
}

impl<'w> OverwriteGuard<'w> {
    pub fn new(working: &'w WorkingFiles) -> Self {
        OverwriteGuard {
            working,
            blocked: BTreeSet::new(),
        }
    }

    pub fn check(&mut self, name: &str, safe_versions: &[Option<&ObjectId>]) {
        if let Some(working_oid) = self.working.get(name)
            && !safe_versions.contains(&Some(working_oid))
        {
            self.blocked.insert(name.to_string());
        }
    }

    pub fn finish(self) -> Result<(), RepositoryError> {
        if self.blocked.is_empty() {
            Ok(())
        } else {
            tracing::info!(files = ?self.blocked, "refusing to overwrite working files");
            Err(RepositoryError::UntrackedFileInTheWay {
                files: self.blocked.into_iter().collect(),
            })
        }
    }
}
