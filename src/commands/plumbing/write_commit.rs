use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, commit_timestamp};
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Commit the current tip's snapshot with the staged changes applied
    ///
    /// Moves the current branch to the new commit and clears `index` in memory;
    /// persisting the cleared staging area is left to the caller.
    pub(crate) fn write_commit(
        &self,
        index: &mut Index,
        parents: Vec<ObjectId>,
        message: String,
    ) -> anyhow::Result<ObjectId> {
        let (_, head_commit) = self.head_commit()?;
        let (snapshot, blobs) = index.apply_to(head_commit.snapshot())?;

        for blob in &blobs {
            self.database().store(blob)?;
        }

        let timestamp = commit_timestamp(self.settings().commit_date);
        let commit = Commit::new(parents, snapshot, timestamp, message);
        let commit_id = self.database().store(&commit)?;
        self.refs().update_head(&commit_id)?;
        index.clear();

        tracing::info!(
            oid = %commit_id,
            parents = commit.parents().len(),
            files = commit.snapshot().len(),
            "created commit"
        );

        Ok(commit_id)
    }
}
