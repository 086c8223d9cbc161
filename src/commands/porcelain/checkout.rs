use crate::areas::repository::Repository;
use crate::errors::RepositoryError;

impl Repository {
    /// Restore one file from the current tip, or from the commit named by a
    /// (possibly abbreviated) id; the staging area is left alone
    pub fn checkout_file(&mut self, commit: Option<&str>, name: &str) -> anyhow::Result<()> {
        let commit_oid = match commit {
            Some(prefix) => self.database().resolve_commit(prefix)?,
            None => self.refs().read_head()?,
        };
        let commit = self.database().load_commit(&commit_oid)?;

        let blob_oid = commit
            .snapshot()
            .get(name)
            .ok_or(RepositoryError::FileNotInCommit)?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(name, blob.content())?;
        tracing::debug!(file = name, commit = %commit_oid, "restored file");

        Ok(())
    }

    /// Switch to another branch, replacing the working directory with its tip
    pub async fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let (branch_name, target_oid) = self
            .refs()
            .find_branch(name)?
            .ok_or(RepositoryError::NoSuchCheckoutBranch)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyOnBranch.into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.migrate_working_directory(
            &mut index,
            head_commit.snapshot(),
            target_commit.snapshot(),
        )?;
        self.refs().set_head(&branch_name)?;

        index.write_updates()?;

        Ok(())
    }
}
