use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn add(&mut self, name: &str) -> anyhow::Result<()> {
        if !self.workspace().file_exists(name) {
            return Err(RepositoryError::NoSuchWorkingFile.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the staging area from the disk
        index.rehydrate()?;

        let blob = self.workspace().parse_blob(name)?;
        let blob_id = blob.object_id()?;
        let (_, head_commit) = self.head_commit()?;

        index.unstage_removal(name);
        if head_commit.snapshot().get(name) == Some(&blob_id) {
            // identical to the tip: there is nothing to commit for this file
            index.unstage_addition(name);
            tracing::debug!(file = name, "file matches the current tip");
        } else {
            index.add(name.to_string(), blob.into_content());
            tracing::debug!(file = name, oid = %blob_id, "staged file");
        }

        index.write_updates()?;

        Ok(())
    }
}
