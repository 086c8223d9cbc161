use crate::areas::repository::Repository;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        if message.trim().is_empty() {
            return Err(RepositoryError::EmptyMessage.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the staging area from the disk
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::EmptyStagingArea.into());
        }

        let (head_oid, _) = self.head_commit()?;
        self.write_commit(&mut index, vec![head_oid], message.to_string())?;

        index.write_updates()?;

        Ok(())
    }
}
