use crate::areas::repository::Repository;
use crate::errors::RepositoryError;

impl Repository {
    pub async fn rm(&mut self, name: &str) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let tracked = head_commit.snapshot().contains(name);
        if !tracked && !index.is_staged_for_addition(name) {
            return Err(RepositoryError::NothingToRemove.into());
        }

        index.unstage_addition(name);
        if tracked {
            index.mark_removal(name.to_string());
            if self.workspace().file_exists(name) {
                self.workspace().remove_file(name)?;
            }
        }
        tracing::debug!(file = name, tracked, "unstaged file");

        index.write_updates()?;

        Ok(())
    }
}
