use crate::areas::repository::Repository;

impl Repository {
    /// Move the current branch to any commit and check its files out
    pub async fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        let target_oid = self.database().resolve_commit(commit)?;

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
        self.refs().update_head(&target_oid)?;

        index.write_updates()?;

        Ok(())
    }
}
