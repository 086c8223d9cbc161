use crate::areas::repository::Repository;

impl Repository {
    /// Every commit ever made, in id order
    pub fn global_log(&self) -> anyhow::Result<()> {
        for commit_oid in self.database().list_commits()? {
            let commit = self.database().load_commit(&commit_oid)?;
            self.display_commit(&commit_oid, &commit)?;
        }

        Ok(())
    }
}
