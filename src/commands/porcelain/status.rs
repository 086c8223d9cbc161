use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::StatusInfo;

impl Repository {
    pub async fn status(&mut self) -> anyhow::Result<()> {
        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let working = self.workspace().working_files()?;

        let status = StatusInfo::collect(
            self.refs().list_branches()?,
            self.refs().current_branch()?,
            head_commit.snapshot(),
            &index,
            &working,
        )?;
        tracing::debug!(clean = status.is_clean(), "collected status");
        status.render(&mut *self.writer(), self.settings().color)?;

        Ok(())
    }
}
