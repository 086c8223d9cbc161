use crate::areas::repository::{REPOSITORY_DIR, Repository};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::path::Path;

impl Repository {
    pub async fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        let repository_path = Path::new(REPOSITORY_DIR);
        for object_type in [ObjectType::Blob, ObjectType::Commit] {
            self.storage()
                .create_dir(&repository_path.join(object_type.directory()))
                .with_context(|| format!("Failed to create the {object_type} directory"))?;
        }
        self.storage()
            .create_dir(&self.refs().branches_path())
            .context("Failed to create the branches directory")?;

        let root_oid = self
            .database()
            .store(&Commit::root())
            .context("Failed to store the initial commit")?;

        let branch = BranchName::default_branch();
        self.refs().create_branch(&branch, &root_oid)?;
        self.refs()
            .set_head(&branch)
            .context("Failed to create the initial HEAD")?;

        let index = self.index();
        let mut index = index.lock().await;
        index
            .create()
            .context("Failed to create the staging area")?;

        tracing::info!(root = %root_oid, path = %self.path().display(), "initialized repository");

        Ok(())
    }
}
