use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;

impl Repository {
    /// Create a branch at the current tip without switching to it
    pub fn branch(&mut self, name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(name.to_string())?;
        let head_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &head_oid)?;

        Ok(())
    }

    pub fn rm_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let (branch_name, _) = self
            .refs()
            .find_branch(name)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::CannotRemoveCurrent.into());
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
