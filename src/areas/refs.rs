//! Branches and HEAD
//!
//! ## File Format
//!
//! - `.sprig/branches/<name>`: the 40-character id of the branch tip
//! - `.sprig/HEAD`: the name of the checked-out branch
//!
//! HEAD always names a branch; there is no detached state.

use crate::areas::storage::Storage;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the HEAD file
pub const HEAD_REF_NAME: &str = "HEAD";

const BRANCHES_DIR: &str = "branches";

#[derive(Debug)]
pub struct Refs {
    storage: Arc<dyn Storage>,
    /// Repository directory relative to the storage root (`.sprig`)
    path: Box<Path>,
}

impl Refs {
    pub fn new(storage: Arc<dyn Storage>, path: Box<Path>) -> Self {
        Refs { storage, path }
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn branches_path(&self) -> PathBuf {
        self.path.join(BRANCHES_DIR)
    }

    fn branch_path(&self, name: &BranchName) -> PathBuf {
        self.branches_path().join(name.as_ref())
    }

    /// Name of the checked-out branch
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let content = self.storage.read(&self.head_path()).context("failed to read HEAD")?;
        let name = String::from_utf8(content.to_vec()).context("HEAD is not valid UTF-8")?;

        BranchName::try_parse(name.trim().to_string()).context("HEAD names an invalid branch")
    }

    pub fn is_current_branch(&self, name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == name)
    }

    pub fn set_head(&self, name: &BranchName) -> anyhow::Result<()> {
        self.storage
            .write(&self.head_path(), name.as_ref().as_bytes())
            .context("failed to update HEAD")?;
        tracing::debug!(branch = %name, "moved HEAD");

        Ok(())
    }

    /// Tip of the checked-out branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let current = self.current_branch()?;

        self.read_branch(&current)?
            .with_context(|| format!("current branch {current} has no tip"))
    }

    pub fn read_branch(&self, name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(name);
        if !self.storage.exists(&branch_path) {
            return Ok(None);
        }

        let content = self
            .storage
            .read(&branch_path)
            .with_context(|| format!("failed to read branch {name}"))?;
        let content = String::from_utf8(content.to_vec())
            .with_context(|| format!("branch {name} is not valid UTF-8"))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    /// Look up a branch by a user-supplied name; invalid names simply do not exist
    pub fn find_branch(&self, name: &str) -> anyhow::Result<Option<(BranchName, ObjectId)>> {
        let Ok(name) = BranchName::try_parse(name.to_string()) else {
            return Ok(None);
        };

        Ok(self.read_branch(&name)?.map(|oid| (name, oid)))
    }

    pub fn create_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        if self.storage.exists(&self.branch_path(name)) {
            return Err(RepositoryError::DuplicateBranch.into());
        }

        self.update_branch(name, oid)
    }

    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.storage
            .write(&self.branch_path(name), oid.as_ref().as_bytes())
            .with_context(|| format!("failed to update branch {name}"))?;
        tracing::debug!(branch = %name, oid = %oid, "moved branch");

        Ok(())
    }

    /// Point the checked-out branch at `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_branch(&self.current_branch()?, oid)
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let oid = self
            .read_branch(name)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        self.storage
            .remove(&self.branch_path(name))
            .with_context(|| format!("failed to delete branch {name}"))?;
        tracing::debug!(branch = %name, oid = %oid, "deleted branch");

        Ok(oid)
    }

    /// All branches, sorted by name
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        Ok(self
            .storage
            .list_dir(&self.branches_path())?
            .into_iter()
            .filter_map(|name| BranchName::try_parse(name).ok())
            .collect())
    }
}
