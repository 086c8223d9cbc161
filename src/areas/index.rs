//! Staging area
//!
//! Records the user's intent for the next commit relative to the current branch
//! tip: a set of pending additions (name -> exact bytes) and a set of pending
//! removals.
//!
//! ## On-disk layout
//!
//! - `.sprig/staging/add/<name>`: the staged bytes of `<name>`
//! - `.sprig/staging/remove/<name>`: empty marker, `<name>` is staged for removal
//!
//! The whole area is loaded with [`Index::rehydrate`] at the start of a command
//! and persisted with [`Index::write_updates`] at the end; in between it is
//! only changed in memory.

use crate::areas::storage::Storage;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::snapshot::Snapshot;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const ADDITIONS_DIR: &str = "add";
const REMOVALS_DIR: &str = "remove";

pub struct Index {
    storage: Arc<dyn Storage>,
    /// Staging directory relative to the storage root (`.sprig/staging`)
    path: Box<Path>,
    additions: BTreeMap<String, Bytes>,
    removals: BTreeSet<String>,
    /// Set when the in-memory sets diverge from what is persisted
    changed: bool,
}

impl fmt::Debug for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Index")
            .field("path", &self.path)
            .field("additions", &self.additions.keys().collect::<Vec<_>>())
            .field("removals", &self.removals)
            .finish()
    }
}

impl Index {
    pub fn new(storage: Arc<dyn Storage>, path: Box<Path>) -> Self {
        Index {
            storage,
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    fn additions_path(&self) -> PathBuf {
        self.path.join(ADDITIONS_DIR)
    }

    fn removals_path(&self) -> PathBuf {
        self.path.join(REMOVALS_DIR)
    }

    /// Load both staged sets from storage, discarding in-memory changes
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();

        let additions_path = self.additions_path();
        for name in self.storage.list_dir(&additions_path)? {
            let content = self.storage.read(&additions_path.join(&name))?;
            self.additions.insert(name, content);
        }
        self.removals
            .extend(self.storage.list_dir(&self.removals_path())?);

        self.changed = false;

        Ok(())
    }

    /// Lay out an empty staging area
    pub fn create(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = true;

        self.write_updates()
    }

    /// Persist both sets, replacing whatever was staged before
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        let additions_path = self.additions_path();
        for name in self.storage.list_dir(&additions_path)? {
            if !self.additions.contains_key(&name) {
                self.storage.remove(&additions_path.join(&name))?;
            }
        }
        for (name, content) in &self.additions {
            let entry_path = additions_path.join(name);
            let unchanged = self
                .storage
                .read(&entry_path)
                .map(|persisted| &persisted == content)
                .unwrap_or(false);
            if !unchanged {
                self.storage.write(&entry_path, content)?;
            }
        }

        let removals_path = self.removals_path();
        for name in self.storage.list_dir(&removals_path)? {
            if !self.removals.contains(&name) {
                self.storage.remove(&removals_path.join(&name))?;
            }
        }
        for name in &self.removals {
            let entry_path = removals_path.join(name);
            if !self.storage.exists(&entry_path) {
                self.storage.write(&entry_path, &[])?;
            }
        }

        self.storage.create_dir(&additions_path)?;
        self.storage.create_dir(&removals_path)?;
        self.changed = false;

        Ok(())
    }

    /// Stage `content` as the next version of `name`, cancelling a pending removal
    pub fn add(&mut self, name: String, content: Bytes) {
        self.removals.remove(&name);
        self.additions.insert(name, content);
        self.changed = true;
    }

    /// Drop a pending addition; returns whether there was one
    pub fn unstage_addition(&mut self, name: &str) -> bool {
        let removed = self.additions.remove(name).is_some();
        self.changed |= removed;
        removed
    }

    /// Drop a pending removal; returns whether there was one
    pub fn unstage_removal(&mut self, name: &str) -> bool {
        let removed = self.removals.remove(name);
        self.changed |= removed;
        removed
    }

    /// Mark `name` for removal, cancelling a pending addition
    pub fn mark_removal(&mut self, name: String) {
        self.additions.remove(&name);
        self.removals.insert(name);
        self.changed = true;
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.additions.clear();
            self.removals.clear();
            self.changed = true;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, name: &str) -> bool {
        self.additions.contains_key(name)
    }

    pub fn additions(&self) -> impl Iterator<Item = (&String, &Bytes)> {
        self.additions.iter()
    }

    pub fn removals(&self) -> impl Iterator<Item = &String> {
        self.removals.iter()
    }

    /// Blobs for every staged addition
    pub fn staged_blobs(&self) -> impl Iterator<Item = Blob> + '_ {
        self.additions
            .iter()
            .map(|(name, content)| Blob::new(name.clone(), content.clone()))
    }

    /// `base` with the staged additions overlaid and the staged removals deleted
    ///
    /// Returns the new snapshot together with the blobs it references that the
    /// object store does not necessarily hold yet.
    pub fn apply_to(&self, base: &Snapshot) -> anyhow::Result<(Snapshot, Vec<Blob>)> {
        let mut snapshot = base.clone();
        let mut blobs = Vec::with_capacity(self.additions.len());

        for blob in self.staged_blobs() {
            snapshot.insert(blob.name().to_string(), blob.object_id()?);
            blobs.push(blob);
        }
        for name in &self.removals {
            snapshot.remove(name);
        }

        Ok((snapshot, blobs))
    }
}
