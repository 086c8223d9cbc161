//! Checkout migration planning
//!
//! [`CheckoutPlan::between`] decides which files must change to move the
//! working directory from the current tip's snapshot to a target snapshot:
//!
//! 1. Every target file whose working version matches neither the target nor
//!    the current tip would lose unsaved edits, so the plan is refused
//! 2. Every target file whose working version differs from the target is written
//! 3. Every file tracked by the current tip but absent from the target is deleted
//!
//! Files the current tip does not track are never deleted.

use crate::artifacts::checkout::WorkingFiles;
use crate::artifacts::checkout::guard::OverwriteGuard;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// File system changes ready to be applied to the working directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    writes: BTreeMap<String, Bytes>,
    deletes: BTreeSet<String>,
}

impl Migration {
    pub fn write(&mut self, name: String, content: Bytes) {
        self.deletes.remove(&name);
        self.writes.insert(name, content);
    }

    pub fn delete(&mut self, name: String) {
        self.writes.remove(&name);
        self.deletes.insert(name);
    }

    pub fn writes(&self) -> impl Iterator<Item = (&String, &Bytes)> {
        self.writes.iter()
    }

    pub fn deletes(&self) -> impl Iterator<Item = &String> {
        self.deletes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.deletes.is_empty()
    }
}

/// Blob-level plan of a checkout or reset, validated against the working directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutPlan {
    writes: BTreeMap<String, ObjectId>,
    deletes: BTreeSet<String>,
}

impl CheckoutPlan {
    pub fn between(
        current: &Snapshot,
        target: &Snapshot,
        working: &WorkingFiles,
    ) -> Result<Self, RepositoryError> {
        let mut guard = OverwriteGuard::new(working);
        let mut plan = CheckoutPlan::default();

        for (name, target_oid) in target.iter() {
            guard.check(name, &[Some(target_oid), current.get(name)]);

            if working.get(name) != Some(target_oid) {
                plan.writes.insert(name.clone(), target_oid.clone());
            }
        }
        guard.finish()?;

        plan.deletes = current
            .names()
            .filter(|name| !target.contains(name) && working.contains_key(*name))
            .cloned()
            .collect();

        tracing::debug!(
            writes = plan.writes.len(),
            deletes = plan.deletes.len(),
            "planned checkout"
        );

        Ok(plan)
    }

    pub fn writes(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.writes.iter()
    }

    pub fn deletes(&self) -> impl Iterator<Item = &String> {
        self.deletes.iter()
    }

    /// Resolve the planned blobs into file contents
    pub fn into_migration<F>(self, load_blob: F) -> anyhow::Result<Migration>
    where
        F: Fn(&ObjectId) -> anyhow::Result<Bytes>,
    {
        let mut migration = Migration::default();

        for (name, oid) in self.writes {
            migration.write(name, load_blob(&oid)?);
        }
        for name in self.deletes {
            migration.delete(name);
        }

        Ok(migration)
    }
}
