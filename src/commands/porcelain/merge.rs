use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::guard::OverwriteGuard;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::resolution::{FileResolution, MergeResolution};
use crate::artifacts::merge::split_point::{AncestryResolver, MergeBase};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::io::Write;

const ALREADY_UP_TO_DATE: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARDED: &str = "Current branch fast-forwarded.";
const CONFLICT_NOTICE: &str = "Encountered a merge conflict.";

impl Repository {
    pub async fn merge(&mut self, given: &str) -> anyhow::Result<()> {
        let current_branch = self.refs().current_branch()?;
        if current_branch.to_string() == given {
            return Err(RepositoryError::MergeWithSelf.into());
        }

        let (given_branch, given_oid) = self
            .refs()
            .find_branch(given)?
            .ok_or(RepositoryError::NoSuchBranch)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let given_commit = self.database().load_commit(&given_oid)?;

        let merge_base = {
            let database = self.database();
            let resolver = AncestryResolver::new(|oid| database.load_slim_commit(oid));
            resolver.resolve(&head_oid, &given_oid)?
        };

        match merge_base {
            MergeBase::AlreadyUpToDate => {
                writeln!(self.writer(), "{ALREADY_UP_TO_DATE}")?;
            }
            MergeBase::FastForward => {
                self.migrate_working_directory(
                    &mut index,
                    head_commit.snapshot(),
                    given_commit.snapshot(),
                )?;
                self.refs().update_head(&given_oid)?;
                index.write_updates()?;

                tracing::info!(branch = %current_branch, oid = %given_oid, "fast-forwarded");
                writeln!(self.writer(), "{FAST_FORWARDED}")?;
            }
            MergeBase::SplitPoint(split_oid) => {
                tracing::info!(split = %split_oid, "found split point");
                let split_commit = self.database().load_commit(&split_oid)?;

                let has_conflicts = self.merge_diverged(
                    &mut index,
                    (&head_oid, &head_commit),
                    (&given_oid, &given_commit),
                    &split_commit,
                    format!("Merged {given_branch} into {current_branch}."),
                )?;
                index.write_updates()?;

                if has_conflicts {
                    writeln!(self.writer(), "{CONFLICT_NOTICE}")?;
                }
            }
        }

        Ok(())
    }

    /// Three-way merge of two diverged tips; returns whether a conflict was written
    fn merge_diverged(
        &self,
        index: &mut Index,
        (head_oid, head_commit): (&ObjectId, &Commit),
        (given_oid, given_commit): (&ObjectId, &Commit),
        split_commit: &Commit,
        message: String,
    ) -> anyhow::Result<bool> {
        let current = head_commit.snapshot();
        let given = given_commit.snapshot();
        let resolution = MergeResolution::resolve(split_commit.snapshot(), current, given);

        // refuse before anything is written
        let working = self.workspace().working_files()?;
        let mut guard = OverwriteGuard::new(&working);
        for (name, file_resolution) in resolution.changes() {
            let merged = match file_resolution {
                FileResolution::TakeGiven(oid) => Some(oid),
                _ => None,
            };
            guard.check(name, &[current.get(name), merged]);
        }
        guard.finish()?;

        if resolution.is_empty() {
            return Err(RepositoryError::EmptyStagingArea.into());
        }

        let mut migration = Migration::default();
        for (name, file_resolution) in resolution.changes() {
            match file_resolution {
                FileResolution::KeepCurrent => {}
                FileResolution::TakeGiven(oid) => {
                    let content = self.database().load_blob(oid)?.into_content();
                    migration.write(name.clone(), content.clone());
                    index.add(name.clone(), content);
                }
                FileResolution::Remove => {
                    migration.delete(name.clone());
                    index.mark_removal(name.clone());
                }
                FileResolution::Conflict { current, given } => {
                    let current = self.load_optional_content(current.as_ref())?;
                    let given = self.load_optional_content(given.as_ref())?;
                    let content = conflict_content(current.as_deref(), given.as_deref());
                    migration.write(name.clone(), content.clone());
                    index.add(name.clone(), content);
                }
            }
        }
        self.workspace().apply_migration(&migration)?;

        let merge_oid =
            self.write_commit(index, vec![head_oid.clone(), given_oid.clone()], message)?;
        tracing::info!(oid = %merge_oid, conflicts = resolution.conflicts().count(), "merged");

        Ok(resolution.has_conflicts())
    }

    fn load_optional_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Option<Bytes>> {
        match oid {
            Some(oid) => Ok(Some(self.database().load_blob(oid)?.into_content())),
            None => Ok(None),
        }
    }
}
