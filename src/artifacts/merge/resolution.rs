//! Per-file merge decisions
//!
//! Every name tracked by the split point (S), the current tip (C) or the
//! given tip (G) is classified independently:
//!
//! | condition        | outcome                                  |
//! |------------------|------------------------------------------|
//! | C == G           | keep the current version (also both removed) |
//! | S == C           | take G, or remove the file if G dropped it |
//! | S == G           | keep the current version                 |
//! | otherwise        | conflict                                 |
//!
//! "Absent" is a version like any other, so files added on one side only fall
//! out of the same rules.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResolution {
    KeepCurrent,
    TakeGiven(ObjectId),
    Remove,
    Conflict {
        current: Option<ObjectId>,
        given: Option<ObjectId>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeResolution {
    files: BTreeMap<String, FileResolution>,
}

impl MergeResolution {
    pub fn resolve(split: &Snapshot, current: &Snapshot, given: &Snapshot) -> Self {
        let files = Snapshot::union_of_names(&[split, current, given])
            .into_iter()
            .map(|name| {
                let resolution =
                    Self::resolve_file(split.get(name), current.get(name), given.get(name));
                (name.clone(), resolution)
            })
            .collect::<BTreeMap<_, _>>();

        let resolution = MergeResolution { files };
        tracing::debug!(
            changes = resolution.changes().count(),
            conflicts = resolution.conflicts().count(),
            "classified merge"
        );

        resolution
    }

    fn resolve_file(
        split: Option<&ObjectId>,
        current: Option<&ObjectId>,
        given: Option<&ObjectId>,
    ) -> FileResolution {
        if current == given || split == given {
            FileResolution::KeepCurrent
        } else if split == current {
            match given {
                Some(given) => FileResolution::TakeGiven(given.clone()),
                None => FileResolution::Remove,
            }
        } else {
            FileResolution::Conflict {
                current: current.cloned(),
                given: given.cloned(),
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&FileResolution> {
        self.files.get(name)
    }

    /// Every file whose working copy or staging state the merge changes
    pub fn changes(&self) -> impl Iterator<Item = (&String, &FileResolution)> {
        self.files
            .iter()
            .filter(|(_, resolution)| **resolution != FileResolution::KeepCurrent)
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &String> {
        self.files
            .iter()
            .filter(|(_, resolution)| matches!(resolution, FileResolution::Conflict { .. }))
            .map(|(name, _)| name)
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.changes().next().is_none()
    }
}
