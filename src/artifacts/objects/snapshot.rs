use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::collections::BTreeSet;

/// Mapping from tracked file name to the id of its blob
///
/// Ordered by name so that serialization, and therefore commit ids, are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, ObjectId>,
}

impl Snapshot {
    pub fn get(&self, name: &str) -> Option<&ObjectId> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn insert(&mut self, name: String, blob_oid: ObjectId) -> Option<ObjectId> {
        self.entries.insert(name, blob_oid)
    }

    pub fn remove(&mut self, name: &str) -> Option<ObjectId> {
        self.entries.remove(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every name tracked by at least one of the given snapshots
    pub fn union_of_names<'s>(snapshots: &[&'s Snapshot]) -> BTreeSet<&'s String> {
        snapshots
            .iter()
            .flat_map(|snapshot| snapshot.names())
            .collect()
    }
}

impl FromIterator<(String, ObjectId)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, ObjectId)>>(iter: T) -> Self {
        Snapshot {
            entries: iter.into_iter().collect(),
        }
    }
}
