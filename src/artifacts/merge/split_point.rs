//! Split point resolution for merges
//!
//! Finds where two branches diverged so the merge engine has a three-way base.
//!
//! ## Algorithm Overview
//!
//! 1. A breadth-first walk over *all* parent edges (both parents of merge
//!    commits) maps every ancestor of a commit to its shortest distance in
//!    parent hops. The commit itself is at distance 0.
//! 2. Before any search, two degenerate cases are recognised:
//!    - the given commit is the current commit or one of its ancestors: nothing to merge
//!    - the current commit is an ancestor of the given one: fast-forward
//! 3. Otherwise the split point is the common ancestor closest to the current
//!    commit. Ties go to the one closest to the given commit, then to the one
//!    the walk from the current commit reached first (parent-list order).
//!
//! Hop count stands in for recency, so clock skew between commits never
//! changes the result.
//!
//! ## Debug Logging
//!
//! Build with the `debug_merge` feature to dump both ancestor maps to stderr.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{HashMap, VecDeque};

/// Macro for debug logging that is enabled with the debug_merge feature flag
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "debug_merge")]
        {
            eprintln!($($arg)*);
        }
    };
}

/// Every ancestor of one commit with its shortest distance in parent hops
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    /// Commits in the order the breadth-first walk reached them
    order: Vec<ObjectId>,
    distances: HashMap<ObjectId, usize>,
}

impl Ancestry {
    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.distances.contains_key(oid)
    }

    pub fn distance(&self, oid: &ObjectId) -> Option<usize> {
        self.distances.get(oid).copied()
    }

    /// Ancestors with their distances, nearest first
    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, usize)> {
        self.order
            .iter()
            .map(|oid| (oid, self.distances.get(oid).copied().unwrap_or_default()))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// How the given branch relates to the current one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeBase {
    /// The given commit is already reachable from the current one
    AlreadyUpToDate,
    /// The current commit is an ancestor of the given one
    FastForward,
    /// The branches diverged after this commit
    SplitPoint(ObjectId),
}

/// Resolves merge bases over any commit source
///
/// The loader returns the parents of a commit; it is called at most once per
/// commit and walk.
pub struct AncestryResolver<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> AncestryResolver<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Breadth-first walk from `start` over every parent edge
    pub fn ancestors(&self, start: &ObjectId) -> anyhow::Result<Ancestry> {
        let mut ancestry = Ancestry::default();
        let mut queue = VecDeque::from([(start.clone(), 0usize)]);
        ancestry.distances.insert(start.clone(), 0);
        ancestry.order.push(start.clone());

        while let Some((oid, distance)) = queue.pop_front() {
            let commit = (self.commit_loader)(&oid)?;

            for parent in commit.parents {
                if ancestry.distances.contains_key(&parent) {
                    continue;
                }
                ancestry.distances.insert(parent.clone(), distance + 1);
                ancestry.order.push(parent.clone());
                queue.push_back((parent, distance + 1));
            }
        }

        Ok(ancestry)
    }

    pub fn resolve(&self, current: &ObjectId, given: &ObjectId) -> anyhow::Result<MergeBase> {
        if current == given {
            return Ok(MergeBase::AlreadyUpToDate);
        }

        let current_ancestry = self.ancestors(current)?;
        if current_ancestry.contains(given) {
            tracing::debug!(%current, %given, "given commit is an ancestor of the current one");
            return Ok(MergeBase::AlreadyUpToDate);
        }

        let given_ancestry = self.ancestors(given)?;
        if given_ancestry.contains(current) {
            tracing::debug!(%current, %given, "current commit is an ancestor of the given one");
            return Ok(MergeBase::FastForward);
        }

        debug_log!("Ancestors of current {}:", current);
        for (_oid, _distance) in current_ancestry.iter() {
            debug_log!("  {} at {}", _oid, _distance);
        }
        debug_log!("Ancestors of given {}:", given);
        for (_oid, _distance) in given_ancestry.iter() {
            debug_log!("  {} at {}", _oid, _distance);
        }

        let split_point = current_ancestry
            .iter()
            .filter_map(|(oid, distance)| {
                given_ancestry
                    .distance(oid)
                    .map(|given_distance| (oid, distance, given_distance))
            })
            // min_by_key keeps the first of equal keys, i.e. the earliest in walk order
            .min_by_key(|(_, distance, given_distance)| (*distance, *given_distance))
            .map(|(oid, _, _)| oid.clone())
            .ok_or_else(|| anyhow::anyhow!("commits {current} and {given} share no ancestor"))?;

        tracing::debug!(%current, %given, split_point = %split_point, "found split point");

        Ok(MergeBase::SplitPoint(split_point))
    }
}
