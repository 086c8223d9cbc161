use crate::areas::index::Index;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::WorkingFiles;
use crate::artifacts::core::paint;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use colored::Color;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

// Terminology:
// - tracked: present in the current branch tip
// - unstaged change: a tracked or staged file whose working copy differs from
//   what the next commit would record
// - untracked: a working file neither staged for addition nor tracked (or
//   tracked but staged for removal)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    branches: Vec<BranchName>,
    current_branch: BranchName,
    staged: BTreeSet<String>,
    removed: BTreeSet<String>,
    unstaged: BTreeMap<String, WorkspaceChangeType>,
    untracked: BTreeSet<String>,
}

impl StatusInfo {
    pub fn collect(
        branches: Vec<BranchName>,
        current_branch: BranchName,
        head: &Snapshot,
        index: &Index,
        working: &WorkingFiles,
    ) -> anyhow::Result<Self> {
        let staged = index
            .additions()
            .map(|(name, _)| name.clone())
            .collect::<BTreeSet<_>>();
        let removed = index.removals().cloned().collect::<BTreeSet<_>>();

        let mut unstaged = BTreeMap::new();
        for (name, content) in index.additions() {
            let staged_oid = Blob::new(name.clone(), content.clone()).object_id()?;
            match working.get(name) {
                None => {
                    unstaged.insert(name.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != &staged_oid => {
                    unstaged.insert(name.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }
        for (name, head_oid) in head.iter() {
            if staged.contains(name) || removed.contains(name) {
                continue;
            }
            match working.get(name) {
                None => {
                    unstaged.insert(name.clone(), WorkspaceChangeType::Deleted);
                }
                Some(working_oid) if working_oid != head_oid => {
                    unstaged.insert(name.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
            }
        }

        let untracked = working
            .keys()
            .filter(|name| {
                !staged.contains(*name) && (!head.contains(name) || removed.contains(*name))
            })
            .cloned()
            .collect();

        Ok(StatusInfo {
            branches,
            current_branch,
            staged,
            removed,
            unstaged,
            untracked,
        })
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.removed.is_empty()
            && self.unstaged.is_empty()
            && self.untracked.is_empty()
    }

    pub fn render(&self, writer: &mut dyn Write, color: bool) -> anyhow::Result<()> {
        let branches = self
            .branches
            .iter()
            .map(|branch| {
                if branch == &self.current_branch {
                    paint(&format!("*{branch}"), Color::Green, color)
                } else {
                    branch.to_string()
                }
            })
            .collect::<Vec<_>>();
        Self::render_section(writer, "Branches", branches)?;

        let staged = self
            .staged
            .iter()
            .map(|name| paint(name, Color::Green, color))
            .collect();
        Self::render_section(writer, "Staged Files", staged)?;

        let removed = self
            .removed
            .iter()
            .map(|name| paint(name, Color::Red, color))
            .collect();
        Self::render_section(writer, "Removed Files", removed)?;

        let unstaged = self
            .unstaged
            .iter()
            .map(|(name, change)| paint(&format!("{name} ({change})"), Color::Red, color))
            .collect();
        Self::render_section(writer, "Modifications Not Staged For Commit", unstaged)?;

        let untracked = self
            .untracked
            .iter()
            .map(|name| paint(name, Color::Red, color))
            .collect();
        Self::render_section(writer, "Untracked Files", untracked)?;

        Ok(())
    }

    fn render_section(
        writer: &mut dyn Write,
        title: &str,
        entries: Vec<String>,
    ) -> anyhow::Result<()> {
        writeln!(writer, "=== {title} ===")?;
        for entry in entries {
            writeln!(writer, "{entry}")?;
        }
        writeln!(writer)?;

        Ok(())
    }
}
