use crate::areas::repository::Repository;
use crate::artifacts::core::paint;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use colored::Color;
use std::io::Write;

impl Repository {
    /// History of the current branch, following first parents back to the root
    pub fn log(&self) -> anyhow::Result<()> {
        let mut curr_commit_oid = Some(self.refs().read_head()?);

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self.database().load_commit(&commit_oid)?;

            self.display_commit(&commit_oid, &commit)?;

            // Move to the first parent for the next iteration
            curr_commit_oid = commit.parent().cloned();
        }

        Ok(())
    }

    pub fn display_commit(&self, oid: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        let color = self.settings().color;

        writeln!(self.writer(), "===")?;
        writeln!(
            self.writer(),
            "{}",
            paint(&format!("commit {oid}"), Color::Yellow, color)
        )?;
        if commit.is_merge() {
            let parents = commit
                .parents()
                .iter()
                .map(ObjectId::to_short_oid)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(self.writer(), "Merge: {parents}")?;
        }
        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
