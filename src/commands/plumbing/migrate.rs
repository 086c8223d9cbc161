use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::CheckoutPlan;
use crate::artifacts::objects::snapshot::Snapshot;

impl Repository {
    /// Rewrite the working directory from `current` to `target` and clear `index`
    ///
    /// The overwrite guard runs before any file is touched.
    pub(crate) fn migrate_working_directory(
        &self,
        index: &mut Index,
        current: &Snapshot,
        target: &Snapshot,
    ) -> anyhow::Result<()> {
        let working = self.workspace().working_files()?;
        let plan = CheckoutPlan::between(current, target, &working)?;

        let migration =
            plan.into_migration(|oid| Ok(self.database().load_blob(oid)?.into_content()))?;
        self.workspace().apply_migration(&migration)?;
        index.clear();

        Ok(())
    }
}
