use crate::areas::storage::Storage;
use crate::artifacts::checkout::WorkingFiles;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use anyhow::Context;
use bytes::Bytes;
use std::path::{Component, Path};
use std::sync::Arc;

/// The flat working directory: plain files at the repository root
///
/// Subdirectories (including the repository directory itself) are not tracked.
#[derive(Debug)]
pub struct Workspace {
    storage: Arc<dyn Storage>,
    /// Name of the repository directory, hidden from listings
    ignored: String,
}

impl Workspace {
    pub fn new(storage: Arc<dyn Storage>, ignored: String) -> Self {
        Workspace { storage, ignored }
    }

    /// Names of all plain files, sorted
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        Ok(self
            .storage
            .list_dir(Path::new(""))?
            .into_iter()
            .filter(|name| name != &self.ignored && !self.storage.is_dir(Path::new(name)))
            .collect())
    }

    /// Whether `name` is a single top-level file name other than the repository directory
    pub fn is_file_name(&self, name: &str) -> bool {
        let mut components = Path::new(name).components();

        matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) && name != self.ignored
    }

    pub fn file_exists(&self, name: &str) -> bool {
        self.is_file_name(name)
            && self.storage.exists(Path::new(name))
            && !self.storage.is_dir(Path::new(name))
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        self.storage
            .read(Path::new(name))
            .with_context(|| format!("Failed to read working file {name}"))
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(name.to_string(), self.read_file(name)?))
    }

    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        self.storage
            .write(Path::new(name), content)
            .with_context(|| format!("Failed to write working file {name}"))
    }

    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        self.storage
            .remove(Path::new(name))
            .with_context(|| format!("Failed to remove working file {name}"))
    }

    /// Every working file with the blob id its current content hashes to
    pub fn working_files(&self) -> anyhow::Result<WorkingFiles> {
        self.list_files()?
            .into_iter()
            .map(|name| {
                let oid = self.parse_blob(&name)?.object_id()?;
                Ok::<_, anyhow::Error>((name, oid))
            })
            .collect()
    }

    // deletions are applied before writes
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for name in migration.deletes() {
            if self.file_exists(name) {
                self.remove_file(name)?;
            }
        }

        for (name, content) in migration.writes() {
            self.write_file(name, content)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::areas::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workspace() -> Workspace {
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        storage.write(Path::new(".sprig/HEAD"), b"master").unwrap();
        storage.write(Path::new("b.txt"), b"b").unwrap();
        storage.write(Path::new("a.txt"), b"a").unwrap();
        storage.write(Path::new("nested/c.txt"), b"c").unwrap();

        Workspace::new(storage, ".sprig".to_string())
    }

    #[rstest]
    fn test_lists_only_top_level_files(workspace: Workspace) {
        assert_eq!(workspace.list_files().unwrap(), vec!["a.txt", "b.txt"]);
        assert!(!workspace.file_exists(".sprig"));
        assert!(!workspace.file_exists("nested"));
    }

    #[rstest]
    #[case("a.txt", true)]
    #[case("with space.txt", true)]
    #[case("nested/c.txt", false)]
    #[case(".sprig/HEAD", false)]
    #[case("./a.txt", false)]
    #[case("../a.txt", false)]
    #[case(".sprig", false)]
    #[case("", false)]
    fn test_only_top_level_names_are_files(
        workspace: Workspace,
        #[case] name: &str,
        #[case] accepted: bool,
    ) {
        assert_eq!(workspace.is_file_name(name), accepted);
        assert_eq!(
            workspace.file_exists(name),
            accepted && name != "with space.txt"
        );
    }

    #[rstest]
    fn test_apply_migration(workspace: Workspace) {
        let mut migration = Migration::default();
        migration.delete("a.txt".to_string());
        migration.write("b.txt".to_string(), Bytes::from_static(b"new b"));
        migration.write("d.txt".to_string(), Bytes::from_static(b"d"));

        workspace.apply_migration(&migration).unwrap();

        assert_eq!(workspace.list_files().unwrap(), vec!["b.txt", "d.txt"]);
        assert_eq!(
            workspace.read_file("b.txt").unwrap(),
            Bytes::from_static(b"new b")
        );
    }

    #[rstest]
    fn test_working_files_hash_name_and_content(workspace: Workspace) {
        let files = workspace.working_files().unwrap();

        assert_eq!(
            files.get("a.txt"),
            Some(
                &Blob::new("a.txt".to_string(), Bytes::from_static(b"a"))
                    .object_id()
                    .unwrap()
            )
        );
        assert_eq!(files.len(), 2);
    }
}
