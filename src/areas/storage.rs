//! Storage backends
//!
//! Every area of the repository reads and writes through [`Storage`] using paths
//! relative to the working directory root. [`DiskStorage`] is the real file
//! system; [`MemoryStorage`] keeps everything in a map so engine tests need no
//! temp directories.

use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use file_guard::{FileGuard, Lock};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Guard for the repository-wide advisory lock; released on drop
pub enum StorageLock {
    Disk(#[allow(dead_code)] FileGuard<Box<File>>),
    Memory,
}

impl std::fmt::Debug for StorageLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageLock::Disk(_) => write!(f, "StorageLock::Disk"),
            StorageLock::Memory => write!(f, "StorageLock::Memory"),
        }
    }
}

pub trait Storage: std::fmt::Debug + Send + Sync {
    fn read(&self, path: &Path) -> anyhow::Result<Bytes>;

    /// Replace the content of `path`, creating missing parent directories
    fn write(&self, path: &Path, content: &[u8]) -> anyhow::Result<()>;

    fn remove(&self, path: &Path) -> anyhow::Result<()>;

    fn create_dir(&self, path: &Path) -> anyhow::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Names of the direct children of a directory, sorted; empty if it does not exist
    fn list_dir(&self, path: &Path) -> anyhow::Result<Vec<String>>;

    /// Hold `path` exclusively until the returned guard is dropped
    fn lock(&self, path: &Path) -> anyhow::Result<StorageLock>;
}

#[derive(Debug)]
pub struct DiskStorage {
    root: Box<Path>,
}

impl DiskStorage {
    pub fn new(root: Box<Path>) -> Self {
        DiskStorage { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn generate_temp_name() -> String {
        format!("tmp-{}", rand::random::<u32>())
    }
}

impl Storage for DiskStorage {
    fn read(&self, path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.root.join(path);
        let content = std::fs::read(&full_path)
            .with_context(|| format!("Unable to read file {}", full_path.display()))?;

        Ok(content.into())
    }

    fn write(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let full_path = self.root.join(path);
        let parent = full_path
            .parent()
            .with_context(|| format!("Invalid file path {}", full_path.display()))?;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Unable to create directory {}", parent.display()))?;

        // write next to the target, then rename over it so readers never see a torn file
        let temp_path = parent.join(Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open file {}", temp_path.display()))?;
        file.write_all(content)
            .with_context(|| format!("Unable to write file {}", temp_path.display()))?;

        std::fs::rename(&temp_path, &full_path)
            .with_context(|| format!("Unable to rename file to {}", full_path.display()))?;

        Ok(())
    }

    fn remove(&self, path: &Path) -> anyhow::Result<()> {
        let full_path = self.root.join(path);
        std::fs::remove_file(&full_path)
            .with_context(|| format!("Unable to remove file {}", full_path.display()))
    }

    fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        let full_path = self.root.join(path);
        std::fs::create_dir_all(&full_path)
            .with_context(|| format!("Unable to create directory {}", full_path.display()))
    }

    fn exists(&self, path: &Path) -> bool {
        self.root.join(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.root.join(path).is_dir()
    }

    fn list_dir(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let full_path = self.root.join(path);
        if !full_path.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = std::fs::read_dir(&full_path)
            .with_context(|| format!("Unable to list directory {}", full_path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        names.sort();

        Ok(names)
    }

    fn lock(&self, path: &Path) -> anyhow::Result<StorageLock> {
        let full_path = self.root.join(path);
        let lock_file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&full_path)
            .with_context(|| format!("Unable to open lock file {}", full_path.display()))?;
        let guard = file_guard::lock(Box::new(lock_file), Lock::Exclusive, 0, 1)
            .with_context(|| format!("Unable to lock {}", full_path.display()))?;

        Ok(StorageLock::Disk(guard))
    }
}

/// File tree kept in memory; directories exist implicitly or through `create_dir`
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RwLock<BTreeMap<PathBuf, Bytes>>,
    dirs: RwLock<BTreeSet<PathBuf>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(path: &Path) -> PathBuf {
        path.components()
            .filter(|component| !matches!(component, Component::CurDir))
            .collect()
    }

    fn poisoned<T>(_: T) -> anyhow::Error {
        anyhow::anyhow!("In-memory storage lock poisoned")
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &Path) -> anyhow::Result<Bytes> {
        let path = Self::normalize(path);
        self.files
            .read()
            .map_err(Self::poisoned)?
            .get(&path)
            .cloned()
            .with_context(|| format!("Unable to read file {}", path.display()))
    }

    fn write(&self, path: &Path, content: &[u8]) -> anyhow::Result<()> {
        let path = Self::normalize(path);
        if self.is_dir(&path) {
            anyhow::bail!("Unable to write file {}: is a directory", path.display());
        }

        self.files
            .write()
            .map_err(Self::poisoned)?
            .insert(path, Bytes::copy_from_slice(content));

        Ok(())
    }

    fn remove(&self, path: &Path) -> anyhow::Result<()> {
        let path = Self::normalize(path);
        self.files
            .write()
            .map_err(Self::poisoned)?
            .remove(&path)
            .map(|_| ())
            .with_context(|| format!("Unable to remove file {}", path.display()))
    }

    fn create_dir(&self, path: &Path) -> anyhow::Result<()> {
        self.dirs
            .write()
            .map_err(Self::poisoned)?
            .insert(Self::normalize(path));

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let path = Self::normalize(path);
        self.files
            .read()
            .map(|files| files.contains_key(&path))
            .unwrap_or(false)
            || self.is_dir(&path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let path = Self::normalize(path);
        if path.as_os_str().is_empty() {
            return true;
        }

        let explicit = self
            .dirs
            .read()
            .map(|dirs| dirs.iter().any(|dir| dir.starts_with(&path)))
            .unwrap_or(false);
        let implicit = self
            .files
            .read()
            .map(|files| {
                files
                    .keys()
                    .any(|file| file != &path && file.starts_with(&path))
            })
            .unwrap_or(false);

        explicit || implicit
    }

    fn list_dir(&self, path: &Path) -> anyhow::Result<Vec<String>> {
        let path = Self::normalize(path);
        let files = self.files.read().map_err(Self::poisoned)?;
        let dirs = self.dirs.read().map_err(Self::poisoned)?;

        let names = files
            .keys()
            .chain(dirs.iter())
            .filter_map(|entry| entry.strip_prefix(&path).ok())
            .filter_map(|relative| relative.components().next())
            .map(|component| component.as_os_str().to_string_lossy().into_owned())
            .collect::<BTreeSet<_>>();

        Ok(names.into_iter().collect())
    }

    fn lock(&self, _path: &Path) -> anyhow::Result<StorageLock> {
        Ok(StorageLock::Memory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn exercise(storage: &dyn Storage) {
        storage
            .write(Path::new(".sprig/blobs/ab/cdef"), b"payload")
            .unwrap();
        storage.write(Path::new("notes.txt"), b"one").unwrap();
        storage.write(Path::new("notes.txt"), b"two").unwrap();
        storage.create_dir(Path::new(".sprig/staging/add")).unwrap();

        assert_eq!(
            storage.read(Path::new("notes.txt")).unwrap(),
            Bytes::from_static(b"two")
        );
        assert!(storage.is_dir(Path::new(".sprig/blobs")));
        assert!(storage.is_dir(Path::new(".sprig/staging/add")));
        assert!(!storage.is_dir(Path::new("notes.txt")));
        assert!(storage.exists(Path::new(".sprig/blobs/ab/cdef")));
        assert_eq!(
            storage.list_dir(Path::new("")).unwrap(),
            vec![".sprig".to_string(), "notes.txt".to_string()]
        );
        assert_eq!(
            storage.list_dir(Path::new(".sprig")).unwrap(),
            vec!["blobs".to_string(), "staging".to_string()]
        );
        assert!(storage.list_dir(Path::new("missing")).unwrap().is_empty());

        storage.remove(Path::new("notes.txt")).unwrap();
        assert!(!storage.exists(Path::new("notes.txt")));
        assert!(storage.remove(Path::new("notes.txt")).is_err());
        assert!(storage.read(Path::new("notes.txt")).is_err());
    }

    #[rstest]
    fn test_memory_storage_behaves_like_a_file_tree() {
        exercise(&MemoryStorage::new());
    }

    #[rstest]
    fn test_disk_storage_behaves_like_a_file_tree() {
        let dir = TempDir::new().unwrap();
        let storage = DiskStorage::new(dir.path().to_path_buf().into_boxed_path());

        exercise(&storage);
        // no temp files survive an atomic write
        assert_eq!(
            storage.list_dir(Path::new(".sprig/blobs/ab")).unwrap(),
            vec!["cdef".to_string()]
        );
    }

    #[test]
    fn test_disk_lock_creates_lock_file() {
        let dir = TempDir::new().unwrap();
        let storage = DiskStorage::new(dir.path().to_path_buf().into_boxed_path());
        storage.create_dir(Path::new(".sprig")).unwrap();

        let guard = storage.lock(Path::new(".sprig/lock")).unwrap();

        assert!(matches!(guard, StorageLock::Disk(_)));
        assert!(storage.exists(Path::new(".sprig/lock")));
    }
}
