use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::storage::{DiskStorage, Storage, StorageLock};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::config::Settings;
use crate::errors::RepositoryError;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Name of the repository directory inside the working directory
pub const REPOSITORY_DIR: &str = ".sprig";

const STAGING_DIR: &str = "staging";
const LOCK_FILE: &str = "lock";

/// Explicit handle on one repository
///
/// Every area shares the same [`Storage`], so the whole repository can live on
/// disk or in memory.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    settings: Settings,
    storage: Arc<dyn Storage>,
    index: Arc<Mutex<Index>>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(
        path: &str,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> anyhow::Result<Self> {
        let path = Path::new(path).canonicalize()?;
        let storage = Arc::new(DiskStorage::new(path.clone().into_boxed_path()));

        Ok(Self::assemble(
            path.into_boxed_path(),
            storage,
            writer,
            settings,
        ))
    }

    /// A repository over an arbitrary storage backend, rooted at its top level
    pub fn with_storage(
        storage: Arc<dyn Storage>,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> Self {
        Self::assemble(PathBuf::new().into_boxed_path(), storage, writer, settings)
    }

    fn assemble(
        path: Box<Path>,
        storage: Arc<dyn Storage>,
        writer: Box<dyn std::io::Write>,
        settings: Settings,
    ) -> Self {
        let repository_path = PathBuf::from(REPOSITORY_DIR);

        let index = Index::new(
            storage.clone(),
            repository_path.join(STAGING_DIR).into_boxed_path(),
        );
        let database = Database::new(storage.clone(), repository_path.clone().into_boxed_path());
        let workspace = Workspace::new(storage.clone(), REPOSITORY_DIR.to_string());
        let refs = Refs::new(storage.clone(), repository_path.into_boxed_path());

        Repository {
            path,
            writer: RefCell::new(writer),
            settings,
            storage,
            index: Arc::new(Mutex::new(index)),
            database,
            workspace,
            refs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn index(&self) -> Arc<Mutex<Index>> {
        self.index.clone()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.storage.is_dir(Path::new(REPOSITORY_DIR))
    }

    pub fn ensure_initialized(&self) -> Result<(), RepositoryError> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::NotInitialized)
        }
    }

    /// Hold the repository-wide lock until the guard is dropped
    pub fn lock(&self) -> anyhow::Result<StorageLock> {
        self.storage
            .lock(&Path::new(REPOSITORY_DIR).join(LOCK_FILE))
    }

    /// Id and content of the current branch tip
    pub fn head_commit(&self) -> anyhow::Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head()?;
        let commit = self.database.load_commit(&head_oid)?;

        Ok((head_oid, commit))
    }
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("path", &self.path)
            .field("storage", &self.storage)
            .finish()
    }
}
