use crate::areas::storage::Storage;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Content-addressed store for blobs and commits
///
/// Objects are immutable once written; storing an object that already exists
/// is a no-op that yields the same id.
#[derive(Debug)]
pub struct Database {
    storage: Arc<dyn Storage>,
    /// Repository directory relative to the storage root (`.sprig`)
    path: Box<Path>,
    /// Commits are immutable, so parsed ones can be kept for the life of the command
    commit_cache: RefCell<HashMap<ObjectId, Commit>>,
}

impl Database {
    pub fn new(storage: Arc<dyn Storage>, path: Box<Path>) -> Self {
        Database {
            storage,
            path,
            commit_cache: RefCell::new(HashMap::new()),
        }
    }

    fn directory(&self, object_type: ObjectType) -> PathBuf {
        self.path.join(object_type.directory())
    }

    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object.object_path()?);

        if !self.storage.exists(&object_path) {
            let object_content = Self::compress(object.serialize()?)?;
            self.storage
                .write(&object_path, &object_content)
                .with_context(|| format!("Unable to store object {object_id}"))?;
            tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");
        }

        Ok(object_id)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let (header, reader) = self.parse_object_as_bytes(ObjectType::Blob, object_id)?;
        Blob::deserialize(&header, reader)
    }

    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        if let Some(commit) = self.commit_cache.borrow().get(object_id) {
            return Ok(commit.clone());
        }

        let (header, reader) = self.parse_object_as_bytes(ObjectType::Commit, object_id)?;
        let commit = Commit::deserialize(&header, reader)
            .with_context(|| format!("Unable to parse commit {object_id}"))?;
        self.commit_cache
            .borrow_mut()
            .insert(object_id.clone(), commit.clone());

        Ok(commit)
    }

    pub fn load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        Ok(self.load_commit(object_id)?.to_slim())
    }

    fn parse_object_as_bytes(
        &self,
        expected_type: ObjectType,
        object_id: &ObjectId,
    ) -> anyhow::Result<(String, impl BufRead)> {
        let object_path = self.directory(expected_type).join(object_id.to_path());
        let object_content = self
            .storage
            .read(&object_path)
            .with_context(|| format!("Unable to read object {object_id}"))?;
        let mut object_reader = Cursor::new(Self::decompress(object_content)?);

        let (object_type, header) = ObjectType::parse_header(&mut object_reader)?;
        if object_type != expected_type {
            anyhow::bail!("Object {object_id} is a {object_type}, expected a {expected_type}");
        }

        Ok((header, object_reader))
    }

    /// Every stored commit id, in id order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        let commits_path = self.directory(ObjectType::Commit);
        let mut commits = Vec::new();

        for dir_name in self.storage.list_dir(&commits_path)? {
            for file_name in self.storage.list_dir(&commits_path.join(&dir_name))? {
                if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                    commits.push(oid);
                }
            }
        }
        commits.sort();

        Ok(commits)
    }

    /// Find all commits whose id starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// searched; shorter prefixes scan every directory.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        if !ObjectId::is_valid_prefix(prefix) {
            return Ok(Vec::new());
        }
        let prefix = prefix.to_ascii_lowercase();
        let commits_path = self.directory(ObjectType::Commit);

        if prefix.len() < 2 {
            return Ok(self
                .list_commits()?
                .into_iter()
                .filter(|oid| oid.starts_with(&prefix))
                .collect());
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let mut matches = self
            .storage
            .list_dir(&commits_path.join(dir_name))?
            .into_iter()
            .filter(|file_name| file_name.starts_with(file_prefix))
            .filter_map(|file_name| ObjectId::try_parse(format!("{dir_name}{file_name}")).ok())
            .collect::<Vec<_>>();
        matches.sort();

        Ok(matches)
    }

    /// Resolve a full or abbreviated commit id to exactly one stored commit
    pub fn resolve_commit(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let mut candidates = self.find_commits_by_prefix(prefix)?;

        match candidates.len() {
            0 => Err(RepositoryError::NoSuchCommit.into()),
            1 => Ok(candidates.remove(0)),
            _ => Err(RepositoryError::AmbiguousReference {
                prefix: prefix.to_string(),
                candidates,
            }
            .into()),
        }
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}
