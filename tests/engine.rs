//! The whole engine driven in memory, without the binary or a real directory

use pretty_assertions::assert_eq;
use sprig::areas::repository::Repository;
use sprig::areas::storage::{MemoryStorage, Storage};
use sprig::config::{COMMIT_DATE_ENV, Settings};
use sprig::errors::RepositoryError;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Writer whose bytes stay readable after the repository takes ownership of it
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn take(&self) -> String {
        let mut buffer = self.0.lock().unwrap();
        String::from_utf8(std::mem::take(&mut *buffer)).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn in_memory_repository() -> (Repository, Arc<MemoryStorage>, SharedBuffer) {
    let storage = Arc::new(MemoryStorage::new());
    let output = SharedBuffer::default();
    let settings = Settings::from_lookup(|key| {
        (key == COMMIT_DATE_ENV).then(|| "2023-01-01 12:00:00 +0000".to_string())
    })
    .unwrap();

    let repository = Repository::with_storage(storage.clone(), Box::new(output.clone()), settings);

    (repository, storage, output)
}

fn rejection(error: anyhow::Error) -> RepositoryError {
    error
        .downcast::<RepositoryError>()
        .expect("expected a user-facing error")
}

fn read(storage: &MemoryStorage, name: &str) -> String {
    String::from_utf8(storage.read(Path::new(name)).unwrap().to_vec()).unwrap()
}

async fn stage_and_commit(
    repository: &mut Repository,
    storage: &MemoryStorage,
    name: &str,
    content: &str,
    message: &str,
) {
    storage.write(Path::new(name), content.as_bytes()).unwrap();
    repository.add(name).await.unwrap();
    repository.commit(message).await.unwrap();
}

#[tokio::test]
async fn uninitialized_storage_is_rejected() {
    let (repository, _, _) = in_memory_repository();

    assert!(!repository.is_initialized());
    assert_eq!(
        repository.ensure_initialized(),
        Err(RepositoryError::NotInitialized)
    );
}

#[tokio::test]
async fn init_lays_out_the_repository_silently() {
    let (mut repository, storage, output) = in_memory_repository();

    repository.init().await.unwrap();

    assert!(repository.is_initialized());
    assert_eq!(read(&storage, ".sprig/HEAD").trim(), "master");
    assert!(storage.exists(Path::new(".sprig/branches/master")));
    assert!(storage.is_dir(Path::new(".sprig/staging/add")));
    assert_eq!(output.take(), "");

    assert_eq!(
        rejection(repository.init().await.unwrap_err()),
        RepositoryError::AlreadyInitialized
    );
}

#[tokio::test]
async fn commit_and_log_in_memory() {
    let (mut repository, storage, output) = in_memory_repository();
    repository.init().await.unwrap();

    stage_and_commit(&mut repository, &storage, "notes.txt", "hello", "first").await;
    assert_eq!(
        rejection(repository.commit("second").await.unwrap_err()),
        RepositoryError::EmptyStagingArea
    );

    repository.log().unwrap();
    let log = output.take();
    let head = repository.refs().read_head().unwrap();

    assert!(log.starts_with(&format!(
        "===\ncommit {head}\nDate: Sun Jan 1 04:00:00 2023 -0800\nfirst\n\n===\n"
    )));
    assert!(log.ends_with("initial commit\n\n"));
}

#[tokio::test]
async fn branches_diverge_and_merge_with_a_conflict() {
    let (mut repository, storage, output) = in_memory_repository();
    repository.init().await.unwrap();

    stage_and_commit(&mut repository, &storage, "f", "a", "first").await;
    repository.branch("other").unwrap();
    stage_and_commit(&mut repository, &storage, "f", "b", "b side").await;

    repository.checkout_branch("other").await.unwrap();
    assert_eq!(read(&storage, "f"), "a");
    stage_and_commit(&mut repository, &storage, "f", "c", "second").await;
    stage_and_commit(&mut repository, &storage, "g", "g", "add g").await;

    repository.checkout_branch("master").await.unwrap();
    assert_eq!(read(&storage, "f"), "b");
    assert!(!storage.exists(Path::new("g")));

    repository.merge("other").await.unwrap();

    assert_eq!(output.take(), "Encountered a merge conflict.\n");
    assert_eq!(read(&storage, "f"), "<<<<<<< HEAD\nb=======\nc>>>>>>>\n");
    assert_eq!(read(&storage, "g"), "g");

    let (_, merge_commit) = repository.head_commit().unwrap();
    assert!(merge_commit.is_merge());
    assert_eq!(merge_commit.message(), "Merged other into master.");

    repository.status().await.unwrap();
    assert_eq!(
        output.take(),
        "=== Branches ===\n*master\nother\n\n\
         === Staged Files ===\n\n\
         === Removed Files ===\n\n\
         === Modifications Not Staged For Commit ===\n\n\
         === Untracked Files ===\n\n"
    );
}

#[tokio::test]
async fn reset_accepts_abbreviated_ids_and_reports_ambiguity() {
    let (mut repository, storage, output) = in_memory_repository();
    repository.init().await.unwrap();

    for round in 0..17 {
        stage_and_commit(
            &mut repository,
            &storage,
            "counter.txt",
            &round.to_string(),
            &format!("round {round}"),
        )
        .await;
    }

    repository.find("round 3").unwrap();
    let round_three = output.take().trim().to_string();
    repository.reset(&round_three[..8]).await.unwrap();
    assert_eq!(repository.refs().read_head().unwrap().to_string(), round_three);
    assert_eq!(read(&storage, "counter.txt"), "3");

    // 18 commits over 16 hex digits: some first digit is shared
    let ids = repository
        .database()
        .list_commits()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(ids.len(), 18);
    let shared = ids
        .iter()
        .map(|id| id[..1].to_string())
        .find(|prefix| ids.iter().filter(|id| id.starts_with(prefix.as_str())).count() > 1)
        .unwrap();

    match rejection(repository.reset(&shared).await.unwrap_err()) {
        RepositoryError::AmbiguousReference { prefix, candidates } => {
            assert_eq!(prefix, shared);
            assert!(candidates.len() > 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repository.refs().read_head().unwrap().to_string(), round_three);
}
