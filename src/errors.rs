//! User-facing error taxonomy
//!
//! Internal plumbing propagates `anyhow::Error`. Whenever a command rejects a
//! request it raises one of the [`RepositoryError`] variants below, which `main`
//! recovers with `downcast_ref` to print the message and pick the exit code.
//!
//! Every variant is detected before the command mutates anything, so a reported
//! error always leaves the repository untouched.

use crate::artifacts::objects::object_id::ObjectId;
use thiserror::Error;

/// Exit code for unexpected failures (I/O, corrupt objects, ...)
pub const INTERNAL_EXIT_CODE: u8 = 1;

/// Error families, each mapped to its own exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Wrong argument count or shape
    Usage,
    /// The repository is not in a state that allows the command
    State,
    /// A named branch, commit or file does not exist (or is ambiguous)
    Reference,
    /// The command would discard unsaved work in the working directory
    OverwriteGuard,
}

impl ErrorKind {
    pub fn exit_code(&self) -> u8 {
        match self {
            ErrorKind::Usage => 2,
            ErrorKind::State => 3,
            ErrorKind::Reference => 4,
            ErrorKind::OverwriteGuard => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Incorrect operands.")]
    IncorrectOperands,
    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,
    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,
    #[error("No changes added to the commit.")]
    EmptyStagingArea,
    #[error("Please enter a commit message.")]
    EmptyMessage,
    #[error("No reason to remove the file.")]
    NothingToRemove,
    #[error("You have uncommitted changes.")]
    UncommittedChanges,
    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,
    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrent,
    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch,

    #[error("File does not exist.")]
    NoSuchWorkingFile,
    #[error("A branch with that name already exists.")]
    DuplicateBranch,
    #[error("A branch with that name does not exist.")]
    NoSuchBranch,
    #[error("No such branch exists.")]
    NoSuchCheckoutBranch,
    #[error("No commit with that id exists.")]
    NoSuchCommit,
    #[error("File does not exist in that commit.")]
    FileNotInCommit,
    #[error("Found no commit with that message.")]
    NoCommitWithMessage,
    #[error("Commit id {prefix} is ambiguous.")]
    AmbiguousReference {
        prefix: String,
        candidates: Vec<ObjectId>,
    },

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay { files: Vec<String> },
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::IncorrectOperands | RepositoryError::InvalidBranchName(_) => {
                ErrorKind::Usage
            }
            RepositoryError::NotInitialized
            | RepositoryError::AlreadyInitialized
            | RepositoryError::EmptyStagingArea
            | RepositoryError::EmptyMessage
            | RepositoryError::NothingToRemove
            | RepositoryError::UncommittedChanges
            | RepositoryError::MergeWithSelf
            | RepositoryError::CannotRemoveCurrent
            | RepositoryError::AlreadyOnBranch => ErrorKind::State,
            RepositoryError::NoSuchWorkingFile
            | RepositoryError::DuplicateBranch
            | RepositoryError::NoSuchBranch
            | RepositoryError::NoSuchCheckoutBranch
            | RepositoryError::NoSuchCommit
            | RepositoryError::FileNotInCommit
            | RepositoryError::NoCommitWithMessage
            | RepositoryError::AmbiguousReference { .. } => ErrorKind::Reference,
            RepositoryError::UntrackedFileInTheWay { .. } => ErrorKind::OverwriteGuard,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

/// Exit code for any error coming out of a command
pub fn exit_code_for(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<RepositoryError>()
        .map(RepositoryError::exit_code)
        .unwrap_or(INTERNAL_EXIT_CODE)
}
