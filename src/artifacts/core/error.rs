//! Domain errors
//!
//! Every user-facing failure of a repository operation is a [`RepositoryError`].
//! Operations return `anyhow::Result` and raise these values with `anyhow::bail!`,
//! so callers can recover the variant with `downcast_ref::<RepositoryError>()`.
//!
//! All precondition and not-found checks run before an operation mutates the
//! object store, the refs, the staging index or the working tree.

use crate::artifacts::objects::object_id::ObjectId;

/// Broad classification of a [`RepositoryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed arguments or an uninitialized repository
    Usage,
    /// Missing blob, commit, branch, file or unresolved abbreviated id
    NotFound,
    /// Operation-specific invariant violation, safe to retry once resolved
    Precondition,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Not in an initialized Twig directory.")]
    NotInitialized,

    #[error("A Twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("File does not exist.")]
    FileNotFound,

    #[error("Path {0:?} is not inside the working tree.")]
    InvalidPath(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit,

    #[error("No commit with that id exists.")]
    CommitNotFound,

    #[error("Commit id prefix {prefix} is ambiguous: {candidates} commits match.")]
    AmbiguousCommitId { prefix: String, candidates: usize },

    #[error("Object {0} does not exist.")]
    ObjectNotFound(ObjectId),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage,

    #[error("No such branch exists.")]
    NoSuchBranch,

    #[error("A branch with that name does not exist.")]
    BranchDoesNotExist,

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists,

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Branch {existing} clashes with the branch name {name}.")]
    BranchNameClash { name: String, existing: String },

    #[error("No need to checkout the current branch.")]
    CheckoutCurrentBranch,

    #[error("Cannot remove the current branch.")]
    RemoveCurrentBranch,

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithItself,

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay,
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::NotInitialized
            | RepositoryError::AlreadyInitialized
            | RepositoryError::IncorrectOperands
            | RepositoryError::InvalidPath(_)
            | RepositoryError::InvalidBranchName(_)
            | RepositoryError::EmptyCommitMessage => ErrorKind::Usage,
            RepositoryError::FileNotFound
            | RepositoryError::FileNotInCommit
            | RepositoryError::CommitNotFound
            | RepositoryError::AmbiguousCommitId { .. }
            | RepositoryError::ObjectNotFound(_)
            | RepositoryError::NoCommitWithMessage
            | RepositoryError::NoSuchBranch
            | RepositoryError::BranchDoesNotExist => ErrorKind::NotFound,
            RepositoryError::BranchAlreadyExists
            | RepositoryError::BranchNameClash { .. }
            | RepositoryError::CheckoutCurrentBranch
            | RepositoryError::RemoveCurrentBranch
            | RepositoryError::NothingToCommit
            | RepositoryError::NothingToRemove
            | RepositoryError::UncommittedChanges
            | RepositoryError::MergeWithItself
            | RepositoryError::UntrackedFileInTheWay => ErrorKind::Precondition,
        }
    }
}
