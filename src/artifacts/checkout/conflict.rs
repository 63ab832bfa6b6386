use crate::artifacts::core::error::RepositoryError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// An untracked file would be overwritten by a written file
    UntrackedOverwritten,
    /// An untracked file blocks a directory a written file needs, or lives
    /// inside a directory a written file replaces
    StaleDirectory,
}

impl ConflictType {
    pub fn description(&self) -> &'static str {
        match self {
            ConflictType::UntrackedOverwritten => "untracked working tree file would be overwritten",
            ConflictType::StaleDirectory => "untracked working tree file is in the way of a directory",
        }
    }
}

impl From<&ConflictType> for RepositoryError {
    fn from(_: &ConflictType) -> Self {
        RepositoryError::UntrackedFileInTheWay
    }
}
