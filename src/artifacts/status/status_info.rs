use crate::areas::repository::Repository;
use crate::areas::staging::StagingIndex;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) unstaged_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self, staging: &StagingIndex) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.repository);
        let head = self.repository.head_commit()?;
        let head = head.snapshot();

        let workspace_files = self.repository.workspace().list_files(None)?;

        // every path any of the three areas knows about
        let candidates = workspace_files
            .iter()
            .chain(head.paths())
            .chain(staging.additions().keys())
            .collect::<BTreeSet<_>>();

        let mut unstaged_changeset = ChangeSet::new();
        for path in candidates {
            if let Some(change) = inspector.check_unstaged_change(path, head, staging)? {
                unstaged_changeset.insert(path.clone(), change);
            }
        }

        let untracked_files = workspace_files
            .into_iter()
            .filter(|path| inspector.is_untracked(path, head, staging))
            .collect::<FileSet>();

        Ok(StatusInfo {
            branches: self.repository.refs().list_branches()?,
            current_branch: self.repository.refs().current_branch()?,
            staged_files: staging.additions().keys().cloned().collect(),
            removed_files: staging.removals().keys().cloned().collect(),
            unstaged_changeset,
            untracked_files,
        })
    }
}

impl std::fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Branches ===")?;
        for branch in &self.branches {
            let marker = if branch == &self.current_branch { "*" } else { "" };
            writeln!(f, "{}{}", marker, branch)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Staged Files ===")?;
        for path in &self.staged_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Removed Files ===")?;
        for path in &self.removed_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)?;

        writeln!(f, "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &self.unstaged_changeset {
            writeln!(f, "{} {}", path.display(), change)?;
        }
        writeln!(f)?;

        writeln!(f, "=== Untracked Files ===")?;
        for path in &self.untracked_files {
            writeln!(f, "{}", path.display())?;
        }
        writeln!(f)
    }
}
