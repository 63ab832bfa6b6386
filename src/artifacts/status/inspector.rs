use crate::areas::repository::Repository;
use crate::areas::staging::StagingIndex;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

/// Compares single paths across the working tree, the staging index and the
/// current commit
#[derive(new)]
pub struct Inspector<'r> {
    repository: &'r Repository,
}

impl<'r> Inspector<'r> {
    /// Digest of the working file, if there is one
    pub fn workspace_oid(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let workspace = self.repository.workspace();
        if !workspace.file_exists(path) {
            return Ok(None);
        }

        Ok(Some(workspace.parse_blob(path)?.object_id()?))
    }

    /// Change of a path the next commit would record, not yet reflected in
    /// the staging index
    pub fn check_unstaged_change(
        &self,
        path: &Path,
        head: &Snapshot,
        staging: &StagingIndex,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        let expected = match staging.additions().get(path) {
            Some(staged) => staged,
            None if staging.is_staged_for_removal(path) => return Ok(None),
            None => match head.get(path) {
                Some(tracked) => tracked,
                None => return Ok(None),
            },
        };

        let change = match self.workspace_oid(path)? {
            None => Some(WorkspaceChangeType::Deleted),
            Some(oid) if &oid != expected => Some(WorkspaceChangeType::Modified),
            Some(_) => None,
        };

        Ok(change)
    }

    /// A working file is untracked when it is not staged for addition and
    /// either unknown to the current commit or staged for removal
    pub fn is_untracked(&self, path: &Path, head: &Snapshot, staging: &StagingIndex) -> bool {
        !staging.is_staged_for_addition(path)
            && (!head.contains(path) || staging.is_staged_for_removal(path))
    }
}
