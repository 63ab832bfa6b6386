//! Working-tree migration
//!
//! A migration is the list of files to delete and files to write (with the
//! blob each one receives) that turns the working tree into a target state.
//!
//! ## Safety
//!
//! Before anything is touched, every file to write is checked against the
//! snapshot the working tree currently tracks. An untracked file that would be
//! overwritten, or that is in the way of a needed directory, aborts the whole
//! migration with no change made.

use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::ConflictType;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Type of file system action required by a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Delete the working file
    Delete,
    /// Create or overwrite the working file from a blob
    Write,
}

/// Set of planned actions grouped by type
pub type ActionsSet = HashMap<ActionType, BTreeMap<PathBuf, Option<ObjectId>>>;

/// Set of detected conflicts grouped by type
pub type ConflictsSet = HashMap<ConflictType, BTreeSet<PathBuf>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    /// Snapshot of the commit the working tree currently tracks
    tracked: Snapshot,
    actions: ActionsSet,
    conflicts: ConflictsSet,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, tracked: &Snapshot) -> Self {
        let actions = HashMap::from([
            (ActionType::Delete, BTreeMap::new()),
            (ActionType::Write, BTreeMap::new()),
        ]);

        Self {
            repository,
            tracked: tracked.clone(),
            actions,
            conflicts: HashMap::new(),
        }
    }

    /// Plan the full switch from `current` to `target`: delete what only
    /// `current` tracks, write every file of `target`
    pub fn between(repository: &'r Repository, current: &Snapshot, target: &Snapshot) -> Self {
        let mut migration = Self::new(repository, current);

        for path in current.paths().filter(|path| !target.contains(path)) {
            migration.delete(path);
        }
        for (path, oid) in target.iter() {
            migration.write(path, oid.clone());
        }

        migration
    }

    pub fn delete(&mut self, path: &Path) {
        self.actions
            .entry(ActionType::Delete)
            .or_default()
            .insert(path.to_path_buf(), None);
    }

    pub fn write(&mut self, path: &Path, oid: ObjectId) {
        self.actions
            .entry(ActionType::Write)
            .or_default()
            .insert(path.to_path_buf(), Some(oid));
    }

    pub fn actions_of(
        &self,
        action_type: ActionType,
    ) -> impl Iterator<Item = (&PathBuf, &Option<ObjectId>)> {
        self.actions.get(&action_type).into_iter().flatten()
    }

    pub fn conflicts(&self) -> &ConflictsSet {
        &self.conflicts
    }

    /// Check the plan, then apply it to the working tree
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.check_for_conflicts()?;
        self.repository.workspace().apply_migration(self)?;

        tracing::debug!(
            deleted = self.actions_of(ActionType::Delete).count(),
            written = self.actions_of(ActionType::Write).count(),
            "applied migration"
        );

        Ok(())
    }

    /// Fail with [`RepositoryError::UntrackedFileInTheWay`] if any planned
    /// write would clobber an untracked file
    pub fn check_for_conflicts(&mut self) -> anyhow::Result<()> {
        let written = self
            .actions_of(ActionType::Write)
            .map(|(path, _)| path.clone())
            .collect::<Vec<_>>();

        for path in &written {
            self.check_for_conflict(path)?;
        }

        let Some((conflict_type, paths)) = self
            .conflicts
            .iter()
            .find(|(_, paths)| !paths.is_empty())
        else {
            return Ok(());
        };

        for path in paths {
            tracing::warn!(path = %path.display(), "{}", conflict_type.description());
        }
        Err(RepositoryError::from(conflict_type).into())
    }

    fn check_for_conflict(&mut self, path: &Path) -> anyhow::Result<()> {
        let repository = self.repository;
        let workspace = repository.workspace();

        if workspace.file_exists(path) && !self.tracked.contains(path) {
            self.record_conflict(ConflictType::UntrackedOverwritten, path);
        }

        if workspace.is_directory(path) {
            let untracked = workspace
                .list_files(Some(path))?
                .into_iter()
                .any(|file| !self.tracked.contains(&file));
            if untracked {
                self.record_conflict(ConflictType::StaleDirectory, path);
            }
        }

        if let Some(parent) = self.untracked_parent(path) {
            self.record_conflict(ConflictType::StaleDirectory, &parent);
        }

        Ok(())
    }

    fn untracked_parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent()?
            .ancestors()
            .filter(|parent| !parent.as_os_str().is_empty())
            .find(|parent| {
                self.repository.workspace().file_exists(parent) && !self.tracked.contains(parent)
            })
            .map(Path::to_path_buf)
    }

    fn record_conflict(&mut self, conflict_type: ConflictType, path: &Path) {
        self.conflicts
            .entry(conflict_type)
            .or_default()
            .insert(path.to_path_buf());
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let blob = self.repository.database().load_blob(object_id)?;

        Ok(blob.into_content())
    }
}
