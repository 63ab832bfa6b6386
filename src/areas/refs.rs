//! Branch references and HEAD
//!
//! Branches are text files under `refs/heads/` holding a 40-character commit
//! ID. `HEAD` is always symbolic (`ref: refs/heads/<name>`) and names the
//! active branch; there is no detached state.

use crate::artifacts::branch::HEAD_REF_NAME;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.twig`)
    path: Box<Path>,
}

impl Refs {
    /// The branch HEAD points at
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content.trim())
            .with_context(|| format!("HEAD is not a symbolic reference: {}", content.trim()))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Commit the current branch points at
    pub fn current_commit(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;

        self.read_branch(&branch_name)?
            .with_context(|| format!("current branch {} has no commit", branch_name))
    }

    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(
            &self.head_path(),
            format!("ref: {}", branch_name.as_ref_path()),
        )?;
        tracing::debug!(branch = %branch_name, "moved HEAD");

        Ok(())
    }

    /// Look up a branch by a user-supplied name
    ///
    /// Names that are not valid branch names cannot exist, so they resolve to
    /// `None` like any other missing branch.
    pub fn find_branch(&self, name: &str) -> anyhow::Result<Option<BranchName>> {
        let Ok(branch_name) = BranchName::try_parse(name.to_string()) else {
            return Ok(None);
        };

        Ok(self.branch_exists(&branch_name).then_some(branch_name))
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn create_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        // check whether another branch with the same name already exists
        if self.branch_exists(branch_name) {
            anyhow::bail!(RepositoryError::BranchAlreadyExists);
        }
        // `a` and `a/b` cannot both be ref files
        if let Some(existing) = self.clashing_branch(branch_name)? {
            anyhow::bail!(RepositoryError::BranchNameClash {
                name: branch_name.to_string(),
                existing: existing.to_string(),
            });
        }

        self.update_branch(branch_name, oid)
    }

    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(branch_name), oid.to_string())?;
        tracing::debug!(branch = %branch_name, %oid, "updated branch");

        Ok(())
    }

    /// Delete the branch pointer, leaving its commits untouched
    pub fn delete_branch(&self, branch_name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(branch_name);

        let Some(oid) = self.read_branch(branch_name)? else {
            anyhow::bail!(RepositoryError::BranchDoesNotExist);
        };

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;
        tracing::debug!(branch = %branch_name, "deleted branch");

        Ok(oid)
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn clashing_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<BranchName>> {
        let name = Path::new(branch_name.as_ref());

        Ok(self.list_branches()?.into_iter().find(|existing| {
            let existing_path = Path::new(existing.as_ref());
            existing_path.starts_with(name) || name.starts_with(existing_path)
        }))
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        // create all the parent directories if they don't exist
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        std::fs::write(path, raw_ref)
            .with_context(|| format!("failed to write ref file at {:?}", path))
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, branch_name: &BranchName) -> Box<Path> {
        self.path.join(branch_name.as_ref_path()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
