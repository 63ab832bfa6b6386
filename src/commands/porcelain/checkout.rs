use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::graph::revision::Revision;
use crate::artifacts::objects::commit::Commit;

impl Repository {
    /// Switch the working tree to the tip of another branch and make it the
    /// current one
    pub fn checkout_branch(&self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let Some(target_branch) = self.refs().find_branch(target)? else {
            anyhow::bail!(RepositoryError::NoSuchBranch);
        };
        if self.refs().is_current_branch(&target_branch)? {
            anyhow::bail!(RepositoryError::CheckoutCurrentBranch);
        }

        let target_oid = self
            .refs()
            .read_branch(&target_branch)?
            .ok_or(RepositoryError::NoSuchBranch)?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.materialize(&target_commit)?;
        self.refs().set_head(&target_branch)?;
        tracing::info!(branch = %target_branch, oid = %target_oid, "switched branch");

        Ok(())
    }

    /// Restore a single working file from a commit (HEAD when `revision` is
    /// `None`) without touching the staging index or HEAD
    pub fn checkout_file(&self, revision: Option<&str>, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = self.workspace().relative_path(path)?;

        let revision = revision.map(Revision::parse).unwrap_or(Revision::Head);
        let commit_oid = revision.resolve(self)?;
        let commit = self.database().load_commit(&commit_oid)?;

        let Some(blob_oid) = commit.snapshot().get(&path) else {
            anyhow::bail!(RepositoryError::FileNotInCommit);
        };
        let blob = self.database().load_blob(blob_oid)?;

        // a directory at the path is replaced as a whole
        let head = self.head_commit()?;
        if self.workspace().is_directory(&path)
            && self
                .workspace()
                .list_files(Some(&path))?
                .iter()
                .any(|file| !head.snapshot().contains(file))
        {
            anyhow::bail!(RepositoryError::UntrackedFileInTheWay);
        }

        self.workspace().write_file(&path, blob.content())?;
        tracing::debug!(path = %path.display(), oid = %commit_oid, "restored file");

        Ok(())
    }

    /// Check out an arbitrary commit and move the current branch to it
    pub fn reset(&self, revision: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let target_oid = Revision::parse(revision).resolve(self)?;
        let target_commit = self.database().load_commit(&target_oid)?;

        self.materialize(&target_commit)?;

        let branch = self.refs().current_branch()?;
        self.refs().update_branch(&branch, &target_oid)?;
        tracing::info!(branch = %branch, oid = %target_oid, "reset branch");

        Ok(())
    }

    /// Replace the files tracked by the current commit with those of `target`
    /// and empty the staging index
    ///
    /// Nothing is touched if an untracked file is in the way.
    pub(crate) fn materialize(&self, target: &Commit) -> anyhow::Result<()> {
        let current = self.head_commit()?;

        Migration::between(self, current.snapshot(), target.snapshot()).apply_changes()?;

        let mut staging = self.staging_mut();
        staging.clear();
        staging.write_updates()
    }
}
