use crate::areas::repository::Repository;
use crate::artifacts::core::config;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::Commit;

impl Repository {
    pub fn commit(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        if message.is_empty() {
            anyhow::bail!(RepositoryError::EmptyCommitMessage);
        }
        if self.staging().is_empty() {
            anyhow::bail!(RepositoryError::NothingToCommit);
        }

        self.create_commit(message.to_string())?;

        Ok(())
    }

    /// Record the staged snapshot on top of the current commit and advance the
    /// current branch to it
    ///
    /// The commit object is stored before the staging index is cleared, and the
    /// branch only moves once both are persisted.
    pub(crate) fn create_commit(&self, message: String) -> anyhow::Result<Commit> {
        let head = self.head_commit()?;
        let snapshot = self.staging().compose_snapshot(head.snapshot());

        let commit = Commit::new(
            Some(head.oid().clone()),
            None,
            snapshot,
            config::commit_timestamp(),
            message,
        )?;
        self.database().store_commit(&commit)?;

        let mut staging = self.staging_mut();
        staging.clear();
        staging.write_updates()?;
        drop(staging);

        let branch = self.refs().current_branch()?;
        self.refs().update_branch(&branch, commit.oid())?;
        tracing::info!(oid = %commit.oid(), branch = %branch, "created commit");

        Ok(commit)
    }
}
