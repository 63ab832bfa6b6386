use crate::areas::repository::Repository;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// History of the current branch, following first parents only
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut curr_commit_oid = Some(self.refs().current_commit()?);

        while let Some(commit_oid) = curr_commit_oid {
            let commit = self.database().load_commit(&commit_oid)?;

            self.display_commit(&commit)?;

            curr_commit_oid = commit.parent().cloned();
        }

        Ok(())
    }

    /// Every stored commit, reachable or not, ordered by id
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for oid in self.database().list_commits()? {
            let commit = self.database().load_commit(&oid)?;
            self.display_commit(&commit)?;
        }

        Ok(())
    }

    /// Print the id of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut found = false;
        for oid in self.database().list_commits()? {
            let commit = self.database().load_commit(&oid)?;
            if commit.message() == message {
                writeln!(self.writer(), "{}", oid)?;
                found = true;
            }
        }

        if !found {
            anyhow::bail!(RepositoryError::NoCommitWithMessage);
        }

        Ok(())
    }

    fn display_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        let mut writer = self.writer();

        writeln!(writer, "===")?;
        writeln!(
            writer,
            "{}",
            format!("commit {}", commit.oid()).yellow()
        )?;
        if let (Some(parent), Some(merge_parent)) = (commit.parent(), commit.merge_parent()) {
            writeln!(
                writer,
                "Merge: {} {}",
                parent.to_short_oid(),
                merge_parent.to_short_oid()
            )?;
        }
        writeln!(writer, "Date: {}", commit.timestamp())?;
        writeln!(writer, "{}", commit.message())?;
        writeln!(writer)?;

        Ok(())
    }
}
