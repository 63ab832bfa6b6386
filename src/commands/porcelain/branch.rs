use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;

impl Repository {
    /// Create a branch pointing at the current commit; HEAD does not move
    pub fn branch(&self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let source_oid = self.refs().current_commit()?;

        self.refs().create_branch(&branch_name, &source_oid)?;

        Ok(())
    }

    /// Delete a branch pointer, leaving its commits in place
    pub fn rm_branch(&self, branch_name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let Some(branch_name) = self.refs().find_branch(branch_name)? else {
            anyhow::bail!(RepositoryError::BranchDoesNotExist);
        };
        if self.refs().is_current_branch(&branch_name)? {
            anyhow::bail!(RepositoryError::RemoveCurrentBranch);
        }

        self.refs().delete_branch(&branch_name)?;

        Ok(())
    }
}
