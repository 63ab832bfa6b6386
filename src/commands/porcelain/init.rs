use crate::areas::repository::Repository;
use crate::artifacts::branch::DEFAULT_BRANCH;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use std::fs;
use std::io::Write;

impl Repository {
    pub fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            anyhow::bail!(RepositoryError::AlreadyInitialized);
        }

        for object_type in [ObjectType::Blob, ObjectType::Commit] {
            fs::create_dir_all(
                self.database()
                    .objects_path()
                    .join(object_type.namespace()),
            )
            .context("Failed to create .twig/objects directory")?;
        }

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        fs::create_dir_all(self.staging().path())
            .context("Failed to create .twig/staging directory")?;

        let root = Commit::root();
        self.database().store_commit(&root)?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs()
            .create_branch(&default_branch, root.oid())
            .context("Failed to create the default branch")?;
        self.refs()
            .set_head(&default_branch)
            .context("Failed to create initial HEAD reference")?;

        tracing::info!(path = %self.path().display(), "initialized repository");
        writeln!(
            self.writer(),
            "Initialized empty Twig repository in {}",
            self.repository_path().display()
        )?;

        Ok(())
    }
}
