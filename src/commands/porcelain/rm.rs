use crate::areas::repository::Repository;

impl Repository {
    /// Unstage a file and, if the current commit tracks it, stage its removal
    /// and delete it from the working tree
    pub fn rm(&self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = &self.workspace().relative_path(path)?;

        let head = self.head_commit()?;
        let mut staging = self.staging_mut();
        let removed = staging.stage_removal(path, head.snapshot().get(path))?;
        staging.write_updates()?;

        if removed {
            self.workspace().remove_file(path)?;
        }

        Ok(())
    }
}
