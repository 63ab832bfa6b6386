use crate::areas::repository::Repository;

impl Repository {
    /// Stage the current content of a working file
    pub fn add(&self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = &self.workspace().relative_path(path)?;

        let blob = self.workspace().parse_blob(path)?;
        let blob_id = self.database().store_blob(&blob)?;

        let head = self.head_commit()?;
        let mut staging = self.staging_mut();
        staging.stage_addition(path, blob_id, head.snapshot().get(path));
        staging.write_updates()?;

        Ok(())
    }
}
