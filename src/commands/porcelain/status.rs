use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::Status;
use std::io::Write;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let status_info = {
            let staging = self.staging();
            Status::new(self).initialize(&staging)?
        };

        write!(self.writer(), "{}", status_info)?;

        Ok(())
    }
}
