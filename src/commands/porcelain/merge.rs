use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::merge::merge_plan::{FileResolution, MergePlan};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;

impl Repository {
    pub fn merge(&self, target: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        if !self.staging().is_empty() {
            anyhow::bail!(RepositoryError::UncommittedChanges);
        }
        let current_branch = self.refs().current_branch()?;
        if current_branch.as_ref() == target {
            anyhow::bail!(RepositoryError::MergeWithItself);
        }
        let Some(target_branch) = self.refs().find_branch(target)? else {
            anyhow::bail!(RepositoryError::BranchDoesNotExist);
        };

        let head_oid = self.refs().current_commit()?;
        let merge_oid = self
            .refs()
            .read_branch(&target_branch)?
            .ok_or(RepositoryError::BranchDoesNotExist)?;
        let base_oid = self.commit_graph().split_point(&head_oid, &merge_oid)?;

        if base_oid == merge_oid {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(());
        }

        let merge_commit = self.database().load_commit(&merge_oid)?;

        if base_oid == head_oid {
            self.materialize(&merge_commit)?;
            self.refs().update_branch(&current_branch, &merge_oid)?;
            tracing::info!(branch = %current_branch, oid = %merge_oid, "fast-forwarded");

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(());
        }

        let head_commit = self.database().load_commit(&head_oid)?;
        let base_commit = self.database().load_commit(&base_oid)?;

        let conflicted = self.apply_merge(&base_commit, &head_commit, &merge_commit)?;
        self.write_merge_commit(&current_branch, &target_branch, merge_oid)?;

        if conflicted {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(())
    }

    /// Bring the merge result into the working tree and the staging index,
    /// returning whether any path ended up in conflict
    fn apply_merge(&self, base: &Commit, head: &Commit, merge: &Commit) -> anyhow::Result<bool> {
        let plan = MergePlan::new(
            base.snapshot(),
            head.snapshot(),
            merge.snapshot(),
            |oid| Ok(self.database().load_blob(oid)?.into_content()),
        )?;

        let mut migration = Migration::new(self, head.snapshot());
        for (path, _, resolution) in plan.resolutions() {
            match resolution.oid() {
                Some(oid) => migration.write(path, oid.clone()),
                None => migration.delete(path),
            }
        }
        // an untracked file in the way aborts before anything is stored or written
        migration.check_for_conflicts()?;

        for (_, _, resolution) in plan.resolutions() {
            if let FileResolution::WriteConflict { blob, .. } = resolution {
                self.database().store_blob(blob)?;
            }
        }
        self.workspace().apply_migration(&migration)?;

        let mut staging = self.staging_mut();
        for (path, _, resolution) in plan.resolutions() {
            let tracked = head.snapshot().get(path);
            match resolution.oid() {
                Some(oid) => staging.stage_addition(path, oid.clone(), tracked),
                None => {
                    staging.stage_removal(path, tracked)?;
                }
            }
        }
        staging.write_updates()?;

        Ok(plan.is_conflicted())
    }

    fn write_merge_commit(
        &self,
        current_branch: &BranchName,
        target_branch: &BranchName,
        merge_oid: ObjectId,
    ) -> anyhow::Result<()> {
        let message = format!("Merged {} into {}.", target_branch, current_branch);

        let mut commit = self.create_commit(message)?;
        commit.record_merge_parent(merge_oid);
        self.database().rewrite_commit(&commit)?;
        tracing::info!(oid = %commit.oid(), merge_parent = ?commit.merge_parent(), "recorded merge");

        Ok(())
    }
}
