//! Merge planning
//!
//! A plan resolves every path of the union of the split point, current and
//! given snapshots before the working tree, the object store or the staging
//! index is touched. Conflict contents are computed in memory; the blobs for
//! them are only stored once the plan is known to be applicable.

use crate::artifacts::merge::conflict_marker::conflict_marker;
use crate::artifacts::merge::merge_case::{MergeAction, MergeCase};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// What happens to one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileResolution {
    /// Write an existing blob and stage it
    Write(ObjectId),
    /// Write a freshly built conflict blob and stage it
    WriteConflict { oid: ObjectId, blob: Blob },
    /// Delete the working file and stage the removal
    Remove,
}

impl FileResolution {
    pub fn oid(&self) -> Option<&ObjectId> {
        match self {
            FileResolution::Write(oid) | FileResolution::WriteConflict { oid, .. } => Some(oid),
            FileResolution::Remove => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    resolutions: BTreeMap<PathBuf, (MergeCase, FileResolution)>,
    conflicted: bool,
}

impl MergePlan {
    /// Resolve every path
    ///
    /// `load_blob` reads the content of a blob; it is only called for paths in
    /// conflict.
    pub fn new<BlobLoaderFn>(
        split: &Snapshot,
        current: &Snapshot,
        given: &Snapshot,
        load_blob: BlobLoaderFn,
    ) -> anyhow::Result<Self>
    where
        BlobLoaderFn: Fn(&ObjectId) -> anyhow::Result<Bytes>,
    {
        let paths = split
            .paths()
            .chain(current.paths())
            .chain(given.paths())
            .collect::<BTreeSet<_>>();

        let mut plan = MergePlan::default();
        for path in paths {
            let (split_oid, current_oid, given_oid) =
                (split.get(path), current.get(path), given.get(path));
            let Some(case) = MergeCase::classify(split_oid, current_oid, given_oid) else {
                continue;
            };
            tracing::debug!(path = %path.display(), case = case.number(), "classified merge case");

            let resolution = match (case.action(), given_oid) {
                (MergeAction::Keep, _) => continue,
                (MergeAction::TakeGiven, Some(given_oid)) => FileResolution::Write(given_oid.clone()),
                (MergeAction::TakeGiven, None) => {
                    anyhow::bail!("merge case {} without a given version", case.number())
                }
                (MergeAction::Remove, _) => FileResolution::Remove,
                (MergeAction::Conflict, _) => {
                    let current_content = current_oid.map(&load_blob).transpose()?;
                    let given_content = given_oid.map(&load_blob).transpose()?;
                    let blob = Blob::new(conflict_marker(
                        current_content.as_deref(),
                        given_content.as_deref(),
                    ));

                    plan.conflicted = true;
                    FileResolution::WriteConflict {
                        oid: blob.object_id()?,
                        blob,
                    }
                }
            };

            plan.resolutions.insert(path.clone(), (case, resolution));
        }

        Ok(plan)
    }

    pub fn is_conflicted(&self) -> bool {
        self.conflicted
    }

    /// Every path the merge changes, with its case and resolution
    pub fn resolutions(&self) -> impl Iterator<Item = (&PathBuf, &MergeCase, &FileResolution)> {
        self.resolutions
            .iter()
            .map(|(path, (case, resolution))| (path, case, resolution))
    }
}
