//! Commit snapshots
//!
//! A snapshot is the full `path -> blob id` mapping recorded by a commit. It is
//! an immutable value: cloning shares the underlying map, and deriving a child
//! snapshot copies the map only when the child actually changes it, so the
//! parent's snapshot is never touched.

use crate::artifacts::objects::object_id::ObjectId;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: Arc<BTreeMap<PathBuf, ObjectId>>,
}

impl Snapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &ObjectId)> {
        self.entries.iter()
    }

    /// Derive a new snapshot from this one
    ///
    /// `upserts` are applied first, then every path in `removals` is dropped.
    pub fn derive<'a>(
        &self,
        upserts: impl IntoIterator<Item = (&'a PathBuf, &'a ObjectId)>,
        removals: impl IntoIterator<Item = &'a PathBuf>,
    ) -> Snapshot {
        let mut upserts = upserts.into_iter().peekable();
        let mut removals = removals.into_iter().peekable();

        let mut child = self.clone();
        if upserts.peek().is_none() && removals.peek().is_none() {
            return child;
        }

        let entries = Arc::make_mut(&mut child.entries);
        for (path, oid) in upserts {
            entries.insert(path.clone(), oid.clone());
        }
        for path in removals {
            entries.remove(path);
        }

        child
    }
}

impl FromIterator<(PathBuf, ObjectId)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (PathBuf, ObjectId)>>(iter: T) -> Self {
        Snapshot {
            entries: Arc::new(iter.into_iter().collect()),
        }
    }
}
