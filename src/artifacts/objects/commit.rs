//! Commit object
//!
//! Commits are immutable nodes of the history graph. Each one records:
//! - Up to two parent commit IDs (the second only for merge commits)
//! - A formatted timestamp
//! - A message
//! - The full snapshot of tracked files (not a delta)
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! id <commit-sha>
//! parent <parent-sha>
//! merge <second-parent-sha>
//! date <timestamp>
//! file <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! ## Identity
//!
//! The ID is the SHA-1 of the record *without* its `id` line, computed when the
//! commit is built. A merge commit gets its second parent recorded right after
//! creation; the record is stored again but the ID is not recomputed, so the
//! stored `id` line is the only authority for a commit's identity.

use crate::artifacts::core::config::EPOCH_TIMESTAMP;
use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::snapshot::Snapshot;
use anyhow::Context;
use bytes::Bytes;
use std::io::BufRead;
use std::path::PathBuf;

pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Slim representation of a commit
///
/// Contains only what graph traversal needs: the ID and the parent edges in
/// order (first parent, then the merge parent).
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    oid: ObjectId,
    parent: Option<ObjectId>,
    merge_parent: Option<ObjectId>,
    timestamp: String,
    message: String,
    snapshot: Snapshot,
}

impl Commit {
    /// The root commit every repository starts from
    ///
    /// It has no parent and an empty snapshot, so its ID is the digest of its
    /// message followed by its timestamp.
    pub fn root() -> Self {
        let oid = ObjectId::digest(format!("{ROOT_COMMIT_MESSAGE}{EPOCH_TIMESTAMP}").as_bytes());

        Commit {
            oid,
            parent: None,
            merge_parent: None,
            timestamp: EPOCH_TIMESTAMP.to_string(),
            message: ROOT_COMMIT_MESSAGE.to_string(),
            snapshot: Snapshot::empty(),
        }
    }

    pub fn new(
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        snapshot: Snapshot,
        timestamp: String,
        message: String,
    ) -> anyhow::Result<Self> {
        let mut commit = Commit {
            oid: ObjectId::default(),
            parent,
            merge_parent,
            timestamp,
            message,
            snapshot,
        };
        commit.oid = ObjectId::digest(&commit.envelope(commit.body().as_bytes())?);

        Ok(commit)
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn merge_parent(&self) -> Option<&ObjectId> {
        self.merge_parent.as_ref()
    }

    /// Parent edges in traversal order: first parent, then merge parent
    pub fn parents(&self) -> Vec<ObjectId> {
        self.parent
            .iter()
            .chain(self.merge_parent.iter())
            .cloned()
            .collect()
    }

    pub fn is_merge(&self) -> bool {
        self.merge_parent.is_some()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn slim(&self) -> SlimCommit {
        SlimCommit {
            oid: self.oid.clone(),
            parents: self.parents(),
        }
    }

    /// Record the second parent of a freshly created merge commit
    ///
    /// The ID is deliberately left as it was computed at creation.
    pub fn record_merge_parent(&mut self, merge_parent: ObjectId) {
        self.merge_parent = Some(merge_parent);
    }

    fn body(&self) -> String {
        let mut lines = vec![];

        if let Some(parent) = &self.parent {
            lines.push(format!("parent {}", parent));
        }
        if let Some(merge_parent) = &self.merge_parent {
            lines.push(format!("merge {}", merge_parent));
        }
        lines.push(format!("date {}", self.timestamp));
        for (path, oid) in self.snapshot.iter() {
            lines.push(format!("file {} {}", oid, path.display()));
        }
        lines.push(String::new());
        lines.push(self.message.clone());

        lines.join("\n")
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let content = format!("id {}\n{}", self.oid, self.body());
        self.envelope(content.as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (headers, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;
        let mut lines = headers.lines().peekable();

        let oid = lines
            .next()
            .and_then(|line| line.strip_prefix("id "))
            .context("Invalid commit object: missing id line")?;
        let oid = ObjectId::try_parse(oid.to_string())?;

        let parent = match lines.next_if(|line| line.starts_with("parent ")) {
            Some(line) => Some(ObjectId::try_parse(line["parent ".len()..].to_string())?),
            None => None,
        };
        let merge_parent = match lines.next_if(|line| line.starts_with("merge ")) {
            Some(line) => Some(ObjectId::try_parse(line["merge ".len()..].to_string())?),
            None => None,
        };

        let timestamp = lines
            .next()
            .and_then(|line| line.strip_prefix("date "))
            .context("Invalid commit object: missing date line")?
            .to_string();

        let snapshot = lines
            .map(|line| {
                let entry = line
                    .strip_prefix("file ")
                    .context("Invalid commit object: invalid file line")?;
                let (blob_oid, path) = entry
                    .split_once(' ')
                    .context("Invalid commit object: invalid file line")?;

                Ok((PathBuf::from(path), ObjectId::try_parse(blob_oid.to_string())?))
            })
            .collect::<anyhow::Result<Snapshot>>()?;

        Ok(Commit {
            oid,
            parent,
            merge_parent,
            timestamp,
            message: message.to_string(),
            snapshot,
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(self.oid.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    const TIMESTAMP: &str = "Sun Jan 1 12:00:00 2023 +0000";

    #[fixture]
    fn snapshot() -> Snapshot {
        [
            (PathBuf::from("a.txt"), ObjectId::digest(b"a")),
            (PathBuf::from("dir/b.txt"), ObjectId::digest(b"b")),
        ]
        .into_iter()
        .collect()
    }

    fn build(
        parent: Option<ObjectId>,
        merge_parent: Option<ObjectId>,
        snapshot: Snapshot,
        timestamp: &str,
        message: &str,
    ) -> Commit {
        Commit::new(
            parent,
            merge_parent,
            snapshot,
            timestamp.to_string(),
            message.to_string(),
        )
        .unwrap()
    }

    fn reload(commit: &Commit) -> Commit {
        let mut reader = Cursor::new(commit.serialize().unwrap());
        let object_type = ObjectType::parse_object_type(&mut reader).unwrap();
        assert_eq!(object_type, ObjectType::Commit);

        Commit::deserialize(reader).unwrap()
    }

    #[rstest]
    fn equal_tuples_give_equal_ids(snapshot: Snapshot) {
        let parent = Some(Commit::root().oid().clone());

        let first = build(parent.clone(), None, snapshot.clone(), TIMESTAMP, "msg");
        let second = build(parent, None, snapshot, TIMESTAMP, "msg");

        assert_eq!(first.oid(), second.oid());
    }

    #[rstest]
    fn changing_any_field_changes_the_id(snapshot: Snapshot) {
        let root = Commit::root().oid().clone();
        let other = ObjectId::digest(b"other");
        let base = build(Some(root.clone()), None, snapshot.clone(), TIMESTAMP, "msg");

        let variants = [
            build(Some(other.clone()), None, snapshot.clone(), TIMESTAMP, "msg"),
            build(Some(root.clone()), Some(other), snapshot.clone(), TIMESTAMP, "msg"),
            build(Some(root.clone()), None, Snapshot::empty(), TIMESTAMP, "msg"),
            build(
                Some(root.clone()),
                None,
                snapshot.clone(),
                "Mon Jan 2 12:00:00 2023 +0000",
                "msg",
            ),
            build(Some(root), None, snapshot, TIMESTAMP, "other msg"),
        ];

        for variant in variants {
            assert_ne!(variant.oid(), base.oid());
        }
    }

    #[test]
    fn root_commit_id_is_digest_of_message_and_timestamp() {
        let root = Commit::root();

        assert_eq!(
            root.oid(),
            &ObjectId::digest(b"initial commitWed Dec 31 16:00:00 1969 -0800")
        );
        assert!(root.parent().is_none());
        assert!(root.snapshot().is_empty());
        assert_eq!(reload(&root), root);
    }

    #[rstest]
    fn stored_record_round_trips(snapshot: Snapshot) {
        let commit = build(
            Some(Commit::root().oid().clone()),
            None,
            snapshot,
            TIMESTAMP,
            "multi\n\nline message",
        );

        assert_eq!(reload(&commit), commit);
    }

    #[rstest]
    fn recording_a_merge_parent_keeps_the_id(snapshot: Snapshot) {
        let parent = Commit::root().oid().clone();
        let given = ObjectId::digest(b"given");
        let mut commit = build(Some(parent.clone()), None, snapshot, TIMESTAMP, "merge");
        let oid = commit.oid().clone();

        commit.record_merge_parent(given.clone());
        let reloaded = reload(&commit);

        assert_eq!(reloaded.oid(), &oid);
        assert_eq!(reloaded.merge_parent(), Some(&given));
        assert_eq!(reloaded.parents(), vec![parent, given]);
        assert!(reloaded.is_merge());
    }
}
