//! Object database
//!
//! Objects live under `objects/<namespace>/<xx>/<yyyy...>`, one namespace per
//! object kind, zlib-compressed and written through a temp file + rename.
//! Storing is idempotent: identical content maps to the same path and an
//! existing object file is never rewritten, so every distinct blob has exactly
//! one physical copy. The only exception is [`Database::rewrite_commit`], used
//! to record the second parent of a merge commit under its original ID.

use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn store_blob(&self, blob: &Blob) -> anyhow::Result<ObjectId> {
        let oid = blob.object_id()?;
        self.store(blob, &oid, false)?;

        Ok(oid)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> anyhow::Result<Blob> {
        let reader = self.parse_object_as_bytes(ObjectType::Blob, oid)?;

        Blob::deserialize(reader)
    }

    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        self.store(commit, commit.oid(), false)
    }

    /// Overwrite an already stored commit record, keeping its ID
    pub fn rewrite_commit(&self, commit: &Commit) -> anyhow::Result<()> {
        self.store(commit, commit.oid(), true)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<Commit> {
        let reader = self.parse_object_as_bytes(ObjectType::Commit, oid)?;

        Commit::deserialize(reader)
    }

    pub fn contains(&self, object_type: ObjectType, oid: &ObjectId) -> bool {
        self.object_path(object_type, oid).is_file()
    }

    /// Every stored commit ID, in ascending order
    pub fn list_commits(&self) -> anyhow::Result<Vec<ObjectId>> {
        self.find_commits_by_prefix("")
    }

    /// Find all commits whose ID starts with the given prefix
    ///
    /// For prefixes of 2+ characters only the matching fan-out directory is
    /// searched. The result is sorted; more than one match means the prefix is
    /// ambiguous and it is up to the caller to decide what to do about it.
    pub fn find_commits_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let namespace = self.path.join(ObjectType::Commit.namespace());
        let search_root = if prefix.len() >= 2 {
            namespace.join(&prefix[..2])
        } else {
            namespace.clone()
        };

        if !search_root.is_dir() {
            return Ok(vec![]);
        }

        let mut matches = Vec::new();
        for entry in WalkDir::new(&search_root).min_depth(1) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            // <namespace>/<xx>/<yyyy...>
            let relative = entry.path().strip_prefix(&namespace)?;
            let full_oid: String = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect();

            // skip leftovers such as temp files
            if let Ok(oid) = ObjectId::try_parse(full_oid)
                && oid.starts_with(&prefix)
            {
                matches.push(oid);
            }
        }
        matches.sort();

        Ok(matches)
    }

    fn object_path(&self, object_type: ObjectType, oid: &ObjectId) -> PathBuf {
        self.path.join(object_type.namespace()).join(oid.to_path())
    }

    fn store(&self, object: &impl Object, oid: &ObjectId, overwrite: bool) -> anyhow::Result<()> {
        let object_path = self.object_path(object.object_type(), oid);

        // write the object to disk unless it already exists
        if object_path.exists() && !overwrite {
            tracing::trace!(%oid, "object already stored");
            return Ok(());
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.serialize()?)?;
        tracing::debug!(%oid, object_type = %object.object_type(), overwrite, "stored object");

        Ok(())
    }

    fn parse_object_as_bytes(
        &self,
        expected_type: ObjectType,
        oid: &ObjectId,
    ) -> anyhow::Result<impl BufRead> {
        let object_path = self.object_path(expected_type, oid);
        if !object_path.is_file() {
            return Err(RepositoryError::ObjectNotFound(oid.clone()).into());
        }

        let object_content = self.read_object(object_path)?;
        let mut object_reader = Cursor::new(object_content);

        let object_type = ObjectType::parse_object_type(&mut object_reader)?;
        if object_type != expected_type {
            anyhow::bail!(
                "Object {} is a {}, expected a {}",
                oid,
                object_type,
                expected_type
            );
        }

        Ok(object_reader)
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::snapshot::Snapshot;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn database() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());

        (dir, database)
    }

    fn stored_files(database: &Database) -> usize {
        WalkDir::new(database.objects_path())
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .count()
    }

    #[rstest]
    fn storing_the_same_content_twice_keeps_one_copy(database: (TempDir, Database)) {
        let (_dir, database) = database;

        let first = database
            .store_blob(&Blob::new(Bytes::from_static(b"content")))
            .unwrap();
        let second = database
            .store_blob(&Blob::new(Bytes::from_static(b"content")))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(stored_files(&database), 1);
        assert_eq!(
            database.load_blob(&first).unwrap().content(),
            &Bytes::from_static(b"content")
        );
    }

    #[rstest]
    fn missing_objects_are_reported(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let oid = ObjectId::digest(b"nothing");

        let error = database.load_blob(&oid).unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::ObjectNotFound(oid))
        );
    }

    #[rstest]
    fn blobs_and_commits_live_in_separate_namespaces(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let blob_oid = database
            .store_blob(&Blob::new(Bytes::from_static(b"content")))
            .unwrap();
        let root = Commit::root();
        database.store_commit(&root).unwrap();

        assert!(database.contains(ObjectType::Blob, &blob_oid));
        assert!(!database.contains(ObjectType::Commit, &blob_oid));
        assert!(database.load_commit(&blob_oid).is_err());
        assert_eq!(database.list_commits().unwrap(), vec![root.oid().clone()]);
    }

    #[rstest]
    fn rewriting_a_commit_replaces_the_record(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let root = Commit::root();
        let mut commit = Commit::new(
            Some(root.oid().clone()),
            None,
            Snapshot::empty(),
            "Sun Jan 1 12:00:00 2023 +0000".to_string(),
            "merge".to_string(),
        )
        .unwrap();
        database.store_commit(&commit).unwrap();

        commit.record_merge_parent(root.oid().clone());
        database.store_commit(&commit).unwrap();
        assert!(!database.load_commit(commit.oid()).unwrap().is_merge());

        database.rewrite_commit(&commit).unwrap();
        assert_eq!(database.load_commit(commit.oid()).unwrap(), commit);
    }

    #[rstest]
    fn commits_are_found_by_prefix(database: (TempDir, Database)) {
        let (_dir, database) = database;
        let root = Commit::root();
        database.store_commit(&root).unwrap();
        let oid = root.oid().as_ref();

        for prefix in [&oid[..1], &oid[..2], &oid[..6], oid] {
            assert_eq!(
                database.find_commits_by_prefix(prefix).unwrap(),
                vec![root.oid().clone()]
            );
        }

        let other = if oid.starts_with('0') { "1" } else { "0" };
        assert!(database.find_commits_by_prefix(other).unwrap().is_empty());
        assert!(database.find_commits_by_prefix("zz").unwrap().is_empty());
    }
}
