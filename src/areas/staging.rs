//! Staging index
//!
//! The overlay between the working tree and the current commit: pending
//! additions (`path -> blob id`) and pending removals (`path -> id the path had
//! in the current commit`). Composing a commit applies both overlays on top of
//! the parent snapshot.
//!
//! ## Persistence
//!
//! Each overlay lives in its own checksummed file under `.twig/staging/`
//! (see [`crate::artifacts::staging`]). A file only exists while its overlay
//! is non-empty; writing an empty overlay deletes the file.

use crate::artifacts::core::error::RepositoryError;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::snapshot::Snapshot;
use crate::artifacts::staging::checksum::Checksum;
use crate::artifacts::staging::staged_entry::{ENTRY_PREFIX_SIZE, StagedEntry};
use crate::artifacts::staging::staging_header::StagingHeader;
use crate::artifacts::staging::{HEADER_SIZE, SIGNATURE, VERSION};
use anyhow::{Context, anyhow};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

const ADDITIONS_FILE: &str = "additions";
const REMOVALS_FILE: &str = "removals";

type Overlay = BTreeMap<PathBuf, ObjectId>;

#[derive(Debug, Clone)]
pub struct StagingIndex {
    /// Staging directory (typically `.twig/staging`)
    path: Box<Path>,
    additions: Overlay,
    removals: Overlay,
    /// Flag indicating if the overlays have been modified since loading
    changed: bool,
}

impl StagingIndex {
    pub fn new(path: Box<Path>) -> Self {
        StagingIndex {
            path,
            additions: BTreeMap::new(),
            removals: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.removals
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains_key(path)
    }

    /// Load both overlays from disk, treating missing files as empty overlays
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions = self.read_overlay(ADDITIONS_FILE)?;
        self.removals = self.read_overlay(REMOVALS_FILE)?;
        self.changed = false;

        Ok(())
    }

    /// Persist the overlays if anything changed since they were loaded
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        if !self.changed {
            return Ok(());
        }

        self.write_overlay(ADDITIONS_FILE, &self.additions)?;
        self.write_overlay(REMOVALS_FILE, &self.removals)?;
        self.changed = false;

        Ok(())
    }

    /// Stage `path` with the content `oid`
    ///
    /// Staging the exact content the current commit already tracks cancels a
    /// pending addition instead. Either way the path leaves the removals.
    pub fn stage_addition(&mut self, path: &Path, oid: ObjectId, tracked: Option<&ObjectId>) {
        if tracked == Some(&oid) {
            self.additions.remove(path);
        } else {
            self.additions.insert(path.to_path_buf(), oid);
        }
        self.removals.remove(path);
        self.changed = true;

        tracing::debug!(path = %path.display(), "staged for addition");
    }

    /// Unstage `path` and, if the current commit tracks it, stage its removal
    ///
    /// Returns whether the path is now staged for removal, in which case the
    /// caller is expected to delete the working file.
    pub fn stage_removal(
        &mut self,
        path: &Path,
        tracked: Option<&ObjectId>,
    ) -> anyhow::Result<bool> {
        let was_staged = self.additions.remove(path).is_some();

        let Some(tracked) = tracked else {
            if !was_staged {
                anyhow::bail!(RepositoryError::NothingToRemove);
            }
            self.changed = true;
            return Ok(false);
        };

        self.removals.insert(path.to_path_buf(), tracked.clone());
        self.changed = true;
        tracing::debug!(path = %path.display(), "staged for removal");

        Ok(true)
    }

    /// The snapshot the next commit would record on top of `parent`
    pub fn compose_snapshot(&self, parent: &Snapshot) -> Snapshot {
        parent.derive(&self.additions, self.removals.keys())
    }

    pub fn clear(&mut self) {
        self.additions.clear();
        self.removals.clear();
        self.changed = true;
    }

    fn read_overlay(&self, name: &str) -> anyhow::Result<Overlay> {
        let overlay_path = self.path.join(name);
        if !overlay_path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read(&overlay_path).context(format!(
            "Unable to read staging file {}",
            overlay_path.display()
        ))?;
        let mut reader = Checksum::new(Cursor::new(content));

        let entries_count = Self::parse_header(&mut reader)?;
        let overlay = Self::parse_entries(entries_count, &mut reader)?;
        reader
            .verify()
            .with_context(|| format!("Corrupted staging file {}", overlay_path.display()))?;

        Ok(overlay)
    }

    fn parse_header(reader: &mut Checksum<Cursor<Vec<u8>>>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = StagingHeader::deserialize(Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid staging file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported staging file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn parse_entries(
        entries_count: u32,
        reader: &mut Checksum<Cursor<Vec<u8>>>,
    ) -> anyhow::Result<Overlay> {
        let mut overlay = BTreeMap::new();

        for _ in 0..entries_count {
            let prefix = reader.read(ENTRY_PREFIX_SIZE)?;
            let path_length =
                u16::from_be_bytes([prefix[ENTRY_PREFIX_SIZE - 2], prefix[ENTRY_PREFIX_SIZE - 1]]);
            let path = reader.read(path_length as usize)?;

            let entry_bytes = Bytes::from([prefix.to_vec(), path.to_vec()].concat());
            let entry = StagedEntry::deserialize(Cursor::new(entry_bytes))?;

            overlay.insert(entry.path, entry.oid);
        }

        Ok(overlay)
    }

    fn write_overlay(&self, name: &str, overlay: &Overlay) -> anyhow::Result<()> {
        let overlay_path = self.path.join(name);

        if overlay.is_empty() {
            if overlay_path.exists() {
                std::fs::remove_file(&overlay_path).context(format!(
                    "Unable to remove staging file {}",
                    overlay_path.display()
                ))?;
            }
            return Ok(());
        }

        let mut writer = Checksum::new(Vec::new());
        writer.write(&StagingHeader::for_entries(overlay.len() as u32).serialize()?)?;
        for (path, oid) in overlay {
            writer.write(&StagedEntry::new(path.clone(), oid.clone()).serialize()?)?;
        }
        writer.write_checksum()?;

        std::fs::create_dir_all(&self.path)?;
        std::fs::write(&overlay_path, writer.into_inner()).context(format!(
            "Unable to write staging file {}",
            overlay_path.display()
        ))?;

        Ok(())
    }
}
