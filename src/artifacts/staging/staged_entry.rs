//! Staged entry representation
//!
//! An entry pairs a repository-relative path with the blob digest staged for
//! it (additions) or the digest it had in the current commit (removals).

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::anyhow;
use byteorder::{ReadBytesExt, WriteBytesExt};
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Size of the fixed part of an entry: binary object ID + path length
pub const ENTRY_PREFIX_SIZE: usize = OBJECT_ID_LENGTH / 2 + 2;

/// Maximum path length supported in staged entries
const MAX_PATH_SIZE: usize = u16::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StagedEntry {
    pub path: PathBuf,
    pub oid: ObjectId,
}

impl Packable for StagedEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let path = self
            .path
            .to_str()
            .ok_or_else(|| anyhow!("Path {} is not valid UTF-8", self.path.display()))?;
        if path.len() > MAX_PATH_SIZE {
            return Err(anyhow!("Path {} is too long to stage", self.path.display()));
        }

        let mut bytes = Vec::with_capacity(ENTRY_PREFIX_SIZE + path.len());
        self.oid.write_h40_to(&mut bytes)?;
        bytes.write_u16::<byteorder::NetworkEndian>(path.len() as u16)?;
        bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(bytes))
    }
}

impl Unpackable for StagedEntry {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let oid = ObjectId::read_h40_from(&mut reader)?;
        let path_length = reader.read_u16::<byteorder::NetworkEndian>()? as usize;

        let mut path = vec![0u8; path_length];
        reader.read_exact(&mut path)?;
        let path = String::from_utf8(path).map_err(|_| anyhow!("Invalid path in staged entry"))?;

        Ok(StagedEntry {
            path: PathBuf::from(path),
            oid,
        })
    }
}
