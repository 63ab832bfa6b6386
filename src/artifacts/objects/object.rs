use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use std::io::{BufRead, Write};

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    fn object_id(&self) -> Result<ObjectId>;

    /// Prefix `content` with the `<type> <size>\0` envelope
    fn envelope(&self, content: &[u8]) -> Result<Bytes> {
        let mut object_bytes = Vec::with_capacity(content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), content.len());
        object_bytes.write_all(header.as_bytes())?;
        object_bytes.write_all(content)?;

        Ok(Bytes::from(object_bytes))
    }
}
