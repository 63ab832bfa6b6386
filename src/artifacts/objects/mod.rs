//! Object model
//!
//! Everything the repository stores is an object identified by a SHA-1 hash:
//!
//! - **Blob**: File content (raw bytes)
//! - **Commit**: Parents, timestamp, message and the full snapshot of tracked files
//!
//! All objects share the envelope format `<type> <size>\0<content>`.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod snapshot;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
