//! Staging overlay file format
//!
//! Each overlay (additions, removals) is persisted as its own file:
//!
//! ```text
//! Header (12 bytes):
//!   - Signature: "STAG" (4 bytes)
//!   - Version: 1 (4 bytes)
//!   - Entry count (4 bytes)
//!
//! Entries (variable length):
//!   - Object ID (20 bytes, binary)
//!   - Path length (2 bytes)
//!   - UTF-8 path
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```
//!
//! All integers are in network byte order.

pub mod checksum;
pub mod staged_entry;
pub mod staging_header;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Size of the overlay header in bytes
pub const HEADER_SIZE: usize = 12; // 4 bytes for marker, 4 for version, 4 for entries_count

/// Magic signature identifying overlay files
pub const SIGNATURE: &str = "STAG";

/// Overlay file format version
pub const VERSION: u32 = 1;
