//! Core repository components
//!
//! - `database`: Object database for storing blobs and commits
//! - `staging`: Staging index (pending additions and removals)
//! - `refs`: Branch pointers and HEAD
//! - `repository`: The context value tying all areas together
//! - `workspace`: Working directory file system operations

pub(crate) mod database;
pub(crate) mod refs;
pub mod repository;
pub(crate) mod staging;
pub(crate) mod workspace;
