//! Working-tree materialization
//!
//! Switching the working tree to another snapshot is done in two steps:
//! - Plan every delete and write and check the plan against untracked files
//! - Only when no untracked file is in the way, apply the plan
//!
//! A refused plan leaves the working tree exactly as it was.

pub mod conflict;
pub mod migration;
