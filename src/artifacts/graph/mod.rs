//! Commit history traversal
//!
//! - `commit_graph`: ancestry queries and split-point search over the DAG
//! - `revision`: turning user input (`HEAD`, full or abbreviated ids) into commit ids

pub mod commit_graph;
pub mod revision;
