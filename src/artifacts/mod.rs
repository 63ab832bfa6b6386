//! Version-control data structures and algorithms
//!
//! - `branch`: Branch names and reference aliases
//! - `checkout`: Working-tree migrations and untracked-file conflicts
//! - `core`: Domain errors and environment configuration
//! - `graph`: Commit DAG traversal and revision resolution
//! - `merge`: Merge case classification, conflict markers and merge plans
//! - `objects`: Stored object types (blob, commit) and their ids
//! - `staging`: On-disk format of the staging index
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod graph;
pub mod merge;
pub mod objects;
pub mod staging;
pub mod status;
