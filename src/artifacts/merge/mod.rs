//! Three-way merge
//!
//! - `merge_case`: classification of one path into the thirteen merge cases
//! - `conflict_marker`: the text written for conflicting paths
//! - `merge_plan`: the resolution of every path, computed before anything is touched

pub mod conflict_marker;
pub mod merge_case;
pub mod merge_plan;
