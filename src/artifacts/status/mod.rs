//! Working tree status inspection
//!
//! Compares the working tree against the staging index and the current
//! commit.
//!
//! ## Components
//!
//! - `file_change`: How a working file differs from what would be committed
//! - `inspector`: Per-path comparisons
//! - `status_info`: The five status sections and their rendering

pub mod file_change;
pub mod inspector;
pub mod status_info;
