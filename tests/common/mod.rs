#![allow(dead_code)]

pub mod command;
pub mod file;

/// Timestamp every commit made through the test helpers records
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

/// `COMMIT_DATE` as it appears in `log` output
pub const LOG_DATE: &str = "Sun Jan 1 12:00:00 2023 +0000";
