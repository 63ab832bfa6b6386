//! twig: a small single-user version-control engine
//!
//! - `areas`: The repository context and the on-disk areas it owns
//! - `artifacts`: Object types and the algorithms working on them
//! - `commands`: One method per user-facing command

pub mod areas;
pub mod artifacts;
pub mod commands;
