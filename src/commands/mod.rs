//! Command implementations
//!
//! Every command lives in `porcelain` as a method on the repository context.

pub mod porcelain;
