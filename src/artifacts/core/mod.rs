//! Core utilities and shared types
//!
//! This module contains shared utilities used across the application:
//!
//! - `error`: The domain error type raised by every repository operation
//! - `config`: Environment-driven settings (commit date override, log filter)

pub mod config;
pub mod error;
