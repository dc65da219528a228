//! Domain types used throughout the update pipeline.
//!
//! This module defines:
//!
//! - user-facing parameters (`StarParams`)
//! - the resolved run configuration (`UpdateConfig`)

pub mod types;

pub use types::*;
