//! Reporting: run summaries and terminal formatting.

pub mod format;

pub use format::*;
