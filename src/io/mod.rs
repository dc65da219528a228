//! Input/output helpers.
//!
//! - artifact cleanup (`clean`)
//! - run-report JSON export (`export`)

pub mod clean;
pub mod export;

pub use clean::*;
pub use export::*;
