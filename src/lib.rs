//! `mesa-prep` library crate.
//!
//! The binary (`mesaprep`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future batch drivers or notebooks)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod inlist;
pub mod io;
pub mod mesa;
pub mod report;
