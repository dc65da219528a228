//! MESA inlist and run-control file rewriting.
//!
//! - rule definitions (`rules`)
//! - staged line-oriented rewriting (`rewrite`)

pub mod rewrite;
pub mod rules;

pub use rewrite::*;
pub use rules::*;
