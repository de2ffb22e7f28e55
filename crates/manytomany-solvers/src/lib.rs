//! Solver capabilities for the manytomany matching pipeline
//!
//! Two pluggable strategies are defined in [`common`]: an assignment solver
//! (minimum-cost bipartite matching) and a clustering solver (balanced
//! partitioning over a distance matrix). [`algorithms`] ships one
//! implementation of each.

pub mod algorithms;
pub mod common;

/// Re-export common types
pub use common::*;
pub use algorithms::{BalancedKMedoids, HungarianSolver};
