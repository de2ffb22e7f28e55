//! Manytomany
//!
//! Two-sided, capacity-constrained matching of mentees to groups of mentors.
//!
//! # Pipeline
//!
//! 1. **Mentor grouping**: a mentor x mentor distance matrix (infinite on the
//!    diagonal) is handed to a balanced clustering solver, producing
//!    `floor(mentors / mentors_per_group)` groups of similar mentors.
//! 2. **Round-robin assignment**: a group x mentee matrix is built once. Each
//!    of the `mentees_per_mentor` rounds solves an optimal assignment over the
//!    mentees not yet placed, giving every group one more mentee.
//! 3. **Projection**: the group-level assignment table is expanded into a
//!    by-mentor view and a by-mentee view.
//!
//! Both solvers are pluggable through the traits in [`manytomany_solvers`].
//!
//! ## Example Usage
//!
//! ```rust
//! use manytomany::{match_mentees, Record, RecordTable};
//! use manytomany::similarity::{infallible_group, infallible_pairwise};
//!
//! let mentors = RecordTable::from_records(
//!     (0..6).map(|i| Record::new(format!("mentor{}", i)).with("level", i as i64)),
//! ).unwrap();
//! let mentees = RecordTable::from_records(
//!     (0..4).map(|i| Record::new(format!("mentee{}", i)).with("level", i as i64)),
//! ).unwrap();
//!
//! let level = |r: &Record| r.get("level").and_then(|v| v.as_number()).unwrap_or(0.0);
//! let (by_mentor, by_mentee) = match_mentees(
//!     &mentors,
//!     &mentees,
//!     3,
//!     1,
//!     infallible_group(|group, mentee| {
//!         group.iter().map(|m| (level(*m) - level(mentee)).abs()).sum()
//!     }),
//!     infallible_pairwise(|a, b| (level(a) - level(b)).abs()),
//! ).unwrap();
//!
//! assert_eq!(by_mentor.rows.len(), 6);
//! assert_eq!(by_mentee.rows.len(), 2);
//! assert_eq!(by_mentee.unassigned.len(), 2);
//! ```

#![warn(clippy::all)]

pub mod assignment;
pub mod config;
pub mod error;
pub mod grouping;
pub mod matcher;
pub mod record;
pub mod similarity;
pub mod view;

// Re-export main types for convenience
pub use assignment::{AssignmentTable, Placement, RoundMatching};
pub use config::MatchConfig;
pub use error::{ComparisonError, ConfigError, MatchError, MatchResult};
pub use grouping::MentorGroups;
pub use matcher::{assign_mentees, group_mentors, match_mentees, MatchOutcome, MatchReport, Matcher};
pub use record::{AttributeMap, AttributeValue, GroupId, Record, RecordKey, RecordTable};
pub use similarity::SimilarityMatrix;
pub use view::{ByMenteeRow, ByMenteeView, ByMentorRow, ByMentorView};

pub use manytomany_solvers::{
    AssignmentSolver, BalancedKMedoids, ClusteringConfig, ClusteringSolver, HungarianSolver,
    Pairing, SolverError,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
