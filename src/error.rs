//! Error taxonomy for the matching pipeline
//!
//! Every failure is fatal: operations either complete all phases or return one
//! of these errors, never a partial result.

use crate::record::{GroupId, RecordKey};
use manytomany_solvers::SolverError;
use thiserror::Error;

/// Error produced by a caller-supplied comparison function.
pub type ComparisonError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Invalid sizes, pools or group layouts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Group size must be at least 1")]
    ZeroGroupSize,

    #[error("Group size {group_size} exceeds the mentor pool of {mentors}")]
    GroupSizeExceedsPool { group_size: usize, mentors: usize },

    #[error("Mentees per mentor must be at least 1")]
    ZeroRounds,

    #[error("Mentee pool exhausted in round {round}: {remaining} mentees left for {groups} groups")]
    MenteePoolExhausted {
        round: usize,
        remaining: usize,
        groups: usize,
    },

    #[error("No mentor groups to assign mentees to")]
    NoGroups,

    #[error("{0} has no mentors")]
    EmptyGroup(GroupId),

    #[error("Mentor {0} is not in the mentor table")]
    UnknownMentor(RecordKey),

    #[error("Mentor {0} belongs to more than one group")]
    MentorInMultipleGroups(RecordKey),

    #[error("Clustering tolerance must be a non-negative number, got {0}")]
    InvalidTolerance(f64),
}

/// Errors that can occur while matching mentees to mentor groups
#[derive(Error, Debug)]
pub enum MatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Raised by a comparison function; passed through untouched.
    #[error(transparent)]
    Comparison(ComparisonError),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),

    #[error("Duplicate record key {0}")]
    DuplicateRecord(RecordKey),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

impl MatchError {
    /// The configuration error, if this is one.
    pub fn as_config(&self) -> Option<&ConfigError> {
        match self {
            MatchError::Config(e) => Some(e),
            _ => None,
        }
    }
}

pub type MatchResult<T> = Result<T, MatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct MissingField(&'static str);

    impl std::fmt::Display for MissingField {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "missing field {}", self.0)
        }
    }

    impl std::error::Error for MissingField {}

    #[test]
    fn test_comparison_error_is_transparent() {
        let err = MatchError::Comparison(Box::new(MissingField("age")));
        assert_eq!(err.to_string(), "missing field age");

        match err {
            MatchError::Comparison(inner) => {
                let original = inner.downcast_ref::<MissingField>().unwrap();
                assert_eq!(original.0, "age");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_config_error_display() {
        let err: MatchError = ConfigError::MenteePoolExhausted {
            round: 1,
            remaining: 2,
            groups: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Mentee pool exhausted in round 1: 2 mentees left for 3 groups"
        );
        assert!(err.as_config().is_some());
    }
}
