//! Matching configuration
//!
//! ```yaml
//! mentors_per_group: 3
//! mentees_per_mentor: 2
//! clustering:
//!   max_iterations: 10
//!   tolerance: 0.001
//!   seed: 7
//! ```
//!
//! Every field is optional and falls back to [`MatchConfig::default`].

use crate::error::{ConfigError, MatchResult};
use manytomany_solvers::ClusteringConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Mentors per group (each mentee is matched with one whole group)
    pub mentors_per_group: usize,
    /// Mentees per group, i.e. the number of assignment rounds
    pub mentees_per_mentor: usize,
    /// Bounds for the clustering solver
    pub clustering: ClusteringConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mentors_per_group: 3,
            mentees_per_mentor: 1,
            clustering: ClusteringConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn new(mentors_per_group: usize, mentees_per_mentor: usize) -> Self {
        Self {
            mentors_per_group,
            mentees_per_mentor,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(text: &str) -> MatchResult<Self> {
        let config: MatchConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> MatchResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Checks that do not depend on the record tables.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mentors_per_group == 0 {
            return Err(ConfigError::ZeroGroupSize);
        }
        if self.mentees_per_mentor == 0 {
            return Err(ConfigError::ZeroRounds);
        }
        let tolerance = self.clustering.tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        Ok(())
    }
}
