use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by the clustering and assignment solvers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Malformed matrix: {0}")]
    MalformedMatrix(String),

    #[error("Infeasible assignment: {rows} rows cannot be matched to {cols} columns")]
    Infeasible { rows: usize, cols: usize },

    #[error("Invalid cluster count {k} for {points} points")]
    InvalidClusterCount { k: usize, points: usize },

    #[error("{k} clusters of size {size} do not fit {points} points")]
    InvalidClusterSize { k: usize, size: usize, points: usize },

    #[error("Invalid solver output: {0}")]
    InvalidOutput(String),
}

pub type SolverResult<T> = Result<T, SolverError>;

/// A single (row, column) pairing returned by an assignment solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct Pairing {
    pub row: usize,
    pub col: usize,
}

impl Pairing {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Cluster id -> member indices, ordered by cluster id.
pub type Clusters = BTreeMap<usize, Vec<usize>>;

/// Minimum-cost bipartite assignment.
///
/// Given an `R x C` cost matrix with `R <= C`, returns exactly `R` pairings,
/// one per row, with no column used twice, minimizing the summed cost.
pub trait AssignmentSolver {
    fn assign(&self, costs: ArrayView2<'_, f64>) -> SolverResult<Vec<Pairing>>;
}

/// Partitioning of a square distance matrix into `k` clusters of exactly
/// `size` points each.
///
/// The `n - k * size` points that do not fit are left out of every cluster.
/// Implementations must never pick a point as its own nearest neighbour, so
/// the diagonal of `distances` may hold anything (typically `+inf`).
pub trait ClusteringSolver {
    fn cluster(
        &self,
        distances: ArrayView2<'_, f64>,
        k: usize,
        size: usize,
        config: &ClusteringConfig,
    ) -> SolverResult<Clusters>;
}

/// Configuration for the clustering solver.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Upper bound on refinement iterations.
    pub max_iterations: usize,
    /// Stop once the change in total assignment cost drops below this.
    pub tolerance: f64,
    /// Seed for the initial medoid draw.
    pub seed: u64,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            tolerance: 0.001,
            seed: 0,
        }
    }
}

/// Total cost of a set of pairings against `costs`.
pub fn total_cost(costs: ArrayView2<'_, f64>, pairings: &[Pairing]) -> f64 {
    pairings.iter().map(|p| costs[[p.row, p.col]]).sum()
}
