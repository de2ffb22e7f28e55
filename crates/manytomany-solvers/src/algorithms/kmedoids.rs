//! Capacity-constrained k-medoids
//!
//! Every cluster receives exactly `size` points. The `n - k * size` points
//! that do not fit are left out of every cluster. Each iteration:
//!
//! 1. Pin every medoid into its own cluster.
//! 2. Fill the remaining `size - 1` slots per cluster by solving a
//!    slots x non-medoid-points assignment problem, where the cost of a slot of
//!    cluster `c` for point `p` is `d[medoid(c)][p]`.
//! 3. Move each medoid to the member with the lowest summed distance to the
//!    other members.
//!
//! A refined placement is only adopted when its cost does not exceed the
//! current one, so extra iterations never make the clustering worse.
//!
//! The diagonal of the distance matrix is never read.

use crate::algorithms::hungarian::HungarianSolver;
use crate::common::{
    AssignmentSolver, ClusteringConfig, ClusteringSolver, Clusters, SolverError, SolverResult,
};
use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct BalancedKMedoids<A: AssignmentSolver = HungarianSolver> {
    pub assignment: A,
}

impl BalancedKMedoids<HungarianSolver> {
    pub fn new() -> Self {
        Self {
            assignment: HungarianSolver::new(),
        }
    }
}

impl Default for BalancedKMedoids<HungarianSolver> {
    fn default() -> Self {
        Self::new()
    }
}

/// One placement of points around a fixed set of medoids.
struct Placement {
    /// members[c] lists the points of cluster c, medoid first.
    members: Vec<Vec<usize>>,
    cost: f64,
}

impl<A: AssignmentSolver> BalancedKMedoids<A> {
    pub fn with_assignment(assignment: A) -> Self {
        Self { assignment }
    }

    fn validate(distances: &ArrayView2<'_, f64>, k: usize, size: usize) -> SolverResult<()> {
        let (rows, cols) = distances.dim();
        if rows != cols {
            return Err(SolverError::MalformedMatrix(format!(
                "distance matrix must be square, got {}x{}",
                rows, cols
            )));
        }
        if k == 0 || k > rows {
            return Err(SolverError::InvalidClusterCount { k, points: rows });
        }
        if size == 0 || k.saturating_mul(size) > rows {
            return Err(SolverError::InvalidClusterSize {
                k,
                size,
                points: rows,
            });
        }
        for ((r, c), v) in distances.indexed_iter() {
            if r != c && !v.is_finite() {
                return Err(SolverError::MalformedMatrix(format!(
                    "distance at ({}, {}) is {}",
                    r, c, v
                )));
            }
        }
        Ok(())
    }

    fn place(
        &self,
        distances: &ArrayView2<'_, f64>,
        medoids: &[usize],
        size: usize,
    ) -> SolverResult<Placement> {
        let n = distances.nrows();
        let mut members: Vec<Vec<usize>> = medoids.iter().map(|&m| vec![m]).collect();
        let slots_per_cluster = size - 1;
        if slots_per_cluster == 0 {
            return Ok(Placement { members, cost: 0.0 });
        }

        let is_medoid = {
            let mut flags = vec![false; n];
            for &m in medoids {
                flags[m] = true;
            }
            flags
        };
        let candidates: Vec<usize> = (0..n).filter(|&p| !is_medoid[p]).collect();

        let slots = medoids.len() * slots_per_cluster;
        let mut costs = Array2::<f64>::zeros((slots, candidates.len()));
        for slot in 0..slots {
            let medoid = medoids[slot / slots_per_cluster];
            for (col, &point) in candidates.iter().enumerate() {
                costs[[slot, col]] = distances[[medoid, point]];
            }
        }

        let pairings = self.assignment.assign(costs.view())?;
        let mut cost = 0.0;
        for pairing in pairings {
            let cluster = pairing.row / slots_per_cluster;
            members[cluster].push(candidates[pairing.col]);
            cost += costs[[pairing.row, pairing.col]];
        }
        Ok(Placement { members, cost })
    }

    /// The member minimizing summed distance to the rest of the cluster.
    /// The current medoid wins ties so a stable cluster stops moving.
    fn best_medoid(distances: &ArrayView2<'_, f64>, members: &[usize]) -> usize {
        let spread = |candidate: usize| -> f64 {
            members
                .iter()
                .filter(|&&other| other != candidate)
                .map(|&other| distances[[candidate, other]])
                .sum()
        };

        let mut best = members[0];
        let mut best_spread = spread(best);
        for &candidate in &members[1..] {
            let s = spread(candidate);
            if s < best_spread {
                best = candidate;
                best_spread = s;
            }
        }
        best
    }

    /// Alternate medoid updates and re-placement until the medoids are
    /// stable, the cost change drops below tolerance, or the iteration budget
    /// runs out. The returned placement never costs more than `placement`.
    fn refine(
        &self,
        distances: &ArrayView2<'_, f64>,
        mut medoids: Vec<usize>,
        mut placement: Placement,
        size: usize,
        config: &ClusteringConfig,
    ) -> SolverResult<Placement> {
        for iteration in 0..config.max_iterations {
            let updated: Vec<usize> = placement
                .members
                .iter()
                .map(|members| Self::best_medoid(distances, members))
                .collect();
            if updated == medoids {
                tracing::debug!(iteration, cost = placement.cost, "k-medoids converged, medoids stable");
                break;
            }

            let next = self.place(distances, &updated, size)?;
            if next.cost > placement.cost {
                tracing::debug!(
                    iteration,
                    cost = placement.cost,
                    rejected = next.cost,
                    "k-medoids refinement increased cost, keeping current placement"
                );
                break;
            }

            let change = placement.cost - next.cost;
            tracing::debug!(iteration, cost = next.cost, change, "k-medoids iteration");
            medoids = updated;
            placement = next;
            if change < config.tolerance {
                break;
            }
        }
        Ok(placement)
    }

    fn into_clusters(placement: Placement) -> Clusters {
        let mut groups: Vec<Vec<usize>> = placement
            .members
            .into_iter()
            .map(|mut m| {
                m.sort_unstable();
                m
            })
            .collect();
        groups.sort_by_key(|g| g[0]);
        groups.into_iter().enumerate().collect()
    }
}

impl<A: AssignmentSolver> ClusteringSolver for BalancedKMedoids<A> {
    fn cluster(
        &self,
        distances: ArrayView2<'_, f64>,
        k: usize,
        size: usize,
        config: &ClusteringConfig,
    ) -> SolverResult<Clusters> {
        Self::validate(&distances, k, size)?;

        let medoids = initial_medoids(distances.nrows(), k, config.seed);
        let placement = self.place(&distances, &medoids, size)?;
        let placement = self.refine(&distances, medoids, placement, size, config)?;

        Ok(Self::into_clusters(placement))
    }
}

/// `k` distinct points drawn with a seeded RNG, in ascending order.
fn initial_medoids(n: usize, k: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut medoids: Vec<usize> = rand::seq::index::sample(&mut rng, n, k).into_vec();
    medoids.sort_unstable();
    medoids
}
