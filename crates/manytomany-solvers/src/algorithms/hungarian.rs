//! Kuhn-Munkres assignment for rectangular cost matrices
//!
//! Shortest augmenting path formulation with row/column potentials, O(R^2 * C).
//! Rows are inserted one at a time; each insertion grows a Dijkstra-like tree
//! over the columns until it reaches a free one, then flips the path.

use crate::common::{AssignmentSolver, Pairing, SolverError, SolverResult};
use ndarray::ArrayView2;

#[derive(Debug, Clone, Copy, Default)]
pub struct HungarianSolver;

impl HungarianSolver {
    pub fn new() -> Self {
        Self
    }

    fn validate(costs: &ArrayView2<'_, f64>) -> SolverResult<()> {
        let (rows, cols) = costs.dim();
        if rows > cols {
            return Err(SolverError::Infeasible { rows, cols });
        }
        if let Some(((r, c), v)) = costs.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(SolverError::MalformedMatrix(format!(
                "cost at ({}, {}) is {}",
                r, c, v
            )));
        }
        Ok(())
    }
}

impl AssignmentSolver for HungarianSolver {
    fn assign(&self, costs: ArrayView2<'_, f64>) -> SolverResult<Vec<Pairing>> {
        Self::validate(&costs)?;
        let (n, m) = costs.dim();
        if n == 0 {
            return Ok(Vec::new());
        }

        // 1-based internally; index 0 is the virtual root of each search tree.
        let mut u = vec![0.0f64; n + 1];
        let mut v = vec![0.0f64; m + 1];
        let mut owner = vec![0usize; m + 1];
        let mut way = vec![0usize; m + 1];

        for i in 1..=n {
            owner[0] = i;
            let mut j0 = 0usize;
            let mut min_slack = vec![f64::INFINITY; m + 1];
            let mut used = vec![false; m + 1];

            loop {
                used[j0] = true;
                let i0 = owner[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0usize;

                for j in 1..=m {
                    if used[j] {
                        continue;
                    }
                    let cur = costs[[i0 - 1, j - 1]] - u[i0] - v[j];
                    if cur < min_slack[j] {
                        min_slack[j] = cur;
                        way[j] = j0;
                    }
                    if min_slack[j] < delta {
                        delta = min_slack[j];
                        j1 = j;
                    }
                }

                if j1 == 0 {
                    // Only reachable if every column is already in the tree.
                    return Err(SolverError::Infeasible { rows: n, cols: m });
                }

                for j in 0..=m {
                    if used[j] {
                        u[owner[j]] += delta;
                        v[j] -= delta;
                    } else {
                        min_slack[j] -= delta;
                    }
                }

                j0 = j1;
                if owner[j0] == 0 {
                    break;
                }
            }

            // Flip the augmenting path back to the root.
            loop {
                let j1 = way[j0];
                owner[j0] = owner[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut pairings: Vec<Pairing> = (1..=m)
            .filter(|&j| owner[j] != 0)
            .map(|j| Pairing::new(owner[j] - 1, j - 1))
            .collect();
        pairings.sort();

        tracing::trace!(rows = n, cols = m, "assignment solved");
        Ok(pairings)
    }
}
