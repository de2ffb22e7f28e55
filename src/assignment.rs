//! Round-robin assignment of mentees to mentor groups
//!
//! One optimal assignment is solved per round over the group x mentee matrix.
//! Mentees placed in a round are excluded from later rounds. Exclusion works on
//! column indices of the full matrix: the matrix itself is never rebuilt, each
//! round solves on a column selection of the still-eligible mentees and maps
//! the solver's column indices back through that selection.
//!
//! Each round is optimal on its own; the sequence of rounds is greedy and is
//! not jointly optimal across rounds.

use crate::error::{ComparisonError, ConfigError, MatchResult};
use crate::grouping::MentorGroups;
use crate::record::{GroupId, Record, RecordKey, RecordTable};
use crate::similarity::{group_matrix, SimilarityMatrix};
use indexmap::IndexMap;
use manytomany_solvers::{AssignmentSolver, SolverError};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A mentee placed with a group in one round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub group: GroupId,
    pub mentee: RecordKey,
    /// Column of the mentee in the full group x mentee matrix
    pub column: usize,
    pub cost: f64,
}

/// Everything decided in a single round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundMatching {
    pub round: usize,
    pub placements: Vec<Placement>,
}

impl RoundMatching {
    pub fn total_cost(&self) -> f64 {
        self.placements.iter().map(|p| p.cost).sum()
    }

    pub fn columns(&self) -> impl Iterator<Item = usize> + '_ {
        self.placements.iter().map(|p| p.column)
    }
}

/// Solve one round over the `eligible` columns of `matrix`.
///
/// Every group row receives a distinct eligible mentee. Fails with
/// [`ConfigError::MenteePoolExhausted`] if fewer mentees than groups remain.
pub fn assign_round<A: AssignmentSolver>(
    matrix: &SimilarityMatrix<GroupId, RecordKey>,
    eligible: &[usize],
    round: usize,
    solver: &A,
) -> MatchResult<RoundMatching> {
    let groups = matrix.row_keys().len();
    if eligible.len() < groups {
        return Err(ConfigError::MenteePoolExhausted {
            round,
            remaining: eligible.len(),
            groups,
        }
        .into());
    }

    let costs = matrix.select_columns(eligible);
    let pairings = solver.assign(costs.view())?;
    if pairings.len() != groups {
        return Err(SolverError::InvalidOutput(format!(
            "{} pairings for {} groups in round {}",
            pairings.len(),
            groups,
            round
        ))
        .into());
    }

    let mut rows_seen = HashSet::with_capacity(groups);
    let mut cols_seen = HashSet::with_capacity(groups);
    let mut placements = Vec::with_capacity(groups);
    for pairing in pairings {
        if pairing.row >= groups || pairing.col >= eligible.len() {
            return Err(SolverError::InvalidOutput(format!(
                "pairing ({}, {}) outside {}x{} matrix",
                pairing.row,
                pairing.col,
                groups,
                eligible.len()
            ))
            .into());
        }
        if !rows_seen.insert(pairing.row) || !cols_seen.insert(pairing.col) {
            return Err(SolverError::InvalidOutput(format!(
                "pairing ({}, {}) reuses a row or column",
                pairing.row, pairing.col
            ))
            .into());
        }

        let column = eligible[pairing.col];
        placements.push(Placement {
            group: matrix.row_keys()[pairing.row],
            mentee: matrix.col_keys()[column].clone(),
            column,
            cost: costs[[pairing.row, pairing.col]],
        });
    }
    placements.sort_by_key(|p| p.group);

    Ok(RoundMatching { round, placements })
}

/// Mentees assigned to each group, one column per round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentTable {
    rounds: usize,
    rows: IndexMap<GroupId, Vec<RecordKey>>,
}

impl AssignmentTable {
    /// Merge per-round matchings into one table. Rounds are applied in order.
    pub fn from_rounds(groups: &[GroupId], matchings: &[RoundMatching]) -> MatchResult<Self> {
        let mut rows: IndexMap<GroupId, Vec<RecordKey>> = groups
            .iter()
            .map(|&g| (g, Vec::with_capacity(matchings.len())))
            .collect();

        for matching in matchings {
            for placement in &matching.placements {
                let row = rows.get_mut(&placement.group).ok_or_else(|| {
                    SolverError::InvalidOutput(format!(
                        "round {} placed a mentee with unknown {}",
                        matching.round, placement.group
                    ))
                })?;
                row.push(placement.mentee.clone());
            }
        }

        let rounds = matchings.len();
        if let Some((group, row)) = rows.iter().find(|(_, row)| row.len() != rounds) {
            return Err(SolverError::InvalidOutput(format!(
                "{} has {} mentees after {} rounds",
                group,
                row.len(),
                rounds
            ))
            .into());
        }

        Ok(Self { rounds, rows })
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mentees of `group`, indexed by round.
    pub fn get(&self, group: GroupId) -> Option<&[RecordKey]> {
        self.rows.get(&group).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[RecordKey])> {
        self.rows.iter().map(|(id, row)| (*id, row.as_slice()))
    }

    /// Group and round in which `mentee` was placed.
    pub fn placement_of(&self, mentee: &RecordKey) -> Option<(GroupId, usize)> {
        self.rows.iter().find_map(|(id, row)| {
            row.iter()
                .position(|m| m == mentee)
                .map(|round| (*id, round))
        })
    }

    /// Index from mentee to (group, round), for bulk lookups.
    pub fn placements(&self) -> IndexMap<&RecordKey, (GroupId, usize)> {
        let mut index = IndexMap::new();
        for (id, row) in &self.rows {
            for (round, mentee) in row.iter().enumerate() {
                index.insert(mentee, (*id, round));
            }
        }
        index
    }
}

/// Run `rounds` assignment rounds and merge them into an [`AssignmentTable`].
pub fn assign_rounds<A, F>(
    mentors: &RecordTable,
    mentees: &RecordTable,
    groups: &MentorGroups,
    rounds: usize,
    compare: F,
    solver: &A,
) -> MatchResult<AssignmentTable>
where
    A: AssignmentSolver,
    F: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
{
    if rounds == 0 {
        return Err(ConfigError::ZeroRounds.into());
    }
    if groups.is_empty() {
        return Err(ConfigError::NoGroups.into());
    }
    groups.check_members(mentors)?;

    info!(
        groups = groups.len(),
        mentees = mentees.len(),
        rounds,
        "assigning mentees to mentor groups"
    );

    let matrix = group_matrix(mentors, groups, mentees, compare)?;
    let mut eligible: Vec<usize> = (0..mentees.len()).collect();
    let mut matchings = Vec::with_capacity(rounds);

    for round in 0..rounds {
        let matching = assign_round(&matrix, &eligible, round, solver)?;
        debug!(
            round,
            cost = matching.total_cost(),
            remaining = eligible.len() - matching.placements.len(),
            "assignment round complete"
        );

        let taken: HashSet<usize> = matching.columns().collect();
        eligible.retain(|column| !taken.contains(column));
        matchings.push(matching);
    }

    let table = AssignmentTable::from_rounds(matrix.row_keys(), &matchings)?;
    if !eligible.is_empty() {
        warn!(count = eligible.len(), "mentees left without a group");
    }
    info!("mentee assignment complete");
    Ok(table)
}
