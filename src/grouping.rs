//! Mentor grouping
//!
//! Partitions the mentor pool into `floor(mentors / group_size)` groups of
//! similar mentors using a [`ClusteringSolver`]. Mentors that do not fit into
//! any group are reported in [`MentorGroups::unassigned`] and logged.

use crate::error::{ComparisonError, ConfigError, MatchResult};
use crate::record::{GroupId, Record, RecordKey, RecordTable};
use crate::similarity::mentor_matrix;
use indexmap::IndexMap;
use manytomany_solvers::{
    BalancedKMedoids, ClusteringConfig, ClusteringSolver, Clusters, SolverError,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{info, warn};

/// Disjoint groups of mentors, ordered by group id
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MentorGroups {
    groups: IndexMap<GroupId, Vec<RecordKey>>,
    unassigned: Vec<RecordKey>,
}

impl MentorGroups {
    /// Groups supplied by the caller; ids are assigned 0, 1, 2, ... in order.
    pub fn new(groups: Vec<Vec<RecordKey>>) -> MatchResult<Self> {
        let mut seen = HashSet::new();
        let mut indexed = IndexMap::with_capacity(groups.len());
        for (id, members) in groups.into_iter().enumerate() {
            let id = GroupId(id);
            if members.is_empty() {
                return Err(ConfigError::EmptyGroup(id).into());
            }
            for key in &members {
                if !seen.insert(key.clone()) {
                    return Err(ConfigError::MentorInMultipleGroups(key.clone()).into());
                }
            }
            indexed.insert(id, members);
        }
        Ok(Self {
            groups: indexed,
            unassigned: Vec::new(),
        })
    }

    /// Translate solver clusters (indices into `mentors`) into keyed groups.
    pub fn from_clusters(mentors: &RecordTable, clusters: &Clusters) -> MatchResult<Self> {
        let mut placed = vec![false; mentors.len()];
        let mut groups = IndexMap::with_capacity(clusters.len());

        for (&cluster_id, members) in clusters {
            let mut keys = Vec::with_capacity(members.len());
            for &index in members {
                let record = mentors.get_index(index).ok_or_else(|| {
                    SolverError::InvalidOutput(format!(
                        "cluster {} refers to mentor index {} of {}",
                        cluster_id,
                        index,
                        mentors.len()
                    ))
                })?;
                if std::mem::replace(&mut placed[index], true) {
                    return Err(SolverError::InvalidOutput(format!(
                        "mentor index {} placed in more than one cluster",
                        index
                    ))
                    .into());
                }
                keys.push(record.key.clone());
            }
            groups.insert(GroupId(cluster_id), keys);
        }

        let unassigned = mentors
            .keys()
            .zip(placed)
            .filter(|(_, placed)| !placed)
            .map(|(key, _)| key.clone())
            .collect();

        Ok(Self { groups, unassigned })
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: GroupId) -> Option<&[RecordKey]> {
        self.groups.get(&id).map(Vec::as_slice)
    }

    pub fn ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[RecordKey])> {
        self.groups.iter().map(|(id, members)| (*id, members.as_slice()))
    }

    /// Mentors left out of every group by the last grouping run.
    pub fn unassigned(&self) -> &[RecordKey] {
        &self.unassigned
    }

    /// Member count of the largest group (0 when there are no groups).
    pub fn max_group_size(&self) -> usize {
        self.groups.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Group containing `mentor`, if any.
    pub fn group_of(&self, mentor: &RecordKey) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(mentor))
            .map(|(id, _)| *id)
    }

    /// Every member must be a row of `mentors`.
    pub fn check_members(&self, mentors: &RecordTable) -> MatchResult<()> {
        for members in self.groups.values() {
            if let Some(unknown) = members.iter().find(|key| !mentors.contains(key)) {
                return Err(ConfigError::UnknownMentor(unknown.clone()).into());
            }
        }
        Ok(())
    }
}

/// Number of groups for a pool, or the configuration error that rules it out.
pub fn group_count(mentor_count: usize, group_size: usize) -> Result<usize, ConfigError> {
    if group_size == 0 {
        return Err(ConfigError::ZeroGroupSize);
    }
    match mentor_count / group_size {
        0 => Err(ConfigError::GroupSizeExceedsPool {
            group_size,
            mentors: mentor_count,
        }),
        n => Ok(n),
    }
}

/// Group mentors with an explicit clustering solver and configuration.
pub fn group_mentors_with<S, F>(
    mentors: &RecordTable,
    group_size: usize,
    compare: F,
    solver: &S,
    config: &ClusteringConfig,
) -> MatchResult<MentorGroups>
where
    S: ClusteringSolver,
    F: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
{
    let n_groups = group_count(mentors.len(), group_size)?;
    info!(
        mentors = mentors.len(),
        group_size, n_groups, "grouping mentors"
    );

    let matrix = mentor_matrix(mentors, compare)?;
    let clusters = solver.cluster(matrix.values(), n_groups, group_size, config)?;
    if clusters.len() != n_groups {
        return Err(SolverError::InvalidOutput(format!(
            "{} clusters returned, {} requested",
            clusters.len(),
            n_groups
        ))
        .into());
    }
    if let Some((id, members)) = clusters.iter().find(|(_, m)| m.len() != group_size) {
        return Err(SolverError::InvalidOutput(format!(
            "cluster {} has {} members, expected {}",
            id,
            members.len(),
            group_size
        ))
        .into());
    }
    let groups = MentorGroups::from_clusters(mentors, &clusters)?;

    if !groups.unassigned().is_empty() {
        warn!(
            count = groups.unassigned().len(),
            mentors = ?groups.unassigned(),
            "mentors left out of every group"
        );
    }
    info!(groups = groups.len(), "mentor grouping complete");
    Ok(groups)
}

/// Group mentors with the default balanced k-medoids solver
/// (10 iterations, tolerance 0.001).
pub fn group_mentors<F>(
    mentors: &RecordTable,
    group_size: usize,
    compare: F,
) -> MatchResult<MentorGroups>
where
    F: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
{
    group_mentors_with(
        mentors,
        group_size,
        compare,
        &BalancedKMedoids::new(),
        &ClusteringConfig::default(),
    )
}
