//! Pipeline entry points
//!
//! [`Matcher`] runs mentor grouping, round-robin assignment and view
//! projection with pluggable solvers. The free functions [`group_mentors`],
//! [`assign_mentees`] and [`match_mentees`] use the default solvers.

use crate::assignment::{assign_rounds, AssignmentTable};
use crate::config::MatchConfig;
use crate::error::{ComparisonError, MatchResult};
use crate::grouping::{self, MentorGroups};
use crate::record::{Record, RecordTable};
use crate::view::{by_mentee, by_mentor, ByMenteeView, ByMentorView};
use manytomany_solvers::{
    AssignmentSolver, BalancedKMedoids, ClusteringSolver, HungarianSolver,
};
use serde::Serialize;

/// Result of assigning mentees to an existing set of mentor groups
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchOutcome {
    pub assignments: AssignmentTable,
    pub by_mentor: ByMentorView,
    pub by_mentee: ByMenteeView,
}

/// Result of a full run: the groups plus everything in [`MatchOutcome`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub groups: MentorGroups,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
}

impl MatchReport {
    pub fn by_mentor(&self) -> &ByMentorView {
        &self.outcome.by_mentor
    }

    pub fn by_mentee(&self) -> &ByMenteeView {
        &self.outcome.by_mentee
    }
}

pub struct Matcher<C = BalancedKMedoids, A = HungarianSolver> {
    config: MatchConfig,
    clustering: C,
    assignment: A,
}

impl Matcher {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            clustering: BalancedKMedoids::new(),
            assignment: HungarianSolver::new(),
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl<C, A> Matcher<C, A>
where
    C: ClusteringSolver,
    A: AssignmentSolver,
{
    pub fn with_clustering_solver<C2: ClusteringSolver>(self, clustering: C2) -> Matcher<C2, A> {
        Matcher {
            config: self.config,
            clustering,
            assignment: self.assignment,
        }
    }

    pub fn with_assignment_solver<A2: AssignmentSolver>(self, assignment: A2) -> Matcher<C, A2> {
        Matcher {
            config: self.config,
            clustering: self.clustering,
            assignment,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Partition mentors into groups of `mentors_per_group`.
    pub fn group_mentors<F>(&self, mentors: &RecordTable, compare: F) -> MatchResult<MentorGroups>
    where
        F: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
    {
        self.config.validate()?;
        grouping::group_mentors_with(
            mentors,
            self.config.mentors_per_group,
            compare,
            &self.clustering,
            &self.config.clustering,
        )
    }

    /// Assign `mentees_per_mentor` mentees to every group and project both views.
    pub fn assign_mentees<F>(
        &self,
        mentors: &RecordTable,
        mentees: &RecordTable,
        groups: &MentorGroups,
        compare: F,
    ) -> MatchResult<MatchOutcome>
    where
        F: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
    {
        self.config.validate()?;
        let assignments = assign_rounds(
            mentors,
            mentees,
            groups,
            self.config.mentees_per_mentor,
            compare,
            &self.assignment,
        )?;
        Ok(MatchOutcome {
            by_mentor: by_mentor(mentors, groups, &assignments),
            by_mentee: by_mentee(mentees, groups, &assignments),
            assignments,
        })
    }

    /// Group mentors, then assign mentees to the groups.
    pub fn run<G, P>(
        &self,
        mentors: &RecordTable,
        mentees: &RecordTable,
        group_similarity: G,
        mentor_similarity: P,
    ) -> MatchResult<MatchReport>
    where
        G: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
        P: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
    {
        let groups = self.group_mentors(mentors, mentor_similarity)?;
        let outcome = self.assign_mentees(mentors, mentees, &groups, group_similarity)?;
        Ok(MatchReport { groups, outcome })
    }
}

/// Group mentors with the default solver.
pub fn group_mentors<F>(
    mentors: &RecordTable,
    group_size: usize,
    mentor_similarity: F,
) -> MatchResult<MentorGroups>
where
    F: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
{
    grouping::group_mentors(mentors, group_size, mentor_similarity)
}

/// Assign mentees to existing groups over `rounds` rounds with the default solver.
pub fn assign_mentees<F>(
    mentors: &RecordTable,
    mentees: &RecordTable,
    groups: &MentorGroups,
    rounds: usize,
    group_similarity: F,
) -> MatchResult<(ByMentorView, ByMenteeView)>
where
    F: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
{
    let assignments = assign_rounds(
        mentors,
        mentees,
        groups,
        rounds,
        group_similarity,
        &HungarianSolver::new(),
    )?;
    Ok((
        by_mentor(mentors, groups, &assignments),
        by_mentee(mentees, groups, &assignments),
    ))
}

/// Group mentors into groups of `group_size`, then run `rounds` assignment rounds.
pub fn match_mentees<G, P>(
    mentors: &RecordTable,
    mentees: &RecordTable,
    group_size: usize,
    rounds: usize,
    group_similarity: G,
    mentor_similarity: P,
) -> MatchResult<(ByMentorView, ByMenteeView)>
where
    G: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
    P: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
{
    let groups = group_mentors(mentors, group_size, mentor_similarity)?;
    assign_mentees(mentors, mentees, &groups, rounds, group_similarity)
}
