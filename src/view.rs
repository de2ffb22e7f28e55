//! Result views
//!
//! Two denormalized projections of one [`AssignmentTable`]:
//! - [`ByMentorView`]: one row per mentor, one slot per round.
//! - [`ByMenteeView`]: one row per placed mentee, one slot per mentor of the
//!   largest group. Slots past the end of a smaller group are `None`.

use crate::assignment::AssignmentTable;
use crate::grouping::MentorGroups;
use crate::record::{GroupId, RecordKey, RecordTable};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByMentorRow {
    pub mentor: RecordKey,
    /// `None` for mentors outside every group
    pub group: Option<GroupId>,
    /// Mentee assigned in each round; all `None` for ungrouped mentors
    pub mentees: Vec<Option<RecordKey>>,
}

impl ByMentorRow {
    pub fn is_assigned(&self) -> bool {
        self.group.is_some()
    }
}

/// Assignments seen from each mentor, in mentor-table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByMentorView {
    pub rounds: usize,
    pub rows: Vec<ByMentorRow>,
}

impl ByMentorView {
    pub fn get(&self, mentor: &RecordKey) -> Option<&ByMentorRow> {
        self.rows.iter().find(|row| &row.mentor == mentor)
    }

    /// Mentors that belong to no group.
    pub fn unassigned(&self) -> impl Iterator<Item = &RecordKey> {
        self.rows
            .iter()
            .filter(|row| !row.is_assigned())
            .map(|row| &row.mentor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByMenteeRow {
    pub mentee: RecordKey,
    pub group: GroupId,
    pub round: usize,
    /// Mentors of the group, padded with `None` to the view width
    pub mentors: Vec<Option<RecordKey>>,
}

/// Assignments seen from each placed mentee, in mentee-table order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByMenteeView {
    /// Size of the largest mentor group
    pub width: usize,
    pub rows: Vec<ByMenteeRow>,
    /// Mentees not placed in any round
    pub unassigned: Vec<RecordKey>,
}

impl ByMenteeView {
    pub fn get(&self, mentee: &RecordKey) -> Option<&ByMenteeRow> {
        self.rows.iter().find(|row| &row.mentee == mentee)
    }
}

pub fn by_mentor(
    mentors: &RecordTable,
    groups: &MentorGroups,
    assignments: &AssignmentTable,
) -> ByMentorView {
    let membership: HashMap<&RecordKey, GroupId> = groups
        .iter()
        .flat_map(|(id, members)| members.iter().map(move |m| (m, id)))
        .collect();
    let rounds = assignments.rounds();

    let rows = mentors
        .keys()
        .map(|mentor| {
            let assigned = membership
                .get(mentor)
                .and_then(|&id| assignments.get(id).map(|row| (id, row)));
            match assigned {
                Some((id, row)) => ByMentorRow {
                    mentor: mentor.clone(),
                    group: Some(id),
                    mentees: row.iter().cloned().map(Some).collect(),
                },
                None => ByMentorRow {
                    mentor: mentor.clone(),
                    group: None,
                    mentees: vec![None; rounds],
                },
            }
        })
        .collect();

    ByMentorView { rounds, rows }
}

pub fn by_mentee(
    mentees: &RecordTable,
    groups: &MentorGroups,
    assignments: &AssignmentTable,
) -> ByMenteeView {
    let width = groups.max_group_size();
    let placements = assignments.placements();

    let mut rows = Vec::with_capacity(placements.len());
    let mut unassigned = Vec::new();
    for mentee in mentees.keys() {
        let Some(&(group, round)) = placements.get(mentee) else {
            unassigned.push(mentee.clone());
            continue;
        };
        let mut mentors: Vec<Option<RecordKey>> = groups
            .get(group)
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(Some)
            .collect();
        mentors.resize(width, None);

        rows.push(ByMenteeRow {
            mentee: mentee.clone(),
            group,
            round,
            mentors,
        });
    }

    ByMenteeView {
        width,
        rows,
        unassigned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{Placement, RoundMatching};
    use crate::record::Record;

    fn keys(prefix: &str, n: usize) -> RecordTable {
        RecordTable::from_records((0..n).map(|i| Record::new(format!("{}{}", prefix, i)))).unwrap()
    }

    fn placement(group: usize, mentee: &str, column: usize) -> Placement {
        Placement {
            group: GroupId(group),
            mentee: mentee.into(),
            column,
            cost: 0.0,
        }
    }

    /// Groups {m0, m1, m2} and {m3, m4}; m5 ungrouped. Two rounds.
    fn fixture() -> (RecordTable, RecordTable, MentorGroups, AssignmentTable) {
        let mentors = keys("m", 6);
        let mentees = keys("e", 5);
        let groups = MentorGroups::new(vec![
            vec!["m0".into(), "m1".into(), "m2".into()],
            vec!["m3".into(), "m4".into()],
        ])
        .unwrap();
        let rounds = vec![
            RoundMatching {
                round: 0,
                placements: vec![placement(0, "e3", 3), placement(1, "e0", 0)],
            },
            RoundMatching {
                round: 1,
                placements: vec![placement(0, "e1", 1), placement(1, "e4", 4)],
            },
        ];
        let assignments = AssignmentTable::from_rounds(&[GroupId(0), GroupId(1)], &rounds).unwrap();
        (mentors, mentees, groups, assignments)
    }

    #[test]
    fn test_by_mentor_copies_group_rows() {
        let (mentors, _, groups, assignments) = fixture();
        let view = by_mentor(&mentors, &groups, &assignments);

        assert_eq!(view.rows.len(), 6);
        let m1 = view.get(&"m1".into()).unwrap();
        assert_eq!(m1.group, Some(GroupId(0)));
        assert_eq!(m1.mentees, vec![Some("e3".into()), Some("e1".into())]);

        let m4 = view.get(&"m4".into()).unwrap();
        assert_eq!(m4.mentees, vec![Some("e0".into()), Some("e4".into())]);

        let m5 = view.get(&"m5".into()).unwrap();
        assert!(!m5.is_assigned());
        assert_eq!(m5.mentees, vec![None, None]);
        assert_eq!(view.unassigned().collect::<Vec<_>>(), vec![&RecordKey::from("m5")]);
    }

    #[test]
    fn test_by_mentee_pads_smaller_groups() {
        let (_, mentees, groups, assignments) = fixture();
        let view = by_mentee(&mentees, &groups, &assignments);

        assert_eq!(view.width, 3);
        assert!(view.rows.iter().all(|row| row.mentors.len() == 3));

        let e0 = view.get(&"e0".into()).unwrap();
        assert_eq!(e0.group, GroupId(1));
        assert_eq!(e0.round, 0);
        assert_eq!(e0.mentors, vec![Some("m3".into()), Some("m4".into()), None]);

        let e1 = view.get(&"e1".into()).unwrap();
        assert_eq!(e1.round, 1);
        assert_eq!(
            e1.mentors,
            vec![Some("m0".into()), Some("m1".into()), Some("m2".into())]
        );

        assert_eq!(view.unassigned, vec![RecordKey::from("e2")]);
    }

    #[test]
    fn test_rows_follow_table_order() {
        let (_, mentees, groups, assignments) = fixture();
        let view = by_mentee(&mentees, &groups, &assignments);
        let order: Vec<&str> = view.rows.iter().map(|r| r.mentee.as_str()).collect();
        assert_eq!(order, vec!["e0", "e1", "e3", "e4"]);
    }
}
