//! Dense similarity matrices over record keys
//!
//! A [`SimilarityMatrix`] pairs an `ndarray` cost matrix with the keys of its
//! rows and columns, so solver output (plain indices) can always be mapped back
//! to records. Values are distances: smaller means more similar.
//!
//! Comparison functions are plain closures:
//! - pairwise: `Fn(&Record, &Record) -> Result<f64, ComparisonError>`
//! - group-wise: `Fn(&[&Record], &Record) -> Result<f64, ComparisonError>`
//!
//! Errors returned by a comparison abort the build and reach the caller as
//! [`MatchError::Comparison`] with the original error inside.

use crate::error::{ComparisonError, ConfigError, MatchError, MatchResult};
use crate::grouping::MentorGroups;
use crate::record::{GroupId, Record, RecordKey, RecordTable};
use ndarray::{Array2, ArrayView2, Axis};

/// Cost matrix keyed by row and column identifiers
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix<R, C> {
    row_keys: Vec<R>,
    col_keys: Vec<C>,
    values: Array2<f64>,
}

impl<R, C> SimilarityMatrix<R, C> {
    /// Evaluate `cell(row, col)` once for every cell of the cross product.
    pub fn build<F>(row_keys: Vec<R>, col_keys: Vec<C>, mut cell: F) -> MatchResult<Self>
    where
        F: FnMut(usize, usize) -> Result<f64, ComparisonError>,
    {
        let (rows, cols) = (row_keys.len(), col_keys.len());
        let mut values = Array2::<f64>::zeros((rows, cols));
        for r in 0..rows {
            for c in 0..cols {
                values[[r, c]] = cell(r, c).map_err(MatchError::Comparison)?;
            }
        }
        Ok(Self {
            row_keys,
            col_keys,
            values,
        })
    }

    pub fn row_keys(&self) -> &[R] {
        &self.row_keys
    }

    pub fn col_keys(&self) -> &[C] {
        &self.col_keys
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    /// Copy of the matrix restricted to the given columns, in the given order.
    /// Column `i` of the result is column `columns[i]` of `self`.
    pub fn select_columns(&self, columns: &[usize]) -> Array2<f64> {
        self.values.select(Axis(1), columns)
    }
}

/// Mentor x mentor distances with `+inf` on the diagonal.
///
/// The comparison is never invoked on a self-pair, so nothing it could return
/// for one can influence grouping.
pub fn mentor_matrix<F>(
    mentors: &RecordTable,
    compare: F,
) -> MatchResult<SimilarityMatrix<RecordKey, RecordKey>>
where
    F: Fn(&Record, &Record) -> Result<f64, ComparisonError>,
{
    let keys: Vec<RecordKey> = mentors.keys().cloned().collect();
    let records: Vec<&Record> = mentors.iter().collect();
    SimilarityMatrix::build(keys.clone(), keys, |r, c| {
        if r == c {
            Ok(f64::INFINITY)
        } else {
            compare(records[r], records[c])
        }
    })
}

/// Group x mentee affinities. Each row's payload is the list of mentor
/// records in that group, in group order. Every group member must be a row
/// of `mentors`.
pub fn group_matrix<F>(
    mentors: &RecordTable,
    groups: &MentorGroups,
    mentees: &RecordTable,
    compare: F,
) -> MatchResult<SimilarityMatrix<GroupId, RecordKey>>
where
    F: Fn(&[&Record], &Record) -> Result<f64, ComparisonError>,
{
    let payloads = groups
        .iter()
        .map(|(_, members)| {
            members
                .iter()
                .map(|key| {
                    mentors
                        .get(key)
                        .ok_or_else(|| ConfigError::UnknownMentor(key.clone()))
                })
                .collect::<Result<Vec<&Record>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let mentee_records: Vec<&Record> = mentees.iter().collect();

    SimilarityMatrix::build(
        groups.ids().collect(),
        mentees.keys().cloned().collect(),
        |r, c| compare(payloads[r].as_slice(), mentee_records[c]),
    )
}

/// Adapt a comparison that cannot fail.
pub fn infallible_pairwise<F>(f: F) -> impl Fn(&Record, &Record) -> Result<f64, ComparisonError>
where
    F: Fn(&Record, &Record) -> f64,
{
    move |a, b| Ok(f(a, b))
}

/// Adapt a group comparison that cannot fail.
pub fn infallible_group<F>(f: F) -> impl Fn(&[&Record], &Record) -> Result<f64, ComparisonError>
where
    F: Fn(&[&Record], &Record) -> f64,
{
    move |group, mentee| Ok(f(group, mentee))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn people(names: &[(&str, i64)]) -> RecordTable {
        RecordTable::from_records(
            names
                .iter()
                .map(|(name, age)| Record::new(*name).with("age", *age)),
        )
        .unwrap()
    }

    fn age_gap(a: &Record, b: &Record) -> Result<f64, ComparisonError> {
        let a = a.get("age").and_then(|v| v.as_number()).ok_or("missing age")?;
        let b = b.get("age").and_then(|v| v.as_number()).ok_or("missing age")?;
        Ok((a - b).abs())
    }

    #[test]
    fn test_mentor_matrix_diagonal_is_infinite() {
        let mentors = people(&[("a", 30), ("b", 35), ("c", 50)]);
        let matrix = mentor_matrix(&mentors, age_gap).unwrap();

        assert_eq!(matrix.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), f64::INFINITY);
        }
        assert_eq!(matrix.get(0, 1), 5.0);
        assert_eq!(matrix.get(2, 0), 20.0);
        assert_eq!(matrix.row_keys()[2].as_str(), "c");
    }

    #[test]
    fn test_comparison_invoked_once_per_off_diagonal_cell() {
        let mentors = people(&[("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        let calls = Cell::new(0usize);
        mentor_matrix(&mentors, |a: &Record, b: &Record| {
            calls.set(calls.get() + 1);
            assert_ne!(a.key, b.key, "self-pair compared");
            Ok(0.0)
        })
        .unwrap();
        assert_eq!(calls.get(), 12);
    }

    #[test]
    fn test_comparison_error_propagates() {
        let mentors = RecordTable::from_records(vec![
            Record::new("a").with("age", 1i64),
            Record::new("b"),
        ])
        .unwrap();
        let err = mentor_matrix(&mentors, age_gap).unwrap_err();
        assert!(matches!(err, MatchError::Comparison(_)));
        assert_eq!(err.to_string(), "missing age");
    }

    #[test]
    fn test_group_matrix_payloads() {
        let mentors = people(&[("m0", 30), ("m1", 40), ("m2", 50), ("m3", 60)]);
        let mentees = people(&[("e0", 20), ("e1", 70)]);
        let groups = MentorGroups::new(vec![
            vec!["m0".into(), "m1".into()],
            vec!["m2".into(), "m3".into()],
        ])
        .unwrap();

        let mean_gap = infallible_group(|group: &[&Record], mentee: &Record| {
            let target = mentee.get("age").and_then(|v| v.as_number()).unwrap_or(0.0);
            let total: f64 = group
                .iter()
                .filter_map(|m| m.get("age").and_then(|v| v.as_number()))
                .map(|age| (age - target).abs())
                .sum();
            total / group.len() as f64
        });

        let matrix = group_matrix(&mentors, &groups, &mentees, mean_gap).unwrap();
        assert_eq!(matrix.shape(), (2, 2));
        assert_eq!(matrix.row_keys(), &[GroupId(0), GroupId(1)]);
        assert_eq!(matrix.get(0, 0), 15.0);
        assert_eq!(matrix.get(1, 1), 15.0);
        assert_eq!(matrix.get(0, 1), 35.0);
    }

    #[test]
    fn test_select_columns() {
        let matrix = SimilarityMatrix::build(vec![0, 1], vec!['a', 'b', 'c'], |r, c| {
            Ok((r * 10 + c) as f64)
        })
        .unwrap();
        let view = matrix.select_columns(&[2, 0]);
        assert_eq!(view.dim(), (2, 2));
        assert_eq!(view[[0, 0]], 2.0);
        assert_eq!(view[[1, 1]], 10.0);
    }

    #[test]
    fn test_group_matrix_rejects_unknown_member() {
        let mentors = people(&[("m0", 30), ("m1", 40)]);
        let mentees = people(&[("e0", 20)]);
        let groups = MentorGroups::new(vec![vec!["m0".into(), "ghost".into()]]).unwrap();

        let err = group_matrix(&mentors, &groups, &mentees, infallible_group(|_, _| 0.0))
            .unwrap_err();
        assert_eq!(
            err.as_config(),
            Some(&ConfigError::UnknownMentor(RecordKey::from("ghost")))
        );
    }
}
