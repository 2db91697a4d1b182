//! Metadata-driven selection of rows and columns.
//!
//! Every selector returns a new [`AnnotatedMatrix`] holding the retained
//! positions in their original relative order. A predicate that matches
//! nothing yields an empty matrix, never an error.

use crate::data::{is_present, AnnotatedMatrix, Axis};
use crate::error::{QcError, Result};
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Condition a metadata value must satisfy in [`select_fields`].
#[derive(Debug, Clone)]
pub enum FieldCondition {
    /// Value is non-empty and not a missing marker.
    Present,
    /// Value equals the given token.
    Equals(String),
    /// Value matches the pattern.
    Matches(Regex),
}

impl FieldCondition {
    /// Check a single metadata value.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            FieldCondition::Present => is_present(value),
            FieldCondition::Equals(expected) => value == expected,
            FieldCondition::Matches(re) => re.is_match(value),
        }
    }
}

/// Positions along `axis` whose `field` value is one of `values`.
pub fn matching_indices<S: AsRef<str>>(
    matrix: &AnnotatedMatrix,
    axis: Axis,
    field: &str,
    values: &[S],
) -> Result<Vec<usize>> {
    let wanted: HashSet<&str> = values.iter().map(|v| v.as_ref()).collect();
    let meta = matrix.metadata_values(axis, field)?;
    Ok(meta
        .iter()
        .enumerate()
        .filter(|(_, v)| wanted.contains(v.as_str()))
        .map(|(i, _)| i)
        .collect())
}

/// Keep rows/columns whose `field` value is a member of `allowed`.
///
/// # Arguments
/// * `matrix` - The matrix to subset
/// * `axis` - Select rows or columns
/// * `field` - Metadata field on that axis
/// * `allowed` - Accepted values; an empty set selects nothing
pub fn select_where<S: AsRef<str>>(
    matrix: &AnnotatedMatrix,
    axis: Axis,
    field: &str,
    allowed: &[S],
) -> Result<AnnotatedMatrix> {
    let keep = matching_indices(matrix, axis, field, allowed)?;
    subset_logged(matrix, axis, field, &keep)
}

/// Keep rows/columns whose `field` value is not a member of `excluded`.
///
/// Complement of [`select_where`]. An empty `excluded` set excludes
/// every position and yields an empty matrix.
pub fn exclude_where<S: AsRef<str>>(
    matrix: &AnnotatedMatrix,
    axis: Axis,
    field: &str,
    excluded: &[S],
) -> Result<AnnotatedMatrix> {
    let keep = if excluded.is_empty() {
        // Validate the field even though nothing is kept.
        matrix.metadata_values(axis, field)?;
        Vec::new()
    } else {
        let dropped: HashSet<usize> = matching_indices(matrix, axis, field, excluded)?
            .into_iter()
            .collect();
        (0..axis_len(matrix, axis))
            .filter(|i| !dropped.contains(i))
            .collect()
    };
    subset_logged(matrix, axis, field, &keep)
}

/// Keep rows/columns where every field in `fields` satisfies `condition`.
///
/// Typical use is picking target columns that carry a sequence identifier:
/// `select_fields(&m, Axis::Column, &["SeqId"], &FieldCondition::Present)`.
pub fn select_fields(
    matrix: &AnnotatedMatrix,
    axis: Axis,
    fields: &[&str],
    condition: &FieldCondition,
) -> Result<AnnotatedMatrix> {
    if fields.is_empty() {
        return Err(QcError::InvalidParameter(
            "select_fields requires at least one field".to_string(),
        ));
    }
    let columns = fields
        .iter()
        .map(|f| matrix.metadata_values(axis, f))
        .collect::<Result<Vec<_>>>()?;

    let keep: Vec<usize> = (0..axis_len(matrix, axis))
        .filter(|&i| columns.iter().all(|values| condition.accepts(&values[i])))
        .collect();

    subset_logged(matrix, axis, &fields.join(","), &keep)
}

fn axis_len(matrix: &AnnotatedMatrix, axis: Axis) -> usize {
    match axis {
        Axis::Row => matrix.row_count(),
        Axis::Column => matrix.column_count(),
    }
}

fn subset_logged(
    matrix: &AnnotatedMatrix,
    axis: Axis,
    field: &str,
    keep: &[usize],
) -> Result<AnnotatedMatrix> {
    if keep.is_empty() {
        warn!(%axis, field, "selection matched no positions");
    } else {
        debug!(%axis, field, kept = keep.len(), total = axis_len(matrix, axis), "selection");
    }
    matrix.subset(axis, keep)
}
