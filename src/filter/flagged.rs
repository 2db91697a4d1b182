//! Extraction of rows flagged by the upstream row check.

use crate::data::{AnnotatedMatrix, Axis};
use crate::error::Result;
use crate::filter::select::{matching_indices, select_where};
use serde::{Deserialize, Serialize};

/// Rows whose flag field equals the sentinel.
///
/// Zero flagged rows is the common case and yields an empty-row matrix.
pub fn extract_flagged(
    matrix: &AnnotatedMatrix,
    flag_field: &str,
    sentinel: &str,
) -> Result<AnnotatedMatrix> {
    select_where(matrix, Axis::Row, flag_field, &[sentinel])
}

/// Summary of flagged rows in a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagReport {
    /// Row field holding the check result.
    pub field: String,
    /// Value marking a failed check.
    pub sentinel: String,
    /// Number of flagged rows.
    pub n_flagged: usize,
    /// 0-based positions of the flagged rows.
    pub row_indices: Vec<usize>,
    /// Identifiers of the flagged rows, aligned with `row_indices`.
    pub sample_ids: Vec<String>,
}

impl FlagReport {
    /// True when no row is flagged.
    pub fn is_clean(&self) -> bool {
        self.n_flagged == 0
    }
}

impl std::fmt::Display for FlagReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} rows with {} = {}", self.n_flagged, self.field, self.sentinel)?;
        if !self.sample_ids.is_empty() {
            write!(f, ": {}", self.sample_ids.join(", "))?;
        }
        Ok(())
    }
}

/// Count flagged rows and collect their identifiers from `id_field`.
pub fn report_flagged(
    matrix: &AnnotatedMatrix,
    flag_field: &str,
    sentinel: &str,
    id_field: &str,
) -> Result<FlagReport> {
    let ids = matrix.metadata_values(Axis::Row, id_field)?;
    let row_indices = matching_indices(matrix, Axis::Row, flag_field, &[sentinel])?;
    let sample_ids = row_indices.iter().map(|&i| ids[i].clone()).collect();

    Ok(FlagReport {
        field: flag_field.to_string(),
        sentinel: sentinel.to_string(),
        n_flagged: row_indices.len(),
        row_indices,
        sample_ids,
    })
}
