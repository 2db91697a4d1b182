//! Annotated matrix: numeric measurements with row and column metadata.

use crate::data::metadata::{Axis, MetadataTable};
use crate::error::{QcError, Result};
use nalgebra::DMatrix;

/// A dense matrix of measurements with named metadata on both axes.
///
/// Rows represent samples, columns represent measured targets.
/// Missing measurements are stored as `NaN`. The matrix is never modified
/// after construction; subsetting returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedMatrix {
    /// Measurements (samples × targets).
    values: DMatrix<f64>,
    /// One entry per row.
    row_meta: MetadataTable,
    /// One entry per column.
    col_meta: MetadataTable,
}

impl AnnotatedMatrix {
    /// Create a new AnnotatedMatrix, checking that metadata aligns with the values.
    pub fn new(
        values: DMatrix<f64>,
        row_meta: MetadataTable,
        col_meta: MetadataTable,
    ) -> Result<Self> {
        let (nrows, ncols) = values.shape();
        if nrows != row_meta.len() {
            return Err(QcError::DimensionMismatch {
                expected: nrows,
                actual: row_meta.len(),
            });
        }
        if ncols != col_meta.len() {
            return Err(QcError::DimensionMismatch {
                expected: ncols,
                actual: col_meta.len(),
            });
        }
        Ok(Self {
            values,
            row_meta,
            col_meta,
        })
    }

    /// Build from row-major values.
    pub fn from_rows(
        rows: &[Vec<f64>],
        row_meta: MetadataTable,
        col_meta: MetadataTable,
    ) -> Result<Self> {
        let ncols = col_meta.len();
        if let Some(bad) = rows.iter().find(|r| r.len() != ncols) {
            return Err(QcError::DimensionMismatch {
                expected: ncols,
                actual: bad.len(),
            });
        }
        let values = DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]);
        Self::new(values, row_meta, col_meta)
    }

    /// Number of rows (samples).
    #[inline]
    pub fn row_count(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns (targets).
    #[inline]
    pub fn column_count(&self) -> usize {
        self.values.ncols()
    }

    /// Get the value at (row, col).
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// All values of one column, missing entries included as `NaN`.
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        self.values.column(col).iter().copied().collect()
    }

    /// Metadata table of an axis.
    pub fn metadata(&self, axis: Axis) -> &MetadataTable {
        match axis {
            Axis::Row => &self.row_meta,
            Axis::Column => &self.col_meta,
        }
    }

    /// Check if a field exists on an axis.
    pub fn has_field(&self, axis: Axis, field: &str) -> bool {
        self.metadata(axis).has_field(field)
    }

    /// Values of a metadata field, aligned with the positions along `axis`.
    pub fn metadata_values(&self, axis: Axis, field: &str) -> Result<&[String]> {
        self.metadata(axis)
            .field(field)
            .ok_or_else(|| QcError::unknown_field(axis, field))
    }

    /// Keep only the given rows or columns (by index), in the given order.
    pub fn subset(&self, axis: Axis, indices: &[usize]) -> Result<Self> {
        match axis {
            Axis::Row => self.subset_rows(indices),
            Axis::Column => self.subset_columns(indices),
        }
    }

    /// Subset the matrix to include only specified rows (by index).
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let row_meta = self.row_meta.subset(indices)?;
        let values = self.values.select_rows(indices.iter());
        Self::new(values, row_meta, self.col_meta.clone())
    }

    /// Subset the matrix to include only specified columns (by index).
    pub fn subset_columns(&self, indices: &[usize]) -> Result<Self> {
        let col_meta = self.col_meta.subset(indices)?;
        let values = self.values.select_columns(indices.iter());
        Self::new(values, self.row_meta.clone(), col_meta)
    }
}
