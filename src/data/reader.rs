//! Loading annotated matrices from disk.
//!
//! The QC engine only depends on the [`MatrixReader`] trait. [`TsvReader`]
//! handles a plain annotated-TSV layout:
//!
//! ```text
//! # comment
//! ^COL    Target      CRYBB2      RAF1
//! ^COL    SeqId       10000-28    10001-7
//! ^ROW    SampleId    SampleType  RowCheck
//! S1      Buffer      PASS        512.3       880.1
//! ```
//!
//! `^COL` lines carry one column field each, the `^ROW` line names the row
//! fields, and every following line holds the row field values followed by
//! one measurement per column.

use crate::data::annotated_matrix::AnnotatedMatrix;
use crate::data::metadata::{Axis, MetadataTable, MISSING_MARKERS};
use crate::error::{QcError, Result};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::path::Path;

const COL_MARKER: &str = "^COL";
const ROW_MARKER: &str = "^ROW";

/// Source of annotated matrices.
pub trait MatrixReader {
    /// Read the dataset at `path`.
    fn read(&self, path: &Path) -> Result<AnnotatedMatrix>;
}

/// Reader and writer for the annotated-TSV layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TsvReader;

impl TsvReader {
    /// Create a reader for the annotated-TSV layout.
    pub fn new() -> Self {
        Self
    }

    /// Write a matrix in the layout accepted by [`MatrixReader::read`].
    pub fn write<P: AsRef<Path>>(&self, matrix: &AnnotatedMatrix, path: P) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .quote_style(csv::QuoteStyle::Never)
            .from_path(path)?;

        let col_meta = matrix.metadata(Axis::Column);
        for field in col_meta.field_names() {
            let values = matrix.metadata_values(Axis::Column, field)?;
            let mut record = vec![COL_MARKER, field.as_str()];
            record.extend(values.iter().map(String::as_str));
            writer.write_record(&record)?;
        }

        let row_meta = matrix.metadata(Axis::Row);
        let mut header = vec![ROW_MARKER];
        header.extend(row_meta.field_names().iter().map(String::as_str));
        writer.write_record(&header)?;

        for row in 0..matrix.row_count() {
            let mut record: Vec<String> = Vec::with_capacity(row_meta.field_names().len() + matrix.column_count());
            for field in row_meta.field_names() {
                record.push(matrix.metadata_values(Axis::Row, field)?[row].clone());
            }
            for col in 0..matrix.column_count() {
                let value = matrix.value(row, col);
                record.push(if value.is_nan() {
                    "NA".to_string()
                } else {
                    value.to_string()
                });
            }
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl MatrixReader for TsvReader {
    fn read(&self, path: &Path) -> Result<AnnotatedMatrix> {
        let mut reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_path(path)?;

        let mut col_meta: Option<MetadataTable> = None;
        let mut row_fields: Option<Vec<String>> = None;
        let mut row_values: Vec<Vec<String>> = Vec::new();
        let mut measurements: Vec<Vec<f64>> = Vec::new();
        let mut n_cols: Option<usize> = None;

        for result in reader.records() {
            let record = result?;
            if is_blank(&record) || (row_fields.is_none() && is_comment(&record)) {
                continue;
            }
            match record.get(0) {
                Some(COL_MARKER) if row_fields.is_none() => {
                    let name = record.get(1).ok_or_else(|| {
                        QcError::EmptyData("Column field line without a field name".to_string())
                    })?;
                    let values: Vec<String> = record.iter().skip(2).map(str::to_string).collect();
                    check_width(&mut n_cols, values.len())?;
                    let table = col_meta.get_or_insert_with(|| MetadataTable::new(values.len()));
                    if table.has_field(name) {
                        return Err(duplicate_field(Axis::Column, name, path));
                    }
                    table.insert(name, values)?;
                }
                Some(ROW_MARKER) if row_fields.is_none() => {
                    row_fields = Some(record.iter().skip(1).map(str::to_string).collect());
                }
                _ => {
                    let fields = row_fields.as_ref().ok_or_else(|| {
                        QcError::EmptyData("Data line before the ^ROW header".to_string())
                    })?;
                    let n_meta = fields.len();
                    if record.len() < n_meta {
                        return Err(QcError::DimensionMismatch {
                            expected: n_meta,
                            actual: record.len(),
                        });
                    }
                    check_width(&mut n_cols, record.len() - n_meta)?;

                    let row_idx = measurements.len();
                    row_values.push(record.iter().take(n_meta).map(str::to_string).collect());
                    let values = record
                        .iter()
                        .skip(n_meta)
                        .enumerate()
                        .map(|(col_idx, raw)| parse_value(raw, row_idx, col_idx))
                        .collect::<Result<Vec<f64>>>()?;
                    measurements.push(values);
                }
            }
        }

        let fields = row_fields
            .ok_or_else(|| QcError::EmptyData(format!("No ^ROW header in {}", path.display())))?;
        let n_rows = measurements.len();
        let n_cols = n_cols.unwrap_or(0);

        let mut row_meta = MetadataTable::new(n_rows);
        for (field_idx, name) in fields.iter().enumerate() {
            if row_meta.has_field(name) {
                return Err(duplicate_field(Axis::Row, name, path));
            }
            let values = row_values.iter().map(|r| r[field_idx].clone()).collect();
            row_meta.insert(name.clone(), values)?;
        }
        let col_meta = col_meta.unwrap_or_else(|| MetadataTable::new(n_cols));

        AnnotatedMatrix::from_rows(&measurements, row_meta, col_meta)
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|f| f.trim().is_empty())
}

/// `#` lines are comments only in the header block; after `^ROW` a leading
/// `#` belongs to a row field value.
fn is_comment(record: &StringRecord) -> bool {
    record.get(0).is_some_and(|f| f.starts_with('#'))
}

fn duplicate_field(axis: Axis, name: &str, path: &Path) -> QcError {
    QcError::InvalidParameter(format!(
        "Duplicate {} field '{}' in {}",
        axis,
        name,
        path.display()
    ))
}

/// Enforce a single column count across all lines.
fn check_width(n_cols: &mut Option<usize>, width: usize) -> Result<()> {
    match n_cols {
        Some(expected) if *expected != width => Err(QcError::DimensionMismatch {
            expected: *expected,
            actual: width,
        }),
        Some(_) => Ok(()),
        None => {
            *n_cols = Some(width);
            Ok(())
        }
    }
}

fn parse_value(raw: &str, row: usize, col: usize) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || MISSING_MARKERS.contains(&trimmed) {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| QcError::InvalidValue {
        value: raw.to_string(),
        row,
        col,
    })
}
