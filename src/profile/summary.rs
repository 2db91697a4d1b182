//! Per-target descriptive statistics over a row subset.

use crate::data::{AnnotatedMatrix, Axis};
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Descriptive statistics of one column.
///
/// `None` marks an undefined statistic (no usable values, a single value for
/// the standard deviation, or a zero mean for the CV). All fields are computed
/// from the same set of non-missing values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    /// Number of non-missing values used.
    pub n: usize,
    pub min: Option<f64>,
    /// 25th percentile.
    pub q1: Option<f64>,
    pub median: Option<f64>,
    pub mean: Option<f64>,
    /// 75th percentile.
    pub q3: Option<f64>,
    pub max: Option<f64>,
    /// Sample standard deviation (N-1 denominator).
    pub std: Option<f64>,
    /// Coefficient of variation, `std / |mean|`.
    pub cv: Option<f64>,
}

impl ColumnSummary {
    /// Summary of a column with no usable values.
    pub fn undefined() -> Self {
        Self {
            n: 0,
            min: None,
            q1: None,
            median: None,
            mean: None,
            q3: None,
            max: None,
            std: None,
            cv: None,
        }
    }
}

impl std::fmt::Display for ColumnSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "n={} min={} q1={} mean={} median={} q3={} max={} std={} cv={}",
            self.n,
            fmt_stat(self.min),
            fmt_stat(self.q1),
            fmt_stat(self.mean),
            fmt_stat(self.median),
            fmt_stat(self.q3),
            fmt_stat(self.max),
            fmt_stat(self.std),
            fmt_stat(self.cv),
        )
    }
}

/// Render a statistic, undefined as `NA`.
pub fn fmt_stat(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "NA".to_string(),
    }
}

fn defined(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value)
    }
}

/// Quantile by linear interpolation between order statistics.
///
/// `sorted` must be ascending and free of NaN. An interpolation that is not
/// a number (between infinities of opposite sign) is undefined.
pub fn quantile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return defined(sorted[lo]);
    }
    defined(sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo]))
}

/// Summarize one column.
///
/// Missing (`NaN`) and infinite values are dropped first, so `n` counts the
/// finite values every statistic is computed from.
pub fn summarize_column(values: &[f64]) -> ColumnSummary {
    let mut clean: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if clean.is_empty() {
        return ColumnSummary::undefined();
    }
    clean.sort_by(|a, b| a.total_cmp(b));

    let mean = defined(clean.iter().mean());
    let std = defined(clean.iter().std_dev());
    let cv = match (std, mean) {
        (Some(s), Some(m)) if m != 0.0 => Some(s / m.abs()),
        _ => None,
    };

    ColumnSummary {
        n: clean.len(),
        min: clean.first().copied(),
        q1: quantile(&clean, 0.25),
        median: quantile(&clean, 0.5),
        mean,
        q3: quantile(&clean, 0.75),
        max: clean.last().copied(),
        std,
        cv,
    }
}

/// Per-column summaries keyed by a column identity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Column field the identities come from.
    pub id_field: String,
    /// Column identities in column order.
    pub ids: Vec<String>,
    /// Summaries aligned with `ids`.
    pub summaries: Vec<ColumnSummary>,
}

impl SummaryTable {
    /// Number of summarized columns.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when no columns were summarized.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Summary of the first column with identity `id`.
    pub fn get(&self, id: &str) -> Option<&ColumnSummary> {
        self.ids
            .iter()
            .position(|i| i == id)
            .map(|idx| &self.summaries[idx])
    }

    /// Iterate over `(id, summary)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ColumnSummary)> {
        self.ids.iter().map(String::as_str).zip(self.summaries.iter())
    }

    /// CV of every column, in column order.
    pub fn cv_values(&self) -> Vec<Option<f64>> {
        self.summaries.iter().map(|s| s.cv).collect()
    }

    /// Write the table to a TSV file, undefined values as `NA`.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(
            writer,
            "{}\tn\tmin\tq1\tmedian\tmean\tq3\tmax\tstd\tcv",
            self.id_field
        )?;
        for (id, s) in self.iter() {
            let stats = [s.min, s.q1, s.median, s.mean, s.q3, s.max, s.std, s.cv];
            write!(writer, "{}\t{}", id, s.n)?;
            for stat in stats {
                match stat {
                    Some(v) => write!(writer, "\t{}", v)?,
                    None => write!(writer, "\tNA")?,
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

/// Summarize every column of `matrix` over all of its rows.
///
/// Columns are identified by the column metadata field `id_field`.
pub fn summarize_columns(matrix: &AnnotatedMatrix, id_field: &str) -> Result<SummaryTable> {
    let ids = matrix.metadata_values(Axis::Column, id_field)?.to_vec();

    let summaries: Vec<ColumnSummary> = (0..matrix.column_count())
        .into_par_iter()
        .map(|col| summarize_column(&matrix.column_values(col)))
        .collect();

    Ok(SummaryTable {
        id_field: id_field.to_string(),
        ids,
        summaries,
    })
}
