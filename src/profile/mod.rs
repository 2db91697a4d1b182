//! Profiling primitives: duplicate audits, descriptive statistics and CV calls.

mod cv;
mod duplicates;
mod summary;

pub use cv::{classify_cv, CvClassification, ThresholdCount, DEFAULT_CV_THRESHOLDS};
pub use duplicates::{
    audit_duplicates, count_values, profile_sample_types, DuplicateReport, ValueCount, ValueCounts,
};
pub use summary::{fmt_stat, quantile, summarize_column, summarize_columns, ColumnSummary, SummaryTable};
