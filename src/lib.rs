//! SomaLogic Quality-Control Library
//!
//! This library audits proteomic assay datasets stored as annotated
//! matrices: samples as rows, measured targets as columns, with named
//! metadata fields on both axes.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (AnnotatedMatrix, MetadataTable, readers)
//! - **filter**: Metadata-driven row/column selection and flagged-row extraction
//! - **profile**: Duplicate audits, descriptive statistics, CV classification
//! - **pipeline**: QC configuration, single-dataset runs and batch processing
//!
//! # Example
//!
//! ```no_run
//! use somalogic_qc::prelude::*;
//! use std::path::Path;
//!
//! let matrix = TsvReader::new().read(Path::new("plate1.tsv")).unwrap();
//! let report = run_qc(&matrix, &QcConfig::default(), "plate1.tsv").unwrap();
//!
//! println!("{}", report);
//! ```

pub mod data;
pub mod error;
pub mod filter;
pub mod pipeline;
pub mod profile;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::data::{AnnotatedMatrix, Axis, MatrixReader, MetadataTable, TsvReader};
    pub use crate::error::{QcError, Result};
    pub use crate::filter::{
        exclude_where, extract_flagged, report_flagged, select_fields, select_where,
        FieldCondition, FlagReport,
    };
    pub use crate::pipeline::{
        discover_files, run_batch, run_qc, BatchOutcome, QcConfig, QcReport, QcReporter,
        TracingReporter,
    };
    pub use crate::profile::{
        audit_duplicates, classify_cv, count_values, profile_sample_types, summarize_column,
        summarize_columns, ColumnSummary, CvClassification, DuplicateReport, SummaryTable,
        ValueCounts,
    };
}
