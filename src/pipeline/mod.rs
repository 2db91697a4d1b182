//! QC pipeline: configuration, single-dataset runs and batch processing.

pub mod batch;
pub mod config;
pub mod reporter;
pub mod runner;

pub use batch::{discover_files, run_batch, BatchFailure, BatchOutcome};
pub use config::QcConfig;
pub use reporter::{QcReporter, TracingReporter};
pub use runner::{run_qc, CalibrationSummary, QcReport, ReferenceReport, TargetCv};
