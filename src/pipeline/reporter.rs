//! Progress reporting for batch QC runs.

use crate::error::QcError;
use crate::pipeline::runner::QcReport;
use std::path::Path;
use tracing::{error, info, warn};

/// Receives per-dataset events during a batch run.
pub trait QcReporter {
    /// A dataset is about to be read.
    fn dataset_started(&mut self, _path: &Path) {}

    /// A dataset was checked.
    fn dataset_finished(&mut self, report: &QcReport);

    /// Reading or checking a dataset failed. The batch continues.
    fn dataset_failed(&mut self, path: &Path, error: &QcError);
}

/// Reporter writing each check result to the `tracing` log.
#[derive(Debug, Default)]
pub struct TracingReporter;

impl QcReporter for TracingReporter {
    fn dataset_started(&mut self, path: &Path) {
        info!("***");
        info!("Checking {}", path.display());
    }

    fn dataset_finished(&mut self, report: &QcReport) {
        info!("{} targets found.", report.n_targets);
        info!("Counts of sample types: {}", report.sample_types);

        if report.flagged.is_clean() {
            info!("No rows with {} = {}", report.flagged.field, report.flagged.sentinel);
        } else {
            warn!("Flagged: {}", report.flagged);
        }

        for audit in &report.duplicates {
            if audit.has_duplicates() {
                warn!("Duplicates in {}", audit);
            } else {
                info!("No duplicates in {} ({} values)", audit.field, audit.n_values);
            }
        }

        let reference = &report.reference;
        if let Some(cal) = &reference.calibration {
            info!("{} in {}: {}", cal.target, reference.sample_types.join(", "), cal.summary);
        }
        info!(
            "CV over {} reference rows: {}",
            reference.n_rows, reference.classification
        );
    }

    fn dataset_failed(&mut self, path: &Path, error: &QcError) {
        error!("{}: {}", path.display(), error);
    }
}
