//! Dataset discovery and sequential batch processing.

use crate::data::MatrixReader;
use crate::error::{QcError, Result};
use crate::pipeline::config::QcConfig;
use crate::pipeline::reporter::QcReporter;
use crate::pipeline::runner::{run_qc, QcReport};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Find every file under `root` whose name ends with `ext`, recursively.
///
/// Paths are returned sorted so batch order is reproducible.
pub fn discover_files(root: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        return Err(QcError::PathNotFound(root.to_path_buf()));
    }
    let pattern = format!(
        "{}/**/*{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        ext
    );

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) if path.is_file() => paths.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping {}: {}", e.path().display(), e.error()),
        }
    }
    paths.sort();

    info!("{} {} files found in {}", paths.len(), ext, root.display());
    Ok(paths)
}

/// A dataset that could not be checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Dataset path.
    pub path: PathBuf,
    /// Rendered error message.
    pub error: String,
}

/// Results of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Reports of the datasets checked, in input order.
    pub reports: Vec<QcReport>,
    /// Datasets that could not be read or checked.
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Datasets attempted, successful or not.
    pub fn n_processed(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Check each dataset in turn.
///
/// A failure on one dataset is passed to the reporter and recorded; the
/// remaining datasets are still processed.
pub fn run_batch<R, P>(
    paths: &[PathBuf],
    reader: &R,
    config: &QcConfig,
    reporter: &mut P,
) -> BatchOutcome
where
    R: MatrixReader + ?Sized,
    P: QcReporter + ?Sized,
{
    let mut outcome = BatchOutcome::default();

    for path in paths {
        reporter.dataset_started(path);
        let result = reader
            .read(path)
            .and_then(|matrix| run_qc(&matrix, config, &path.display().to_string()));

        match result {
            Ok(report) => {
                reporter.dataset_finished(&report);
                outcome.reports.push(report);
            }
            Err(e) => {
                reporter.dataset_failed(path, &e);
                outcome.failures.push(BatchFailure {
                    path: path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AnnotatedMatrix, MetadataTable, TsvReader};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingReporter {
        started: usize,
        finished: Vec<String>,
        failed: Vec<PathBuf>,
    }

    impl QcReporter for RecordingReporter {
        fn dataset_started(&mut self, _path: &Path) {
            self.started += 1;
        }

        fn dataset_finished(&mut self, report: &QcReport) {
            self.finished.push(report.source.clone());
        }

        fn dataset_failed(&mut self, path: &Path, _error: &QcError) {
            self.failed.push(path.to_path_buf());
        }
    }

    const DATASET: &str = "\
^COL\tTarget\tCRYBB2\tRAF1
^COL\tUniProt\tP43320\tP04049
^COL\tSomaId\tSL000002\tSL000003
^COL\tSeqId\t10000-28\t10001-7
^ROW\tSampleId\tExtIdentifier\tSampleType\tRowCheck
S1\tE1\tBuffer\tPASS\t100\t10
S2\tE2\tBuffer\tPASS\t110\t30
";

    #[test]
    fn test_discover_files_recursive_and_sorted() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("plate2")).unwrap();
        fs::write(dir.path().join("plate2").join("b.tsv"), DATASET).unwrap();
        fs::write(dir.path().join("a.tsv"), DATASET).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let paths = discover_files(dir.path(), ".tsv").unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("a.tsv"));
        assert!(paths[1].ends_with("plate2/b.tsv"));
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            discover_files(&missing, ".tsv"),
            Err(QcError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.tsv");
        let bad = dir.path().join("bad.tsv");
        let renamed = dir.path().join("renamed.tsv");
        fs::write(&good, DATASET).unwrap();
        fs::write(&bad, "^ROW\tSampleId\nS1\tnot-a-number\n").unwrap();
        fs::write(&renamed, DATASET.replace("ExtIdentifier", "SsfExtId")).unwrap();

        let paths = vec![bad.clone(), good.clone(), renamed.clone()];
        let mut reporter = RecordingReporter::default();
        let outcome = run_batch(&paths, &TsvReader::new(), &QcConfig::default(), &mut reporter);

        assert_eq!(outcome.n_processed(), 3);
        assert_eq!(outcome.reports.len(), 1);
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.failures[1].error.contains("ExtIdentifier"));
        assert_eq!(reporter.started, 3);
        assert_eq!(reporter.finished, vec![good.display().to_string()]);
        assert_eq!(reporter.failed, vec![bad, renamed]);
    }

    struct MemoryReader(AnnotatedMatrix);

    impl MatrixReader for MemoryReader {
        fn read(&self, _path: &Path) -> Result<AnnotatedMatrix> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_batch_with_custom_reader() {
        let row_meta = MetadataTable::new(1)
            .with_field("SampleId", vec!["S1".to_string()])
            .unwrap();
        let matrix = AnnotatedMatrix::from_rows(&[vec![]], row_meta, MetadataTable::new(0)).unwrap();
        let reader = MemoryReader(matrix);

        let mut reporter = RecordingReporter::default();
        let outcome = run_batch(
            &[PathBuf::from("in-memory")],
            &reader,
            &QcConfig::default(),
            &mut reporter,
        );
        // SampleType is missing from the in-memory matrix
        assert_eq!(outcome.failures.len(), 1);
        assert!(outcome.failures[0].error.contains("SampleType"));
    }
}
