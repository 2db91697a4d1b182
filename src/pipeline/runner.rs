//! Single-dataset QC run.

use crate::data::{AnnotatedMatrix, Axis};
use crate::error::Result;
use crate::filter::{exclude_where, report_flagged, select_fields, select_where, FieldCondition, FlagReport};
use crate::pipeline::config::QcConfig;
use crate::profile::{
    audit_duplicates, classify_cv, fmt_stat, profile_sample_types, summarize_columns,
    ColumnSummary, CvClassification, DuplicateReport, ValueCounts,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Coefficient of variation of one target in the reference subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCv {
    /// Aptamer sequence identifier.
    pub seq_id: String,
    /// Target name.
    pub target: String,
    /// CV over the reference rows, `None` when undefined.
    pub cv: Option<f64>,
}

/// Full reference statistics of the calibration target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSummary {
    /// Configured target name.
    pub target: String,
    /// Sequence identifier of the matched column.
    pub seq_id: String,
    /// Statistics over the reference rows.
    pub summary: ColumnSummary,
}

/// Variability of the reference subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceReport {
    /// Sample types selected as reference.
    pub sample_types: Vec<String>,
    /// Reference rows left after excluding flagged rows.
    pub n_rows: usize,
    /// Target columns carrying a sequence identifier.
    pub n_targets: usize,
    /// Per-target CV, in column order.
    pub cv: Vec<TargetCv>,
    /// Threshold counts over `cv`.
    pub classification: CvClassification,
    /// Present when a calibration target was configured and found.
    pub calibration: Option<CalibrationSummary>,
}

/// Everything a QC run reports for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcReport {
    /// Where the dataset came from.
    pub source: String,
    /// Number of rows in the dataset.
    pub n_samples: usize,
    /// Number of columns in the dataset, controls included.
    pub n_targets: usize,
    /// Sample-type histogram, first-occurrence order.
    pub sample_types: ValueCounts,
    /// Rows failing the row check.
    pub flagged: FlagReport,
    /// One audit per identifier field, rows first.
    pub duplicates: Vec<DuplicateReport>,
    pub reference: ReferenceReport,
}

impl QcReport {
    /// Audit of a given field, if it was run.
    pub fn duplicates_for(&self, field: &str) -> Option<&DuplicateReport> {
        self.duplicates.iter().find(|d| d.field == field)
    }
}

impl std::fmt::Display for QcReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "QC Report: {}", self.source)?;
        writeln!(f, "  Samples: {}", self.n_samples)?;
        writeln!(f, "  Targets: {}", self.n_targets)?;
        writeln!(f, "  Sample types: {}", self.sample_types)?;
        writeln!(f, "  Flagged: {}", self.flagged)?;
        writeln!(f, "  Duplicates:")?;
        for audit in &self.duplicates {
            writeln!(f, "    {}", audit)?;
        }
        let reference = &self.reference;
        writeln!(
            f,
            "  Reference ({}): {} rows, {} targets",
            reference.sample_types.join(", "),
            reference.n_rows,
            reference.n_targets
        )?;
        if let Some(cal) = &reference.calibration {
            let s = &cal.summary;
            writeln!(
                f,
                "    {} ({}): min={} q1={} mean={} median={} q3={} max={}",
                cal.target,
                cal.seq_id,
                fmt_stat(s.min),
                fmt_stat(s.q1),
                fmt_stat(s.mean),
                fmt_stat(s.median),
                fmt_stat(s.q3),
                fmt_stat(s.max)
            )?;
        }
        writeln!(f, "    {}", reference.classification)?;
        Ok(())
    }
}

/// Run every QC check on one dataset.
///
/// Fails with `UnknownField` when the dataset lacks a configured field.
pub fn run_qc(matrix: &AnnotatedMatrix, config: &QcConfig, source: &str) -> Result<QcReport> {
    let sample_types = profile_sample_types(matrix, &config.sample_type_field)?;

    let flagged = report_flagged(
        matrix,
        &config.row_check_field,
        &config.flag_value,
        &config.sample_id_field,
    )?;

    let audits = [
        (Axis::Row, &config.external_id_field),
        (Axis::Row, &config.sample_id_field),
        (Axis::Column, &config.uniprot_field),
        (Axis::Column, &config.soma_id_field),
        (Axis::Column, &config.target_field),
    ];
    let duplicates = audits
        .iter()
        .map(|(axis, field)| audit_duplicates(matrix, *axis, field))
        .collect::<Result<Vec<_>>>()?;

    let reference = reference_report(matrix, config)?;

    Ok(QcReport {
        source: source.to_string(),
        n_samples: matrix.row_count(),
        n_targets: matrix.column_count(),
        sample_types,
        flagged,
        duplicates,
        reference,
    })
}

fn reference_report(matrix: &AnnotatedMatrix, config: &QcConfig) -> Result<ReferenceReport> {
    let targets = select_fields(
        matrix,
        Axis::Column,
        &[config.seq_id_field.as_str()],
        &FieldCondition::Present,
    )?;
    let reference = select_where(
        &targets,
        Axis::Row,
        &config.sample_type_field,
        &config.reference_sample_types,
    )?;
    let reference = exclude_where(
        &reference,
        Axis::Row,
        &config.row_check_field,
        &[config.flag_value.as_str()],
    )?;
    debug!(
        rows = reference.row_count(),
        targets = reference.column_count(),
        "reference subset"
    );

    let table = summarize_columns(&reference, &config.seq_id_field)?;
    let names = reference.metadata_values(Axis::Column, &config.target_field)?;

    let cv: Vec<TargetCv> = table
        .iter()
        .zip(names)
        .map(|((seq_id, summary), target)| TargetCv {
            seq_id: seq_id.to_string(),
            target: target.clone(),
            cv: summary.cv,
        })
        .collect();

    let classification = classify_cv(&table.cv_values(), &config.cv_thresholds);

    let calibration = config.calibration_target.as_ref().and_then(|wanted| {
        let idx = names.iter().position(|n| n == wanted)?;
        Some(CalibrationSummary {
            target: wanted.clone(),
            seq_id: table.ids[idx].clone(),
            summary: table.summaries[idx],
        })
    });

    Ok(ReferenceReport {
        sample_types: config.reference_sample_types.clone(),
        n_rows: reference.row_count(),
        n_targets: reference.column_count(),
        cv,
        classification,
        calibration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MetadataTable;
    use crate::error::QcError;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn create_test_matrix() -> AnnotatedMatrix {
        // 5 samples × 3 targets; the last column is a control without SeqId
        let row_meta = MetadataTable::new(5)
            .with_field("SampleId", strings(&["A", "B", "A", "C", "B"]))
            .unwrap()
            .with_field("ExtIdentifier", strings(&["E1", "E2", "E3", "E4", "E5"]))
            .unwrap()
            .with_field(
                "SampleType",
                strings(&["Sample", "Buffer", "Buffer", "Buffer", "Buffer"]),
            )
            .unwrap()
            .with_field("RowCheck", strings(&["PASS", "FLAG", "PASS", "FLAG", "PASS"]))
            .unwrap();
        let col_meta = MetadataTable::new(3)
            .with_field("Target", strings(&["CRYBB2", "RAF1", "HybControl"]))
            .unwrap()
            .with_field("UniProt", strings(&["P43320", "P04049", ""]))
            .unwrap()
            .with_field("SomaId", strings(&["SL000002", "SL000002", "SL999999"]))
            .unwrap()
            .with_field("SeqId", strings(&["10000-28", "10001-7", ""]))
            .unwrap();
        let rows = vec![
            vec![500.0, 20.0, 1.0],
            vec![900.0, 50.0, 1.0],
            vec![100.0, 10.0, 1.0],
            vec![900.0, 50.0, 1.0],
            vec![100.0, 30.0, 1.0],
        ];
        AnnotatedMatrix::from_rows(&rows, row_meta, col_meta).unwrap()
    }

    #[test]
    fn test_run_qc() {
        let mat = create_test_matrix();
        let config = QcConfig {
            calibration_target: Some("RAF1".to_string()),
            ..QcConfig::default()
        };
        let report = run_qc(&mat, &config, "memory").unwrap();

        assert_eq!(report.n_samples, 5);
        assert_eq!(report.n_targets, 3);
        assert_eq!(report.sample_types.count("Buffer"), 4);
        assert_eq!(report.flagged.sample_ids, vec!["B", "C"]);

        let ids = report.duplicates_for("SampleId").unwrap();
        assert_eq!(ids.duplicates.len(), 2);
        assert!(!report.duplicates_for("ExtIdentifier").unwrap().has_duplicates());
        assert_eq!(report.duplicates_for("SomaId").unwrap().duplicates[0].value, "SL000002");
        assert_eq!(report.duplicates.len(), 5);

        // Buffer rows 2 and 4 remain after dropping flagged rows
        let reference = &report.reference;
        assert_eq!(reference.n_rows, 2);
        assert_eq!(reference.n_targets, 2);
        assert_eq!(reference.cv[0].target, "CRYBB2");
        assert_eq!(reference.cv[0].cv, Some(0.0));
        // RAF1: values 10, 30 -> mean 20, sd sqrt(200)
        let raf1_cv = reference.cv[1].cv.unwrap();
        assert!((raf1_cv - 200f64.sqrt() / 20.0).abs() < 1e-12);
        assert_eq!(reference.classification.count_for(0.2), Some(1));
        assert_eq!(reference.classification.count_for(1.0), Some(0));

        let cal = reference.calibration.as_ref().unwrap();
        assert_eq!(cal.seq_id, "10001-7");
        assert_eq!(cal.summary.min, Some(10.0));
        assert_eq!(cal.summary.max, Some(30.0));
    }

    #[test]
    fn test_missing_field_aborts_dataset() {
        let mat = create_test_matrix();
        let config = QcConfig {
            external_id_field: "SsfExtId".to_string(),
            ..QcConfig::default()
        };
        let err = run_qc(&mat, &config, "memory").unwrap_err();
        assert!(matches!(err, QcError::UnknownField { axis: Axis::Row, ref field } if field == "SsfExtId"));
    }

    #[test]
    fn test_no_reference_rows_reports_undefined() {
        let mat = create_test_matrix();
        let config = QcConfig {
            reference_sample_types: vec!["Calibrator".to_string()],
            calibration_target: Some("CRYBB2".to_string()),
            ..QcConfig::default()
        };
        let report = run_qc(&mat, &config, "memory").unwrap();
        assert_eq!(report.reference.n_rows, 0);
        assert!(report.reference.cv.iter().all(|t| t.cv.is_none()));
        assert_eq!(report.reference.classification.n_undefined, 2);
        let cal = report.reference.calibration.as_ref().unwrap();
        assert_eq!(cal.summary, ColumnSummary::undefined());
    }

    #[test]
    fn test_unknown_calibration_target_is_skipped() {
        let mat = create_test_matrix();
        let config = QcConfig {
            calibration_target: Some("NOPE".to_string()),
            ..QcConfig::default()
        };
        let report = run_qc(&mat, &config, "memory").unwrap();
        assert!(report.reference.calibration.is_none());
    }

    #[test]
    fn test_display() {
        let report = run_qc(&create_test_matrix(), &QcConfig::default(), "memory").unwrap();
        let text = report.to_string();
        assert!(text.contains("Targets: 3"));
        assert!(text.contains("Sample types: {Sample: 1, Buffer: 4}"));
        assert!(text.contains("2 rows with RowCheck = FLAG: B, C"));
    }
}
