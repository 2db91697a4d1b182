//! Integration tests for the QC pipeline.

use somalogic_qc::prelude::*;
use std::fs;
use tempfile::TempDir;

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Five samples with duplicated ids and two flagged rows.
fn create_dataset() -> AnnotatedMatrix {
    let row_meta = MetadataTable::new(5)
        .with_field("SampleId", strings(&["A", "B", "A", "C", "B"]))
        .unwrap()
        .with_field("ExtIdentifier", strings(&["X1", "X2", "X3", "X4", "X5"]))
        .unwrap()
        .with_field(
            "SampleType",
            strings(&["Buffer", "Buffer", "Sample", "Buffer", "Buffer"]),
        )
        .unwrap()
        .with_field("RowCheck", strings(&["OK", "FLAG", "OK", "FLAG", "OK"]))
        .unwrap();

    // 6 targets: CRYBB2 is spread, RAF1 is tight, ZERO has zero mean,
    // GAPPY has missing values, the last two carry no SeqId
    let col_meta = MetadataTable::new(6)
        .with_field(
            "Target",
            strings(&["CRYBB2", "RAF1", "ZERO", "GAPPY", "HybControl", "Spuriomer"]),
        )
        .unwrap()
        .with_field(
            "UniProt",
            strings(&["P43320", "P04049", "Q00000", "P43320", "", ""]),
        )
        .unwrap()
        .with_field(
            "SomaId",
            strings(&["SL000001", "SL000002", "SL000003", "SL000004", "SL000005", "SL000006"]),
        )
        .unwrap()
        .with_field(
            "SeqId",
            strings(&["10000-28", "10001-7", "10003-15", "10006-25", "", "NA"]),
        )
        .unwrap();

    let nan = f64::NAN;
    let rows = vec![
        vec![100.0, 50.0, -2.0, nan, 1.0, 1.0],
        vec![900.0, 51.0, 9.0, 10.0, 1.0, 1.0],
        vec![400.0, 49.0, 3.0, 10.0, 1.0, 1.0],
        vec![900.0, 52.0, 9.0, 10.0, 1.0, 1.0],
        vec![500.0, 52.0, 2.0, 30.0, 1.0, 1.0],
    ];
    AnnotatedMatrix::from_rows(&rows, row_meta, col_meta).unwrap()
}

#[test]
fn test_duplicate_and_flag_scenario() {
    let matrix = create_dataset();

    let counts = count_values(matrix.metadata_values(Axis::Row, "SampleId").unwrap());
    let dups: Vec<(String, usize)> = counts
        .duplicates()
        .into_iter()
        .map(|d| (d.value, d.count))
        .collect();
    assert_eq!(dups, vec![("A".to_string(), 2), ("B".to_string(), 2)]);
    assert_eq!(counts.total(), matrix.row_count());

    let flagged = extract_flagged(&matrix, "RowCheck", "FLAG").unwrap();
    assert_eq!(flagged.metadata_values(Axis::Row, "SampleId").unwrap(), &["B", "C"]);
}

#[test]
fn test_full_report() {
    let matrix = create_dataset();
    let config = QcConfig {
        calibration_target: Some("CRYBB2".to_string()),
        ..QcConfig::default()
    };
    let report = run_qc(&matrix, &config, "plate1").unwrap();

    assert_eq!(report.n_targets, 6);
    assert_eq!(report.sample_types.count("Buffer"), 4);
    assert_eq!(report.flagged.row_indices, vec![1, 3]);

    let uniprot = report.duplicates_for("UniProt").unwrap();
    // P43320 twice and the two blank controls
    assert_eq!(uniprot.duplicates.len(), 2);
    assert_eq!(uniprot.duplicates[0].value, "P43320");

    // Buffer rows 0 and 4 survive flag exclusion
    let reference = &report.reference;
    assert_eq!(reference.n_rows, 2);
    assert_eq!(reference.n_targets, 4);

    let cvs: Vec<Option<f64>> = reference.cv.iter().map(|t| t.cv).collect();
    // ZERO: values -2, 2 -> mean 0 -> undefined
    assert_eq!(cvs[2], None);
    // GAPPY: only one non-missing buffer value -> undefined spread
    assert_eq!(cvs[3], None);
    assert!(cvs[0].unwrap() > 1.0 / 3.0);
    assert!(cvs[1].unwrap() < 0.2);

    let classification = &reference.classification;
    assert_eq!(classification.n_undefined, 2);
    assert_eq!(classification.count_for(0.2), Some(1));
    assert_eq!(classification.count_for(1.0), Some(0));

    let cal = reference.calibration.as_ref().unwrap();
    assert_eq!(cal.summary.min, Some(100.0));
    assert_eq!(cal.summary.median, Some(300.0));
    assert_eq!(cal.summary.max, Some(500.0));
}

#[test]
fn test_report_serialization_is_deterministic() {
    let matrix = create_dataset();
    let config = QcConfig::default();

    let first = run_qc(&matrix, &config, "plate1").unwrap();
    let second = run_qc(&matrix, &config, "plate1").unwrap();

    let json = serde_json::to_string(&first).unwrap();
    assert_eq!(json, serde_json::to_string(&second).unwrap());

    let parsed: QcReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, first);

    let yaml = serde_yaml::to_string(&first).unwrap();
    let parsed: QcReport = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(parsed.duplicates, first.duplicates);
    assert_eq!(parsed.reference.classification, first.reference.classification);
}

#[test]
fn test_batch_from_disk() {
    let dir = TempDir::new().unwrap();
    let reader = TsvReader::new();
    reader.write(&create_dataset(), dir.path().join("plate1.tsv")).unwrap();
    fs::create_dir(dir.path().join("old")).unwrap();
    fs::write(dir.path().join("old").join("plate0.tsv"), "^ROW\tSampleId\n").unwrap();

    let paths = discover_files(dir.path(), ".tsv").unwrap();
    assert_eq!(paths.len(), 2);

    let outcome = run_batch(&paths, &reader, &QcConfig::default(), &mut TracingReporter);
    assert_eq!(outcome.reports.len(), 1);
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failures[0].path.ends_with("old/plate0.tsv"));

    let report = &outcome.reports[0];
    assert_eq!(report.n_samples, 5);
    assert_eq!(report.reference.n_rows, 2);
}
