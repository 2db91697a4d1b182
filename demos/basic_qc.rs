//! Basic example demonstrating a QC run on an in-memory dataset.
//!
//! This example shows how to:
//! 1. Build an annotated matrix
//! 2. Audit identifiers and flagged rows
//! 3. Summarize the buffer samples
//! 4. Run the full QC report

use somalogic_qc::prelude::*;

fn main() -> Result<()> {
    println!("=== SomaLogic QC Example ===\n");

    let matrix = create_example_data()?;
    println!("Data dimensions:");
    println!("  Samples: {}", matrix.row_count());
    println!("  Targets: {}", matrix.column_count());
    println!();

    println!("=== Identifier Audits ===\n");
    let sample_types = profile_sample_types(&matrix, "SampleType")?;
    println!("Sample types: {}", sample_types);
    // Older exports name the external identifier SsfExtId
    let external_id = if matrix.has_field(Axis::Row, "ExtIdentifier") {
        "ExtIdentifier"
    } else {
        "SsfExtId"
    };
    for field in ["SampleId", external_id] {
        println!("{}", audit_duplicates(&matrix, Axis::Row, field)?);
    }
    println!("{}", report_flagged(&matrix, "RowCheck", "FLAG", "SampleId")?);
    println!();

    println!("=== Buffer Statistics ===\n");
    let buffers = select_where(&matrix, Axis::Row, "SampleType", &["Buffer"])?;
    let buffers = exclude_where(&buffers, Axis::Row, "RowCheck", &["FLAG"])?;
    let table = summarize_columns(&buffers, "SeqId")?;
    for (seq_id, summary) in table.iter() {
        println!("  {}: {}", seq_id, summary);
    }
    println!();

    println!("=== Full Report ===\n");
    let config = QcConfig {
        external_id_field: external_id.to_string(),
        calibration_target: Some("CRYBB2".to_string()),
        ..QcConfig::default()
    };
    let report = run_qc(&matrix, &config, "example")?;
    println!("{}", report);

    Ok(())
}

fn create_example_data() -> Result<AnnotatedMatrix> {
    let n_samples = 12;
    let targets = ["CRYBB2", "RAF1", "ZNF41", "ELK1"];
    let seq_ids = ["10000-28", "10001-7", "10003-15", "10006-25"];

    let sample_type = |i: usize| if i % 4 == 0 { "Buffer" } else { "Sample" };
    let row_meta = MetadataTable::new(n_samples)
        .with_field("SampleId", (0..n_samples).map(|i| format!("S{}", i % 10)).collect())?
        .with_field("ExtIdentifier", (0..n_samples).map(|i| format!("EXT{:04}", i)).collect())?
        .with_field("SampleType", (0..n_samples).map(|i| sample_type(i).to_string()).collect())?
        .with_field(
            "RowCheck",
            (0..n_samples)
                .map(|i| if i == 5 { "FLAG" } else { "PASS" }.to_string())
                .collect(),
        )?;
    let uniprot = ["P43320", "P04049", "Q8TAQ5", "P19419"];
    let col_meta = MetadataTable::from_fields(
        targets.len(),
        vec![
            ("Target", owned(&targets)),
            ("SeqId", owned(&seq_ids)),
            ("UniProt", owned(&uniprot)),
            ("SomaId", (0..targets.len()).map(|i| format!("SL{:06}", i)).collect()),
        ],
    )?;

    let rows: Vec<Vec<f64>> = (0..n_samples)
        .map(|i| {
            let scale = if sample_type(i) == "Buffer" { 0.1 } else { 1.0 };
            (0..targets.len())
                .map(|t| scale * (1000.0 + 150.0 * ((i * 7 + t * 3) % 5) as f64))
                .collect()
        })
        .collect();

    AnnotatedMatrix::from_rows(&rows, row_meta, col_meta)
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
