//! Value counting and duplicate detection for metadata fields.

use crate::data::{AnnotatedMatrix, Axis};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCount {
    /// The metadata value.
    pub value: String,
    /// Number of occurrences.
    pub count: usize,
}

/// Occurrence counts of the distinct values in a sequence.
///
/// Entries are kept in order of first occurrence, so the same input order
/// always produces the same report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueCounts {
    entries: Vec<ValueCount>,
}

impl ValueCounts {
    /// Distinct values with their counts, in first-occurrence order.
    pub fn entries(&self) -> &[ValueCount] {
        &self.entries
    }

    /// Count for a value (0 when absent).
    pub fn count(&self, value: &str) -> usize {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Number of distinct values.
    pub fn n_distinct(&self) -> usize {
        self.entries.len()
    }

    /// Sum of all counts, equal to the length of the counted sequence.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Values occurring more than once, in first-occurrence order.
    pub fn duplicates(&self) -> Vec<ValueCount> {
        self.entries.iter().filter(|e| e.count > 1).cloned().collect()
    }
}

impl std::fmt::Display for ValueCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}: {}", e.value, e.count))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

/// Count occurrences of each distinct value.
pub fn count_values<I, S>(values: I) -> ValueCounts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut position: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<ValueCount> = Vec::new();

    for value in values {
        let value = value.as_ref();
        match position.get(value) {
            Some(&idx) => entries[idx].count += 1,
            None => {
                position.insert(value.to_string(), entries.len());
                entries.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    ValueCounts { entries }
}

/// Duplicate audit of one metadata field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicateReport {
    /// Axis the field belongs to.
    pub axis: Axis,
    /// Audited field name.
    pub field: String,
    /// Number of values inspected (rows or columns).
    pub n_values: usize,
    /// Number of distinct values.
    pub n_distinct: usize,
    /// Values occurring more than once, in first-occurrence order.
    pub duplicates: Vec<ValueCount>,
}

impl DuplicateReport {
    /// True when at least one value occurs more than once.
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

impl std::fmt::Display for DuplicateReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}): {} values, {} distinct, {} duplicated",
            self.field,
            self.axis,
            self.n_values,
            self.n_distinct,
            self.duplicates.len()
        )?;
        if self.has_duplicates() {
            let parts: Vec<String> = self
                .duplicates
                .iter()
                .map(|d| format!("{} x{}", d.value, d.count))
                .collect();
            write!(f, " [{}]", parts.join(", "))?;
        }
        Ok(())
    }
}

/// Audit a metadata field for repeated values.
///
/// Purely descriptive: whether a duplicate is an error is up to the caller.
pub fn audit_duplicates(matrix: &AnnotatedMatrix, axis: Axis, field: &str) -> Result<DuplicateReport> {
    let values = matrix.metadata_values(axis, field)?;
    let counts = count_values(values);

    Ok(DuplicateReport {
        axis,
        field: field.to_string(),
        n_values: values.len(),
        n_distinct: counts.n_distinct(),
        duplicates: counts.duplicates(),
    })
}

/// Histogram of the sample-type field.
pub fn profile_sample_types(matrix: &AnnotatedMatrix, field: &str) -> Result<ValueCounts> {
    Ok(count_values(matrix.metadata_values(Axis::Row, field)?))
}
