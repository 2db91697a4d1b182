//! Named metadata fields aligned to one axis of an annotated matrix.

use crate::error::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Markers treated as "no value" in metadata fields.
pub const MISSING_MARKERS: [&str; 3] = ["NA", "na", "NaN"];

/// One of the two axes of an annotated matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Samples.
    Row,
    /// Measured targets.
    Column,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Column => write!(f, "column"),
        }
    }
}

/// Check whether a metadata value carries information.
pub fn is_present(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !MISSING_MARKERS.contains(&trimmed)
}

/// Metadata fields for one axis.
///
/// Every field holds exactly `len` values, one per position along the axis.
/// Field order is the order in which fields were added.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTable {
    /// Number of positions along the axis.
    len: usize,
    /// Field names in insertion order.
    field_names: Vec<String>,
    /// Data stored as field_name -> values.
    data: HashMap<String, Vec<String>>,
}

impl MetadataTable {
    /// Create a table with no fields for an axis of length `len`.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            field_names: Vec::new(),
            data: HashMap::new(),
        }
    }

    /// Build a table from `(field, values)` pairs.
    pub fn from_fields<I, S>(len: usize, fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<String>)>,
        S: Into<String>,
    {
        let mut table = Self::new(len);
        for (name, values) in fields {
            table.insert(name, values)?;
        }
        Ok(table)
    }

    /// Add a field, or replace the values of an existing one.
    pub fn insert<S: Into<String>>(&mut self, name: S, values: Vec<String>) -> Result<()> {
        let name = name.into();
        if values.len() != self.len {
            return Err(QcError::DimensionMismatch {
                expected: self.len,
                actual: values.len(),
            });
        }
        if !self.data.contains_key(&name) {
            self.field_names.push(name.clone());
        }
        self.data.insert(name, values);
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_field<S: Into<String>>(mut self, name: S, values: Vec<String>) -> Result<Self> {
        self.insert(name, values)?;
        Ok(self)
    }

    /// Number of positions along the axis.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the axis has no positions.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Field names in insertion order.
    pub fn field_names(&self) -> &[String] {
        &self.field_names
    }

    /// Check if a field exists.
    pub fn has_field(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Values of a field, if present.
    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.data.get(field).map(Vec::as_slice)
    }

    /// Keep only the given positions, in the given order.
    pub fn subset(&self, indices: &[usize]) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.len) {
            return Err(QcError::InvalidParameter(format!(
                "Metadata index {} out of bounds for length {}",
                bad, self.len
            )));
        }
        let data = self
            .data
            .iter()
            .map(|(name, values)| {
                let kept = indices.iter().map(|&i| values[i].clone()).collect();
                (name.clone(), kept)
            })
            .collect();

        Ok(Self {
            len: indices.len(),
            field_names: self.field_names.clone(),
            data,
        })
    }
}

impl Default for MetadataTable {
    fn default() -> Self {
        Self::new(0)
    }
}
