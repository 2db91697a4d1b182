//! QC run configuration.

use crate::error::{QcError, Result};
use crate::profile::DEFAULT_CV_THRESHOLDS;
use serde::{Deserialize, Serialize};

/// Field names and parameters for a QC run.
///
/// Every field has a default matching current SomaScan exports, so a YAML
/// file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcConfig {
    /// Row field holding the sample type.
    pub sample_type_field: String,
    /// Row field holding the sample identifier.
    pub sample_id_field: String,
    /// Row field holding the external sample identifier.
    /// Older exports name it `SsfExtId`.
    pub external_id_field: String,
    /// Row field holding the row check result.
    pub row_check_field: String,
    /// Row check value marking a flagged row.
    pub flag_value: String,
    /// Column field holding the target name.
    pub target_field: String,
    /// Column field holding the UniProt accession.
    pub uniprot_field: String,
    /// Column field holding the SomaId.
    pub soma_id_field: String,
    /// Column field holding the aptamer sequence identifier.
    pub seq_id_field: String,
    /// Sample types forming the reference subset.
    pub reference_sample_types: Vec<String>,
    /// CV thresholds for the dataset-level classification.
    pub cv_thresholds: Vec<f64>,
    /// Target name whose reference statistics are reported in full.
    pub calibration_target: Option<String>,
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            sample_type_field: "SampleType".to_string(),
            sample_id_field: "SampleId".to_string(),
            external_id_field: "ExtIdentifier".to_string(),
            row_check_field: "RowCheck".to_string(),
            flag_value: "FLAG".to_string(),
            target_field: "Target".to_string(),
            uniprot_field: "UniProt".to_string(),
            soma_id_field: "SomaId".to_string(),
            seq_id_field: "SeqId".to_string(),
            reference_sample_types: vec!["Buffer".to_string()],
            cv_thresholds: DEFAULT_CV_THRESHOLDS.to_vec(),
            calibration_target: None,
        }
    }
}

impl QcConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(QcError::from)
    }

    /// Check that the configuration can drive a QC run.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("sample_type_field", &self.sample_type_field),
            ("sample_id_field", &self.sample_id_field),
            ("external_id_field", &self.external_id_field),
            ("row_check_field", &self.row_check_field),
            ("target_field", &self.target_field),
            ("uniprot_field", &self.uniprot_field),
            ("soma_id_field", &self.soma_id_field),
            ("seq_id_field", &self.seq_id_field),
        ];
        if let Some((key, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(QcError::InvalidParameter(format!("{} must not be empty", key)));
        }
        if self.reference_sample_types.is_empty() {
            return Err(QcError::InvalidParameter(
                "reference_sample_types must name at least one sample type".to_string(),
            ));
        }
        if self.cv_thresholds.is_empty() {
            return Err(QcError::InvalidParameter(
                "cv_thresholds must contain at least one threshold".to_string(),
            ));
        }
        if let Some(t) = self.cv_thresholds.iter().find(|t| !t.is_finite()) {
            return Err(QcError::InvalidParameter(format!(
                "CV threshold {} is not finite",
                t
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QcConfig::default();
        assert_eq!(config.external_id_field, "ExtIdentifier");
        assert_eq!(config.cv_thresholds, vec![0.2, 1.0]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = QcConfig::from_yaml("external_id_field: SsfExtId\ncalibration_target: CRYBB2\n").unwrap();
        assert_eq!(config.external_id_field, "SsfExtId");
        assert_eq!(config.calibration_target.as_deref(), Some("CRYBB2"));
        assert_eq!(config.sample_id_field, "SampleId");
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = QcConfig {
            reference_sample_types: vec!["Buffer".to_string(), "QC".to_string()],
            ..QcConfig::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert_eq!(QcConfig::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_validation_errors() {
        assert!(QcConfig::from_yaml("cv_thresholds: []").is_err());
        assert!(QcConfig::from_yaml("reference_sample_types: []").is_err());
        assert!(QcConfig::from_yaml("seq_id_field: ''").is_err());
        assert!(QcConfig::from_yaml("cv_thresholds: [.nan]").is_err());
    }
}
