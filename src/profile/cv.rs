//! Dataset-level quality signal from per-target coefficients of variation.

use serde::{Deserialize, Serialize};

/// Default CV thresholds.
pub const DEFAULT_CV_THRESHOLDS: [f64; 2] = [0.2, 1.0];

/// Number of targets at or above one CV threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdCount {
    /// Lower CV bound, inclusive.
    pub threshold: f64,
    /// Defined CV values at or above `threshold`.
    pub count: usize,
}

/// Threshold counts over a set of CV values.
///
/// Thresholds are independent: a CV of 1.5 counts toward both 0.2 and 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvClassification {
    /// Counts in the order the thresholds were given.
    pub counts: Vec<ThresholdCount>,
    /// CV values that were defined and took part in the counts.
    pub n_evaluated: usize,
    /// Undefined CV values, excluded from every count.
    pub n_undefined: usize,
}

impl CvClassification {
    /// Count for a threshold, if it was evaluated.
    pub fn count_for(&self, threshold: f64) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.threshold == threshold)
            .map(|c| c.count)
    }
}

impl std::fmt::Display for CvClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|c| format!("CV >= {}: {}", c.threshold, c.count))
            .collect();
        write!(
            f,
            "{} ({} evaluated, {} undefined)",
            parts.join(", "),
            self.n_evaluated,
            self.n_undefined
        )
    }
}

/// Count CV values satisfying `cv >= t` for each threshold `t`.
///
/// `None` and `NaN` entries are undefined and never counted.
pub fn classify_cv(cv_values: &[Option<f64>], thresholds: &[f64]) -> CvClassification {
    let defined: Vec<f64> = cv_values
        .iter()
        .filter_map(|cv| cv.filter(|v| !v.is_nan()))
        .collect();

    let counts = thresholds
        .iter()
        .map(|&threshold| ThresholdCount {
            threshold,
            count: defined.iter().filter(|&&cv| cv >= threshold).count(),
        })
        .collect();

    CvClassification {
        counts,
        n_evaluated: defined.len(),
        n_undefined: cv_values.len() - defined.len(),
    }
}
