//! Proportional Analysis
//!
//! Gregg shorthand encodes distinct letters via the *relative* size of
//! otherwise shape-identical primitives ("a" vs "o" circles differ by
//! size next to their neighbors, not by shape). Absolute-size comparison
//! alone misclassifies correctly-shaped-but-mis-scaled writing, so this
//! analyzer compares size ratios across the whole stroke set of one
//! attempt against the reference set's ratios.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::stroke::Stroke;

/// Scalar size metric used for stroke-pair ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeMetric {
    /// Bounding-box diagonal length
    #[default]
    BboxDiagonal,
    /// Bounding-box height
    Height,
    /// Bounding-box width
    Width,
}

impl SizeMetric {
    /// Measure a stroke with this metric
    pub fn measure(&self, stroke: &Stroke) -> f64 {
        match self {
            SizeMetric::BboxDiagonal => stroke.bbox_diagonal(),
            SizeMetric::Height => stroke.height(),
            SizeMetric::Width => stroke.width(),
        }
    }
}

/// Pairwise proportional deviations for one attempt
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProportionReport {
    /// Signed relative deviation per stroke pair, keyed "i:j".
    /// Positive means the later stroke of the pair is too large
    /// relative to its neighbor compared with the reference.
    pub pair_deviations: BTreeMap<String, f64>,
    /// The signed deviation with the largest magnitude, 0 when no
    /// pair could be measured
    pub max_deviation: f64,
}

impl ProportionReport {
    /// Whether any pair could be measured
    pub fn has_pairs(&self) -> bool {
        !self.pair_deviations.is_empty()
    }
}

/// Cross-stroke proportional analyzer
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionAnalyzer {
    /// Size metric used for ratios
    pub metric: SizeMetric,
}

impl ProportionAnalyzer {
    pub fn new(metric: SizeMetric) -> Self {
        Self { metric }
    }

    /// Compare size ratios across a user stroke set against the
    /// reference set's corresponding ratios.
    ///
    /// For each pair (i, j) with i < j the ratio size_j / size_i is
    /// computed on both sides; the deviation is user_ratio / ref_ratio
    /// − 1. Pairs whose reference or user ratio is degenerate (a
    /// zero-size stroke) are skipped rather than reported as spurious
    /// deviations.
    pub fn analyze(&self, user: &[Stroke], reference: &[Stroke]) -> crate::Result<ProportionReport> {
        if user.len() != reference.len() {
            return Err(crate::Error::Validation(format!(
                "proportional analysis requires matching stroke counts (user {}, reference {})",
                user.len(),
                reference.len()
            )));
        }

        let user_sizes: Vec<f64> = user.iter().map(|s| self.metric.measure(s)).collect();
        let ref_sizes: Vec<f64> = reference.iter().map(|s| self.metric.measure(s)).collect();

        let mut report = ProportionReport::default();
        for i in 0..user.len() {
            for j in (i + 1)..user.len() {
                if user_sizes[i] < 1e-8 || ref_sizes[i] < 1e-8 || ref_sizes[j] < 1e-8 {
                    continue;
                }
                let user_ratio = user_sizes[j] / user_sizes[i];
                let ref_ratio = ref_sizes[j] / ref_sizes[i];
                let deviation = user_ratio / ref_ratio - 1.0;

                if deviation.abs() > report.max_deviation.abs() {
                    report.max_deviation = deviation;
                }
                report
                    .pair_deviations
                    .insert(format!("{}:{}", i, j), deviation);
            }
        }

        Ok(report)
    }
}
