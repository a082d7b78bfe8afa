//! Comparison Result
//!
//! The value returned to callers, serializing to the externally
//! documented response shape. Constructed once per comparison and never
//! mutated.

use std::collections::BTreeMap;

use serde::Serialize;

/// Scalar alignment metrics exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSummary {
    /// Mean normalized DTW distance across stroke pairs
    /// (squared-distance units)
    pub dtw_distance: f64,
    /// Mean discrete Fréchet distance across stroke pairs
    pub frechet_distance: f64,
    /// Mean user/reference size ratio (1.0 = matching size)
    pub size_ratio: f64,
    /// Mean absolute total-curvature difference across stroke pairs
    pub curvature_deviation: f64,
}

/// Output of one comparison call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    /// Rubric-weighted score in [0, 1]
    pub score: f64,
    /// Letter grade from the rubric's bands
    pub grade: String,
    /// Feedback statements, most important first
    pub feedback: Vec<String>,
    /// Scalar alignment metrics
    pub metrics: MetricsSummary,
    /// Signed relative deviation per geometric feature
    pub feature_deviations: BTreeMap<String, f64>,
    /// Signed proportional deviation per stroke pair ("i:j")
    pub proportion_deviations: BTreeMap<String, f64>,
}

impl ComparisonResult {
    /// Serialize to the documented JSON response shape
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
