//! Scoring Rubric
//!
//! The rubric is plain data, not a strategy object: a mapping from
//! metric name to weight and tolerance, plus the grade bands. Curriculum
//! units supply their own rubric records; partial rubrics are allowed
//! during rollout (metrics without an entry are simply not scored).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Weight and tolerance for one metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RubricEntry {
    /// Relative importance in the weighted score
    pub weight: f64,
    /// Absolute deviation at which the metric saturates and triggers
    /// feedback
    pub tolerance: f64,
}

/// One grade threshold: scores at or above `min_score` earn `grade`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeBand {
    pub min_score: f64,
    pub grade: String,
}

/// Per-unit scoring rubric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    /// Metric name -> weight/tolerance
    pub entries: BTreeMap<String, RubricEntry>,
    /// Grade thresholds, descending by min_score
    pub grade_bands: Vec<GradeBand>,
}

impl Rubric {
    /// The standard rubric used when a unit supplies none.
    ///
    /// Shape dominates the weighting; size and curvature follow, since
    /// those are what distinguish Gregg primitives in practice.
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert("dtw".to_string(), RubricEntry { weight: 0.40, tolerance: 0.01 });
        entries.insert("frechet".to_string(), RubricEntry { weight: 0.10, tolerance: 0.12 });
        entries.insert("size".to_string(), RubricEntry { weight: 0.20, tolerance: 0.15 });
        entries.insert("curvature".to_string(), RubricEntry { weight: 0.10, tolerance: 1.0 });
        entries.insert("start_angle".to_string(), RubricEntry { weight: 0.05, tolerance: 0.6 });
        entries.insert("end_angle".to_string(), RubricEntry { weight: 0.05, tolerance: 0.6 });
        entries.insert("aspect".to_string(), RubricEntry { weight: 0.05, tolerance: 0.3 });
        entries.insert("proportion".to_string(), RubricEntry { weight: 0.05, tolerance: 0.25 });

        Self {
            entries,
            grade_bands: vec![
                GradeBand { min_score: 0.9, grade: "A".to_string() },
                GradeBand { min_score: 0.8, grade: "B".to_string() },
                GradeBand { min_score: 0.7, grade: "C".to_string() },
                GradeBand { min_score: 0.6, grade: "D".to_string() },
                GradeBand { min_score: 0.0, grade: "F".to_string() },
            ],
        }
    }

    /// Check structural validity. Surfaced at call time so failures are
    /// attributable to configuration, not stroke data.
    pub fn validate(&self) -> crate::Result<()> {
        if self.entries.is_empty() {
            return Err(crate::Error::Config(
                "rubric has no metric entries".to_string(),
            ));
        }
        for (metric, entry) in &self.entries {
            if !entry.weight.is_finite() || entry.weight <= 0.0 {
                return Err(crate::Error::Config(format!(
                    "rubric weight for '{}' must be positive, got {}",
                    metric, entry.weight
                )));
            }
            if !entry.tolerance.is_finite() || entry.tolerance <= 0.0 {
                return Err(crate::Error::Config(format!(
                    "rubric tolerance for '{}' must be positive, got {}",
                    metric, entry.tolerance
                )));
            }
        }
        if self.grade_bands.is_empty() {
            return Err(crate::Error::Config("rubric has no grade bands".to_string()));
        }
        for band in &self.grade_bands {
            if !(0.0..=1.0).contains(&band.min_score) {
                return Err(crate::Error::Config(format!(
                    "grade band '{}' min_score must be in [0, 1], got {}",
                    band.grade, band.min_score
                )));
            }
        }
        for w in self.grade_bands.windows(2) {
            if w[1].min_score >= w[0].min_score {
                return Err(crate::Error::Config(format!(
                    "grade bands must be strictly descending ('{}' >= '{}')",
                    w[1].grade, w[0].grade
                )));
            }
        }
        Ok(())
    }

    /// Grade for a score: the first band whose threshold the score
    /// meets, or the lowest band's grade
    pub fn grade_for(&self, score: f64) -> &str {
        self.grade_bands
            .iter()
            .find(|band| score >= band.min_score)
            .or_else(|| self.grade_bands.last())
            .map(|band| band.grade.as_str())
            .unwrap_or("F")
    }

    /// Parse a rubric from TOML
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let rubric: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        rubric.validate()?;
        Ok(rubric)
    }

    /// Load a rubric file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Generate the TOML representation
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}

impl Default for Rubric {
    fn default() -> Self {
        Self::standard()
    }
}
