//! Stroke Judge
//!
//! The comparison pipeline exposed to callers: validate, normalize,
//! align, analyze proportions, and compose the scored result. Pure and
//! synchronous; callers bound latency by the configured resample
//! length, which caps the O(n·m) alignment work.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::align::dtw::dtw;
use crate::align::frechet::frechet_distance;
use crate::app::config::Config;
use crate::feedback::comparison::{ComparisonResult, MetricsSummary};
use crate::feedback::composer::{compose, DeviationReport};
use crate::feedback::proportion::ProportionAnalyzer;
use crate::feedback::rubric::Rubric;
use crate::model::reference::CurriculumStore;
use crate::model::stroke::{Point, Segment, Stroke};
use crate::preprocess::features::{
    extract_features, feature_deviations, total_curvature, wrap_angle, FEATURE_NAMES,
};
use crate::preprocess::normalize::{CoordinateSpace, Normalizer};

/// Comparison pipeline over a curriculum store
#[derive(Debug, Clone)]
pub struct StrokeJudge {
    config: Config,
    curriculum: CurriculumStore,
}

impl StrokeJudge {
    /// Create a judge with the default configuration
    pub fn new(curriculum: CurriculumStore) -> Self {
        Self {
            config: Config::default(),
            curriculum,
        }
    }

    /// Create a judge with an explicit configuration.
    ///
    /// The configuration is validated here so failures are attributable
    /// to setup rather than to a later comparison call.
    pub fn with_config(curriculum: CurriculumStore, config: Config) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self { config, curriculum })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Split a raw page point stream into candidate glyph attempts
    /// using the configured strategy.
    pub fn segment_page(&self, points: &[Point]) -> Vec<Segment> {
        self.config.segmenter().segment(points)
    }

    /// Compare a user's stroke attempt against the reference registered
    /// for (unit, label).
    ///
    /// Multi-stroke attempts are compared stroke-by-stroke in order and
    /// additionally go through cross-stroke proportional analysis, since
    /// Gregg letters are distinguished by relative size between strokes.
    pub fn compare(
        &self,
        strokes: &[Stroke],
        unit: u32,
        label: &str,
    ) -> crate::Result<ComparisonResult> {
        if strokes.is_empty() {
            return Err(crate::Error::Validation(
                "no strokes supplied for comparison".to_string(),
            ));
        }
        for (i, stroke) in strokes.iter().enumerate() {
            stroke.validate(i)?;
        }

        let reference = self.curriculum.reference(unit, label).ok_or_else(|| {
            crate::Error::Validation(format!(
                "unknown reference label '{}' for unit {}",
                label, unit
            ))
        })?;
        if strokes.len() != reference.strokes.len() {
            return Err(crate::Error::Validation(format!(
                "attempt has {} strokes but reference '{}' has {}",
                strokes.len(),
                label,
                reference.strokes.len()
            )));
        }

        let rubric = self
            .curriculum
            .rubric(unit)
            .cloned()
            .unwrap_or_else(Rubric::standard);
        rubric.validate()?;

        let target_len = self.config.normalize.resample_len;
        let user_normalizer = self.config.normalizer();
        let ref_normalizer = Normalizer::with_space(CoordinateSpace::Normalized);

        let user: Vec<Stroke> = strokes
            .iter()
            .map(|s| prepare(&user_normalizer, s, target_len))
            .collect::<crate::Result<_>>()?;
        let refs: Vec<Stroke> = reference
            .strokes
            .iter()
            .map(|s| prepare(&ref_normalizer, s, target_len))
            .collect::<crate::Result<_>>()?;
        debug!(
            "prepared {} stroke pair(s) at resample length {}",
            user.len(),
            target_len
        );

        // Per-pair alignment and features
        let pairs = user.len();
        let mut dtw_total = 0.0;
        let mut frechet_sum = 0.0;
        let mut size_ratio_sum = 0.0;
        let mut curvature_signed_sum = 0.0;
        let mut curvature_abs_sum = 0.0;
        let mut start_angle_sum = 0.0;
        let mut end_angle_sum = 0.0;
        let mut aspect_sum = 0.0;
        let mut feature_sums: BTreeMap<String, f64> = FEATURE_NAMES
            .iter()
            .map(|&n| (n.to_string(), 0.0))
            .collect();
        let mut worst_alignment: Option<crate::align::dtw::DtwAlignment> = None;

        for (u, r) in user.iter().zip(refs.iter()) {
            let alignment = dtw(&u.points, &r.points)?;
            frechet_sum += frechet_distance(&u.points, &r.points)?;

            let fu = extract_features(u);
            let fr = extract_features(r);

            let ref_diag = r.bbox_diagonal();
            size_ratio_sum += if ref_diag > 1e-8 {
                u.bbox_diagonal() / ref_diag
            } else {
                1.0
            };

            let curvature_diff = total_curvature(u) - total_curvature(r);
            curvature_signed_sum += curvature_diff;
            curvature_abs_sum += curvature_diff.abs();

            start_angle_sum += wrap_angle(fu.start_angle - fr.start_angle);
            end_angle_sum += wrap_angle(fu.end_angle - fr.end_angle);
            let aspect_denom = if fr.aspect_ratio.abs() > 1e-6 {
                fr.aspect_ratio.abs()
            } else {
                1.0
            };
            aspect_sum += (fu.aspect_ratio - fr.aspect_ratio) / aspect_denom;

            for (name, deviation) in feature_deviations(&fu, &fr) {
                *feature_sums.entry(name).or_insert(0.0) += deviation;
            }

            dtw_total += alignment.distance;
            let is_worst = worst_alignment
                .as_ref()
                .map_or(true, |w| alignment.distance > w.distance);
            if is_worst {
                worst_alignment = Some(alignment);
            }
        }

        let n = pairs as f64;
        let dtw_mean = dtw_total / n;
        let frechet_mean = frechet_sum / n;
        let size_ratio_mean = size_ratio_sum / n;
        let curvature_dev_mean = curvature_abs_sum / n;

        let mut values: BTreeMap<String, f64> = BTreeMap::new();
        values.insert("dtw".to_string(), dtw_mean);
        values.insert("frechet".to_string(), frechet_mean);
        values.insert("size".to_string(), size_ratio_mean - 1.0);
        values.insert("curvature".to_string(), curvature_signed_sum / n);
        values.insert("start_angle".to_string(), start_angle_sum / n);
        values.insert("end_angle".to_string(), end_angle_sum / n);
        values.insert("aspect".to_string(), aspect_sum / n);

        // Cross-stroke proportions only exist for multi-stroke attempts
        let analyzer = ProportionAnalyzer::new(self.config.proportion.size_metric);
        let proportion = analyzer.analyze(&user, &refs)?;
        if proportion.has_pairs() {
            values.insert("proportion".to_string(), proportion.max_deviation);
        }

        let report = DeviationReport {
            values,
            shape_region: worst_alignment.as_ref().map(|a| a.worst_region()),
        };
        let composed = compose(&rubric, &report, &reference.tolerances)?;

        let feature_deviation_means: BTreeMap<String, f64> = feature_sums
            .into_iter()
            .map(|(name, sum)| (name, sum / n))
            .collect();

        info!(
            "compared {} stroke(s) against '{}' (unit {}): score {:.3}, grade {}",
            pairs, label, unit, composed.score, composed.grade
        );

        Ok(ComparisonResult {
            score: composed.score,
            grade: composed.grade,
            feedback: composed.feedback,
            metrics: MetricsSummary {
                dtw_distance: dtw_mean,
                frechet_distance: frechet_mean,
                size_ratio: size_ratio_mean,
                curvature_deviation: curvature_dev_mean,
            },
            feature_deviations: feature_deviation_means,
            proportion_deviations: proportion.pair_deviations,
        })
    }
}

/// Normalize and resample one stroke for comparison.
///
/// Strokes with zero spatial extent (dots) are valid input but cannot be
/// interpolated, so they bypass resampling instead of erroring.
fn prepare(normalizer: &Normalizer, stroke: &Stroke, target_len: usize) -> crate::Result<Stroke> {
    let normalized = normalizer.normalize(stroke);
    if normalized.has_spatial_extent() {
        normalizer.resample(&normalized, target_len)
    } else {
        Ok(normalized)
    }
}
