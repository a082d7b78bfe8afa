//! Feedback Composition
//!
//! Deterministic mapping from metric deviations to a weighted score, a
//! grade, and ordered feedback text. Templates live in a single lookup
//! keyed by (metric, deviation sign) rather than branching scattered
//! through the composer, so the mapping stays exhaustive and testable.
//! No free-text generation: identical inputs always produce identical
//! output.

use std::collections::BTreeMap;

use crate::align::dtw::PathRegion;
use crate::feedback::rubric::Rubric;
use crate::model::reference::ToleranceBand;

/// Signed metric deviations plus the shape-localization hint
#[derive(Debug, Clone, Default)]
pub struct DeviationReport {
    /// Signed deviation per metric name. Magnitude drives scoring;
    /// sign selects the feedback template direction.
    pub values: BTreeMap<String, f64>,
    /// Path third where DTW found the largest divergence
    pub shape_region: Option<PathRegion>,
}

/// Composed scoring output
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    /// Weighted score in [0, 1]
    pub score: f64,
    /// Grade from the rubric's bands
    pub grade: String,
    /// Feedback statements, most impactful first
    pub feedback: Vec<String>,
}

/// Compose score, grade, and feedback from a deviation report.
///
/// `overrides` are reference-supplied per-metric tolerance bands; when
/// present for a metric they replace the rubric tolerance, direction by
/// direction. Metrics in the report without a rubric entry are skipped
/// (rubrics may be partial during curriculum rollout). Rubric and band
/// structure are validated here, at call time.
pub fn compose(
    rubric: &Rubric,
    report: &DeviationReport,
    overrides: &BTreeMap<String, ToleranceBand>,
) -> crate::Result<Composed> {
    rubric.validate()?;
    for (metric, band) in overrides {
        band.validate(metric)?;
    }

    let mut weight_sum = 0.0;
    let mut penalty_sum = 0.0;
    // (impact, metric, deviation) for metrics past their tolerance
    let mut exceeded: Vec<(f64, &str, f64)> = Vec::new();

    for (metric, &deviation) in &report.values {
        let Some(entry) = rubric.entries.get(metric) else {
            continue;
        };

        let tolerance = match overrides.get(metric) {
            Some(band) => {
                if deviation >= 0.0 {
                    band.max
                } else {
                    -band.min
                }
            }
            None => entry.tolerance,
        };

        let normalized = if tolerance > 0.0 {
            (deviation.abs() / tolerance).clamp(0.0, 1.0)
        } else if deviation.abs() > 0.0 {
            // One-sided band: any deviation on this side saturates
            1.0
        } else {
            0.0
        };

        weight_sum += entry.weight;
        penalty_sum += entry.weight * normalized;

        if deviation.abs() > tolerance {
            exceeded.push((entry.weight * normalized, metric.as_str(), deviation));
        }
    }

    let score = if weight_sum > 0.0 {
        (1.0 - penalty_sum / weight_sum).clamp(0.0, 1.0)
    } else {
        1.0
    };

    // Most impactful issue first; metric name breaks ties so the
    // ordering is total.
    exceeded.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(b.1))
    });

    let feedback = exceeded
        .iter()
        .map(|&(_, metric, deviation)| render_template(metric, deviation, report.shape_region))
        .collect();

    Ok(Composed {
        score,
        grade: rubric.grade_for(score).to_string(),
        feedback,
    })
}

/// Fill the template for (metric, deviation sign).
///
/// Unknown metrics get a deterministic generic template so custom rubric
/// entries still surface actionable text.
fn render_template(metric: &str, deviation: f64, region: Option<PathRegion>) -> String {
    let too_large = deviation >= 0.0;
    match metric {
        "dtw" => {
            let region = region.unwrap_or(PathRegion::Middle);
            format!(
                "The {} of your stroke drifts from the reference shape — trace the reference a few times and watch that section.",
                region.as_str()
            )
        }
        "frechet" => "Part of your stroke swings wide of the reference shape — keep the whole motion closer to the model.".to_string(),
        "size" => {
            if too_large {
                format!(
                    "Your stroke is too large — aim for about {:.0}% smaller.",
                    deviation * 100.0
                )
            } else {
                format!(
                    "Your stroke is too small — aim for about {:.0}% larger.",
                    -deviation * 100.0
                )
            }
        }
        "curvature" => {
            if too_large {
                "Your stroke curves too sharply — ease off and follow the reference arc.".to_string()
            } else {
                "Your curve is too shallow — deepen the arc to match the reference.".to_string()
            }
        }
        "start_angle" => {
            if too_large {
                "Your entry angle is too steep — flatten the start of the stroke.".to_string()
            } else {
                "Your entry angle is too shallow — steepen the start of the stroke.".to_string()
            }
        }
        "end_angle" => {
            if too_large {
                "Your exit angle is too steep — flatten the finish of the stroke.".to_string()
            } else {
                "Your exit angle is too shallow — steepen the finish of the stroke.".to_string()
            }
        }
        "aspect" => {
            if too_large {
                "Your stroke is too wide for its height — match the reference proportions.".to_string()
            } else {
                "Your stroke is too tall for its width — match the reference proportions.".to_string()
            }
        }
        "proportion" => {
            if too_large {
                "The relative size of your strokes is off — the later stroke should be smaller next to its neighbor.".to_string()
            } else {
                "The relative size of your strokes is off — the later stroke should be larger next to its neighbor.".to_string()
            }
        }
        other => format!(
            "Your {} is off by {:+.0}% — check the reference and adjust.",
            other,
            deviation * 100.0
        ),
    }
}
