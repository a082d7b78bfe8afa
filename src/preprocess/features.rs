//! Geometric Feature Extraction
//!
//! Computes a fixed-size feature vector from a normalized stroke. The
//! field order is versioned: anything comparing or classifying on the
//! array form must agree on [`FEATURE_VECTOR_VERSION`].
//!
//! Degenerate-case policy: a stroke with fewer than 2 points has zero
//! length/angle features, and a stroke with fewer than 3 points has zero
//! curvature statistics. Single-segment lines are valid Gregg
//! primitives, so these are reported as zeros rather than errors.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::model::stroke::Stroke;

/// Version of the feature vector layout
pub const FEATURE_VECTOR_VERSION: u32 = 1;

/// Feature names in array order
pub const FEATURE_NAMES: [&str; 14] = [
    "bbox_width",
    "bbox_height",
    "aspect_ratio",
    "arc_length",
    "start_angle",
    "end_angle",
    "curvature_mean",
    "curvature_max",
    "curvature_std",
    "pressure_mean",
    "pressure_std",
    "speed_mean",
    "speed_std",
    "height_width_ratio",
];

/// Fixed-order geometric feature vector for a single stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Bounding box width
    pub bbox_width: f64,
    /// Bounding box height
    pub bbox_height: f64,
    /// Width / height (0 when height is degenerate)
    pub aspect_ratio: f64,
    /// Sum of consecutive point-to-point distances
    pub arc_length: f64,
    /// Tangent direction of the first point pair (radians)
    pub start_angle: f64,
    /// Tangent direction of the last point pair (radians)
    pub end_angle: f64,
    /// Mean signed turning angle over interior points
    pub curvature_mean: f64,
    /// Largest absolute turning angle
    pub curvature_max: f64,
    /// Population standard deviation of signed turning angles
    pub curvature_std: f64,
    pub pressure_mean: f64,
    pub pressure_std: f64,
    pub speed_mean: f64,
    pub speed_std: f64,
    /// Height / width (0 when width is degenerate)
    pub height_width_ratio: f64,
}

impl FeatureVector {
    /// Flatten to the versioned array order of [`FEATURE_NAMES`]
    pub fn to_array(&self) -> [f64; 14] {
        [
            self.bbox_width,
            self.bbox_height,
            self.aspect_ratio,
            self.arc_length,
            self.start_angle,
            self.end_angle,
            self.curvature_mean,
            self.curvature_max,
            self.curvature_std,
            self.pressure_mean,
            self.pressure_std,
            self.speed_mean,
            self.speed_std,
            self.height_width_ratio,
        ]
    }

    /// Look up a feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|&n| n == name)
            .map(|i| self.to_array()[i])
    }
}

/// Extract the feature vector from a normalized stroke.
///
/// Pure and O(length); never divides by zero on degenerate strokes.
pub fn extract_features(stroke: &Stroke) -> FeatureVector {
    let (x0, y0, x1, y1) = stroke.bounding_box().unwrap_or((0.0, 0.0, 0.0, 0.0));
    let bbox_width = x1 - x0;
    let bbox_height = y1 - y0;
    let aspect_ratio = if bbox_height > 1e-8 {
        bbox_width / bbox_height
    } else {
        0.0
    };
    let height_width_ratio = if bbox_width > 1e-8 {
        bbox_height / bbox_width
    } else {
        0.0
    };

    let tangents = tangent_angles(stroke);
    let (start_angle, end_angle) = match (tangents.first(), tangents.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => (0.0, 0.0),
    };

    let turns = turning_angles(&tangents);
    let (curvature_mean, curvature_std) = mean_and_std(&turns);
    let curvature_max = turns.iter().fold(0.0, |acc: f64, t| acc.max(t.abs()));

    let pressures: Vec<f64> = stroke.points.iter().map(|p| p.pressure).collect();
    let speeds: Vec<f64> = stroke.points.iter().map(|p| p.speed).collect();
    let (pressure_mean, pressure_std) = mean_and_std(&pressures);
    let (speed_mean, speed_std) = mean_and_std(&speeds);

    FeatureVector {
        bbox_width,
        bbox_height,
        aspect_ratio,
        arc_length: stroke.arc_length(),
        start_angle,
        end_angle,
        curvature_mean,
        curvature_max,
        curvature_std,
        pressure_mean,
        pressure_std,
        speed_mean,
        speed_std,
        height_width_ratio,
    }
}

/// Total absolute curvature of a stroke: the sum of absolute turning
/// angles over interior points. A circle traversed once accumulates
/// roughly 2π; a straight line accumulates 0.
pub fn total_curvature(stroke: &Stroke) -> f64 {
    let tangents = tangent_angles(stroke);
    turning_angles(&tangents).iter().map(|t| t.abs()).sum()
}

/// Signed per-feature relative deviations of `user` from `reference`.
///
/// Denominators below 1e-6 in magnitude fall back to 1.0 so angle and
/// near-zero features stay comparable instead of exploding.
pub fn feature_deviations(
    user: &FeatureVector,
    reference: &FeatureVector,
) -> BTreeMap<String, f64> {
    let user_arr = user.to_array();
    let ref_arr = reference.to_array();

    FEATURE_NAMES
        .iter()
        .zip(user_arr.iter().zip(ref_arr.iter()))
        .map(|(&name, (&u, &r))| {
            let denom = if r.abs() > 1e-6 { r.abs() } else { 1.0 };
            (name.to_string(), (u - r) / denom)
        })
        .collect()
}

/// Wrap an angle difference into [-π, π)
pub fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(2.0 * PI) - PI
}

/// Tangent direction per segment, skipping zero-length steps
fn tangent_angles(stroke: &Stroke) -> Vec<f64> {
    stroke
        .points
        .windows(2)
        .filter(|w| w[0].distance_to(&w[1]) > 1e-12)
        .map(|w| (w[1].y - w[0].y).atan2(w[1].x - w[0].x))
        .collect()
}

/// Signed turning angle between consecutive tangents, wrapped to [-π, π)
fn turning_angles(tangents: &[f64]) -> Vec<f64> {
    tangents
        .windows(2)
        .map(|w| wrap_angle(w[1] - w[0]))
        .collect()
}

/// Population mean and standard deviation; (0, 0) for empty input
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stroke::Point;

    fn make_stroke(coords: &[(f64, f64)]) -> Stroke {
        Stroke::new(
            coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Point::with_timestamp(x, y, i as f64 * 0.01))
                .collect(),
        )
    }

    fn make_circle(n: usize, radius: f64) -> Stroke {
        Stroke::new(
            (0..n)
                .map(|i| {
                    let angle = 2.0 * PI * i as f64 / n as f64;
                    Point::with_timestamp(
                        0.5 + radius * angle.cos(),
                        0.5 + radius * angle.sin(),
                        i as f64 * 0.01,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_horizontal_line_features() {
        let stroke = make_stroke(&[(0.1, 0.5), (0.3, 0.5), (0.5, 0.5)]);
        let features = extract_features(&stroke);

        assert!((features.bbox_width - 0.4).abs() < 1e-12);
        assert_eq!(features.bbox_height, 0.0);
        assert!((features.arc_length - 0.4).abs() < 1e-12);
        assert!(features.start_angle.abs() < 1e-12);
        assert!(features.end_angle.abs() < 1e-12);
        assert_eq!(features.curvature_mean, 0.0);
        assert_eq!(features.curvature_max, 0.0);
    }

    #[test]
    fn test_circle_total_curvature_near_two_pi() {
        let stroke = make_circle(64, 0.3);
        let total = total_curvature(&stroke);
        // Open polyline through 64 circle points turns by ~2π * 62/63
        assert!((total - 2.0 * PI).abs() < 0.25, "total {}", total);
    }

    #[test]
    fn test_ccw_circle_has_positive_mean_curvature() {
        let stroke = make_circle(32, 0.3);
        let features = extract_features(&stroke);
        assert!(features.curvature_mean > 0.0);
    }

    #[test]
    fn test_right_angle_turn() {
        let stroke = make_stroke(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5)]);
        let features = extract_features(&stroke);

        assert!((features.curvature_max - PI / 2.0).abs() < 1e-9);
        assert!((features.end_angle - PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_is_all_zero_geometry() {
        let stroke = make_stroke(&[(0.5, 0.5)]);
        let features = extract_features(&stroke);

        assert_eq!(features.arc_length, 0.0);
        assert_eq!(features.start_angle, 0.0);
        assert_eq!(features.curvature_mean, 0.0);
        assert_eq!(features.curvature_max, 0.0);
        assert_eq!(features.curvature_std, 0.0);
        assert!(!features.to_array().iter().any(|v| v.is_nan()));
    }

    #[test]
    fn test_two_point_stroke_has_zero_curvature() {
        let stroke = make_stroke(&[(0.1, 0.1), (0.4, 0.4)]);
        let features = extract_features(&stroke);

        assert_eq!(features.curvature_mean, 0.0);
        assert_eq!(features.curvature_std, 0.0);
        assert!((features.start_angle - PI / 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_pressure_statistics() {
        let mut stroke = make_stroke(&[(0.1, 0.1), (0.2, 0.1), (0.3, 0.1)]);
        stroke.points[0].pressure = 0.2;
        stroke.points[1].pressure = 0.4;
        stroke.points[2].pressure = 0.6;
        let features = extract_features(&stroke);

        assert!((features.pressure_mean - 0.4).abs() < 1e-9);
        assert!(features.pressure_std > 0.0);
    }

    #[test]
    fn test_array_order_matches_names() {
        let stroke = make_stroke(&[(0.1, 0.1), (0.5, 0.3)]);
        let features = extract_features(&stroke);
        let arr = features.to_array();

        assert_eq!(arr.len(), FEATURE_NAMES.len());
        assert_eq!(features.get("arc_length"), Some(arr[3]));
        assert_eq!(features.get("height_width_ratio"), Some(arr[13]));
        assert_eq!(features.get("unknown"), None);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * PI) - (-PI)).abs() < 1e-12);
        assert!((wrap_angle(PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(-PI / 2.0) - (-PI / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_feature_deviations_identical_are_zero() {
        let stroke = make_stroke(&[(0.1, 0.1), (0.4, 0.2), (0.6, 0.5)]);
        let features = extract_features(&stroke);
        let deviations = feature_deviations(&features, &features);

        assert!(deviations.values().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn test_feature_deviations_signed() {
        let small = extract_features(&make_stroke(&[(0.4, 0.4), (0.5, 0.5)]));
        let large = extract_features(&make_stroke(&[(0.1, 0.1), (0.9, 0.9)]));
        let deviations = feature_deviations(&small, &large);

        // Smaller arc length than reference: negative deviation
        assert!(deviations["arc_length"] < 0.0);
    }
}
