//! Comparison Pipeline End-to-End Tests
//!
//! Exercises the full judge pipeline against curriculum references:
//! near-perfect attempts score high with no feedback, wrong shapes score
//! low with shape feedback, mis-proportioned multi-stroke attempts
//! trigger relative-size feedback, and identical inputs always produce
//! byte-identical results.

use std::f64::consts::PI;

use gregg_coach::{
    Config, CoordinateSpace, CurriculumStore, Point, ReferenceStroke, Stroke, StrokeJudge,
};

// ============================================================================
// Test Helpers
// ============================================================================

/// Points on a circle of radius around (0.5, 0.5), with optional smooth
/// radial jitter (deterministic, amplitude as a fraction of the radius)
fn make_circle(n: usize, radius: f64, jitter_fraction: f64) -> Stroke {
    Stroke::new(
        (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                let r = radius * (1.0 + jitter_fraction * (3.0 * angle).sin());
                Point::with_timestamp(
                    0.5 + r * angle.cos(),
                    0.5 + r * angle.sin(),
                    i as f64 * 0.01,
                )
            })
            .collect(),
    )
}

fn make_line(x0: f64, y0: f64, x1: f64, y1: f64, n: usize) -> Stroke {
    Stroke::new(
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                Point::with_timestamp(x0 + t * (x1 - x0), y0 + t * (y1 - y0), t)
            })
            .collect(),
    )
}

/// Vertical bar of a given height
fn make_bar(x: f64, y: f64, height: f64) -> Stroke {
    make_line(x, y, x, y + height, 12)
}

fn normalized_config() -> Config {
    let mut config = Config::default();
    config.normalize.coordinate_space = CoordinateSpace::Normalized;
    config
}

fn make_judge() -> StrokeJudge {
    let mut curriculum = CurriculumStore::new();
    // Unit 1: the "a" circle and a two-stroke "word" whose second stroke
    // is twice the height of the first
    curriculum.insert_reference(1, ReferenceStroke::new("a", vec![make_circle(16, 0.3, 0.0)]));
    curriculum.insert_reference(
        1,
        ReferenceStroke::new(
            "td",
            vec![make_bar(0.3, 0.4, 0.1), make_bar(0.5, 0.35, 0.2)],
        ),
    );
    StrokeJudge::with_config(curriculum, normalized_config()).unwrap()
}

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_near_perfect_circle_scores_high_with_no_feedback() {
    let judge = make_judge();
    // 16 points on the circle with smooth jitter under 1% of the radius
    let attempt = make_circle(16, 0.3, 0.005);

    let result = judge.compare(&[attempt], 1, "a").unwrap();

    assert!(result.score >= 0.95, "score {}", result.score);
    assert_eq!(result.grade, "A");
    assert!(
        result.feedback.len() <= 1,
        "unexpected feedback: {:?}",
        result.feedback
    );
    assert!(result.metrics.dtw_distance < 0.001);
    assert!((result.metrics.size_ratio - 1.0).abs() < 0.05);
}

#[test]
fn test_straight_line_against_circle_scores_low_with_shape_feedback() {
    let judge = make_judge();
    let attempt = make_line(0.2, 0.5, 0.8, 0.5, 16);

    let result = judge.compare(&[attempt], 1, "a").unwrap();

    assert!(result.score < 0.3, "score {}", result.score);
    assert!(
        result.feedback.iter().any(|f| f.contains("shape")),
        "no shape feedback in {:?}",
        result.feedback
    );
    assert!(result.metrics.curvature_deviation > 1.0);
}

#[test]
fn test_flat_proportions_trigger_relative_size_feedback() {
    let judge = make_judge();
    // Both strokes drawn the same height; the reference doubles the second
    let attempt = vec![make_bar(0.3, 0.4, 0.1), make_bar(0.5, 0.4, 0.1)];

    let result = judge.compare(&attempt, 1, "td").unwrap();

    assert!(
        result.feedback.iter().any(|f| f.contains("relative size")),
        "no proportional feedback in {:?}",
        result.feedback
    );
    assert!(result.proportion_deviations.contains_key("0:1"));
    assert!((result.proportion_deviations["0:1"] - (-0.5)).abs() < 1e-6);
}

#[test]
fn test_correct_proportions_have_no_proportional_deviation() {
    let judge = make_judge();
    let attempt = vec![make_bar(0.3, 0.4, 0.1), make_bar(0.5, 0.35, 0.2)];

    let result = judge.compare(&attempt, 1, "td").unwrap();

    assert!(result.score > 0.95, "score {}", result.score);
    assert!(result.proportion_deviations["0:1"].abs() < 1e-6);
    assert!(result.feedback.is_empty(), "feedback: {:?}", result.feedback);
}

#[test]
fn test_scoring_is_byte_identical_across_calls() {
    let judge = make_judge();
    let attempt = make_circle(16, 0.27, 0.01);

    let first = judge.compare(&[attempt.clone()], 1, "a").unwrap();
    let second = judge.compare(&[attempt], 1, "a").unwrap();

    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_wire_shape_of_result() {
    let judge = make_judge();
    let attempt = make_circle(16, 0.3, 0.01);

    let result = judge.compare(&[attempt], 1, "a").unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    let score = json["score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
    assert!(json["grade"].is_string());
    assert!(json["feedback"].is_array());
    for key in [
        "dtw_distance",
        "frechet_distance",
        "size_ratio",
        "curvature_deviation",
    ] {
        assert!(json["metrics"][key].is_number(), "missing metrics.{}", key);
    }
}

// ============================================================================
// Page-level flow: segment, then compare
// ============================================================================

#[test]
fn test_segment_page_then_compare() {
    let judge = make_judge();

    // Two bars written left to right with a pen lift between them
    let mut page: Vec<Point> = Vec::new();
    for i in 0..12 {
        let t = i as f64 / 11.0;
        page.push(Point::with_timestamp(0.3, 0.4 + 0.1 * t, t * 0.11));
    }
    for i in 0..12 {
        let t = i as f64 / 11.0;
        page.push(Point::with_timestamp(0.5, 0.35 + 0.2 * t, 0.2 + t * 0.11));
    }

    let segments = judge.segment_page(&page);
    assert_eq!(segments.len(), 2);

    let strokes: Vec<Stroke> = segments.into_iter().map(|s| s.into_stroke()).collect();
    let result = judge.compare(&strokes, 1, "td").unwrap();
    assert!(result.score > 0.9, "score {}", result.score);
}
