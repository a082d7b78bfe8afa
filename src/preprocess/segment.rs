//! Page Segmentation
//!
//! Splits a raw page-level point stream into candidate glyph attempts.
//! Two interchangeable strategies: gap-based splitting on spatial or
//! temporal discontinuities, and grid-based assignment for practice
//! sheets with a known fixed layout. Both are fully deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::stroke::{Point, Segment};

/// Default spatial gap threshold (normalized units, 5% of page width)
pub const DEFAULT_SPATIAL_GAP: f64 = 0.05;
/// Default temporal gap threshold (multiples of the nominal sample interval)
pub const DEFAULT_TEMPORAL_GAP_SAMPLES: f64 = 3.0;

/// Segmentation strategy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SegmentStrategy {
    /// Start a new segment whenever the spatial gap (normalized units)
    /// or the temporal gap (multiples of the stream's nominal sampling
    /// interval) since the previous point exceeds its threshold.
    Gap {
        spatial_gap: f64,
        temporal_gap_samples: f64,
    },
    /// Assign each point to the grid cell containing it; one segment
    /// per occupied cell, in row-major order.
    Grid { rows: usize, cols: usize },
}

impl Default for SegmentStrategy {
    fn default() -> Self {
        SegmentStrategy::Gap {
            spatial_gap: DEFAULT_SPATIAL_GAP,
            temporal_gap_samples: DEFAULT_TEMPORAL_GAP_SAMPLES,
        }
    }
}

/// Page segmentation engine
#[derive(Debug, Clone)]
pub struct Segmenter {
    /// Strategy and its thresholds
    pub strategy: SegmentStrategy,
    /// Runs shorter than this are dropped as noise
    pub min_points: usize,
}

impl Segmenter {
    /// Create with default gap thresholds
    pub fn new() -> Self {
        Self {
            strategy: SegmentStrategy::default(),
            min_points: 1,
        }
    }

    pub fn with_strategy(strategy: SegmentStrategy) -> Self {
        Self {
            strategy,
            min_points: 1,
        }
    }

    pub fn min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points.max(1);
        self
    }

    /// Split a page point stream into glyph-attempt segments.
    ///
    /// Points are expected in capture order with normalized coordinates.
    pub fn segment(&self, points: &[Point]) -> Vec<Segment> {
        let segments = match self.strategy {
            SegmentStrategy::Gap {
                spatial_gap,
                temporal_gap_samples,
            } => self.segment_by_gap(points, spatial_gap, temporal_gap_samples),
            SegmentStrategy::Grid { rows, cols } => self.segment_by_grid(points, rows, cols),
        };
        debug!(
            "segmented {} points into {} runs (min_points {})",
            points.len(),
            segments.len(),
            self.min_points
        );
        segments
    }

    fn segment_by_gap(
        &self,
        points: &[Point],
        spatial_gap: f64,
        temporal_gap_samples: f64,
    ) -> Vec<Segment> {
        if points.is_empty() {
            return vec![];
        }

        let nominal_interval = median_interval(points);
        let temporal_gap = if nominal_interval > 0.0 {
            temporal_gap_samples * nominal_interval
        } else {
            f64::INFINITY
        };

        let mut segments = Vec::new();
        let mut current = vec![points[0]];

        for pair in points.windows(2) {
            let spatial = pair[0].distance_to(&pair[1]);
            let temporal = pair[1].timestamp - pair[0].timestamp;

            if spatial > spatial_gap || temporal > temporal_gap {
                self.push_run(&mut segments, std::mem::take(&mut current));
            }
            current.push(pair[1]);
        }
        self.push_run(&mut segments, current);

        segments
    }

    fn segment_by_grid(&self, points: &[Point], rows: usize, cols: usize) -> Vec<Segment> {
        if points.is_empty() || rows == 0 || cols == 0 {
            return vec![];
        }

        let row_height = 1.0 / rows as f64;
        let col_width = 1.0 / cols as f64;

        // BTreeMap keys give row-major (row, col) emission order.
        let mut cells: BTreeMap<(usize, usize), Vec<Point>> = BTreeMap::new();
        for p in points {
            let row = ((p.y / row_height) as usize).min(rows - 1);
            let col = ((p.x / col_width) as usize).min(cols - 1);
            cells.entry((row, col)).or_default().push(*p);
        }

        cells
            .into_iter()
            .filter(|(_, pts)| pts.len() >= self.min_points)
            .map(|((row, col), pts)| Segment::in_cell(pts, row, col))
            .collect()
    }

    fn push_run(&self, segments: &mut Vec<Segment>, run: Vec<Point>) {
        if run.len() >= self.min_points {
            segments.push(Segment::new(run));
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Median interval between consecutive timestamps, 0.0 when undefined.
///
/// Used as the nominal sampling interval so the temporal gap threshold
/// can be expressed in sample counts regardless of device sample rate.
fn median_interval(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let mut deltas: Vec<f64> = points
        .windows(2)
        .map(|w| w[1].timestamp - w[0].timestamp)
        .collect();
    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    deltas[deltas.len() / 2]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_point(x: f64, y: f64, t: f64) -> Point {
        Point::with_timestamp(x, y, t)
    }

    /// A run of `n` points stepping right from (x, y), 10ms apart
    fn make_run(x: f64, y: f64, t0: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|i| make_point(x + i as f64 * 0.005, y, t0 + i as f64 * 0.01))
            .collect()
    }

    #[test]
    fn test_empty_stream() {
        let segmenter = Segmenter::new();
        assert!(segmenter.segment(&[]).is_empty());
    }

    #[test]
    fn test_single_run_stays_whole() {
        let segmenter = Segmenter::new();
        let points = make_run(0.1, 0.5, 0.0, 10);
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 10);
    }

    #[test]
    fn test_spatial_gap_splits() {
        let segmenter = Segmenter::new();
        let mut points = make_run(0.1, 0.5, 0.0, 5);
        // Jump across the page, timestamps still contiguous
        points.extend(make_run(0.7, 0.5, 0.05, 5));
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].len(), 5);
        assert_eq!(segments[1].len(), 5);
    }

    #[test]
    fn test_temporal_gap_splits() {
        let segmenter = Segmenter::with_strategy(SegmentStrategy::Gap {
            spatial_gap: 1.0, // spatial splitting effectively off
            temporal_gap_samples: 3.0,
        });
        let mut points = make_run(0.1, 0.5, 0.0, 8);
        // Pen lifted for 0.5s, then continues nearby
        points.extend(make_run(0.15, 0.5, 0.58, 8));
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 2);
    }

    #[test]
    fn test_uniform_timestamps_disable_temporal_splitting() {
        let segmenter = Segmenter::new();
        let points: Vec<Point> = (0..6).map(|i| make_point(0.1 + i as f64 * 0.005, 0.5, 0.0)).collect();
        // All timestamps equal: only spatial gaps can split
        let segments = segmenter.segment(&points);
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_min_points_drops_noise() {
        let segmenter = Segmenter::new().min_points(3);
        let mut points = make_run(0.1, 0.5, 0.0, 6);
        // A lone stray sample far from everything
        points.push(make_point(0.9, 0.9, 0.2));
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 6);
    }

    #[test]
    fn test_grid_assignment_row_major() {
        let segmenter = Segmenter::with_strategy(SegmentStrategy::Grid { rows: 2, cols: 2 });
        let points = vec![
            make_point(0.75, 0.75, 0.0), // bottom-right cell
            make_point(0.25, 0.25, 0.01), // top-left cell
            make_point(0.30, 0.20, 0.02), // top-left cell
        ];
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].cell, Some((0, 0)));
        assert_eq!(segments[0].len(), 2);
        assert_eq!(segments[1].cell, Some((1, 1)));
    }

    #[test]
    fn test_grid_clamps_boundary_points() {
        let segmenter = Segmenter::with_strategy(SegmentStrategy::Grid { rows: 4, cols: 4 });
        let points = vec![make_point(1.0, 1.0, 0.0)];
        let segments = segmenter.segment(&points);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].cell, Some((3, 3)));
    }

    #[test]
    fn test_deterministic_output() {
        let segmenter = Segmenter::new();
        let mut points = make_run(0.1, 0.2, 0.0, 12);
        points.extend(make_run(0.6, 0.8, 0.3, 7));

        let first = segmenter.segment(&points);
        let second = segmenter.segment(&points);
        assert_eq!(first, second);
    }
}
