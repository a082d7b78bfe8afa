//! Stroke Data Model
//!
//! Points are ordered by capture time within a stroke; no two points share
//! a timestamp. A stroke is immutable once constructed by the
//! normalization/segmentation stage and is treated as a value downstream.

use serde::{Deserialize, Serialize};

/// Tablet pen types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenType {
    Ballpoint,
    Marker,
    #[default]
    Fineliner,
    Pencil,
    MechanicalPencil,
    Brush,
    Highlighter,
    Eraser,
    Calligraphy,
}

/// Tablet stroke colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeColor {
    #[default]
    Black,
    Grey,
    White,
}

/// A single pen sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate (device units raw, [0, 1] after normalization)
    pub x: f64,
    /// Vertical coordinate (device units raw, [0, 1] after normalization)
    pub y: f64,
    /// Pen pressure in [0, 1]
    #[serde(default)]
    pub pressure: f64,
    /// Stylus tilt angle (radians)
    #[serde(default)]
    pub tilt: f64,
    /// Stylus velocity (device units, >= 0)
    #[serde(default)]
    pub speed: f64,
    /// Tangent angle (radians)
    #[serde(default)]
    pub direction: f64,
    /// Effective brush width (>= 0)
    #[serde(default)]
    pub width: f64,
    /// Time offset from stroke start (seconds)
    #[serde(default)]
    pub timestamp: f64,
}

impl Point {
    /// Create a point at a position, all other attributes zeroed
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            pressure: 0.0,
            tilt: 0.0,
            speed: 0.0,
            direction: 0.0,
            width: 0.0,
            timestamp: 0.0,
        }
    }

    /// Create a point at a position with a capture timestamp
    pub fn with_timestamp(x: f64, y: f64, timestamp: f64) -> Self {
        Self {
            timestamp,
            ..Self::new(x, y)
        }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered, non-empty sequence of pen samples plus pen metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    #[serde(default)]
    pub pen_type: PenType,
    #[serde(default)]
    pub color: StrokeColor,
}

impl Stroke {
    /// Create a stroke with default pen metadata
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            pen_type: PenType::default(),
            color: StrokeColor::default(),
        }
    }

    /// Number of samples in the stroke
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the stroke covers any spatial extent at all. A single
    /// point, or all points at the same coordinates (a dot), does not.
    pub fn has_spatial_extent(&self) -> bool {
        match self.points.first() {
            Some(first) => self
                .points
                .iter()
                .any(|p| p.distance_to(first) > f64::EPSILON),
            None => false,
        }
    }

    /// Axis-aligned bounding box as (min_x, min_y, max_x, max_y)
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        let first = self.points.first()?;
        let mut bbox = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            bbox.0 = bbox.0.min(p.x);
            bbox.1 = bbox.1.min(p.y);
            bbox.2 = bbox.2.max(p.x);
            bbox.3 = bbox.3.max(p.y);
        }
        Some(bbox)
    }

    /// Bounding box width
    pub fn width(&self) -> f64 {
        self.bounding_box().map_or(0.0, |(x0, _, x1, _)| x1 - x0)
    }

    /// Bounding box height
    pub fn height(&self) -> f64 {
        self.bounding_box().map_or(0.0, |(_, y0, _, y1)| y1 - y0)
    }

    /// Bounding box diagonal length
    pub fn bbox_diagonal(&self) -> f64 {
        self.bounding_box().map_or(0.0, |(x0, y0, x1, y1)| {
            let dx = x1 - x0;
            let dy = y1 - y0;
            (dx * dx + dy * dy).sqrt()
        })
    }

    /// Total path length: sum of consecutive point-to-point distances
    pub fn arc_length(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }

    /// Check the stroke invariants for use as comparison input.
    ///
    /// `index` identifies the stroke within the caller's attempt so the
    /// error is actionable without a debugger.
    pub fn validate(&self, index: usize) -> crate::Result<()> {
        if self.points.is_empty() {
            return Err(crate::Error::Validation(format!(
                "stroke {} has no points",
                index
            )));
        }
        for (i, w) in self.points.windows(2).enumerate() {
            if w[1].timestamp <= w[0].timestamp {
                return Err(crate::Error::Validation(format!(
                    "stroke {} has non-monotonic timestamps at sample {} ({} -> {})",
                    index,
                    i + 1,
                    w[0].timestamp,
                    w[1].timestamp
                )));
            }
        }
        Ok(())
    }
}

/// A maximal run of raw page points assigned to one glyph attempt.
///
/// Produced by the segmenter, consumed by the normalizer. A page's
/// segments partition (but need not cover) its raw points; runs deemed
/// noise are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Points in this run, in capture order
    pub points: Vec<Point>,
    /// Grid cell (row, col) when produced by the grid strategy
    pub cell: Option<(usize, usize)>,
}

impl Segment {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points, cell: None }
    }

    pub fn in_cell(points: Vec<Point>, row: usize, col: usize) -> Self {
        Self {
            points,
            cell: Some((row, col)),
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Promote the segment to a stroke with default pen metadata
    pub fn into_stroke(self) -> Stroke {
        Stroke::new(self.points)
    }
}
