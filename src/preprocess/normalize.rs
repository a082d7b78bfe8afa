//! Coordinate Normalization & Resampling
//!
//! Maps raw device-unit coordinates into the canonical [0, 1] space and
//! optionally resamples strokes to a fixed length. Resampling is
//! parameterized by arc length, not capture time: writing speed is
//! non-uniform, and arc-length spacing is what keeps shape fidelity when
//! two strokes of different sample density are aligned.

use serde::{Deserialize, Serialize};

use crate::model::stroke::{Point, Stroke};

/// Tablet display width in device units
pub const DEVICE_WIDTH: f64 = 1404.0;
/// Tablet display height in device units
pub const DEVICE_HEIGHT: f64 = 1872.0;

/// Declares which coordinate space incoming strokes use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Raw device units (0-1404 x 0-1872)
    #[default]
    Device,
    /// Already normalized to [0, 1]
    Normalized,
}

/// Coordinate normalizer
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Coordinate space of incoming strokes
    pub space: CoordinateSpace,
    /// Device width used for the Device space mapping
    pub device_width: f64,
    /// Device height used for the Device space mapping
    pub device_height: f64,
}

impl Normalizer {
    /// Create a normalizer for raw device coordinates
    pub fn new() -> Self {
        Self {
            space: CoordinateSpace::Device,
            device_width: DEVICE_WIDTH,
            device_height: DEVICE_HEIGHT,
        }
    }

    /// Create a normalizer for a declared coordinate space
    pub fn with_space(space: CoordinateSpace) -> Self {
        Self {
            space,
            ..Self::new()
        }
    }

    /// Map a stroke into [0, 1] coordinates.
    ///
    /// Device coordinates are divided by the device bounds; both spaces
    /// are clamped against sensor noise producing slightly out-of-range
    /// values.
    pub fn normalize(&self, stroke: &Stroke) -> Stroke {
        let points = stroke
            .points
            .iter()
            .map(|p| {
                let (x, y) = match self.space {
                    CoordinateSpace::Device => {
                        (p.x / self.device_width, p.y / self.device_height)
                    }
                    CoordinateSpace::Normalized => (p.x, p.y),
                };
                Point {
                    x: x.clamp(0.0, 1.0),
                    y: y.clamp(0.0, 1.0),
                    ..*p
                }
            })
            .collect();
        Stroke {
            points,
            pen_type: stroke.pen_type,
            color: stroke.color,
        }
    }

    /// Resample a stroke to exactly `target_len` points using
    /// arc-length-parameterized linear interpolation.
    ///
    /// Position, pressure, and the remaining continuous channels are
    /// interpolated; `direction` is recomputed from the local tangent.
    /// Zero-length steps are collapsed first so resampled timestamps
    /// stay strictly increasing.
    ///
    /// Fails with [`crate::Error::DegenerateGeometry`] when the stroke
    /// has zero spatial extent and `target_len > 1` is requested;
    /// callers must special-case single-point strokes (dots) before
    /// asking for resampling.
    pub fn resample(&self, stroke: &Stroke, target_len: usize) -> crate::Result<Stroke> {
        if target_len == 0 {
            return Err(crate::Error::Config(
                "resample target length must be >= 1".to_string(),
            ));
        }
        if stroke.points.is_empty() {
            return Err(crate::Error::Validation(
                "cannot resample an empty stroke".to_string(),
            ));
        }

        // Collapse zero-length steps so arc length increases strictly.
        let mut pts: Vec<Point> = Vec::with_capacity(stroke.points.len());
        for p in &stroke.points {
            let distinct = pts
                .last()
                .map_or(true, |last: &Point| last.distance_to(p) > 1e-12);
            if distinct {
                pts.push(*p);
            }
        }

        if target_len == 1 {
            return Ok(Stroke {
                points: vec![pts[0]],
                pen_type: stroke.pen_type,
                color: stroke.color,
            });
        }
        if pts.len() < 2 {
            return Err(crate::Error::DegenerateGeometry(format!(
                "cannot resample a stroke with zero spatial extent ({} samples) to {} points",
                stroke.len(),
                target_len
            )));
        }

        // Cumulative arc length per retained sample
        let mut cumulative: Vec<f64> = Vec::with_capacity(pts.len());
        cumulative.push(0.0);
        for w in pts.windows(2) {
            let last = *cumulative.last().expect("non-empty");
            cumulative.push(last + w[0].distance_to(&w[1]));
        }
        let total = *cumulative.last().expect("non-empty");

        let mut out: Vec<Point> = Vec::with_capacity(target_len);
        let mut seg = 1;
        for i in 0..target_len {
            if i == target_len - 1 {
                let last = pts[pts.len() - 1];
                let prev = pts[pts.len() - 2];
                out.push(Point {
                    direction: (last.y - prev.y).atan2(last.x - prev.x),
                    ..last
                });
                break;
            }
            let target = total * i as f64 / (target_len - 1) as f64;
            while seg < pts.len() - 1 && cumulative[seg] < target {
                seg += 1;
            }
            let span = cumulative[seg] - cumulative[seg - 1];
            let t = if span > 0.0 {
                ((target - cumulative[seg - 1]) / span).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let a = pts[seg - 1];
            let b = pts[seg];
            out.push(Point {
                x: lerp(a.x, b.x, t),
                y: lerp(a.y, b.y, t),
                pressure: lerp(a.pressure, b.pressure, t),
                tilt: lerp(a.tilt, b.tilt, t),
                speed: lerp(a.speed, b.speed, t),
                direction: (b.y - a.y).atan2(b.x - a.x),
                width: lerp(a.width, b.width, t),
                timestamp: lerp(a.timestamp, b.timestamp, t),
            });
        }

        Ok(Stroke {
            points: out,
            pen_type: stroke.pen_type,
            color: stroke.color,
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
