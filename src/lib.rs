//! # Gregg Coach
//!
//! A stroke comparison engine for Gregg shorthand practice. Takes a
//! handwritten stroke (a timestamped sequence of pen samples) and compares
//! it against a canonical reference stroke, producing a numeric score, a
//! grade, and an ordered list of actionable feedback statements.
//!
//! ## Overview
//!
//! Raw tablet points are segmented into glyph attempts, normalized into a
//! canonical `[0, 1]` coordinate space, resampled by arc length, and then
//! measured against the reference using dynamic time warping and discrete
//! Fréchet distance alongside a fixed geometric feature vector. Because
//! Gregg shorthand encodes meaning in the *relative* size of neighboring
//! strokes, multi-stroke attempts also go through a cross-stroke
//! proportional analysis before scoring.
//!
//! ## Quick Start
//!
//! ```
//! use gregg_coach::{
//!     Config, CoordinateSpace, CurriculumStore, Point, ReferenceStroke, Stroke, StrokeJudge,
//! };
//!
//! // A canonical "t" stroke: a short straight line in normalized space.
//! let line = |y: f64| -> Stroke {
//!     Stroke::new(
//!         (0..16)
//!             .map(|i| {
//!                 let t = i as f64 / 15.0;
//!                 Point::with_timestamp(0.2 + 0.2 * t, y, t)
//!             })
//!             .collect(),
//!     )
//! };
//!
//! let mut curriculum = CurriculumStore::new();
//! curriculum.insert_reference(1, ReferenceStroke::new("t", vec![line(0.5)]));
//!
//! let mut config = Config::default();
//! config.normalize.coordinate_space = CoordinateSpace::Normalized;
//!
//! let judge = StrokeJudge::with_config(curriculum, config).unwrap();
//! let result = judge.compare(&[line(0.5)], 1, "t").unwrap();
//!
//! assert!(result.score > 0.9);
//! assert!(result.feedback.is_empty());
//! ```
//!
//! ## Architecture
//!
//! - [`model`]: point/stroke data model and curriculum reference records
//! - [`preprocess`]: normalization, page segmentation, feature extraction
//! - [`align`]: dynamic time warping and discrete Fréchet distance
//! - [`feedback`]: proportional analysis, rubric, feedback composition
//! - [`workflow`]: the comparison pipeline exposed to callers
//! - [`app`]: pipeline configuration management
//!
//! ## Comparison Pipeline
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │  Raw points  │───▶│  Segmenter   │───▶│  Normalizer  │
//! └──────────────┘    └──────────────┘    └──────┬───────┘
//!                                                │
//!                        ┌───────────────────────┤
//!                        ▼                       ▼
//!                 ┌──────────────┐    ┌──────────────────┐
//!                 │   Features   │    │  DTW / Fréchet   │
//!                 └──────┬───────┘    └────────┬─────────┘
//!                        │                     │
//!                        ▼                     ▼
//!                 ┌─────────────────────────────────────┐
//!                 │  Proportional Analysis + Composer   │
//!                 └──────────────────┬──────────────────┘
//!                                    ▼
//!                          ┌──────────────────┐
//!                          │ ComparisonResult │
//!                          └──────────────────┘
//! ```
//!
//! All operations are synchronous and pure: no shared mutable state, no
//! I/O inside the pipeline. Independent comparisons can be distributed
//! across worker threads by the caller with no coordination.

pub mod align;
pub mod app;
pub mod feedback;
pub mod model;
pub mod preprocess;
pub mod workflow;

// Re-export commonly used types
pub use align::dtw::{DtwAlignment, PathRegion};
pub use app::config::{Config, NormalizeConfig, ProportionConfig, SegmentConfig, SegmentKind};
pub use feedback::comparison::{ComparisonResult, MetricsSummary};
pub use feedback::proportion::{ProportionAnalyzer, ProportionReport, SizeMetric};
pub use feedback::rubric::{GradeBand, Rubric, RubricEntry};
pub use model::reference::{CurriculumStore, GreggPrimitive, ReferenceStroke, ToleranceBand};
pub use model::stroke::{PenType, Point, Segment, Stroke, StrokeColor};
pub use preprocess::features::{FeatureVector, FEATURE_VECTOR_VERSION};
pub use preprocess::normalize::{CoordinateSpace, Normalizer};
pub use preprocess::segment::{SegmentStrategy, Segmenter};
pub use workflow::judge::StrokeJudge;

/// Result type alias for the comparison core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the comparison core
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input: empty stroke lists, non-monotonic timestamps,
    /// unknown reference labels. Surfaced immediately, never retried.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An operation required interpolation or angle computation on a
    /// zero-extent stroke with no documented degenerate-case policy.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    /// Rubric or pipeline configuration missing required structure.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
