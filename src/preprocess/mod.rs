//! Preprocessing
//!
//! Turns raw page-level pen data into comparison-ready strokes:
//! segmentation into glyph attempts, coordinate normalization with
//! arc-length resampling, and geometric feature extraction.

pub mod features;
pub mod normalize;
pub mod segment;

pub use features::{extract_features, FeatureVector};
pub use normalize::{CoordinateSpace, Normalizer};
pub use segment::{SegmentStrategy, Segmenter};
