//! Alignment Engine
//!
//! Two complementary shape-similarity metrics over normalized point
//! sequences: dynamic time warping (average-case divergence, with a
//! per-step deviation profile for localizing *where* a stroke drifts)
//! and discrete Fréchet distance (worst-case pointwise mismatch under
//! any valid correspondence).

pub mod dtw;
pub mod frechet;

pub use dtw::{dtw, dtw_with_options, DtwAlignment, DtwOptions, PathRegion};
pub use frechet::frechet_distance;
