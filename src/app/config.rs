//! Configuration Management

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::feedback::proportion::SizeMetric;
use crate::preprocess::normalize::{CoordinateSpace, Normalizer};
use crate::preprocess::segment::{SegmentStrategy, Segmenter};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Normalization settings
    pub normalize: NormalizeConfig,
    /// Segmentation settings
    pub segment: SegmentConfig,
    /// Proportional analysis settings
    #[serde(default)]
    pub proportion: ProportionConfig,
}

/// Normalization configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizeConfig {
    /// Coordinate space of incoming strokes
    pub coordinate_space: CoordinateSpace,
    /// Fixed resample length for comparison (points per stroke)
    pub resample_len: usize,
}

/// Segmentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Which strategy to use
    pub strategy: SegmentKind,
    /// Spatial gap threshold (normalized units)
    pub spatial_gap: f64,
    /// Temporal gap threshold (multiples of the nominal sample interval)
    pub temporal_gap_samples: f64,
    /// Grid rows (grid strategy)
    pub grid_rows: usize,
    /// Grid columns (grid strategy)
    pub grid_cols: usize,
    /// Runs shorter than this are dropped as noise
    pub min_points: usize,
}

/// Segmentation strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    #[default]
    Gap,
    Grid,
}

/// Proportional analysis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProportionConfig {
    /// Size metric used for stroke-pair ratios
    pub size_metric: SizeMetric,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            coordinate_space: CoordinateSpace::Device,
            resample_len: 64,
        }
    }
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            strategy: SegmentKind::Gap,
            spatial_gap: crate::preprocess::segment::DEFAULT_SPATIAL_GAP,
            temporal_gap_samples: crate::preprocess::segment::DEFAULT_TEMPORAL_GAP_SAMPLES,
            grid_rows: 4,
            grid_cols: 4,
            min_points: 2,
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> crate::Result<()> {
        if self.normalize.resample_len < 2 || self.normalize.resample_len > 4096 {
            return Err(crate::Error::Config(format!(
                "resample_len must be in [2, 4096], got {}",
                self.normalize.resample_len
            )));
        }
        if !(self.segment.spatial_gap > 0.0 && self.segment.spatial_gap <= 1.0) {
            return Err(crate::Error::Config(format!(
                "spatial_gap must be in (0, 1], got {}",
                self.segment.spatial_gap
            )));
        }
        if !(self.segment.temporal_gap_samples > 0.0) {
            return Err(crate::Error::Config(format!(
                "temporal_gap_samples must be > 0, got {}",
                self.segment.temporal_gap_samples
            )));
        }
        if self.segment.grid_rows == 0 || self.segment.grid_rows > 64 {
            return Err(crate::Error::Config(format!(
                "grid_rows must be in [1, 64], got {}",
                self.segment.grid_rows
            )));
        }
        if self.segment.grid_cols == 0 || self.segment.grid_cols > 64 {
            return Err(crate::Error::Config(format!(
                "grid_cols must be in [1, 64], got {}",
                self.segment.grid_cols
            )));
        }
        if self.segment.min_points == 0 {
            return Err(crate::Error::Config(
                "min_points must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the segmentation strategy this config selects
    pub fn strategy(&self) -> SegmentStrategy {
        match self.segment.strategy {
            SegmentKind::Gap => SegmentStrategy::Gap {
                spatial_gap: self.segment.spatial_gap,
                temporal_gap_samples: self.segment.temporal_gap_samples,
            },
            SegmentKind::Grid => SegmentStrategy::Grid {
                rows: self.segment.grid_rows,
                cols: self.segment.grid_cols,
            },
        }
    }

    /// Build the configured segmenter
    pub fn segmenter(&self) -> Segmenter {
        Segmenter::with_strategy(self.strategy()).min_points(self.segment.min_points)
    }

    /// Build the configured normalizer for user strokes
    pub fn normalizer(&self) -> Normalizer {
        Normalizer::with_space(self.normalize.coordinate_space)
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> crate::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> crate::Result<()> {
        let content = self.to_toml()?;

        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".gregg_coach").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
