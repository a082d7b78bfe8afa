//! Curriculum Reference Records
//!
//! Canonical reference strokes and per-unit rubrics, keyed by
//! (curriculum unit, target label). Supplied by an external curriculum
//! store; this core only reads them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feedback::rubric::Rubric;
use crate::model::stroke::Stroke;

/// Gregg shorthand stroke primitives (Unit 1 vocabulary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GreggPrimitive {
    /// Small circle
    A,
    /// Small circle (context-dependent, same shape as A)
    E,
    /// Large circle
    O,
    /// Short forward straight
    T,
    /// Long forward straight
    D,
    /// Short curved line
    N,
    /// Long curved line
    M,
    /// Short forward curve
    R,
    /// Long forward curve
    L,
    /// Short backward curve
    K,
    /// Long backward curve
    G,
    /// Small comma-shaped curve
    S,
    /// Short backward straight
    P,
    /// Long backward straight
    B,
    /// Short left-motion curve
    F,
    /// Long left-motion curve
    V,
}

impl GreggPrimitive {
    /// The curriculum label string for this primitive
    pub fn label(&self) -> &'static str {
        match self {
            GreggPrimitive::A => "a",
            GreggPrimitive::E => "e",
            GreggPrimitive::O => "o",
            GreggPrimitive::T => "t",
            GreggPrimitive::D => "d",
            GreggPrimitive::N => "n",
            GreggPrimitive::M => "m",
            GreggPrimitive::R => "r",
            GreggPrimitive::L => "l",
            GreggPrimitive::K => "k",
            GreggPrimitive::G => "g",
            GreggPrimitive::S => "s",
            GreggPrimitive::P => "p",
            GreggPrimitive::B => "b",
            GreggPrimitive::F => "f",
            GreggPrimitive::V => "v",
        }
    }
}

/// Acceptable relative-deviation range for one feature metric.
///
/// `min` bounds how far below the reference a deviation may fall
/// (non-positive), `max` how far above (non-negative). When a reference
/// carries a band for a metric it overrides the rubric tolerance for
/// that metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToleranceBand {
    pub min: f64,
    pub max: f64,
}

impl ToleranceBand {
    /// Symmetric band around zero
    pub fn symmetric(tolerance: f64) -> Self {
        Self {
            min: -tolerance,
            max: tolerance,
        }
    }

    /// Whether a signed deviation falls inside the acceptable range
    pub fn contains(&self, deviation: f64) -> bool {
        deviation >= self.min && deviation <= self.max
    }

    pub fn validate(&self, metric: &str) -> crate::Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(crate::Error::Config(format!(
                "tolerance band for '{}' must be finite",
                metric
            )));
        }
        if self.min > 0.0 || self.max < 0.0 {
            return Err(crate::Error::Config(format!(
                "tolerance band for '{}' must bracket zero, got [{}, {}]",
                metric, self.min, self.max
            )));
        }
        if self.min == 0.0 && self.max == 0.0 {
            return Err(crate::Error::Config(format!(
                "tolerance band for '{}' is empty",
                metric
            )));
        }
        Ok(())
    }
}

/// A canonical reference stroke set tagged with its curriculum label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceStroke {
    /// Target label, e.g. "a" or "a_circle"
    pub label: String,
    /// Canonical strokes in normalized [0, 1] coordinates
    pub strokes: Vec<Stroke>,
    /// Optional per-feature tolerance bands overriding the rubric
    #[serde(default)]
    pub tolerances: BTreeMap<String, ToleranceBand>,
}

impl ReferenceStroke {
    pub fn new(label: impl Into<String>, strokes: Vec<Stroke>) -> Self {
        Self {
            label: label.into(),
            strokes,
            tolerances: BTreeMap::new(),
        }
    }

    pub fn with_tolerance(mut self, metric: impl Into<String>, band: ToleranceBand) -> Self {
        self.tolerances.insert(metric.into(), band);
        self
    }
}

/// In-memory curriculum store: references and rubrics keyed by unit
#[derive(Debug, Clone, Default)]
pub struct CurriculumStore {
    references: BTreeMap<(u32, String), ReferenceStroke>,
    rubrics: BTreeMap<u32, Rubric>,
}

impl CurriculumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a reference under a curriculum unit, keyed by its label
    pub fn insert_reference(&mut self, unit: u32, reference: ReferenceStroke) {
        self.references
            .insert((unit, reference.label.clone()), reference);
    }

    /// Register the scoring rubric for a unit
    pub fn insert_rubric(&mut self, unit: u32, rubric: Rubric) {
        self.rubrics.insert(unit, rubric);
    }

    /// Look up the reference for (unit, label)
    pub fn reference(&self, unit: u32, label: &str) -> Option<&ReferenceStroke> {
        self.references.get(&(unit, label.to_string()))
    }

    /// Look up the rubric for a unit
    pub fn rubric(&self, unit: u32) -> Option<&Rubric> {
        self.rubrics.get(&unit)
    }

    /// Labels registered for a unit, sorted
    pub fn labels_for_unit(&self, unit: u32) -> Vec<&str> {
        self.references
            .keys()
            .filter(|(u, _)| *u == unit)
            .map(|(_, label)| label.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stroke::Point;

    fn make_reference(label: &str) -> ReferenceStroke {
        ReferenceStroke::new(
            label,
            vec![Stroke::new(vec![
                Point::with_timestamp(0.1, 0.1, 0.0),
                Point::with_timestamp(0.2, 0.2, 0.01),
            ])],
        )
    }

    #[test]
    fn test_primitive_labels() {
        assert_eq!(GreggPrimitive::A.label(), "a");
        assert_eq!(GreggPrimitive::V.label(), "v");
    }

    #[test]
    fn test_store_lookup() {
        let mut store = CurriculumStore::new();
        store.insert_reference(1, make_reference("a"));
        store.insert_reference(1, make_reference("t"));
        store.insert_reference(2, make_reference("o"));

        assert!(store.reference(1, "a").is_some());
        assert!(store.reference(1, "o").is_none());
        assert_eq!(store.labels_for_unit(1), vec!["a", "t"]);
    }

    #[test]
    fn test_tolerance_band_contains() {
        let band = ToleranceBand::symmetric(0.2);
        assert!(band.contains(0.1));
        assert!(band.contains(-0.2));
        assert!(!band.contains(0.3));
    }

    #[test]
    fn test_tolerance_band_must_bracket_zero() {
        let band = ToleranceBand { min: 0.1, max: 0.5 };
        assert!(band.validate("size").is_err());
        assert!(ToleranceBand::symmetric(0.2).validate("size").is_ok());
    }

    #[test]
    fn test_reference_with_tolerance() {
        let reference = make_reference("a").with_tolerance("size", ToleranceBand::symmetric(0.1));
        assert!(reference.tolerances.contains_key("size"));
    }
}
