//! Feedback
//!
//! Turns alignment and feature deviations into a rubric-weighted score,
//! a grade, and an ordered list of natural-language feedback statements.
//! Includes the cross-stroke proportional analysis Gregg shorthand needs,
//! since letters are distinguished by relative size between strokes.

pub mod comparison;
pub mod composer;
pub mod proportion;
pub mod rubric;

pub use comparison::{ComparisonResult, MetricsSummary};
pub use composer::{compose, Composed, DeviationReport};
pub use proportion::{ProportionAnalyzer, ProportionReport, SizeMetric};
pub use rubric::{GradeBand, Rubric, RubricEntry};
