//! # Trek Quality
//!
//! Evaluates stage output against a six-dimension rubric.
//!
//! The scorer asks the backend for strict JSON scores, normalizes every
//! supplied number into [0, 10], and always recomputes the overall score
//! locally. A backend failure never propagates: the caller receives a
//! neutral report tagged [`EvaluationSource::NeutralFallback`] instead.

pub mod report;
pub mod rubric;
pub mod scorer;

pub use report::{
    DimensionScores, DimensionStats, EvaluationSource, QualityAggregate, QualityReport,
    normalize_score,
};
pub use rubric::rubric_for;
pub use scorer::QualityScorer;
