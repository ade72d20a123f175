//! # Trek Insights
//!
//! Distills structured [`Insight`](trek_core::Insight)s from stage output.
//!
//! The extractor asks the model backend for strict JSON and decodes it
//! through a typed schema; when the backend fails or returns junk it falls
//! back to a deterministic cue-phrase scan. Which path produced the result
//! is recorded on the [`Extraction`] so callers can branch on it.

pub mod extractor;
pub mod pattern;
pub mod raw;

pub use extractor::{Extraction, InsightExtractor};
pub use pattern::pattern_extract;
pub use raw::RawInsight;
