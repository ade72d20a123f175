//! Quality report types, score normalization, and aggregation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trek_core::{StageId, StageType};

/// Where a report's numbers came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    /// Scored by the model backend (then normalized locally).
    Model,
    /// Fixed neutral scores because the backend was unavailable.
    NeutralFallback,
}

/// Scores for the six rubric dimensions, each in [0, 10].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionScores {
    /// Did the stage cover what its phase calls for?
    pub completeness: f64,
    /// Does it go beyond surface observations?
    pub depth: f64,
    /// Are claims concrete rather than generic?
    pub specificity: f64,
    /// Can the next stage act on it?
    pub actionability: f64,
    /// Does the text hold together?
    pub coherence: f64,
    /// Does it add something the journey did not already have?
    pub novelty: f64,
}

impl DimensionScores {
    /// Neutral midpoint scores.
    pub const NEUTRAL: Self = Self {
        completeness: 5.0,
        depth: 5.0,
        specificity: 5.0,
        actionability: 5.0,
        coherence: 5.0,
        novelty: 5.0,
    };

    /// Mean of the six dimensions, rounded to one decimal.
    #[must_use]
    pub fn overall(&self) -> f64 {
        let sum = self.completeness
            + self.depth
            + self.specificity
            + self.actionability
            + self.coherence
            + self.novelty;
        (sum / 6.0 * 10.0).round() / 10.0
    }
}

/// The evaluation of one stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityReport {
    /// The evaluated stage.
    pub stage_id: StageId,
    /// Its declared phase type.
    pub stage_type: StageType,
    /// Per-dimension scores, normalized into [0, 10].
    pub scores: DimensionScores,
    /// Locally recomputed one-decimal mean of the dimensions.
    pub overall_score: f64,
    /// What the stage did well.
    #[serde(default)]
    pub strengths: Vec<String>,
    /// Where it fell short.
    #[serde(default)]
    pub weaknesses: Vec<String>,
    /// General improvement suggestions.
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Whether the overall score fell below the revision threshold.
    pub needs_revision: bool,
    /// Concrete revision guidance; populated only when flagged.
    #[serde(default)]
    pub revision_suggestions: Vec<String>,
    /// Where the numbers came from.
    pub source: EvaluationSource,
    /// When the evaluation ran.
    pub evaluated_at: DateTime<Utc>,
}

/// Clamp a backend-supplied JSON value into a valid score.
///
/// Non-numeric values (strings, nulls, objects) become the neutral 5.0;
/// numbers are clamped into [0, 10]. Mandatory for every backend number.
#[must_use]
pub fn normalize_score(value: &serde_json::Value) -> f64 {
    value.as_f64().map_or(5.0, |n| n.clamp(0.0, 10.0))
}

/// Mean/min/max for one dimension across a batch of reports.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionStats {
    /// Mean score.
    pub mean: f64,
    /// Lowest score.
    pub min: f64,
    /// Highest score.
    pub max: f64,
}

/// Pure reduction over a batch of reports.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityAggregate {
    /// Number of reports aggregated.
    pub report_count: usize,
    /// Mean of the overall scores.
    pub mean_overall: f64,
    /// How many reports were flagged for revision.
    pub revision_count: usize,
    /// Completeness stats.
    pub completeness: DimensionStats,
    /// Depth stats.
    pub depth: DimensionStats,
    /// Specificity stats.
    pub specificity: DimensionStats,
    /// Actionability stats.
    pub actionability: DimensionStats,
    /// Coherence stats.
    pub coherence: DimensionStats,
    /// Novelty stats.
    pub novelty: DimensionStats,
}

impl QualityAggregate {
    /// Aggregate a non-empty batch of reports; `None` when empty.
    #[must_use]
    pub fn from_reports(reports: &[QualityReport]) -> Option<Self> {
        if reports.is_empty() {
            return None;
        }
        let stats = |pick: fn(&DimensionScores) -> f64| -> DimensionStats {
            let values: Vec<f64> = reports.iter().map(|r| pick(&r.scores)).collect();
            #[allow(clippy::cast_precision_loss)]
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            DimensionStats {
                mean,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        };
        #[allow(clippy::cast_precision_loss)]
        let mean_overall =
            reports.iter().map(|r| r.overall_score).sum::<f64>() / reports.len() as f64;
        Some(Self {
            report_count: reports.len(),
            mean_overall,
            revision_count: reports.iter().filter(|r| r.needs_revision).count(),
            completeness: stats(|s| s.completeness),
            depth: stats(|s| s.depth),
            specificity: stats(|s| s.specificity),
            actionability: stats(|s| s.actionability),
            coherence: stats(|s| s.coherence),
            novelty: stats(|s| s.novelty),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
