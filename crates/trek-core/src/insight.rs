//! Structured insights distilled from stage output.
//!
//! An [`Insight`] is created once by the insight extractor and never mutated.
//! Its quality score and tags are **derived deterministically** from its own
//! fields — they are never supplied by the model backend, so re-deriving them
//! is always safe and reproducible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::InsightId;
use crate::stage::StageType;

/// Category of the claim an insight captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    /// A new finding.
    Discovery,
    /// An identified problem or obstacle.
    Problem,
    /// A proposed or validated solution.
    Solution,
    /// An open question raised by the stage.
    Question,
    /// A link between findings.
    Connection,
    /// A suggested course of action.
    Recommendation,
    /// A combination of earlier findings.
    Synthesis,
}

impl InsightCategory {
    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Problem => "problem",
            Self::Solution => "solution",
            Self::Question => "question",
            Self::Connection => "connection",
            Self::Recommendation => "recommendation",
            Self::Synthesis => "synthesis",
        }
    }
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Importance ranking for insights and question priorities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Must not be lost; shapes the journey.
    Critical,
    /// Strongly relevant.
    High,
    /// Useful context.
    Medium,
    /// Peripheral.
    Low,
}

impl Importance {
    /// Sort rank: higher is more important.
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }

    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Confidence the extractor places in an insight.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Directly verified against evidence.
    Verified,
    /// Strongly supported.
    High,
    /// Reasonably supported.
    Medium,
    /// Weakly supported.
    Low,
    /// A guess worth tracking.
    Speculative,
}

impl Confidence {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Speculative => "speculative",
        }
    }
}

/// How an insight was produced, recorded for observability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Structured output from the model backend.
    Model,
    /// Deterministic cue-phrase fallback.
    Pattern,
}

impl ExtractionMethod {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Pattern => "pattern",
        }
    }
}

/// A structured, categorized distillation of one claim found in a stage's text.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Unique insight identifier.
    pub id: InsightId,
    /// Ordinal of the originating stage.
    pub stage_ordinal: u32,
    /// Type of the originating stage.
    pub stage_type: StageType,
    /// The claim itself.
    pub text: String,
    /// Claim category.
    pub category: InsightCategory,
    /// Importance ranking.
    pub importance: Importance,
    /// Supporting evidence strings, in order.
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Extractor confidence.
    pub confidence: Confidence,
    /// Stated assumptions, if any.
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Derived quality score (0–10), computed locally.
    pub quality_score: f64,
    /// Derived tags, computed locally.
    #[serde(default)]
    pub tags: Vec<String>,
    /// How the insight was produced.
    pub extraction_method: ExtractionMethod,
    /// When the insight was extracted.
    pub created_at: DateTime<Utc>,
}

impl Insight {
    /// Derived quality score: a pure function of importance, evidence count,
    /// and confidence. Never supplied by the backend.
    ///
    /// Base by importance (critical 9, high 7.5, medium 6, low 4.5), plus
    /// 0.5 per evidence string capped at +1.5, plus a confidence adjustment
    /// in [-1, +1]. Clamped to [0, 10] and rounded to one decimal.
    #[must_use]
    pub fn derive_quality_score(
        importance: Importance,
        evidence_count: usize,
        confidence: Confidence,
    ) -> f64 {
        let base = match importance {
            Importance::Critical => 9.0,
            Importance::High => 7.5,
            Importance::Medium => 6.0,
            Importance::Low => 4.5,
        };
        #[allow(clippy::cast_precision_loss)]
        let evidence_bonus = (evidence_count.min(3) as f64) * 0.5;
        let confidence_adj = match confidence {
            Confidence::Verified => 1.0,
            Confidence::High => 0.5,
            Confidence::Medium => 0.0,
            Confidence::Low => -0.5,
            Confidence::Speculative => -1.0,
        };
        let score = (base + evidence_bonus + confidence_adj).clamp(0.0, 10.0);
        (score * 10.0).round() / 10.0
    }

    /// Derived tags: category name, `"priority"` for high/critical importance,
    /// `"needs-verification"` for low/speculative confidence.
    #[must_use]
    pub fn derive_tags(
        category: InsightCategory,
        importance: Importance,
        confidence: Confidence,
    ) -> Vec<String> {
        let mut tags = vec![category.as_str().to_string()];
        if matches!(importance, Importance::Critical | Importance::High) {
            tags.push("priority".to_string());
        }
        if matches!(confidence, Confidence::Low | Confidence::Speculative) {
            tags.push("needs-verification".to_string());
        }
        tags
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
