//! Wire schema for backend-supplied insights.
//!
//! The backend is asked for strict JSON, but its enum strings are decoded
//! leniently: unknown category/importance/confidence values fall back to
//! sensible defaults instead of rejecting the whole batch. Quality score and
//! tags are always re-derived locally, never taken from the wire.

use chrono::Utc;
use serde::Deserialize;
use tracing::debug;
use trek_core::{
    Confidence, Importance, Insight, InsightCategory, InsightId, StageType,
};

/// One insight as the backend reports it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInsight {
    /// The claim text.
    pub text: String,
    /// Category string (lenient).
    #[serde(default)]
    pub category: String,
    /// Importance string (lenient).
    #[serde(default)]
    pub importance: String,
    /// Confidence string (lenient).
    #[serde(default)]
    pub confidence: String,
    /// Supporting evidence strings.
    #[serde(default)]
    pub evidence: Vec<String>,
    /// Stated assumptions.
    #[serde(default)]
    pub assumptions: Vec<String>,
}

impl RawInsight {
    /// Convert into a domain [`Insight`], deriving score and tags locally.
    #[must_use]
    pub fn into_insight(self, stage_ordinal: u32, stage_type: StageType) -> Insight {
        let category = parse_category(&self.category);
        let importance = parse_importance(&self.importance);
        let confidence = parse_confidence(&self.confidence);
        Insight {
            id: InsightId::new(),
            stage_ordinal,
            stage_type,
            quality_score: Insight::derive_quality_score(importance, self.evidence.len(), confidence),
            tags: Insight::derive_tags(category, importance, confidence),
            text: self.text,
            category,
            importance,
            confidence,
            evidence: self.evidence,
            assumptions: self.assumptions,
            extraction_method: trek_core::ExtractionMethod::Model,
            created_at: Utc::now(),
        }
    }
}

fn parse_category(raw: &str) -> InsightCategory {
    match raw.trim().to_lowercase().as_str() {
        "discovery" => InsightCategory::Discovery,
        "problem" => InsightCategory::Problem,
        "solution" => InsightCategory::Solution,
        "question" => InsightCategory::Question,
        "connection" => InsightCategory::Connection,
        "recommendation" => InsightCategory::Recommendation,
        "synthesis" => InsightCategory::Synthesis,
        other => {
            debug!(value = other, "unknown insight category, defaulting to discovery");
            InsightCategory::Discovery
        }
    }
}

fn parse_importance(raw: &str) -> Importance {
    match raw.trim().to_lowercase().as_str() {
        "critical" => Importance::Critical,
        "high" => Importance::High,
        "medium" => Importance::Medium,
        "low" => Importance::Low,
        other => {
            debug!(value = other, "unknown importance, defaulting to medium");
            Importance::Medium
        }
    }
}

fn parse_confidence(raw: &str) -> Confidence {
    match raw.trim().to_lowercase().as_str() {
        "verified" => Confidence::Verified,
        "high" => Confidence::High,
        "medium" => Confidence::Medium,
        "low" => Confidence::Low,
        "speculative" => Confidence::Speculative,
        other => {
            debug!(value = other, "unknown confidence, defaulting to medium");
            Confidence::Medium
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use trek_core::ExtractionMethod;

    #[test]
    fn decodes_full_wire_form() {
        let json = r#"{
            "text": "caching halves latency",
            "category": "discovery",
            "importance": "high",
            "confidence": "verified",
            "evidence": ["benchmark run"],
            "assumptions": ["cache stays warm"]
        }"#;
        let raw: RawInsight = serde_json::from_str(json).unwrap();
        let insight = raw.into_insight(4, StageType::Deepening);
        assert_eq!(insight.stage_ordinal, 4);
        assert_eq!(insight.category, InsightCategory::Discovery);
        assert_eq!(insight.importance, Importance::High);
        assert_eq!(insight.confidence, Confidence::Verified);
        assert_eq!(insight.extraction_method, ExtractionMethod::Model);
        // 7.5 + 0.5 + 1.0 = 9.0
        assert!((insight.quality_score - 9.0).abs() < f64::EPSILON);
        assert_eq!(insight.tags, vec!["discovery", "priority"]);
    }

    #[test]
    fn unknown_enum_strings_fall_back() {
        let json = r#"{"text": "x", "category": "banana", "importance": "mega", "confidence": "??"}"#;
        let raw: RawInsight = serde_json::from_str(json).unwrap();
        let insight = raw.into_insight(1, StageType::Orienting);
        assert_eq!(insight.category, InsightCategory::Discovery);
        assert_eq!(insight.importance, Importance::Medium);
        assert_eq!(insight.confidence, Confidence::Medium);
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw: RawInsight = serde_json::from_str(r#"{"text": "bare claim"}"#).unwrap();
        assert!(raw.evidence.is_empty());
        assert!(raw.assumptions.is_empty());
        let insight = raw.into_insight(0, StageType::Orienting);
        assert_eq!(insight.importance, Importance::Medium);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(parse_importance(" Critical "), Importance::Critical);
        assert_eq!(parse_confidence("SPECULATIVE"), Confidence::Speculative);
        assert_eq!(parse_category("Synthesis"), InsightCategory::Synthesis);
    }
}
