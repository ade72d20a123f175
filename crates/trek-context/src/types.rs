//! Summary aggregate types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trek_core::{ClusterId, InsightId, JourneyId, QuestionId, StageType};

/// The condensation of one contiguous, fixed-size run of stages.
///
/// Created once when its run first becomes complete and never recomputed;
/// later rebuilds reuse existing clusters verbatim.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    /// Unique cluster identifier.
    pub id: ClusterId,
    /// The stage ordinals this cluster covers, ascending.
    pub ordinals: Vec<u32>,
    /// The stage types in that run, in order.
    pub stage_types: Vec<StageType>,
    /// Short natural-language summary of the run.
    pub summary: String,
    /// Insights that originated within the run.
    #[serde(default)]
    pub insight_refs: Vec<InsightId>,
    /// Questions raised within the run.
    #[serde(default)]
    pub question_refs: Vec<QuestionId>,
}

/// A contradiction candidate between two insights.
///
/// Produced by a weak keyword-antonym heuristic; advisory only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contradiction {
    /// The first insight involved.
    pub first: InsightId,
    /// The second insight involved.
    pub second: InsightId,
    /// The antonym keyword pair that triggered the flag.
    pub keyword_pair: (String, String),
    /// Human-readable description of the candidate.
    pub note: String,
}

/// The top-level, versioned context aggregate for one journey.
///
/// Exactly one live instance per journey. Each rebuild supersedes the
/// previous instance wholesale, except that cluster summaries carry over
/// by reference rather than being recomputed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextSummary {
    /// The journey this summary belongs to.
    pub journey_id: JourneyId,
    /// Overall narrative of the journey so far.
    pub narrative: String,
    /// All cluster summaries produced so far, ascending by run.
    #[serde(default)]
    pub clusters: Vec<ClusterSummary>,
    /// Condensed statement of the highest-importance insights.
    pub insight_digest: String,
    /// Condensed statement of the highest-priority open questions.
    pub question_digest: String,
    /// Detected recurring-theme patterns.
    #[serde(default)]
    pub patterns: Vec<String>,
    /// Detected contradiction candidates.
    #[serde(default)]
    pub contradictions: Vec<Contradiction>,
    /// Monotonically increasing rebuild counter.
    pub version: u64,
    /// When this summary was built.
    pub updated_at: DateTime<Utc>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_summary_serde_roundtrip() {
        let summary = ContextSummary {
            journey_id: JourneyId::from("j-1"),
            narrative: "exploring cache behavior".to_string(),
            clusters: vec![ClusterSummary {
                id: ClusterId::from("c-1"),
                ordinals: vec![0, 1, 2],
                stage_types: vec![
                    StageType::Orienting,
                    StageType::Discovering,
                    StageType::Deepening,
                ],
                summary: "established the goal and found the hot path".to_string(),
                insight_refs: vec![InsightId::from("i-1")],
                question_refs: vec![],
            }],
            insight_digest: "caching dominates latency".to_string(),
            question_digest: "All tracked questions have been answered.".to_string(),
            patterns: vec!["Recurring theme: \"cache\" appears 4 times".to_string()],
            contradictions: vec![],
            version: 3,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"journeyId\":\"j-1\""));
        assert!(json.contains("insightDigest"));
        assert!(json.contains("\"version\":3"));
        let back: ContextSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back.clusters.len(), 1);
        assert_eq!(back.clusters[0].ordinals, vec![0, 1, 2]);
    }

    #[test]
    fn contradiction_serde() {
        let c = Contradiction {
            first: InsightId::from("i-1"),
            second: InsightId::from("i-2"),
            keyword_pair: ("faster".to_string(), "slower".to_string()),
            note: "conflicting latency claims".to_string(),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("keywordPair"));
        let back: Contradiction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
