//! Stage records consumed read-only by the pipeline.
//!
//! A [`Stage`] is one immutable unit of process output produced by the
//! stage-sequencing collaborator. The pipeline never mutates stages; it only
//! reads their text to extract insights, score quality, and fold summaries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::StageId;

/// The 8 phases a stage can be declared as.
///
/// The rubric used by the quality scorer and the prompts built by the
/// extractor/summarizer are all keyed on this type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageType {
    /// Establishing goals and framing the territory.
    Orienting,
    /// Open-ended exploration surfacing raw findings.
    Discovering,
    /// Drilling into a specific finding in depth.
    Deepening,
    /// Raising and sharpening open questions.
    Questioning,
    /// Relating findings to each other and to prior knowledge.
    Connecting,
    /// Combining findings into a coherent account.
    Synthesizing,
    /// Narrowing toward conclusions and decisions.
    Converging,
    /// Stepping back to assess the journey so far.
    Reflecting,
}

impl StageType {
    /// All stage types in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Orienting,
        Self::Discovering,
        Self::Deepening,
        Self::Questioning,
        Self::Connecting,
        Self::Synthesizing,
        Self::Converging,
        Self::Reflecting,
    ];

    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Orienting => "orienting",
            Self::Discovering => "discovering",
            Self::Deepening => "deepening",
            Self::Questioning => "questioning",
            Self::Connecting => "connecting",
            Self::Synthesizing => "synthesizing",
            Self::Converging => "converging",
            Self::Reflecting => "reflecting",
        }
    }
}

impl fmt::Display for StageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sub-document attached to a stage (code, data, diagram source).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageArtifact {
    /// Type tag (e.g. `"code"`, `"table"`).
    pub artifact_type: String,
    /// Raw artifact content.
    pub content: String,
}

/// One immutable unit of process output.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    /// Unique stage identifier.
    pub id: StageId,
    /// Zero-based position in the journey.
    pub ordinal: u32,
    /// Declared phase type.
    pub stage_type: StageType,
    /// Free-text result body.
    pub result_text: String,
    /// Optional free-text deliberation trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliberation: Option<String>,
    /// Artifacts produced by the stage.
    #[serde(default)]
    pub artifacts: Vec<StageArtifact>,
    /// When the stage was produced.
    pub created_at: DateTime<Utc>,
}

impl Stage {
    /// Construct a stage with no deliberation or artifacts.
    #[must_use]
    pub fn new(ordinal: u32, stage_type: StageType, result_text: impl Into<String>) -> Self {
        Self {
            id: StageId::new(),
            ordinal,
            stage_type,
            result_text: result_text.into(),
            deliberation: None,
            artifacts: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_type_as_str_matches_serde() {
        for st in StageType::ALL {
            let json = serde_json::to_string(&st).unwrap();
            assert_eq!(json, format!("\"{}\"", st.as_str()));
        }
    }

    #[test]
    fn stage_type_all_has_eight_phases() {
        assert_eq!(StageType::ALL.len(), 8);
    }

    #[test]
    fn stage_type_display() {
        assert_eq!(StageType::Discovering.to_string(), "discovering");
        assert_eq!(StageType::Synthesizing.to_string(), "synthesizing");
    }

    #[test]
    fn stage_new_defaults() {
        let stage = Stage::new(3, StageType::Deepening, "body");
        assert_eq!(stage.ordinal, 3);
        assert_eq!(stage.stage_type, StageType::Deepening);
        assert_eq!(stage.result_text, "body");
        assert!(stage.deliberation.is_none());
        assert!(stage.artifacts.is_empty());
    }

    #[test]
    fn stage_serde_camel_case() {
        let stage = Stage::new(0, StageType::Orienting, "x");
        let json = serde_json::to_string(&stage).unwrap();
        assert!(json.contains("\"stageType\":\"orienting\""));
        assert!(json.contains("resultText"));
        assert!(json.contains("createdAt"));
        // None deliberation is skipped
        assert!(!json.contains("deliberation"));
    }

    #[test]
    fn stage_serde_roundtrip_with_artifacts() {
        let mut stage = Stage::new(1, StageType::Connecting, "body");
        stage.artifacts.push(StageArtifact {
            artifact_type: "code".to_string(),
            content: "fn main() {}".to_string(),
        });
        let json = serde_json::to_string(&stage).unwrap();
        let back: Stage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.artifacts.len(), 1);
        assert_eq!(back.artifacts[0].artifact_type, "code");
    }

    #[test]
    fn stage_deserializes_without_artifacts_field() {
        let json = r#"{
            "id": "s-1",
            "ordinal": 0,
            "stageType": "reflecting",
            "resultText": "done",
            "createdAt": "2026-01-01T00:00:00Z"
        }"#;
        let stage: Stage = serde_json::from_str(json).unwrap();
        assert!(stage.artifacts.is_empty());
    }
}
