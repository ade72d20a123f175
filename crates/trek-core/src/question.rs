//! Tracked questions raised during a journey.
//!
//! Questions are supplied by the stage-sequencing collaborator alongside the
//! accumulated insights. The summarizer ranks open ones by priority when
//! producing the question digest.

use serde::{Deserialize, Serialize};

use crate::ids::QuestionId;
use crate::insight::Importance;

/// Resolution status of a tracked question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// No answer yet.
    Unanswered,
    /// Partially answered; still worth surfacing.
    Partial,
    /// Fully answered.
    Answered,
}

/// A question raised during the journey, tracked across stages.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedQuestion {
    /// Unique question identifier.
    pub id: QuestionId,
    /// The question text.
    pub text: String,
    /// Declared priority.
    pub priority: Importance,
    /// Current resolution status.
    pub status: QuestionStatus,
    /// Ordinal of the stage that raised the question.
    pub stage_ordinal: u32,
}

impl TrackedQuestion {
    /// Whether the question still needs attention (unanswered or partial).
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.status, QuestionStatus::Unanswered | QuestionStatus::Partial)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn question(status: QuestionStatus) -> TrackedQuestion {
        TrackedQuestion {
            id: QuestionId::new(),
            text: "does eviction policy matter?".to_string(),
            priority: Importance::High,
            status,
            stage_ordinal: 1,
        }
    }

    #[test]
    fn unanswered_is_open() {
        assert!(question(QuestionStatus::Unanswered).is_open());
    }

    #[test]
    fn partial_is_open() {
        assert!(question(QuestionStatus::Partial).is_open());
    }

    #[test]
    fn answered_is_not_open() {
        assert!(!question(QuestionStatus::Answered).is_open());
    }

    #[test]
    fn serde_camel_case() {
        let q = question(QuestionStatus::Partial);
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"status\":\"partial\""));
        assert!(json.contains("stageOrdinal"));
    }
}
