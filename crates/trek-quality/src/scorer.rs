//! The quality scorer: rubric prompt, normalized decode, neutral fallback.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::Deserialize;
use tracing::{debug, warn};
use trek_core::Stage;
use trek_gateway::parsing::decode_json;
use trek_gateway::{ModelGateway, ModelRequest, ModelSelector};
use trek_settings::QualitySettings;

use crate::report::{
    DimensionScores, EvaluationSource, QualityAggregate, QualityReport, normalize_score,
};
use crate::rubric::rubric_for;

/// Raw evaluation as the backend reports it.
///
/// Scores decode as untyped JSON values so non-numeric junk normalizes to
/// the neutral midpoint instead of rejecting the evaluation.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    #[serde(default)]
    scores: RawScores,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    revision_suggestions: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScores {
    #[serde(default)]
    completeness: serde_json::Value,
    #[serde(default)]
    depth: serde_json::Value,
    #[serde(default)]
    specificity: serde_json::Value,
    #[serde(default)]
    actionability: serde_json::Value,
    #[serde(default)]
    coherence: serde_json::Value,
    #[serde(default)]
    novelty: serde_json::Value,
}

impl RawScores {
    fn normalize(&self) -> DimensionScores {
        DimensionScores {
            completeness: normalize_score(&self.completeness),
            depth: normalize_score(&self.depth),
            specificity: normalize_score(&self.specificity),
            actionability: normalize_score(&self.actionability),
            coherence: normalize_score(&self.coherence),
            novelty: normalize_score(&self.novelty),
        }
    }
}

/// Evaluates stage output against the phase rubric.
///
/// Never returns an error: when the backend is unavailable or its output
/// fails the schema decode, the caller receives a neutral report tagged
/// [`EvaluationSource::NeutralFallback`].
#[derive(Clone, Debug)]
pub struct QualityScorer {
    gateway: Arc<ModelGateway>,
    settings: QualitySettings,
}

impl QualityScorer {
    /// Create a scorer over a gateway.
    #[must_use]
    pub fn new(gateway: Arc<ModelGateway>, settings: QualitySettings) -> Self {
        Self { gateway, settings }
    }

    /// Evaluate one stage.
    pub async fn evaluate(&self, stage: &Stage) -> QualityReport {
        let request = ModelRequest::new(self.build_prompt(stage))
            .with_model(ModelSelector::Balanced)
            .with_max_output_tokens(1_024);

        let raw = match self.gateway.execute(&request).await {
            Ok(response) => match decode_json::<RawEvaluation>(&response.text) {
                Ok(raw) => raw,
                Err(e) => {
                    warn!(
                        ordinal = stage.ordinal,
                        error = %e,
                        "evaluation output failed schema decode, using neutral report"
                    );
                    return self.neutral_report(stage, "evaluation output was not valid JSON");
                }
            },
            Err(e) => {
                warn!(
                    ordinal = stage.ordinal,
                    kind = e.kind(),
                    error = %e,
                    "gateway unavailable for evaluation, using neutral report"
                );
                return self.neutral_report(stage, "model backend unavailable");
            }
        };

        let scores = raw.scores.normalize();
        let overall_score = scores.overall();
        let needs_revision = overall_score < self.settings.revision_threshold;
        let revision_suggestions = if needs_revision {
            if raw.revision_suggestions.is_empty() {
                raw.suggestions.clone()
            } else {
                raw.revision_suggestions
            }
        } else {
            Vec::new()
        };

        debug!(ordinal = stage.ordinal, overall_score, needs_revision, "stage evaluated");
        QualityReport {
            stage_id: stage.id.clone(),
            stage_type: stage.stage_type,
            scores,
            overall_score,
            strengths: raw.strengths,
            weaknesses: raw.weaknesses,
            suggestions: raw.suggestions,
            needs_revision,
            revision_suggestions,
            source: EvaluationSource::Model,
            evaluated_at: Utc::now(),
        }
    }

    /// Evaluate many stages concurrently.
    pub async fn evaluate_batch(&self, stages: &[Stage]) -> Vec<QualityReport> {
        join_all(stages.iter().map(|stage| self.evaluate(stage))).await
    }

    /// Pure reduction over a batch of reports.
    #[must_use]
    pub fn aggregate(reports: &[QualityReport]) -> Option<QualityAggregate> {
        QualityAggregate::from_reports(reports)
    }

    fn neutral_report(&self, stage: &Stage, note: &str) -> QualityReport {
        QualityReport {
            stage_id: stage.id.clone(),
            stage_type: stage.stage_type,
            scores: DimensionScores::NEUTRAL,
            overall_score: 5.0,
            strengths: Vec::new(),
            weaknesses: vec![format!("Automatic evaluation unavailable: {note}.")],
            suggestions: Vec::new(),
            needs_revision: false,
            revision_suggestions: Vec::new(),
            source: EvaluationSource::NeutralFallback,
            evaluated_at: Utc::now(),
        }
    }

    fn build_prompt(&self, stage: &Stage) -> String {
        format!(
            "Evaluate this {stage_type} stage output against the rubric.\n\
             \n\
             Rubric: {rubric}\n\
             \n\
             Score each dimension 0-10. Respond with ONLY JSON:\n\
             {{\"scores\": {{\"completeness\": n, \"depth\": n, \"specificity\": n,\n\
             \"actionability\": n, \"coherence\": n, \"novelty\": n}},\n\
             \"strengths\": [string], \"weaknesses\": [string],\n\
             \"suggestions\": [string], \"revisionSuggestions\": [string]}}\n\
             \n\
             Stage output:\n\
             {text}",
            stage_type = stage.stage_type.as_str(),
            rubric = rubric_for(stage.stage_type),
            text = stage.result_text,
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use trek_core::{RetryConfig, StageType};
    use trek_gateway::{DeltaStream, GatewayError, ModelBackend, RawResponse};

    struct CannedBackend {
        body: Option<String>,
    }

    #[async_trait]
    impl ModelBackend for CannedBackend {
        async fn execute(&self, _request: &ModelRequest) -> Result<RawResponse, GatewayError> {
            match &self.body {
                Some(body) => Ok(RawResponse {
                    text: body.clone(),
                    ..RawResponse::default()
                }),
                None => Err(GatewayError::Unknown {
                    message: "backend down".into(),
                }),
            }
        }

        async fn execute_stream(
            &self,
            _request: &ModelRequest,
        ) -> Result<DeltaStream, GatewayError> {
            Err(GatewayError::Unknown {
                message: "no streaming in tests".into(),
            })
        }
    }

    fn scorer_with(body: Option<&str>) -> QualityScorer {
        let backend = Arc::new(CannedBackend {
            body: body.map(String::from),
        });
        let retry = RetryConfig {
            max_attempts: 1,
            ..RetryConfig::default()
        };
        QualityScorer::new(
            Arc::new(ModelGateway::new(backend, retry)),
            QualitySettings::default(),
        )
    }

    #[tokio::test]
    async fn scores_decoded_and_overall_recomputed() {
        let body = r#"{
            "scores": {"completeness": 8, "depth": 7, "specificity": 8,
                       "actionability": 6, "coherence": 9, "novelty": 7},
            "strengths": ["concrete findings"],
            "weaknesses": [],
            "suggestions": ["quantify the claims"]
        }"#;
        let scorer = scorer_with(Some(body));
        let stage = Stage::new(2, StageType::Discovering, "findings here");
        let report = scorer.evaluate(&stage).await;
        assert_eq!(report.source, EvaluationSource::Model);
        // mean = 45/6 = 7.5
        assert!((report.overall_score - 7.5).abs() < f64::EPSILON);
        assert!(!report.needs_revision);
        assert!(report.revision_suggestions.is_empty());
        assert_eq!(report.strengths, vec!["concrete findings"]);
    }

    #[tokio::test]
    async fn junk_scores_normalize_instead_of_failing() {
        let body = r#"{
            "scores": {"completeness": "great", "depth": 15, "specificity": -2,
                       "actionability": 6, "coherence": null, "novelty": 7}
        }"#;
        let scorer = scorer_with(Some(body));
        let stage = Stage::new(0, StageType::Orienting, "text");
        let report = scorer.evaluate(&stage).await;
        assert_eq!(report.source, EvaluationSource::Model);
        assert!((report.scores.completeness - 5.0).abs() < f64::EPSILON);
        assert!((report.scores.depth - 10.0).abs() < f64::EPSILON);
        assert!((report.scores.specificity - 0.0).abs() < f64::EPSILON);
        assert!((report.scores.coherence - 5.0).abs() < f64::EPSILON);
        // all scores in range
        for score in [
            report.scores.completeness,
            report.scores.depth,
            report.scores.specificity,
            report.scores.actionability,
            report.scores.coherence,
            report.scores.novelty,
        ] {
            assert!((0.0..=10.0).contains(&score));
        }
    }

    #[tokio::test]
    async fn low_overall_flags_revision() {
        let body = r#"{
            "scores": {"completeness": 3, "depth": 3, "specificity": 4,
                       "actionability": 3, "coherence": 5, "novelty": 2},
            "suggestions": ["name concrete findings"],
            "revisionSuggestions": ["redo with specific observations"]
        }"#;
        let scorer = scorer_with(Some(body));
        let stage = Stage::new(1, StageType::Discovering, "vague text");
        let report = scorer.evaluate(&stage).await;
        assert!(report.needs_revision);
        assert_eq!(report.revision_suggestions, vec!["redo with specific observations"]);
    }

    #[tokio::test]
    async fn revision_falls_back_to_general_suggestions() {
        let body = r#"{
            "scores": {"completeness": 2, "depth": 2, "specificity": 2,
                       "actionability": 2, "coherence": 2, "novelty": 2},
            "suggestions": ["start over"]
        }"#;
        let scorer = scorer_with(Some(body));
        let stage = Stage::new(1, StageType::Reflecting, "x");
        let report = scorer.evaluate(&stage).await;
        assert!(report.needs_revision);
        assert_eq!(report.revision_suggestions, vec!["start over"]);
    }

    #[tokio::test]
    async fn backend_failure_yields_neutral_report() {
        let scorer = scorer_with(None);
        let stage = Stage::new(3, StageType::Synthesizing, "text");
        let report = scorer.evaluate(&stage).await;
        assert_eq!(report.source, EvaluationSource::NeutralFallback);
        assert!((report.overall_score - 5.0).abs() < f64::EPSILON);
        assert!(!report.needs_revision);
        assert!(report.weaknesses[0].contains("unavailable"));
    }

    #[tokio::test]
    async fn malformed_output_yields_neutral_report() {
        let scorer = scorer_with(Some("The stage was pretty good, 8/10."));
        let stage = Stage::new(3, StageType::Converging, "text");
        let report = scorer.evaluate(&stage).await;
        assert_eq!(report.source, EvaluationSource::NeutralFallback);
        assert!((report.overall_score - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn batch_evaluates_all_stages() {
        let body = r#"{"scores": {"completeness": 6, "depth": 6, "specificity": 6,
                       "actionability": 6, "coherence": 6, "novelty": 6}}"#;
        let scorer = scorer_with(Some(body));
        let stages = vec![
            Stage::new(0, StageType::Orienting, "a"),
            Stage::new(1, StageType::Discovering, "b"),
        ];
        let reports = scorer.evaluate_batch(&stages).await;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].stage_type, StageType::Orienting);
        assert_eq!(reports[1].stage_type, StageType::Discovering);

        let agg = QualityScorer::aggregate(&reports).unwrap();
        assert_eq!(agg.report_count, 2);
        assert_eq!(agg.revision_count, 0);
    }
}
