//! The insight extractor: backend-first, pattern fallback.

use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, trace, warn};
use trek_core::{ExtractionMethod, Insight, Stage, StageType};
use trek_gateway::parsing::decode_json;
use trek_gateway::{ModelGateway, ModelRequest, ModelSelector};
use trek_settings::ExtractorSettings;

use crate::pattern::pattern_extract;
use crate::raw::RawInsight;

/// The result of one extraction pass, tagged with the path that produced it.
#[derive(Clone, Debug)]
pub struct Extraction {
    /// Extracted insights, already scored and tagged.
    pub insights: Vec<Insight>,
    /// Which path produced them.
    pub method: ExtractionMethod,
}

/// Extracts structured insights from stage output.
///
/// Holds no mutable state; one instance serves concurrent per-stage tasks.
#[derive(Clone, Debug)]
pub struct InsightExtractor {
    gateway: Arc<ModelGateway>,
    settings: ExtractorSettings,
}

impl InsightExtractor {
    /// Create an extractor over a gateway.
    #[must_use]
    pub fn new(gateway: Arc<ModelGateway>, settings: ExtractorSettings) -> Self {
        Self { gateway, settings }
    }

    /// Extract insights from one stage's result text.
    ///
    /// Inputs shorter than the configured minimum are skipped without a
    /// backend call. Backend failures and malformed output fall back to
    /// [`pattern_extract`]; the returned [`Extraction::method`] records which
    /// path ran.
    pub async fn extract(
        &self,
        text: &str,
        stage_type: StageType,
        stage_ordinal: u32,
    ) -> Extraction {
        if text.chars().count() < self.settings.min_input_chars {
            trace!(
                stage_ordinal,
                min_chars = self.settings.min_input_chars,
                "input below extraction minimum, skipping"
            );
            return Extraction {
                insights: Vec::new(),
                method: ExtractionMethod::Pattern,
            };
        }

        let request = ModelRequest::new(self.build_prompt(text, stage_type))
            .with_model(ModelSelector::Balanced)
            .with_max_output_tokens(2_048);

        match self.gateway.execute(&request).await {
            Ok(response) => match decode_json::<Vec<RawInsight>>(&response.text) {
                Ok(raw) => {
                    let insights: Vec<Insight> = raw
                        .into_iter()
                        .filter(|r| !r.text.trim().is_empty())
                        .take(self.settings.max_insights)
                        .map(|r| r.into_insight(stage_ordinal, stage_type))
                        .collect();
                    debug!(stage_ordinal, count = insights.len(), "model extraction succeeded");
                    Extraction {
                        insights,
                        method: ExtractionMethod::Model,
                    }
                }
                Err(e) => {
                    warn!(
                        stage_ordinal,
                        error = %e,
                        "insight output failed schema decode, using pattern fallback"
                    );
                    self.fallback(text, stage_type, stage_ordinal)
                }
            },
            Err(e) => {
                warn!(
                    stage_ordinal,
                    kind = e.kind(),
                    error = %e,
                    "gateway unavailable for extraction, using pattern fallback"
                );
                self.fallback(text, stage_type, stage_ordinal)
            }
        }
    }

    /// Run the deterministic cue-phrase scan directly.
    #[must_use]
    pub fn pattern_extract(
        &self,
        text: &str,
        stage_type: StageType,
        stage_ordinal: u32,
    ) -> Vec<Insight> {
        pattern_extract(text, stage_type, stage_ordinal, self.settings.max_insights)
    }

    /// Extract insights for many stages concurrently.
    pub async fn extract_batch(&self, stages: &[Stage]) -> Vec<Extraction> {
        join_all(
            stages
                .iter()
                .map(|stage| self.extract(&stage.result_text, stage.stage_type, stage.ordinal)),
        )
        .await
    }

    fn fallback(&self, text: &str, stage_type: StageType, stage_ordinal: u32) -> Extraction {
        Extraction {
            insights: self.pattern_extract(text, stage_type, stage_ordinal),
            method: ExtractionMethod::Pattern,
        }
    }

    fn build_prompt(&self, text: &str, stage_type: StageType) -> String {
        format!(
            "Extract the 5-{max} most significant insights from this {stage} stage output.\n\
             \n\
             Respond with ONLY a JSON array, no prose. Each element:\n\
             {{\"text\": string, \"category\": \"discovery|problem|solution|question|connection|recommendation|synthesis\",\n\
             \"importance\": \"critical|high|medium|low\", \"confidence\": \"verified|high|medium|low|speculative\",\n\
             \"evidence\": [string], \"assumptions\": [string]}}\n\
             \n\
             Stage output:\n\
             {text}",
            max = self.settings.max_insights,
            stage = stage_type.as_str(),
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
