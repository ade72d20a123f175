//! The context summarizer: incremental cluster folding, digests, budget.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, trace, warn};
use trek_core::{
    ClusterId, Insight, JourneyId, Stage, TrackedQuestion, estimate_tokens, truncate_str,
};
use trek_gateway::{ModelGateway, ModelRequest, ModelSelector};
use trek_settings::SummarizerSettings;

use crate::contradictions::detect_contradictions;
use crate::patterns::detect_patterns;
use crate::types::{ClusterSummary, ContextSummary};

/// Stage count below which only the minimal summary is built.
const MIN_STAGES_FOR_STRUCTURE: usize = 3;

/// Builds and incrementally updates the journey's [`ContextSummary`].
///
/// Holds no mutable state. Every backend-dependent step degrades to a
/// deterministic template on gateway failure, so a rebuild always succeeds.
#[derive(Clone, Debug)]
pub struct ContextSummarizer {
    gateway: Arc<ModelGateway>,
    settings: SummarizerSettings,
}

impl ContextSummarizer {
    /// Create a summarizer over a gateway.
    #[must_use]
    pub fn new(gateway: Arc<ModelGateway>, settings: SummarizerSettings) -> Self {
        Self { gateway, settings }
    }

    /// Rebuild the context summary from the full accumulated history.
    ///
    /// Cluster summaries carried in `previous` are reused verbatim; only
    /// newly completed runs are summarized. The version increments by
    /// exactly 1 per rebuild.
    pub async fn build_summary(
        &self,
        journey_id: JourneyId,
        goal: &str,
        stages: &[Stage],
        insights: &[Insight],
        questions: &[TrackedQuestion],
        previous: Option<&ContextSummary>,
    ) -> ContextSummary {
        let version = previous.map_or(1, |p| p.version + 1);
        let mut ordered: Vec<Stage> = stages.to_vec();
        ordered.sort_by_key(|s| s.ordinal);

        if ordered.len() < MIN_STAGES_FOR_STRUCTURE {
            trace!(stage_count = ordered.len(), "too few stages, building minimal summary");
            return self.minimal_summary(journey_id, goal, &ordered, insights, questions, previous, version);
        }

        let clusters = self.build_clusters(&ordered, insights, questions, previous).await;
        let narrative = self.build_narrative(goal, &ordered, &clusters, insights, questions).await;
        let insight_digest = self.build_insight_digest(insights).await;
        let question_digest = self.build_question_digest(questions).await;
        let patterns = detect_patterns(&ordered, insights, self.settings.max_patterns);
        let contradictions = detect_contradictions(insights, self.settings.max_contradictions);

        let summary = ContextSummary {
            journey_id,
            narrative,
            clusters,
            insight_digest,
            question_digest,
            patterns,
            contradictions,
            version,
            updated_at: Utc::now(),
        };
        self.enforce_budget(summary)
    }

    /// Single-paragraph summary for journeys too short to structure.
    #[allow(clippy::too_many_arguments)]
    fn minimal_summary(
        &self,
        journey_id: JourneyId,
        goal: &str,
        ordered: &[Stage],
        insights: &[Insight],
        questions: &[TrackedQuestion],
        previous: Option<&ContextSummary>,
        version: u64,
    ) -> ContextSummary {
        let narrative = match ordered.last() {
            Some(latest) => format!(
                "{}. {} stage(s) completed; latest ({}): {}",
                truncate_str(goal.trim(), 200),
                ordered.len(),
                latest.stage_type,
                truncate_str(latest.result_text.trim(), 400),
            ),
            None => format!("{}. No stages completed yet.", truncate_str(goal.trim(), 200)),
        };
        let open_count = questions.iter().filter(|q| q.is_open()).count();
        ContextSummary {
            journey_id,
            narrative,
            clusters: previous.map(|p| p.clusters.clone()).unwrap_or_default(),
            insight_digest: fallback_insight_digest(insights, 3),
            question_digest: if open_count == 0 {
                ALL_ANSWERED.to_string()
            } else {
                format!("{open_count} question(s) remain open.")
            },
            patterns: Vec::new(),
            contradictions: Vec::new(),
            version,
            updated_at: Utc::now(),
        }
    }

    // ── cluster step ─────────────────────────────────────────────────────

    /// Reuse existing clusters verbatim; summarize newly completed runs in
    /// ascending order. A trailing partial run is left for a later rebuild.
    async fn build_clusters(
        &self,
        ordered: &[Stage],
        insights: &[Insight],
        questions: &[TrackedQuestion],
        previous: Option<&ContextSummary>,
    ) -> Vec<ClusterSummary> {
        let mut clusters: Vec<ClusterSummary> =
            previous.map(|p| p.clusters.clone()).unwrap_or_default();
        let size = self.settings.cluster_size.max(1);
        let complete_runs = ordered.len() / size;

        // Budget compression may have shed the oldest clusters, so the
        // resume point comes from what the carried-over tail actually
        // covers, not from the list length.
        let start_run = match clusters.last().and_then(|c| c.ordinals.last().copied()) {
            Some(last_covered) => ordered
                .iter()
                .take_while(|s| s.ordinal <= last_covered)
                .count()
                .div_ceil(size),
            None => 0,
        };
        for run_index in start_run..complete_runs {
            let run = &ordered[run_index * size..(run_index + 1) * size];
            clusters.push(self.summarize_run(run, insights, questions).await);
        }
        debug!(total = clusters.len(), "cluster list up to date");
        clusters
    }

    async fn summarize_run(
        &self,
        run: &[Stage],
        insights: &[Insight],
        questions: &[TrackedQuestion],
    ) -> ClusterSummary {
        let ordinals: Vec<u32> = run.iter().map(|s| s.ordinal).collect();
        let stage_types = run.iter().map(|s| s.stage_type).collect();
        let run_insights: Vec<&Insight> = insights
            .iter()
            .filter(|i| ordinals.contains(&i.stage_ordinal))
            .collect();
        let run_questions: Vec<&TrackedQuestion> = questions
            .iter()
            .filter(|q| ordinals.contains(&q.stage_ordinal))
            .collect();

        let prompt = build_run_prompt(run, &run_insights, &run_questions);
        let request = ModelRequest::new(prompt)
            .with_model(ModelSelector::Fast)
            .with_max_output_tokens(256);
        let summary = match self.gateway.execute(&request).await {
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                warn!(
                    first = ordinals.first(),
                    kind = e.kind(),
                    error = %e,
                    "cluster summarization failed, using templated sentence"
                );
                fallback_run_sentence(run, run_insights.len(), run_questions.len())
            }
        };

        ClusterSummary {
            id: ClusterId::new(),
            ordinals,
            stage_types,
            summary,
            insight_refs: run_insights.iter().map(|i| i.id.clone()).collect(),
            question_refs: run_questions.iter().map(|q| q.id.clone()).collect(),
        }
    }

    // ── narrative step ───────────────────────────────────────────────────

    async fn build_narrative(
        &self,
        goal: &str,
        ordered: &[Stage],
        clusters: &[ClusterSummary],
        insights: &[Insight],
        questions: &[TrackedQuestion],
    ) -> String {
        let cluster_lines: Vec<String> =
            clusters.iter().map(|c| format!("- {}", c.summary)).collect();
        let recent: Vec<String> = ordered
            .iter()
            .rev()
            .take(2)
            .map(|s| format!("[{}] {}", s.stage_type, truncate_str(&s.result_text, 800)))
            .collect();
        let prompt = format!(
            "Write a 2-3 paragraph narrative of this exploration so far.\n\
             \n\
             Goal: {goal}\n\
             \n\
             Progress so far:\n{clusters}\n\
             \n\
             Most recent stages:\n{recent}",
            clusters = cluster_lines.join("\n"),
            recent = recent.join("\n\n"),
        );
        let request = ModelRequest::new(prompt).with_max_output_tokens(1_024);
        match self.gateway.execute(&request).await {
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "narrative step failed, using template");
                let open = questions.iter().filter(|q| q.is_open()).count();
                let latest = ordered.last().map_or("none", |s| s.stage_type.as_str());
                format!(
                    "Goal: {}. {} stages completed across {} clusters; latest stage was {}. \
                     {} insights and {} open questions accumulated.",
                    truncate_str(goal.trim(), 200),
                    ordered.len(),
                    clusters.len(),
                    latest,
                    insights.len(),
                    open,
                )
            }
        }
    }

    // ── digest steps ─────────────────────────────────────────────────────

    async fn build_insight_digest(&self, insights: &[Insight]) -> String {
        if insights.is_empty() {
            return NO_INSIGHTS.to_string();
        }
        let ranked = rank_insights(insights);
        let top: Vec<String> = ranked
            .iter()
            .take(10)
            .map(|i| format!("- [{}/{}] {}", i.importance.as_str(), i.category.as_str(), i.text))
            .collect();
        let prompt = format!(
            "Condense these insights into 3-4 sentences, keeping the most \
             important claims:\n{}",
            top.join("\n"),
        );
        let request = ModelRequest::new(prompt)
            .with_model(ModelSelector::Fast)
            .with_max_output_tokens(512);
        match self.gateway.execute(&request).await {
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "insight digest failed, listing verbatim");
                fallback_insight_digest(insights, 5)
            }
        }
    }

    async fn build_question_digest(&self, questions: &[TrackedQuestion]) -> String {
        let mut open: Vec<&TrackedQuestion> = questions.iter().filter(|q| q.is_open()).collect();
        if open.is_empty() {
            return ALL_ANSWERED.to_string();
        }
        open.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        let top: Vec<String> = open
            .iter()
            .take(5)
            .map(|q| format!("- [{}] {}", q.priority.as_str(), q.text))
            .collect();
        let prompt = format!(
            "Condense these open questions into a short statement of what \
             still needs answering:\n{}",
            top.join("\n"),
        );
        let request = ModelRequest::new(prompt)
            .with_model(ModelSelector::Fast)
            .with_max_output_tokens(512);
        match self.gateway.execute(&request).await {
            Ok(response) => response.text.trim().to_string(),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "question digest failed, listing verbatim");
                let texts: Vec<&str> = open.iter().take(3).map(|q| q.text.as_str()).collect();
                format!("Open questions: {}", texts.join("; "))
            }
        }
    }

    // ── budget enforcement ───────────────────────────────────────────────

    /// The serialized summary must fit within 1.2x the token budget. When it
    /// does not, drop all but the most recent clusters and truncate the
    /// prose fields to caps derived from the budget, shedding detected
    /// patterns, provenance refs, and further clusters if truncation alone
    /// is not enough; no further backend calls are made.
    fn enforce_budget(&self, mut summary: ContextSummary) -> ContextSummary {
        let limit = self.settings.token_budget + self.settings.token_budget / 5;
        let estimate = serialized_tokens(&summary);
        if estimate <= limit {
            return summary;
        }

        warn!(
            estimate,
            budget = self.settings.token_budget,
            "context summary over budget, compressing"
        );
        let keep = self.settings.max_recent_clusters_on_compress;
        if summary.clusters.len() > keep {
            summary.clusters = summary.clusters.split_off(summary.clusters.len() - keep);
        }

        let budget_chars = self.settings.token_budget.saturating_mul(4);
        let mut narrative_cap = budget_chars / 16;
        let mut digest_cap = budget_chars / 50;
        let mut cluster_cap = budget_chars / 80;
        loop {
            for cluster in &mut summary.clusters {
                cluster.summary = truncate_str(&cluster.summary, cluster_cap.max(8));
            }
            summary.narrative = truncate_str(&summary.narrative, narrative_cap.max(8));
            summary.insight_digest = truncate_str(&summary.insight_digest, digest_cap.max(8));
            summary.question_digest = truncate_str(&summary.question_digest, digest_cap.max(8));
            if serialized_tokens(&summary) <= limit {
                break;
            }
            if narrative_cap > 8 {
                narrative_cap /= 2;
                digest_cap /= 2;
                cluster_cap /= 2;
            } else if !summary.patterns.is_empty() || !summary.contradictions.is_empty() {
                summary.patterns.clear();
                summary.contradictions.clear();
            } else if summary
                .clusters
                .iter()
                .any(|c| !c.insight_refs.is_empty() || !c.question_refs.is_empty())
            {
                for cluster in &mut summary.clusters {
                    cluster.insight_refs.clear();
                    cluster.question_refs.clear();
                }
            } else if summary.clusters.is_empty() {
                break;
            } else {
                let _ = summary.clusters.remove(0);
            }
        }
        debug!(estimate = serialized_tokens(&summary), "summary compressed");
        summary
    }
}

/// Fixed sentence when every tracked question is resolved.
const ALL_ANSWERED: &str = "All tracked questions have been answered.";

/// Fixed sentence when no insights exist yet.
const NO_INSIGHTS: &str = "No insights have been extracted yet.";

/// Estimated token size of the serialized summary.
fn serialized_tokens(summary: &ContextSummary) -> usize {
    serde_json::to_string(summary).map_or(0, |s| estimate_tokens(&s))
}

/// Importance descending, ties broken by recency.
fn rank_insights(insights: &[Insight]) -> Vec<&Insight> {
    let mut ranked: Vec<&Insight> = insights.iter().collect();
    ranked.sort_by(|a, b| {
        b.importance
            .rank()
            .cmp(&a.importance.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    ranked
}

fn fallback_insight_digest(insights: &[Insight], take: usize) -> String {
    if insights.is_empty() {
        return NO_INSIGHTS.to_string();
    }
    let texts: Vec<&str> = rank_insights(insights)
        .into_iter()
        .take(take)
        .map(|i| i.text.as_str())
        .collect();
    format!("Top insights: {}", texts.join("; "))
}

fn fallback_run_sentence(run: &[Stage], insight_count: usize, question_count: usize) -> String {
    let first = run.first().map_or(0, |s| s.ordinal);
    let last = run.last().map_or(0, |s| s.ordinal);
    let types: Vec<&str> = run.iter().map(|s| s.stage_type.as_str()).collect();
    format!(
        "Stages {first}-{last} ({}) produced {insight_count} insights and raised \
         {question_count} questions.",
        types.join(", "),
    )
}

fn build_run_prompt(
    run: &[Stage],
    insights: &[&Insight],
    questions: &[&TrackedQuestion],
) -> String {
    let stage_blocks: Vec<String> = run
        .iter()
        .map(|s| format!("Stage {} ({}): {}", s.ordinal, s.stage_type, truncate_str(&s.result_text, 600)))
        .collect();
    let insight_lines: Vec<String> = insights.iter().map(|i| format!("- {}", i.text)).collect();
    let question_lines: Vec<String> = questions.iter().map(|q| format!("- {}", q.text)).collect();
    format!(
        "Summarize this run of exploration stages in 2-3 sentences.\n\
         \n\
         {stages}\n\
         \n\
         Insights from these stages:\n{insights}\n\
         \n\
         Questions raised:\n{questions}",
        stages = stage_blocks.join("\n\n"),
        insights = if insight_lines.is_empty() { "(none)".to_string() } else { insight_lines.join("\n") },
        questions = if question_lines.is_empty() { "(none)".to_string() } else { question_lines.join("\n") },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
