//! Settings types with compiled defaults.
//!
//! Every field has a serde default so partially-specified settings files
//! merge cleanly over the compiled values.

use serde::{Deserialize, Serialize};
use trek_core::retry::RetryConfig;

/// Top-level settings for the Trek pipeline.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrekSettings {
    /// Model gateway settings.
    #[serde(default)]
    pub gateway: GatewaySettings,
    /// Context summarizer settings.
    #[serde(default)]
    pub summarizer: SummarizerSettings,
    /// Insight extractor settings.
    #[serde(default)]
    pub extractor: ExtractorSettings,
    /// Quality scorer settings.
    #[serde(default)]
    pub quality: QualitySettings,
}

/// Model gateway settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewaySettings {
    /// Backend endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Default model name sent to the backend.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_endpoint() -> String {
    "http://localhost:8720/v1/generate".to_string()
}
fn default_model() -> String {
    "balanced".to_string()
}
fn default_request_timeout_ms() -> u64 {
    120_000
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            default_model: default_model(),
            request_timeout_ms: default_request_timeout_ms(),
            retry: RetryConfig::default(),
        }
    }
}

/// Context summarizer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizerSettings {
    /// Approximate token budget for the serialized context summary.
    #[serde(default = "default_token_budget")]
    pub token_budget: usize,
    /// Number of stages per cluster summary.
    #[serde(default = "default_cluster_size")]
    pub cluster_size: usize,
    /// Clusters kept when the summary is compressed over budget.
    #[serde(default = "default_max_recent_clusters")]
    pub max_recent_clusters_on_compress: usize,
    /// Maximum recurring-theme patterns surfaced.
    #[serde(default = "default_max_patterns")]
    pub max_patterns: usize,
    /// Maximum contradiction candidates surfaced.
    #[serde(default = "default_max_contradictions")]
    pub max_contradictions: usize,
}

fn default_token_budget() -> usize {
    8_000
}
fn default_cluster_size() -> usize {
    3
}
fn default_max_recent_clusters() -> usize {
    5
}
fn default_max_patterns() -> usize {
    5
}
fn default_max_contradictions() -> usize {
    3
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            token_budget: default_token_budget(),
            cluster_size: default_cluster_size(),
            max_recent_clusters_on_compress: default_max_recent_clusters(),
            max_patterns: default_max_patterns(),
            max_contradictions: default_max_contradictions(),
        }
    }
}

/// Insight extractor settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractorSettings {
    /// Minimum input length (chars) below which extraction is skipped.
    #[serde(default = "default_min_input_chars")]
    pub min_input_chars: usize,
    /// Maximum insights requested per stage.
    #[serde(default = "default_max_insights")]
    pub max_insights: usize,
}

fn default_min_input_chars() -> usize {
    100
}
fn default_max_insights() -> usize {
    10
}

impl Default for ExtractorSettings {
    fn default() -> Self {
        Self {
            min_input_chars: default_min_input_chars(),
            max_insights: default_max_insights(),
        }
    }
}

/// Quality scorer settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySettings {
    /// Overall score below which a stage is flagged for revision.
    #[serde(default = "default_revision_threshold")]
    pub revision_threshold: f64,
}

fn default_revision_threshold() -> f64 {
    6.0
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            revision_threshold: default_revision_threshold(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
