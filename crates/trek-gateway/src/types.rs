//! Request, response, and stream-delta types for the gateway.

use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Which backend model tier to use for a request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelSelector {
    /// Cheap, low-latency tier for mechanical condensation.
    Fast,
    /// Default tier.
    #[default]
    Balanced,
    /// Highest-quality tier for synthesis-heavy work.
    Deep,
}

impl ModelSelector {
    /// Stable snake_case name, matching the serde representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Deep => "deep",
        }
    }
}

/// A single request to the model backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelRequest {
    /// The full prompt text.
    pub prompt: String,
    /// Model tier selector.
    pub model: ModelSelector,
    /// Maximum output size in tokens.
    pub max_output_tokens: u32,
    /// Enable extended deliberation.
    pub extended_deliberation: bool,
    /// Deliberation token budget (only meaningful with extended deliberation).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliberation_budget: Option<u32>,
    /// Request incremental streaming from the backend.
    pub stream: bool,
}

impl ModelRequest {
    /// Create a request with defaults: balanced model, 4096 output tokens,
    /// no deliberation, no streaming.
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: ModelSelector::Balanced,
            max_output_tokens: 4_096,
            extended_deliberation: false,
            deliberation_budget: None,
            stream: false,
        }
    }

    /// Set the model tier.
    #[must_use]
    pub fn with_model(mut self, model: ModelSelector) -> Self {
        self.model = model;
        self
    }

    /// Set the maximum output size.
    #[must_use]
    pub fn with_max_output_tokens(mut self, max: u32) -> Self {
        self.max_output_tokens = max;
        self
    }

    /// Enable extended deliberation with an optional budget.
    #[must_use]
    pub fn with_deliberation(mut self, budget: Option<u32>) -> Self {
        self.extended_deliberation = true;
        self.deliberation_budget = budget;
        self
    }

    /// Request streaming delivery.
    #[must_use]
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// Usage counters reported by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub input_tokens: u64,
    /// Tokens produced in the response.
    pub output_tokens: u64,
}

/// The backend's product before gateway post-processing.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawResponse {
    /// Final response text.
    pub text: String,
    /// Optional deliberation trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliberation_trace: Option<String>,
    /// Usage counters.
    #[serde(default)]
    pub usage: TokenUsage,
}

/// A code/data block found via fenced-block scanning of the response text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArtifact {
    /// Language tag on the opening fence, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Block content, without the fences.
    pub content: String,
}

/// A complete gateway response: backend output plus extracted artifacts.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelResponse {
    /// Final response text.
    pub text: String,
    /// Optional deliberation trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliberation_trace: Option<String>,
    /// Artifacts extracted from the text.
    #[serde(default)]
    pub artifacts: Vec<ExtractedArtifact>,
    /// Usage counters.
    #[serde(default)]
    pub usage: TokenUsage,
}

/// One incremental event from a streaming backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamDelta {
    /// The stream has opened.
    Start,
    /// A chunk of response text.
    Text {
        /// The text fragment.
        text: String,
    },
    /// A chunk of deliberation trace.
    Deliberation {
        /// The deliberation fragment.
        text: String,
    },
    /// Usage counters (typically sent once, near the end).
    Usage {
        /// The reported usage.
        usage: TokenUsage,
    },
    /// The stream has completed normally.
    Done,
}

/// Boxed stream of [`StreamDelta`]s returned by a streaming backend.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<StreamDelta, GatewayError>> + Send>>;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
