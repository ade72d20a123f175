//! The gateway proper: backend trait, retry loop, stream consumption.
//!
//! [`ModelGateway`] wraps a [`ModelBackend`] with the retry/backoff policy
//! and cancellation handling, and post-processes successful responses
//! (artifact extraction). It keeps no mutable state between calls, so a
//! single instance can be shared across concurrent per-stage tasks.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};
use trek_core::retry::{calculate_backoff_delay, RetryConfig};

use crate::accumulator::StreamAccumulator;
use crate::error::GatewayError;
use crate::parsing::extract_artifacts;
use crate::types::{DeltaStream, ModelRequest, ModelResponse, RawResponse};

/// A language-model backend.
///
/// Implementors must be `Send + Sync` for use across async tasks. The
/// gateway calls [`execute`](ModelBackend::execute) for request/response
/// mode and [`execute_stream`](ModelBackend::execute_stream) when the
/// request asks for streaming.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Execute a request and return the complete response.
    async fn execute(&self, request: &ModelRequest) -> Result<RawResponse, GatewayError>;

    /// Execute a request and return a stream of deltas.
    async fn execute_stream(&self, request: &ModelRequest) -> Result<DeltaStream, GatewayError>;
}

#[async_trait]
impl<T: ModelBackend> ModelBackend for Arc<T> {
    async fn execute(&self, request: &ModelRequest) -> Result<RawResponse, GatewayError> {
        (**self).execute(request).await
    }
    async fn execute_stream(&self, request: &ModelRequest) -> Result<DeltaStream, GatewayError> {
        (**self).execute_stream(request).await
    }
}

/// Resilient request/response interface to a model backend.
#[derive(Clone)]
pub struct ModelGateway {
    backend: Arc<dyn ModelBackend>,
    retry: RetryConfig,
    cancel_token: CancellationToken,
}

impl ModelGateway {
    /// Create a gateway over a backend with the given retry policy.
    #[must_use]
    pub fn new(backend: Arc<dyn ModelBackend>, retry: RetryConfig) -> Self {
        Self {
            backend,
            retry,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Attach a cancellation token honored at every suspend point.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Execute a request with retry.
    ///
    /// Retryable failures are re-attempted up to the configured ceiling with
    /// exponential backoff; non-retryable errors and exhaustion propagate
    /// unchanged. For streaming requests the same policy wraps the whole
    /// stream lifecycle: a stream that fails is discarded and restarted from
    /// scratch, so callers only ever see complete responses.
    pub async fn execute(&self, request: &ModelRequest) -> Result<ModelResponse, GatewayError> {
        let mut attempt: u32 = 1;
        loop {
            if self.cancel_token.is_cancelled() {
                return Err(GatewayError::Cancelled);
            }

            let result = if request.stream {
                self.consume_stream(request).await
            } else {
                tokio::select! {
                    result = self.backend.execute(request) => result,
                    () = self.cancel_token.cancelled() => {
                        return Err(GatewayError::Cancelled);
                    }
                }
            };

            match result {
                Ok(raw) => {
                    trace!(attempt, model = request.model.as_str(), "gateway request succeeded");
                    return Ok(finish_response(raw));
                }
                Err(err) if err.is_retryable() && attempt < self.retry.max_attempts => {
                    let delay_ms = calculate_backoff_delay(
                        attempt,
                        self.retry.base_delay_ms,
                        self.retry.max_delay_ms,
                        self.retry.jitter_factor,
                    );
                    warn!(
                        attempt,
                        max_attempts = self.retry.max_attempts,
                        delay_ms,
                        kind = err.kind(),
                        error = %err,
                        "gateway request failed, retrying"
                    );
                    tokio::select! {
                        () = tokio::time::sleep(Duration::from_millis(delay_ms)) => {}
                        () = self.cancel_token.cancelled() => {
                            return Err(GatewayError::Cancelled);
                        }
                    }
                    attempt += 1;
                }
                Err(err) => {
                    warn!(attempt, kind = err.kind(), error = %err, "gateway request failed");
                    return Err(err);
                }
            }
        }
    }

    /// Drive one complete stream lifecycle through the accumulator.
    async fn consume_stream(&self, request: &ModelRequest) -> Result<RawResponse, GatewayError> {
        let mut stream = self.backend.execute_stream(request).await?;
        let mut acc = StreamAccumulator::new();

        loop {
            let next = tokio::select! {
                item = stream.next() => item,
                () = self.cancel_token.cancelled() => {
                    return Err(GatewayError::Cancelled);
                }
            };
            match next {
                Some(delta) => acc.apply(delta?)?,
                None => break,
            }
        }

        acc.finish()
    }
}

impl std::fmt::Debug for ModelGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelGateway")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

/// Post-process a raw backend response into the gateway response.
fn finish_response(raw: RawResponse) -> ModelResponse {
    let artifacts = extract_artifacts(&raw.text);
    ModelResponse {
        text: raw.text,
        deliberation_trace: raw.deliberation_trace,
        artifacts,
        usage: raw.usage,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
