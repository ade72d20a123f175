//! HTTP implementation of [`ModelBackend`].
//!
//! POSTs the wire JSON from the external interface contract and maps HTTP
//! status codes onto the gateway error taxonomy. Streaming responses arrive
//! as SSE; the parser buffers chunked bytes, extracts `data: ` payloads,
//! filters `[DONE]` markers, and decodes each payload as a [`StreamDelta`].

use async_trait::async_trait;
use bytes::BytesMut;
use futures::Stream;
use tokio_stream::StreamExt;
use tracing::warn;
use trek_settings::GatewaySettings;

use crate::error::GatewayError;
use crate::gateway::ModelBackend;
use crate::types::{DeltaStream, ModelRequest, RawResponse, StreamDelta};

/// HTTP backend speaking the Trek wire protocol.
pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    /// Build a backend from gateway settings.
    pub fn new(settings: &GatewaySettings) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(settings.request_timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    async fn post(&self, request: &ModelRequest) -> Result<reqwest::Response, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(map_status(status.as_u16(), body))
    }
}

#[async_trait]
impl ModelBackend for HttpBackend {
    async fn execute(&self, request: &ModelRequest) -> Result<RawResponse, GatewayError> {
        let response = self.post(request).await?;
        Ok(response.json::<RawResponse>().await?)
    }

    async fn execute_stream(&self, request: &ModelRequest) -> Result<DeltaStream, GatewayError> {
        let response = self.post(request).await?;
        Ok(Box::pin(parse_sse_deltas(response.bytes_stream())))
    }
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Map an HTTP status code onto the gateway error taxonomy.
fn map_status(status: u16, body: String) -> GatewayError {
    match status {
        401 | 403 => GatewayError::Auth { message: body },
        400 | 422 => GatewayError::MalformedRequest { message: body },
        408 | 429 | 500..=599 => GatewayError::Api {
            status,
            message: body,
            retryable: true,
        },
        _ => GatewayError::Api {
            status,
            message: body,
            retryable: false,
        },
    }
}

/// Parse an SSE byte stream into [`StreamDelta`]s.
///
/// Buffers chunked bytes, splits on newlines, extracts `data: ` payloads,
/// and decodes each as a delta. Unparsable payloads are skipped with a
/// warning; a trailing un-terminated line is processed when the stream ends.
fn parse_sse_deltas<S>(
    byte_stream: S,
) -> impl Stream<Item = Result<StreamDelta, GatewayError>> + Send
where
    S: Stream<Item = Result<bytes::Bytes, reqwest::Error>> + Send + 'static,
{
    async_stream::stream! {
        let mut buffer = BytesMut::with_capacity(8192);
        let mut byte_stream = std::pin::pin!(byte_stream);

        loop {
            while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
                let mut line_bytes = buffer.split_to(newline_pos + 1);
                line_bytes.truncate(line_bytes.len() - 1);
                if line_bytes.last() == Some(&b'\r') {
                    line_bytes.truncate(line_bytes.len() - 1);
                }
                let Ok(line) = std::str::from_utf8(&line_bytes) else {
                    continue; // skip invalid UTF-8 lines
                };
                if let Some(data) = extract_sse_data(line) {
                    if let Some(delta) = parse_delta(&data) {
                        yield Ok(delta);
                    }
                }
            }

            match byte_stream.next().await {
                Some(Ok(chunk)) => {
                    buffer.extend_from_slice(&chunk);
                }
                Some(Err(e)) => {
                    yield Err(GatewayError::Http(e));
                    return;
                }
                None => {
                    // Stream ended — process any remaining buffer content
                    if !buffer.is_empty() {
                        if let Ok(line) = std::str::from_utf8(&buffer) {
                            if let Some(data) = extract_sse_data(line.trim()) {
                                if let Some(delta) = parse_delta(&data) {
                                    yield Ok(delta);
                                }
                            }
                        }
                    }
                    return;
                }
            }
        }
    }
}

/// Extract the data payload from an SSE line.
///
/// Returns `None` for comments, empty lines, non-data fields, and `[DONE]`
/// markers.
fn extract_sse_data(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(':') {
        return None;
    }
    let data = trimmed
        .strip_prefix("data: ")
        .or_else(|| trimmed.strip_prefix("data:"))?
        .trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }
    Some(data.to_string())
}

/// Decode one SSE data payload as a delta, skipping junk with a warning.
fn parse_delta(data: &str) -> Option<StreamDelta> {
    match serde_json::from_str(data) {
        Ok(delta) => Some(delta),
        Err(e) => {
            warn!(
                error = %e,
                data_preview = %trek_core::text::truncate_str(data, 100),
                "failed to parse SSE delta, skipping"
            );
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
