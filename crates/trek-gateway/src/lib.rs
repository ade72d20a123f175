//! # trek-gateway
//!
//! Uniform request/response interface to a language-model backend.
//!
//! The gateway owns the concerns no other pipeline component should care
//! about:
//!
//! - **Retry**: transient failures are retried with exponential backoff,
//!   up to a configured attempt ceiling; everything else propagates unchanged
//! - **Streaming**: inbound text/deliberation deltas are folded through an
//!   incremental state machine into a complete response, with the same retry
//!   policy wrapped around the whole stream lifecycle
//! - **Response parsing**: fenced-block artifact extraction and
//!   schema-validated JSON decoding
//!
//! The gateway has no knowledge of journeys or stages. Components receive a
//! [`ModelGateway`] at construction (no globals) and a
//! `CancellationToken` is honored at every suspend point.

#![deny(unsafe_code)]

pub mod accumulator;
pub mod error;
pub mod gateway;
pub mod http;
pub mod parsing;
pub mod types;

pub use accumulator::StreamAccumulator;
pub use error::GatewayError;
pub use gateway::{ModelBackend, ModelGateway};
pub use http::HttpBackend;
pub use parsing::{decode_json, extract_artifacts, strip_code_fences};
pub use types::{
    DeltaStream, ExtractedArtifact, ModelRequest, ModelResponse, ModelSelector, RawResponse,
    StreamDelta, TokenUsage,
};
