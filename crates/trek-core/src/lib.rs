//! # trek-core
//!
//! Foundation types, branded IDs, and utilities for the Trek pipeline.
//!
//! This crate provides the shared vocabulary that all other Trek crates depend on:
//!
//! - **Branded IDs**: `StageId`, `InsightId`, `QuestionId`, `JourneyId`, `ClusterId`
//!   as newtypes for type safety
//! - **Stages**: the immutable `Stage` record and its 8-phase `StageType` enum
//! - **Insights**: structured distillations of stage output with deterministic
//!   quality scoring and tagging
//! - **Questions**: tracked open questions with priority and status
//! - **Retry**: portable backoff configuration and delay math
//! - **Text**: token estimation and safe truncation helpers

#![deny(unsafe_code)]

pub mod ids;
pub mod insight;
pub mod question;
pub mod retry;
pub mod stage;
pub mod text;

pub use ids::{ClusterId, InsightId, JourneyId, QuestionId, StageId};
pub use insight::{Confidence, ExtractionMethod, Importance, Insight, InsightCategory};
pub use question::{QuestionStatus, TrackedQuestion};
pub use retry::{calculate_backoff_delay, RetryConfig};
pub use stage::{Stage, StageArtifact, StageType};
pub use text::{estimate_tokens, truncate_str};
