//! # Trek Context
//!
//! Folds stage history, insights, and tracked questions into a hierarchical,
//! token-budgeted [`ContextSummary`] for re-injection into future prompts.
//!
//! Cluster summaries are immutable once created: a rebuild reuses every
//! existing cluster verbatim and only summarizes newly completed runs, which
//! keeps summarization cost linear in stage count. Every backend-dependent
//! step carries a deterministic fallback, so a dead backend degrades the
//! summary's prose without ever failing the rebuild.

pub mod contradictions;
pub mod format;
pub mod patterns;
pub mod summarizer;
pub mod types;

pub use contradictions::detect_contradictions;
pub use format::format_for_prompt;
pub use patterns::detect_patterns;
pub use summarizer::ContextSummarizer;
pub use types::{ClusterSummary, ContextSummary, Contradiction};
