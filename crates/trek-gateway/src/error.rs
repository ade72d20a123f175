//! Gateway error taxonomy with transient-network classification.
//!
//! Callers branch on [`GatewayError::is_retryable`]; the retry loop in
//! [`crate::gateway`] consumes it. Everything non-retryable propagates to the
//! calling component, which decides between fallback and failure.

use thiserror::Error;

/// Fixed set of transient-network signatures.
///
/// An error message matching any of these (case-insensitive substring) is
/// classified as retry-eligible.
const TRANSIENT_SIGNATURES: &[&str] = &[
    "connection reset",
    "connection refused",
    "connection closed",
    "timed out",
    "timeout",
    "dns",
    "name resolution",
    "protocol error",
    "broken pipe",
    "temporarily unavailable",
];

/// Errors that can occur during gateway operations.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Classified transient-network failure.
    #[error("transient network error: {message}")]
    Transient {
        /// Error description.
        message: String,
    },

    /// Authentication failed (invalid or expired credentials).
    #[error("authentication error: {message}")]
    Auth {
        /// Error description.
        message: String,
    },

    /// The backend rejected the request as malformed.
    #[error("malformed request: {message}")]
    MalformedRequest {
        /// Error description.
        message: String,
    },

    /// The backend returned an API error.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
        /// Whether this error can be retried.
        retryable: bool,
    },

    /// The delta stream violated the streaming protocol.
    #[error("stream protocol error: {message}")]
    Protocol {
        /// Error description.
        message: String,
    },

    /// The operation was cancelled.
    #[error("operation cancelled")]
    Cancelled,

    /// Unclassified failure.
    #[error("{message}")]
    Unknown {
        /// Error description.
        message: String,
    },
}

impl GatewayError {
    /// Classify a raw error message: transient-network signatures become
    /// [`GatewayError::Transient`], everything else [`GatewayError::Unknown`].
    #[must_use]
    pub fn classify_message(message: impl Into<String>) -> Self {
        let message = message.into();
        if is_transient_signature(&message) {
            Self::Transient { message }
        } else {
            Self::Unknown { message }
        }
    }

    /// Whether the retry loop may re-attempt after this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s == reqwest::StatusCode::TOO_MANY_REQUESTS || s.is_server_error()
                    })
            }
            Self::Transient { .. } => true,
            Self::Api { retryable, .. } => *retryable,
            Self::Json(_)
            | Self::Auth { .. }
            | Self::MalformedRequest { .. }
            | Self::Protocol { .. }
            | Self::Cancelled
            | Self::Unknown { .. } => false,
        }
    }

    /// Error kind string for logging and the external interface contract.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http(_) | Self::Transient { .. } => "transient-network",
            Self::Auth { .. } => "authentication",
            Self::MalformedRequest { .. } => "malformed-request",
            Self::Api { .. } => "api",
            Self::Json(_) | Self::Protocol { .. } => "malformed-output",
            Self::Cancelled => "cancelled",
            Self::Unknown { .. } => "unknown",
        }
    }
}

/// Check a message against the fixed transient-network signature list.
#[must_use]
pub fn is_transient_signature(message: &str) -> bool {
    let lowered = message.to_lowercase();
    TRANSIENT_SIGNATURES.iter().any(|sig| lowered.contains(sig))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
