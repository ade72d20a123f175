//! Retry configuration and backoff calculation.
//!
//! Portable, sync-only building blocks for the gateway's retry loop. The
//! async execution (sleeps, cancellation) lives in `trek-gateway`, which has
//! access to tokio; this module owns the parameters and the math.

use serde::{Deserialize, Serialize};

/// Default total attempts (1 initial + 2 retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Default base delay in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 500;
/// Default maximum delay in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 8_000;
/// Default jitter factor (0.0–1.0).
pub const DEFAULT_JITTER_FACTOR: f64 = 0.0;

/// Configuration for the gateway retry loop.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryConfig {
    /// Maximum total attempts, including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay for exponential backoff in ms (default: 500).
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Maximum delay between attempts in ms (default: 8000).
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Jitter factor 0.0–1.0 (default: 0.0).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY_MS
}
fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY_MS
}
fn default_jitter_factor() -> f64 {
    DEFAULT_JITTER_FACTOR
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            jitter_factor: DEFAULT_JITTER_FACTOR,
        }
    }
}

/// Calculate exponential backoff delay before retry attempt `attempt`.
///
/// Formula: `min(max_delay, base_delay * 2^(attempt - 1)) * (1 + jitter)`.
///
/// `attempt` is 1-based: the delay before the first retry uses `attempt = 1`
/// and equals `base_delay_ms`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn calculate_backoff_delay(
    attempt: u32,
    base_delay_ms: u64,
    max_delay_ms: u64,
    jitter_factor: f64,
) -> u64 {
    let shift = attempt.saturating_sub(1).min(31);
    let exponential = base_delay_ms.saturating_mul(1u64 << shift);
    let capped = exponential.min(max_delay_ms);

    // Jitter widens the delay upward; callers wanting randomness scale the
    // factor themselves before passing it in.
    let with_jitter = (capped as f64) * (1.0 + jitter_factor);
    with_jitter.round() as u64
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_config_defaults() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 500);
        assert_eq!(config.max_delay_ms, 8_000);
        assert!(config.jitter_factor.abs() < f64::EPSILON);
    }

    #[test]
    fn retry_config_serde_defaults() {
        let config: RetryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.base_delay_ms, 500);
    }

    #[test]
    fn retry_config_serde_roundtrip() {
        let config = RetryConfig {
            max_attempts: 5,
            base_delay_ms: 250,
            max_delay_ms: 4_000,
            jitter_factor: 0.1,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("maxAttempts"));
        let back: RetryConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_attempts, 5);
        assert_eq!(back.base_delay_ms, 250);
    }

    #[test]
    fn backoff_exponential_growth() {
        assert_eq!(calculate_backoff_delay(1, 500, 8_000, 0.0), 500);
        assert_eq!(calculate_backoff_delay(2, 500, 8_000, 0.0), 1_000);
        assert_eq!(calculate_backoff_delay(3, 500, 8_000, 0.0), 2_000);
        assert_eq!(calculate_backoff_delay(4, 500, 8_000, 0.0), 4_000);
    }

    #[test]
    fn backoff_caps_at_max() {
        assert_eq!(calculate_backoff_delay(10, 500, 8_000, 0.0), 8_000);
    }

    #[test]
    fn backoff_attempt_zero_treated_as_first() {
        // saturating_sub keeps attempt 0 from underflowing
        assert_eq!(calculate_backoff_delay(0, 500, 8_000, 0.0), 500);
    }

    #[test]
    fn backoff_jitter_widens_delay() {
        let delay = calculate_backoff_delay(1, 1_000, 8_000, 0.2);
        assert_eq!(delay, 1_200);
    }

    #[test]
    fn backoff_high_attempt_no_overflow() {
        let delay = calculate_backoff_delay(100, 500, 8_000, 0.0);
        assert_eq!(delay, 8_000);
    }
}
