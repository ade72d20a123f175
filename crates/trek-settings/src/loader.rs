//! Settings loading with deep merge and environment variable overrides.
//!
//! Loading flow:
//! 1. Start with compiled [`TrekSettings::default()`]
//! 2. If `~/.trek/settings.json` exists, deep-merge user values over defaults
//! 3. Apply environment variable overrides (highest priority)
//!
//! Deep merge rules:
//! - Objects are merged recursively (source overrides target per-key)
//! - Arrays and primitives are replaced entirely by source
//! - Null values in source are skipped (preserving target)

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::TrekSettings;

/// Resolve the path to the settings file (`~/.trek/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".trek").join("settings.json")
}

/// Load settings from the default path with env var overrides.
pub fn load_settings() -> Result<TrekSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from a specific path with env var overrides.
///
/// If the file does not exist, returns defaults. If the file contains
/// invalid JSON, returns an error.
pub fn load_settings_from_path(path: &Path) -> Result<TrekSettings> {
    let defaults = serde_json::to_value(TrekSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings from file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "settings file not found, using defaults");
        defaults
    };

    let mut settings: TrekSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values.
///
/// - Objects are merged recursively (source overrides target per-key)
/// - Arrays and primitives are replaced entirely by source
/// - Null values in source are skipped (preserving target)
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = if let Some(target_val) = target_map.remove(&key) {
                    deep_merge(target_val, source_val)
                } else {
                    source_val
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply environment variable overrides to loaded settings.
///
/// Each env var has strict parsing rules; invalid values are silently
/// ignored (fall back to file/default).
pub fn apply_env_overrides(settings: &mut TrekSettings) {
    if let Some(v) = read_env_string("TREK_ENDPOINT") {
        settings.gateway.endpoint = v;
    }
    if let Some(v) = read_env_string("TREK_MODEL") {
        settings.gateway.default_model = v;
    }
    if let Some(v) = read_env_usize("TREK_TOKEN_BUDGET", 100, 1_000_000) {
        settings.summarizer.token_budget = v;
    }
    if let Some(v) = read_env_usize("TREK_CLUSTER_SIZE", 1, 100) {
        settings.summarizer.cluster_size = v;
    }
    if let Some(v) = read_env_usize("TREK_MAX_ATTEMPTS", 1, 10) {
        #[allow(clippy::cast_possible_truncation)]
        {
            settings.gateway.retry.max_attempts = v as u32;
        }
    }
    if let Some(v) = read_env_usize("TREK_MIN_INPUT_CHARS", 0, 100_000) {
        settings.extractor.min_input_chars = v;
    }
}

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let raw = std::env::var(name).ok()?;
    let parsed = parse_usize_in_range(&raw, min, max);
    if parsed.is_none() {
        debug!(name, raw, "env override invalid or out of range, ignoring");
    }
    parsed
}

/// Strict integer parsing with an inclusive range check.
fn parse_usize_in_range(raw: &str, min: usize, max: usize) -> Option<usize> {
    let parsed = raw.trim().parse::<usize>().ok()?;
    if parsed < min || parsed > max {
        return None;
    }
    Some(parsed)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
