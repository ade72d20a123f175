//! Response parsing: fenced-block artifact extraction and schema-validated
//! JSON decoding.
//!
//! Backends frequently wrap structured JSON in Markdown code fences. The
//! decode step strips an optional fence wrapper and then performs a typed
//! `serde` decode, so malformed output is a value callers branch on rather
//! than a panic or an untyped `Value` walk.

use serde::de::DeserializeOwned;

use crate::error::GatewayError;
use crate::types::ExtractedArtifact;

/// Scan response text for fenced code blocks and extract them as artifacts.
///
/// A block opens with ``` followed by an optional language tag on the same
/// line and closes at the next line consisting of ```. An unterminated block
/// at end of input is ignored.
#[must_use]
pub fn extract_artifacts(text: &str) -> Vec<ExtractedArtifact> {
    let mut artifacts = Vec::new();
    let mut current: Option<(Option<String>, Vec<&str>)> = None;

    for line in text.lines() {
        let trimmed = line.trim_end();
        match &mut current {
            None => {
                if let Some(rest) = trimmed.strip_prefix("```") {
                    let lang = rest.trim();
                    let language = if lang.is_empty() {
                        None
                    } else {
                        Some(lang.to_string())
                    };
                    current = Some((language, Vec::new()));
                }
            }
            Some((language, lines)) => {
                if trimmed == "```" {
                    artifacts.push(ExtractedArtifact {
                        language: language.take(),
                        content: lines.join("\n"),
                    });
                    current = None;
                } else {
                    lines.push(line);
                }
            }
        }
    }

    artifacts
}

/// Strip an optional Markdown code-fence wrapper from a JSON candidate.
///
/// Accepts ```, ```json, and plain unfenced text; returns the payload
/// between the fences (or the trimmed input when unfenced).
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the rest of the opening fence line (e.g. a "json" tag)
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => return trimmed,
    };
    body.strip_suffix("```").map_or(body, str::trim).trim()
}

/// Schema-validated decode of backend JSON output.
///
/// Strips an optional fence wrapper, then performs a typed decode. The
/// resulting `Result` is the discriminant callers use to choose between the
/// structured path and the deterministic fallback.
pub fn decode_json<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let payload = strip_code_fences(text);
    Ok(serde_json::from_str(payload)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
