//! Deterministic cue-phrase extraction.
//!
//! The fallback path when the backend is unavailable or returns junk. Scans
//! line by line for bullet items and finding-style cue phrases; everything it
//! produces carries medium importance and medium confidence, with the matched
//! line as evidence.

use chrono::Utc;
use trek_core::{
    Confidence, ExtractionMethod, Importance, Insight, InsightCategory, InsightId, StageType,
    truncate_str,
};

/// Cue phrases that mark a line as a probable finding.
const CUE_PHRASES: &[&str] = &[
    "discovered",
    "found",
    "insight",
    "important",
    "key finding",
    "learned",
    "realized",
];

/// Maximum characters kept for a pattern-extracted claim.
const MAX_CLAIM_CHARS: usize = 200;

/// Scan stage text for bullet items and cue-phrase lines.
///
/// Bullet lines become insights directly (category `Question` when the line
/// contains a question mark, `Discovery` otherwise). Non-bullet lines are
/// kept when they contain a cue phrase. Results are capped at `max_insights`.
#[must_use]
pub fn pattern_extract(
    text: &str,
    stage_type: StageType,
    stage_ordinal: u32,
    max_insights: usize,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    for line in text.lines() {
        if insights.len() >= max_insights {
            break;
        }
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(claim) = strip_bullet(trimmed) {
            let category = if claim.contains('?') {
                InsightCategory::Question
            } else {
                InsightCategory::Discovery
            };
            insights.push(make_insight(claim, trimmed, category, stage_type, stage_ordinal));
        } else if contains_cue(trimmed) {
            insights.push(make_insight(
                trimmed,
                trimmed,
                InsightCategory::Discovery,
                stage_type,
                stage_ordinal,
            ));
        }
    }

    insights
}

/// Strip a `- `, `* `, or `1. `/`1) ` bullet prefix, if present.
fn strip_bullet(line: &str) -> Option<&str> {
    if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
        return Some(rest.trim());
    }
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim());
        }
    }
    None
}

fn contains_cue(line: &str) -> bool {
    let lowered = line.to_lowercase();
    CUE_PHRASES.iter().any(|cue| lowered.contains(cue))
}

fn make_insight(
    claim: &str,
    evidence_line: &str,
    category: InsightCategory,
    stage_type: StageType,
    stage_ordinal: u32,
) -> Insight {
    let importance = Importance::Medium;
    let confidence = Confidence::Medium;
    Insight {
        id: InsightId::new(),
        stage_ordinal,
        stage_type,
        text: truncate_str(claim, MAX_CLAIM_CHARS),
        category,
        importance,
        evidence: vec![evidence_line.to_string()],
        confidence,
        assumptions: Vec::new(),
        quality_score: Insight::derive_quality_score(importance, 1, confidence),
        tags: Insight::derive_tags(category, importance, confidence),
        extraction_method: ExtractionMethod::Pattern,
        created_at: Utc::now(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
