//! Recurring-theme pattern detection.
//!
//! Pure local computation over the accumulated insight texts and stage
//! history. Three kinds of pattern are surfaced: terms recurring across
//! insights, the stage-type progression once the journey is long enough,
//! and a dominant insight category once one clearly leads.

use std::collections::HashMap;

use trek_core::{Insight, Stage};

/// Minimum occurrences for a term to count as a recurring theme.
const THEME_THRESHOLD: usize = 3;

/// Stage count at which the progression line is surfaced.
const PROGRESSION_MIN_STAGES: usize = 6;

/// Insight count at which the leading category is surfaced.
const DOMINANT_CATEGORY_MIN: usize = 3;

/// Words too common to signal a theme.
const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "because", "been", "before", "being", "between",
    "both", "could", "does", "doing", "down", "each", "further", "have",
    "having", "here", "into", "itself", "more", "most", "other", "over",
    "same", "should", "some", "such", "than", "that", "their", "them", "then",
    "there", "these", "they", "this", "those", "through", "under", "until",
    "very", "were", "what", "when", "where", "which", "while", "will", "with",
    "would", "your",
];

/// Detect recurring-theme patterns, capped at `max_patterns`.
#[must_use]
pub fn detect_patterns(stages: &[Stage], insights: &[Insight], max_patterns: usize) -> Vec<String> {
    let mut patterns = Vec::new();

    // Term frequency over stop-word-stripped insight text
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    for insight in insights {
        for token in tokenize(&insight.text) {
            let entry = counts.entry(token.clone()).or_insert(0);
            *entry += 1;
            let order = first_seen.len();
            let _ = first_seen.entry(token).or_insert(order);
        }
    }
    let mut themes: Vec<(&String, &usize)> =
        counts.iter().filter(|&(_, &count)| count >= THEME_THRESHOLD).collect();
    // Most frequent first; ties in first-appearance order for determinism
    themes.sort_by(|a, b| b.1.cmp(a.1).then_with(|| first_seen[a.0].cmp(&first_seen[b.0])));
    for (term, count) in themes {
        patterns.push(format!("Recurring theme: \"{term}\" appears {count} times"));
    }

    // Stage-type progression once the journey is long enough
    if stages.len() >= PROGRESSION_MIN_STAGES {
        let sequence: Vec<&str> = stages.iter().map(|s| s.stage_type.as_str()).collect();
        patterns.push(format!("Stage progression: {}", sequence.join(" → ")));
    }

    // Dominant insight category
    let mut category_counts: HashMap<&str, usize> = HashMap::new();
    for insight in insights {
        *category_counts.entry(insight.category.as_str()).or_insert(0) += 1;
    }
    if let Some((category, count)) = category_counts
        .into_iter()
        .max_by_key(|&(category, count)| (count, std::cmp::Reverse(category)))
    {
        if count >= DOMINANT_CATEGORY_MIN {
            patterns.push(format!("Dominant insight category: {category} ({count} insights)"));
        }
    }

    patterns.truncate(max_patterns);
    patterns
}

/// Lowercase alphanumeric tokens longer than 4 chars, minus stop words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 4 && !STOP_WORDS.contains(t))
        .map(String::from)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
