//! Contradiction candidate detection.
//!
//! A weak keyword-antonym heuristic, advisory only: two insights are flagged
//! when one contains each side of a fixed antonym pair and the texts share
//! enough non-trivial words to suggest they are about the same topic.

use trek_core::Insight;

use crate::types::Contradiction;

/// Fixed antonym keyword pairs checked in both directions.
const ANTONYM_PAIRS: &[(&str, &str)] = &[
    ("increase", "decrease"),
    ("benefit", "drawback"),
    ("faster", "slower"),
    ("simple", "complex"),
    ("works", "fails"),
    ("scalable", "bottleneck"),
    ("safe", "risky"),
    ("cheap", "expensive"),
];

/// Shared non-trivial words required before a pair is flagged.
const MIN_SHARED_WORDS: usize = 2;

/// Detect contradiction candidates across all insight pairs, capped at
/// `max_contradictions`.
#[must_use]
pub fn detect_contradictions(insights: &[Insight], max_contradictions: usize) -> Vec<Contradiction> {
    let mut found = Vec::new();
    let texts: Vec<String> = insights.iter().map(|i| i.text.to_lowercase()).collect();

    'outer: for (a, text_a) in texts.iter().enumerate() {
        for (b, text_b) in texts.iter().enumerate().skip(a + 1) {
            let Some((left, right)) = antonym_hit(text_a, text_b) else {
                continue;
            };
            if shared_word_count(text_a, text_b) < MIN_SHARED_WORDS {
                continue;
            }
            found.push(Contradiction {
                first: insights[a].id.clone(),
                second: insights[b].id.clone(),
                keyword_pair: (left.to_string(), right.to_string()),
                note: format!(
                    "Insights from stages {} and {} may conflict (\"{left}\" vs \"{right}\")",
                    insights[a].stage_ordinal, insights[b].stage_ordinal
                ),
            });
            if found.len() >= max_contradictions {
                break 'outer;
            }
        }
    }

    found
}

/// First antonym pair with one side in each text, checked both ways.
fn antonym_hit(text_a: &str, text_b: &str) -> Option<(&'static str, &'static str)> {
    for &(left, right) in ANTONYM_PAIRS {
        if (text_a.contains(left) && text_b.contains(right))
            || (text_a.contains(right) && text_b.contains(left))
        {
            return Some((left, right));
        }
    }
    None
}

/// Count distinct words longer than 4 chars present in both texts.
fn shared_word_count(text_a: &str, text_b: &str) -> usize {
    let words_a: std::collections::HashSet<&str> = text_a
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 4)
        .collect();
    text_b
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 4)
        .collect::<std::collections::HashSet<&str>>()
        .intersection(&words_a)
        .count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use trek_core::{
        Confidence, ExtractionMethod, Importance, InsightCategory, InsightId, StageType,
    };

    fn insight(ordinal: u32, text: &str) -> Insight {
        Insight {
            id: InsightId::new(),
            stage_ordinal: ordinal,
            stage_type: StageType::Discovering,
            text: text.to_string(),
            category: InsightCategory::Discovery,
            importance: Importance::Medium,
            evidence: vec![],
            confidence: Confidence::Medium,
            assumptions: vec![],
            quality_score: 6.0,
            tags: vec![],
            extraction_method: ExtractionMethod::Model,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn antonyms_with_topical_overlap_flagged() {
        let insights = vec![
            insight(1, "sharding makes the ingest pipeline faster under heavy load"),
            insight(4, "sharding makes the ingest pipeline slower when shards rebalance"),
        ];
        let found = detect_contradictions(&insights, 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].keyword_pair, ("faster".to_string(), "slower".to_string()));
        assert!(found[0].note.contains("stages 1 and 4"));
    }

    #[test]
    fn antonyms_without_overlap_not_flagged() {
        let insights = vec![
            insight(0, "compression is faster"),
            insight(1, "startup is slower"),
        ];
        assert!(detect_contradictions(&insights, 3).is_empty());
    }

    #[test]
    fn overlap_without_antonyms_not_flagged() {
        let insights = vec![
            insight(0, "the eviction policy shapes cache behavior"),
            insight(1, "the eviction policy depends on cache behavior"),
        ];
        assert!(detect_contradictions(&insights, 3).is_empty());
    }

    #[test]
    fn direction_does_not_matter() {
        let insights = vec![
            insight(0, "the queue design is risky for ordering guarantees"),
            insight(1, "the queue design is safe because ordering guarantees hold"),
        ];
        let found = detect_contradictions(&insights, 3);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].keyword_pair.0, "safe");
    }

    #[test]
    fn cap_respected() {
        let insights = vec![
            insight(0, "replication increase throughput measurements noticeably"),
            insight(1, "replication decrease throughput measurements noticeably"),
            insight(2, "replication increase latency measurements noticeably"),
            insight(3, "replication decrease latency measurements noticeably"),
        ];
        let found = detect_contradictions(&insights, 2);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(detect_contradictions(&[], 3).is_empty());
    }
}
