//! Rendering a [`ContextSummary`] into the flat prompt block.
//!
//! This is the sole integration point with the stage-sequencing
//! collaborator: the returned text is injected verbatim into the next
//! stage's prompt.

use crate::types::ContextSummary;

/// Render the summary as a flat, sectioned text block.
#[must_use]
pub fn format_for_prompt(summary: &ContextSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!("# Journey Context (v{})\n\n", summary.version));
    out.push_str(summary.narrative.trim());
    out.push('\n');

    if !summary.clusters.is_empty() {
        out.push_str("\n## Progress So Far\n");
        for cluster in &summary.clusters {
            let range = match (cluster.ordinals.first(), cluster.ordinals.last()) {
                (Some(first), Some(last)) => format!("{first}-{last}"),
                _ => String::from("?"),
            };
            let types: Vec<&str> = cluster.stage_types.iter().map(|t| t.as_str()).collect();
            out.push_str(&format!(
                "- Stages {range} ({}): {}\n",
                types.join(", "),
                cluster.summary.trim(),
            ));
        }
    }

    out.push_str("\n## Key Insights\n");
    out.push_str(summary.insight_digest.trim());
    out.push('\n');

    out.push_str("\n## Open Questions\n");
    out.push_str(summary.question_digest.trim());
    out.push('\n');

    if !summary.patterns.is_empty() {
        out.push_str("\n## Patterns\n");
        for pattern in &summary.patterns {
            out.push_str(&format!("- {pattern}\n"));
        }
    }

    if !summary.contradictions.is_empty() {
        out.push_str("\n## Possible Contradictions\n");
        for contradiction in &summary.contradictions {
            out.push_str(&format!("- {}\n", contradiction.note));
        }
    }

    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
