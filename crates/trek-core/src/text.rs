//! Token estimation and text truncation helpers.
//!
//! Token counts here are estimates (characters / 4), sufficient for budget
//! enforcement. Exact counts are out of scope for the pipeline.

/// Estimate the token count of a text as `ceil(chars / 4)`.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Truncate a string to at most `max_chars` characters.
///
/// Appends `…` when truncation happens, so the result may be
/// `max_chars + 1` characters long. Safe on multi-byte text.
#[must_use]
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars).collect();
    out.push('…');
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_empty() {
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn estimate_rounds_up() {
        assert_eq!(estimate_tokens("abc"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn estimate_counts_chars_not_bytes() {
        // 4 multi-byte chars → 1 token
        assert_eq!(estimate_tokens("日本語字"), 1);
    }

    #[test]
    fn truncate_short_string_unchanged() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_exact_length_unchanged() {
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_str("hello world", 5), "hello…");
    }

    #[test]
    fn truncate_multibyte_safe() {
        let s = "日本語のテキスト";
        let out = truncate_str(s, 3);
        assert_eq!(out, "日本語…");
    }
}
