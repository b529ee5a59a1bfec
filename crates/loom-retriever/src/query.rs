//! Query construction from recent transcript turns (§4.4).

use loom_core::config::RetrievalConfig;
use loom_core::models::chat::MessageRole;
use loom_core::models::SessionRecord;

const FILLER_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "is", "are", "was", "were", "to", "of", "in", "on",
    "for", "with", "that", "this", "it", "be", "as", "at", "by", "from", "i", "you", "we", "they",
];

/// Pulls the trailing user-role messages (§4.4: "at most the last three"),
/// trimmed and non-trivial, oldest-first.
pub fn last_user_messages(records: &[SessionRecord], window: usize) -> Vec<String> {
    let mut out: Vec<String> = records
        .iter()
        .rev()
        .filter(|r| r.kind == "message" && r.role == Some(MessageRole::User))
        .filter_map(|r| r.content.as_ref().map(|c| c.as_text()))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .take(window)
        .collect();
    out.reverse();
    out
}

/// Builds the search query string per §4.4: if the last message contains a
/// question mark, truncate at the first one; otherwise strip filler words
/// and keep the top 20 terms of length >=4, in original order, then cap at
/// `query_max_chars`.
pub fn build_query(user_texts: &[String], config: &RetrievalConfig) -> Option<String> {
    let last = user_texts.last()?;
    let query = if let Some(idx) = last.find('?') {
        last[..=idx].to_string()
    } else {
        let combined = user_texts.join(" ");
        let terms: Vec<&str> = combined
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.len() >= 4 && !FILLER_WORDS.contains(&w.to_lowercase().as_str()))
            .take(20)
            .collect();
        terms.join(" ")
    };
    let query = query.trim().to_string();
    if query.is_empty() {
        return None;
    }
    Some(truncate_chars(&query, config.query_max_chars))
}

fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        s.chars().take(max_chars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_mark_truncates_at_first_question() {
        let config = RetrievalConfig::default();
        let texts = vec!["how do I configure the retry policy? and also the timeout".to_string()];
        let query = build_query(&texts, &config).unwrap();
        assert_eq!(query, "how do I configure the retry policy?");
    }

    #[test]
    fn filler_words_are_stripped_and_short_words_dropped() {
        let config = RetrievalConfig::default();
        let texts = vec!["the quick brown fox jumps over the lazy dog".to_string()];
        let query = build_query(&texts, &config).unwrap();
        assert!(!query.split_whitespace().any(|w| w.eq_ignore_ascii_case("the")));
        assert!(query.contains("quick"));
    }

    #[test]
    fn empty_input_yields_no_query() {
        let config = RetrievalConfig::default();
        assert!(build_query(&[], &config).is_none());
    }
}
