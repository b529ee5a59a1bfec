//! Text the recoverer must never surface: its own markers, the governor's
//! injected-context markers, and media-attachment shorthands that carry no
//! useful text (§4.3 "feedback-loop defenses", §4.5).

const MARKERS: &[&str] = &[
    "=== Retrieved Context ===",
    "=== End Retrieved Context ===",
    "Recovered Context (Fallback)",
    "=== End Recovered Context ===",
];

const ATTACHMENT_SHORTHANDS: &[&str] = &["[image]", "[attachment]", "[file]", "[audio]", "[video]"];

pub fn is_blocked(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    if MARKERS.iter().any(|m| trimmed.contains(m)) {
        return true;
    }
    ATTACHMENT_SHORTHANDS
        .iter()
        .any(|shorthand| trimmed.eq_ignore_ascii_case(shorthand))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_empty_and_attachment_shorthands() {
        assert!(is_blocked(""));
        assert!(is_blocked("  "));
        assert!(is_blocked("[image]"));
        assert!(is_blocked("[IMAGE]"));
    }

    #[test]
    fn blocks_prior_injection_markers() {
        assert!(is_blocked("=== Retrieved Context ===\nquery: foo"));
    }

    #[test]
    fn passes_ordinary_text() {
        assert!(!is_blocked("let's meet at 3pm"));
    }
}
