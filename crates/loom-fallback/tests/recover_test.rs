use std::fs;

use loom_core::config::FallbackConfig;

fn write_session(dir: &std::path::Path, name: &str, lines: &[&str]) {
    fs::write(dir.join(name), lines.join("\n")).unwrap();
}

fn message_line(role: &str, text: &str, ts: &str) -> String {
    format!(r#"{{"kind":"message","role":"{role}","content":"{text}","timestamp":"{ts}"}}"#)
}

#[test]
fn recovers_trailing_messages_sorted_by_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let lines: Vec<String> = (0..5)
        .map(|i| message_line("user", &format!("message {i}"), &format!("2026-01-01T00:00:0{i}Z")))
        .collect();
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    write_session(dir.path(), "session-a.jsonl", &refs);

    let config = FallbackConfig { min_message_count: 1, target_message_count: 3, ..FallbackConfig::default() };
    let block = loom_fallback::recover(dir.path(), &config).expect("should recover");
    assert!(block.contains("message 2"));
    assert!(block.contains("message 4"));
    assert!(!block.contains("message 0"));
}

#[test]
fn returns_none_below_minimum_survivor_count() {
    let dir = tempfile::tempdir().unwrap();
    let line = message_line("user", "only one", "2026-01-01T00:00:00Z");
    write_session(dir.path(), "session-a.jsonl", &[&line]);

    let config = FallbackConfig { min_message_count: 3, ..FallbackConfig::default() };
    assert!(loom_fallback::recover(dir.path(), &config).is_none());
}

#[test]
fn skips_archived_and_deleted_files() {
    let dir = tempfile::tempdir().unwrap();
    let archived = dir.path().join("archived");
    fs::create_dir(&archived).unwrap();
    let line = message_line("user", "archived message", "2026-01-01T00:00:00Z");
    write_session(&archived, "session-a.jsonl", &[&line]);
    write_session(dir.path(), "session-b.jsonl.deleted", &[&line]);

    let config = FallbackConfig { min_message_count: 1, ..FallbackConfig::default() };
    assert!(loom_fallback::recover(dir.path(), &config).is_none());
}

#[test]
fn drops_blocked_text() {
    let dir = tempfile::tempdir().unwrap();
    let lines = vec![
        message_line("user", "=== Retrieved Context ===", "2026-01-01T00:00:00Z"),
        message_line("user", "real message one", "2026-01-01T00:00:01Z"),
        message_line("user", "real message two", "2026-01-01T00:00:02Z"),
        message_line("user", "real message three", "2026-01-01T00:00:03Z"),
    ];
    let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
    write_session(dir.path(), "session-a.jsonl", &refs);

    let config = FallbackConfig { min_message_count: 3, target_message_count: 10, ..FallbackConfig::default() };
    let block = loom_fallback::recover(dir.path(), &config).expect("should recover");
    assert!(!block.contains("=== Retrieved Context ==="));
    assert!(block.contains("real message three"));
}
