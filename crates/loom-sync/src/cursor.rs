//! Per-file sync cursor state (§4.6): lines already processed and the
//! most recent timestamp seen, capped at `max_tracked_files` and pruned
//! oldest-first to half that cap when exceeded.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Default)]
pub struct FileCursor {
    pub lines_processed: usize,
    pub last_timestamp: Option<DateTime<Utc>>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct CursorTable {
    entries: HashMap<PathBuf, FileCursor>,
    max_tracked_files: usize,
}

impl CursorTable {
    pub fn new(max_tracked_files: usize) -> Self {
        Self { entries: HashMap::new(), max_tracked_files }
    }

    pub fn get(&self, path: &std::path::Path) -> FileCursor {
        self.entries.get(path).cloned().unwrap_or_default()
    }

    pub fn advance(&mut self, path: &std::path::Path, lines_processed: usize, last_timestamp: Option<DateTime<Utc>>) {
        let now = Utc::now();
        self.entries.insert(
            path.to_path_buf(),
            FileCursor { lines_processed, last_timestamp, last_synced_at: Some(now) },
        );
        self.prune_if_over_capacity();
    }

    fn prune_if_over_capacity(&mut self) {
        if self.entries.len() <= self.max_tracked_files {
            return;
        }
        let mut by_age: Vec<(PathBuf, Option<DateTime<Utc>>)> =
            self.entries.iter().map(|(p, c)| (p.clone(), c.last_synced_at)).collect();
        by_age.sort_by_key(|(_, last_synced_at)| *last_synced_at);
        let target_len = self.max_tracked_files / 2;
        let drop_count = by_age.len().saturating_sub(target_len);
        for (path, _) in by_age.into_iter().take(drop_count) {
            self.entries.remove(&path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prunes_to_half_capacity_when_exceeded() {
        let mut table = CursorTable::new(4);
        for i in 0..5 {
            table.advance(&PathBuf::from(format!("session-{i}.jsonl")), i, None);
        }
        assert!(table.entries.len() <= 2);
        assert!(table.entries.contains_key(&PathBuf::from("session-4.jsonl")));
    }

    #[test]
    fn get_on_unknown_path_yields_default_cursor() {
        let table = CursorTable::new(10);
        let cursor = table.get(&PathBuf::from("unseen.jsonl"));
        assert_eq!(cursor.lines_processed, 0);
    }
}
