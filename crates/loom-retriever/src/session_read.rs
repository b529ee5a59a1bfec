//! Tail-reads a session transcript: only the trailing `max_lines` records
//! are kept in memory, since the retriever only ever needs the last few
//! user turns.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use loom_core::errors::{LoomError, LoomResult};
use loom_core::models::SessionRecord;

pub fn read_session(path: &Path, max_lines: usize) -> LoomResult<Vec<SessionRecord>> {
    let file = File::open(path).map_err(|e| LoomError::Config(format!("session file: {e}")))?;
    let reader = BufReader::new(file);
    let mut tail: VecDeque<SessionRecord> = VecDeque::with_capacity(max_lines.max(1));

    for line in reader.lines() {
        let line = line.map_err(|e| LoomError::Config(format!("session file read: {e}")))?;
        if line.trim().is_empty() {
            continue;
        }
        let Ok(record) = serde_json::from_str::<SessionRecord>(&line) else { continue };
        if tail.len() >= max_lines.max(1) {
            tail.pop_front();
        }
        tail.push_back(record);
    }

    Ok(tail.into_iter().collect())
}
