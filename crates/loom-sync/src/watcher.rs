//! Directory watch loop (§4.6): a filesystem event on the sessions
//! directory (or a periodic tick, for hosts where `notify` misses an
//! event) triggers `Syncer::sync_once`.

use std::path::Path;
use std::time::Duration;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::Syncer;

/// Runs until the channel closes. Folds every filesystem event plus a
/// 5 s fallback tick into the same `sync_once` call, so a missed event
/// is never fatal — just delayed.
pub async fn run(mut syncer: Syncer, sessions_dir: &Path, from_user: &str) -> notify::Result<()> {
    let (tx, mut rx) = mpsc::channel::<()>(16);

    let tx_events = tx.clone();
    let mut watcher: RecommendedWatcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
        if res.is_ok() {
            let _ = tx_events.try_send(());
        }
    })?;
    watcher.watch(sessions_dir, RecursiveMode::NonRecursive)?;

    loop {
        tokio::select! {
            _ = rx.recv() => {}
            _ = tokio::time::sleep(Duration::from_secs(5)) => {}
        }
        syncer.sync_once(from_user).await;
    }
}
