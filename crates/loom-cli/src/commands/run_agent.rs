//! `loom run-agent`: the embeddable agent-side runtime — the Injection
//! Governor (C3) decision loop plus the Chat-Stream Syncer (C6) watcher,
//! composed over one `LoomClient` (C2) and `CoordinationStore` (C1) (§6).

use std::path::PathBuf;
use std::sync::Arc;

use loom_core::config::LoomConfig;
use loom_core::models::Provenance;
use loom_coord::CoordinationStore;
use loom_governor::Governor;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    loom_home: PathBuf,
    config: LoomConfig,
    agent_kind: String,
    instance_id: String,
    agent_version: String,
    sub_agent: Option<String>,
    base_url: String,
    bearer_token: String,
    sessions_dir: PathBuf,
    pointer_path: PathBuf,
    from_user: String,
    once: bool,
) -> anyhow::Result<()> {
    let coord = Arc::new(CoordinationStore::new(&loom_home.join(".loom"), config.coordination.clone()));

    let mut provenance = Provenance::new(agent_kind.clone(), agent_version, instance_id);
    provenance.sub_agent = sub_agent;

    let client = loom_client::LoomClient::new(base_url, bearer_token, provenance, coord.clone());

    if once {
        let governor = Governor {
            coord: &coord,
            client: &client,
            config: &config,
            pointer_path: &pointer_path,
            sessions_dir: &sessions_dir,
            agent_kind: &agent_kind,
        };
        match governor.decide().await {
            Some(context) => println!("{context}"),
            None => tracing::info!("no injection for this turn"),
        }
        return Ok(());
    }

    let syncer = loom_sync::Syncer::new(
        client,
        pointer_path.clone(),
        sessions_dir.clone(),
        agent_kind.clone(),
        &config.sync,
    );

    tracing::info!(%agent_kind, "agent runtime started: watching sessions for sync, governor available on demand");
    loom_sync::watch(syncer, &sessions_dir, &from_user).await?;
    Ok(())
}
