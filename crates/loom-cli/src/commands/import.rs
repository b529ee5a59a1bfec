//! `loom import`: operator trigger for the Session Importer (C10) against
//! a running Store. Talks straight to `POST /api/v1/openclaw/import`
//! rather than through `LoomClient`, since bulk import is an operator
//! action, not a per-turn agent write C2 accounts for. Still carries the
//! mandatory identity headers (§6) the Store's `Identity` extractor
//! requires on every authenticated route.

pub async fn run(
    base_url: String,
    bearer_token: String,
    agent_kind: Option<String>,
    after: Option<String>,
    before: Option<String>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mut query: Vec<(&str, String)> = Vec::new();
    if let Some(agent_kind) = &agent_kind {
        query.push(("agent_kind", agent_kind.clone()));
    }
    if let Some(after) = &after {
        query.push(("after", after.clone()));
    }
    if let Some(before) = &before {
        query.push(("before", before.clone()));
    }
    query.push(("dry_run", dry_run.to_string()));

    let response = reqwest::Client::new()
        .post(format!("{base_url}/api/v1/openclaw/import"))
        .bearer_auth(bearer_token)
        .header("X-Agent-Id", "loom-cli")
        .header("X-Agent-Version", env!("CARGO_PKG_VERSION"))
        .header("X-Agent-Instance-Id", "loom-cli-import")
        .query(&query)
        .send()
        .await?
        .error_for_status()?
        .json::<serde_json::Value>()
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
