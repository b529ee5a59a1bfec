//! `loom`: one binary wiring the agent-side runtime (C1-C6) and the Store
//! service (C7-C12) together behind `clap` subcommands, the way
//! `lanegrid-agtrace`'s CLI crate wires its workspace of library crates.

mod cli;
mod commands;

use clap::Parser;
use loom_core::config::LoomConfig;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    loom_observability::init_tracing();
    let cli = Cli::parse();

    let loom_home = cli.loom_home.unwrap_or_else(loom_core::config::home_dir);
    let config_path = cli.config.unwrap_or_else(LoomConfig::default_path);
    let config = LoomConfig::load(&config_path)?;

    match cli.command {
        Commands::Serve { bind, db_path, bearer_token, read_pool_size, trusted_owners, sessions_root } => {
            commands::serve::run(
                loom_home,
                config,
                bind,
                db_path,
                bearer_token,
                read_pool_size,
                trusted_owners,
                sessions_root,
            )
            .await
        }
        Commands::RunAgent {
            agent_kind,
            instance_id,
            agent_version,
            sub_agent,
            base_url,
            bearer_token,
            sessions_dir,
            pointer_path,
            from_user,
            once,
        } => {
            commands::run_agent::run(
                loom_home,
                config,
                agent_kind,
                instance_id,
                agent_version,
                sub_agent,
                base_url,
                bearer_token,
                sessions_dir,
                pointer_path,
                from_user,
                once,
            )
            .await
        }
        Commands::Import { base_url, bearer_token, agent_kind, after, before, dry_run } => {
            commands::import::run(base_url, bearer_token, agent_kind, after, before, dry_run).await
        }
    }
}
