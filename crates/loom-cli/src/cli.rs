//! Argument parsing: one subcommand per deployable shape of the runtime
//! (§6 environment contract) — the Store service, the embeddable
//! agent-side runtime, and a one-off operator import.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "loom")]
#[command(about = "Multi-agent memory coordination fabric", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Loom home directory (session pointer, coordination state, config).
    /// Defaults to `$LOOM_HOME`, then the OS home directory.
    #[arg(long, global = true)]
    pub loom_home: Option<PathBuf>,

    /// Path to `config.toml`. Defaults to `<loom-home>/.loom/config.toml`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the Store service (C7-C11 ingestion/search/derivation/chain HTTP API).
    Serve {
        /// Address to bind the HTTP listener on.
        #[arg(long, default_value = "127.0.0.1:4848")]
        bind: String,

        /// SQLite database path. Defaults to an in-memory database.
        #[arg(long)]
        db_path: Option<PathBuf>,

        /// Shared bearer token required on every `/api/v1` request.
        /// Empty disables auth (local development only).
        #[arg(long, env = "LOOM_BEARER_TOKEN", default_value = "")]
        bearer_token: String,

        /// Reader pool size.
        #[arg(long, default_value_t = 4)]
        read_pool_size: usize,

        /// Owner ids that write through the serialized memory chain (§4.9).
        /// Repeat the flag for multiple owners.
        #[arg(long = "trusted-owner")]
        trusted_owners: Vec<String>,

        /// Root directory the session importer (C10) walks for
        /// `agents/{agentKind}/sessions/{sessionId}.jsonl` files.
        #[arg(long)]
        sessions_root: Option<PathBuf>,
    },

    /// Run the embeddable agent-side runtime: the Injection Governor (C3)
    /// polling loop plus the Chat-Stream Syncer (C6) file watcher.
    RunAgent {
        /// This agent's kind, e.g. `code-assistant`.
        #[arg(long)]
        agent_kind: String,

        /// Stable identifier for this running instance (§6 identity headers).
        #[arg(long)]
        instance_id: String,

        /// This agent build's version string.
        #[arg(long, default_value = "0.0.0")]
        agent_version: String,

        /// Sub-agent id, if this runtime is a spawned sub-agent.
        #[arg(long)]
        sub_agent: Option<String>,

        /// Base URL of the Store service.
        #[arg(long, default_value = "http://127.0.0.1:4848")]
        base_url: String,

        /// Bearer token for the Store service.
        #[arg(long, env = "LOOM_BEARER_TOKEN", default_value = "")]
        bearer_token: String,

        /// Directory of session transcript files (fallback scan + sync watch).
        #[arg(long)]
        sessions_dir: PathBuf,

        /// Main-session pointer file (§6).
        #[arg(long)]
        pointer_path: PathBuf,

        /// Identity the syncer attributes its own writes to.
        #[arg(long, default_value = "user")]
        from_user: String,

        /// Print the injection decision once and exit, instead of looping.
        #[arg(long)]
        once: bool,
    },

    /// Trigger the Store's session importer (C10) against a running
    /// instance. A thin operator convenience over `POST
    /// /api/v1/openclaw/import`; not part of the agent runtime proper.
    Import {
        /// Base URL of the Store service.
        #[arg(long, default_value = "http://127.0.0.1:4848")]
        base_url: String,

        /// Bearer token for the Store service.
        #[arg(long, env = "LOOM_BEARER_TOKEN", default_value = "")]
        bearer_token: String,

        /// Restrict to one agent kind.
        #[arg(long)]
        agent_kind: Option<String>,

        /// Only sessions with an earliest message at or after this RFC3339 instant.
        #[arg(long)]
        after: Option<String>,

        /// Only sessions with an earliest message before this RFC3339 instant.
        #[arg(long)]
        before: Option<String>,

        /// List what would import without writing anything.
        #[arg(long)]
        dry_run: bool,
    },
}
