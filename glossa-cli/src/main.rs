//! Glossa CLI
//!
//! Command-line client for the content-generation backend: create a
//! session, submit generation tasks, and watch their results arrive.

mod commands;
mod context;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use commands::{Commands, handle_command};
use context::AppContext;
use glossa_watch::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "glossa")]
#[command(about = "Generate and collect language-learning content", long_about = None)]
struct Cli {
    /// Backend URL [env: GLOSSA_API_BASE_URL, default: http://127.0.0.1:8000]
    #[arg(long)]
    api_url: Option<String>,

    /// Session to use when none is persisted [env: GLOSSA_SESSION_ID]
    #[arg(long)]
    session: Option<String>,

    /// File holding persisted client state [env: GLOSSA_STATE_FILE]
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Result polling interval in milliseconds [env: GLOSSA_POLL_INTERVAL_MS]
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Do not read or write the state file
    #[arg(long)]
    ephemeral: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Environment first, then explicit flags
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env()?;

        if let Some(url) = &self.api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(session) = &self.session {
            config.session_id = Some(session.clone());
        }
        if let Some(path) = &self.state_file {
            config.state_file = path.clone();
        }
        if let Some(ms) = self.poll_interval_ms {
            config.poll_interval = std::time::Duration::from_millis(ms);
        }

        config.validate()?;
        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let default_filter = format!("glossa_cli={level},glossa_watch={level},glossa_client={level}");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config()?;
    let mut ctx = AppContext::new(config, cli.ephemeral);

    handle_command(cli.command, &mut ctx).await
}
