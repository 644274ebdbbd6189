//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod results;
mod session;
mod shell;
mod task;
mod watch;

pub use results::OutputFormat;
pub use session::SessionCommands;
pub use task::TaskCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::context::AppContext;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Session management
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Task submission and browsing
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
    /// Print the current results of a task once
    Results {
        /// Task ID or unambiguous prefix
        id: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Interactive session: submit, select and watch tasks
    Shell,
}

/// Route a command to its handler module
pub async fn handle_command(command: Commands, ctx: &mut AppContext) -> Result<()> {
    match command {
        Commands::Session { command } => session::handle_session_command(command, ctx).await,
        Commands::Task { command } => task::handle_task_command(command, ctx).await,
        Commands::Results { id, format } => results::show_results(ctx, &id, format).await,
        Commands::Shell => shell::run(ctx).await,
    }
}
