//! Session command handlers

use anyhow::Result;
use clap::Subcommand;
use colored::*;

use crate::context::AppContext;

/// Session subcommands
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Create a new session and make it the active one
    Create,
    /// Show the active session
    Show,
    /// Make an existing session the active one
    Use {
        /// Session ID
        id: String,
    },
}

pub async fn handle_session_command(command: SessionCommands, ctx: &mut AppContext) -> Result<()> {
    match command {
        SessionCommands::Create => create_session(ctx).await,
        SessionCommands::Show => show_session(ctx),
        SessionCommands::Use { id } => use_session(ctx, &id),
    }
}

pub(super) async fn create_session(ctx: &mut AppContext) -> Result<()> {
    let client = ctx.client.clone();
    match ctx.session.create(client.as_ref()).await {
        Ok((session, message)) => {
            if !message.is_empty() {
                println!("{} {}", "✓".green(), message);
            }
            println!("  Session: {}", session.id.cyan());
            println!(
                "  Expires: {}",
                session
                    .expires_at()
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .dimmed()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "Failed to create session. Please try again.".red());
            Err(e.into())
        }
    }
}

fn show_session(ctx: &AppContext) -> Result<()> {
    println!("Backend: {}", ctx.client.base_url().dimmed());
    match ctx.session.get() {
        Some(id) => println!("Session: {}", id.cyan()),
        None => println!(
            "{}",
            "No active session. Run `glossa session create`.".yellow()
        ),
    }
    Ok(())
}

fn use_session(ctx: &mut AppContext, id: &str) -> Result<()> {
    if id.trim().is_empty() {
        anyhow::bail!("Session ID must not be empty");
    }
    ctx.session.set(id.trim());
    println!("{} Active session: {}", "✓".green(), id.trim().cyan());
    Ok(())
}
