//! Task command handlers
//!
//! Submitting tasks, listing a session's tasks, and watching one of them.

use anyhow::{Context, Result};
use clap::Subcommand;
use clap::builder::PossibleValuesParser;
use colored::*;
use glossa_core::domain::task::{
    COUNTS, DEFAULT_COUNT, LANGUAGES, MODELS, PARTS_OF_SPEECH, TaskRequest,
};

use super::watch::follow_and_print;
use crate::context::AppContext;
use crate::render::print_task_list;

/// Task subcommands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// Submit a new generation task
    Submit {
        /// Language of the generated words
        #[arg(short, long, value_parser = PossibleValuesParser::new(LANGUAGES.iter().copied()))]
        language: String,

        /// Part of speech
        #[arg(short, long, value_parser = PossibleValuesParser::new(PARTS_OF_SPEECH.iter().copied()))]
        pos: String,

        /// Generation model
        #[arg(short, long, value_parser = PossibleValuesParser::new(MODELS.iter().copied()))]
        model: String,

        /// Number of items to generate (10, 20 or 30)
        #[arg(short, long, default_value_t = DEFAULT_COUNT, value_parser = parse_count)]
        count: u32,

        /// Keep watching until all items have arrived
        #[arg(short, long)]
        watch: bool,
    },
    /// List the tasks of the active session
    List,
    /// Watch a task's results until it completes
    Watch {
        /// Task ID or unambiguous prefix
        id: String,
    },
}

pub async fn handle_task_command(command: TaskCommands, ctx: &mut AppContext) -> Result<()> {
    match command {
        TaskCommands::Submit {
            language,
            pos,
            model,
            count,
            watch,
        } => submit_task(ctx, TaskRequest::new(language, pos, model, count), watch).await,
        TaskCommands::List => list_tasks(ctx).await,
        TaskCommands::Watch { id } => watch_task(ctx, &id).await,
    }
}

/// Accept only the counts the form offers
pub(super) fn parse_count(raw: &str) -> Result<u32, String> {
    let count: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if COUNTS.contains(&count) {
        Ok(count)
    } else {
        let allowed: Vec<String> = COUNTS.iter().map(u32::to_string).collect();
        Err(format!("count must be one of {}", allowed.join(", ")))
    }
}

async fn submit_task(ctx: &AppContext, request: TaskRequest, watch: bool) -> Result<()> {
    let mut controller = ctx.controller()?;

    let task_id = match controller.submit(request).await {
        Ok(id) => id,
        Err(e) => {
            eprintln!("{}", "Failed to submit task".red());
            return Err(e.into());
        }
    };

    println!("{} Task submitted successfully!", "✓".green());
    println!("  Task: {}", task_id.cyan());

    if watch {
        println!();
        follow_and_print(&controller).await?;
    }

    Ok(())
}

async fn list_tasks(ctx: &AppContext) -> Result<()> {
    let session_id = ctx.session_id()?;
    let tasks = ctx
        .client
        .list_tasks(&session_id)
        .await
        .context("Failed to fetch tasks")?;

    print_task_list(&tasks, None);
    Ok(())
}

async fn watch_task(ctx: &AppContext, id: &str) -> Result<()> {
    let mut controller = ctx.controller()?;
    let task = controller.select_by_id(id).await?;

    println!(
        "Watching task {} ({} {} via {})",
        task.id.cyan(),
        task.language,
        task.part_of_speech,
        task.model
    );
    follow_and_print(&controller).await
}
