//! One-shot result retrieval

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;
use glossa_watch::repository::TaskSource;
use glossa_watch::{JobRegistry, ResultTable};

use crate::context::AppContext;
use crate::render::print_table;

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table
    Table,
    /// Tab-separated values with a header row
    Tsv,
    /// The raw records as JSON
    Json,
}

pub async fn show_results(ctx: &AppContext, id: &str, format: OutputFormat) -> Result<()> {
    let session_id = ctx.session_id()?;

    let source: Arc<dyn TaskSource> = ctx.client.clone();
    let mut registry = JobRegistry::new(source);
    registry.try_sync(&session_id).await?;
    let task = registry.resolve(id)?.clone();

    let snapshot = match ctx.client.get_results(&session_id, &task.id).await {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_not_found() => {
            anyhow::bail!("Task {} has no results on the backend yet", task.id)
        }
        Err(e) => return Err(e).context("Failed to fetch results"),
    };

    match format {
        OutputFormat::Table => {
            let table = ResultTable::from_records(
                &snapshot.items,
                snapshot.count,
                task.target_count,
                false,
            );
            print_table(&table);
        }
        OutputFormat::Tsv => {
            let table = ResultTable::from_records(
                &snapshot.items,
                snapshot.count,
                task.target_count,
                false,
            );
            println!("{}", table.to_tsv());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&snapshot.items)?);
        }
    }

    Ok(())
}
