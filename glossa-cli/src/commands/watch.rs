//! Following a polling cycle from the terminal

use anyhow::Result;
use colored::*;
use glossa_watch::{PollStatus, SelectionController};

use crate::render::{print_status_table, progress_line};

/// Print progress until the watched task completes, fails, or Ctrl-C
///
/// Returns the last status seen.
pub async fn follow(controller: &SelectionController) -> Result<PollStatus> {
    let mut rx = controller.subscribe();
    let mut last_line = String::new();

    loop {
        let status = rx.borrow_and_update().clone();

        let line = progress_line(&status);
        if line != last_line {
            println!("{}", line);
            last_line = line;
        }

        if status.finished || status.key.is_none() {
            return Ok(status);
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Ok(status);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Stopped watching.".dimmed());
                return Ok(status);
            }
        }
    }
}

/// Follow the cycle, then print the final table
pub async fn follow_and_print(controller: &SelectionController) -> Result<()> {
    let status = follow(controller).await?;
    println!();
    print_status_table(&status);

    if let Some(error) = &status.error {
        anyhow::bail!("Polling stopped: {}", error);
    }
    Ok(())
}
