//! Terminal rendering for tasks and result tables

use colored::*;
use glossa_core::domain::task::{Task, TaskStatus};
use glossa_watch::{PollStatus, ResultTable};

/// Widest a table cell may be before it is truncated
const MAX_CELL_WIDTH: usize = 40;

/// Print a task summary
pub fn print_task_summary(task: &Task, selected: bool) {
    let marker = if selected { "▶".green() } else { "▸".cyan() };

    println!("  {} Task {}", marker, task.id.dimmed());
    println!("    Model:    {}", task.model);
    println!("    Language: {} ({})", task.language, task.part_of_speech);
    println!("    Count:    {}", task.target_count);
    println!("    Status:   {}", colorize_status(&task.status));
    println!(
        "    Created:  {}",
        task.created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print a task list, highlighting the selected task
pub fn print_task_list(tasks: &[Task], selected: Option<&str>) {
    if tasks.is_empty() {
        println!("{}", "No tasks yet.".yellow());
        return;
    }

    println!("{}", format!("Tasks ({}):", tasks.len()).bold());
    println!();
    for task in tasks {
        print_task_summary(task, selected == Some(task.id.as_str()));
    }
}

/// One-line progress for a polling status
pub fn progress_line(status: &PollStatus) -> String {
    let Some(key) = &status.key else {
        return "Nothing selected".dimmed().to_string();
    };
    let count = status.snapshot.as_ref().map_or(0, |s| s.count);
    let mut line = format!(
        "Task {} {}",
        key.task_id.dimmed(),
        format!("{}/{}", count, key.target_count).bold()
    );

    if let Some(error) = &status.error {
        line.push_str(&format!(" {}", format!("error: {}", error).red()));
    } else if status.loading {
        line.push_str(&format!(" {}", "Generating...".yellow()));
    } else if status.finished {
        line.push_str(&format!(" {}", "✓".green()));
    }
    line
}

/// Print the results table for a status, if there is anything to show
pub fn print_status_table(status: &PollStatus) {
    match ResultTable::from_status(status) {
        Some(table) => print_table(&table),
        None => println!("{}", "No results yet.".yellow()),
    }
}

/// Print a results table with aligned, truncated columns
pub fn print_table(table: &ResultTable) {
    let header = format!("Results {}", table.progress_label());
    if table.is_loading() {
        println!("{} {}", header.bold(), "Generating...".yellow());
    } else {
        println!("{}", header.bold());
    }

    if table.is_empty() {
        return;
    }

    let widths: Vec<usize> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            table
                .rows()
                .iter()
                .map(|row| width(&row[i]))
                .chain(std::iter::once(width(column)))
                .max()
                .unwrap_or(0)
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header_line = table
        .columns()
        .iter()
        .zip(&widths)
        .map(|(column, w)| pad(column, *w))
        .collect::<Vec<_>>()
        .join("  ");
    println!("  {}  {}", "#".dimmed(), header_line.bold());

    let rule = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    println!("  {}", "─".repeat(rule + 3).dimmed());

    for (index, row) in table.rows().iter().enumerate() {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| pad(cell, *w))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {}  {}", (index + 1).to_string().dimmed(), line);
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Truncate to `width` characters (with an ellipsis) and pad to it
fn pad(text: &str, width: usize) -> String {
    let single_line = text.replace(['\n', '\t'], " ");
    let len = single_line.chars().count();
    if len > width {
        let mut cut: String = single_line.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", single_line, " ".repeat(width - len))
    }
}

/// Colorize task status for display
pub fn colorize_status(status: &TaskStatus) -> ColoredString {
    let text = status.to_string();
    match status {
        TaskStatus::Queued => text.yellow(),
        TaskStatus::Running => text.cyan(),
        TaskStatus::Completed => text.green(),
        TaskStatus::Failed => text.red(),
        TaskStatus::Other(_) => text.normal(),
    }
}
