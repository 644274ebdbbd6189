//! Interactive shell
//!
//! Reads commands from stdin while the polling cycle runs in the background.
//! Progress is redrawn whenever the watched task's status changes.

use anyhow::{Result, bail};
use colored::*;
use glossa_core::domain::task::{DEFAULT_COUNT, LANGUAGES, MODELS, PARTS_OF_SPEECH, TaskRequest};
use glossa_watch::{PollStatus, ResultTable, SelectionController};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::session::create_session;
use super::task::parse_count;
use crate::context::AppContext;
use crate::render::{print_status_table, print_task_list, progress_line};

enum Flow {
    Continue,
    Quit,
}

/// The parts of a status that warrant a redraw
#[derive(Debug, PartialEq, Eq)]
struct RenderKey {
    cycle: u64,
    count: u32,
    loading: bool,
    finished: bool,
    error: Option<String>,
}

impl RenderKey {
    fn of(status: &PollStatus) -> Self {
        Self {
            cycle: status.cycle,
            count: status.snapshot.as_ref().map_or(0, |s| s.count),
            loading: status.loading,
            finished: status.finished,
            error: status.error.clone(),
        }
    }
}

/// Record `status` as shown; true when it differs from what was last shown
fn needs_redraw(status: &PollStatus, last_rendered: &mut Option<RenderKey>) -> bool {
    let key = RenderKey::of(status);
    if last_rendered.as_ref() == Some(&key) {
        return false;
    }
    *last_rendered = Some(key);
    status.key.is_some()
}

fn print_status(status: &PollStatus) {
    println!("{}", progress_line(status));
    if status.finished {
        print_status_table(status);
    }
}

pub async fn run(ctx: &mut AppContext) -> Result<()> {
    if ctx.session.get().is_none() {
        println!("{}", "No active session, creating one.".dimmed());
        create_session(ctx).await?;
    }

    let mut controller = ctx.controller()?;
    controller.load_tasks().await;

    let mut rx = controller.subscribe();
    let mut last_rendered = Some(RenderKey::of(&rx.borrow_and_update()));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Session {}", controller.session_id().cyan());
    print_help();
    prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match execute(&line, ctx, &mut controller).await {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => eprintln!("{} {:#}", "Error:".red(), e),
                }
                // Changes that landed while the command ran are shown now.
                let status = rx.borrow_and_update().clone();
                if needs_redraw(&status, &mut last_rendered) {
                    print_status(&status);
                }
                prompt();
            }
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = rx.borrow_and_update().clone();
                if needs_redraw(&status, &mut last_rendered) {
                    println!();
                    print_status(&status);
                    prompt();
                }
            }
        }
    }

    controller.clear();
    Ok(())
}

async fn execute(
    line: &str,
    ctx: &mut AppContext,
    controller: &mut SelectionController,
) -> Result<Flow> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = words.split_first() else {
        return Ok(Flow::Continue);
    };

    match *command {
        "submit" => {
            let request = parse_submit(args)?;
            let task_id = controller.submit(request).await?;
            println!("{} Task submitted successfully!", "✓".green());
            println!("  Task: {}", task_id.cyan());
        }
        "select" => {
            let [id] = args else {
                bail!("Usage: select <task-id>");
            };
            let task = controller.select_by_id(id).await?;
            println!("Watching task {}", task.id.cyan());
        }
        "tasks" => {
            controller.load_tasks().await;
            print_tasks(controller);
        }
        "refresh" => {
            if !controller.refresh_tasks().await {
                println!("{}", "Could not reload tasks; showing the last list.".yellow());
            }
            print_tasks(controller);
        }
        "show" => {
            let status = controller.status();
            println!("State: {}", controller.state());
            println!("{}", progress_line(&status));
            print_status_table(&status);
        }
        "copy" => copy(controller, args.first().copied())?,
        "clear" => {
            if controller.is_polling() {
                println!("{}", "Stopped watching.".dimmed());
            }
            controller.clear();
        }
        "session" => {
            create_session(ctx).await?;
            controller.set_session(ctx.session_id()?);
            controller.load_tasks().await;
        }
        "help" | "?" => print_help(),
        "quit" | "exit" => return Ok(Flow::Quit),
        other => bail!("Unknown command '{}'; type 'help' for a list", other),
    }

    Ok(Flow::Continue)
}

/// `submit <language> <pos> <model> [count]`
fn parse_submit(args: &[&str]) -> Result<TaskRequest> {
    let (language, pos, model, count) = match args {
        [language, pos, model] => (*language, *pos, *model, DEFAULT_COUNT),
        [language, pos, model, count] => {
            let count = parse_count(count).map_err(anyhow::Error::msg)?;
            (*language, *pos, *model, count)
        }
        _ => bail!("Usage: submit <language> <pos> <model> [count]"),
    };

    check_choice("language", language, LANGUAGES)?;
    check_choice("part of speech", pos, PARTS_OF_SPEECH)?;
    check_choice("model", model, MODELS)?;

    Ok(TaskRequest::new(language, pos, model, count))
}

fn check_choice(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        bail!("Unknown {} '{}' (choose from {})", field, value, allowed.join(", "))
    }
}

fn print_tasks(controller: &SelectionController) {
    print_task_list(
        controller.registry().tasks(),
        controller.target().task_id.as_deref(),
    );
}

/// Print one row (1-based) or the whole table as tab-separated text
fn copy(controller: &SelectionController, row: Option<&str>) -> Result<()> {
    let Some(table) = ResultTable::from_status(&controller.status()) else {
        bail!("No results to copy");
    };

    match row {
        None => println!("{}", table.to_tsv()),
        Some(raw) => {
            let index: usize = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("'{}' is not a row number", raw))?;
            match index.checked_sub(1).and_then(|i| table.row_tsv(i)) {
                Some(line) => println!("{}", line),
                None => bail!("Row {} does not exist ({} rows)", index, table.rows().len()),
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  submit <language> <pos> <model> [count]  Submit a task and watch it");
    println!("  select <task-id>                         Watch an existing task");
    println!("  tasks                                    List tasks");
    println!("  refresh                                  Reload the task list");
    println!("  show                                     Print the current results");
    println!("  copy [row]                               Print results as TSV");
    println!("  clear                                    Stop watching");
    println!("  session                                  Start a new session");
    println!("  help                                     Show this help");
    println!("  quit                                     Leave the shell");
}

fn prompt() {
    print!("{} ", "glossa>".cyan());
    let _ = std::io::stdout().flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use glossa_core::domain::watch::WatchKey;

    #[test]
    fn test_parse_submit_defaults_count() {
        let request = parse_submit(&["Tamil", "noun", "gemini"]).unwrap();
        assert_eq!(request.language, "Tamil");
        assert_eq!(request.count, DEFAULT_COUNT);
    }

    #[test]
    fn test_parse_submit_rejects_bad_count() {
        let err = parse_submit(&[LANGUAGES[0], PARTS_OF_SPEECH[0], MODELS[0], "15"]).unwrap_err();
        assert!(err.to_string().contains("count must be one of"));
    }

    #[test]
    fn test_parse_submit_rejects_unknown_choice() {
        let err = parse_submit(&["klingon", PARTS_OF_SPEECH[0], MODELS[0]]).unwrap_err();
        assert!(err.to_string().contains("Unknown language 'klingon'"));
    }

    #[test]
    fn test_parse_submit_usage() {
        assert!(parse_submit(&["only-one"]).unwrap_err().to_string().starts_with("Usage"));
    }

    fn watching(cycle: u64) -> PollStatus {
        PollStatus {
            cycle,
            key: WatchKey::new("s1".to_string(), "J1".to_string(), 10),
            loading: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_render_key_ignores_unchanged_status() {
        let status = PollStatus::default();
        assert_eq!(RenderKey::of(&status), RenderKey::of(&status.clone()));
    }

    #[test]
    fn test_failure_during_command_is_redrawn() {
        let started = watching(1);
        let mut last_rendered = Some(RenderKey::of(&started));

        // The first fetch failed while a command was still awaiting.
        let failed = PollStatus {
            loading: false,
            finished: true,
            error: Some("connection refused".to_string()),
            applied_seq: 1,
            ..watching(1)
        };
        assert!(needs_redraw(&failed, &mut last_rendered));
        assert!(!needs_redraw(&failed, &mut last_rendered));
    }

    #[test]
    fn test_new_cycle_is_redrawn_once() {
        let mut last_rendered = Some(RenderKey::of(&watching(1)));
        assert!(needs_redraw(&watching(2), &mut last_rendered));
        assert!(!needs_redraw(&watching(2), &mut last_rendered));
    }

    #[test]
    fn test_idle_status_is_not_drawn() {
        let mut last_rendered = Some(RenderKey::of(&watching(1)));
        let idle = PollStatus {
            cycle: 2,
            ..Default::default()
        };
        assert!(!needs_redraw(&idle, &mut last_rendered));
        assert_eq!(last_rendered, Some(RenderKey::of(&idle)));
    }
}
