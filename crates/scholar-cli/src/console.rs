//! Interactive foreground for `scholar run`.
//!
//! The scheduler engine runs as a background task; this loop reads commands
//! from stdin, applies them to the shared store, and redraws the list whenever
//! the engine reports a committed tick.

use std::io::BufRead;

use scholar_core::time::{local_now, parse_due};
use scholar_core::{NewReminder, Repeat};
use scholar_scheduler::SchedulerEngine;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::app::App;
use crate::view;

const HELP: &str = "\
Commands:
  list                                         show active reminders
  add <YYYY-MM-DD> <HH:MM> <repeat> <title> [| message]
                                               repeat is none, daily or weekly
  delete <n> [<n>...]                          delete by list number
  stats                                        summary of the list
  backup [name]                                copy the reminder file
  help                                         this text
  quit                                         stop the scheduler and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    List,
    Add {
        date: String,
        time: String,
        repeat: Repeat,
        title: String,
        message: String,
    },
    Delete(Vec<usize>),
    Stats,
    Backup(String),
    Help,
    Quit,
    Empty,
}

/// Parse one console line. Delete numbers are converted to 0-based indices.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_ascii_lowercase().as_str() {
        "" => Ok(ConsoleCommand::Empty),
        "list" | "ls" => Ok(ConsoleCommand::List),
        "stats" => Ok(ConsoleCommand::Stats),
        "help" | "?" => Ok(ConsoleCommand::Help),
        "quit" | "exit" => Ok(ConsoleCommand::Quit),
        "backup" => Ok(ConsoleCommand::Backup(rest.to_string())),
        "delete" | "del" | "rm" => {
            if rest.is_empty() {
                return Err("usage: delete <n> [<n>...]".to_string());
            }
            rest.split_whitespace()
                .map(|n| match n.parse::<usize>() {
                    Ok(n) if n >= 1 => Ok(n - 1),
                    _ => Err(format!("'{n}' is not a list number")),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(ConsoleCommand::Delete)
        }
        "add" => {
            let (head, message) = match rest.split_once('|') {
                Some((head, message)) => (head, message.trim()),
                None => (rest, ""),
            };
            let mut parts = head.split_whitespace();
            let (Some(date), Some(time), Some(repeat)) = (parts.next(), parts.next(), parts.next())
            else {
                return Err(
                    "usage: add <YYYY-MM-DD> <HH:MM> <repeat> <title> [| message]".to_string(),
                );
            };
            let repeat: Repeat = repeat.parse().map_err(|e| format!("{e}"))?;
            let title = parts.collect::<Vec<_>>().join(" ");
            Ok(ConsoleCommand::Add {
                date: date.to_string(),
                time: time.to_string(),
                repeat,
                title,
                message: message.to_string(),
            })
        }
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

enum Flow {
    Continue,
    Quit,
}

fn apply(app: &App, command: ConsoleCommand) -> Flow {
    match command {
        ConsoleCommand::Empty => {}
        ConsoleCommand::Help => println!("{HELP}"),
        ConsoleCommand::Quit => return Flow::Quit,
        ConsoleCommand::List => print!("{}", view::render_list(&app.store.reminders())),
        ConsoleCommand::Stats => print!("{}", view::render_stats(&app.store.stats(local_now()))),
        ConsoleCommand::Backup(name) => match app.store.backup(&name) {
            Ok(path) => println!("Backup written to {}", path.display()),
            Err(e) => println!("Backup failed: {e}"),
        },
        ConsoleCommand::Delete(indices) => match app.store.delete_many(&indices) {
            Ok(0) => println!("No matching reminders."),
            Ok(n) => {
                println!("Deleted {n} reminder(s)");
                print!("{}", view::render_list(&app.store.reminders()));
            }
            Err(e) => println!("Delete failed: {e}"),
        },
        ConsoleCommand::Add {
            date,
            time,
            repeat,
            title,
            message,
        } => {
            let added = parse_due(&date, &time)
                .map_err(scholar_scheduler::SchedulerError::from)
                .and_then(|due_at| {
                    let new = NewReminder {
                        title,
                        message,
                        due_at,
                        repeat,
                    };
                    app.store.add_new(new, local_now())
                });
            match added {
                Ok(r) => println!("Reminder '{}' set for {}", r.title, r.due_label()),
                Err(e) => println!("Error: {e}"),
            }
        }
    }
    Flow::Continue
}

/// Read stdin on a plain thread so a pending read never holds up runtime
/// shutdown. The channel closes on EOF or a read error.
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });
    rx
}

/// Start the scheduler and serve the console until `quit` or Ctrl-C.
pub async fn run(app: &App) -> anyhow::Result<()> {
    let (refresh_tx, mut refresh_rx) = mpsc::channel(app.config.reminders.refresh_buffer.max(1));
    let engine = SchedulerEngine::new(
        &app.store,
        app.notifier(),
        app.config.reminders.tick_interval(),
        Some(refresh_tx),
    )?;
    let task = engine.spawn();

    print!("{}", view::render_list(&app.store.reminders()));
    println!("Type 'help' for commands.");

    let mut lines = spawn_stdin_reader();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            report = refresh_rx.recv() => match report {
                Some(report) => {
                    println!("{}", view::render_report(&report));
                    print!("{}", view::render_list(&app.store.reminders()));
                }
                None => {
                    warn!("scheduler stopped unexpectedly");
                    break;
                }
            },
            line = lines.recv(), if stdin_open => match line {
                Some(line) => match parse_command(&line) {
                    Ok(command) => {
                        if let Flow::Quit = apply(app, command) {
                            break;
                        }
                    }
                    Err(msg) => println!("{msg}"),
                },
                None => {
                    info!("stdin closed; scheduler keeps running until Ctrl-C");
                    stdin_open = false;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received");
                break;
            }
        }
    }

    task.stop().await;
    Ok(())
}
