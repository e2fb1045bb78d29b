use clap::{Parser, Subcommand};
use scholar_core::config::ScholarConfig;
use scholar_core::time::{local_now, parse_due};
use scholar_core::{NewReminder, Repeat};
use tracing::info;

mod app;
mod console;
mod view;

/// Student assistant: reminder manager with a background scheduler.
#[derive(Debug, Parser)]
#[command(name = "scholar", version)]
struct Cli {
    /// Config file (default: $SCHOLAR_CONFIG, then ~/.scholar/scholar.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the scheduler with an interactive console (default)
    Run,
    /// Show active reminders
    List,
    /// Create a reminder
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        message: String,
        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,
        /// HH:MM, 24-hour clock
        #[arg(long)]
        time: String,
        /// none, daily or weekly
        #[arg(long, default_value = "none")]
        repeat: Repeat,
    },
    /// Delete reminders by list number (as shown by `list`)
    Delete {
        #[arg(required = true)]
        numbers: Vec<usize>,
    },
    /// Summary of the reminder list
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Copy the reminder file to backup_<name>
    Backup { name: Option<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scholar_cli=info,scholar_scheduler=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // load config: --config > SCHOLAR_CONFIG env > ~/.scholar/scholar.toml
    let config_path = cli.config.clone().or_else(|| std::env::var("SCHOLAR_CONFIG").ok());
    let config = ScholarConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        ScholarConfig::default()
    });

    let app = app::App::open(config);

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            info!("starting reminder scheduler");
            console::run(&app).await?;
        }
        Command::List => print!("{}", view::render_list(&app.store.reminders())),
        Command::Add {
            title,
            message,
            date,
            time,
            repeat,
        } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().format("%Y-%m-%d").to_string());
            let due_at = parse_due(&date, &time)?;
            let new = NewReminder {
                title,
                message,
                due_at,
                repeat,
            };
            let reminder = app.store.add_new(new, local_now())?;
            println!("Reminder '{}' set for {}", reminder.title, reminder.due_label());
        }
        Command::Delete { numbers } => {
            if numbers.contains(&0) {
                anyhow::bail!("list numbers start at 1");
            }
            let indices: Vec<usize> = numbers.iter().map(|n| n - 1).collect();
            let removed = app.store.delete_many(&indices)?;
            println!("Deleted {removed} reminder(s)");
        }
        Command::Stats { json } => {
            let stats = app.store.stats(local_now());
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print!("{}", view::render_stats(&stats));
            }
        }
        Command::Backup { name } => {
            let path = app.store.backup(name.as_deref().unwrap_or(""))?;
            println!("Backup written to {}", path.display());
        }
    }
    Ok(())
}
