//! Watchtime command line: inspect, export and clear the watch history.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use watchtime::app::{init_tracing, App};
use watchtime::managers::history_store::HistoryStoreTrait;
use watchtime::services::display_format::{describe_entry, export_file_name};

#[derive(Parser)]
#[command(name = "watchtime", version, about = "Video watch-time history")]
struct Cli {
    /// Database file (defaults to $WATCHTIME_DATA_DIR/watchtime.db or the platform data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Settings file (defaults to the platform config dir)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the history, most recently added first
    List {
        /// Print the raw JSON array instead
        #[arg(long)]
        json: bool,
    },
    /// Write the history as CSV
    Export {
        /// Output file (defaults to youtube-history-<date>.csv; "-" for stdout)
        path: Option<PathBuf>,
    },
    /// Delete every history entry
    Clear,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing("warn");
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(watchtime::app::default_db_path);
    let settings_path = cli.settings.map(|p| p.to_string_lossy().to_string());
    let app = App::new(&db_path, settings_path)?;
    let mut history = app.history.lock().await;

    match cli.command {
        Command::List { json } => {
            let entries = history.list().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No watch history yet.");
            } else {
                for entry in &entries {
                    println!("{}\n  {}\n", describe_entry(entry), entry.url);
                }
            }
        }
        Command::Export { path } => {
            let csv = history.export_csv().await;
            if csv.lines().count() <= 1 {
                println!("No history to export");
                return Ok(());
            }
            match path {
                Some(p) if p.as_os_str() == "-" => println!("{}", csv),
                other => {
                    let target = other.unwrap_or_else(|| PathBuf::from(export_file_name(Utc::now())));
                    std::fs::write(&target, csv)?;
                    info!(path = %target.display(), "History exported");
                    println!("Exported to {}", target.display());
                }
            }
        }
        Command::Clear => {
            history.clear().await;
            println!("History cleared");
        }
    }
    Ok(())
}
