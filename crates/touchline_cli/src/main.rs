//! TouchLine CLI
//!
//! Replays recorded match scripts and maintains match archives.

#[cfg(feature = "cli")]
use anyhow::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "touchline")]
#[command(about = "Replay match scripts and manage match archives", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON match script and print the resulting match
    Replay {
        /// Match script JSON file
        #[arg(long)]
        script: PathBuf,

        /// Add the replayed match to this archive file
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Print the snapshot as JSON instead of a report
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List the matches kept in an archive, newest first
    History {
        #[arg(long)]
        archive: PathBuf,
    },

    /// Delete an ended match from an archive
    Delete {
        #[arg(long)]
        archive: PathBuf,

        #[arg(long)]
        match_id: String,
    },
}

#[cfg(feature = "cli")]
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let now = chrono::Utc::now();

    match cli.command {
        Commands::Replay { script, archive, json } => {
            let outcome = touchline_cli::replay(&script, archive.as_deref(), now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome.snapshot)?);
            } else {
                print!("{}", touchline_cli::render_report(&outcome.snapshot));
            }
            if let (Some(path), Some(count)) = (archive, outcome.archived) {
                eprintln!("Archived to {} ({} matches)", path.display(), count);
            }
        }

        Commands::History { archive } => {
            let listings = touchline_cli::list_history(&archive)?;
            if listings.is_empty() {
                println!("No matches in {}", archive.display());
            }
            for listing in &listings {
                println!("{}", touchline_cli::render_listing(listing));
            }
        }

        Commands::Delete { archive, match_id } => {
            let removed = touchline_cli::delete_match(&archive, &match_id, now)?;
            println!("Deleted {}", touchline_cli::render_listing(&removed));
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("touchline CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
