//! # maplog CLI
//!
//! Console front end for editing robotic mower map logs.
//!
//! ## Usage
//! ```bash
//! # Edit map.log, saving the result to modified.log
//! maplog --input map.log --output modified.log
//!
//! # Output may equal the input; overwriting asks for confirmation
//! maplog -i map.log -o map.log
//! ```
//!
//! The input file is backed up into `./backups` (content-addressed, capped
//! at the 30 most recent archives) before the session starts.

use clap::Parser;
use colored::Colorize;
use maplog::{backup::DEFAULT_RETAIN, BackupStore, ConsolePrompt, EditSession, MaplogError, Result};
use std::path::PathBuf;
use tracing::info;

/// Inspect and edit an ordered mower map log
#[derive(Parser)]
#[command(name = "maplog")]
#[command(version)]
#[command(about = "Rename, reorder and remove areas in a mower map log")]
struct Cli {
    /// Path of the log file to read. Normally this is map.log
    #[arg(short, long)]
    input: PathBuf,

    /// Where to save the output. This can be the same as your input
    #[arg(short, long)]
    output: PathBuf,

    /// Directory for content-addressed backups of the input
    #[arg(long, default_value = "./backups")]
    backup_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    if std::env::var("NO_COLOR").is_ok() {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if !cli.input.exists() {
        return Err(MaplogError::MissingFile { path: cli.input });
    }

    let store = BackupStore::new(&cli.backup_dir, DEFAULT_RETAIN);
    store.backup(&cli.input)?;

    let entries = maplog::logfile::read_log(&cli.input)?;
    info!("Loaded {} entries from {:?}", entries.len(), cli.input);

    let mut session = EditSession::new(entries, cli.output);
    session.run(&mut ConsolePrompt::new())?;

    info!("Done!");
    Ok(())
}
