//! Sensor-log session discovery - command line entry point
//!
//! Expands archives, groups sensor logs into sessions and prints a summary of
//! each session found under the given folders.

use std::path::PathBuf;

use clap::Parser;
use sensorlog_sessions::{config, LoaderConfig, SessionLoader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Group sensor-log CSV files into recording sessions.
#[derive(Debug, Parser)]
#[command(name = "sensorlog-sessions", version, about)]
struct Cli {
    /// Folders to search (recursively, including archives).
    #[arg(required = true)]
    folders: Vec<PathBuf>,
    /// Config file (defaults to the platform config directory).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Do not unpack archives.
    #[arg(long)]
    no_expand: bool,
    /// Print sessions as a JSON array.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sensorlog_sessions=debug")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut loader_config = match cli.config.or_else(config::default_config_path) {
        Some(path) if path.exists() => {
            tracing::info!("Using config {:?}", path);
            LoaderConfig::load(&path)?
        }
        _ => LoaderConfig::default(),
    };
    if cli.no_expand {
        loader_config.expand_archives = false;
    }

    let loader = SessionLoader::new(loader_config);
    let sessions = loader.load_sessions(&cli.folders);

    if cli.json {
        let summaries: Vec<_> = sessions.iter().map(|s| s.summary()).collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for session in &sessions {
            let kinds: Vec<&str> = session
                .loaded_kinds()
                .iter()
                .map(|k| k.display_name())
                .collect();
            println!(
                "{}\t{} files\t[{}]",
                session.session_key(),
                session.files().len(),
                kinds.join(", ")
            );
        }
    }

    Ok(())
}
