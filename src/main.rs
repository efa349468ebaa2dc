//! Binary entry point for suggestbox.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr for failures that happen before logging is installed
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use suggestbox::config::{ConfigOverrides, ServerConfig};
use suggestbox::observability;
use suggestbox::{SqliteSuggestionStore, SuggestionStore};

/// Suggestbox - a small suggestion box service backed by `SQLite`.
#[derive(Parser)]
#[command(name = "suggestbox")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = "SUGGESTBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the `SQLite` database file.
    #[arg(long, global = true, env = "DB_PATH")]
    db_path: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long, global = true, env = "PORT")]
    port: Option<u16>,

    /// Directory served for paths outside the API.
    #[arg(long, global = true, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Default)]
enum Commands {
    /// Serve the HTTP API and static assets (default).
    #[default]
    Serve,

    /// Create the database file and schema, then exit.
    InitDb,
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is not an error.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        db_path: cli.db_path,
        port: cli.port,
        static_dir: cli.static_dir,
    };
    let config = match ServerConfig::load(cli.config.as_deref(), overrides) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    let observability = match observability::init_from_config(&config.observability, cli.verbose)
    {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Failed to initialize observability: {e}");
            return ExitCode::FAILURE;
        },
    };
    tracing::debug!(
        metrics_enabled = observability.metrics_enabled(),
        "Observability initialized"
    );

    let store = match SqliteSuggestionStore::open(&config.db_path) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(db_path = %config.db_path.display(), error = %e, "Failed to open database");
            return ExitCode::FAILURE;
        },
    };

    let result = match cli.command.unwrap_or_default() {
        Commands::Serve => {
            let store: Arc<dyn SuggestionStore> = Arc::new(store);
            suggestbox::http::serve(&config, store).await
        },
        Commands::InitDb => {
            tracing::info!(db_path = %store.db_path().display(), "Database initialized");
            Ok(())
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Server failed");
            ExitCode::FAILURE
        },
    }
}
