//! # salon-admin
//!
//! Command-line front end for the salon database.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  args ──► Command::parse ──► AdminConfig::load ──► Database::new       │
//! │                                                        │                │
//! │                                                        ▼                │
//! │                         stdout (JSON) ◄── Command::run                 │
//! │                         stderr (JSON) ◄── AdminError, exit code 1      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Environment
//! - `SALON_DATABASE_PATH` - SQLite file (default `salon.db`)
//! - `SALON_DB_MAX_CONNECTIONS` - pool size (default 5)
//! - `SALON_LOG` - tracing filter (default `info`)

mod commands;
mod config;
mod error;

use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use salon_db::{Database, DbConfig};

use crate::commands::Command;
use crate::config::AdminConfig;
use crate::error::{AdminError, ErrorCode};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            match serde_json::to_string_pretty(&err) {
                Ok(json) => eprintln!("{json}"),
                Err(_) => eprintln!("{err}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<String, AdminError> {
    let config = AdminConfig::load()?;
    init_tracing(&config.log_filter);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    info!(
        path = %config.database_path.display(),
        max_connections = config.max_connections,
        "Configuration loaded"
    );

    let db = Database::new(
        DbConfig::new(&config.database_path).max_connections(config.max_connections),
    )
    .await?;

    let output = command.run(&db).await;
    db.close().await;

    serde_json::to_string_pretty(&output?)
        .map_err(|e| AdminError::new(ErrorCode::Internal, e.to_string()))
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
