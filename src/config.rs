// src/config.rs
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Client portfolio dossier: drill-down over the portfolio spreadsheet.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Settings {
    /// Spreadsheet to serve (.xlsx/.xls/.ods or .csv). A missing file means "no data".
    #[arg(long, env = "DOSSIER_DATA_FILE", default_value = "data.xlsx", global = true)]
    pub data_file: PathBuf,

    /// Worksheet to read; defaults to the first one.
    #[arg(long, env = "DOSSIER_SHEET", global = true)]
    pub sheet: Option<String>,

    /// Base log level; RUST_LOG directives are applied alongside it.
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    pub log_level: String,

    /// Port for `serve`.
    #[arg(long, env = "PORT", default_value_t = 8080, global = true)]
    pub port: u16,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the JSON drill-down API (default).
    Serve,
    /// Print what was loaded: record counts, fund dates, skipped columns.
    Summary,
    /// Print one customer's dossier as JSON.
    Customer(CustomerArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CustomerArgs {
    #[arg(long)]
    pub customer: String,
    #[arg(long)]
    pub state: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub segment: Option<String>,
    /// Refuse to pick when several rows match instead of taking the first.
    #[arg(long)]
    pub require_unique: bool,
}

impl Settings {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Serve)
    }
}

/// Install the global fmt subscriber.
pub fn init_logging(level: &str) {
    let env = EnvFilter::from_default_env()
        .add_directive(level.parse().unwrap_or(Level::INFO.into()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_target(false)
        .init();
}
