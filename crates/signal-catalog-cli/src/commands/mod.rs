//! CLI command implementations and shared plumbing.

pub mod export;
pub mod report;
pub mod seed;
pub mod signal;

use chrono::{NaiveDate, Utc};
use clap::Args;
use std::path::{Path, PathBuf};

use signal_catalog_core::error::{CatalogError, ValidationError};
use signal_catalog_core::render::OutputFormat;
use signal_catalog_core::signal::{parse_date, Severity, Status};
use signal_catalog_core::storage::{open_store, Backend, Config, SignalStore, StoreOptions};

/// Global storage selection flags.
#[derive(Args, Debug, Clone, Default)]
pub struct StoreArgs {
    /// Storage backend: sqlite or postgres
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<Backend>,
    /// SQLite database file (defaults to the config directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,
}

/// Flags shared by every report command.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Maximum rows/items per section
    #[arg(long)]
    pub limit: Option<usize>,
    /// Output format: table or markdown
    #[arg(long, default_value = "table", value_parser = parse_format)]
    pub format: OutputFormat,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Reference date (YYYY-MM-DD) for deterministic output
    #[arg(long, value_parser = parse_cli_date)]
    pub as_of: Option<NaiveDate>,
}

impl ReportArgs {
    pub fn as_of(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }
}

/// Config plus the opened storage backend, built once per invocation and
/// passed down explicitly.
pub struct CommandContext {
    pub config: Config,
    pub store: Box<dyn SignalStore>,
}

/// Open the configured backend for one command invocation.
pub fn context(store_args: &StoreArgs) -> Result<CommandContext, CatalogError> {
    let config = Config::load()?;
    let opts = StoreOptions {
        backend: store_args.backend,
        db_path: store_args.db.clone(),
    };
    let store = open_store(&opts, &config)?;
    tracing::debug!(store = %store.describe(), "opened backend");
    Ok(CommandContext { config, store })
}

pub fn parse_backend(s: &str) -> Result<Backend, ValidationError> {
    s.parse()
}

pub fn parse_format(s: &str) -> Result<OutputFormat, ValidationError> {
    s.parse()
}

pub fn parse_cli_date(s: &str) -> Result<NaiveDate, ValidationError> {
    parse_date(s)
}

pub fn parse_severity(s: &str) -> Result<Severity, ValidationError> {
    s.parse()
}

pub fn parse_status(s: &str) -> Result<Status, ValidationError> {
    s.parse()
}

/// Print a rendered report, or write it to `--out`.
pub fn emit(output: &str, out: Option<&Path>) -> Result<(), CatalogError> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let mut content = output.to_string();
            if !content.ends_with('\n') {
                content.push('\n');
            }
            std::fs::write(path, content)?;
            println!("Wrote report to {}.", path.display());
        }
        None => {
            print!("{output}");
            if !output.ends_with('\n') {
                println!();
            }
        }
    }
    Ok(())
}
