//! CSV export command.

use clap::Args;
use std::path::PathBuf;

use signal_catalog_core::error::CatalogError;
use signal_catalog_core::export::write_csv;
use signal_catalog_core::signal::{Severity, Status};
use signal_catalog_core::storage::SignalFilter;

use super::{context, parse_severity, StoreArgs};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Filter by status: open, closed or all (default all)
    #[arg(long, default_value = "all")]
    pub status: String,
    /// Filter by category
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by owner
    #[arg(long)]
    pub owner: Option<String>,
    /// Filter by severity
    #[arg(long, value_parser = parse_severity)]
    pub severity: Option<Severity>,
    /// Substring search over title, notes and source
    #[arg(long)]
    pub search: Option<String>,
    /// Output CSV file path (stdout when omitted)
    #[arg(long)]
    pub out: Option<PathBuf>,
}

pub fn run(store_args: &StoreArgs, args: ExportArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let status = match args.status.as_str() {
        "all" => None,
        other => Some(other.parse::<Status>()?),
    };
    let signals = ctx.store.list(&SignalFilter {
        status,
        category: args.category,
        owner: args.owner,
        severity: args.severity,
        search: args.search,
        ..SignalFilter::default()
    })?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = std::fs::File::create(path)?;
            write_csv(&signals, file)?;
            println!("Exported {} signals to {}.", signals.len(), path.display());
        }
        None => {
            write_csv(&signals, std::io::stdout().lock())?;
        }
    }
    Ok(())
}
