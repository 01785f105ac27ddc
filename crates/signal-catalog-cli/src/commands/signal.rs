//! Signal CRUD commands: init, add, list, update, close, reopen, summary.

use chrono::{NaiveDate, Utc};
use clap::Args;
use std::collections::BTreeMap;

use signal_catalog_core::error::CatalogError;
use signal_catalog_core::render::{OutputFormat, ReportDoc, Table};
use signal_catalog_core::signal::{join_tags, parse_tags, NewSignal, Severity, Signal, Status};
use signal_catalog_core::storage::SignalFilter;

use super::{context, parse_cli_date, parse_severity, parse_status, StoreArgs};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Signal title
    #[arg(long)]
    pub title: String,
    /// Category label
    #[arg(long)]
    pub category: Option<String>,
    /// Severity: low, medium, high or critical (default medium)
    #[arg(long, value_parser = parse_severity)]
    pub severity: Option<Severity>,
    /// Owner name
    #[arg(long)]
    pub owner: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    pub due: Option<NaiveDate>,
    /// Free-text notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Where the signal came from
    #[arg(long)]
    pub source: Option<String>,
    /// Comma-separated tags
    #[arg(long)]
    pub tags: Option<String>,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter by status: open, closed or all
    #[arg(long, default_value = "open")]
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
    /// Filter by tag
    #[arg(long)]
    pub tag: Option<String>,
    /// Substring search over title, notes and source
    #[arg(long)]
    pub search: Option<String>,
    /// Maximum rows
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Signal id
    pub id: i64,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New category
    #[arg(long)]
    pub category: Option<String>,
    /// New severity
    #[arg(long, value_parser = parse_severity)]
    pub severity: Option<Severity>,
    /// New owner
    #[arg(long)]
    pub owner: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_cli_date)]
    pub due: Option<NaiveDate>,
    /// Remove the due date
    #[arg(long, conflicts_with = "due")]
    pub clear_due: bool,
    /// Paragraph to append to the notes
    #[arg(long)]
    pub notes: Option<String>,
    /// Erase the notes (appending is the default behavior)
    #[arg(long, conflicts_with = "notes")]
    pub clear_notes: bool,
    /// New source
    #[arg(long)]
    pub source: Option<String>,
    /// Replace the tag list (comma-separated)
    #[arg(long)]
    pub tags: Option<String>,
    /// New status: open or closed (routes through the close/reopen
    /// transition, with timestamp bookkeeping)
    #[arg(long, value_parser = parse_status)]
    pub status: Option<Status>,
}

pub fn run_init(store_args: &StoreArgs) -> Result<(), CatalogError> {
    let ctx = context(store_args)?;
    println!("Initialized {}.", ctx.store.describe());
    Ok(())
}

pub fn run_add(store_args: &StoreArgs, args: AddArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let new = NewSignal {
        title: args.title,
        category: args.category,
        severity: Some(args.severity.unwrap_or_default()),
        owner: args.owner,
        source: args.source,
        due: args.due,
        tags: args.tags.as_deref().map(parse_tags).unwrap_or_default(),
        notes: args.notes,
    };
    new.validate()?;
    let id = ctx.store.insert(&new, Utc::now())?;
    println!("Added signal {id}.");
    Ok(())
}

fn list_filter(args: &ListArgs) -> Result<SignalFilter, CatalogError> {
    let status = match args.status.as_str() {
        "all" => None,
        other => Some(other.parse::<Status>()?),
    };
    Ok(SignalFilter {
        status,
        category: args.category.clone(),
        owner: args.owner.clone(),
        severity: args.severity,
        tag: args.tag.clone(),
        search: args.search.clone(),
        limit: args.limit,
    })
}

pub fn run_list(store_args: &StoreArgs, args: ListArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let signals = ctx.store.list(&list_filter(&args)?)?;
    if signals.is_empty() {
        println!("No signals found.");
        return Ok(());
    }

    let mut table = Table::new(&[
        "ID", "Title", "Category", "Severity", "Owner", "Due", "Status", "Tags",
    ]);
    for signal in &signals {
        table.push_row(vec![
            signal.id.to_string(),
            signal.title.clone(),
            signal.category.clone().unwrap_or_default(),
            signal.severity.map(|s| s.to_string()).unwrap_or_default(),
            signal.owner.clone().unwrap_or_default(),
            signal.due.map(|d| d.to_string()).unwrap_or_default(),
            signal.status.to_string(),
            join_tags(&signal.tags),
        ]);
    }
    let mut doc = ReportDoc::new(OutputFormat::Table);
    doc.table(&table);
    print!("{}", doc.finish());
    Ok(())
}

fn fetch(ctx: &mut super::CommandContext, id: i64) -> Result<Signal, CatalogError> {
    ctx.store.get(id)?.ok_or(CatalogError::NotFound { id })
}

pub fn run_update(store_args: &StoreArgs, args: UpdateArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let mut signal = fetch(&mut ctx, args.id)?;
    let now = Utc::now();

    if let Some(title) = args.title {
        if title.trim().is_empty() {
            return Err(signal_catalog_core::error::ValidationError::EmptyTitle.into());
        }
        signal.title = title;
    }
    if let Some(category) = args.category {
        signal.category = Some(category);
    }
    if let Some(severity) = args.severity {
        signal.severity = Some(severity);
    }
    if let Some(owner) = args.owner {
        signal.owner = Some(owner);
    }
    if let Some(due) = args.due {
        signal.due = Some(due);
    }
    if args.clear_due {
        signal.due = None;
    }
    if args.clear_notes {
        signal.notes = None;
    }
    if let Some(notes) = args.notes {
        signal.append_note(&notes);
    }
    if let Some(source) = args.source {
        signal.source = Some(source);
    }
    if let Some(tags) = args.tags {
        signal.tags = parse_tags(&tags);
    }
    match args.status {
        Some(Status::Closed) => {
            signal.close(now, None);
        }
        Some(Status::Open) => {
            signal.reopen(now, None);
        }
        None => {}
    }

    signal.touch(now);
    ctx.store.update(&signal)?;
    println!("Updated signal {}.", signal.id);
    Ok(())
}

pub fn run_close(store_args: &StoreArgs, id: i64, note: Option<String>) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let mut signal = fetch(&mut ctx, id)?;
    if !signal.close(Utc::now(), note.as_deref()) {
        println!("Signal {id} is already closed.");
        return Ok(());
    }
    ctx.store.update(&signal)?;
    println!("Closed signal {id}.");
    Ok(())
}

pub fn run_reopen(store_args: &StoreArgs, id: i64, note: Option<String>) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let mut signal = fetch(&mut ctx, id)?;
    if !signal.reopen(Utc::now(), note.as_deref()) {
        println!("Signal {id} is already open.");
        return Ok(());
    }
    ctx.store.update(&signal)?;
    println!("Reopened signal {id}.");
    Ok(())
}

fn rollup<'a>(doc: &mut ReportDoc, label: &str, groups: impl Iterator<Item = (&'a str, usize)>) {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for (key, n) in groups {
        *counts.entry(key.to_string()).or_default() += n;
    }
    let mut ordered: Vec<(String, usize)> = counts.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    doc.blank();
    doc.heading(label);
    if ordered.is_empty() {
        doc.line("(none)");
        return;
    }
    for (key, count) in ordered {
        doc.kv(&key, count);
    }
}

pub fn run_summary(store_args: &StoreArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let signals = ctx.store.list(&SignalFilter::default())?;

    let mut doc = ReportDoc::new(OutputFormat::Table);
    rollup(
        &mut doc,
        "By status",
        signals.iter().map(|s| (s.status.as_str(), 1)),
    );
    rollup(
        &mut doc,
        "By category",
        signals.iter().map(|s| (s.category_label(), 1)),
    );
    rollup(
        &mut doc,
        "By severity",
        signals.iter().map(|s| (s.severity_or_default().as_str(), 1)),
    );
    rollup(
        &mut doc,
        "By owner",
        signals.iter().map(|s| (s.owner_label(), 1)),
    );
    print!("{}", doc.finish());
    Ok(())
}
