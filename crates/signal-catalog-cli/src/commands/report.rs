//! Report commands: digest, triage, workload, calendar, audit, metrics,
//! stale, activity, trend.

use clap::Args;

use signal_catalog_core::error::CatalogError;
use signal_catalog_core::reports;
use signal_catalog_core::storage::SignalFilter;

use super::{context, emit, ReportArgs, StoreArgs};

/// Triage looks further ahead than the digest by default.
const DEFAULT_TRIAGE_DAYS: u32 = 14;
const DEFAULT_METRICS_DUE_DAYS: u32 = 14;
const DEFAULT_DIGEST_LIMIT: usize = 8;
const DEFAULT_TRIAGE_LIMIT: usize = 10;
const DEFAULT_TREND_WEEKS: u32 = 8;

#[derive(Args, Debug)]
pub struct WindowedArgs {
    /// Lookback/lookahead window in days
    #[arg(long)]
    pub days: Option<u32>,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct StaleArgs {
    /// Days without an update before a signal counts as stale
    #[arg(long)]
    pub stale_days: Option<u32>,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Forward window for the due-soon count
    #[arg(long)]
    pub due_days: Option<u32>,
    /// Days without an update before a signal counts as stale
    #[arg(long)]
    pub stale_days: Option<u32>,
    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args, Debug)]
pub struct TrendArgs {
    /// Number of ISO weeks to cover
    #[arg(long)]
    pub weeks: Option<u32>,
    #[command(flatten)]
    pub report: ReportArgs,
}

fn all_signals(
    store_args: &StoreArgs,
) -> Result<(super::CommandContext, Vec<signal_catalog_core::Signal>), CatalogError> {
    let mut ctx = context(store_args)?;
    let signals = ctx.store.list(&SignalFilter::default())?;
    Ok((ctx, signals))
}

pub fn run_digest(store_args: &StoreArgs, args: WindowedArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let days = args.days.unwrap_or(ctx.config.policy.due_soon_days);
    let limit = args.report.limit.or(Some(DEFAULT_DIGEST_LIMIT));
    let report = reports::digest(&signals, args.report.as_of(), days, limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_triage(store_args: &StoreArgs, args: WindowedArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let days = args.days.unwrap_or(DEFAULT_TRIAGE_DAYS);
    let limit = args.report.limit.or(Some(DEFAULT_TRIAGE_LIMIT));
    let report = reports::triage(
        &signals,
        args.report.as_of(),
        days,
        limit,
        &ctx.config.triage,
    );
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_workload(store_args: &StoreArgs, args: WindowedArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let days = args.days.unwrap_or(ctx.config.policy.due_soon_days);
    let report = reports::workload(&signals, args.report.as_of(), days, args.report.limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_calendar(store_args: &StoreArgs, args: WindowedArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let horizon = args.days.unwrap_or(ctx.config.policy.calendar_horizon_days);
    let report = reports::calendar(&signals, args.report.as_of(), horizon, args.report.limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_audit(store_args: &StoreArgs, args: StaleArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let stale_days = args.stale_days.unwrap_or(ctx.config.policy.stale_days);
    let report = reports::audit(&signals, args.report.as_of(), stale_days, args.report.limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_metrics(store_args: &StoreArgs, args: MetricsArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let due_days = args.due_days.unwrap_or(DEFAULT_METRICS_DUE_DAYS);
    let stale_days = args.stale_days.unwrap_or(ctx.config.policy.stale_days);
    let report = reports::metrics(&signals, args.report.as_of(), due_days, stale_days);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_stale(store_args: &StoreArgs, args: StaleArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let stale_days = args.stale_days.unwrap_or(ctx.config.policy.stale_days);
    let report = reports::stale(&signals, args.report.as_of(), stale_days, args.report.limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_activity(store_args: &StoreArgs, args: WindowedArgs) -> Result<(), CatalogError> {
    let (ctx, signals) = all_signals(store_args)?;
    let days = args.days.unwrap_or(ctx.config.policy.due_soon_days);
    let report = reports::activity(&signals, args.report.as_of(), days, args.report.limit);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}

pub fn run_trend(store_args: &StoreArgs, args: TrendArgs) -> Result<(), CatalogError> {
    let (_ctx, signals) = all_signals(store_args)?;
    let weeks = args.weeks.unwrap_or(DEFAULT_TREND_WEEKS);
    let report = reports::trend(&signals, args.report.as_of(), weeks);
    emit(&report.render(args.report.format), args.report.out.as_deref())
}
