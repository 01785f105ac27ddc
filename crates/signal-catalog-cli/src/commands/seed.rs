//! Seed command: load deterministic sample data.

use chrono::{Duration, Utc};
use clap::Args;

use signal_catalog_core::error::CatalogError;
use signal_catalog_core::seed::{base_catalog, synthetic, SeedSignal};

use super::{context, CommandContext, StoreArgs};

#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Extra synthetic signals on top of the curated base set
    #[arg(long, default_value_t = 0)]
    pub count: usize,
}

fn insert(ctx: &mut CommandContext, seed: &SeedSignal) -> Result<(), CatalogError> {
    let id = ctx.store.insert(&seed.new, seed.created_at)?;
    if let Some(after_days) = seed.closed_after_days {
        if let Some(mut signal) = ctx.store.get(id)? {
            signal.close(seed.created_at + Duration::days(after_days), None);
            ctx.store.update(&signal)?;
        }
    }
    Ok(())
}

pub fn run(store_args: &StoreArgs, args: SeedArgs) -> Result<(), CatalogError> {
    let mut ctx = context(store_args)?;
    let now = Utc::now();

    let mut seeded = 0;
    for seed in base_catalog(now) {
        insert(&mut ctx, &seed)?;
        seeded += 1;
    }
    for seed in synthetic(now, args.count) {
        insert(&mut ctx, &seed)?;
        seeded += 1;
    }

    println!("Seeded {seeded} signals into {}.", ctx.store.describe());
    Ok(())
}
