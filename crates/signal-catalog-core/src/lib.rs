//! # Signal Catalog Core Library
//!
//! Core business logic for the signal catalog: a CLI-first tracker for
//! short text "signals" (risks, partner notes, feedback items) stored in a
//! single relational table. The `signal-catalog` binary is a thin layer over
//! this crate.
//!
//! ## Architecture
//!
//! - **Storage**: one `signals` table behind the [`SignalStore`] trait, with
//!   SQLite (embedded) and Postgres (hosted) implementations
//! - **Date Policy**: pure overdue/due-soon/age/stale classification against
//!   an overridable as-of date
//! - **Reports**: digest, triage, workload, calendar, audit, metrics, stale,
//!   activity and trend generators over the policy layer
//! - **Rendering**: aligned text tables and markdown via [`render::ReportDoc`]
//!
//! ## Key Components
//!
//! - [`Signal`]: the sole entity, with its close/reopen lifecycle
//! - [`SignalStore`]: backend-independent storage interface
//! - [`Config`]: TOML configuration (policy windows, triage weights)

pub mod error;
pub mod export;
pub mod policy;
pub mod render;
pub mod reports;
pub mod seed;
pub mod signal;
pub mod storage;

pub use error::{CatalogError, ConfigError, StoreError, ValidationError};
pub use render::OutputFormat;
pub use reports::TriageWeights;
pub use signal::{NewSignal, Severity, Signal, Status};
pub use storage::{
    open_store, Backend, Config, PostgresStore, SignalFilter, SignalStore, SqliteStore,
    StoreOptions,
};
