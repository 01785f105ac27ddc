//! Storage backends for the signal table.
//!
//! The catalog persists to a single `signals` table, either in a local
//! SQLite file or a hosted Postgres database. Backends implement the
//! [`SignalStore`] trait; everything above the trait works on `Signal`
//! values and never sees SQL, so the reports cannot depend on which backend
//! is active.

mod config;
pub mod postgres;
pub mod sqlite;

pub use config::{Config, PolicyConfig, StorageConfig};
pub use postgres::PostgresStore;
pub use sqlite::SqliteStore;

use chrono::{DateTime, SecondsFormat, Utc};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{CatalogError, ConfigError, StoreError, ValidationError};
use crate::signal::{NewSignal, Severity, Signal, Status};

/// Environment variable selecting the backend (overridden by `--backend`).
pub const BACKEND_ENV: &str = "SIGNAL_CATALOG_BACKEND";

/// Environment variable holding the Postgres connection string.
pub const DSN_ENV: &str = "SIGNAL_CATALOG_DATABASE_URL";

/// Returns `~/.config/signal-catalog[-dev]/` based on SIGNAL_CATALOG_ENV.
///
/// Set SIGNAL_CATALOG_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SIGNAL_CATALOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("signal-catalog-dev")
    } else {
        base_dir.join("signal-catalog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Which storage engine backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl FromStr for Backend {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Backend::Sqlite),
            "postgres" => Ok(Backend::Postgres),
            other => Err(ValidationError::UnknownBackend {
                value: other.to_string(),
            }),
        }
    }
}

/// Row filters shared by `list` and `export`.
#[derive(Debug, Clone, Default)]
pub struct SignalFilter {
    pub status: Option<Status>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub severity: Option<Severity>,
    pub tag: Option<String>,
    /// Substring match over title, notes and source.
    pub search: Option<String>,
    pub limit: Option<usize>,
}

impl SignalFilter {
    /// Filter for open signals only, no other constraints.
    pub fn open_only() -> Self {
        Self {
            status: Some(Status::Open),
            ..Self::default()
        }
    }
}

/// Storage interface: one table, basic filtered selects, single-row writes.
pub trait SignalStore {
    /// Create the `signals` table if it does not exist. Idempotent.
    fn init_schema(&mut self) -> Result<(), StoreError>;

    /// Insert a new signal; status starts open, `created_at` and
    /// `updated_at` are both set to the given timestamp. Returns the id.
    fn insert(&mut self, new: &NewSignal, created_at: DateTime<Utc>) -> Result<i64, StoreError>;

    /// Fetch one signal by id.
    fn get(&mut self, id: i64) -> Result<Option<Signal>, StoreError>;

    /// Fetch signals matching the filter, newest first.
    fn list(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>, StoreError>;

    /// Persist every mutable field of an existing signal.
    fn update(&mut self, signal: &Signal) -> Result<(), StoreError>;

    /// Human-readable location, for `init` output and log lines.
    fn describe(&self) -> String;
}

/// Options resolved from CLI flags before opening a store.
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// `--backend`, overriding the environment and the config file.
    pub backend: Option<Backend>,
    /// `--db`, overriding the default SQLite path.
    pub db_path: Option<PathBuf>,
}

/// Open the configured backend.
///
/// Precedence for backend selection: `--backend` flag, then
/// `SIGNAL_CATALOG_BACKEND`, then the config file (default sqlite).
///
/// # Errors
/// Fails when the backend name is unknown, the SQLite file cannot be
/// opened, or postgres is selected without `SIGNAL_CATALOG_DATABASE_URL`.
pub fn open_store(opts: &StoreOptions, config: &Config) -> Result<Box<dyn SignalStore>, CatalogError> {
    let backend = match opts.backend {
        Some(b) => b,
        None => match std::env::var(BACKEND_ENV) {
            Ok(value) => value.parse::<Backend>()?,
            Err(_) => config.storage.backend.parse::<Backend>()?,
        },
    };

    match backend {
        Backend::Sqlite => {
            let path = match &opts.db_path {
                Some(p) => p.clone(),
                None => data_dir()?.join("signals.db"),
            };
            let mut store = SqliteStore::open(&path)?;
            store.init_schema()?;
            Ok(Box::new(store))
        }
        Backend::Postgres => {
            let dsn = std::env::var(DSN_ENV)
                .map_err(|_| ConfigError::MissingDsn { var: DSN_ENV })?;
            let mut store = PostgresStore::connect(&dsn, &config.storage.table)?;
            store.init_schema()?;
            Ok(Box::new(store))
        }
    }
}

// === Row <-> Signal conversion helpers, shared by both backends ===

/// Serialize a timestamp for a TEXT column.
pub(crate) fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a timestamp from a TEXT column, falling back to now on corrupt
/// rows rather than failing the whole query.
pub(crate) fn parse_ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Serialize tags for a TEXT column (JSON array).
pub(crate) fn format_tags(tags: &[String]) -> String {
    serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string())
}

/// A `signals` row as raw column values, before type conversion.
pub(crate) struct RawSignal {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub severity: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub source: Option<String>,
    pub tags: String,
    pub created_at: String,
    pub updated_at: String,
    pub closed_at: Option<String>,
}

impl RawSignal {
    pub fn into_signal(self) -> Result<Signal, StoreError> {
        let status = self
            .status
            .parse::<Status>()
            .map_err(|e| StoreError::QueryFailed(format!("row {}: {e}", self.id)))?;
        let severity = match self.severity.as_deref() {
            Some("") | None => None,
            Some(raw) => Some(
                raw.parse::<Severity>()
                    .map_err(|e| StoreError::QueryFailed(format!("row {}: {e}", self.id)))?,
            ),
        };
        // A malformed due date degrades to "no due date" instead of taking
        // the whole report down.
        let due = self
            .due_date
            .as_deref()
            .and_then(|raw| chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok());
        let tags: Vec<String> = serde_json::from_str(&self.tags).unwrap_or_default();

        Ok(Signal {
            id: self.id,
            title: self.title,
            category: self.category.filter(|c| !c.is_empty()),
            severity,
            owner: self.owner.filter(|o| !o.is_empty()),
            source: self.source.filter(|s| !s.is_empty()),
            status,
            due,
            tags,
            notes: self.notes.filter(|n| !n.is_empty()),
            created_at: parse_ts(&self.created_at),
            updated_at: parse_ts(&self.updated_at),
            closed_at: self.closed_at.as_deref().map(parse_ts),
        })
    }
}

/// WHERE clause plus bind values for a [`SignalFilter`].
///
/// `placeholder` renders the nth bind marker (1-based): `?n` for SQLite,
/// `$n` for Postgres.
pub(crate) fn filter_sql(
    filter: &SignalFilter,
    placeholder: impl Fn(usize) -> String,
) -> (String, Vec<String>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut values: Vec<String> = Vec::new();

    if let Some(status) = filter.status {
        values.push(status.as_str().to_string());
        conditions.push(format!("status = {}", placeholder(values.len())));
    }
    if let Some(category) = &filter.category {
        values.push(category.clone());
        conditions.push(format!("category = {}", placeholder(values.len())));
    }
    if let Some(owner) = &filter.owner {
        values.push(owner.clone());
        conditions.push(format!("owner = {}", placeholder(values.len())));
    }
    if let Some(severity) = filter.severity {
        values.push(severity.as_str().to_string());
        conditions.push(format!("severity = {}", placeholder(values.len())));
    }
    if let Some(tag) = &filter.tag {
        // Tags are stored as a JSON array; match on the quoted element.
        values.push(format!("%\"{tag}\"%"));
        conditions.push(format!("tags LIKE {}", placeholder(values.len())));
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{search}%");
        values.push(pattern.clone());
        let p1 = placeholder(values.len());
        values.push(pattern.clone());
        let p2 = placeholder(values.len());
        values.push(pattern);
        let p3 = placeholder(values.len());
        conditions.push(format!(
            "(title LIKE {p1} OR notes LIKE {p2} OR source LIKE {p3})"
        ));
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_sql_empty_filter_has_no_clause() {
        let (clause, values) = filter_sql(&SignalFilter::default(), |n| format!("?{n}"));
        assert!(clause.is_empty());
        assert!(values.is_empty());
    }

    #[test]
    fn filter_sql_numbers_placeholders_in_order() {
        let filter = SignalFilter {
            status: Some(Status::Open),
            owner: Some("Leah".to_string()),
            search: Some("backlog".to_string()),
            ..SignalFilter::default()
        };
        let (clause, values) = filter_sql(&filter, |n| format!("${n}"));
        assert_eq!(
            clause,
            "WHERE status = $1 AND owner = $2 AND \
             (title LIKE $3 OR notes LIKE $4 OR source LIKE $5)"
        );
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], "open");
        assert_eq!(values[2], "%backlog%");
    }

    #[test]
    fn backend_parse() {
        assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
        assert_eq!("postgres".parse::<Backend>().unwrap(), Backend::Postgres);
        assert!("mysql".parse::<Backend>().is_err());
    }

    #[test]
    fn raw_signal_degrades_bad_due_date_to_none() {
        let raw = RawSignal {
            id: 7,
            title: "t".to_string(),
            category: None,
            severity: Some("high".to_string()),
            owner: None,
            due_date: Some("02/30/2026".to_string()),
            status: "open".to_string(),
            notes: None,
            source: None,
            tags: "[\"a\",\"b\"]".to_string(),
            created_at: "2026-02-01T09:00:00Z".to_string(),
            updated_at: "2026-02-02T09:00:00Z".to_string(),
            closed_at: None,
        };
        let signal = raw.into_signal().unwrap();
        assert_eq!(signal.due, None);
        assert_eq!(signal.tags, vec!["a".to_string(), "b".to_string()]);
        assert!(signal.updated_at >= signal.created_at);
    }

    #[test]
    fn raw_signal_rejects_unknown_status() {
        let raw = RawSignal {
            id: 8,
            title: "t".to_string(),
            category: None,
            severity: None,
            owner: None,
            due_date: None,
            status: "pending".to_string(),
            notes: None,
            source: None,
            tags: "[]".to_string(),
            created_at: "2026-02-01T09:00:00Z".to_string(),
            updated_at: "2026-02-01T09:00:00Z".to_string(),
            closed_at: None,
        };
        assert!(raw.into_signal().is_err());
    }
}
