//! Postgres-backed signal storage for the hosted deployment.
//!
//! Same table shape as the SQLite backend; timestamps and dates are kept as
//! TEXT so rows move between backends via CSV without conversion.

use chrono::{DateTime, Utc};
use postgres::types::ToSql;
use postgres::{Client, NoTls};
use tracing::debug;

use super::{filter_sql, format_tags, format_ts, RawSignal, SignalFilter, SignalStore};
use crate::error::StoreError;
use crate::signal::{NewSignal, Signal, Status};

/// Hosted Postgres database holding the signal table.
pub struct PostgresStore {
    client: Client,
    table: String,
}

impl PostgresStore {
    /// Connect with a DSN from the environment. The connection string is
    /// never echoed back in errors.
    ///
    /// # Errors
    /// Returns an error if the connection fails or the table name is not a
    /// plain identifier.
    pub fn connect(dsn: &str, table: &str) -> Result<Self, StoreError> {
        if table.is_empty()
            || !table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(StoreError::SchemaFailed(format!(
                "invalid table name '{table}'"
            )));
        }
        let client = Client::connect(dsn, NoTls).map_err(|e| StoreError::ConnectFailed {
            message: e.to_string(),
        })?;
        Ok(Self {
            client,
            table: table.to_string(),
        })
    }

    fn row_to_raw(row: &postgres::Row) -> RawSignal {
        RawSignal {
            id: row.get(0),
            title: row.get(1),
            category: row.get(2),
            severity: row.get(3),
            owner: row.get(4),
            due_date: row.get(5),
            status: row.get(6),
            notes: row.get(7),
            source: row.get(8),
            tags: row.get(9),
            created_at: row.get(10),
            updated_at: row.get(11),
            closed_at: row.get(12),
        }
    }
}

const SELECT_COLUMNS: &str = "id, title, category, severity, owner, due_date, status, \
                              notes, source, tags, created_at, updated_at, closed_at";

impl SignalStore for PostgresStore {
    fn init_schema(&mut self) -> Result<(), StoreError> {
        let table = &self.table;
        self.client
            .batch_execute(&format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    id         BIGSERIAL PRIMARY KEY,
                    title      TEXT NOT NULL,
                    category   TEXT,
                    severity   TEXT,
                    owner      TEXT,
                    due_date   TEXT,
                    status     TEXT NOT NULL,
                    notes      TEXT,
                    source     TEXT,
                    tags       TEXT NOT NULL DEFAULT '[]',
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    closed_at  TEXT
                );
                CREATE INDEX IF NOT EXISTS idx_{table}_status ON {table}(status);
                CREATE INDEX IF NOT EXISTS idx_{table}_owner ON {table}(owner);"
            ))
            .map_err(|e| StoreError::SchemaFailed(e.to_string()))
    }

    fn insert(&mut self, new: &NewSignal, created_at: DateTime<Utc>) -> Result<i64, StoreError> {
        let ts = format_ts(created_at);
        let due = new.due.map(|d| d.to_string());
        let severity = new.severity.map(|s| s.as_str().to_string());
        let tags = format_tags(&new.tags);
        let row = self.client.query_one(
            &format!(
                "INSERT INTO {} (title, category, severity, owner, due_date, status, notes,
                                 source, tags, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                 RETURNING id",
                self.table
            ),
            &[
                &new.title,
                &new.category,
                &severity,
                &new.owner,
                &due,
                &Status::Open.as_str(),
                &new.notes,
                &new.source,
                &tags,
                &ts,
                &ts,
            ],
        )?;
        let id: i64 = row.get(0);
        debug!(id, "inserted signal");
        Ok(id)
    }

    fn get(&mut self, id: i64) -> Result<Option<Signal>, StoreError> {
        let row = self.client.query_opt(
            &format!("SELECT {SELECT_COLUMNS} FROM {} WHERE id = $1", self.table),
            &[&id],
        )?;
        row.map(|r| Self::row_to_raw(&r).into_signal()).transpose()
    }

    fn list(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>, StoreError> {
        let (clause, values) = filter_sql(filter, |n| format!("${n}"));
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS} FROM {} {clause} ORDER BY created_at DESC, id DESC",
            self.table
        );
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        debug!(%sql, "listing signals");

        let params: Vec<&(dyn ToSql + Sync)> =
            values.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        let rows = self.client.query(&sql, &params)?;

        let mut signals = Vec::new();
        for row in &rows {
            signals.push(Self::row_to_raw(row).into_signal()?);
        }
        Ok(signals)
    }

    fn update(&mut self, signal: &Signal) -> Result<(), StoreError> {
        let due = signal.due.map(|d| d.to_string());
        let severity = signal.severity.map(|s| s.as_str().to_string());
        let tags = format_tags(&signal.tags);
        let updated_at = format_ts(signal.updated_at);
        let closed_at = signal.closed_at.map(format_ts);
        let changed = self.client.execute(
            &format!(
                "UPDATE {}
                 SET title = $1, category = $2, severity = $3, owner = $4, due_date = $5,
                     status = $6, notes = $7, source = $8, tags = $9,
                     updated_at = $10, closed_at = $11
                 WHERE id = $12",
                self.table
            ),
            &[
                &signal.title,
                &signal.category,
                &severity,
                &signal.owner,
                &due,
                &signal.status.as_str(),
                &signal.notes,
                &signal.source,
                &tags,
                &updated_at,
                &closed_at,
                &signal.id,
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::QueryFailed(format!(
                "update matched no row for id {}",
                signal.id
            )));
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("postgres:{}", self.table)
    }
}
