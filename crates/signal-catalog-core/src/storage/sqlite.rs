//! SQLite-backed signal storage.

use chrono::{DateTime, Utc};
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{filter_sql, format_tags, format_ts, RawSignal, SignalFilter, SignalStore};
use crate::error::StoreError;
use crate::signal::{NewSignal, Signal, Status};

/// Embedded SQLite database holding the `signals` table.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
}

impl SqliteStore {
    /// Open (and create, if needed) the database file at `path`.
    ///
    /// # Errors
    /// Returns an error if the parent directory or the file cannot be
    /// created.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(|e| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::from)?;
        let mut store = Self {
            conn,
            path: PathBuf::from(":memory:"),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn map_rows(&self, sql: &str, values: &[String]) -> Result<Vec<Signal>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let raws = stmt.query_map(params_from_iter(values.iter()), |row| {
            Ok(RawSignal {
                id: row.get(0)?,
                title: row.get(1)?,
                category: row.get(2)?,
                severity: row.get(3)?,
                owner: row.get(4)?,
                due_date: row.get(5)?,
                status: row.get(6)?,
                notes: row.get(7)?,
                source: row.get(8)?,
                tags: row.get(9)?,
                created_at: row.get(10)?,
                updated_at: row.get(11)?,
                closed_at: row.get(12)?,
            })
        })?;

        let mut signals = Vec::new();
        for raw in raws {
            signals.push(raw?.into_signal()?);
        }
        Ok(signals)
    }
}

const SELECT_COLUMNS: &str = "id, title, category, severity, owner, due_date, status, \
                              notes, source, tags, created_at, updated_at, closed_at";

impl SignalStore for SqliteStore {
    fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS signals (
                    id         INTEGER PRIMARY KEY AUTOINCREMENT,
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

                CREATE INDEX IF NOT EXISTS idx_signals_status ON signals(status);
                CREATE INDEX IF NOT EXISTS idx_signals_owner ON signals(owner);
                CREATE INDEX IF NOT EXISTS idx_signals_due_date ON signals(due_date);",
            )
            .map_err(|e| StoreError::SchemaFailed(e.to_string()))
    }

    fn insert(&mut self, new: &NewSignal, created_at: DateTime<Utc>) -> Result<i64, StoreError> {
        let ts = format_ts(created_at);
        self.conn.execute(
            "INSERT INTO signals
             (title, category, severity, owner, due_date, status, notes, source, tags,
              created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                new.title,
                new.category,
                new.severity.map(|s| s.as_str()),
                new.owner,
                new.due.map(|d| d.to_string()),
                Status::Open.as_str(),
                new.notes,
                new.source,
                format_tags(&new.tags),
                ts,
                ts,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "inserted signal");
        Ok(id)
    }

    fn get(&mut self, id: i64) -> Result<Option<Signal>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SELECT_COLUMNS} FROM signals WHERE id = ?1"))?;
        let raw = stmt
            .query_row(rusqlite::params![id], |row| {
                Ok(RawSignal {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    category: row.get(2)?,
                    severity: row.get(3)?,
                    owner: row.get(4)?,
                    due_date: row.get(5)?,
                    status: row.get(6)?,
                    notes: row.get(7)?,
                    source: row.get(8)?,
                    tags: row.get(9)?,
                    created_at: row.get(10)?,
                    updated_at: row.get(11)?,
                    closed_at: row.get(12)?,
                })
            })
            .optional()?;
        raw.map(RawSignal::into_signal).transpose()
    }

    fn list(&mut self, filter: &SignalFilter) -> Result<Vec<Signal>, StoreError> {
        let (clause, values) = filter_sql(filter, |n| format!("?{n}"));
        let mut sql = format!(
            "SELECT {SELECT_COLUMNS} FROM signals {clause} ORDER BY created_at DESC, id DESC"
        );
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        debug!(%sql, "listing signals");
        self.map_rows(&sql, &values)
    }

    fn update(&mut self, signal: &Signal) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE signals
             SET title = ?1, category = ?2, severity = ?3, owner = ?4, due_date = ?5,
                 status = ?6, notes = ?7, source = ?8, tags = ?9,
                 updated_at = ?10, closed_at = ?11
             WHERE id = ?12",
            rusqlite::params![
                signal.title,
                signal.category,
                signal.severity.map(|s| s.as_str()),
                signal.owner,
                signal.due.map(|d| d.to_string()),
                signal.status.as_str(),
                signal.notes,
                signal.source,
                format_tags(&signal.tags),
                format_ts(signal.updated_at),
                signal.closed_at.map(format_ts),
                signal.id,
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
        format!("sqlite:{}", self.path.display())
    }
}
