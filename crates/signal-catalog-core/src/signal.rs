//! The signal entity and its classifier enums.
//!
//! A signal is a logged record describing a risk, opportunity or note that
//! needs tracking. Signals are created open, mutated in place and closed or
//! reopened over their lifetime; they are never physically deleted.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Lifecycle status of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Closed => "closed",
        }
    }
}

impl FromStr for Status {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Status::Open),
            "closed" => Ok(Status::Closed),
            other => Err(ValidationError::UnknownStatus {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity classifier. Free text in the original data model was narrowed to
/// this fixed ladder; anything else is a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, lowest first.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Medium
    }
}

impl FromStr for Severity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(ValidationError::UnknownSeverity {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted signal record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: i64,
    pub title: String,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub owner: Option<String>,
    pub source: Option<String>,
    pub status: Status,
    pub due: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

impl Signal {
    pub fn severity_or_default(&self) -> Severity {
        self.severity.unwrap_or_default()
    }

    /// Owner for display, `Unassigned` when empty.
    pub fn owner_label(&self) -> &str {
        match self.owner.as_deref() {
            Some(o) if !o.is_empty() => o,
            _ => "Unassigned",
        }
    }

    /// Category for display, `Unspecified` when empty.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => "Unspecified",
        }
    }

    /// Due date for display, `No due date` when empty.
    pub fn due_label(&self) -> String {
        match self.due {
            Some(d) => d.to_string(),
            None => "No due date".to_string(),
        }
    }

    /// Append a paragraph to the notes. Notes are append-only; clearing is a
    /// separate, explicit operation.
    pub fn append_note(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match &mut self.notes {
            Some(notes) if !notes.is_empty() => {
                notes.push('\n');
                notes.push_str(text);
            }
            _ => self.notes = Some(text.to_string()),
        }
    }

    /// Refresh `updated_at` after a field edit.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Transition to closed. Returns false when the signal is already
    /// closed, in which case nothing changes.
    pub fn close(&mut self, now: DateTime<Utc>, note: Option<&str>) -> bool {
        if self.status == Status::Closed {
            return false;
        }
        self.status = Status::Closed;
        self.closed_at = Some(now);
        if let Some(note) = note {
            self.append_note(&format!("[Closed] {note}"));
        }
        self.touch(now);
        true
    }

    /// Transition back to open. Returns false when the signal is already
    /// open, in which case nothing changes.
    pub fn reopen(&mut self, now: DateTime<Utc>, note: Option<&str>) -> bool {
        if self.status == Status::Open {
            return false;
        }
        self.status = Status::Open;
        self.closed_at = None;
        if let Some(note) = note {
            self.append_note(&format!("[Reopened] {note}"));
        }
        self.touch(now);
        true
    }
}

/// Fields for a signal that has not been persisted yet.
#[derive(Debug, Clone, Default)]
pub struct NewSignal {
    pub title: String,
    pub category: Option<String>,
    pub severity: Option<Severity>,
    pub owner: Option<String>,
    pub source: Option<String>,
    pub due: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

impl NewSignal {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        Ok(())
    }
}

/// Split a comma-separated tag string into an ordered, de-duplicated list.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for piece in raw.split(',') {
        let tag = piece.trim();
        if tag.is_empty() {
            continue;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Join tags back into their comma-separated display form.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(",")
}

/// Parse a user-supplied `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: value.to_string(),
    })
}
