//! Report generators over the signal table.
//!
//! Every report is a pure function from a slice of signals plus an as-of
//! date to a typed result, rendered separately via [`crate::render`]. The
//! as-of date defaults to today in the CLI and is overridable for
//! deterministic output.

pub mod activity;
pub mod audit;
pub mod calendar;
pub mod digest;
pub mod metrics;
pub mod stale;
pub mod trend;
pub mod triage;
pub mod workload;

pub use activity::{activity, ActivityReport};
pub use audit::{audit, AuditEntry, AuditReport};
pub use calendar::{calendar, CalendarReport};
pub use digest::{digest, DigestReport};
pub use metrics::{metrics, MetricsReport};
pub use stale::{stale, StaleReport};
pub use trend::{trend, TrendReport, WeekTrend};
pub use triage::{triage, TriageEntry, TriageReport, TriageWeights};
pub use workload::{workload, OwnerLoad, WorkloadReport};

use chrono::{Datelike, NaiveDate};

use crate::signal::Signal;

/// One-line summary used by the digest and calendar bucket listings.
pub(crate) fn signal_line(signal: &Signal) -> String {
    format!(
        "[{}] {} ({}, {}) — {} — due {}",
        signal.id,
        signal.title,
        signal.category_label(),
        signal.severity_or_default(),
        signal.owner_label(),
        signal.due_label(),
    )
}

/// Monday of the ISO week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    date - chrono::Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// First `limit` items when a limit is set, all items otherwise.
pub(crate) fn apply_limit<T>(items: &[T], limit: Option<usize>) -> &[T] {
    match limit {
        Some(n) if n < items.len() => &items[..n],
        _ => items,
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    use crate::signal::{Severity, Signal, Status};

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn ts(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 10, 0, 0).unwrap()
    }

    /// Builder-ish fixture; starts open with medium severity.
    pub fn signal(id: i64, title: &str, created: DateTime<Utc>) -> Signal {
        Signal {
            id,
            title: title.to_string(),
            category: Some("ops".to_string()),
            severity: Some(Severity::Medium),
            owner: Some("Leah".to_string()),
            source: None,
            status: Status::Open,
            due: None,
            tags: Vec::new(),
            notes: None,
            created_at: created,
            updated_at: created,
            closed_at: None,
        }
    }

    pub fn closed(mut signal: Signal, closed_at: DateTime<Utc>) -> Signal {
        signal.status = Status::Closed;
        signal.closed_at = Some(closed_at);
        signal.updated_at = closed_at;
        signal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixtures::*;

    #[test]
    fn week_start_is_monday() {
        // 2026-02-08 is a Sunday, its week starts 2026-02-02.
        assert_eq!(week_start(date(2026, 2, 8)), date(2026, 2, 2));
        assert_eq!(week_start(date(2026, 2, 2)), date(2026, 2, 2));
        assert_eq!(week_start(date(2026, 1, 27)), date(2026, 1, 26));
    }

    #[test]
    fn signal_line_uses_placeholders() {
        let mut s = signal(3, "Overdue outreach", ts(2026, 1, 20));
        s.category = None;
        s.owner = None;
        s.severity = None;
        assert_eq!(
            signal_line(&s),
            "[3] Overdue outreach (Unspecified, medium) — Unassigned — due No due date"
        );
    }

    #[test]
    fn apply_limit_caps_but_never_pads() {
        let items = vec![1, 2, 3];
        assert_eq!(apply_limit(&items, Some(2)), &[1, 2]);
        assert_eq!(apply_limit(&items, Some(9)), &[1, 2, 3]);
        assert_eq!(apply_limit(&items, None), &[1, 2, 3]);
    }
}
