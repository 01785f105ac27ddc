//! Recent activity: what was created, touched and closed in the window.

use chrono::NaiveDate;

use super::{apply_limit, signal_line};
use crate::policy;
use crate::render::{OutputFormat, ReportDoc};
use crate::signal::Signal;

#[derive(Debug, Clone)]
pub struct ActivityReport {
    pub as_of: NaiveDate,
    pub days: u32,
    pub limit: Option<usize>,
    pub created: Vec<Signal>,
    /// Anything whose `updated_at` falls in the window; creations and
    /// closures land here too, hence the combined label in the output.
    pub updated: Vec<Signal>,
    pub closed: Vec<Signal>,
    pub open_overdue: usize,
    pub open_due_soon: usize,
}

fn in_window(date: NaiveDate, as_of: NaiveDate, days: u32) -> bool {
    date <= as_of && (as_of - date).num_days() <= i64::from(days)
}

pub fn activity(signals: &[Signal], as_of: NaiveDate, days: u32, limit: Option<usize>) -> ActivityReport {
    let created: Vec<Signal> = signals
        .iter()
        .filter(|s| in_window(s.created_at.date_naive(), as_of, days))
        .cloned()
        .collect();
    let updated: Vec<Signal> = signals
        .iter()
        .filter(|s| in_window(s.updated_at.date_naive(), as_of, days))
        .cloned()
        .collect();
    let closed: Vec<Signal> = signals
        .iter()
        .filter(|s| {
            s.closed_at
                .map_or(false, |c| in_window(c.date_naive(), as_of, days))
        })
        .cloned()
        .collect();

    let open_overdue = signals.iter().filter(|s| policy::is_overdue(s, as_of)).count();
    let open_due_soon = signals
        .iter()
        .filter(|s| policy::is_due_soon(s, as_of, days))
        .count();

    ActivityReport {
        as_of,
        days,
        limit,
        created,
        updated,
        closed,
        open_overdue,
        open_due_soon,
    }
}

impl ActivityReport {
    fn bucket(&self, doc: &mut ReportDoc, heading: &str, signals: &[Signal]) {
        doc.blank();
        doc.heading(heading);
        if signals.is_empty() {
            doc.bullet("None");
            return;
        }
        for signal in apply_limit(signals, self.limit) {
            doc.bullet(&signal_line(signal));
        }
    }

    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading(&format!("Activity (last {} days)", self.days));
        doc.kv("Signals created", self.created.len());
        doc.kv("Signals updated/closed", self.updated.len());
        doc.kv("Signals closed", self.closed.len());
        doc.kv("Open overdue", self.open_overdue);
        doc.kv(
            &format!("Open due soon (next {} days)", self.days),
            self.open_due_soon,
        );

        self.bucket(&mut doc, "Created", &self.created);
        self.bucket(&mut doc, "Updated", &self.updated);
        self.bucket(&mut doc, "Closed", &self.closed);
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::*;
    use chrono::{Duration, Utc};

    /// Mirrors the canonical four-row fixture: one fresh open signal with a
    /// near due date, one recently closed, one old overdue unowned, one open
    /// update from a few days back.
    fn sample(now: chrono::DateTime<Utc>) -> Vec<Signal> {
        let as_of = now.date_naive();
        let mut partner = signal(1, "Partner delay", now - Duration::days(1));
        partner.due = Some(as_of + Duration::days(2));

        let mut cycle = signal(2, "Cycle closed", now - Duration::days(10));
        cycle = closed(cycle, now - Duration::days(2));

        let mut outreach = signal(3, "Overdue outreach", now - Duration::days(20));
        outreach.owner = None;
        outreach.due = Some(as_of - Duration::days(5));

        let fresh = signal(4, "Fresh update", now - Duration::days(3));

        vec![partner, cycle, outreach, fresh]
    }

    #[test]
    fn snapshot_counts_match_window() {
        let now = ts(2026, 2, 10);
        let report = activity(&sample(now), now.date_naive(), 7, None);
        assert_eq!(report.created.len(), 2);
        assert_eq!(report.updated.len(), 3);
        assert_eq!(report.closed.len(), 1);
        assert_eq!(report.open_overdue, 1);
        assert_eq!(report.open_due_soon, 1);
    }

    #[test]
    fn render_pins_snapshot_labels() {
        let now = ts(2026, 2, 10);
        let report = activity(&sample(now), now.date_naive(), 7, None);
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("Signals created: 2"));
        assert!(out.contains("Signals updated/closed: 3"));
        assert!(out.contains("Signals closed: 1"));
        assert!(out.contains("Open overdue: 1"));
        assert!(out.contains("Open due soon (next 7 days): 1"));
    }

    #[test]
    fn empty_window_renders_none_buckets() {
        let now = ts(2026, 2, 10);
        let old = signal(1, "Old", ts(2025, 6, 1));
        let report = activity(&[old], now.date_naive(), 7, None);
        assert_eq!(report.created.len(), 0);
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("- None"));
    }
}
