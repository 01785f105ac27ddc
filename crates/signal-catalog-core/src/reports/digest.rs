//! Markdown-friendly digest: overdue, due-soon and recently-created buckets.

use chrono::NaiveDate;

use super::{apply_limit, signal_line};
use crate::policy;
use crate::render::{OutputFormat, ReportDoc};
use crate::signal::{Signal, Status};

/// Digest buckets plus headline counts.
#[derive(Debug, Clone)]
pub struct DigestReport {
    pub as_of: NaiveDate,
    pub days: u32,
    pub limit: Option<usize>,
    pub total: usize,
    pub open_count: usize,
    pub closed_count: usize,
    pub overdue: Vec<Signal>,
    pub due_soon: Vec<Signal>,
    pub recent: Vec<Signal>,
}

/// Bucket signals for the digest. Input order (newest first) is preserved
/// inside each bucket.
pub fn digest(signals: &[Signal], as_of: NaiveDate, days: u32, limit: Option<usize>) -> DigestReport {
    let open_count = signals.iter().filter(|s| s.status == Status::Open).count();
    let closed_count = signals.len() - open_count;

    let overdue: Vec<Signal> = signals
        .iter()
        .filter(|s| policy::is_overdue(s, as_of))
        .cloned()
        .collect();
    let due_soon: Vec<Signal> = signals
        .iter()
        .filter(|s| policy::is_due_soon(s, as_of, days))
        .cloned()
        .collect();
    let recent: Vec<Signal> = signals
        .iter()
        .filter(|s| {
            let created = s.created_at.date_naive();
            created <= as_of && (as_of - created).num_days() <= i64::from(days)
        })
        .cloned()
        .collect();

    DigestReport {
        as_of,
        days,
        limit,
        total: signals.len(),
        open_count,
        closed_count,
        overdue,
        due_soon,
        recent,
    }
}

impl DigestReport {
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
        doc.title("Signal Digest");
        doc.blank();
        doc.heading("Snapshot");
        doc.bullet(&format!("Total signals: {}", self.total));
        doc.bullet(&format!("Open: {}", self.open_count));
        doc.bullet(&format!("Closed: {}", self.closed_count));
        doc.bullet(&format!("Overdue (open): {}", self.overdue.len()));
        doc.bullet(&format!(
            "Due soon (next {} days): {}",
            self.days,
            self.due_soon.len()
        ));

        self.bucket(&mut doc, "Overdue Signals", &self.overdue);
        self.bucket(&mut doc, "Due Soon", &self.due_soon);
        self.bucket(
            &mut doc,
            &format!("Recent Signals (last {} days)", self.days),
            &self.recent,
        );
        doc.finish()
    }
}
