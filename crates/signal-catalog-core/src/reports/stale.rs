//! Open signals that nobody has touched lately.

use chrono::NaiveDate;

use super::apply_limit;
use crate::policy;
use crate::render::{OutputFormat, ReportDoc, Table};
use crate::signal::Signal;

#[derive(Debug, Clone)]
pub struct StaleReport {
    pub as_of: NaiveDate,
    pub stale_days: u32,
    pub limit: Option<usize>,
    /// Stale open signals, least recently updated first.
    pub entries: Vec<Signal>,
}

pub fn stale(signals: &[Signal], as_of: NaiveDate, stale_days: u32, limit: Option<usize>) -> StaleReport {
    let mut entries: Vec<Signal> = signals
        .iter()
        .filter(|s| policy::is_stale(s, as_of, stale_days))
        .cloned()
        .collect();
    entries.sort_by(|a, b| a.updated_at.cmp(&b.updated_at).then(a.id.cmp(&b.id)));

    StaleReport {
        as_of,
        stale_days,
        limit,
        entries,
    }
}

impl StaleReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Stale Signals");
        doc.kv("Idle threshold (days)", self.stale_days);
        doc.kv("Stale open signals", self.entries.len());
        doc.blank();

        if self.entries.is_empty() {
            doc.line("Nothing is stale.");
            return doc.finish();
        }

        let mut table = Table::new(&["ID", "Title", "Owner", "Last update", "Idle(d)"]);
        for signal in apply_limit(&self.entries, self.limit) {
            let idle = (self.as_of - signal.updated_at.date_naive()).num_days();
            table.push_row(vec![
                signal.id.to_string(),
                signal.title.clone(),
                signal.owner_label().to_string(),
                signal.updated_at.date_naive().to_string(),
                idle.to_string(),
            ]);
        }
        doc.table(&table);
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::*;

    #[test]
    fn sorted_by_last_update_oldest_first() {
        let ancient = signal(1, "Ancient", ts(2025, 12, 1));
        let older = signal(2, "Older", ts(2026, 1, 5));
        let fresh = signal(3, "Fresh", ts(2026, 2, 9));
        let report = stale(&[older, fresh, ancient], date(2026, 2, 10), 14, None);
        let ids: Vec<i64> = report.entries.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn closed_and_recently_updated_are_excluded() {
        let mut touched = signal(1, "Touched", ts(2025, 12, 1));
        touched.updated_at = ts(2026, 2, 8);
        let done = closed(signal(2, "Done", ts(2025, 12, 1)), ts(2025, 12, 15));
        let report = stale(&[touched, done], date(2026, 2, 10), 14, None);
        assert!(report.entries.is_empty());
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("Nothing is stale."));
    }

    #[test]
    fn idle_days_rendered_from_updated_at() {
        let s = signal(1, "Idle", ts(2026, 1, 20));
        let report = stale(&[s], date(2026, 2, 10), 14, None);
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("2026-01-20"));
        assert!(out.contains("21"));
    }
}
