//! Hygiene audit: per-signal completeness and freshness flags.

use chrono::NaiveDate;

use super::apply_limit;
use crate::policy;
use crate::render::{OutputFormat, ReportDoc, Table};
use crate::signal::{Signal, Status};

/// One flagged signal with everything wrong with it.
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub signal: Signal,
    pub flags: Vec<&'static str>,
}

#[derive(Debug, Clone)]
pub struct AuditReport {
    pub as_of: NaiveDate,
    pub stale_days: u32,
    pub limit: Option<usize>,
    pub checked: usize,
    pub entries: Vec<AuditEntry>,
}

fn flags_for(signal: &Signal, as_of: NaiveDate, stale_days: u32) -> Vec<&'static str> {
    let mut flags = Vec::new();
    if signal.owner.as_deref().map_or(true, str::is_empty) {
        flags.push("missing owner");
    }
    if signal.due.is_none() {
        flags.push("missing due date");
    }
    if signal.category.as_deref().map_or(true, str::is_empty) {
        flags.push("missing category");
    }
    if signal.severity.is_none() {
        flags.push("missing severity");
    }
    if signal.tags.is_empty() {
        flags.push("missing tags");
    }
    if signal.source.as_deref().map_or(true, str::is_empty) {
        flags.push("missing source");
    }
    if policy::is_overdue(signal, as_of) {
        flags.push("overdue");
    }
    if policy::is_stale(signal, as_of, stale_days) {
        flags.push("stale");
    }
    flags
}

/// Flag open signals with hygiene problems, worst first. Clean signals are
/// left out entirely.
pub fn audit(
    signals: &[Signal],
    as_of: NaiveDate,
    stale_days: u32,
    limit: Option<usize>,
) -> AuditReport {
    let open: Vec<&Signal> = signals.iter().filter(|s| s.status == Status::Open).collect();
    let checked = open.len();

    let mut entries: Vec<AuditEntry> = open
        .into_iter()
        .map(|s| AuditEntry {
            signal: s.clone(),
            flags: flags_for(s, as_of, stale_days),
        })
        .filter(|e| !e.flags.is_empty())
        .collect();

    entries.sort_by(|a, b| {
        b.flags
            .len()
            .cmp(&a.flags.len())
            .then(a.signal.id.cmp(&b.signal.id))
    });

    AuditReport {
        as_of,
        stale_days,
        limit,
        checked,
        entries,
    }
}

impl AuditReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Signal Audit");
        doc.kv("Open signals checked", self.checked);
        doc.kv("Flagged", self.entries.len());
        doc.blank();

        if self.entries.is_empty() {
            doc.line("No hygiene problems found.");
            return doc.finish();
        }

        let mut table = Table::new(&["ID", "Title", "Owner", "Flags"]);
        for entry in apply_limit(&self.entries, self.limit) {
            table.push_row(vec![
                entry.signal.id.to_string(),
                entry.signal.title.clone(),
                entry.signal.owner_label().to_string(),
                entry.flags.join(", "),
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
    use crate::signal::parse_tags;

    #[test]
    fn fully_specified_fresh_signal_has_no_flags() {
        let mut s = signal(1, "Clean", ts(2026, 2, 8));
        s.due = Some(date(2026, 2, 20));
        s.source = Some("ops dashboard".to_string());
        s.tags = parse_tags("fafsa,backlog");
        let report = audit(&[s], date(2026, 2, 10), 14, None);
        assert_eq!(report.checked, 1);
        assert!(report.entries.is_empty());
    }

    #[test]
    fn missing_fields_each_get_a_flag() {
        let mut s = signal(1, "Bare", ts(2026, 2, 8));
        s.owner = None;
        s.category = None;
        s.severity = None;
        let report = audit(&[s], date(2026, 2, 10), 14, None);
        let flags = &report.entries[0].flags;
        assert!(flags.contains(&"missing owner"));
        assert!(flags.contains(&"missing due date"));
        assert!(flags.contains(&"missing category"));
        assert!(flags.contains(&"missing severity"));
        assert!(flags.contains(&"missing tags"));
        assert!(flags.contains(&"missing source"));
    }

    #[test]
    fn stale_and_overdue_are_flagged() {
        let mut s = signal(1, "Neglected", ts(2026, 1, 1));
        s.due = Some(date(2026, 1, 15));
        s.source = Some("retention report".to_string());
        s.tags = parse_tags("retention");
        let report = audit(&[s], date(2026, 2, 10), 14, None);
        let flags = &report.entries[0].flags;
        assert!(flags.contains(&"overdue"));
        assert!(flags.contains(&"stale"));
    }

    #[test]
    fn worst_signals_sort_first() {
        let mut bad = signal(9, "Bad", ts(2026, 2, 8));
        bad.owner = None;
        bad.category = None;
        let mut mild = signal(2, "Mild", ts(2026, 2, 8));
        mild.due = Some(date(2026, 2, 20));
        mild.source = Some("x".to_string());
        let report = audit(&[mild, bad], date(2026, 2, 10), 14, None);
        assert_eq!(report.entries[0].signal.id, 9);
    }

    #[test]
    fn closed_signals_are_not_audited() {
        let done = closed(signal(1, "Done", ts(2026, 1, 1)), ts(2026, 2, 1));
        let report = audit(&[done], date(2026, 2, 10), 14, None);
        assert_eq!(report.checked, 0);
        assert!(report.entries.is_empty());
    }
}
