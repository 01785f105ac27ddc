//! Due-date calendar: open signals grouped by ISO week.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::{apply_limit, signal_line, week_start};
use crate::policy;
use crate::render::{OutputFormat, ReportDoc};
use crate::signal::{Signal, Status};

#[derive(Debug, Clone)]
pub struct CalendarReport {
    pub as_of: NaiveDate,
    pub horizon_days: u32,
    pub limit: Option<usize>,
    pub overdue: Vec<Signal>,
    /// Week start (Monday) to due signals in that week, ascending.
    pub weeks: BTreeMap<NaiveDate, Vec<Signal>>,
    pub beyond: Vec<Signal>,
    pub no_due: Vec<Signal>,
}

/// Group open signals by the ISO week of their due date. Weeks beyond the
/// lookahead horizon collapse into a single bucket.
pub fn calendar(
    signals: &[Signal],
    as_of: NaiveDate,
    horizon_days: u32,
    limit: Option<usize>,
) -> CalendarReport {
    let horizon = as_of + chrono::Duration::days(i64::from(horizon_days));
    let mut overdue = Vec::new();
    let mut weeks: BTreeMap<NaiveDate, Vec<Signal>> = BTreeMap::new();
    let mut beyond = Vec::new();
    let mut no_due = Vec::new();

    for signal in signals.iter().filter(|s| s.status == Status::Open) {
        match signal.due {
            None => no_due.push(signal.clone()),
            Some(_) if policy::is_overdue(signal, as_of) => overdue.push(signal.clone()),
            Some(due) if due > horizon => beyond.push(signal.clone()),
            Some(due) => weeks.entry(week_start(due)).or_default().push(signal.clone()),
        }
    }

    overdue.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
    beyond.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
    no_due.sort_by_key(|s| s.id);
    for bucket in weeks.values_mut() {
        bucket.sort_by(|a, b| a.due.cmp(&b.due).then(a.id.cmp(&b.id)));
    }

    CalendarReport {
        as_of,
        horizon_days,
        limit,
        overdue,
        weeks,
        beyond,
        no_due,
    }
}

impl CalendarReport {
    fn section(&self, doc: &mut ReportDoc, heading: &str, signals: &[Signal]) {
        doc.heading(heading);
        if signals.is_empty() {
            doc.bullet("None");
        } else {
            for signal in apply_limit(signals, self.limit) {
                doc.bullet(&signal_line(signal));
            }
        }
        doc.blank();
    }

    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.title("Due-date Calendar");
        doc.kv("As of", self.as_of);
        doc.kv("Horizon (days)", self.horizon_days);
        doc.blank();

        self.section(&mut doc, "Overdue", &self.overdue);
        for (week, signals) in &self.weeks {
            self.section(&mut doc, &format!("Week of {week}"), signals);
        }
        self.section(&mut doc, "Beyond horizon", &self.beyond);
        self.section(&mut doc, "No due date", &self.no_due);
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::*;

    fn sample() -> Vec<Signal> {
        let mut overdue = signal(1, "Overdue", ts(2026, 1, 20));
        overdue.due = Some(date(2026, 2, 3));
        let mut this_week = signal(2, "This week", ts(2026, 2, 1));
        this_week.due = Some(date(2026, 2, 12));
        let mut next_week = signal(3, "Next week", ts(2026, 2, 1));
        next_week.due = Some(date(2026, 2, 19));
        let mut far = signal(4, "Far out", ts(2026, 2, 1));
        far.due = Some(date(2026, 6, 1));
        let undated = signal(5, "Undated", ts(2026, 2, 1));
        let mut done = closed(signal(6, "Done", ts(2026, 1, 1)), ts(2026, 2, 1));
        done.due = Some(date(2026, 2, 12));
        vec![overdue, this_week, next_week, far, undated, done]
    }

    #[test]
    fn weeks_are_keyed_by_monday_ascending() {
        let report = calendar(&sample(), date(2026, 2, 10), 28, None);
        let weeks: Vec<NaiveDate> = report.weeks.keys().copied().collect();
        assert_eq!(weeks, vec![date(2026, 2, 9), date(2026, 2, 16)]);
        assert_eq!(report.weeks[&date(2026, 2, 9)][0].id, 2);
    }

    #[test]
    fn overdue_beyond_and_no_due_buckets() {
        let report = calendar(&sample(), date(2026, 2, 10), 28, None);
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.overdue[0].id, 1);
        assert_eq!(report.beyond.len(), 1);
        assert_eq!(report.beyond[0].id, 4);
        assert_eq!(report.no_due.len(), 1);
        assert_eq!(report.no_due[0].id, 5);
    }

    #[test]
    fn closed_signals_are_ignored() {
        let report = calendar(&sample(), date(2026, 2, 10), 28, None);
        let total = report.overdue.len()
            + report.beyond.len()
            + report.no_due.len()
            + report.weeks.values().map(Vec::len).sum::<usize>();
        assert_eq!(total, 5);
    }

    #[test]
    fn render_has_all_sections() {
        let report = calendar(&sample(), date(2026, 2, 10), 28, None);
        let out = report.render(OutputFormat::Markdown);
        assert!(out.contains("## Overdue"));
        assert!(out.contains("## Week of 2026-02-09"));
        assert!(out.contains("## Week of 2026-02-16"));
        assert!(out.contains("## Beyond horizon"));
        assert!(out.contains("## No due date"));
    }
}
