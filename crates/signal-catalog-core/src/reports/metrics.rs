//! Aggregate counts and cycle-time summary.

use chrono::NaiveDate;

use crate::policy;
use crate::render::{OutputFormat, ReportDoc};
use crate::signal::{Severity, Signal, Status};

#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub as_of: NaiveDate,
    pub due_days: u32,
    pub stale_days: u32,
    pub total: usize,
    pub open: usize,
    pub closed: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub stale: usize,
    /// Open counts per severity, highest first.
    pub severity_open: Vec<(Severity, usize)>,
    pub median_open_age_days: Option<f64>,
    pub avg_close_cycle_days: Option<f64>,
}

fn median(mut values: Vec<i64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid] as f64)
    } else {
        Some((values[mid - 1] + values[mid]) as f64 / 2.0)
    }
}

/// Compute the catalog-wide rollup. An empty input yields all-zero counts,
/// not an error.
pub fn metrics(signals: &[Signal], as_of: NaiveDate, due_days: u32, stale_days: u32) -> MetricsReport {
    let open = signals.iter().filter(|s| s.status == Status::Open).count();
    let overdue = signals.iter().filter(|s| policy::is_overdue(s, as_of)).count();
    let due_soon = signals
        .iter()
        .filter(|s| policy::is_due_soon(s, as_of, due_days))
        .count();
    let stale = signals
        .iter()
        .filter(|s| policy::is_stale(s, as_of, stale_days))
        .count();

    let severity_open: Vec<(Severity, usize)> = Severity::ALL
        .iter()
        .rev()
        .map(|&sev| {
            let count = signals
                .iter()
                .filter(|s| s.status == Status::Open && s.severity_or_default() == sev)
                .count();
            (sev, count)
        })
        .collect();

    let open_ages: Vec<i64> = signals
        .iter()
        .filter(|s| s.status == Status::Open)
        .map(|s| policy::age_days(s, as_of))
        .collect();

    let cycles: Vec<i64> = signals.iter().filter_map(policy::close_cycle_days).collect();
    let avg_close_cycle_days = if cycles.is_empty() {
        None
    } else {
        Some(cycles.iter().sum::<i64>() as f64 / cycles.len() as f64)
    };

    MetricsReport {
        as_of,
        due_days,
        stale_days,
        total: signals.len(),
        open,
        closed: signals.len() - open,
        overdue,
        due_soon,
        stale,
        severity_open,
        median_open_age_days: median(open_ages),
        avg_close_cycle_days,
    }
}

fn optional_days(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "-".to_string(),
    }
}

impl MetricsReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Catalog Metrics");
        doc.kv("Total signals", self.total);
        doc.kv("Open", self.open);
        doc.kv("Closed", self.closed);
        doc.kv("Overdue (open)", self.overdue);
        doc.kv(
            &format!("Due soon (next {} days)", self.due_days),
            self.due_soon,
        );
        doc.kv(&format!("Stale (>= {} days idle)", self.stale_days), self.stale);
        doc.blank();
        doc.heading("Open by severity");
        for (severity, count) in &self.severity_open {
            doc.kv(severity.as_str(), count);
        }
        doc.blank();
        doc.kv("Median open age (days)", optional_days(self.median_open_age_days));
        doc.kv(
            "Avg close cycle (days)",
            optional_days(self.avg_close_cycle_days),
        );
        doc.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::fixtures::*;

    #[test]
    fn empty_catalog_is_all_zero_not_an_error() {
        let report = metrics(&[], date(2026, 2, 10), 14, 14);
        assert_eq!(report.total, 0);
        assert_eq!(report.open, 0);
        assert_eq!(report.closed, 0);
        assert_eq!(report.overdue, 0);
        assert_eq!(report.due_soon, 0);
        assert_eq!(report.stale, 0);
        assert_eq!(report.median_open_age_days, None);
        assert_eq!(report.avg_close_cycle_days, None);
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("Total signals: 0"));
        assert!(out.contains("Median open age (days): -"));
    }

    #[test]
    fn counts_and_severity_rollup() {
        let mut critical = signal(1, "Critical", ts(2026, 1, 20));
        critical.severity = Some(Severity::Critical);
        critical.due = Some(date(2026, 2, 1));
        let mut medium = signal(2, "Medium", ts(2026, 2, 4));
        medium.due = Some(date(2026, 2, 15));
        let done = closed(signal(3, "Done", ts(2026, 2, 1)), ts(2026, 2, 5));

        let report = metrics(&[critical, medium, done], date(2026, 2, 10), 14, 14);
        assert_eq!(report.total, 3);
        assert_eq!(report.open, 2);
        assert_eq!(report.closed, 1);
        assert_eq!(report.overdue, 1);
        assert_eq!(report.due_soon, 1);
        assert_eq!(report.severity_open[0], (Severity::Critical, 1));
        assert_eq!(report.severity_open[2], (Severity::Medium, 1));
        assert_eq!(report.avg_close_cycle_days, Some(4.0));
    }

    #[test]
    fn median_age_over_open_signals_only() {
        let signals = vec![
            signal(1, "a", ts(2026, 2, 1)),  // 9 days old
            signal(2, "b", ts(2026, 2, 5)),  // 5 days old
            signal(3, "c", ts(2026, 2, 9)),  // 1 day old
            closed(signal(4, "d", ts(2026, 1, 1)), ts(2026, 1, 2)),
        ];
        let report = metrics(&signals, date(2026, 2, 10), 14, 14);
        assert_eq!(report.median_open_age_days, Some(5.0));
    }

    #[test]
    fn median_of_even_count_averages_middle_pair() {
        let signals = vec![
            signal(1, "a", ts(2026, 2, 1)),
            signal(2, "b", ts(2026, 2, 9)),
        ];
        let report = metrics(&signals, date(2026, 2, 10), 14, 14);
        assert_eq!(report.median_open_age_days, Some(5.0));
    }
}
