//! Weekly created/closed trend with close-cycle averages.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::week_start;
use crate::policy;
use crate::render::{OutputFormat, ReportDoc, Table};
use crate::signal::Signal;

/// One ISO week of catalog movement.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekTrend {
    /// Monday of the week.
    pub week_start: NaiveDate,
    pub created: usize,
    pub closed: usize,
    /// Created minus closed.
    pub net: i64,
    /// Mean close-cycle days over signals closed this week.
    pub avg_cycle_days: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TrendReport {
    pub as_of: NaiveDate,
    pub weeks: Vec<WeekTrend>,
}

/// Weekly counts for the last `weeks` ISO weeks ending with the week that
/// contains the as-of date, oldest first.
pub fn trend(signals: &[Signal], as_of: NaiveDate, weeks: u32) -> TrendReport {
    let weeks = weeks.max(1);
    let current = week_start(as_of);
    let starts: Vec<NaiveDate> = (0..weeks)
        .rev()
        .map(|i| current - chrono::Duration::weeks(i64::from(i)))
        .collect();

    let mut created: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut closed: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut cycles: BTreeMap<NaiveDate, Vec<i64>> = BTreeMap::new();

    for signal in signals {
        let created_week = week_start(signal.created_at.date_naive());
        *created.entry(created_week).or_default() += 1;
        if let Some(closed_at) = signal.closed_at {
            let closed_week = week_start(closed_at.date_naive());
            *closed.entry(closed_week).or_default() += 1;
            if let Some(cycle) = policy::close_cycle_days(signal) {
                cycles.entry(closed_week).or_default().push(cycle);
            }
        }
    }

    let rows = starts
        .into_iter()
        .map(|start| {
            let created = created.get(&start).copied().unwrap_or(0);
            let closed = closed.get(&start).copied().unwrap_or(0);
            let avg_cycle_days = cycles.get(&start).map(|values| {
                values.iter().sum::<i64>() as f64 / values.len() as f64
            });
            WeekTrend {
                week_start: start,
                created,
                closed,
                net: created as i64 - closed as i64,
                avg_cycle_days,
            }
        })
        .collect();

    TrendReport { as_of, weeks: rows }
}

impl TrendReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Weekly Trend");
        doc.kv("As of", self.as_of);
        doc.blank();

        let mut table = Table::new(&["Week", "Created", "Closed", "Net", "Avg cycle(d)"]);
        for week in &self.weeks {
            table.push_row(vec![
                week.week_start.to_string(),
                week.created.to_string(),
                week.closed.to_string(),
                week.net.to_string(),
                week.avg_cycle_days
                    .map(|v| format!("{v:.1}"))
                    .unwrap_or_else(|| "-".to_string()),
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

    fn sample() -> Vec<Signal> {
        // Created in the current week, closed three days later.
        let fast = closed(signal(1, "Fast", ts(2026, 2, 2)), ts(2026, 2, 5));
        // Created and closed in the previous week.
        let prev = closed(signal(2, "Prev", ts(2026, 1, 27)), ts(2026, 1, 30));
        // Still open from two weeks before that.
        let open = signal(3, "Open", ts(2026, 1, 20));
        vec![fast, prev, open]
    }

    #[test]
    fn weeks_are_labeled_by_monday_oldest_first() {
        let report = trend(&sample(), date(2026, 2, 8), 3);
        let starts: Vec<NaiveDate> = report.weeks.iter().map(|w| w.week_start).collect();
        assert_eq!(
            starts,
            vec![date(2026, 1, 19), date(2026, 1, 26), date(2026, 2, 2)]
        );
    }

    #[test]
    fn created_closed_and_net_per_week() {
        let report = trend(&sample(), date(2026, 2, 8), 3);
        let old = &report.weeks[0];
        assert_eq!((old.created, old.closed, old.net), (1, 0, 1));
        let prev = &report.weeks[1];
        assert_eq!((prev.created, prev.closed, prev.net), (1, 1, 0));
        let current = &report.weeks[2];
        assert_eq!((current.created, current.closed, current.net), (1, 1, 0));
    }

    #[test]
    fn avg_cycle_days_over_closures_in_week() {
        let report = trend(&sample(), date(2026, 2, 8), 3);
        assert_eq!(report.weeks[2].avg_cycle_days, Some(3.0));
        assert_eq!(report.weeks[0].avg_cycle_days, None);
    }

    #[test]
    fn render_rows_split_on_pipes() {
        let report = trend(&sample(), date(2026, 2, 8), 3);
        let out = report.render(OutputFormat::Table);
        let row = out
            .lines()
            .find(|l| l.trim_start().starts_with("2026-02-02"))
            .unwrap();
        let cells: Vec<String> = row.split('|').map(|p| p.trim().to_string()).collect();
        assert_eq!(cells[1], "1");
        assert_eq!(cells[2], "1");
        assert_eq!(cells[3], "0");
        assert_eq!(cells[4], "3.0");
    }

    #[test]
    fn quiet_weeks_are_zero_rows() {
        let report = trend(&[], date(2026, 2, 8), 2);
        assert_eq!(report.weeks.len(), 2);
        assert!(report.weeks.iter().all(|w| w.created == 0 && w.closed == 0));
    }
}
