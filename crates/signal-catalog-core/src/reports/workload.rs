//! Per-owner workload table with due-date buckets.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use super::apply_limit;
use crate::policy;
use crate::render::{OutputFormat, ReportDoc, Table};
use crate::signal::{Signal, Status};

/// Due-bucket counts for one owner. Buckets are disjoint, so the per-owner
/// totals always sum back to `open`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerLoad {
    pub owner: String,
    pub open: usize,
    pub overdue: usize,
    pub due_soon: usize,
    pub later: usize,
    pub no_due: usize,
}

#[derive(Debug, Clone)]
pub struct WorkloadReport {
    pub as_of: NaiveDate,
    pub days: u32,
    pub limit: Option<usize>,
    pub rows: Vec<OwnerLoad>,
    pub total_open: usize,
}

/// Group open signals by owner. Owners are sorted by open count descending,
/// then by name; unowned signals land under `Unassigned`.
pub fn workload(signals: &[Signal], as_of: NaiveDate, days: u32, limit: Option<usize>) -> WorkloadReport {
    let mut by_owner: BTreeMap<String, OwnerLoad> = BTreeMap::new();
    let mut total_open = 0;

    for signal in signals.iter().filter(|s| s.status == Status::Open) {
        total_open += 1;
        let owner = signal.owner_label().to_string();
        let load = by_owner.entry(owner.clone()).or_insert_with(|| OwnerLoad {
            owner,
            open: 0,
            overdue: 0,
            due_soon: 0,
            later: 0,
            no_due: 0,
        });
        load.open += 1;
        if signal.due.is_none() {
            load.no_due += 1;
        } else if policy::is_overdue(signal, as_of) {
            load.overdue += 1;
        } else if policy::is_due_soon(signal, as_of, days) {
            load.due_soon += 1;
        } else {
            load.later += 1;
        }
    }

    let mut rows: Vec<OwnerLoad> = by_owner.into_values().collect();
    rows.sort_by(|a, b| b.open.cmp(&a.open).then_with(|| a.owner.cmp(&b.owner)));

    WorkloadReport {
        as_of,
        days,
        limit,
        rows,
        total_open,
    }
}

impl WorkloadReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Workload by owner");
        doc.kv("Open signals", self.total_open);
        doc.kv("Due-soon window (days)", self.days);
        doc.blank();

        let mut table = Table::new(&["Owner", "Open", "Overdue", "Due soon", "Later", "No due"]);
        for row in apply_limit(&self.rows, self.limit) {
            table.push_row(vec![
                row.owner.clone(),
                row.open.to_string(),
                row.overdue.to_string(),
                row.due_soon.to_string(),
                row.later.to_string(),
                row.no_due.to_string(),
            ]);
        }
        doc.table(&table);
        doc.finish()
    }
}
