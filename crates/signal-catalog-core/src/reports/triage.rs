//! Urgency ranking of open signals.
//!
//! Scoring is a weighted sum of severity, overdue days, due-soon proximity,
//! age and ownership gaps. The weights are plain configuration, not
//! architecture; ordering is deterministic with ties broken by ascending id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::apply_limit;
use crate::policy;
use crate::render::{OutputFormat, ReportDoc, Table};
use crate::signal::{Severity, Signal, Status};

/// Age (days) at which the `aging` reason tag is attached.
const AGING_REASON_DAYS: i64 = 14;

/// Scoring weights, loaded from the `[triage]` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriageWeights {
    /// Base score per severity level.
    #[serde(default = "default_severity_low")]
    pub severity_low: f64,
    #[serde(default = "default_severity_medium")]
    pub severity_medium: f64,
    #[serde(default = "default_severity_high")]
    pub severity_high: f64,
    #[serde(default = "default_severity_critical")]
    pub severity_critical: f64,
    /// Added per day past due.
    #[serde(default = "default_overdue_day_weight")]
    pub overdue_day_weight: f64,
    /// Flat bonus when due inside the triage window.
    #[serde(default = "default_due_soon_bonus")]
    pub due_soon_bonus: f64,
    /// Flat addend for signals with no due date at all.
    #[serde(default = "default_no_due_penalty")]
    pub no_due_penalty: f64,
    /// Added per day since creation.
    #[serde(default = "default_age_weight")]
    pub age_weight: f64,
    /// Flat addend when nobody owns the signal.
    #[serde(default = "default_unassigned_penalty")]
    pub unassigned_penalty: f64,
}

fn default_severity_low() -> f64 {
    10.0
}
fn default_severity_medium() -> f64 {
    20.0
}
fn default_severity_high() -> f64 {
    30.0
}
fn default_severity_critical() -> f64 {
    40.0
}
fn default_overdue_day_weight() -> f64 {
    1.5
}
fn default_due_soon_bonus() -> f64 {
    8.0
}
fn default_no_due_penalty() -> f64 {
    2.0
}
fn default_age_weight() -> f64 {
    0.25
}
fn default_unassigned_penalty() -> f64 {
    3.0
}

impl Default for TriageWeights {
    fn default() -> Self {
        Self {
            severity_low: default_severity_low(),
            severity_medium: default_severity_medium(),
            severity_high: default_severity_high(),
            severity_critical: default_severity_critical(),
            overdue_day_weight: default_overdue_day_weight(),
            due_soon_bonus: default_due_soon_bonus(),
            no_due_penalty: default_no_due_penalty(),
            age_weight: default_age_weight(),
            unassigned_penalty: default_unassigned_penalty(),
        }
    }
}

impl TriageWeights {
    pub fn severity_base(&self, severity: Severity) -> f64 {
        match severity {
            Severity::Low => self.severity_low,
            Severity::Medium => self.severity_medium,
            Severity::High => self.severity_high,
            Severity::Critical => self.severity_critical,
        }
    }

    /// All weights must be non-negative.
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            ("severity_low", self.severity_low),
            ("severity_medium", self.severity_medium),
            ("severity_high", self.severity_high),
            ("severity_critical", self.severity_critical),
            ("overdue_day_weight", self.overdue_day_weight),
            ("due_soon_bonus", self.due_soon_bonus),
            ("no_due_penalty", self.no_due_penalty),
            ("age_weight", self.age_weight),
            ("unassigned_penalty", self.unassigned_penalty),
        ];
        for (name, weight) in weights {
            if weight < 0.0 || !weight.is_finite() {
                return Err(format!("weight '{name}' must be non-negative, got {weight}"));
            }
        }
        Ok(())
    }
}

/// One ranked signal with its score breakdown.
#[derive(Debug, Clone)]
pub struct TriageEntry {
    pub signal: Signal,
    pub age_days: i64,
    pub score: f64,
    pub reasons: Vec<&'static str>,
}

impl TriageEntry {
    pub fn reason(&self) -> String {
        if self.reasons.is_empty() {
            "recent".to_string()
        } else {
            self.reasons.join(", ")
        }
    }
}

/// Ranked open signals plus snapshot counts.
#[derive(Debug, Clone)]
pub struct TriageReport {
    pub as_of: NaiveDate,
    pub days: u32,
    pub limit: Option<usize>,
    pub entries: Vec<TriageEntry>,
}

impl TriageReport {
    fn count_with(&self, reason: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.reasons.iter().any(|r| *r == reason))
            .count()
    }
}

fn score_signal(
    signal: &Signal,
    as_of: NaiveDate,
    days: u32,
    weights: &TriageWeights,
) -> TriageEntry {
    let age_days = policy::age_days(signal, as_of);
    let mut score = weights.severity_base(signal.severity_or_default());
    let mut reasons = Vec::new();

    match signal.due {
        Some(due) => {
            let overdue_days = (as_of - due).num_days();
            if overdue_days > 0 {
                score += weights.overdue_day_weight * overdue_days as f64;
                reasons.push("overdue");
            } else if policy::is_due_soon(signal, as_of, days) {
                score += weights.due_soon_bonus;
                reasons.push("due soon");
            }
        }
        None => {
            score += weights.no_due_penalty;
            reasons.push("no due date");
        }
    }

    score += weights.age_weight * age_days.max(0) as f64;
    if age_days >= AGING_REASON_DAYS {
        reasons.push("aging");
    }

    if signal.owner.as_deref().map_or(true, str::is_empty) {
        score += weights.unassigned_penalty;
        reasons.push("unassigned");
    }

    TriageEntry {
        signal: signal.clone(),
        age_days,
        score,
        reasons,
    }
}

/// Rank open signals by urgency, highest score first, ties by ascending id.
pub fn triage(
    signals: &[Signal],
    as_of: NaiveDate,
    days: u32,
    limit: Option<usize>,
    weights: &TriageWeights,
) -> TriageReport {
    let mut entries: Vec<TriageEntry> = signals
        .iter()
        .filter(|s| s.status == Status::Open)
        .map(|s| score_signal(s, as_of, days, weights))
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.signal.id.cmp(&b.signal.id))
    });

    TriageReport {
        as_of,
        days,
        limit,
        entries,
    }
}

impl TriageReport {
    pub fn render(&self, format: OutputFormat) -> String {
        let mut doc = ReportDoc::new(format);
        doc.heading("Triage Snapshot");
        doc.kv("Open signals", self.entries.len());
        doc.kv("Overdue", self.count_with("overdue"));
        doc.kv(
            &format!("Due soon (next {} days)", self.days),
            self.count_with("due soon"),
        );
        doc.kv("Unassigned", self.count_with("unassigned"));
        doc.kv("No due date", self.count_with("no due date"));
        doc.blank();

        let mut table = Table::new(&[
            "ID", "Title", "Severity", "Owner", "Due", "Age(d)", "Score", "Reason",
        ]);
        for entry in apply_limit(&self.entries, self.limit) {
            table.push_row(vec![
                entry.signal.id.to_string(),
                entry.signal.title.clone(),
                entry.signal.severity_or_default().to_string(),
                entry.signal.owner_label().to_string(),
                entry.signal.due_label(),
                entry.age_days.to_string(),
                format!("{:.1}", entry.score),
                entry.reason(),
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

    fn weights() -> TriageWeights {
        TriageWeights::default()
    }

    #[test]
    fn overdue_critical_outranks_fresh_low() {
        let mut hot = signal(1, "Retention dip", ts(2026, 1, 20));
        hot.severity = Some(Severity::Critical);
        hot.due = Some(date(2026, 2, 1));
        let mut cold = signal(2, "Mentor NPS note", ts(2026, 2, 9));
        cold.severity = Some(Severity::Low);

        let report = triage(&[cold, hot], date(2026, 2, 10), 14, None, &weights());
        assert_eq!(report.entries[0].signal.id, 1);
        assert!(report.entries[0].reasons.contains(&"overdue"));
        assert!(report.entries[0].score > report.entries[1].score);
    }

    #[test]
    fn closed_signals_are_not_ranked() {
        let done = closed(signal(1, "Done", ts(2026, 2, 1)), ts(2026, 2, 5));
        let report = triage(&[done], date(2026, 2, 10), 14, None, &weights());
        assert!(report.entries.is_empty());
    }

    #[test]
    fn unassigned_and_no_due_collect_penalties_and_reasons() {
        let mut s = signal(1, "Orphan", ts(2026, 2, 8));
        s.owner = None;
        s.severity = Some(Severity::Medium);
        let report = triage(&[s], date(2026, 2, 10), 14, None, &weights());
        let entry = &report.entries[0];
        assert!(entry.reasons.contains(&"no due date"));
        assert!(entry.reasons.contains(&"unassigned"));
        let w = weights();
        let expected = w.severity_medium + w.no_due_penalty + w.unassigned_penalty
            + w.age_weight * 2.0;
        assert!((entry.score - expected).abs() < 1e-9);
    }

    #[test]
    fn ties_break_by_ascending_id() {
        let a = signal(7, "Same", ts(2026, 2, 9));
        let b = signal(3, "Same", ts(2026, 2, 9));
        let report = triage(&[a, b], date(2026, 2, 10), 14, None, &weights());
        assert_eq!(report.entries[0].signal.id, 3);
        assert_eq!(report.entries[1].signal.id, 7);
    }

    #[test]
    fn ranking_is_deterministic_across_runs() {
        let mut signals = Vec::new();
        for id in 1..=10 {
            let mut s = signal(id, &format!("Signal {id}"), ts(2026, 1, (id as u32) + 5));
            if id % 2 == 0 {
                s.due = Some(date(2026, 2, (id as u32) % 9 + 1));
            }
            if id % 3 == 0 {
                s.owner = None;
            }
            signals.push(s);
        }
        let first = triage(&signals, date(2026, 2, 10), 14, None, &weights());
        let second = triage(&signals, date(2026, 2, 10), 14, None, &weights());
        let first_ids: Vec<i64> = first.entries.iter().map(|e| e.signal.id).collect();
        let second_ids: Vec<i64> = second.entries.iter().map(|e| e.signal.id).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn aging_reason_appears_after_two_weeks() {
        let s = signal(1, "Old", ts(2026, 1, 10));
        let report = triage(&[s], date(2026, 2, 10), 14, None, &weights());
        assert!(report.entries[0].reasons.contains(&"aging"));
        assert_eq!(report.entries[0].age_days, 31);
    }

    #[test]
    fn negative_weights_fail_validation() {
        let mut w = TriageWeights::default();
        w.age_weight = -1.0;
        assert!(w.validate().is_err());
        assert!(TriageWeights::default().validate().is_ok());
    }

    #[test]
    fn snapshot_counts_and_table_render() {
        let mut s = signal(1, "Overdue outreach", ts(2026, 1, 5));
        s.due = Some(date(2026, 2, 5));
        s.owner = None;
        let report = triage(&[s], date(2026, 2, 10), 14, None, &weights());
        let out = report.render(OutputFormat::Table);
        assert!(out.contains("Open signals: 1"));
        assert!(out.contains("Overdue: 1"));
        assert!(out.contains("Unassigned: 1"));
        assert!(out.contains("overdue, aging, unassigned"));
    }
}
