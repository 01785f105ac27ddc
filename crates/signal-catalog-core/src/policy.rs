//! Date-based classification of signals.
//!
//! Everything here is a pure function of a signal and an as-of date, so the
//! reports stay deterministic when `--as-of` is overridden. Signals without
//! a due date never classify as overdue or due-soon; reports that want them
//! put them in an explicit "no due" bucket.

use chrono::NaiveDate;

use crate::signal::{Signal, Status};

/// Open and past its due date.
pub fn is_overdue(signal: &Signal, as_of: NaiveDate) -> bool {
    if signal.status != Status::Open {
        return false;
    }
    match signal.due {
        Some(due) => due < as_of,
        None => false,
    }
}

/// Open and due within `window_days` of the as-of date (inclusive on both
/// ends, so a signal due today is due-soon, not overdue).
pub fn is_due_soon(signal: &Signal, as_of: NaiveDate, window_days: u32) -> bool {
    if signal.status != Status::Open {
        return false;
    }
    match signal.due {
        Some(due) => due >= as_of && (due - as_of).num_days() <= i64::from(window_days),
        None => false,
    }
}

/// Whole days from creation to the as-of date. Negative when the as-of
/// override predates the record.
pub fn age_days(signal: &Signal, as_of: NaiveDate) -> i64 {
    (as_of - signal.created_at.date_naive()).num_days()
}

/// Whole days from creation to close, for close-cycle reports.
pub fn close_cycle_days(signal: &Signal) -> Option<i64> {
    signal
        .closed_at
        .map(|closed| (closed.date_naive() - signal.created_at.date_naive()).num_days())
}

/// Open and untouched for at least `stale_days`.
pub fn is_stale(signal: &Signal, as_of: NaiveDate, stale_days: u32) -> bool {
    if signal.status != Status::Open {
        return false;
    }
    (as_of - signal.updated_at.date_naive()).num_days() >= i64::from(stale_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn signal(status: Status, due: Option<NaiveDate>) -> Signal {
        let created = Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0).unwrap();
        Signal {
            id: 1,
            title: "Test".to_string(),
            category: None,
            severity: None,
            owner: None,
            source: None,
            status,
            due,
            tags: Vec::new(),
            notes: None,
            created_at: created,
            updated_at: created,
            closed_at: match status {
                Status::Closed => Some(created),
                Status::Open => None,
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn overdue_open_signal_past_due() {
        let s = signal(Status::Open, Some(date(2026, 2, 1)));
        let as_of = date(2026, 2, 10);
        assert!(is_overdue(&s, as_of));
        assert_eq!(age_days(&s, as_of), 26);
    }

    #[test]
    fn no_due_date_is_never_overdue_or_due_soon() {
        let s = signal(Status::Open, None);
        assert!(!is_overdue(&s, date(2026, 2, 10)));
        assert!(!is_due_soon(&s, date(2026, 2, 10), 7));
    }

    #[test]
    fn closed_signals_are_excluded() {
        let s = signal(Status::Closed, Some(date(2026, 1, 1)));
        assert!(!is_overdue(&s, date(2026, 2, 10)));
        assert!(!is_due_soon(&s, date(2026, 2, 10), 30));
        assert!(!is_stale(&s, date(2026, 6, 1), 14));
    }

    #[test]
    fn due_today_is_due_soon_not_overdue() {
        let s = signal(Status::Open, Some(date(2026, 2, 10)));
        assert!(!is_overdue(&s, date(2026, 2, 10)));
        assert!(is_due_soon(&s, date(2026, 2, 10), 0));
    }

    #[test]
    fn due_soon_window_is_inclusive() {
        let s = signal(Status::Open, Some(date(2026, 2, 17)));
        assert!(is_due_soon(&s, date(2026, 2, 10), 7));
        assert!(!is_due_soon(&s, date(2026, 2, 10), 6));
    }

    #[test]
    fn stale_counts_days_since_last_update() {
        let mut s = signal(Status::Open, None);
        s.updated_at = Utc.with_ymd_and_hms(2026, 1, 20, 18, 0, 0).unwrap();
        assert!(is_stale(&s, date(2026, 2, 3), 14));
        assert!(!is_stale(&s, date(2026, 2, 2), 14));
    }

    #[test]
    fn close_cycle_days_uses_closed_at() {
        let mut s = signal(Status::Open, None);
        s.close(Utc.with_ymd_and_hms(2026, 1, 18, 12, 0, 0).unwrap(), None);
        assert_eq!(close_cycle_days(&s), Some(3));
        let open = signal(Status::Open, None);
        assert_eq!(close_cycle_days(&open), None);
    }

    proptest! {
        // Overdue and due-soon partition the dated-and-open space: a signal
        // can never be both at once, whatever the window.
        #[test]
        fn overdue_and_due_soon_are_exclusive(
            due_offset in -400i64..400,
            window in 0u32..120,
        ) {
            let as_of = date(2026, 2, 10);
            let due = as_of + chrono::Duration::days(due_offset);
            let s = signal(Status::Open, Some(due));
            prop_assert!(!(is_overdue(&s, as_of) && is_due_soon(&s, as_of, window)));
        }

        #[test]
        fn closed_signals_never_classify(
            due_offset in -400i64..400,
            window in 0u32..120,
            stale_days in 0u32..120,
        ) {
            let as_of = date(2026, 2, 10);
            let due = as_of + chrono::Duration::days(due_offset);
            let s = signal(Status::Closed, Some(due));
            prop_assert!(!is_overdue(&s, as_of));
            prop_assert!(!is_due_soon(&s, as_of, window));
            prop_assert!(!is_stale(&s, as_of, stale_days));
        }
    }
}
