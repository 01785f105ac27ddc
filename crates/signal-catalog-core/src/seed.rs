//! Deterministic sample data for demos and local testing.
//!
//! The base set is a curated catalog snapshot; extra rows come from a
//! fixed-seed PCG generator so repeated `seed --count N` runs produce
//! identical data.

use chrono::{DateTime, Duration, Utc};
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;

use crate::signal::{parse_tags, NewSignal, Severity};

/// Fixed PRNG seed; sample data must be reproducible run to run.
const SEED: u128 = 0x5ea1_ca7a_1065_eed5;

/// One seedable record: the signal, when it was created relative to now,
/// and optionally when it was closed.
#[derive(Debug, Clone)]
pub struct SeedSignal {
    pub new: NewSignal,
    pub created_at: DateTime<Utc>,
    /// Days after creation at which the signal gets closed.
    pub closed_after_days: Option<i64>,
}

fn entry(
    now: DateTime<Utc>,
    title: &str,
    category: &str,
    severity: Severity,
    owner: Option<&str>,
    due_in_days: Option<i64>,
    notes: &str,
    source: &str,
    tags: &str,
    created_days_ago: i64,
    closed_after_days: Option<i64>,
) -> SeedSignal {
    let created_at = now - Duration::days(created_days_ago);
    SeedSignal {
        new: NewSignal {
            title: title.to_string(),
            category: Some(category.to_string()),
            severity: Some(severity),
            owner: owner.map(str::to_string),
            source: Some(source.to_string()),
            due: due_in_days.map(|d| now.date_naive() + Duration::days(d)),
            tags: parse_tags(tags),
            notes: Some(notes.to_string()),
        },
        created_at,
        closed_after_days,
    }
}

/// The curated base catalog: a plausible week of program signals.
pub fn base_catalog(now: DateTime<Utc>) -> Vec<SeedSignal> {
    vec![
        entry(
            now,
            "FAFSA verification backlog spike",
            "operations",
            Severity::High,
            Some("Ariana"),
            Some(14),
            "Verification queue doubled week-over-week; need staffing check.",
            "ops dashboard",
            "fafsa,backlog",
            6,
            None,
        ),
        entry(
            now,
            "Partner onboarding doc refresh needed",
            "partner",
            Severity::Medium,
            Some("Leah"),
            Some(21),
            "New compliance section missing from latest deck.",
            "partner call",
            "onboarding,docs",
            5,
            None,
        ),
        entry(
            now,
            "Scholar retention dip in cohort 7",
            "scholars",
            Severity::Critical,
            Some("Mateo"),
            Some(4),
            "Drop-off at week 5; schedule listening sessions.",
            "retention report",
            "retention,cohort-7",
            12,
            None,
        ),
        entry(
            now,
            "Grant reporting deadline approaching",
            "funding",
            Severity::High,
            Some("Priya"),
            Some(-3),
            "Need outcome stats + beneficiary stories.",
            "funding calendar",
            "grant,reporting",
            18,
            None,
        ),
        entry(
            now,
            "Mentor match satisfaction trend positive",
            "program",
            Severity::Low,
            Some("Jules"),
            None,
            "NPS up 12 points after new matching rubric.",
            "survey insights",
            "mentors,nps",
            9,
            None,
        ),
        entry(
            now,
            "Data sharing agreement needs legal review",
            "compliance",
            Severity::High,
            Some("Rita"),
            Some(30),
            "Draft from partner includes new data fields.",
            "legal inbox",
            "compliance,legal",
            3,
            None,
        ),
        entry(
            now,
            "Alumni spotlight series filming",
            "marketing",
            Severity::Medium,
            Some("Noah"),
            Some(10),
            "Finalize interview schedule with 3 alumni.",
            "content calendar",
            "alumni,storytelling",
            7,
            None,
        ),
        entry(
            now,
            "Scholar support tickets cleared",
            "support",
            Severity::Low,
            Some("Kai"),
            None,
            "Queue back to baseline after weekend push.",
            "support queue",
            "support,ops",
            10,
            Some(8),
        ),
        entry(
            now,
            "Employer partnership pipeline warming",
            "partnerships",
            Severity::Medium,
            None,
            Some(17),
            "Two employers requested cohort impact stats.",
            "pipeline review",
            "employers,pipeline",
            4,
            None,
        ),
        entry(
            now,
            "Budget variance flagged for Q1",
            "finance",
            Severity::High,
            Some("Iris"),
            Some(8),
            "Travel costs trending 18% above plan.",
            "finance report",
            "budget,variance",
            15,
            Some(11),
        ),
    ]
}

const TOPICS: [&str; 8] = [
    "Outreach follow-up",
    "Cohort survey review",
    "Vendor invoice check",
    "Curriculum update",
    "Site visit prep",
    "Volunteer onboarding",
    "Newsletter draft",
    "Data quality sweep",
];
const CATEGORIES: [&str; 5] = ["operations", "partner", "scholars", "funding", "program"];
const OWNERS: [Option<&str>; 6] = [
    Some("Ariana"),
    Some("Leah"),
    Some("Mateo"),
    Some("Priya"),
    Some("Kai"),
    None,
];
const SOURCES: [&str; 4] = ["weekly sync", "ops dashboard", "inbox", "field notes"];

/// Generate `count` synthetic signals after the base catalog. Deterministic
/// for a given `now`.
pub fn synthetic(now: DateTime<Utc>, count: usize) -> Vec<SeedSignal> {
    let mut rng = Mcg128Xsl64::new(SEED);
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let topic = TOPICS[rng.gen_range(0..TOPICS.len())];
        let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];
        let created_days_ago = rng.gen_range(0..45);
        let due_in_days = if rng.gen_bool(0.7) {
            Some(rng.gen_range(-10..30))
        } else {
            None
        };
        let closed_after_days = if created_days_ago >= 2 && rng.gen_bool(0.3) {
            Some(rng.gen_range(1..=created_days_ago.min(20)))
        } else {
            None
        };
        out.push(entry(
            now,
            &format!("{topic} #{}", i + 1),
            CATEGORIES[rng.gen_range(0..CATEGORIES.len())],
            severity,
            OWNERS[rng.gen_range(0..OWNERS.len())],
            due_in_days,
            "",
            SOURCES[rng.gen_range(0..SOURCES.len())],
            "",
            created_days_ago,
            closed_after_days,
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn base_catalog_is_valid_and_mixed() {
        let base = base_catalog(now());
        assert_eq!(base.len(), 10);
        for seed in &base {
            seed.new.validate().unwrap();
        }
        assert!(base.iter().any(|s| s.closed_after_days.is_some()));
        assert!(base.iter().any(|s| s.new.due.is_none()));
        assert!(base.iter().any(|s| s.new.owner.is_none()));
        // One entry is already overdue relative to now.
        assert!(base
            .iter()
            .any(|s| s.new.due.map_or(false, |d| d < now().date_naive())));
    }

    #[test]
    fn synthetic_is_deterministic() {
        let a = synthetic(now(), 25);
        let b = synthetic(now(), 25);
        assert_eq!(a.len(), 25);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.new.title, y.new.title);
            assert_eq!(x.new.due, y.new.due);
            assert_eq!(x.created_at, y.created_at);
            assert_eq!(x.closed_after_days, y.closed_after_days);
        }
    }

    #[test]
    fn closures_never_precede_creation() {
        for seed in synthetic(now(), 100) {
            if let Some(after) = seed.closed_after_days {
                assert!(after >= 1);
            }
        }
    }
}
