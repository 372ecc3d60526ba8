//! Priority Filter — selects leads that need immediate attention.
//!
//! Two independent rules, combined with logical OR:
//! 1. Keyword rule: the free-text register contains an urgency signal.
//! 2. Staleness rule: last contact is at least two business days old.
//!
//! Pure and infallible: an empty result is a valid outcome, never an error.
//! `now` is always a parameter so tests pin the evaluation instant.

use chrono::{Datelike, Days, NaiveDateTime, Weekday};

use crate::models::lead::{ContactRecord, PriorityLead};

/// Urgency signals matched as case-insensitive substrings of the register.
/// No tokenization or stemming — raw substring presence is the contract.
const PRIORITY_KEYWORDS: [&str; 9] = [
    "repique",
    "novo repique",
    "objeção",
    "objeções",
    "urgente",
    "fechar",
    "matricula",
    "interessado",
    "proposta",
];

/// Contacts older than this many business days are stale.
const STALE_AFTER_BUSINESS_DAYS: u32 = 2;

/// Applies both priority rules to the loaded records.
///
/// Stable: selected leads keep their input order. A record matching both
/// rules appears exactly once, tagged with both reasons.
pub fn filter_priority(records: &[ContactRecord], now: NaiveDateTime) -> Vec<PriorityLead> {
    let threshold = business_days_back(now, STALE_AFTER_BUSINESS_DAYS);

    records
        .iter()
        .filter_map(|record| {
            let matched_keyword = contains_priority_keyword(&record.notes);
            let stale = record.contacted_at <= threshold;
            (matched_keyword || stale).then(|| PriorityLead {
                record: record.clone(),
                matched_keyword,
                stale,
            })
        })
        .collect()
}

/// True when the register contains any priority keyword, case-insensitively.
pub fn contains_priority_keyword(notes: &str) -> bool {
    let notes = notes.to_lowercase();
    PRIORITY_KEYWORDS.iter().any(|kw| notes.contains(kw))
}

/// Steps `from` back by `count` business days, preserving the time of day.
///
/// Walks calendar days backwards, counting only Mon–Fri (no holiday
/// calendar). Matches pandas `BusinessDay(n)` subtraction: Monday − 2bd =
/// the prior Thursday; Saturday − 2bd = the prior Thursday as well.
fn business_days_back(from: NaiveDateTime, count: u32) -> NaiveDateTime {
    let mut current = from;
    let mut remaining = count;
    while remaining > 0 {
        current = current - Days::new(1);
        if !is_weekend(current) {
            remaining -= 1;
        }
    }
    current
}

fn is_weekend(dt: NaiveDateTime) -> bool {
    matches!(dt.weekday(), Weekday::Sat | Weekday::Sun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn record(contacted_at: NaiveDateTime, notes: &str) -> ContactRecord {
        ContactRecord {
            contacted_at,
            lead_name: "Lead".to_string(),
            agent_name: "Mariana".to_string(),
            notes: notes.to_string(),
        }
    }

    // now = Monday 2025-01-06 → threshold = Thursday 2025-01-02
    fn monday() -> NaiveDateTime {
        at(2025, 1, 6)
    }

    #[test]
    fn two_business_days_before_monday_is_thursday() {
        assert_eq!(business_days_back(monday(), 2), at(2025, 1, 2));
    }

    #[test]
    fn two_business_days_before_saturday_is_thursday() {
        assert_eq!(business_days_back(at(2025, 1, 4), 2), at(2025, 1, 2));
    }

    #[test]
    fn business_day_subtraction_preserves_time_of_day() {
        let from = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(14, 45, 10)
            .unwrap();
        let back = business_days_back(from, 2);
        assert_eq!(back.date(), NaiveDate::from_ymd_opt(2025, 1, 2).unwrap());
        assert_eq!(back.time(), from.time());
    }

    #[test]
    fn stale_record_on_threshold_boundary_is_selected() {
        let records = vec![record(at(2025, 1, 2), "tudo certo")];
        let leads = filter_priority(&records, monday());
        assert_eq!(leads.len(), 1);
        assert!(leads[0].stale);
        assert!(!leads[0].matched_keyword);
    }

    #[test]
    fn recent_neutral_record_is_excluded() {
        // Friday Jan 3 is one business day before Monday Jan 6
        let records = vec![record(at(2025, 1, 3), "tudo certo")];
        assert!(filter_priority(&records, monday()).is_empty());
    }

    #[test]
    fn old_record_is_selected_by_staleness() {
        // Wednesday Jan 1, four business days back
        let records = vec![record(at(2025, 1, 1), "sem novidades")];
        let leads = filter_priority(&records, monday());
        assert_eq!(leads.len(), 1);
        assert!(leads[0].stale);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let records = vec![
            record(at(2025, 1, 6), "Lead URGENTE, retornar hoje"),
            record(at(2025, 1, 6), "Possível objeção de preço"),
            record(at(2025, 1, 6), "Novo Repique agendado"),
        ];
        let leads = filter_priority(&records, monday());
        assert_eq!(leads.len(), 3);
        assert!(leads.iter().all(|l| l.matched_keyword && !l.stale));
    }

    #[test]
    fn matching_both_rules_selects_exactly_once() {
        let records = vec![record(at(2025, 1, 1), "quer fechar matricula")];
        let leads = filter_priority(&records, monday());
        assert_eq!(leads.len(), 1);
        assert!(leads[0].matched_keyword);
        assert!(leads[0].stale);
    }

    #[test]
    fn selection_preserves_input_order() {
        let records = vec![
            record(at(2025, 1, 1), "a"),          // stale
            record(at(2025, 1, 6), "tudo certo"), // excluded
            record(at(2025, 1, 6), "proposta"),   // keyword
            record(at(2025, 1, 2), "b"),          // stale
        ];
        let leads = filter_priority(&records, monday());
        let order: Vec<_> = leads.iter().map(|l| l.record.contacted_at).collect();
        assert_eq!(
            order,
            vec![at(2025, 1, 1), at(2025, 1, 6), at(2025, 1, 2)]
        );
    }

    #[test]
    fn filtering_is_deterministic() {
        let records = vec![
            record(at(2025, 1, 1), "interessado"),
            record(at(2025, 1, 6), "nada"),
        ];
        let first = filter_priority(&records, monday());
        let second = filter_priority(&records, monday());
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_priority(&[], monday()).is_empty());
    }
}
