//! Scoring functions for suggestion ranking.
//!
//! Recency is the primary relevance signal: a key used within the current
//! session carries a four-digit bonus that dominates raw counts, modeling
//! short-term topical repetition in conversation. Raw count is the
//! secondary signal. N-gram scores additionally reward candidates that
//! complete more characters than the user has typed.
//!
//! All functions take an explicit `now` so tests can pin the clock.

use chrono::{DateTime, Utc};

use crate::types::{NgramKind, UsageRecord};

const HOUR_SECS: f64 = 3_600.0;
const WEEK_SECS: f64 = 604_800.0;

/// Bonus for keys used within the last hour (same session).
pub const SESSION_BONUS: f64 = 10_000.0;
/// Bonus for keys used within the last week.
pub const WEEK_BONUS: f64 = 5_000.0;

/// Extra characters a candidate must save to earn the length jackpot.
const JACKPOT_THRESHOLD: usize = 3;
const JACKPOT: f64 = 40.0;
const PER_LETTER_BONUS: f64 = 20.0;

/// Tiered additive bonus for recent usage.
pub fn recency_bonus(record: &UsageRecord, now: DateTime<Utc>) -> f64 {
    let elapsed = record.elapsed_secs(now);
    if elapsed < HOUR_SECS {
        SESSION_BONUS
    } else if elapsed < WEEK_SECS {
        WEEK_BONUS
    } else {
        0.0
    }
}

/// Score for a plain frequent-word candidate.
pub fn freq_score(record: &UsageRecord, now: DateTime<Utc>) -> f64 {
    let elapsed = record.elapsed_secs(now);
    record.count as f64 + (1.0 / (elapsed + 1.0)) * 20.0 + recency_bonus(record, now)
}

/// Score for a candidate reached through a bigram or trigram key.
///
/// `candidate` is the key's continuation token; `current_word` is the
/// partial word the user has typed so far (possibly empty).
pub fn ngram_score(
    record: &UsageRecord,
    kind: NgramKind,
    candidate: &str,
    current_word: &str,
    now: DateTime<Utc>,
) -> f64 {
    let elapsed = record.elapsed_secs(now);
    let base = kind.multiplier() * (record.count as f64 + 1.0 / (elapsed + 1.0))
        + recency_bonus(record, now);

    // Characters the candidate completes beyond what is already typed.
    let extra = candidate
        .chars()
        .count()
        .saturating_sub(current_word.chars().count());
    let letter_bonus = extra as f64 * PER_LETTER_BONUS;
    let length_jackpot = if extra > JACKPOT_THRESHOLD { JACKPOT } else { 0.0 };

    base + letter_bonus + length_jackpot
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record_used(count: u64, ago: Duration, now: DateTime<Utc>) -> UsageRecord {
        UsageRecord {
            count,
            last_used: now - ago,
        }
    }

    #[test]
    fn test_recency_bonus_tiers() {
        let now = Utc::now();
        let fresh = record_used(1, Duration::minutes(5), now);
        let this_week = record_used(1, Duration::days(2), now);
        let stale = record_used(1, Duration::days(30), now);

        assert_eq!(recency_bonus(&fresh, now), SESSION_BONUS);
        assert_eq!(recency_bonus(&this_week, now), WEEK_BONUS);
        assert_eq!(recency_bonus(&stale, now), 0.0);
    }

    #[test]
    fn test_recency_bonus_boundaries() {
        let now = Utc::now();
        let just_over_hour = record_used(1, Duration::seconds(3_601), now);
        let just_over_week = record_used(1, Duration::seconds(604_801), now);

        assert_eq!(recency_bonus(&just_over_hour, now), WEEK_BONUS);
        assert_eq!(recency_bonus(&just_over_week, now), 0.0);
    }

    #[test]
    fn test_freq_score_recent_dominates_count() {
        let now = Utc::now();
        let recent_rare = record_used(1, Duration::minutes(1), now);
        let stale_common = record_used(500, Duration::days(30), now);

        assert!(freq_score(&recent_rare, now) > freq_score(&stale_common, now));
    }

    #[test]
    fn test_trigram_outweighs_bigram_at_equal_stats() {
        let now = Utc::now();
        let record = record_used(4, Duration::days(30), now);

        let tri = ngram_score(&record, NgramKind::Trigram, "TOMORROW", "TO", now);
        let bi = ngram_score(&record, NgramKind::Bigram, "TOMORROW", "TO", now);
        assert!(tri > bi);
    }

    #[test]
    fn test_longer_candidates_earn_letter_bonus() {
        let now = Utc::now();
        let record = record_used(1, Duration::days(30), now);

        let long = ngram_score(&record, NgramKind::Bigram, "MORNING", "MO", now);
        let short = ngram_score(&record, NgramKind::Bigram, "MORE", "MO", now);
        assert!(long > short);
    }

    #[test]
    fn test_length_jackpot_at_four_extra_chars() {
        let now = Utc::now();
        let record = record_used(1, Duration::days(30), now);

        // "WANTS" completes 3 extra chars, "WANTED" completes 4.
        let without = ngram_score(&record, NgramKind::Bigram, "WANTS", "WA", now);
        let with = ngram_score(&record, NgramKind::Bigram, "WANTED", "WA", now);
        assert!((with - without - PER_LETTER_BONUS - JACKPOT).abs() < 1e-9);
    }
}
