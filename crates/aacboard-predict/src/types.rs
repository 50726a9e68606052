/// Core data types for the prediction store
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A normalized store key: one or more whitespace-joined tokens, always uppercase.
///
/// Normalization happens at construction, so a key that violates the
/// uppercase invariant is unrepresentable. Deserialization goes through
/// `From<String>`, which re-normalizes keys loaded from older files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct TokenKey(String);

impl TokenKey {
    /// Create a key from a single token or a pre-joined phrase.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Create a key from a sequence of tokens, joined by single spaces.
    pub fn phrase(tokens: &[&str]) -> Self {
        Self::new(&tokens.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The key's tokens, in order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    /// Character length of the key (not byte length).
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }
}

impl From<String> for TokenKey {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl fmt::Display for TokenKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Usage statistics for a single word or n-gram key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    /// Number of times this key has been typed
    pub count: u64,
    /// Timestamp of the most recent usage (RFC 3339 on disk)
    #[serde(deserialize_with = "lenient_datetime", default = "epoch")]
    pub last_used: DateTime<Utc>,
}

impl UsageRecord {
    /// A fresh record for a key seen for the first time.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            count: 1,
            last_used: now,
        }
    }

    /// Record another occurrence. `count` only ever increases.
    pub fn bump(&mut self, now: DateTime<Utc>) {
        self.count += 1;
        self.last_used = now;
    }

    /// Seconds elapsed since the last usage, clamped at zero.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        let elapsed = now.signed_duration_since(self.last_used);
        (elapsed.num_milliseconds() as f64 / 1000.0).max(0.0)
    }
}

/// Which multi-token mapping an n-gram record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgramKind {
    Bigram,
    Trigram,
}

impl NgramKind {
    /// Context-specificity multiplier: trigram matches are trusted twice as
    /// much as bigram matches.
    pub fn multiplier(self) -> f64 {
        match self {
            NgramKind::Bigram => 5.0,
            NgramKind::Trigram => 10.0,
        }
    }

    /// Number of tokens in a key of this kind.
    pub fn arity(self) -> usize {
        match self {
            NgramKind::Bigram => 2,
            NgramKind::Trigram => 3,
        }
    }
}

pub(crate) fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Deserialize a timestamp, treating a missing or unparsable value as the
/// Unix epoch (maximally stale) instead of failing the whole record.
fn lenient_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|value| DateTime::parse_from_rfc3339(&value).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .unwrap_or_else(epoch))
}
