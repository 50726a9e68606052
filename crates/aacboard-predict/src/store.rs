//! Persistent word/bigram/trigram usage statistics.
//!
//! The store is fully materialized in memory; `load` never fails (a
//! missing or corrupt file is a recoverable cold start) while `save`
//! surfaces write errors, since silent save failure would lose typing
//! history across sessions. Saves are atomic: the JSON is written to a
//! temporary file in the destination directory and renamed into place, so
//! a concurrent loader never observes a half-written store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{PredictError, PredictResult};
use crate::types::{TokenKey, UsageRecord};

/// Usage statistics for single words, word pairs, and word triples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsageStore {
    /// Single token -> usage
    #[serde(default)]
    pub frequent_words: BTreeMap<TokenKey, UsageRecord>,
    /// Two space-joined tokens -> usage
    #[serde(default)]
    pub bigrams: BTreeMap<TokenKey, UsageRecord>,
    /// Three space-joined tokens -> usage
    #[serde(default)]
    pub trigrams: BTreeMap<TokenKey, UsageRecord>,
}

impl UsageStore {
    /// Load the store from `path`.
    ///
    /// A missing, empty, or unparsable file yields an empty store; this is
    /// the cold-start path, not an error, since the file is only ever
    /// written by this component.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::info!(
                    "No prediction store at {} ({}), starting empty",
                    path.display(),
                    err
                );
                return Self::default();
            }
        };

        if content.trim().is_empty() {
            tracing::info!("Empty prediction store at {}, starting empty", path.display());
            return Self::default();
        }

        match serde_json::from_str::<UsageStore>(&content) {
            Ok(store) => {
                tracing::info!(
                    "Loaded prediction store from {} ({} words, {} bigrams, {} trigrams)",
                    path.display(),
                    store.frequent_words.len(),
                    store.bigrams.len(),
                    store.trigrams.len()
                );
                store
            }
            Err(err) => {
                tracing::warn!(
                    "Prediction store at {} is corrupt ({}), starting empty",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Save the full store to `path`, replacing any previous file atomically.
    pub fn save(&self, path: &Path) -> PredictResult<()> {
        let content = serde_json::to_string_pretty(self)?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        if let Some(dir) = dir {
            std::fs::create_dir_all(dir)?;
        }

        let mut tmp = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new_in(".")?,
        };
        tmp.write_all(content.as_bytes())?;
        tmp.persist(path).map_err(|err| PredictError::PersistError {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        tracing::debug!("Saved prediction store to {}", path.display());
        Ok(())
    }

    /// Record a finalized sequence of (already normalized) tokens.
    ///
    /// Words longer than `max_word_len` characters are skipped; bigram and
    /// trigram keys are uncapped. Mutates in memory only; persisting is the
    /// caller's responsibility.
    pub fn record_tokens(&mut self, tokens: &[&str], max_word_len: usize, now: DateTime<Utc>) {
        for token in tokens {
            if token.chars().count() <= max_word_len {
                bump(&mut self.frequent_words, TokenKey::new(token), now);
            }
        }
        for pair in tokens.windows(2) {
            bump(&mut self.bigrams, TokenKey::phrase(pair), now);
        }
        for triple in tokens.windows(3) {
            bump(&mut self.trigrams, TokenKey::phrase(triple), now);
        }
    }

    /// True when all three mappings are empty.
    pub fn is_empty(&self) -> bool {
        self.frequent_words.is_empty() && self.bigrams.is_empty() && self.trigrams.is_empty()
    }
}

fn bump(map: &mut BTreeMap<TokenKey, UsageRecord>, key: TokenKey, now: DateTime<Utc>) {
    map.entry(key)
        .and_modify(|record| record.bump(now))
        .or_insert_with(|| UsageRecord::new(now));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tokens_populates_all_mappings() {
        let mut store = UsageStore::default();
        let now = Utc::now();
        store.record_tokens(&["I", "WANT", "TO"], 9, now);

        assert_eq!(store.frequent_words.len(), 3);
        assert_eq!(store.bigrams.len(), 2);
        assert_eq!(store.trigrams.len(), 1);
        assert!(store.trigrams.contains_key(&TokenKey::new("I WANT TO")));
    }

    #[test]
    fn test_record_tokens_counts_are_monotonic() {
        let mut store = UsageStore::default();
        let now = Utc::now();
        store.record_tokens(&["HELLO", "WORLD"], 9, now);
        store.record_tokens(&["HELLO", "WORLD"], 9, now);

        assert_eq!(store.frequent_words[&TokenKey::new("HELLO")].count, 2);
        assert_eq!(store.bigrams[&TokenKey::new("HELLO WORLD")].count, 2);
    }

    #[test]
    fn test_long_words_skipped_but_ngrams_kept() {
        let mut store = UsageStore::default();
        let now = Utc::now();
        store.record_tokens(&["EXTRAORDINARY", "DAY"], 9, now);

        assert!(!store
            .frequent_words
            .contains_key(&TokenKey::new("EXTRAORDINARY")));
        assert!(store.frequent_words.contains_key(&TokenKey::new("DAY")));
        assert!(store
            .bigrams
            .contains_key(&TokenKey::new("EXTRAORDINARY DAY")));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = UsageStore::load(&dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(UsageStore::load(&path).is_empty());
    }

    #[test]
    fn test_load_normalizes_lowercase_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(
            &path,
            r#"{"frequent_words": {"hello": {"count": 2, "last_used": "2026-01-01T00:00:00Z"}}}"#,
        )
        .unwrap();

        let store = UsageStore::load(&path);
        assert_eq!(store.frequent_words[&TokenKey::new("HELLO")].count, 2);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");
        let mut store = UsageStore::default();
        store.record_tokens(&["HI"], 9, Utc::now());

        store.save(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = UsageStore::default();
        store.record_tokens(&["GOOD", "MORNING", "ALL"], 9, Utc::now());

        store.save(&path).unwrap();
        let loaded = UsageStore::load(&path);
        assert_eq!(loaded, store);
    }

    #[test]
    fn test_save_to_unwritable_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        // The target's parent is a file, so the write cannot succeed.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let store = UsageStore::default();
        assert!(store.save(&blocker.join("store.json")).is_err());
    }
}
