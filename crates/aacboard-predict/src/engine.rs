//! Suggestion engine: ranked completions and next-word predictions.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::PredictorConfig;
use crate::error::PredictResult;
use crate::scoring::{freq_score, ngram_score};
use crate::store::UsageStore;
use crate::types::NgramKind;

/// Candidate pool that sums scores on collision while preserving
/// first-seen order, so the final stable sort breaks ties by insertion.
#[derive(Default)]
struct CandidatePool {
    order: Vec<String>,
    scores: HashMap<String, f64>,
}

impl CandidatePool {
    fn add(&mut self, candidate: &str, score: f64) {
        match self.scores.get_mut(candidate) {
            Some(total) => *total += score,
            None => {
                self.order.push(candidate.to_string());
                self.scores.insert(candidate.to_string(), score);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    fn into_ranked(self) -> Vec<(String, f64)> {
        let scores = self.scores;
        self.order
            .into_iter()
            .map(|candidate| {
                let score = scores[&candidate];
                (candidate, score)
            })
            .collect()
    }
}

/// Predictive text engine: an explicit handle over a usage store.
///
/// Single-threaded by contract; mutating operations take `&mut self`, so
/// sharing across threads requires external locking.
pub struct Predictor {
    store: UsageStore,
    config: PredictorConfig,
    path: Option<PathBuf>,
}

impl Predictor {
    /// Engine over an in-memory store. `record_usage` will not persist;
    /// hosts using this constructor save via [`UsageStore::save`] themselves.
    pub fn new(store: UsageStore, config: PredictorConfig) -> Self {
        Self {
            store,
            config,
            path: None,
        }
    }

    /// Engine backed by a store file. Loads the store (cold-start tolerant)
    /// and flushes back to the same path after every recorded phrase.
    pub fn with_path(path: impl Into<PathBuf>, config: PredictorConfig) -> Self {
        let path = path.into();
        let store = UsageStore::load(&path);
        Self {
            store,
            config,
            path: Some(path),
        }
    }

    pub fn store(&self) -> &UsageStore {
        &self.store
    }

    /// Mutable access for hosts that manage persistence themselves.
    pub fn store_mut(&mut self) -> &mut UsageStore {
        &mut self.store
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Ranked completions or next-word predictions for the current buffer.
    ///
    /// `text` may contain the cursor marker anywhere; trailing whitespace
    /// means the user just finished a word. Returns at most
    /// `max_suggestions` unique uppercase tokens, with the configured
    /// fallback words appended after genuine predictions when room remains.
    pub fn suggest(&self, text: &str, max_suggestions: usize) -> Vec<String> {
        self.suggest_at(text, max_suggestions, Utc::now())
    }

    /// [`suggest`](Self::suggest) with the configured shortlist size.
    pub fn suggest_default(&self, text: &str) -> Vec<String> {
        self.suggest(text, self.config.max_suggestions)
    }

    /// [`suggest`](Self::suggest) with an injected clock.
    pub fn suggest_at(
        &self,
        text: &str,
        max_suggestions: usize,
        now: DateTime<Utc>,
    ) -> Vec<String> {
        let cleaned = self.normalize(text);
        let ends_in_whitespace = cleaned.ends_with(char::is_whitespace);
        let words: Vec<&str> = cleaned.split_whitespace().collect();

        tracing::debug!(buffer = %cleaned.trim_end(), max_suggestions, "suggestion query");

        if words.is_empty() {
            let ranked = self.cold_start(now);
            return self.finish(ranked, max_suggestions);
        }

        let (current_word, context): (&str, &[&str]) = if ends_in_whitespace {
            ("", &words[..])
        } else {
            (*words.last().unwrap_or(&""), &words[..words.len() - 1])
        };

        let ngram_pool = if !context.is_empty()
            && (ends_in_whitespace || context.join(" ") != current_word)
        {
            self.ngram_candidates(context, current_word, now)
        } else {
            CandidatePool::default()
        };

        // Strict tier preference: context-aware completions fully shadow
        // plain frequency whenever any n-gram candidate qualifies.
        let ranked = if ngram_pool.is_empty() {
            self.frequent_candidates(current_word, now)
        } else {
            ngram_pool.into_ranked()
        };

        self.finish(ranked, max_suggestions)
    }

    /// Record a finalized phrase into the store and flush it to disk.
    ///
    /// One save per accepted phrase, not per token. Save failures surface;
    /// losing typing history silently would be invisible data loss.
    pub fn record_usage(&mut self, text: &str) -> PredictResult<()> {
        self.record_usage_at(text, Utc::now())
    }

    /// [`record_usage`](Self::record_usage) with an injected clock.
    pub fn record_usage_at(&mut self, text: &str, now: DateTime<Utc>) -> PredictResult<()> {
        let cleaned = self.normalize(text);
        let tokens: Vec<&str> = cleaned.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(());
        }

        self.store
            .record_tokens(&tokens, self.config.max_tracked_word_len, now);

        if let Some(path) = &self.path {
            self.store.save(path)?;
        }
        Ok(())
    }

    /// Strip the cursor marker and uppercase.
    fn normalize(&self, text: &str) -> String {
        text.chars()
            .filter(|c| *c != self.config.cursor_marker)
            .collect::<String>()
            .to_uppercase()
    }

    /// Empty-buffer tier: the globally most relevant words.
    fn cold_start(&self, now: DateTime<Utc>) -> Vec<(String, f64)> {
        self.store
            .frequent_words
            .iter()
            .filter(|(key, _)| key.char_len() >= self.config.min_suggestion_len)
            .map(|(key, record)| (key.as_str().to_string(), freq_score(record, now)))
            .collect()
    }

    /// Context tier: trigram and bigram continuations of the typed context,
    /// accumulated into one pool with scores summed on candidate collision.
    fn ngram_candidates(
        &self,
        context: &[&str],
        current_word: &str,
        now: DateTime<Utc>,
    ) -> CandidatePool {
        let mut pool = CandidatePool::default();
        for kind in [NgramKind::Trigram, NgramKind::Bigram] {
            let context_width = kind.arity() - 1;
            if context.len() < context_width {
                continue;
            }
            let context_tail = &context[context.len() - context_width..];
            let map = match kind {
                NgramKind::Trigram => &self.store.trigrams,
                NgramKind::Bigram => &self.store.bigrams,
            };

            for (key, record) in map {
                if record.count < 1 {
                    continue;
                }
                let tokens: Vec<&str> = key.tokens().collect();
                if tokens.len() != kind.arity() || tokens[..context_width] != *context_tail {
                    continue;
                }
                let candidate = tokens[context_width];
                if candidate.chars().count() < self.config.min_suggestion_len {
                    continue;
                }
                if !current_word.is_empty() && !candidate.starts_with(current_word) {
                    continue;
                }
                pool.add(
                    candidate,
                    ngram_score(record, kind, candidate, current_word, now),
                );
            }
        }
        pool
    }

    /// Frequency tier: completions of the current word, ignoring context.
    fn frequent_candidates(&self, current_word: &str, now: DateTime<Utc>) -> Vec<(String, f64)> {
        self.store
            .frequent_words
            .iter()
            .filter(|(key, _)| {
                key.char_len() >= self.config.min_suggestion_len
                    && key.as_str() != current_word
                    && key.as_str().starts_with(current_word)
            })
            .map(|(key, record)| (key.as_str().to_string(), freq_score(record, now)))
            .collect()
    }

    /// Stable-sort by score, truncate, then append missing fallback words.
    fn finish(&self, mut ranked: Vec<(String, f64)>, max_suggestions: usize) -> Vec<String> {
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let mut result: Vec<String> = ranked
            .into_iter()
            .take(max_suggestions)
            .map(|(candidate, _)| candidate)
            .collect();

        for fallback in &self.config.fallback_words {
            if !result.iter().any(|existing| existing == fallback) {
                result.push(fallback.clone());
            }
        }
        result.truncate(max_suggestions);
        result
    }
}
