//! aacboard predictive text engine
//!
//! A frequency/recency-weighted n-gram completion and next-word prediction
//! model built from the user's own typing history, persisted as JSON. The
//! engine backs the aacboard on-screen keyboard: the host passes the raw
//! edit buffer (cursor marker included) to [`Predictor::suggest`] and gets
//! back a ranked shortlist; when the user accepts a phrase, the host calls
//! [`Predictor::record_usage`] to fold it into the statistics.
//!
//! # Behavior
//!
//! Suggestions come from two tiers. When the typed context matches stored
//! bigrams or trigrams, those continuations are used exclusively; plain
//! word-frequency completions only apply when no context match exists.
//! Recency dominates ranking: anything typed in the last hour carries a
//! bonus that outweighs raw counts, since a word just used is likely to be
//! used again. Fixed fallback words (YES, NO, HELP by default) pad the
//! shortlist after genuine predictions.
//!
//! The store is loaded once (a missing or corrupt file is a cold start,
//! not an error), mutated in memory, and flushed atomically after each
//! accepted phrase. Update frequency is bounded by human typing speed, so
//! the synchronous one-flush-per-phrase model is deliberate.
//!
//! # Example
//!
//! ```
//! use aacboard_predict::{Predictor, PredictorConfig, UsageStore};
//!
//! let mut engine = Predictor::new(UsageStore::default(), PredictorConfig::default());
//! engine.record_usage("I want to sleep").unwrap();
//!
//! let suggestions = engine.suggest("I want |", 6);
//! assert_eq!(suggestions[0], "TO");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod scoring;
pub mod store;
pub mod types;

pub use config::{default_store_path, PredictorConfig};
pub use engine::Predictor;
pub use error::{PredictError, PredictResult};
pub use scoring::{freq_score, ngram_score, recency_bonus};
pub use store::UsageStore;
pub use types::{NgramKind, TokenKey, UsageRecord};
