//! Predictor configuration.
//!
//! Hosts construct a `PredictorConfig` (or take the defaults) and pass it
//! in; the engine never reads config files on its own.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tunables for the predictive engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PredictorConfig {
    /// Tokens appended after genuine predictions when room remains,
    /// in fixed order
    pub fallback_words: Vec<String>,
    /// Caret position marker stripped from raw buffer text
    pub cursor_marker: char,
    /// Minimum character length for a suggested candidate
    pub min_suggestion_len: usize,
    /// Single words longer than this are not tracked (n-gram keys are uncapped)
    pub max_tracked_word_len: usize,
    /// Shortlist size used by `suggest_default`
    pub max_suggestions: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            fallback_words: vec!["YES".to_string(), "NO".to_string(), "HELP".to_string()],
            cursor_marker: '|',
            min_suggestion_len: 2,
            max_tracked_word_len: 9,
            max_suggestions: 6,
        }
    }
}

/// Default per-user location of the persisted store.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("aacboard").join("predictive_text.json"))
}
