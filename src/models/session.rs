use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Running totals threaded through repeated analyzer calls.
///
/// Owned by the caller; the analyzer only ever returns an updated copy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionAggregates {
    /// Words seen across all analyzed utterances
    pub total_words: usize,
    /// Filler occurrences across all analyzed utterances
    pub total_fillers: usize,
    /// Time since the session started, as of the latest utterance
    pub elapsed: Duration,
    /// Number of analyzed utterances
    pub utterances: usize,
}

impl SessionAggregates {
    /// Elapsed whole seconds, never less than one
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64().max(1.0)
    }

    /// Session speaking rate over all words so far
    pub fn words_per_minute(&self) -> f64 {
        self.total_words as f64 * 60.0 / self.elapsed_secs()
    }

    /// Fillers per hundred words
    pub fn filler_rate(&self) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.total_fillers as f64 / self.total_words as f64 * 100.0
    }

    /// Fold one call's counts into a new set of totals
    pub fn advanced(&self, words: usize, fillers: usize, elapsed: Option<Duration>) -> Self {
        Self {
            total_words: self.total_words + words,
            total_fillers: self.total_fillers + fillers,
            elapsed: elapsed.map_or(self.elapsed, |e| e.max(self.elapsed)),
            utterances: self.utterances + 1,
        }
    }
}
