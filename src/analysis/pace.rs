use serde::{Deserialize, Serialize};

use crate::models::SessionAggregates;

/// Speaking-rate thresholds in words per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaceConfig {
    pub ideal_min_wpm: f64,
    pub ideal_max_wpm: f64,
    /// Below this the speaker is told to speed up
    pub slow_below_wpm: f64,
    /// Above this the speaker is told to slow down
    pub fast_above_wpm: f64,
}

impl Default for PaceConfig {
    fn default() -> Self {
        Self {
            ideal_min_wpm: 140.0,
            ideal_max_wpm: 160.0,
            slow_below_wpm: 120.0,
            fast_above_wpm: 180.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaceBand {
    TooSlow,
    Acceptable,
    Ideal,
    TooFast,
}

impl PaceConfig {
    pub fn classify(&self, wpm: f64) -> PaceBand {
        if wpm > self.fast_above_wpm {
            PaceBand::TooFast
        } else if wpm < self.slow_below_wpm {
            PaceBand::TooSlow
        } else if wpm >= self.ideal_min_wpm && wpm <= self.ideal_max_wpm {
            PaceBand::Ideal
        } else {
            PaceBand::Acceptable
        }
    }
}

/// Delivery measurements for live speech
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechMetrics {
    pub words_per_minute: f64,
    pub pace: PaceBand,
    /// Fillers in this call
    pub filler_count: usize,
    /// Fillers across the session, including this call
    pub total_fillers: usize,
}

impl SpeechMetrics {
    /// Measure against already-updated session totals
    pub fn measure(aggregates: &SessionAggregates, filler_count: usize, config: &PaceConfig) -> Self {
        let words_per_minute = aggregates.words_per_minute();
        Self {
            words_per_minute,
            pace: config.classify(words_per_minute),
            filler_count,
            total_fillers: aggregates.total_fillers,
        }
    }

    pub fn is_within_limits(&self) -> bool {
        matches!(self.pace, PaceBand::Ideal | PaceBand::Acceptable)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_classify_bands() {
        let config = PaceConfig::default();
        assert_eq!(config.classify(100.0), PaceBand::TooSlow);
        assert_eq!(config.classify(120.0), PaceBand::Acceptable);
        assert_eq!(config.classify(150.0), PaceBand::Ideal);
        assert_eq!(config.classify(175.0), PaceBand::Acceptable);
        assert_eq!(config.classify(180.0), PaceBand::Acceptable);
        assert_eq!(config.classify(181.0), PaceBand::TooFast);
    }

    #[test]
    fn test_measure_uses_session_totals() {
        let aggregates = SessionAggregates {
            total_words: 75,
            total_fillers: 4,
            elapsed: Duration::from_secs(30),
            utterances: 3,
        };
        let metrics = SpeechMetrics::measure(&aggregates, 1, &PaceConfig::default());

        assert_eq!(metrics.words_per_minute, 150.0);
        assert_eq!(metrics.pace, PaceBand::Ideal);
        assert_eq!(metrics.total_fillers, 4);
        assert!(metrics.is_within_limits());
    }
}
