use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::{BandKind, Dimension, DimensionScore, FeatureSet, ScoreVector, clamp_score};

use super::pace::SpeechMetrics;

/// Half-open score range `[low, high)` a base value is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBand {
    pub low: f64,
    pub high: f64,
}

impl ScoreBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value < self.high
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.high > self.low {
            rng.gen_range(self.low..self.high)
        } else {
            self.low
        }
    }
}

/// Base bands and jitter for dimension scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Band when the dimension's feature was detected
    pub present: ScoreBand,
    /// Band when it was not
    pub absent: ScoreBand,
    /// Band for dimensions with no textual signal
    pub neutral: ScoreBand,
    /// Maximum absolute jitter added to the base value
    pub jitter: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            present: ScoreBand::new(80.0, 100.0),
            absent: ScoreBand::new(50.0, 80.0),
            neutral: ScoreBand::new(70.0, 90.0),
            jitter: 5.0,
        }
    }
}

impl ScoringConfig {
    pub fn band(&self, kind: BandKind) -> ScoreBand {
        match kind {
            BandKind::Present => self.present,
            BandKind::Absent => self.absent,
            BandKind::Neutral => self.neutral,
        }
    }
}

/// Which band a dimension falls into given the detected features.
///
/// `None` means the dimension has no textual signal.
pub fn dimension_condition(
    dimension: Dimension,
    features: &FeatureSet,
    speech: Option<&SpeechMetrics>,
    filler_high_threshold: usize,
) -> Option<bool> {
    match dimension {
        Dimension::Structure => Some(features.has_point && features.has_structure),
        Dimension::Evidence => Some(features.has_evidence),
        Dimension::Clarity => Some(features.filler_count == 0),
        Dimension::Relevance => Some(features.is_relevant),
        Dimension::Logic => Some(features.has_impact && !features.has_overgeneralization),
        Dimension::Pace => speech.map(SpeechMetrics::is_within_limits),
        Dimension::Volume => None,
        Dimension::Confidence => Some(
            features.filler_count <= filler_high_threshold && !features.has_overgeneralization,
        ),
    }
}

/// Score a single dimension: draw from its band, add jitter, clamp
pub fn score_dimension<R: Rng + ?Sized>(
    dimension: Dimension,
    condition: Option<bool>,
    config: &ScoringConfig,
    rng: &mut R,
) -> DimensionScore {
    let band = match condition {
        Some(true) => BandKind::Present,
        Some(false) => BandKind::Absent,
        None => BandKind::Neutral,
    };
    let base = config.band(band).draw(rng);
    let jitter = if config.jitter > 0.0 {
        rng.gen_range(-config.jitter..=config.jitter)
    } else {
        0.0
    };

    DimensionScore {
        dimension,
        band,
        base,
        value: clamp_score(base + jitter),
    }
}

/// Score every dimension of a mode and summarize into a vector
pub fn compute_scores<R: Rng + ?Sized>(
    dimensions: &[Dimension],
    features: &FeatureSet,
    speech: Option<&SpeechMetrics>,
    filler_high_threshold: usize,
    config: &ScoringConfig,
    rng: &mut R,
) -> (ScoreVector, Vec<DimensionScore>) {
    let breakdown: Vec<DimensionScore> = dimensions
        .iter()
        .map(|&dimension| {
            let condition = dimension_condition(dimension, features, speech, filler_high_threshold);
            score_dimension(dimension, condition, config, rng)
        })
        .collect();

    let scores = ScoreVector::from_values(breakdown.iter().map(|s| (s.dimension, s.value)));
    (scores, breakdown)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::mean_score;

    #[test]
    fn test_present_band_without_jitter() {
        let config = ScoringConfig {
            jitter: 0.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let score = score_dimension(Dimension::Evidence, Some(true), &config, &mut rng);
            assert_eq!(score.band, BandKind::Present);
            assert!(config.present.contains(score.value), "{}", score.value);
        }
    }

    #[test]
    fn test_huge_jitter_stays_clamped() {
        let config = ScoringConfig {
            jitter: 500.0,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let score = score_dimension(Dimension::Clarity, Some(false), &config, &mut rng);
            assert!(config.absent.contains(score.base));
            assert!((0.0..=100.0).contains(&score.value));
        }
    }

    #[test]
    fn test_volume_uses_neutral_band() {
        let features = FeatureSet::default();
        assert_eq!(dimension_condition(Dimension::Volume, &features, None, 2), None);
        assert_eq!(dimension_condition(Dimension::Pace, &features, None, 2), None);
    }

    #[test]
    fn test_short_text_never_gets_present_structure() {
        let features = FeatureSet {
            has_point: false,
            has_structure: true,
            ..Default::default()
        };
        assert_eq!(dimension_condition(Dimension::Structure, &features, None, 2), Some(false));
    }

    #[test]
    fn test_overall_is_mean_of_breakdown() {
        let features = FeatureSet {
            has_point: true,
            has_evidence: true,
            is_relevant: true,
            ..Default::default()
        };
        let dimensions = [
            Dimension::Structure,
            Dimension::Evidence,
            Dimension::Clarity,
            Dimension::Relevance,
            Dimension::Logic,
        ];
        let mut rng = StdRng::seed_from_u64(3);
        let (scores, breakdown) =
            compute_scores(&dimensions, &features, None, 2, &ScoringConfig::default(), &mut rng);

        assert_eq!(breakdown.len(), 5);
        assert_eq!(scores.dimensions.len(), 5);
        assert_eq!(scores.overall, mean_score(breakdown.iter().map(|s| s.value)));
    }
}
