use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A named scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Structure,
    Evidence,
    Clarity,
    Relevance,
    Logic,
    Pace,
    Volume,
    Confidence,
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::Structure => "structure",
            Dimension::Evidence => "evidence",
            Dimension::Clarity => "clarity",
            Dimension::Relevance => "relevance",
            Dimension::Logic => "logic",
            Dimension::Pace => "pace",
            Dimension::Volume => "volume",
            Dimension::Confidence => "confidence",
        };
        write!(f, "{}", label)
    }
}

/// Which base band a dimension was drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandKind {
    Present,
    Absent,
    Neutral,
}

/// Score for one dimension, before and after jitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub band: BandKind,
    /// Value drawn from the base band
    pub base: f64,
    /// Final value after jitter, clamped to [0, 100]
    pub value: f64,
}

/// Bounded scores per dimension plus their rounded mean
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreVector {
    pub dimensions: BTreeMap<Dimension, f64>,
    pub overall: u32,
}

impl ScoreVector {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 100.0;

    /// Build from per-dimension values, clamping each and averaging
    pub fn from_values(values: impl IntoIterator<Item = (Dimension, f64)>) -> Self {
        let dimensions: BTreeMap<Dimension, f64> = values
            .into_iter()
            .map(|(d, v)| (d, clamp_score(v)))
            .collect();
        let overall = mean_score(dimensions.values().copied());
        Self {
            dimensions,
            overall,
        }
    }
}

/// Clamp a score to [0, 100], mapping NaN to 0
pub fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        return ScoreVector::MIN;
    }
    value.clamp(ScoreVector::MIN, ScoreVector::MAX)
}

/// Rounded unweighted mean, 0 for no values
pub fn mean_score(values: impl IntoIterator<Item = f64>) -> u32 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return 0;
    }
    clamp_score(sum / count as f64).round() as u32
}
