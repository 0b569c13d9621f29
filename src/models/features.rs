use serde::{Deserialize, Serialize};

/// Flags and counts derived from a single block of text.
///
/// Computed fresh for every analysis call and never reused.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Whitespace-delimited words in the text
    pub word_count: usize,
    /// Characters in the trimmed text
    pub char_count: usize,
    /// Long enough to carry a main point
    pub has_point: bool,
    /// Evidentiary language ("research", "for example", ...)
    pub has_evidence: bool,
    /// Structural or transition language ("first", "however", ...)
    pub has_structure: bool,
    /// Impact or explanation language ("because", "this means", ...)
    pub has_impact: bool,
    /// Language linking back to the motion ("overall", "in conclusion", ...)
    pub has_link: bool,
    /// Absolutes such as "everyone" or "always"
    pub has_overgeneralization: bool,
    /// Overgeneralization markers that were found, in vocabulary order
    pub overgeneralizations: Vec<String>,
    /// Occurrences of filler words and phrases
    pub filler_count: usize,
    /// Relevance proxy passed
    pub is_relevant: bool,
    /// Motion tokens found in the text
    pub motion_matches: usize,
    /// Fraction of motion tokens found, plus the leniency offset, capped at 1
    pub relevance_ratio: f64,
}
