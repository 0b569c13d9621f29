use crate::models::{DebateContext, FeatureSet};

use super::AnalyzerConfig;
use super::vocabulary::NormalizedText;

/// Offset added to the motion overlap fraction so partial overlap still passes
const RELEVANCE_LENIENCY: f64 = 0.3;

/// Derive the feature set for one block of text
pub fn extract_features(text: &str, context: &DebateContext, config: &AnalyzerConfig) -> FeatureSet {
    let normalized = NormalizedText::new(text);
    let vocabulary = &config.vocabulary;
    let char_count = text.trim().chars().count();

    let overgeneralizations: Vec<String> = normalized
        .matches(&vocabulary.overgeneralization)
        .into_iter()
        .map(str::to_string)
        .collect();

    let relevance = assess_relevance(&normalized, char_count, context, config);

    FeatureSet {
        word_count: normalized.tokens().len(),
        char_count,
        has_point: char_count >= config.min_point_chars,
        has_evidence: normalized.contains_any(&vocabulary.evidence),
        has_structure: normalized.contains_any(&vocabulary.structure),
        has_impact: normalized.contains_any(&vocabulary.impact),
        has_link: normalized.contains_any(&vocabulary.link),
        has_overgeneralization: !overgeneralizations.is_empty(),
        overgeneralizations,
        filler_count: normalized.count_all(&vocabulary.fillers),
        is_relevant: relevance.passed,
        motion_matches: relevance.matches,
        relevance_ratio: relevance.ratio,
    }
}

struct Relevance {
    passed: bool,
    matches: usize,
    ratio: f64,
}

/// Keyword-overlap relevance proxy.
///
/// Passes when any motion token appears in the text, when the text is long
/// enough to get the benefit of the doubt, or when there is no motion.
fn assess_relevance(
    text: &NormalizedText,
    char_count: usize,
    context: &DebateContext,
    config: &AnalyzerConfig,
) -> Relevance {
    let Some(motion) = context.motion() else {
        return Relevance {
            passed: true,
            matches: 0,
            ratio: 1.0,
        };
    };

    let mut keywords: Vec<&str> = Vec::new();
    let motion_tokens = NormalizedText::new(motion);
    for token in motion_tokens.tokens() {
        if !keywords.contains(&token.as_str()) {
            keywords.push(token);
        }
    }

    if keywords.is_empty() {
        return Relevance {
            passed: true,
            matches: 0,
            ratio: 1.0,
        };
    }

    let matches = keywords.iter().filter(|k| text.contains_token(k)).count();
    let ratio = (matches as f64 / keywords.len() as f64 + RELEVANCE_LENIENCY).min(1.0);

    Relevance {
        passed: matches > 0 || char_count > config.relevance_fallback_chars,
        matches,
        ratio,
    }
}
