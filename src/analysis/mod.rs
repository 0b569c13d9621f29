pub mod features;
pub mod feedback;
pub mod pace;
pub mod peel;
pub mod scoring;
pub mod vocabulary;

pub use features::*;
pub use feedback::*;
pub use pace::*;
pub use peel::*;
pub use scoring::*;
pub use vocabulary::*;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::InvalidInput;
use crate::models::{
    AnalysisInput, Dimension, DimensionScore, FeatureSet, FeedbackCategory, FeedbackItem,
    ScoreVector, SessionAggregates,
};

/// Which kind of text is being analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Written or typed argument
    #[default]
    Essay,
    /// Live spoken utterances with delivery metrics
    Speech,
    /// PEEL structure practice question
    Practice,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Essay => write!(f, "essay"),
            AnalysisMode::Speech => write!(f, "speech"),
            AnalysisMode::Practice => write!(f, "practice"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "essay" => Ok(AnalysisMode::Essay),
            "speech" | "live" => Ok(AnalysisMode::Speech),
            "practice" | "peel" => Ok(AnalysisMode::Practice),
            other => Err(InvalidInput::UnknownMode(other.to_string())),
        }
    }
}

/// Dimensions and rule groups that apply to a mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    pub dimensions: Vec<Dimension>,
    /// Structure, impact and evidence rules
    pub argument_checks: bool,
    /// Speaking-rate measurement and pace rules
    pub pace_checks: bool,
    /// Always evaluate PEEL coverage
    pub peel: bool,
}

impl ModeProfile {
    pub fn for_mode(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Essay => Self {
                dimensions: vec![
                    Dimension::Structure,
                    Dimension::Evidence,
                    Dimension::Clarity,
                    Dimension::Relevance,
                    Dimension::Logic,
                ],
                argument_checks: true,
                pace_checks: false,
                peel: false,
            },
            AnalysisMode::Speech => Self {
                dimensions: vec![
                    Dimension::Pace,
                    Dimension::Clarity,
                    Dimension::Volume,
                    Dimension::Confidence,
                ],
                argument_checks: false,
                pace_checks: true,
                peel: false,
            },
            AnalysisMode::Practice => Self {
                dimensions: vec![
                    Dimension::Structure,
                    Dimension::Evidence,
                    Dimension::Logic,
                    Dimension::Relevance,
                ],
                argument_checks: true,
                pace_checks: false,
                peel: true,
            },
        }
    }
}

/// Analyzer settings. Every numeric threshold here is a placeholder for
/// real calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub vocabulary: Vocabulary,
    pub scoring: ScoringConfig,
    pub pace: PaceConfig,
    /// Shorter trimmed texts cannot carry a main point
    pub min_point_chars: usize,
    /// Longer texts pass the relevance check without motion overlap
    pub relevance_fallback_chars: usize,
    /// Filler count above which filler feedback is high severity
    pub filler_high_threshold: usize,
    /// Number of feedback items a session keeps
    pub history_capacity: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            vocabulary: Vocabulary::default(),
            scoring: ScoringConfig::default(),
            pace: PaceConfig::default(),
            min_point_chars: 20,
            relevance_fallback_chars: 50,
            filler_high_threshold: 2,
            history_capacity: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Load from a JSON file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse analyzer config")
    }
}

/// Scores and features of one analyzed text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub mode: AnalysisMode,
    pub features: FeatureSet,
    pub scores: ScoreVector,
    pub breakdown: Vec<DimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peel: Option<PeelReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<SpeechMetrics>,
}

/// Result of one `analyze` call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// `None` when the input was skipped
    pub report: Option<AnalysisReport>,
    pub feedback: Vec<FeedbackItem>,
    /// Session totals after this call
    pub aggregates: SessionAggregates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

impl AnalysisOutcome {
    fn skipped(aggregates: &SessionAggregates, reason: &InvalidInput) -> Self {
        Self {
            report: None,
            feedback: Vec::new(),
            aggregates: *aggregates,
            skipped: Some(reason.to_string()),
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.report.is_none()
    }

    pub fn scores(&self) -> Option<&ScoreVector> {
        self.report.as_ref().map(|r| &r.scores)
    }

    pub fn has_category(&self, category: FeedbackCategory) -> bool {
        self.feedback.iter().any(|i| i.category == category)
    }
}

/// Keyword-heuristic speech and argument analyzer.
///
/// Holds only immutable configuration; all session state is passed in and
/// returned by the caller.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one block of text.
    ///
    /// Empty text returns a no-op outcome with the aggregates unchanged.
    pub fn analyze<R: Rng + ?Sized>(
        &self,
        mode: AnalysisMode,
        input: &AnalysisInput,
        aggregates: &SessionAggregates,
        rng: &mut R,
    ) -> AnalysisOutcome {
        if let Err(reason) = input.validate() {
            debug!("Skipping analysis: {}", reason);
            return AnalysisOutcome::skipped(aggregates, &reason);
        }

        let profile = ModeProfile::for_mode(mode);
        let features = extract_features(&input.text, &input.context, &self.config);

        let updated = aggregates.advanced(features.word_count, features.filler_count, input.elapsed);

        let speech = profile
            .pace_checks
            .then(|| SpeechMetrics::measure(&updated, features.filler_count, &self.config.pace));

        let peel = (profile.argument_checks
            && (profile.peel || !input.context.expected_elements.is_empty()))
        .then(|| PeelReport::evaluate(&input.context.expected_elements, &features));

        let (scores, breakdown) = compute_scores(
            &profile.dimensions,
            &features,
            speech.as_ref(),
            self.config.filler_high_threshold,
            &self.config.scoring,
            rng,
        );

        let mut feedback = generate_feedback(&FeedbackSignals {
            features: &features,
            context: &input.context,
            argument_checks: profile.argument_checks,
            peel: peel.as_ref(),
            speech: speech.as_ref(),
            filler_high_threshold: self.config.filler_high_threshold,
        });
        for item in &mut feedback {
            item.assign_id(&mut *rng);
        }

        debug!(
            "Analyzed {} words ({}): overall {}, {} feedback items",
            features.word_count,
            mode,
            scores.overall,
            feedback.len()
        );

        AnalysisOutcome {
            report: Some(AnalysisReport {
                mode,
                features,
                scores,
                breakdown,
                peel,
                speech,
            }),
            feedback,
            aggregates: updated,
            skipped: None,
        }
    }
}
