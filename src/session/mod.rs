pub mod capabilities;
pub mod live;

pub use capabilities::*;
pub use live::*;

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::analysis::{AnalysisMode, AnalysisOutcome, AnalysisReport, Analyzer};
use crate::models::{
    AnalysisInput, DebateContext, FeedbackCategory, FeedbackHistory, FeedbackItem,
    SessionAggregates, Utterance,
};

/// Categories a rolling review may report; delivery issues are already
/// covered per utterance.
const REVIEW_CATEGORIES: [FeedbackCategory; 4] = [
    FeedbackCategory::OffTopic,
    FeedbackCategory::MissingStructure,
    FeedbackCategory::MissingImpact,
    FeedbackCategory::WeakEvidence,
];

/// Build a jitter source from an optional seed
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// The most recent utterances, oldest first
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    capacity: usize,
    texts: VecDeque<String>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            texts: VecDeque::new(),
        }
    }

    pub fn push(&mut self, text: impl Into<String>) {
        if self.texts.len() == self.capacity {
            self.texts.pop_front();
        }
        self.texts.push_back(text.into());
    }

    pub fn joined(&self) -> String {
        self.texts.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// End-of-session numbers
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub mode: AnalysisMode,
    pub utterances: usize,
    pub total_words: usize,
    pub total_fillers: usize,
    /// Fillers per hundred words
    pub filler_rate: f64,
    pub elapsed_secs: f64,
    pub words_per_minute: f64,
    /// Mean of the overall scores of all analyzed utterances
    pub average_score: u32,
    pub latest_score: Option<u32>,
    pub feedback_items: usize,
}

/// One practice session: owns the running totals, the feedback history and
/// the jitter source, and serializes calls into the analyzer.
pub struct PracticeSession<R: Rng = StdRng> {
    analyzer: Analyzer,
    context: DebateContext,
    mode: AnalysisMode,
    aggregates: SessionAggregates,
    history: FeedbackHistory,
    rng: R,
    latest: Option<AnalysisReport>,
    score_sum: u64,
    scored: u64,
    feedback_items: usize,
}

impl<R: Rng> PracticeSession<R> {
    pub fn new(analyzer: Analyzer, context: DebateContext, mode: AnalysisMode, rng: R) -> Self {
        let history = FeedbackHistory::with_capacity(analyzer.config().history_capacity);
        Self {
            analyzer,
            context,
            mode,
            aggregates: SessionAggregates::default(),
            history,
            rng,
            latest: None,
            score_sum: 0,
            scored: 0,
            feedback_items: 0,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn context(&self) -> &DebateContext {
        &self.context
    }

    pub fn aggregates(&self) -> &SessionAggregates {
        &self.aggregates
    }

    pub fn history(&self) -> &FeedbackHistory {
        &self.history
    }

    pub fn latest(&self) -> Option<&AnalysisReport> {
        self.latest.as_ref()
    }

    /// Analyze a finalized piece of text and fold it into the session
    pub fn submit(&mut self, text: &str, elapsed: Option<Duration>) -> AnalysisOutcome {
        let mut input = AnalysisInput::new(text, self.context.clone());
        input.elapsed = elapsed;

        let outcome = self
            .analyzer
            .analyze(self.mode, &input, &self.aggregates, &mut self.rng);

        self.aggregates = outcome.aggregates;
        if let Some(report) = &outcome.report {
            self.score_sum += u64::from(report.scores.overall);
            self.scored += 1;
            self.latest = Some(report.clone());
        }
        self.record(&outcome.feedback);
        outcome
    }

    pub fn submit_utterance(&mut self, utterance: &Utterance) -> AnalysisOutcome {
        self.submit(&utterance.text, Some(utterance.end))
    }

    /// Argument-level review of recent speech.
    ///
    /// Runs against scratch totals so session counts are untouched, and
    /// returns at most the highest-priority argument issue.
    pub fn review(&mut self, recent: &str) -> Option<FeedbackItem> {
        let input = AnalysisInput::new(recent, self.context.clone());
        let outcome = self.analyzer.analyze(
            AnalysisMode::Essay,
            &input,
            &SessionAggregates::default(),
            &mut self.rng,
        );

        let item = outcome
            .feedback
            .into_iter()
            .find(|i| REVIEW_CATEGORIES.contains(&i.category));

        if let Some(item) = &item {
            debug!("Review flagged {}", item.category);
            self.record(std::slice::from_ref(item));
        }
        item
    }

    fn record(&mut self, items: &[FeedbackItem]) {
        self.feedback_items += items.len();
        self.history.extend(items.iter().cloned());
        debug!("Feedback history holds {} items", self.history.len());
    }

    pub fn summary(&self) -> SessionSummary {
        let average_score = if self.scored == 0 {
            0
        } else {
            (self.score_sum as f64 / self.scored as f64).round() as u32
        };
        SessionSummary {
            mode: self.mode,
            utterances: self.aggregates.utterances,
            total_words: self.aggregates.total_words,
            total_fillers: self.aggregates.total_fillers,
            filler_rate: self.aggregates.filler_rate(),
            elapsed_secs: self.aggregates.elapsed.as_secs_f64(),
            words_per_minute: self.aggregates.words_per_minute(),
            average_score,
            latest_score: self.latest.as_ref().map(|r| r.scores.overall),
            feedback_items: self.feedback_items,
        }
    }

}
