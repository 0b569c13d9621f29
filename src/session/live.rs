use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info};

use crate::analysis::AnalysisOutcome;
use crate::models::{FeedbackItem, Utterance};

use super::{PracticeSession, RollingBuffer, Speaker, TranscriptSource};

/// Timing of the rolling argument review
#[derive(Debug, Clone)]
pub struct LiveConfig {
    /// How often recent speech is re-analyzed for argument issues
    pub review_interval: Duration,
    /// How many recent utterances a review looks at
    pub review_window: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            review_interval: Duration::from_secs(3),
            review_window: 3,
        }
    }
}

/// Everything produced while replaying a recorded transcript
#[derive(Debug, Default)]
pub struct ReplayResult {
    /// One outcome per utterance, in order
    pub outcomes: Vec<(Utterance, AnalysisOutcome)>,
    /// Review findings with the transcript time they were raised at
    pub reviews: Vec<(Duration, FeedbackItem)>,
}

/// Replay recorded utterances through a session.
///
/// Reviews are scheduled on transcript time instead of wall-clock time so
/// the result is reproducible.
pub fn replay<R: Rng>(
    session: &mut PracticeSession<R>,
    utterances: &[Utterance],
    config: &LiveConfig,
) -> ReplayResult {
    let mut result = ReplayResult::default();
    let mut buffer = RollingBuffer::new(config.review_window);
    let mut last_review = Duration::ZERO;

    for utterance in utterances {
        let outcome = session.submit_utterance(utterance);
        if !outcome.is_skipped() {
            buffer.push(utterance.text.as_str());
        }
        result.outcomes.push((utterance.clone(), outcome));

        if utterance.end.saturating_sub(last_review) >= config.review_interval {
            last_review = utterance.end;
            if let Some(item) = session.review(&buffer.joined()) {
                result.reviews.push((utterance.end, item));
            }
        }
    }

    info!(
        "Replayed {} utterances, {} review findings",
        result.outcomes.len(),
        result.reviews.len()
    );
    result
}

/// Analyze utterances as they arrive and review recent speech on a timer.
///
/// Returns when the source is exhausted. Calls into the session are
/// serialized by this loop.
pub async fn run_live<R, S, K>(
    session: &mut PracticeSession<R>,
    source: &mut S,
    speaker: &mut K,
    config: &LiveConfig,
) -> Result<()>
where
    R: Rng,
    S: TranscriptSource,
    K: Speaker,
{
    let mut buffer = RollingBuffer::new(config.review_window);
    let mut dirty = false;
    let mut ticker = time::interval(config.review_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            next = source.next_utterance() => {
                let Some(utterance) = next? else {
                    break;
                };
                let outcome = session.submit_utterance(&utterance);
                if outcome.is_skipped() {
                    continue;
                }
                buffer.push(utterance.text.as_str());
                dirty = true;
                for item in &outcome.feedback {
                    speaker.speak(item)?;
                }
            }
            _ = ticker.tick() => {
                if !dirty {
                    continue;
                }
                dirty = false;
                if let Some(item) = session.review(&buffer.joined()) {
                    speaker.speak(&item)?;
                }
            }
        }
    }

    if dirty {
        debug!("Final review of trailing speech");
        if let Some(item) = session.review(&buffer.joined()) {
            speaker.speak(&item)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisMode, Analyzer};
    use crate::models::{DebateContext, FeedbackCategory, Role};
    use crate::session::{LineSource, seeded_rng};

    fn session() -> PracticeSession {
        PracticeSession::new(
            Analyzer::default(),
            DebateContext::new("This house would ban homework", Role::Government),
            AnalysisMode::Speech,
            seeded_rng(Some(23)),
        )
    }

    fn utterance(text: &str, start: u64, end: u64) -> Utterance {
        Utterance::new(text, Duration::from_secs(start), Duration::from_secs(end))
    }

    #[test]
    fn test_replay_reviews_on_transcript_time() {
        let mut session = session();
        let utterances = vec![
            utterance("Um, cats are nice.", 0, 1),
            utterance("Dogs too.", 1, 2),
            utterance("Birds are fine.", 2, 4),
            utterance("Fish swim.", 4, 5),
        ];

        let result = replay(&mut session, &utterances, &LiveConfig::default());

        assert_eq!(result.outcomes.len(), 4);
        // reviews at 4s; the window then holds three short off-topic lines
        assert_eq!(result.reviews.len(), 1);
        assert_eq!(result.reviews[0].0, Duration::from_secs(4));
        assert_eq!(result.reviews[0].1.category, FeedbackCategory::OffTopic);
        assert_eq!(session.aggregates().total_fillers, 1);
    }

    #[tokio::test]
    async fn test_run_live_speaks_feedback_and_final_review() {
        let mut session = session();
        let input: &[u8] = b"um so homework\nuh cats\n";
        let mut source = LineSource::new(input);
        let mut spoken: Vec<FeedbackItem> = Vec::new();

        run_live(&mut session, &mut source, &mut spoken, &LiveConfig::default())
            .await
            .unwrap();

        assert_eq!(session.aggregates().utterances, 2);
        assert_eq!(session.aggregates().total_fillers, 3);
        assert!(spoken.iter().any(|i| i.category == FeedbackCategory::FillerWords));
        // "um so homework uh cats" mentions the motion but has no structure
        assert_eq!(
            spoken.last().unwrap().category,
            FeedbackCategory::MissingStructure
        );
    }

    #[tokio::test]
    async fn test_run_live_on_empty_source() {
        let mut session = session();
        let input: &[u8] = b"\n   \n";
        let mut source = LineSource::new(input);
        let mut spoken: Vec<FeedbackItem> = Vec::new();

        run_live(&mut session, &mut source, &mut spoken, &LiveConfig::default())
            .await
            .unwrap();

        assert!(spoken.is_empty());
        assert_eq!(session.aggregates().utterances, 0);
    }
}
