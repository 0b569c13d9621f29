use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;

use crate::analysis::AnalysisOutcome;
use crate::models::{DebateContext, FeedbackItem};
use crate::session::{PracticeSession, ReplayResult, SessionSummary};

/// Machine-readable report of a replayed session
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub context: DebateContext,
    pub summary: SessionSummary,
    pub utterances: Vec<UtteranceReport>,
    /// Findings of the rolling argument review
    pub reviews: Vec<ReviewReport>,
    /// The most recent feedback items the session kept
    pub history: Vec<FeedbackItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UtteranceReport {
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
    pub overall: Option<u32>,
    pub words_per_minute: Option<f64>,
    pub feedback: Vec<FeedbackItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewReport {
    pub at_ms: u64,
    pub item: FeedbackItem,
}

impl SessionReport {
    /// Collect the state of a session after a replay
    pub fn from_replay<R: Rng>(session: &PracticeSession<R>, result: &ReplayResult) -> Self {
        let utterances = result
            .outcomes
            .iter()
            .map(|(utterance, outcome)| UtteranceReport {
                start_ms: utterance.start.as_millis() as u64,
                end_ms: utterance.end.as_millis() as u64,
                text: utterance.text.clone(),
                overall: outcome.scores().map(|s| s.overall),
                words_per_minute: outcome
                    .report
                    .as_ref()
                    .and_then(|r| r.speech.as_ref())
                    .map(|m| m.words_per_minute),
                feedback: outcome.feedback.clone(),
                skipped: outcome.skipped.clone(),
            })
            .collect();

        let reviews = result
            .reviews
            .iter()
            .map(|(at, item)| ReviewReport {
                at_ms: at.as_millis() as u64,
                item: item.clone(),
            })
            .collect();

        Self {
            context: session.context().clone(),
            summary: session.summary(),
            utterances,
            reviews,
            history: session.history().iter().cloned().collect(),
        }
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable session report
pub struct HumanReport<'a> {
    report: &'a SessionReport,
}

impl<'a> HumanReport<'a> {
    pub fn new(report: &'a SessionReport) -> Self {
        Self { report }
    }

    /// Format the report as plain text
    pub fn format(&self) -> String {
        let report = self.report;
        let mut output = String::new();

        if let Some(motion) = report.context.motion() {
            let _ = writeln!(output, "Motion: {} ({})", motion, report.context.role);
        }
        let _ = writeln!(output, "Mode: {}", report.summary.mode);
        output.push('\n');

        for utterance in &report.utterances {
            let _ = write!(output, "[{}]", format_timestamp(utterance.start_ms));
            match utterance.overall {
                Some(overall) => {
                    let _ = write!(output, " score {}", overall);
                }
                None => output.push_str(" skipped"),
            }
            if let Some(wpm) = utterance.words_per_minute {
                let _ = write!(output, ", {:.0} wpm", wpm);
            }
            output.push('\n');
            output.push_str(&wrap_text(&utterance.text, 80));
            output.push('\n');
            for item in &utterance.feedback {
                let _ = writeln!(output, "  - {}", format_item(item));
            }
            output.push('\n');
        }

        if !report.reviews.is_empty() {
            output.push_str("Argument review\n");
            output.push_str("---------------\n");
            for review in &report.reviews {
                let _ = writeln!(
                    output,
                    "[{}] {}",
                    format_timestamp(review.at_ms),
                    format_item(&review.item)
                );
            }
            output.push('\n');
        }

        let summary = &report.summary;
        output.push_str("Summary\n");
        output.push_str("-------\n");
        let _ = writeln!(output, "Utterances: {}", summary.utterances);
        let _ = writeln!(output, "Words: {}", summary.total_words);
        let _ = writeln!(
            output,
            "Filler words: {} ({:.1} per 100 words)",
            summary.total_fillers, summary.filler_rate
        );
        let _ = writeln!(output, "Duration: {:.1}s", summary.elapsed_secs);
        let _ = writeln!(output, "Pace: {:.0} wpm", summary.words_per_minute);
        let _ = writeln!(output, "Average score: {}", summary.average_score);
        let _ = writeln!(output, "Feedback items: {}", summary.feedback_items);

        output
    }

    /// Write to a text file
    pub fn write_file(&self, path: &Path) -> Result<()> {
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        write!(file, "{}", self.format())?;
        Ok(())
    }
}

/// Plain-text rendering of a single analysis
pub fn format_outcome(outcome: &AnalysisOutcome) -> String {
    let mut output = String::new();

    let Some(report) = &outcome.report else {
        let reason = outcome.skipped.as_deref().unwrap_or("nothing to analyze");
        let _ = writeln!(output, "Skipped: {}", reason);
        return output;
    };

    let _ = writeln!(output, "Overall: {} ({})", report.scores.overall, report.mode);
    for (dimension, value) in &report.scores.dimensions {
        let _ = writeln!(output, "  {:<10} {:>3.0}", dimension.to_string(), value);
    }

    if let Some(peel) = &report.peel {
        let _ = writeln!(
            output,
            "PEEL: {}/{} points, {} XP{}",
            peel.points,
            peel.max_points,
            peel.xp(),
            if peel.is_correct() { ", correct" } else { "" }
        );
        for strength in peel.strengths() {
            let _ = writeln!(output, "  + {}", strength);
        }
        for improvement in peel.improvements() {
            let _ = writeln!(output, "  - {}", improvement);
        }
    }

    if let Some(speech) = &report.speech {
        let _ = writeln!(
            output,
            "Pace: {:.0} wpm ({:?})",
            speech.words_per_minute, speech.pace
        );
    }

    output.push('\n');
    for item in &outcome.feedback {
        let _ = writeln!(output, "{}", format_item(item));
        let _ = writeln!(output, "    {}", item.suggestion);
    }

    output
}

fn format_item(item: &FeedbackItem) -> String {
    format!("[{}] {}: {}", item.severity, item.title, item.message)
}

/// Format milliseconds as MM:SS.mmm
fn format_timestamp(ms: u64) -> String {
    let seconds = ms / 1000;
    let millis = ms % 1000;
    let minutes = seconds / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}.{:03}", minutes, secs, millis)
}

/// Wrap text at approximately the given width
fn wrap_text(text: &str, width: usize) -> String {
    let mut result = String::new();
    let mut line_len = 0;

    for word in text.split_whitespace() {
        if line_len + word.len() + 1 > width && line_len > 0 {
            result.push('\n');
            line_len = 0;
        }
        if line_len > 0 {
            result.push(' ');
            line_len += 1;
        }
        result.push_str(word);
        line_len += word.len();
    }

    result
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::analysis::{AnalysisMode, Analyzer};
    use crate::models::{AnalysisInput, Role, SessionAggregates, Utterance};
    use crate::session::{LiveConfig, replay, seeded_rng};

    fn replayed() -> SessionReport {
        let mut session = PracticeSession::new(
            Analyzer::default(),
            DebateContext::new("This house would ban homework", Role::Opposition),
            AnalysisMode::Speech,
            seeded_rng(Some(5)),
        );
        let utterances = vec![
            Utterance::new("Um, homework matters.", Duration::ZERO, Duration::from_secs(2)),
            Utterance::new("   ", Duration::from_secs(2), Duration::from_secs(3)),
            Utterance::new(
                "Cats are cute.",
                Duration::from_secs(3),
                Duration::from_secs(5),
            ),
        ];
        let result = replay(&mut session, &utterances, &LiveConfig::default());
        SessionReport::from_replay(&session, &result)
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00.000");
        assert_eq!(format_timestamp(1500), "00:01.500");
        assert_eq!(format_timestamp(65_000), "01:05.000");
        assert_eq!(format_timestamp(3_661_500), "61:01.500");
    }

    #[test]
    fn test_wrap_text() {
        let text = "This is a test of the text wrapping function that should wrap at 20 chars";
        let wrapped = wrap_text(text, 20);
        for line in wrapped.lines() {
            assert!(line.len() <= 25);
        }
    }

    #[test]
    fn test_session_report_from_replay() {
        let report = replayed();

        assert_eq!(report.utterances.len(), 3);
        assert!(report.utterances[0].overall.is_some());
        assert!(report.utterances[0].words_per_minute.is_some());
        assert!(report.utterances[1].overall.is_none());
        assert!(report.utterances[1].skipped.is_some());
        assert_eq!(report.summary.utterances, 2);
        assert_eq!(report.summary.total_fillers, 1);
        assert!(report.history.len() <= 10);
    }

    #[test]
    fn test_write_json() {
        let report = replayed();
        let file = tempfile::NamedTempFile::new().unwrap();
        report.write_json(file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["summary"]["mode"], "speech");
        assert_eq!(value["context"]["role"], "opposition");
        assert_eq!(value["utterances"].as_array().unwrap().len(), 3);
        assert!(value["utterances"][0].get("skipped").is_none());
    }

    #[test]
    fn test_human_report() {
        let report = replayed();
        let text = HumanReport::new(&report).format();

        assert!(text.starts_with("Motion: This house would ban homework (opposition)"));
        assert!(text.contains("[00:00.000] score"));
        assert!(text.contains("[00:02.000] skipped"));
        assert!(text.contains("Filler words: 1"));

        let file = tempfile::NamedTempFile::new().unwrap();
        HumanReport::new(&report).write_file(file.path()).unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), text);
    }

    #[test]
    fn test_format_outcome() {
        let analyzer = Analyzer::default();
        let input = AnalysisInput::new(
            "Cats are nice.",
            DebateContext::new("This house would ban homework", Role::Government),
        );
        let outcome = analyzer.analyze(
            AnalysisMode::Essay,
            &input,
            &SessionAggregates::default(),
            &mut seeded_rng(Some(1)),
        );
        let text = format_outcome(&outcome);
        assert!(text.starts_with("Overall: "));
        assert!(text.contains("structure"));
        assert!(text.contains("Stay On Topic"));

        let skipped = analyzer.analyze(
            AnalysisMode::Essay,
            &AnalysisInput::new("", DebateContext::default()),
            &SessionAggregates::default(),
            &mut seeded_rng(Some(1)),
        );
        assert!(format_outcome(&skipped).starts_with("Skipped: "));
    }
}
