use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::Instant;

use crate::models::{FeedbackItem, Utterance};

/// Supplier of finalized utterances, in arrival order
#[allow(async_fn_in_trait)]
pub trait TranscriptSource {
    /// Next utterance, or `None` when the source is exhausted
    async fn next_utterance(&mut self) -> Result<Option<Utterance>>;
}

/// Delivers feedback to the speaker (terminal, speech synthesis, ...)
pub trait Speaker {
    fn speak(&mut self, item: &FeedbackItem) -> Result<()>;
}

/// One utterance per input line, timed against the moment the source was
/// created. Blank lines are skipped.
pub struct LineSource<R> {
    lines: Lines<R>,
    started: Instant,
    last_end: Duration,
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            started: Instant::now(),
            last_end: Duration::ZERO,
        }
    }
}

impl<R: AsyncBufRead + Unpin> TranscriptSource for LineSource<R> {
    async fn next_utterance(&mut self) -> Result<Option<Utterance>> {
        loop {
            let Some(line) = self
                .lines
                .next_line()
                .await
                .context("Failed to read transcript line")?
            else {
                return Ok(None);
            };

            let text = line.trim();
            if text.is_empty() {
                continue;
            }

            let end = self.started.elapsed();
            let utterance = Utterance::new(text, self.last_end, end);
            self.last_end = end;
            return Ok(Some(utterance));
        }
    }
}

/// Prints feedback as plain text lines
pub struct ConsoleSpeaker<W> {
    out: W,
}

impl<W: Write> ConsoleSpeaker<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Speaker for ConsoleSpeaker<W> {
    fn speak(&mut self, item: &FeedbackItem) -> Result<()> {
        writeln!(
            self.out,
            "[{}] {}: {} ({})",
            item.severity, item.title, item.message, item.suggestion
        )?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects spoken items, for callers that render later
impl Speaker for Vec<FeedbackItem> {
    fn speak(&mut self, item: &FeedbackItem) -> Result<()> {
        self.push(item.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedbackCategory, FeedbackKind, Severity};

    #[tokio::test]
    async fn test_line_source_skips_blank_lines() {
        let input: &[u8] = b"first point\n\n   \nsecond point\n";
        let mut source = LineSource::new(input);

        let first = source.next_utterance().await.unwrap().unwrap();
        let second = source.next_utterance().await.unwrap().unwrap();

        assert_eq!(first.text, "first point");
        assert_eq!(second.text, "second point");
        assert_eq!(second.start, first.end);
        assert!(source.next_utterance().await.unwrap().is_none());
    }

    #[test]
    fn test_console_speaker_format() {
        let item = FeedbackItem::new(
            FeedbackCategory::Pace,
            FeedbackKind::Warning,
            Severity::Medium,
            "Slow Down",
            "Speaking too fast",
            "Breathe.",
        );
        let mut out = Vec::new();
        ConsoleSpeaker::new(&mut out).speak(&item).unwrap();

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed, "[medium] Slow Down: Speaking too fast (Breathe.)\n");
    }
}
