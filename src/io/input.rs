use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::models::{DeepgramResponse, DeepgramWord, Utterance};

/// How recognized words are grouped into utterances
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// A silence longer than this closes the current utterance
    pub max_pause_ms: u64,
    /// Close an utterance after a word that ends a sentence
    pub split_on_sentence_end: bool,
    /// Speaking rate used to time plain-text lines without a timestamp
    pub assumed_wpm: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_pause_ms: 800,
            split_on_sentence_end: true,
            assumed_wpm: 150.0,
        }
    }
}

/// Load a transcript file; `.json` is read as a Deepgram response, anything
/// else as one utterance per line.
pub fn load_transcript(path: &Path, config: &SegmentConfig) -> Result<Vec<Utterance>> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        parse_deepgram_file(path, config)
    } else {
        parse_text_file(path, config)
    }
}

/// Parse a Deepgram JSON file into utterances
pub fn parse_deepgram_file(path: &Path, config: &SegmentConfig) -> Result<Vec<Utterance>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_deepgram_json(&content, config)
}

/// Parse a Deepgram JSON string into utterances
pub fn parse_deepgram_json(json: &str, config: &SegmentConfig) -> Result<Vec<Utterance>> {
    let response: DeepgramResponse =
        serde_json::from_str(json).context("Failed to parse Deepgram JSON")?;
    let utterances = group_words(response.words(), config);
    debug!(
        "Grouped {} words into {} utterances",
        response.words().len(),
        utterances.len()
    );
    Ok(utterances)
}

/// Split a word stream at long pauses and sentence ends
pub fn group_words(words: &[DeepgramWord], config: &SegmentConfig) -> Vec<Utterance> {
    let mut utterances = Vec::new();
    let mut current: Vec<&DeepgramWord> = Vec::new();

    for word in words {
        let pause = current
            .last()
            .map(|prev| word.start_ms().saturating_sub(prev.end_ms()))
            .unwrap_or(0);
        if pause > config.max_pause_ms {
            flush(&mut current, &mut utterances);
        }

        current.push(word);

        if config.split_on_sentence_end && word.ends_sentence() {
            flush(&mut current, &mut utterances);
        }
    }
    flush(&mut current, &mut utterances);

    utterances
}

fn flush(current: &mut Vec<&DeepgramWord>, utterances: &mut Vec<Utterance>) {
    let (Some(first), Some(last)) = (current.first(), current.last()) else {
        return;
    };
    let text = current
        .iter()
        .map(|w| w.text())
        .collect::<Vec<_>>()
        .join(" ");
    utterances.push(Utterance::new(
        text,
        Duration::from_millis(first.start_ms()),
        Duration::from_millis(last.end_ms()),
    ));
    current.clear();
}

/// Parse a plain-text transcript file
pub fn parse_text_file(path: &Path, config: &SegmentConfig) -> Result<Vec<Utterance>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_text_transcript(&content, config)
}

/// One utterance per non-blank line, optionally prefixed with `[mm:ss]`.
///
/// Lines without a timestamp start where the previous one ended. Every line
/// lasts as long as its words take at the assumed speaking rate.
pub fn parse_text_transcript(content: &str, config: &SegmentConfig) -> Result<Vec<Utterance>> {
    let mut utterances = Vec::new();
    let mut last_end = Duration::ZERO;

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (stamp, text) = split_timestamp(line)
            .with_context(|| format!("Bad timestamp on line {}", index + 1))?;
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let start = stamp.unwrap_or(last_end);
        let words = text.split_whitespace().count() as f64;
        let spoken = Duration::from_secs_f64(words * 60.0 / config.assumed_wpm.max(1.0));
        let Some(end) = start.checked_add(spoken) else {
            bail!("Line {} ends beyond the representable time range", index + 1);
        };

        utterances.push(Utterance::new(text, start, end));
        last_end = end;
    }

    Ok(utterances)
}

/// Split a leading `[mm:ss]` or `[hh:mm:ss]` stamp from a line.
///
/// Other bracketed prefixes such as `[inaudible]` are transcriber markers;
/// they are dropped and the rest of the line is kept.
fn split_timestamp(line: &str) -> Result<(Option<Duration>, &str)> {
    let Some((stamp, text)) = line
        .strip_prefix('[')
        .and_then(|rest| rest.split_once(']'))
    else {
        return Ok((None, line));
    };

    let looks_like_time = stamp.contains(':')
        || (!stamp.trim().is_empty() && stamp.trim().chars().all(|c| c.is_ascii_digit()));
    if !looks_like_time || !stamp.chars().all(|c| c.is_ascii_digit() || c == ':' || c == ' ') {
        return Ok((None, text));
    }

    let parts: Vec<&str> = stamp.split(':').collect();
    if !(2..=3).contains(&parts.len()) {
        bail!("Expected [mm:ss], got [{}]", stamp);
    }

    let mut secs = 0u64;
    for part in parts {
        let value: u64 = part
            .trim()
            .parse()
            .with_context(|| format!("Invalid timestamp field {:?}", part))?;
        secs = secs
            .checked_mul(60)
            .and_then(|s| s.checked_add(value))
            .with_context(|| format!("Timestamp [{}] is out of range", stamp))?;
    }

    Ok((Some(Duration::from_secs(secs)), text))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_parse_deepgram_json() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "words": [
                            {"word": "homework", "start": 0.5, "end": 0.9, "confidence": 0.95, "punctuated_word": "Homework"},
                            {"word": "is", "start": 1.0, "end": 1.1, "confidence": 0.92},
                            {"word": "harmful", "start": 1.2, "end": 1.6, "confidence": 0.9, "punctuated_word": "harmful."},
                            {"word": "because", "start": 1.8, "end": 2.1, "confidence": 0.93},
                            {"word": "um", "start": 2.2, "end": 2.3, "confidence": 0.6},
                            {"word": "stress", "start": 3.5, "end": 3.9, "confidence": 0.91}
                        ]
                    }]
                }]
            }
        }"#;

        let utterances = parse_deepgram_json(json, &SegmentConfig::default()).unwrap();

        assert_eq!(utterances.len(), 3);
        // sentence end closes the first utterance
        assert_eq!(utterances[0].text, "Homework is harmful.");
        assert_eq!(utterances[0].start, Duration::from_millis(500));
        assert_eq!(utterances[0].end, Duration::from_millis(1600));
        // the 1.2s pause closes the second
        assert_eq!(utterances[1].text, "because um");
        assert_eq!(utterances[2].text, "stress");
        assert_eq!(utterances[2].end, Duration::from_millis(3900));
    }

    #[test]
    fn test_empty_response() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "words": []
                    }]
                }]
            }
        }"#;

        let utterances = parse_deepgram_json(json, &SegmentConfig::default()).unwrap();
        assert!(utterances.is_empty());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(parse_deepgram_json("{not json", &SegmentConfig::default()).is_err());
    }

    #[test]
    fn test_parse_text_transcript() {
        let content = "[00:05] First, homework causes stress.\n\nIt takes time from family.\n[01:02:03] Finally done.\n";
        let utterances = parse_text_transcript(content, &SegmentConfig::default()).unwrap();

        assert_eq!(utterances.len(), 3);
        assert_eq!(utterances[0].start, Duration::from_secs(5));
        // four words at 150 wpm
        assert_eq!(utterances[0].end, Duration::from_millis(6_600));
        assert_eq!(utterances[1].start, utterances[0].end);
        assert_eq!(utterances[1].text, "It takes time from family.");
        assert_eq!(utterances[2].start, Duration::from_secs(3_723));
    }

    #[test]
    fn test_bad_timestamp() {
        let config = SegmentConfig::default();
        assert!(parse_text_transcript("[5] hello", &config).is_err());
        assert!(parse_text_transcript("[1:2:3:4] hello", &config).is_err());
        assert!(parse_text_transcript("[00:] hello", &config).is_err());
    }

    #[test]
    fn test_huge_timestamp_is_an_error() {
        let config = SegmentConfig::default();
        let err = parse_text_transcript("[307445734561825861:00] hi", &config).unwrap_err();
        assert!(format!("{:#}", err).contains("out of range"));
        assert!(parse_text_transcript("[99999999999999999999:00] hi", &config).is_err());
        // fits in u64 seconds but not once the spoken time is added
        let line = format!("[0:{}] one two three", u64::MAX);
        assert!(parse_text_transcript(&line, &config).is_err());
    }

    #[test]
    fn test_transcriber_markers_are_dropped() {
        let content = "[inaudible] homework is harmful\nsecond line\n[applause]\n[00:10] third [laughs] line\n[00:05 unclosed";
        let utterances = parse_text_transcript(content, &SegmentConfig::default()).unwrap();

        let texts: Vec<&str> = utterances.iter().map(|u| u.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "homework is harmful",
                "second line",
                "third [laughs] line",
                "[00:05 unclosed",
            ]
        );
        assert_eq!(utterances[0].start, Duration::ZERO);
        assert_eq!(utterances[1].start, utterances[0].end);
        assert_eq!(utterances[2].start, Duration::from_secs(10));
    }

    #[test]
    fn test_load_transcript_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "homework is harmful").unwrap();

        let utterances = load_transcript(file.path(), &SegmentConfig::default()).unwrap();
        assert_eq!(utterances.len(), 1);
        assert_eq!(utterances[0].text, "homework is harmful");
    }
}
