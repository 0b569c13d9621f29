use serde::{Deserialize, Serialize};

/// Root of a Deepgram pre-recorded transcription response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResponse {
    pub results: DeepgramResults,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramResults {
    pub channels: Vec<DeepgramChannel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramChannel {
    pub alternatives: Vec<DeepgramAlternative>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramAlternative {
    #[serde(default)]
    pub words: Vec<DeepgramWord>,
    #[serde(default)]
    pub transcript: Option<String>,
}

/// A single recognized word with timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramWord {
    pub word: String,
    /// Start timestamp in seconds
    pub start: f64,
    /// End timestamp in seconds
    pub end: f64,
    #[serde(default)]
    pub confidence: f64,
    /// Present only when diarization was requested
    #[serde(default)]
    pub speaker: Option<u32>,
    /// Word with casing and punctuation, when smart formatting was on
    #[serde(default)]
    pub punctuated_word: Option<String>,
}

impl DeepgramWord {
    /// The best text for display: punctuated if available
    pub fn text(&self) -> &str {
        self.punctuated_word.as_deref().unwrap_or(&self.word)
    }

    /// True when the punctuated form closes a sentence
    pub fn ends_sentence(&self) -> bool {
        self.punctuated_word
            .as_deref()
            .is_some_and(|w| w.ends_with(['.', '!', '?']))
    }

    pub fn start_ms(&self) -> u64 {
        (self.start.max(0.0) * 1000.0).round() as u64
    }

    pub fn end_ms(&self) -> u64 {
        (self.end.max(0.0) * 1000.0).round() as u64
    }
}

impl DeepgramResponse {
    /// Words of the first channel's first alternative
    pub fn words(&self) -> &[DeepgramWord] {
        self.results
            .channels
            .first()
            .and_then(|c| c.alternatives.first())
            .map(|a| a.words.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deepgram_response() {
        let json = r#"{
            "results": {
                "channels": [{
                    "alternatives": [{
                        "transcript": "homework is harmful",
                        "words": [
                            {"word": "homework", "start": 0.5, "end": 0.9, "confidence": 0.95, "punctuated_word": "Homework"},
                            {"word": "is", "start": 1.0, "end": 1.1, "confidence": 0.92, "speaker": 0},
                            {"word": "harmful", "start": 1.2, "end": 1.6, "confidence": 0.9, "punctuated_word": "harmful."}
                        ]
                    }]
                }]
            }
        }"#;

        let response: DeepgramResponse = serde_json::from_str(json).unwrap();
        let words = response.words();

        assert_eq!(words.len(), 3);
        assert_eq!(words[0].text(), "Homework");
        assert_eq!(words[1].text(), "is");
        assert_eq!(words[1].speaker, Some(0));
        assert_eq!(words[0].speaker, None);
        assert!(words[2].ends_sentence());
        assert!(!words[0].ends_sentence());
        assert_eq!(words[2].end_ms(), 1600);
    }
}
