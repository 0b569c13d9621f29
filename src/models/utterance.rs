use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A finalized piece of transcribed speech
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Utterance {
    pub text: String,
    /// Offset of the first word from the start of the session
    pub start: Duration,
    /// Offset of the last word from the start of the session
    pub end: Duration,
}

impl Utterance {
    pub fn new(text: impl Into<String>, start: Duration, end: Duration) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

