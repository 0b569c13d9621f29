use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// What a feedback item is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackCategory {
    OffTopic,
    MissingStructure,
    MissingImpact,
    WeakEvidence,
    Overgeneralization,
    FillerWords,
    Pace,
    Encouragement,
}

impl fmt::Display for FeedbackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FeedbackCategory::OffTopic => "off_topic",
            FeedbackCategory::MissingStructure => "missing_structure",
            FeedbackCategory::MissingImpact => "missing_impact",
            FeedbackCategory::WeakEvidence => "weak_evidence",
            FeedbackCategory::Overgeneralization => "overgeneralization",
            FeedbackCategory::FillerWords => "filler_words",
            FeedbackCategory::Pace => "pace",
            FeedbackCategory::Encouragement => "encouragement",
        };
        write!(f, "{}", label)
    }
}

/// Presentation type of a feedback item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Warning,
    Info,
    Success,
}

/// How urgently the speaker should act on an item
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A single coaching message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: Uuid,
    pub category: FeedbackCategory,
    pub kind: FeedbackKind,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub suggestion: String,
    /// Score the item refers to, if any (e.g. relevance percentage)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_score: Option<u32>,
    pub timestamp: DateTime<Utc>,
}

impl FeedbackItem {
    /// The id stays nil until `assign_id` is called
    pub fn new(
        category: FeedbackCategory,
        kind: FeedbackKind,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::nil(),
            category,
            kind,
            severity,
            title: title.into(),
            message: message.into(),
            suggestion: suggestion.into(),
            related_score: None,
            timestamp: Utc::now(),
        }
    }

    /// Give the item a random v4 id drawn from `rng`
    pub fn assign_id<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut bytes = [0u8; 16];
        rng.fill(&mut bytes);
        self.id = Builder::from_random_bytes(bytes).into_uuid();
    }

    pub fn with_related_score(mut self, score: u32) -> Self {
        self.related_score = Some(score);
        self
    }

    /// True for anything other than encouragement
    pub fn is_negative(&self) -> bool {
        self.kind != FeedbackKind::Success
    }
}

/// Most recent feedback items of a session, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackHistory {
    capacity: usize,
    items: VecDeque<FeedbackItem>,
}

impl Default for FeedbackHistory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl FeedbackHistory {
    pub const DEFAULT_CAPACITY: usize = 10;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        }
    }

    /// Append items, evicting the oldest beyond capacity
    pub fn extend(&mut self, items: impl IntoIterator<Item = FeedbackItem>) {
        for item in items {
            if self.capacity == 0 {
                return;
            }
            if self.items.len() == self.capacity {
                self.items.pop_front();
            }
            self.items.push_back(item);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeedbackItem> {
        self.items.iter()
    }


    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

}
