use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Side of the motion the speaker argues for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Government,
    Opposition,
}

impl Role {
    /// The other side of the house
    pub fn opposing(self) -> Self {
        match self {
            Role::Government => Role::Opposition,
            Role::Opposition => Role::Government,
        }
    }

    /// What the speaker is expected to argue about the motion
    pub fn stance(self) -> &'static str {
        match self {
            Role::Government => "this policy should be implemented",
            Role::Opposition => "this policy should be rejected",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Government => write!(f, "government"),
            Role::Opposition => write!(f, "opposition"),
        }
    }
}

impl FromStr for Role {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "government" | "gov" | "proposition" => Ok(Role::Government),
            "opposition" | "opp" => Ok(Role::Opposition),
            other => Err(InvalidInput::UnknownRole(other.to_string())),
        }
    }
}

/// A PEEL structural label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureElement {
    Point,
    Evidence,
    Explanation,
    Link,
}

impl StructureElement {
    /// All elements in PEEL order
    pub const PEEL: [StructureElement; 4] = [
        StructureElement::Point,
        StructureElement::Evidence,
        StructureElement::Explanation,
        StructureElement::Link,
    ];
}

impl fmt::Display for StructureElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StructureElement::Point => "point",
            StructureElement::Evidence => "evidence",
            StructureElement::Explanation => "explanation",
            StructureElement::Link => "link",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for StructureElement {
    type Err = InvalidInput;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "point" | "p" => Ok(StructureElement::Point),
            "evidence" | "e" => Ok(StructureElement::Evidence),
            "explanation" | "explain" => Ok(StructureElement::Explanation),
            "link" | "l" => Ok(StructureElement::Link),
            other => Err(InvalidInput::UnknownElement(other.to_string())),
        }
    }
}

/// Debate context supplied by the motion provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DebateContext {
    /// Motion text; `None` or blank disables the relevance check
    #[serde(default)]
    pub motion: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Structural labels the speaker is expected to cover, in order
    #[serde(default)]
    pub expected_elements: Vec<StructureElement>,
}

impl DebateContext {
    pub fn new(motion: impl Into<String>, role: Role) -> Self {
        Self {
            motion: Some(motion.into()),
            role,
            expected_elements: Vec::new(),
        }
    }

    pub fn with_expected_elements(mut self, elements: Vec<StructureElement>) -> Self {
        self.expected_elements = elements;
        self
    }

    /// The motion if one was given and it is not blank
    pub fn motion(&self) -> Option<&str> {
        self.motion
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// One block of text to analyze together with its debate context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Finalized utterance or accumulated transcript
    pub text: String,
    #[serde(default)]
    pub context: DebateContext,
    /// Offset of the end of this text from the start of the session
    #[serde(default)]
    pub elapsed: Option<Duration>,
}

impl AnalysisInput {
    pub fn new(text: impl Into<String>, context: DebateContext) -> Self {
        Self {
            text: text.into(),
            context,
            elapsed: None,
        }
    }

    pub fn at(mut self, elapsed: Duration) -> Self {
        self.elapsed = Some(elapsed);
        self
    }

    /// Reject input that cannot produce a meaningful analysis
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.text.trim().is_empty() {
            return Err(InvalidInput::EmptyText);
        }
        Ok(())
    }
}
