use thiserror::Error;

/// Reasons an input is rejected before analysis.
///
/// The analyzer never surfaces these to the caller as failures: an
/// invalid input produces a no-op outcome instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("text is empty or whitespace only")]
    EmptyText,

    #[error("unknown debate role: {0} (expected government or opposition)")]
    UnknownRole(String),

    #[error("unknown structure element: {0} (expected point, evidence, explanation or link)")]
    UnknownElement(String),

    #[error("unknown analysis mode: {0} (expected essay, speech or practice)")]
    UnknownMode(String),
}
