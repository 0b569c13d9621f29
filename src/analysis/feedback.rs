use crate::models::{
    DebateContext, FeatureSet, FeedbackCategory, FeedbackItem, FeedbackKind, Severity,
    StructureElement,
};

use super::pace::{PaceBand, SpeechMetrics};
use super::peel::{PeelReport, improvement};

/// Inputs the feedback rules look at
pub struct FeedbackSignals<'a> {
    pub features: &'a FeatureSet,
    pub context: &'a DebateContext,
    /// Run the structure, impact and evidence rules
    pub argument_checks: bool,
    pub peel: Option<&'a PeelReport>,
    pub speech: Option<&'a SpeechMetrics>,
    /// Filler count above which the filler item escalates to high severity
    pub filler_high_threshold: usize,
}

/// Map detected conditions to feedback items in priority order.
///
/// Off-topic text yields only the off-topic item. Otherwise items come in
/// the order structure, impact, evidence, overgeneralization, fillers, pace.
/// When nothing negative is found a single encouragement item is returned.
pub fn generate_feedback(signals: &FeedbackSignals<'_>) -> Vec<FeedbackItem> {
    let features = signals.features;

    if !features.is_relevant {
        return vec![off_topic(signals.context, features.relevance_ratio)];
    }

    let mut items = Vec::new();

    if signals.argument_checks {
        match signals.peel {
            Some(peel) => items.extend(peel_items(peel)),
            None => {
                if !(features.has_point && features.has_structure) {
                    items.push(missing_structure());
                }
                if !features.has_impact {
                    items.push(missing_impact());
                }
                if !features.has_evidence {
                    items.push(weak_evidence());
                }
            }
        }
    }

    if features.has_overgeneralization {
        items.push(overgeneralization(&features.overgeneralizations));
    }

    if features.filler_count > 0 {
        items.push(filler_words(features.filler_count, signals.filler_high_threshold));
    }

    if let Some(speech) = signals.speech {
        items.extend(pace(speech));
    }

    if items.is_empty() {
        items.push(encouragement(signals.speech.is_some()));
    }

    items
}

fn off_topic(context: &DebateContext, relevance_ratio: f64) -> FeedbackItem {
    let motion = context.motion().unwrap_or_default();
    FeedbackItem::new(
        FeedbackCategory::OffTopic,
        FeedbackKind::Warning,
        Severity::High,
        "Stay On Topic",
        format!(
            "Your argument seems to drift from the main motion: \"{}\". Try to directly address why {}.",
            motion,
            context.role.stance()
        ),
        "Refocus on the core issue and explain how your point directly supports your position.",
    )
    .with_related_score((relevance_ratio * 100.0).round() as u32)
}

fn missing_structure() -> FeedbackItem {
    FeedbackItem::new(
        FeedbackCategory::MissingStructure,
        FeedbackKind::Info,
        Severity::Medium,
        "Structure Your Argument",
        "Your argument needs a clearer structure. State your point, then signpost how you support it.",
        "Use signposts like \"First...\", \"However...\" or \"Therefore...\" to guide your audience.",
    )
}

fn missing_impact() -> FeedbackItem {
    FeedbackItem::new(
        FeedbackCategory::MissingImpact,
        FeedbackKind::Info,
        Severity::Medium,
        "Add Impact",
        "Your argument needs a stronger impact statement. Explain WHY your point matters.",
        "Add phrases like \"This is important because...\" or \"The consequence of this is...\"",
    )
}

fn weak_evidence() -> FeedbackItem {
    FeedbackItem::new(
        FeedbackCategory::WeakEvidence,
        FeedbackKind::Info,
        Severity::Low,
        "Strengthen Evidence",
        "Consider adding stronger evidence to support your claim.",
        "Reference studies, statistics, expert opinions, or concrete examples.",
    )
}

/// PEEL gaps, grouped into the same priority order as the generic rules
fn peel_items(peel: &PeelReport) -> Vec<FeedbackItem> {
    let mut structure = Vec::new();
    let mut impact = Vec::new();
    let mut evidence = Vec::new();

    for &element in &peel.missing {
        match element {
            StructureElement::Point | StructureElement::Link => {
                let severity = if element == StructureElement::Point {
                    Severity::Medium
                } else {
                    Severity::Low
                };
                structure.push(FeedbackItem::new(
                    FeedbackCategory::MissingStructure,
                    FeedbackKind::Info,
                    severity,
                    format!("Missing {}", element),
                    "Your argument needs more structure. Let's work on the PEEL format.",
                    improvement(element),
                ));
            }
            StructureElement::Explanation => {
                let mut item = missing_impact();
                item.suggestion = improvement(element).to_string();
                impact.push(item);
            }
            StructureElement::Evidence => {
                let mut item = weak_evidence();
                item.suggestion = improvement(element).to_string();
                evidence.push(item);
            }
        }
    }

    structure.into_iter().chain(impact).chain(evidence).collect()
}

fn overgeneralization(found: &[String]) -> FeedbackItem {
    let quoted: Vec<String> = found.iter().map(|w| format!("\"{}\"", w)).collect();
    let examples = if quoted.is_empty() {
        "\"everyone\" or \"always\"".to_string()
    } else {
        quoted.join(", ")
    };
    FeedbackItem::new(
        FeedbackCategory::Overgeneralization,
        FeedbackKind::Warning,
        Severity::Medium,
        "Avoid Overgeneralization",
        format!("Be careful with absolute statements like {}.", examples),
        "Use more precise language: \"many people\" or \"often\" instead.",
    )
}

fn filler_words(count: usize, high_threshold: usize) -> FeedbackItem {
    let severity = if count > high_threshold {
        Severity::High
    } else {
        Severity::Medium
    };
    FeedbackItem::new(
        FeedbackCategory::FillerWords,
        FeedbackKind::Warning,
        severity,
        "Filler Words",
        format!(
            "Detected {} filler word{}",
            count,
            if count == 1 { "" } else { "s" }
        ),
        "Try to pause instead of using filler words. Take a breath and continue.",
    )
    .with_related_score(count as u32)
}

fn pace(speech: &SpeechMetrics) -> Option<FeedbackItem> {
    let wpm = speech.words_per_minute.round() as u32;
    match speech.pace {
        PaceBand::TooFast => Some(
            FeedbackItem::new(
                FeedbackCategory::Pace,
                FeedbackKind::Warning,
                Severity::Medium,
                "Slow Down",
                "Speaking too fast",
                "Slow down to improve clarity and audience comprehension.",
            )
            .with_related_score(wpm),
        ),
        PaceBand::TooSlow => Some(
            FeedbackItem::new(
                FeedbackCategory::Pace,
                FeedbackKind::Info,
                Severity::Low,
                "Pick Up The Pace",
                "Speaking too slowly",
                "Increase your pace slightly to maintain audience engagement.",
            )
            .with_related_score(wpm),
        ),
        PaceBand::Ideal | PaceBand::Acceptable => None,
    }
}

fn encouragement(live: bool) -> FeedbackItem {
    let (message, suggestion) = if live {
        (
            "Clear, steady delivery. Keep it up.",
            "Keep using pauses instead of fillers as you move to your next point.",
        )
    } else {
        (
            "Good work! Your argument is relevant, supported and well structured.",
            "Try anticipating the strongest rebuttal and answering it in advance.",
        )
    };
    FeedbackItem::new(
        FeedbackCategory::Encouragement,
        FeedbackKind::Success,
        Severity::Low,
        "Nice Work",
        message,
        suggestion,
    )
}
