use serde::{Deserialize, Serialize};

use crate::models::{FeatureSet, StructureElement};

/// Point/Evidence/Explanation/Link coverage of an argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeelReport {
    pub present: Vec<StructureElement>,
    pub missing: Vec<StructureElement>,
    pub points: u32,
    pub max_points: u32,
}

/// Points awarded for covering an element
pub fn element_weight(element: StructureElement) -> u32 {
    match element {
        StructureElement::Point => 3,
        StructureElement::Evidence => 2,
        StructureElement::Explanation => 2,
        StructureElement::Link => 1,
    }
}

pub fn element_detected(element: StructureElement, features: &FeatureSet) -> bool {
    match element {
        StructureElement::Point => features.has_point,
        StructureElement::Evidence => features.has_evidence,
        StructureElement::Explanation => features.has_impact,
        StructureElement::Link => features.has_link,
    }
}

/// Praise for a covered element
pub fn strength(element: StructureElement) -> &'static str {
    match element {
        StructureElement::Point => "Clear main point stated",
        StructureElement::Evidence => "Evidence provided",
        StructureElement::Explanation => "Good explanation of reasoning",
        StructureElement::Link => "Links back to main topic",
    }
}

/// What to do about a missing element
pub fn improvement(element: StructureElement) -> &'static str {
    match element {
        StructureElement::Point => "State your main argument more clearly",
        StructureElement::Evidence => "Add supporting evidence or examples",
        StructureElement::Explanation => "Explain how your evidence supports your point",
        StructureElement::Link => "Connect your argument back to the debate motion",
    }
}

impl PeelReport {
    /// Check the expected elements, or all four when none are given
    pub fn evaluate(expected: &[StructureElement], features: &FeatureSet) -> Self {
        let elements: &[StructureElement] = if expected.is_empty() {
            &StructureElement::PEEL
        } else {
            expected
        };

        let mut report = Self {
            present: Vec::new(),
            missing: Vec::new(),
            points: 0,
            max_points: 0,
        };

        for &element in elements {
            if report.present.contains(&element) || report.missing.contains(&element) {
                continue;
            }
            let weight = element_weight(element);
            report.max_points += weight;
            if element_detected(element, features) {
                report.points += weight;
                report.present.push(element);
            } else {
                report.missing.push(element);
            }
        }

        report
    }

    /// More than three quarters of the available points
    pub fn is_correct(&self) -> bool {
        self.points * 4 > self.max_points * 3
    }

    /// Practice reward, two per point
    pub fn xp(&self) -> u32 {
        self.points * 2
    }

    pub fn strengths(&self) -> Vec<&'static str> {
        self.present.iter().map(|&e| strength(e)).collect()
    }

    pub fn improvements(&self) -> Vec<&'static str> {
        self.missing.iter().map(|&e| improvement(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_peel_scores_eight() {
        let features = FeatureSet {
            has_point: true,
            has_evidence: true,
            has_impact: true,
            has_link: true,
            ..Default::default()
        };
        let report = PeelReport::evaluate(&[], &features);

        assert_eq!(report.points, 8);
        assert_eq!(report.max_points, 8);
        assert!(report.missing.is_empty());
        assert!(report.is_correct());
        assert_eq!(report.xp(), 16);
    }

    #[test]
    fn test_point_and_evidence_only_is_not_correct() {
        let features = FeatureSet {
            has_point: true,
            has_evidence: true,
            ..Default::default()
        };
        let report = PeelReport::evaluate(&[], &features);

        assert_eq!(report.points, 5);
        assert!(!report.is_correct());
        assert_eq!(
            report.missing,
            vec![StructureElement::Explanation, StructureElement::Link]
        );
        assert_eq!(
            report.improvements(),
            vec![
                "Explain how your evidence supports your point",
                "Connect your argument back to the debate motion"
            ]
        );
    }

    #[test]
    fn test_expected_subset_keeps_caller_order() {
        let features = FeatureSet::default();
        let report = PeelReport::evaluate(
            &[StructureElement::Link, StructureElement::Point, StructureElement::Link],
            &features,
        );

        assert_eq!(report.max_points, 4);
        assert_eq!(report.missing, vec![StructureElement::Link, StructureElement::Point]);
    }
}
