use serde::{Deserialize, Serialize};

/// Fixed marker vocabularies used for feature detection.
///
/// Entries may be single words or multi-word phrases; both are matched on
/// whole normalized tokens, never on raw substrings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub evidence: Vec<String>,
    pub structure: Vec<String>,
    pub impact: Vec<String>,
    pub link: Vec<String>,
    pub fillers: Vec<String>,
    pub overgeneralization: Vec<String>,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            evidence: words(&[
                "study",
                "studies",
                "research",
                "data",
                "evidence",
                "example",
                "examples",
                "instance",
                "such as",
                "statistics",
            ]),
            structure: words(&[
                "first",
                "firstly",
                "second",
                "secondly",
                "finally",
                "however",
                "therefore",
                "because",
                "this shows",
                "this means",
                "overall",
                "in conclusion",
                "this supports",
            ]),
            impact: words(&[
                "because",
                "therefore",
                "this means",
                "this shows",
                "as a result",
                "which means",
            ]),
            link: words(&["overall", "in conclusion", "this supports", "to conclude"]),
            fillers: words(&["um", "uh", "like", "you know", "so", "actually", "basically"]),
            overgeneralization: words(&["everyone", "always", "never"]),
        }
    }
}

/// Lower-cased, punctuation-stripped word tokens of a text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedText {
    tokens: Vec<String>,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        let tokens = text
            .split_whitespace()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Number of times a word or phrase occurs as a whole-token sequence
    pub fn count(&self, phrase: &str) -> usize {
        let needle: Vec<String> = phrase
            .split_whitespace()
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();
        if needle.is_empty() || needle.len() > self.tokens.len() {
            return 0;
        }
        self.tokens
            .windows(needle.len())
            .filter(|window| *window == needle.as_slice())
            .count()
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.count(phrase) > 0
    }

    /// True if any listed word or phrase occurs
    pub fn contains_any(&self, phrases: &[String]) -> bool {
        phrases.iter().any(|p| self.contains(p))
    }

    /// Listed words or phrases that occur, in list order
    pub fn matches<'a>(&self, phrases: &'a [String]) -> Vec<&'a str> {
        phrases
            .iter()
            .filter(|p| self.contains(p))
            .map(String::as_str)
            .collect()
    }

    /// Total occurrences of all listed words or phrases
    pub fn count_all(&self, phrases: &[String]) -> usize {
        phrases.iter().map(|p| self.count(p)).sum()
    }
}

/// Lower-case a token and trim leading and trailing punctuation
pub fn normalize_token(raw: &str) -> String {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_punctuation() {
        let text = NormalizedText::new("Um, I THINK... (homework) is bad!");
        assert_eq!(text.tokens(), &["um", "i", "think", "homework", "is", "bad"]);
    }

    #[test]
    fn test_inner_apostrophe_kept() {
        assert_eq!(normalize_token("\"Don't\""), "don't");
    }

    #[test]
    fn test_phrase_matching_is_whole_token() {
        let text = NormalizedText::new("Updated metadata, such as dates, helps. You know?");
        assert!(!text.contains("data"));
        assert!(text.contains("such as"));
        assert!(text.contains("You know"));
        assert!(!text.contains("as dates helps you know now"));
    }

    #[test]
    fn test_count_repeated_fillers() {
        let vocabulary = Vocabulary::default();
        let text = NormalizedText::new("Um, so, um... you know, like, basically uh");
        // um x2, so, you know, like, basically, uh
        assert_eq!(text.count_all(&vocabulary.fillers), 7);
    }

    #[test]
    fn test_matches_in_list_order() {
        let vocabulary = Vocabulary::default();
        let text = NormalizedText::new("Never say everyone agrees");
        assert_eq!(text.matches(&vocabulary.overgeneralization), vec!["everyone", "never"]);
    }
}
