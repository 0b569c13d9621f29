use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::analysis::Vocabulary;
use crate::analysis::vocabulary::NormalizedText;
use crate::models::{MotionBrief, Role};

/// Shape of an opponent response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Opening,
    Counter,
    StrongCounter,
    Closing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rebuttal {
    pub round: u32,
    pub kind: ResponseKind,
    pub text: String,
}

/// Who said a debate message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    User,
    Opponent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateMessage {
    pub speaker: Participant,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct SparringConfig {
    pub max_rounds: u32,
    /// Inputs longer than this with evidence earn a strong counter
    pub strong_input_chars: usize,
}

impl Default for SparringConfig {
    fn default() -> Self {
        Self {
            max_rounds: 6,
            strong_input_chars: 100,
        }
    }
}

/// Simulated opponent arguing the other side of a motion.
///
/// Picks a canned rebuttal shape based on the round and on how well
/// supported the speaker's last argument was, then fills it with one of the
/// opposing side's key arguments.
pub struct SparringPartner {
    brief: MotionBrief,
    user_role: Role,
    config: SparringConfig,
    vocabulary: Vocabulary,
    round: u32,
    responses: u32,
    transcript: Vec<DebateMessage>,
}

impl SparringPartner {
    pub fn new(brief: MotionBrief, user_role: Role, config: SparringConfig) -> Self {
        Self {
            brief,
            user_role,
            config,
            vocabulary: Vocabulary::default(),
            round: 1,
            responses: 0,
            transcript: Vec::new(),
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    /// True once every round has been answered
    pub fn is_finished(&self) -> bool {
        self.responses >= self.config.max_rounds
    }

    pub fn opponent_role(&self) -> Role {
        self.user_role.opposing()
    }

    /// Opening message before the user's first argument
    pub fn welcome(&mut self) -> String {
        let text = format!(
            "Welcome to this debate on \"{}\". I'll be arguing for the {} side. I believe there are significant issues with your position. Please present your opening argument, and I'll respond accordingly.",
            self.brief.motion,
            self.opponent_role()
        );
        self.transcript.push(DebateMessage {
            speaker: Participant::Opponent,
            content: text.clone(),
        });
        text
    }

    fn is_strong(&self, input: &str) -> bool {
        let normalized = NormalizedText::new(input);
        input.chars().count() > self.config.strong_input_chars
            && normalized.contains_any(&self.vocabulary.evidence)
    }

    /// Which kind of response a round calls for
    pub fn choose_kind(&self, input: &str) -> ResponseKind {
        if self.round <= 1 {
            ResponseKind::Opening
        } else if self.round + 1 >= self.config.max_rounds {
            ResponseKind::Closing
        } else if self.is_strong(input) {
            ResponseKind::StrongCounter
        } else {
            ResponseKind::Counter
        }
    }

    /// Record the user's argument and answer it
    pub fn respond<R: Rng + ?Sized>(&mut self, input: &str, rng: &mut R) -> Rebuttal {
        let input = input.trim();
        self.transcript.push(DebateMessage {
            speaker: Participant::User,
            content: input.to_string(),
        });

        let kind = self.choose_kind(input);
        let text = self.compose(kind, rng);
        let rebuttal = Rebuttal {
            round: self.round,
            kind,
            text,
        };

        self.transcript.push(DebateMessage {
            speaker: Participant::Opponent,
            content: rebuttal.text.clone(),
        });
        self.responses += 1;
        self.round = (self.round + 1).min(self.config.max_rounds);
        rebuttal
    }

    fn compose<R: Rng + ?Sized>(&self, kind: ResponseKind, rng: &mut R) -> String {
        let arguments = self.brief.arguments(self.opponent_role());
        let nth = |i: usize| {
            arguments
                .get(i)
                .or_else(|| arguments.first())
                .map(String::as_str)
                .unwrap_or("your position does not hold up.")
        };
        let any = |rng: &mut R| {
            arguments
                .choose(rng)
                .map(String::as_str)
                .unwrap_or("your position does not hold up.")
        };
        let template = rng.gen_range(0..2);

        match (kind, template) {
            (ResponseKind::Opening, 0) => format!(
                "Thank you for that opening statement. However, I fundamentally disagree with your position. {} This is a critical point that undermines the foundation of your argument.",
                nth(0)
            ),
            (ResponseKind::Opening, _) => format!(
                "I appreciate your perspective, but there are several significant flaws in that reasoning. {} This is particularly important when we consider the real-world implications.",
                nth(1)
            ),
            (ResponseKind::Counter, 0) => format!(
                "While you make some valid points, your argument overlooks a fundamental issue: {} This significantly weakens your position.",
                any(rng)
            ),
            (ResponseKind::Counter, _) => format!(
                "I understand your perspective, but the evidence actually suggests otherwise. {} This contradicts your central claims.",
                any(rng)
            ),
            (ResponseKind::StrongCounter, 0) => format!(
                "You've presented a well-researched argument, and I respect the evidence you've provided. However, there's a critical counterpoint: {} Recent studies have shown that this correlation doesn't hold up under scrutiny.",
                any(rng)
            ),
            (ResponseKind::StrongCounter, _) => format!(
                "I acknowledge the strength of your evidence, but there's a significant methodological flaw in that reasoning. {} Leading experts consistently argue that this approach creates more problems than it solves.",
                any(rng)
            ),
            (ResponseKind::Closing, 0) => format!(
                "As we conclude this debate, I want to emphasize that while you've made some compelling points, the fundamental issues remain unresolved. {} The evidence clearly supports my position on this matter.",
                nth(0)
            ),
            (ResponseKind::Closing, _) => format!(
                "Thank you for this engaging debate. Throughout our discussion, it's become clear that {} The arguments I've presented demonstrate why this position is ultimately the most sound.",
                any(rng)
            ),
        }
    }

    /// Score for the user's side of the debate so far
    pub fn final_score(&self) -> u32 {
        debate_score(&self.transcript)
    }
}

/// `min(messages * 15 + average characters * 0.5, 100)` over user messages
pub fn debate_score(messages: &[DebateMessage]) -> u32 {
    let user: Vec<&DebateMessage> = messages
        .iter()
        .filter(|m| m.speaker == Participant::User)
        .collect();
    if user.is_empty() {
        return 0;
    }
    let total_chars: usize = user.iter().map(|m| m.content.chars().count()).sum();
    let average = total_chars as f64 / user.len() as f64;
    (user.len() as f64 * 15.0 + average * 0.5).min(100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::models::find_motion;

    fn partner() -> SparringPartner {
        SparringPartner::new(
            find_motion("homework-ban").unwrap(),
            Role::Government,
            SparringConfig::default(),
        )
    }

    #[test]
    fn test_round_progression() {
        let mut partner = partner();
        let mut rng = StdRng::seed_from_u64(1);
        let strong = "Research from several school districts shows that homework in primary school adds stress without improving test results at all.";

        let kinds: Vec<ResponseKind> = (0..6)
            .map(|i| {
                let input = if i == 2 { strong } else { "Homework is bad." };
                partner.respond(input, &mut rng).kind
            })
            .collect();

        assert_eq!(
            kinds,
            vec![
                ResponseKind::Opening,
                ResponseKind::Counter,
                ResponseKind::StrongCounter,
                ResponseKind::Counter,
                ResponseKind::Closing,
                ResponseKind::Closing,
            ]
        );
        assert_eq!(partner.round(), 6);
        assert!(partner.is_finished());
    }

    #[test]
    fn test_every_round_is_answered() {
        let mut rng = StdRng::seed_from_u64(3);
        for max_rounds in [2, 6] {
            let mut partner = SparringPartner::new(
                find_motion("homework-ban").unwrap(),
                Role::Government,
                SparringConfig {
                    max_rounds,
                    ..Default::default()
                },
            );

            let mut played = 0;
            let mut last = None;
            while !partner.is_finished() {
                last = Some(partner.respond("Homework is bad.", &mut rng));
                played += 1;
            }

            assert_eq!(played, max_rounds);
            let last = last.unwrap();
            assert_eq!(last.round, max_rounds);
            assert_eq!(last.kind, ResponseKind::Closing);
        }
    }

    #[test]
    fn test_rebuttal_uses_opposing_arguments() {
        let mut partner = partner();
        let mut rng = StdRng::seed_from_u64(2);
        let rebuttal = partner.respond("Homework is bad.", &mut rng);

        let brief = find_motion("homework-ban").unwrap();
        assert!(
            brief
                .opposition
                .iter()
                .any(|arg| rebuttal.text.contains(arg.as_str()))
        );
    }

    #[test]
    fn test_welcome_names_opponent_side() {
        let mut partner = partner();
        let text = partner.welcome();
        assert!(text.contains("opposition side"));
        assert!(text.contains("This house would ban homework in primary schools"));
        assert_eq!(partner.final_score(), 0);
    }

    #[test]
    fn test_debate_score() {
        let messages = vec![
            DebateMessage {
                speaker: Participant::User,
                content: "a".repeat(40),
            },
            DebateMessage {
                speaker: Participant::Opponent,
                content: "b".repeat(500),
            },
            DebateMessage {
                speaker: Participant::User,
                content: "c".repeat(20),
            },
        ];
        // 2 * 15 + 30 * 0.5
        assert_eq!(debate_score(&messages), 45);

        let long: Vec<DebateMessage> = (0..8)
            .map(|_| DebateMessage {
                speaker: Participant::User,
                content: "x".repeat(10),
            })
            .collect();
        assert_eq!(debate_score(&long), 100);
    }
}
