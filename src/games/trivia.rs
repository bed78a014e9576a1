//! # Feature: Trivia
//!
//! One open question per channel; the first non-bot reply inside the answer
//! window is judged.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::seq::IndexedRandom;
use serenity::builder::CreateEmbed;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::trivia_data::TRIVIA_QUESTIONS;
use crate::embeds::{DARK_RED, GOLD, GREEN, ORANGE, RED};

pub const ANSWER_WINDOW: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriviaOutcome {
    Correct,
    Close,
    Incorrect,
}

/// Exact match wins; containment either way counts as close.
pub fn judge(answer: &str, guess: &str) -> TriviaOutcome {
    let answer = answer.trim().to_lowercase();
    let guess = guess.trim().to_lowercase();

    if guess == answer {
        TriviaOutcome::Correct
    } else if answer.contains(&guess) || guess.contains(&answer) {
        TriviaOutcome::Close
    } else {
        TriviaOutcome::Incorrect
    }
}

pub fn random_question() -> (&'static str, &'static str) {
    TRIVIA_QUESTIONS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(("What is the capital of Australia?", "canberra"))
}

#[derive(Debug, Clone)]
struct ActiveRound {
    round_id: u64,
    answer: String,
}

/// Judged reply for the round that was open in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub outcome: TriviaOutcome,
    pub answer: String,
}

#[derive(Clone, Default)]
pub struct TriviaRounds {
    rounds: Arc<DashMap<u64, ActiveRound>>,
    next_id: Arc<AtomicU64>,
}

impl TriviaRounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a round, or `None` when the channel already has one.
    pub fn start(&self, channel_id: u64, answer: &str) -> Option<u64> {
        match self.rounds.entry(channel_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                let round_id = self.next_id.fetch_add(1, Ordering::Relaxed);
                slot.insert(ActiveRound {
                    round_id,
                    answer: answer.to_lowercase(),
                });
                Some(round_id)
            }
        }
    }

    pub fn is_active(&self, channel_id: u64) -> bool {
        self.rounds.contains_key(&channel_id)
    }

    /// Closes the channel's round with this reply. Blank replies are ignored.
    pub fn answer(&self, channel_id: u64, content: &str) -> Option<Verdict> {
        if content.trim().is_empty() {
            return None;
        }
        let (_, round) = self.rounds.remove(&channel_id)?;
        Some(Verdict {
            outcome: judge(&round.answer, content),
            answer: round.answer,
        })
    }

    /// Closes the round if it is still the one that was started; returns its answer.
    pub fn expire(&self, channel_id: u64, round_id: u64) -> Option<String> {
        self.rounds
            .remove_if(&channel_id, |_, round| round.round_id == round_id)
            .map(|(_, round)| round.answer)
    }
}

pub fn question_embed(question: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🧠 Trivia Time!")
        .description(question)
        .colour(GOLD)
        .footer(|f| f.text("Type your answer in chat! (30 seconds)"));
    embed
}

pub fn verdict_embed(verdict: &Verdict, mention: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    match verdict.outcome {
        TriviaOutcome::Correct => embed
            .title("🎉 Correct!")
            .description(format!(
                "{} got it right!\nThe answer was: **{}**",
                mention, verdict.answer
            ))
            .colour(GREEN),
        TriviaOutcome::Close => embed
            .title("❌ Close, but not quite!")
            .description(format!("The correct answer was: **{}**", verdict.answer))
            .colour(ORANGE),
        TriviaOutcome::Incorrect => embed
            .title("❌ Incorrect!")
            .description(format!("The correct answer was: **{}**", verdict.answer))
            .colour(RED),
    };
    embed
}

pub fn timeout_embed(answer: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("⏰ Time's up!")
        .description(format!("The correct answer was: **{}**", answer))
        .colour(DARK_RED);
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{description, title};

    #[test]
    fn test_judge() {
        assert_eq!(judge("canberra", "  Canberra "), TriviaOutcome::Correct);
        assert_eq!(judge("leonardo da vinci", "da vinci"), TriviaOutcome::Close);
        assert_eq!(judge("mars", "planet mars"), TriviaOutcome::Close);
        assert_eq!(judge("canberra", "sydney"), TriviaOutcome::Incorrect);
    }

    #[test]
    fn test_one_round_per_channel() {
        let rounds = TriviaRounds::new();
        assert!(rounds.start(1, "canberra").is_some());
        assert!(rounds.start(1, "paris").is_none());
        assert!(rounds.start(2, "paris").is_some());
    }

    #[test]
    fn test_first_answer_closes_round() {
        let rounds = TriviaRounds::new();
        rounds.start(1, "Canberra");

        assert_eq!(rounds.answer(1, "   "), None);
        let verdict = rounds.answer(1, "canberra").unwrap();
        assert_eq!(verdict.outcome, TriviaOutcome::Correct);
        assert_eq!(verdict.answer, "canberra");
        assert!(!rounds.is_active(1));
        assert_eq!(rounds.answer(1, "canberra"), None);
    }

    #[test]
    fn test_stale_expiry_does_not_close_new_round() {
        let rounds = TriviaRounds::new();
        let first = rounds.start(1, "a").unwrap();
        rounds.answer(1, "b");
        let second = rounds.start(1, "c").unwrap();

        assert_eq!(rounds.expire(1, first), None);
        assert!(rounds.is_active(1));
        assert_eq!(rounds.expire(1, second).as_deref(), Some("c"));
    }

    #[test]
    fn test_verdict_embed() {
        let verdict = Verdict {
            outcome: TriviaOutcome::Correct,
            answer: "1912".to_string(),
        };
        let embed = verdict_embed(&verdict, "<@5>");
        assert_eq!(title(&embed), Some("🎉 Correct!"));
        assert_eq!(
            description(&embed),
            Some("<@5> got it right!\nThe answer was: **1912**")
        );
        assert_eq!(title(&timeout_embed("x")), Some("⏰ Time's up!"));
    }
}
