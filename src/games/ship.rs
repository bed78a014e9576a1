//! # Feature: Ship
//!
//! Love-compatibility score between two members, drawn as a flame bar.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release; avatars shown as embed images

use rand::seq::IndexedRandom;
use rand::Rng;
use serenity::builder::CreateEmbed;
use serenity::utils::Colour;

pub const BAR_SEGMENTS: usize = 11;

const FILLED: &str = "🔥";
const EMPTY: &str = "🩶";

pub const LOVE_QUOTES: &[&str] = &[
    "Love is composed of a single soul inhabiting two bodies.",
    "The heart has its reasons which reason knows nothing of.",
    "Love recognizes no barriers. It jumps hurdles, leaps fences, penetrates walls.",
];

/// Random 0..=100, with a 10..=20 bonus when both names have the same length.
pub fn compatibility_score<R: Rng + ?Sized>(rng: &mut R, name_one: &str, name_two: &str) -> u8 {
    let mut score: u32 = rng.random_range(0..=100);
    if name_one.chars().count() == name_two.chars().count() {
        score += rng.random_range(10..=20);
    }
    score.min(100) as u8
}

pub fn heart_and_comment(score: u8) -> (&'static str, &'static str) {
    match score {
        100 => ("💖", "It's PERFECT! You two are a match made in heaven!"),
        90..=99 => ("💗", "✨ Absolutely destined souls!"),
        70..=89 => ("💓", "Something special is brewing..."),
        50..=69 => ("💕", "There's a spark worth igniting."),
        30..=49 => ("💔", "The flame flickers, but it's not too bright..."),
        _ => ("⚠️", "Not quite a match, perhaps best as friends."),
    }
}

pub fn score_colour(score: u8) -> Colour {
    match score {
        90..=100 => Colour::from_rgb(255, 20, 147),
        70..=89 => Colour::from_rgb(255, 105, 180),
        50..=69 => Colour::from_rgb(219, 112, 147),
        30..=49 => Colour::from_rgb(176, 196, 222),
        _ => Colour::from_rgb(169, 169, 169),
    }
}

/// Flame bar with the percentage in the middle segment.
pub fn love_bar(score: u8) -> String {
    let center = BAR_SEGMENTS / 2;
    let filled = if score >= 100 {
        BAR_SEGMENTS
    } else {
        (f64::from(score) / 100.0 * (BAR_SEGMENTS - 1) as f64).round() as usize
    };

    (0..BAR_SEGMENTS)
        .map(|i| {
            if i == center {
                format!("✨`{}%`✨", score)
            } else if i < filled {
                FILLED.to_string()
            } else {
                EMPTY.to_string()
            }
        })
        .collect()
}

pub struct ShipPair<'a> {
    pub name_one: &'a str,
    pub name_two: &'a str,
    pub avatar_one: String,
    pub avatar_two: String,
    pub requested_by: &'a str,
}

pub fn ship_embed(pair: &ShipPair<'_>, score: u8, quote: &str) -> CreateEmbed {
    let (heart, comment) = heart_and_comment(score);
    let link = if score > 50 { "❤️" } else { "💔" };
    let rule = "━".repeat(31);

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("{}  Compatibility Result {}", heart, link))
        .description(format!(
            "**{}**  {}  **{}**\n\n{}\n{}\n{}\n*{}*\n\n_{}_",
            pair.name_one,
            link,
            pair.name_two,
            rule,
            love_bar(score),
            rule,
            comment,
            quote
        ))
        .colour(score_colour(score))
        .thumbnail(&pair.avatar_one)
        .image(&pair.avatar_two)
        .footer(|f| f.text(format!("Requested by {}", pair.requested_by)));
    embed
}

pub fn random_quote() -> &'static str {
    LOVE_QUOTES.choose(&mut rand::rng()).copied().unwrap_or(LOVE_QUOTES[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{colour, footer};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_score_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let score = compatibility_score(&mut rng, "anna", "bobs");
            assert!(score <= 100);
            let score = compatibility_score(&mut rng, "anna", "bob");
            assert!(score <= 100);
        }
    }

    #[test]
    fn test_equal_name_bonus_raises_floor() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            assert!(compatibility_score(&mut rng, "abc", "xyz") >= 10);
        }
    }

    #[test]
    fn test_comment_tiers() {
        assert!(heart_and_comment(100).1.contains("PERFECT"));
        assert_eq!(heart_and_comment(95).1, "✨ Absolutely destined souls!");
        assert_eq!(heart_and_comment(70).1, "Something special is brewing...");
        assert_eq!(heart_and_comment(50).1, "There's a spark worth igniting.");
        assert_eq!(heart_and_comment(30).1, "The flame flickers, but it's not too bright...");
        assert_eq!(heart_and_comment(29).1, "Not quite a match, perhaps best as friends.");
    }

    #[test]
    fn test_love_bar() {
        let empty = love_bar(0);
        assert!(empty.contains("✨`0%`✨"));
        assert_eq!(empty.matches(FILLED).count(), 0);

        let half = love_bar(50);
        assert_eq!(half.matches(FILLED).count(), 5);

        let full = love_bar(100);
        assert_eq!(full.matches(FILLED).count(), BAR_SEGMENTS - 1);
        assert_eq!(full.matches(EMPTY).count(), 0);
    }

    #[test]
    fn test_ship_embed() {
        let pair = ShipPair {
            name_one: "Ann",
            name_two: "Bob",
            avatar_one: "https://cdn/a.png".to_string(),
            avatar_two: "https://cdn/b.png".to_string(),
            requested_by: "Ann",
        };
        let embed = ship_embed(&pair, 91, LOVE_QUOTES[0]);
        assert_eq!(footer(&embed), Some("Requested by Ann"));
        assert_eq!(colour(&embed), Some(0xFF1493));
    }
}
