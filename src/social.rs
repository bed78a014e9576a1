//! # Feature: Social Actions
//!
//! Playful member-to-member actions (bonk, hug, slap...) that post a random
//! line and GIF in place of the invoking message.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use rand::seq::IndexedRandom;
use rand::Rng;
use serenity::builder::CreateEmbed;
use serenity::utils::Colour;

use crate::embeds::BLURPLE;

/// Attachments above this size are skipped by `say`/`replysay`.
pub const MAX_ATTACHMENT_BYTES: u64 = 8 * 1024 * 1024;

pub const POLLS_CHANNEL: &str = "polls";
pub const POLL_REACTIONS: [&str; 2] = ["1️⃣", "2️⃣"];
pub const POLL_CREATED: &str = "Your poll was created!";
pub const NOTHING_TO_SAY: &str = "Nothing to say or upload.";
pub const REPLY_REQUIRED: &str = "You must reply to a message to use this command.";

pub struct SocialAction {
    pub name: &'static str,
    pub needs_target: bool,
    pub gifs: &'static [&'static str],
    /// `{author}` and `{target}` are replaced with mentions.
    pub lines: &'static [&'static str],
}

pub const ACTIONS: &[SocialAction] = &[
    SocialAction {
        name: "bonk",
        needs_target: true,
        gifs: &["https://tenor.com/view/bonk-doge-gif-24837098"],
        lines: &[
            "{author} bonked {target} for questionable behavior! 🔨",
            "{author} delivers a mighty BONK to {target}! 🚨",
            "{target} got bonked by {author}! Time to reflect!",
        ],
    },
    SocialAction {
        name: "kiss",
        needs_target: true,
        gifs: &["https://tenor.com/view/mocha-and-milk-gif-734972071031030497"],
        lines: &[
            "{author} kissed {target} 😘",
            "{author} sends a sweet kiss to {target}! 💋",
            "{target} received a loving kiss from {author}!",
        ],
    },
    SocialAction {
        name: "hug",
        needs_target: true,
        gifs: &["https://tenor.com/view/theoffice-hug-gif-18038984"],
        lines: &[
            "{author} gave {target} a big hug! 🫂",
            "{author} wraps {target} in a warm hug! 🤗",
            "{target} is hugged tightly by {author}!",
        ],
    },
    SocialAction {
        name: "slap",
        needs_target: true,
        gifs: &["https://tenor.com/view/peach-and-goma-peach-cat-goma-cat-peach-and-goma-cat-peach-cat-slap-gif-3790251090829977055"],
        lines: &[
            "{author} slapped {target} 👋",
            "{author} delivers a dramatic slap to {target}! 🖐️",
            "{target} got a surprise slap from {author}!",
        ],
    },
    SocialAction {
        name: "yeet",
        needs_target: true,
        gifs: &["https://tenor.com/view/yeet-trash-seal-dr-dolittle-dolittle-gif-15298225"],
        lines: &[
            "{author} yeeted {target} into the void! 🌀",
            "{target} was YEETED by {author}! 🚀",
            "{author} launches {target} with a powerful YEET!",
        ],
    },
    SocialAction {
        name: "facepalm",
        needs_target: false,
        gifs: &[
            "https://media.tenor.com/3QvQKQwZpQwAAAAC/facepalm.gif",
            "https://media.tenor.com/6bQKQwZpQwAAAAC/anime-facepalm.gif",
        ],
        lines: &[
            "{author} just facepalmed. 🤦",
            "{author} can't believe it... FACEPALM! 🤦",
            "{author} did a legendary facepalm!",
        ],
    },
    SocialAction {
        name: "rip",
        needs_target: true,
        gifs: &["https://tenor.com/view/dance-coffin-meme-rip-gif-16909625"],
        lines: &[
            "{target} has been officially declared **RIPPED** by {author} ✝️",
            "{author} pays respects to {target}. F in chat.",
            "{target} has left the chat... RIP.",
        ],
    },
    SocialAction {
        name: "kidnap",
        needs_target: true,
        gifs: &["https://tenor.com/view/kidnap-cat-kidnap-aaaaah-fear-horror-film-gif-21768777"],
        lines: &[
            "{author} has kidnapped {target} for 1 hour! 🚐",
            "{target} was snatched by {author}! Hide your snacks!",
            "{author} is taking {target} on a mysterious adventure!",
        ],
    },
    SocialAction {
        name: "kill",
        needs_target: true,
        gifs: &["https://tenor.com/view/stab-knife-kifluggs-kill-murder-gif-24765587"],
        lines: &[
            "{author} Killed {target} 🔪",
            "{target} was eliminated by {author}! 💀",
            "{author} has sent {target} to the shadow realm!",
        ],
    },
    SocialAction {
        name: "punch",
        needs_target: true,
        gifs: &["https://tenor.com/view/markiplier-markiplier-punch-markipler-funny-funny-punch-gif-23594121"],
        lines: &[
            "{author} punched {target} 👊",
            "{target} got a knockout punch from {author}! 🥊",
            "{author} delivers a super punch to {target}!",
        ],
    },
    SocialAction {
        name: "love",
        needs_target: true,
        gifs: &["https://tenor.com/view/%EB%AA%A8%EC%B0%8C%EB%83%A5-gif-3199198135359664573"],
        lines: &[
            "{author} loved {target} 💞",
            "{author} sends love to {target}! ❤️",
            "{target} is showered with love by {author}!",
        ],
    },
    SocialAction {
        name: "dance",
        needs_target: true,
        gifs: &["https://tenor.com/view/johnny-english-johnny-english-movie-johnnyenglish-johnnyenglishmovie-rowan-gif-15226828216304945656"],
        lines: &[
            "{author} is dancing with {target} 🪩",
            "{author} and {target} start a dance party! 💃🕺",
            "{target} joins {author} for an epic dance-off!",
        ],
    },
];

pub fn find_action(name: &str) -> Option<&'static SocialAction> {
    ACTIONS.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

impl SocialAction {
    /// A random line followed by a random GIF link on its own line.
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R, author: &str, target: Option<&str>) -> String {
        let line = self.lines.choose(rng).copied().unwrap_or("{author}");
        let gif = self.gifs.choose(rng).copied().unwrap_or_default();
        let text = line
            .replace("{author}", author)
            .replace("{target}", target.unwrap_or("someone"));
        format!("{}\n{}", text, gif)
    }
}

pub fn attachment_too_large(filename: &str) -> String {
    format!(
        "Attachment `{}` is too large to upload (limit 8 MB).",
        filename
    )
}

pub fn poll_embed(question: &str, option_one: &str, option_two: &str, author: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("New Poll")
        .description(question)
        .colour(Colour(0xffa500))
        .field("Option 1", option_one, false)
        .field("Option 2", option_two, false)
        .footer(|f| f.text(format!("Poll by {}", author)));
    embed
}

pub fn avatar_embed(display_name: &str, avatar_url: &str, requested_by: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("{}'s Avatar", display_name))
        .colour(BLURPLE)
        .image(avatar_url)
        .footer(|f| f.text(format!("Requested by {}", requested_by)));
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{field, footer, title};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_every_action_has_content() {
        for action in ACTIONS {
            assert_eq!(action.lines.len(), 3, "{}", action.name);
            assert!(!action.gifs.is_empty(), "{}", action.name);
            for line in action.lines {
                assert!(line.contains("{author}") || line.contains("{target}"));
                if !action.needs_target {
                    assert!(!line.contains("{target}"));
                }
            }
        }
    }

    #[test]
    fn test_find_action() {
        assert!(find_action("BONK").is_some());
        assert!(!find_action("facepalm").unwrap().needs_target);
        assert!(find_action("tickle").is_none());
    }

    #[test]
    fn test_render_substitutes_mentions() {
        let mut rng = StdRng::seed_from_u64(3);
        let action = find_action("hug").unwrap();
        for _ in 0..10 {
            let text = action.render(&mut rng, "<@1>", Some("<@2>"));
            assert!(text.contains("<@1>"));
            assert!(text.contains("<@2>"));
            assert!(text.ends_with("https://tenor.com/view/theoffice-hug-gif-18038984"));
            assert!(!text.contains('{'));
        }
    }

    #[test]
    fn test_poll_embed() {
        let embed = poll_embed("Pizza or burgers?", "Pizza", "Burgers", "ann");
        assert_eq!(title(&embed), Some("New Poll"));
        assert_eq!(field(&embed, "Option 2"), Some("Burgers"));
        assert_eq!(footer(&embed), Some("Poll by ann"));
    }

    #[test]
    fn test_avatar_embed() {
        let embed = avatar_embed("ann", "https://cdn.example/a.png", "bob");
        assert_eq!(title(&embed), Some("ann's Avatar"));
        assert_eq!(footer(&embed), Some("Requested by bob"));
    }
}
