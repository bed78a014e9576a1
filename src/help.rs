//! # Feature: Help
//!
//! Categorised command catalog with an interactive category menu, free-text
//! lookup and a compact reference list.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Category dropdown and command search
//! - 1.0.0: Static help embed

use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::channel::ReactionType;
use serenity::utils::Colour;
use std::time::Duration;

use crate::views::{Expiring, ViewTimeout};

pub const SELECT_ID: &str = "help:category";
pub const VIEW_TIMEOUT: Duration = Duration::from_secs(300);
const OVERVIEW_VALUE: &str = "overview";
const MAX_SEARCH_RESULTS: usize = 8;
const MAX_DETAILED_COMMANDS: usize = 10;

pub struct HelpCommand {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub examples: &'static [&'static str],
    pub aliases: &'static [&'static str],
    pub permission: Option<&'static str>,
}

pub struct HelpCategory {
    pub key: &'static str,
    pub name: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub commands: &'static [HelpCommand],
    pub features: &'static [&'static str],
}

const fn cmd(name: &'static str, description: &'static str, usage: &'static str) -> HelpCommand {
    HelpCommand {
        name,
        description,
        usage,
        examples: &[],
        aliases: &[],
        permission: None,
    }
}

const GAMES: &[HelpCommand] = &[
    cmd("hangman", "Play interactive word guessing game", "?hangman"),
    HelpCommand {
        examples: &["?tictactoe @friend"],
        aliases: &["ttt"],
        ..cmd("tictactoe", "Challenge someone to Tic-Tac-Toe", "?tictactoe @user")
    },
    cmd("trivia", "Answer random trivia questions (30s timer)", "?trivia"),
    HelpCommand {
        examples: &["?ship @alice @bob"],
        ..cmd("ship", "Calculate love compatibility between users", "?ship @user1 @user2")
    },
    HelpCommand {
        examples: &["?leaderboard hangman"],
        aliases: &["lb"],
        ..cmd("leaderboard", "Top players for a game", "?leaderboard <game>")
    },
    cmd("stats", "Your wins and losses", "?stats [game]"),
    HelpCommand {
        examples: &["?say Hello world!"],
        permission: Some("Manage Messages"),
        ..cmd("say", "Make the bot repeat your message", "?say <message>")
    },
];

const SOCIAL: &[HelpCommand] = &[
    HelpCommand {
        examples: &["?bonk @friend"],
        ..cmd("bonk", "Bonk someone with animated reactions", "?bonk @user")
    },
    cmd("kiss", "Send a sweet kiss with emojis", "?kiss @user"),
    cmd("hug", "Give a warm hug with animations", "?hug @user"),
    cmd("slap", "Dramatic slap with reactions", "?slap @user"),
    cmd("yeet", "Launch someone into the void", "?yeet @user"),
    cmd("facepalm", "Express disappointment dramatically", "?facepalm"),
    cmd("rip", "Pay respects with memorial messages", "?rip @user"),
    cmd("avatar", "Display user's profile picture", "?avatar @user"),
];

const EDUCATION: &[HelpCommand] = &[
    HelpCommand {
        examples: &["?def serendipity", "?def happiness"],
        ..cmd("def", "Get English word definitions", "?def <word>")
    },
    HelpCommand {
        examples: &["?associate happy"],
        ..cmd("associate", "Find related words and synonyms", "?associate <word>")
    },
    HelpCommand {
        examples: &["?wiki Rust (programming language)"],
        ..cmd("wiki", "Summarise a Wikipedia article", "?wiki <topic>")
    },
    HelpCommand {
        examples: &["?grammar I has a apple", "?grammar de-DE Ich bin gut"],
        aliases: &["check", "spell"],
        ..cmd("grammar", "Check grammar and spelling interactively", "?grammar [language] <text>")
    },
    HelpCommand {
        aliases: &["qf"],
        ..cmd("quickfix", "Apply every suggested fix at once", "?quickfix <text>")
    },
    HelpCommand {
        aliases: &["langs"],
        ..cmd("languages", "List grammar check languages", "?languages")
    },
];

const PRODUCTIVITY: &[HelpCommand] = &[
    HelpCommand {
        examples: &["?pomodoro", "?pomodoro 30 5 2"],
        ..cmd("pomodoro", "Start focus session (25 min default)", "?pomodoro [focus] [break] [cycles]")
    },
    HelpCommand {
        examples: &["?createevent \"Movie Night\" 2025-12-24 20:00 120"],
        ..cmd("createevent", "Schedule an event with RSVP buttons", "?createevent <title> <date> <time> [duration] [description]")
    },
    cmd("events", "List upcoming events in this server", "?events"),
    cmd("eventinfo", "Show one event", "?eventinfo <id>"),
    cmd("cancelevent", "Cancel an event you created", "?cancelevent <id>"),
];

const MODERATION: &[HelpCommand] = &[
    HelpCommand {
        examples: &["?mute @spammer Being disruptive"],
        permission: Some("Manage Messages"),
        ..cmd("mute", "Mute a user temporarily", "?mute @user [reason]")
    },
    HelpCommand {
        examples: &["?unmute @user"],
        permission: Some("Manage Messages"),
        ..cmd("unmute", "Remove mute from user", "?unmute @user")
    },
    HelpCommand {
        examples: &["?ban @troublemaker Harassment"],
        permission: Some("Ban Members"),
        ..cmd("ban", "Ban user from server", "?ban @user [reason]")
    },
    HelpCommand {
        examples: &["?kick @user Breaking rules"],
        permission: Some("Kick Members"),
        ..cmd("kick", "Kick user from server", "?kick @user [reason]")
    },
    HelpCommand {
        examples: &["?purge 10", "?purge 50"],
        permission: Some("Manage Messages"),
        ..cmd("purge", "Delete messages in bulk", "?purge <amount>")
    },
    HelpCommand {
        permission: Some("Administrator"),
        ..cmd("toggle", "Enable or disable a feature for this server", "?toggle <feature>")
    },
];

const UTILITY: &[HelpCommand] = &[
    HelpCommand {
        examples: &["?whois @friend", "?whois"],
        ..cmd("whois", "Get detailed user information", "?whois @user")
    },
    HelpCommand {
        examples: &["/poll question:Pizza or burgers? option1:Pizza option2:Burgers"],
        ..cmd("poll", "Create interactive polls", "/poll <question> <option1> <option2>")
    },
    cmd("ping", "Check bot latency and status", "?ping"),
    cmd("status", "Show detailed bot status", "?status"),
    cmd("features", "List bot features and versions", "?features"),
    HelpCommand {
        aliases: &["h"],
        ..cmd("help", "Show this comprehensive help", "?help")
    },
    HelpCommand {
        aliases: &["cmds", "commandlist"],
        ..cmd("commands", "Quick command reference list", "?commands")
    },
    HelpCommand {
        aliases: &["botstats"],
        ..cmd("about", "About the bot", "?about")
    },
];

const SCRIPTS: &[HelpCommand] = &[HelpCommand {
    examples: &["?script"],
    aliases: &["session"],
    ..cmd("script", "Start interactive script session", "?script")
}];

/// Categories in display order.
pub const CATEGORIES: &[HelpCategory] = &[
    HelpCategory {
        key: "games",
        name: "Fun & Games",
        emoji: "🎮",
        description: "Interactive games and entertainment",
        commands: GAMES,
        features: &["🎯 Interactive game sessions", "⏱️ Timed challenges", "🏆 Score tracking", "🎲 Random trivia questions"],
    },
    HelpCategory {
        key: "social",
        name: "Social & Interaction",
        emoji: "😄",
        description: "Fun social commands with animations",
        commands: SOCIAL,
        features: &["🎭 Animated reactions", "💫 Interactive responses", "🎨 Rich embed displays", "😊 Emoji-rich interactions"],
    },
    HelpCategory {
        key: "education",
        name: "Dictionary & Learning",
        emoji: "📚",
        description: "Language learning and reference tools",
        commands: EDUCATION,
        features: &["🧠 Vocabulary building tools", "📖 Dictionary definitions", "🔗 Word associations", "📝 Learning assistance"],
    },
    HelpCategory {
        key: "productivity",
        name: "Productivity & Tools",
        emoji: "⏱️",
        description: "Focus and productivity enhancement",
        commands: PRODUCTIVITY,
        features: &["🎯 Customizable work/break intervals", "📊 Progress tracking", "⏰ Smart notifications", "🔔 Session reminders"],
    },
    HelpCategory {
        key: "moderation",
        name: "Moderation & Admin",
        emoji: "🛠️",
        description: "Server management and moderation tools",
        commands: MODERATION,
        features: &["🔒 Role-based permissions", "⚡ Bulk operations", "🛡️ Security controls", "📝 Reason logging"],
    },
    HelpCategory {
        key: "utility",
        name: "Server & Utility",
        emoji: "🌐",
        description: "Server information and utility commands",
        commands: UTILITY,
        features: &["📊 Server statistics", "🔍 User information", "📱 Interactive polls", "⚡ Performance monitoring"],
    },
    HelpCategory {
        key: "scripts",
        name: "Script Sessions",
        emoji: "🎭",
        description: "Interactive story and roleplay features",
        commands: SCRIPTS,
        features: &["📚 Interactive storytelling", "🎭 Character roleplay", "🎬 Script-based adventures", "👥 Group participation"],
    },
];

pub fn total_commands() -> usize {
    CATEGORIES.iter().map(|c| c.commands.len()).sum()
}

pub fn search(query: &str) -> Vec<(&'static HelpCategory, &'static HelpCommand)> {
    let query = query.to_lowercase();
    CATEGORIES
        .iter()
        .flat_map(|category| category.commands.iter().map(move |command| (category, command)))
        .filter(|(_, command)| {
            command.name.contains(query.as_str())
                || command.description.to_lowercase().contains(query.as_str())
                || command.aliases.iter().any(|a| a.contains(query.as_str()))
        })
        .collect()
}

/// What `help <query>` resolves to.
pub enum HelpLookup {
    Category(&'static HelpCategory),
    Command(&'static HelpCategory, &'static HelpCommand),
    Results(Vec<(&'static HelpCategory, &'static HelpCommand)>),
    NotFound,
}

/// Category names win over command matches.
pub fn lookup(query: &str) -> HelpLookup {
    let lower = query.trim().to_lowercase();
    if let Some(category) = CATEGORIES
        .iter()
        .find(|c| c.name.to_lowercase().contains(&lower) || c.key == lower)
    {
        return HelpLookup::Category(category);
    }

    let mut results = search(&lower);
    match results.len() {
        0 => HelpLookup::NotFound,
        1 => {
            let (category, command) = results.remove(0);
            HelpLookup::Command(category, command)
        }
        _ => HelpLookup::Results(results),
    }
}

fn code_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|a| format!("`{}`", a))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn overview_embed() -> CreateEmbed {
    let categories: Vec<String> = CATEGORIES
        .iter()
        .map(|c| format!("{} **{}** - {} commands", c.emoji, c.name, c.commands.len()))
        .collect();

    let mut embed = CreateEmbed::default();
    embed
        .title("🌙 UnderLand Bot")
        .description(
            "**A community Discord bot for games, learning and organising**\n\n\
             🎯 **Quick Start:** Use the dropdown below to explore features\n\
             🔍 **Search:** Type `?help <command>` for specific help\n\
             📋 **Quick List:** Use `?commands` for a compact view",
        )
        .colour(Colour(0x2f3136))
        .field(
            "📊 Bot Information",
            format!(
                "**{} Commands** across **{} Categories**\n**Prefixes:** `?`, `!`, `n!`, `nz!`",
                total_commands(),
                CATEGORIES.len()
            ),
            false,
        )
        .field("📂 Available Categories", categories.join("\n"), false)
        .field("🚀 Popular Commands", "`?hangman` • `?trivia` • `?ping` • `?pomodoro` • `?def`", false)
        .footer(|f| f.text("Use the dropdown to explore categories"));
    embed
}

pub fn category_embed(category: &HelpCategory) -> CreateEmbed {
    let lines: Vec<String> = category
        .commands
        .iter()
        .map(|command| {
            let mut line = format!("**`{}`** - {}", command.name, command.description);
            if !command.aliases.is_empty() {
                line.push_str(&format!(" (aliases: {})", code_list(command.aliases)));
            }
            if let Some(permission) = command.permission {
                line.push_str(&format!("\n   *Requires: {}*", permission));
            }
            line
        })
        .collect();

    let examples: Vec<String> = category
        .commands
        .iter()
        .take(2)
        .flat_map(|c| c.examples.iter().take(2))
        .map(|ex| format!("`{}`", ex))
        .collect();

    let mut embed = CreateEmbed::default();
    embed
        .title(format!("{} {}", category.emoji, category.name))
        .description(format!("**{}**", category.description))
        .colour(Colour(0x5865f2))
        .field(
            format!("📋 Commands ({})", category.commands.len()),
            crate::embeds::truncate(&lines.join("\n\n"), crate::embeds::FIELD_VALUE_LIMIT),
            false,
        )
        .field("✨ Features", category.features.join("\n"), false);
    if !examples.is_empty() {
        embed.field("💡 Example Usage", examples.join("\n"), false);
    }
    embed.footer(|f| f.text("Use ?help <command> for detailed information"));
    embed
}

pub fn category_detail_embed(category: &HelpCategory) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("{} {} - Detailed Help", category.emoji, category.name))
        .description(category.description)
        .colour(Colour(0x5865f2));

    for command in category.commands.iter().take(MAX_DETAILED_COMMANDS) {
        let mut value = format!("**Description:** {}\n**Usage:** `{}`\n", command.description, command.usage);
        if !command.aliases.is_empty() {
            value.push_str(&format!("**Aliases:** {}\n", code_list(command.aliases)));
        }
        if !command.examples.is_empty() {
            let examples: Vec<String> = command.examples.iter().take(2).map(|ex| format!("• `{}`", ex)).collect();
            value.push_str(&format!("**Examples:**\n{}\n", examples.join("\n")));
        }
        if let Some(permission) = command.permission {
            value.push_str(&format!("**Required Permission:** {}\n", permission));
        }
        embed.field(format!("`{}`", command.name), value, false);
    }

    embed.field("✨ Features", category.features.join("\n"), false);
    embed
}

pub fn command_embed(category: &HelpCategory, command: &HelpCommand) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("📖 Command Help: `{}`", command.name))
        .description(command.description)
        .colour(Colour(0x00ff7f))
        .field("📝 Usage", format!("`{}`", command.usage), false);
    if !command.aliases.is_empty() {
        embed.field("🔗 Aliases", code_list(command.aliases), true);
    }
    if let Some(permission) = command.permission {
        embed.field("🔒 Required Permission", permission, true);
    }
    if !command.examples.is_empty() {
        let examples: Vec<String> = command.examples.iter().map(|ex| format!("• `{}`", ex)).collect();
        embed.field("💡 Examples", examples.join("\n"), false);
    }
    embed.field("📂 Category", format!("{} {}", category.emoji, category.name), true);
    embed
}

pub fn search_results_embed(query: &str, results: &[(&HelpCategory, &HelpCommand)]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title(format!("🔍 Search Results for '{}'", query))
        .description(format!("Found {} matching commands:", results.len()))
        .colour(Colour(0xffd700));
    for (category, command) in results.iter().take(MAX_SEARCH_RESULTS) {
        embed.field(
            format!("`{}`", command.name),
            format!(
                "**{}**\n*Category: {} {}*",
                command.description, category.emoji, category.name
            ),
            false,
        );
    }
    if results.len() > MAX_SEARCH_RESULTS {
        embed.footer(|f| {
            f.text(format!(
                "Showing first {} of {} results.",
                MAX_SEARCH_RESULTS,
                results.len()
            ))
        });
    }
    embed
}

pub fn not_found_embed(query: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("❓ Command Not Found")
        .description(format!(
            "Could not find help for `{}`.\n\n💡 **Suggestions:**\n\
             • Use `?help` for the main menu\n\
             • Use `?commands` for a quick list\n\
             • Check your spelling",
            query
        ))
        .colour(Colour(0xff6b6b));
    embed
}

pub fn lookup_embed(query: &str) -> CreateEmbed {
    match lookup(query) {
        HelpLookup::Category(category) => category_detail_embed(category),
        HelpLookup::Command(category, command) => command_embed(category, command),
        HelpLookup::Results(results) => search_results_embed(query, &results),
        HelpLookup::NotFound => not_found_embed(query),
    }
}

pub fn quick_reference_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📋 Quick Commands Reference")
        .description("All available bot commands at a glance")
        .colour(Colour(0x36393f));
    for category in CATEGORIES {
        let names: Vec<&str> = category.commands.iter().map(|c| c.name).collect();
        embed.field(format!("{} {}", category.emoji, category.name), code_list(&names), false);
    }
    embed.footer(|f| {
        f.text(format!(
            "Total: {} commands • Use ?help <command> for details",
            total_commands()
        ))
    });
    embed
}

/// Live numbers for the about card.
pub struct BotStats {
    pub guilds: usize,
    pub members: u64,
    pub latency_ms: Option<u128>,
    pub avatar_url: Option<String>,
}

pub fn about_embed(stats: &BotStats) -> CreateEmbed {
    let latency = stats
        .latency_ms
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "N/A".to_string());

    let mut embed = CreateEmbed::default();
    embed
        .title("🤖 About UnderLand Bot")
        .description("A community Discord bot for games, learning and organising")
        .colour(Colour(0x7289da))
        .field(
            "📊 Statistics",
            format!(
                "**Commands:** {}\n**Servers:** {}\n**Users:** {}\n**Latency:** {}",
                total_commands(),
                stats.guilds,
                stats.members,
                latency
            ),
            true,
        )
        .field(
            "✨ Features",
            "• 🎮 Interactive games\n• 😄 Social commands\n• 📚 Dictionary tools\n\
             • ⏱️ Productivity features\n• 🛠️ Moderation tools\n• 🎭 Script sessions",
            true,
        )
        .footer(|f| f.text("Use ?help for command info"));
    if let Some(url) = &stats.avatar_url {
        embed.thumbnail(url);
    }
    embed
}

/// The `?help` menu; only its invoker may drive it.
pub struct HelpView {
    pub author_id: u64,
}

impl HelpView {
    pub fn new(author_id: u64) -> Self {
        HelpView { author_id }
    }

    /// Selected value is `overview` or a category index.
    pub fn select(&self, value: &str) -> Option<CreateEmbed> {
        if value == OVERVIEW_VALUE {
            return Some(overview_embed());
        }
        let index: usize = value.parse().ok()?;
        CATEGORIES.get(index).map(category_embed)
    }

    pub fn components(&self, disabled: bool) -> CreateComponents {
        let mut components = CreateComponents::default();
        components.create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(SELECT_ID)
                    .placeholder("🔍 Select a category to explore...")
                    .min_values(1)
                    .max_values(1)
                    .disabled(disabled)
                    .options(|options| {
                        options.create_option(|o| {
                            o.label("📖 Overview")
                                .description("Main help page with all categories")
                                .value(OVERVIEW_VALUE)
                        });
                        for (i, category) in CATEGORIES.iter().enumerate() {
                            options.create_option(|o| {
                                o.label(category.name)
                                    .description(category.description)
                                    .value(i)
                                    .emoji(ReactionType::Unicode(category.emoji.to_string()))
                            });
                        }
                        options
                    })
            })
        });
        components
    }
}

impl Expiring for HelpView {
    fn timeout(&self) -> Duration {
        VIEW_TIMEOUT
    }

    fn on_timeout(&self) -> ViewTimeout {
        ViewTimeout {
            content: None,
            embed: None,
            components: self.components(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{field, footer, title};

    #[test]
    fn test_category_order() {
        let keys: Vec<&str> = CATEGORIES.iter().map(|c| c.key).collect();
        assert_eq!(
            keys,
            vec!["games", "social", "education", "productivity", "moderation", "utility", "scripts"]
        );
    }

    #[test]
    fn test_lookup_category_by_name() {
        assert!(matches!(lookup("games"), HelpLookup::Category(c) if c.key == "games"));
        assert!(matches!(lookup("Dictionary"), HelpLookup::Category(c) if c.key == "education"));
    }

    #[test]
    fn test_lookup_single_command() {
        match lookup("hangman") {
            HelpLookup::Command(category, command) => {
                assert_eq!(category.key, "games");
                assert_eq!(command.name, "hangman");
            }
            _ => panic!("expected a single command"),
        }
        assert!(matches!(lookup("qf"), HelpLookup::Command(_, c) if c.name == "quickfix"));
    }

    #[test]
    fn test_lookup_multiple_and_missing() {
        assert!(matches!(lookup("event"), HelpLookup::Results(r) if r.len() >= 3));
        assert!(matches!(lookup("zzzz"), HelpLookup::NotFound));
        assert_eq!(title(&lookup_embed("zzzz")), Some("❓ Command Not Found"));
    }

    #[test]
    fn test_search_results_cap() {
        let results = search("a");
        assert!(results.len() > MAX_SEARCH_RESULTS);
        let embed = search_results_embed("a", &results);
        let fields = embed.0.get("fields").and_then(|f| f.as_array()).map(|f| f.len());
        assert_eq!(fields, Some(MAX_SEARCH_RESULTS));
        assert!(footer(&embed).unwrap().starts_with("Showing first 8 of"));
    }

    #[test]
    fn test_view_select() {
        let view = HelpView::new(1);
        assert_eq!(title(&view.select("overview").unwrap()), Some("🌙 UnderLand Bot"));
        assert_eq!(title(&view.select("0").unwrap()), Some("🎮 Fun & Games"));
        assert_eq!(title(&view.select("6").unwrap()), Some("🎭 Script Sessions"));
        assert!(view.select("7").is_none());
        assert!(view.select("junk").is_none());
    }

    #[test]
    fn test_quick_reference_lists_every_category() {
        let embed = quick_reference_embed();
        assert!(field(&embed, "🎮 Fun & Games").unwrap().contains("`hangman`"));
        assert_eq!(
            footer(&embed),
            Some(format!("Total: {} commands • Use ?help <command> for details", total_commands()).as_str())
        );
    }
}
