//! # Feature Registry
//!
//! Central registry for the bot's cogs with version tracking and per-guild
//! toggles.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Cogs carry an emoji and gate their commands on the toggle
//! - 1.0.0: Initial feature registry implementation

use serenity::builder::CreateEmbed;

use crate::embeds::BLURPLE;

/// Describes a versioned bot feature
#[derive(Debug, Clone)]
pub struct Feature {
    /// Feature identifier (snake_case)
    pub id: &'static str,
    /// Human-readable name
    pub name: &'static str,
    pub emoji: &'static str,
    /// Current semantic version
    pub version: &'static str,
    /// Bot version when feature was added
    pub since: &'static str,
    /// Can be toggled per guild by admins
    pub toggleable: bool,
    /// Brief description
    pub description: &'static str,
}

/// All registered features
pub const FEATURES: &[Feature] = &[
    Feature {
        id: "games",
        name: "Games",
        emoji: "🎮",
        version: "1.2.0",
        since: "0.1.0",
        toggleable: true,
        description: "Hangman, tic-tac-toe, trivia and ship with leaderboards",
    },
    Feature {
        id: "social",
        name: "Social",
        emoji: "😄",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: true,
        description: "GIF reactions, say, avatar and polls",
    },
    Feature {
        id: "dictionary",
        name: "Dictionary",
        emoji: "📘",
        version: "1.1.0",
        since: "0.1.0",
        toggleable: true,
        description: "Word definitions with a fallback source",
    },
    Feature {
        id: "reference",
        name: "Word Association & Wiki",
        emoji: "🔗",
        version: "1.0.0",
        since: "0.2.0",
        toggleable: true,
        description: "Related words, rhymes and Wikipedia summaries",
    },
    Feature {
        id: "grammar",
        name: "Grammar Checker",
        emoji: "📝",
        version: "1.1.0",
        since: "0.2.0",
        toggleable: true,
        description: "LanguageTool corrections with an interactive fix view",
    },
    Feature {
        id: "pomodoro",
        name: "Pomodoro",
        emoji: "🍅",
        version: "1.1.0",
        since: "0.1.0",
        toggleable: true,
        description: "Group focus timers with join window and stop button",
    },
    Feature {
        id: "events",
        name: "Events",
        emoji: "📅",
        version: "1.0.0",
        since: "0.2.0",
        toggleable: true,
        description: "Scheduled events with RSVP buttons and reminders",
    },
    Feature {
        id: "script_sessions",
        name: "Script Sessions",
        emoji: "🎭",
        version: "1.2.0",
        since: "0.2.0",
        toggleable: true,
        description: "Cast management for play readings",
    },
    Feature {
        id: "welcome",
        name: "Welcome Messages",
        emoji: "👋",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: true,
        description: "Greets joining members and notes departures",
    },
    Feature {
        id: "moderation",
        name: "Moderation",
        emoji: "🛠️",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Mute, ban, kick, purge and owner controls",
    },
    Feature {
        id: "help",
        name: "Help",
        emoji: "📖",
        version: "2.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Categorised help with search",
    },
    Feature {
        id: "rate_limiting",
        name: "Rate Limiting",
        emoji: "⏳",
        version: "1.1.0",
        since: "0.1.0",
        toggleable: false,
        description: "Prevents spam with a per-user sliding window",
    },
    Feature {
        id: "guild_settings",
        name: "Guild Settings",
        emoji: "⚙️",
        version: "1.0.0",
        since: "0.1.0",
        toggleable: false,
        description: "Server-wide configuration and feature toggles",
    },
];

/// Get all registered features
pub fn get_features() -> &'static [Feature] {
    FEATURES
}

/// Get a feature by ID, case-insensitively
pub fn get_feature(id: &str) -> Option<&'static Feature> {
    FEATURES.iter().find(|f| f.id.eq_ignore_ascii_case(id.trim()))
}

/// Get all toggleable features
pub fn get_toggleable_features() -> impl Iterator<Item = &'static Feature> {
    FEATURES.iter().filter(|f| f.toggleable)
}

/// Get bot version from Cargo.toml
pub fn get_bot_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn disabled_message(feature: &Feature) -> String {
    format!("🚫 The {} feature is disabled on this server.", feature.name)
}

/// Format features as a display string; `enabled` reports per-guild state.
pub fn format_features_list(enabled: impl Fn(&str) -> bool) -> String {
    let mut output = format!("📦 Bot Features (v{})\n\n", get_bot_version());
    output.push_str("Feature                  Version  Status    Toggleable\n");
    output.push_str("─────────────────────────────────────────────────────────\n");

    for feature in FEATURES {
        let toggle_str = if feature.toggleable { "Yes" } else { "No" };
        let status = if enabled(feature.id) { "✅ ON " } else { "❌ OFF" };
        output.push_str(&format!(
            "{:<24} {:<8} {}    {}\n",
            feature.name, feature.version, status, toggle_str
        ));
    }

    output.push_str("\nUse ?toggle <feature_id> to enable/disable toggleable features.");
    output
}

pub fn features_embed(enabled: impl Fn(&str) -> bool) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("📦 Bot Features")
        .description(format!("```\n{}\n```", format_features_list(enabled)))
        .colour(BLURPLE);
    embed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleError {
    Unknown(String),
    NotToggleable(&'static str),
}

impl std::fmt::Display for ToggleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToggleError::Unknown(id) => write!(
                f,
                "❌ Unknown feature `{}`. Use `?features` to see the list.",
                id
            ),
            ToggleError::NotToggleable(name) => write!(f, "❌ {} cannot be toggled.", name),
        }
    }
}

impl std::error::Error for ToggleError {}

pub fn toggleable_feature(id: &str) -> Result<&'static Feature, ToggleError> {
    let feature = get_feature(id).ok_or_else(|| ToggleError::Unknown(id.to_string()))?;
    if !feature.toggleable {
        return Err(ToggleError::NotToggleable(feature.name));
    }
    Ok(feature)
}

pub fn toggled_message(feature: &Feature, enabled: bool) -> String {
    if enabled {
        format!("✅ {} {} is now **enabled**.", feature.emoji, feature.name)
    } else {
        format!("🚫 {} {} is now **disabled**.", feature.emoji, feature.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_feature_by_id() {
        let games = get_feature("games");
        assert!(games.is_some());
        assert_eq!(games.unwrap().name, "Games");
        assert!(get_feature("GRAMMAR").is_some());
        assert!(get_feature("nonexistent").is_none());
    }

    #[test]
    fn test_toggleable_features() {
        let toggleable: Vec<_> = get_toggleable_features().collect();
        assert!(!toggleable.is_empty());
        for feature in toggleable {
            assert!(feature.toggleable);
        }
    }

    #[test]
    fn test_feature_ids_unique() {
        let mut ids: Vec<_> = FEATURES.iter().map(|f| f.id).collect();
        let original_len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), original_len, "Feature IDs should be unique");
    }

    #[test]
    fn test_toggleable_feature_errors() {
        assert_eq!(toggleable_feature("events").unwrap().id, "events");
        assert_eq!(
            toggleable_feature("help").unwrap_err(),
            ToggleError::NotToggleable("Help")
        );
        assert!(matches!(toggleable_feature("nope"), Err(ToggleError::Unknown(_))));
    }

    #[test]
    fn test_format_features_list_reports_state() {
        let output = format_features_list(|id| id != "games");
        assert!(output.contains("Bot Features"));
        assert!(output.contains("❌ OFF"));
        assert!(output.contains("Script Sessions"));
    }

    #[test]
    fn test_disabled_message() {
        let feature = get_feature("pomodoro").unwrap();
        assert_eq!(
            disabled_message(feature),
            "🚫 The Pomodoro feature is disabled on this server."
        );
    }
}
