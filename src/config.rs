use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Commands allowed per user inside [`TIME_WINDOW_SECS`].
pub const RATE_LIMIT: usize = 5;
pub const TIME_WINDOW_SECS: u64 = 120;

pub const CONVERSATION_TIMEOUT_SECS: u64 = 300;
pub const GAME_TIMEOUT_SECS: u64 = 600;

pub const MAX_MESSAGE_LENGTH: usize = 2000;
pub const MAX_EMBED_FIELDS: usize = 25;
pub const COMMAND_COOLDOWN_SECS: u64 = 3;

/// Recognised command prefixes, longest first so `nz!` wins over `n!`.
pub const PREFIXES: &[&str] = &["nz!", "n!", "?", "!"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub discord_token: String,
    pub owner_ids: Vec<u64>,
    pub welcome_channel_id: Option<u64>,
    pub environment: String,
    pub database_path: String,
    pub events_path: String,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let derived_level = if environment.eq_ignore_ascii_case("production") {
            "info"
        } else {
            "debug"
        };

        Ok(Config {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?,
            owner_ids: parse_owner_ids(&env::var("OWNER_IDS").unwrap_or_default()),
            welcome_channel_id: env::var("WELCOME_CHANNEL_ID")
                .ok()
                .and_then(|v| v.trim().parse().ok()),
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "bot_data.db".to_string()),
            events_path: env::var("EVENTS_FILE").unwrap_or_else(|_| "bot_events.json".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| derived_level.to_string()),
            environment,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}

/// Comma separated ids; blanks and anything non-numeric are skipped.
pub fn parse_owner_ids(raw: &str) -> Vec<u64> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()))
        .filter_map(|id| id.parse().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_owner_ids() {
        assert_eq!(parse_owner_ids(""), Vec::<u64>::new());
        assert_eq!(parse_owner_ids("123, 456 ,abc,,789x"), vec![123, 456]);
    }

    // Env mutations share one test so they cannot race each other.
    #[test]
    fn test_config_from_env() {
        env::remove_var("DISCORD_TOKEN");
        assert!(Config::from_env().is_err());

        env::set_var("DISCORD_TOKEN", "test_discord_token");
        env::set_var("OWNER_IDS", "42,43");
        env::set_var("WELCOME_CHANNEL_ID", "not-a-number");
        env::remove_var("ENVIRONMENT");
        env::remove_var("LOG_LEVEL");
        env::remove_var("DATABASE_PATH");
        env::remove_var("EVENTS_FILE");

        let config = Config::from_env().unwrap();
        assert_eq!(config.discord_token, "test_discord_token");
        assert_eq!(config.owner_ids, vec![42, 43]);
        assert!(config.is_owner(42));
        assert!(!config.is_owner(7));
        assert_eq!(config.welcome_channel_id, None);
        assert_eq!(config.database_path, "bot_data.db");
        assert_eq!(config.events_path, "bot_events.json");
        assert_eq!(config.log_level, "debug");
        assert!(!config.is_production());

        env::set_var("ENVIRONMENT", "Production");
        env::set_var("WELCOME_CHANNEL_ID", "555");
        let config = Config::from_env().unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.welcome_channel_id, Some(555));
        assert!(config.is_production());

        env::remove_var("DISCORD_TOKEN");
        env::remove_var("OWNER_IDS");
        env::remove_var("WELCOME_CHANNEL_ID");
        env::remove_var("ENVIRONMENT");
    }
}
