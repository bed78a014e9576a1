//! # Feature: Welcome Messages
//!
//! Greets members as they join and notes when they leave.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true

use anyhow::Result;
use serenity::model::id::{ChannelId, GuildId};

use crate::database::Database;

pub const FEATURE_ID: &str = "welcome";

pub fn welcome_message(mention: &str) -> String {
    format!("🎉 Welcome {} to the server!", mention)
}

pub fn goodbye_message(name: &str) -> String {
    format!("😢 {} has left the server.", name)
}

/// The configured channel wins; otherwise the guild's own setting.
pub fn pick_channel(configured: Option<u64>, guild_setting: Option<&str>) -> Option<ChannelId> {
    configured
        .or_else(|| guild_setting.and_then(|id| id.trim().parse().ok()))
        .map(ChannelId)
}

pub async fn welcome_channel(configured: Option<u64>, database: &Database, guild_id: GuildId) -> Result<Option<ChannelId>> {
    if configured.is_some() {
        return Ok(pick_channel(configured, None));
    }
    let settings = database.get_guild_settings(&guild_id.to_string()).await?;
    Ok(pick_channel(None, settings.welcome_channel_id.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(welcome_message("<@1>"), "🎉 Welcome <@1> to the server!");
        assert_eq!(goodbye_message("kermit"), "😢 kermit has left the server.");
    }

    #[test]
    fn test_pick_channel() {
        assert_eq!(pick_channel(Some(5), Some("7")), Some(ChannelId(5)));
        assert_eq!(pick_channel(None, Some(" 7 ")), Some(ChannelId(7)));
        assert_eq!(pick_channel(None, Some("general")), None);
        assert_eq!(pick_channel(None, None), None);
    }

    #[tokio::test]
    async fn test_welcome_channel_falls_back_to_guild_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("welcome.db");
        let database = Database::new(path.to_str().unwrap()).await.unwrap();

        assert_eq!(welcome_channel(None, &database, GuildId(1)).await.unwrap(), None);

        let mut settings = database.get_guild_settings("1").await.unwrap();
        settings.welcome_channel_id = Some("42".to_string());
        database.set_guild_settings("1", &settings).await.unwrap();

        assert_eq!(
            welcome_channel(None, &database, GuildId(1)).await.unwrap(),
            Some(ChannelId(42))
        );
        assert_eq!(
            welcome_channel(Some(9), &database, GuildId(1)).await.unwrap(),
            Some(ChannelId(9))
        );
    }
}
