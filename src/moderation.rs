//! # Feature: Moderation
//!
//! Role-gated member management plus owner-only controls over the bot itself.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Mute, ban, kick, purge, dm and the owner orders

use anyhow::Result;
use chrono::{Duration as ChronoDuration, Utc};
use log::{info, warn};
use serenity::builder::CreateEmbed;
use serenity::http::Http;
use serenity::model::channel::{PermissionOverwrite, PermissionOverwriteType};
use serenity::model::id::{ChannelId, GuildId, MessageId, RoleId, UserId};
use serenity::model::Permissions;
use std::path::Path;

use crate::embeds::RED;

pub const MUTED_ROLE: &str = "Muted";
pub const SHUTDOWN_SIGNAL_FILE: &str = "shutdown_signal";
/// Discord refuses bulk deletes of messages older than this.
const BULK_DELETE_MAX_AGE_DAYS: i64 = 14;
const FETCH_PAGE: u64 = 100;

/// Channel overwrite applied to the muted role.
pub fn muted_overwrite(role_id: RoleId) -> PermissionOverwrite {
    PermissionOverwrite {
        allow: Permissions::READ_MESSAGE_HISTORY,
        deny: Permissions::SPEAK | Permissions::SEND_MESSAGES | Permissions::VIEW_CHANNEL,
        kind: PermissionOverwriteType::Role(role_id),
    }
}

pub fn reason_text(reason: Option<&str>) -> &str {
    reason.filter(|r| !r.trim().is_empty()).unwrap_or("None")
}

pub fn muted_message(mention: &str, reason: Option<&str>) -> String {
    format!("Muted {} for reason: {}", mention, reason_text(reason))
}

pub fn banned_message(mention: &str, reason: Option<&str>) -> String {
    format!("Banned {} for reason: {}", mention, reason_text(reason))
}

pub fn kicked_message(mention: &str, reason: Option<&str>) -> String {
    format!("Kicked {} for reason: {}", mention, reason_text(reason))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberAction {
    Ban,
    Kick,
}

impl MemberAction {
    fn verb(&self) -> &'static str {
        match self {
            MemberAction::Ban => "ban",
            MemberAction::Kick => "kick",
        }
    }

    pub fn forbidden_message(&self, mention: &str) -> String {
        format!(
            "Could not {} {}. I lack the necessary permissions.",
            self.verb(),
            mention
        )
    }

    pub fn failed_message(&self, mention: &str) -> String {
        format!("An error occurred while trying to {} {}.", self.verb(), mention)
    }
}

/// True when Discord answered 403.
pub fn is_forbidden(err: &serenity::Error) -> bool {
    match err {
        serenity::Error::Http(http) => matches!(
            http.as_ref(),
            serenity::http::HttpError::UnsuccessfulRequest(resp) if resp.status_code.as_u16() == 403
        ),
        _ => false,
    }
}

/// Finds the muted role, creating it and denying it everywhere when missing.
pub async fn ensure_muted_role(http: &Http, guild_id: GuildId) -> Result<RoleId> {
    let roles = guild_id.roles(http).await?;
    if let Some(role) = roles.values().find(|r| r.name == MUTED_ROLE) {
        return Ok(role.id);
    }

    let role = guild_id.create_role(http, |r| r.name(MUTED_ROLE)).await?;
    info!("🔇 Created {} role in guild {}", MUTED_ROLE, guild_id);

    let overwrite = muted_overwrite(role.id);
    for channel_id in guild_id.channels(http).await?.keys() {
        if let Err(e) = channel_id.create_permission(http, &overwrite).await {
            warn!("⚠️ Could not set mute overwrite on channel {}: {}", channel_id, e);
        }
    }
    Ok(role.id)
}

pub async fn find_role(http: &Http, guild_id: GuildId, name: &str) -> Result<Option<RoleId>> {
    let roles = guild_id.roles(http).await?;
    Ok(roles.values().find(|r| r.name == name).map(|r| r.id))
}

pub fn purge_usage_error(limit: i64) -> Option<&'static str> {
    (limit < 1).then_some("Please specify a positive number of messages to delete.")
}

/// Deletes the newest `limit` messages in the channel; returns how many went.
pub async fn purge(http: &Http, channel_id: ChannelId, limit: u64) -> Result<usize> {
    let mut remaining = limit;
    let mut before: Option<MessageId> = None;
    let mut recent = Vec::new();
    let mut old = Vec::new();
    let cutoff = Utc::now() - ChronoDuration::days(BULK_DELETE_MAX_AGE_DAYS);

    while remaining > 0 {
        let page = remaining.min(FETCH_PAGE);
        let messages = channel_id
            .messages(http, |r| {
                if let Some(id) = before {
                    r.before(id);
                }
                r.limit(page)
            })
            .await?;
        if messages.is_empty() {
            break;
        }
        remaining = remaining.saturating_sub(messages.len() as u64);
        before = messages.last().map(|m| m.id);
        for message in messages {
            if message.timestamp.unix_timestamp() > cutoff.timestamp() {
                recent.push(message.id);
            } else {
                old.push(message.id);
            }
        }
    }

    let deleted = recent.len() + old.len();
    for chunk in recent.chunks(FETCH_PAGE as usize) {
        match chunk {
            [single] => channel_id.delete_message(http, *single).await?,
            ids => {
                let ids: Vec<u64> = ids.iter().map(|id| id.0).collect();
                http.delete_messages(channel_id.0, &serde_json::json!({ "messages": ids }))
                    .await?
            }
        }
    }
    for id in old {
        channel_id.delete_message(http, id).await?;
    }
    Ok(deleted)
}

pub async fn send_dm(http: &Http, user_id: UserId, content: &str) -> Result<()> {
    let channel = user_id.create_dm_channel(http).await?;
    channel.say(http, content).await?;
    Ok(())
}

pub fn dm_sent_message(mention: &str) -> String {
    format!("Sent a DM to {}.", mention)
}

pub fn dm_failed_message(mention: &str) -> String {
    format!("Could not send a DM to {}. They might have DMs disabled.", mention)
}

pub const ORDER_66: &str = "Executing Order 66... Goodbye!";
pub const ORDER_55: &str = "⚠️ Executing Order 55... Leaving all servers.";
pub const ORDER_55_DENIED: &str = "❌ You do not have permission to use this command.";
pub const SHUTDOWN_SIGNAL_SENT: &str = "Shutdown signal sent. Runner will stop.";

pub fn role_exists_message(name: &str) -> String {
    format!("Role `{}` already exists.", name)
}

pub fn role_created_message(name: &str) -> String {
    format!("Role `{}` created successfully.", name)
}

pub fn owner_only_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🚫 Access Denied")
        .description("This command is restricted to bot owners only.")
        .colour(RED);
    embed
}

pub fn shutdown_embed() -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🛑 Bot Shutdown")
        .description("Bot is shutting down now...")
        .colour(RED);
    embed
}

/// Leaves a marker file for the process supervisor.
pub async fn write_shutdown_signal(dir: &Path) -> Result<()> {
    tokio::fs::write(dir.join(SHUTDOWN_SIGNAL_FILE), "shutdown").await?;
    Ok(())
}

/// Leaves every guild in `guilds`, logging the ones that fail.
pub async fn leave_all(http: &Http, guilds: &[GuildId]) -> usize {
    let mut left = 0;
    for guild_id in guilds {
        match guild_id.leave(http).await {
            Ok(()) => left += 1,
            Err(e) => warn!("⚠️ Failed to leave guild {}: {}", guild_id, e),
        }
    }
    left
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::title;

    #[test]
    fn test_muted_overwrite() {
        let overwrite = muted_overwrite(RoleId(9));
        assert!(overwrite.deny.send_messages());
        assert!(overwrite.deny.speak());
        assert!(overwrite.deny.view_channel());
        assert!(overwrite.allow.read_message_history());
        assert!(matches!(overwrite.kind, PermissionOverwriteType::Role(RoleId(9))));
    }

    #[test]
    fn test_reason_messages() {
        assert_eq!(muted_message("<@1>", None), "Muted <@1> for reason: None");
        assert_eq!(banned_message("<@1>", Some("spam")), "Banned <@1> for reason: spam");
        assert_eq!(kicked_message("<@1>", Some("  ")), "Kicked <@1> for reason: None");
    }

    #[test]
    fn test_member_action_messages() {
        assert_eq!(
            MemberAction::Ban.forbidden_message("<@2>"),
            "Could not ban <@2>. I lack the necessary permissions."
        );
        assert_eq!(
            MemberAction::Kick.failed_message("<@2>"),
            "An error occurred while trying to kick <@2>."
        );
    }

    #[test]
    fn test_purge_usage() {
        assert!(purge_usage_error(0).is_some());
        assert!(purge_usage_error(-4).is_some());
        assert!(purge_usage_error(1).is_none());
    }

    #[test]
    fn test_owner_embeds() {
        assert_eq!(title(&owner_only_embed()), Some("🚫 Access Denied"));
        assert_eq!(title(&shutdown_embed()), Some("🛑 Bot Shutdown"));
    }

    #[tokio::test]
    async fn test_write_shutdown_signal() {
        let dir = tempfile::tempdir().unwrap();
        write_shutdown_signal(dir.path()).await.unwrap();
        let written = std::fs::read_to_string(dir.path().join(SHUTDOWN_SIGNAL_FILE)).unwrap();
        assert_eq!(written, "shutdown");
    }
}
