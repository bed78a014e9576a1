//! Member management and owner-only bot controls.

use anyhow::Result;
use log::{error, info, warn};
use serenity::model::channel::Message;
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::prelude::{Context, Mentionable};
use std::path::Path;
use std::time::Duration;

use super::games::mentioned_user;
use super::say_briefly;
use crate::command_handler::{CommandHandler, ShardManagerContainer};
use crate::commands::invocation::Invocation;
use crate::commands::prefix::PrefixCommand;
use crate::moderation::{
    banned_message, dm_failed_message, dm_sent_message, ensure_muted_role, find_role, is_forbidden, kicked_message,
    leave_all, muted_message, owner_only_embed, purge, purge_usage_error, role_created_message, role_exists_message,
    send_dm, shutdown_embed, write_shutdown_signal, MemberAction, MUTED_ROLE, ORDER_55, ORDER_55_DENIED, ORDER_66,
    SHUTDOWN_SIGNAL_SENT,
};
use crate::permissions::denial_message;

const PURGE_NOTICE_LIFETIME: Duration = Duration::from_secs(5);
const PURGE_EXTRA_ROLE: &str = "Funnycommands";

fn serenity_forbidden(err: &anyhow::Error) -> bool {
    err.downcast_ref::<serenity::Error>().map_or(false, is_forbidden)
}

impl CommandHandler {
    /// Owners always pass; everyone else needs a moderator role.
    async fn require_moderator(&self, ctx: &Context, msg: &Message, extra_role: Option<&str>) -> Result<bool> {
        if self.config.is_owner(msg.author.id.0) {
            return Ok(true);
        }
        self.require_access(ctx, msg, |a| {
            a.is_moderator() || extra_role.map_or(false, |role| a.has_role(role))
        })
        .await
    }

    /// Resolves the target member for mute/ban/kick style commands.
    async fn target_member(
        &self,
        ctx: &Context,
        msg: &Message,
        cmd: &PrefixCommand,
        usage: &str,
    ) -> Result<Option<(GuildId, User)>> {
        let Some(guild_id) = msg.guild_id else {
            return Ok(None);
        };
        match mentioned_user(ctx, msg, cmd.arg(0)).await {
            Some(user) => Ok(Some((guild_id, user))),
            None => {
                self.missing_arguments(ctx, &Invocation::prefix(msg), usage).await?;
                Ok(None)
            }
        }
    }

    pub(crate) async fn mute(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        if !self.require_moderator(ctx, msg, None).await? {
            return Ok(());
        }
        let Some((guild_id, user)) = self.target_member(ctx, msg, cmd, "?mute @user [reason]").await? else {
            return Ok(());
        };
        let reason = cmd.rest_after(1);
        let reason = (!reason.is_empty()).then_some(reason.as_str());

        let role_id = ensure_muted_role(&ctx.http, guild_id).await?;
        let mut member = guild_id.member(ctx, user.id).await?;
        member.add_role(&ctx.http, role_id).await?;
        info!("🔇 {} muted {} in guild {}", msg.author.id, user.id, guild_id);

        msg.channel_id
            .say(&ctx.http, muted_message(&user.mention().to_string(), reason))
            .await?;
        Ok(())
    }

    pub(crate) async fn unmute(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        if !self.require_moderator(ctx, msg, None).await? {
            return Ok(());
        }
        let Some((guild_id, user)) = self.target_member(ctx, msg, cmd, "?unmute @user").await? else {
            return Ok(());
        };

        let mention = user.mention().to_string();
        let mut member = guild_id.member(ctx, user.id).await?;
        let muted = find_role(&ctx.http, guild_id, MUTED_ROLE)
            .await?
            .filter(|role_id| member.roles.contains(role_id));
        match muted {
            Some(role_id) => {
                member.remove_role(&ctx.http, role_id).await?;
                info!("🔊 {} unmuted {} in guild {}", msg.author.id, user.id, guild_id);
                msg.channel_id.say(&ctx.http, format!("Unmuted {}", mention)).await?;
            }
            None => {
                msg.channel_id
                    .say(&ctx.http, format!("{} is not muted.", mention))
                    .await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn ban_or_kick(
        &self,
        ctx: &Context,
        msg: &Message,
        cmd: &PrefixCommand,
        action: MemberAction,
    ) -> Result<()> {
        if !self.require_moderator(ctx, msg, None).await? {
            return Ok(());
        }
        let usage = match action {
            MemberAction::Ban => "?ban @user [reason]",
            MemberAction::Kick => "?kick @user [reason]",
        };
        let Some((guild_id, user)) = self.target_member(ctx, msg, cmd, usage).await? else {
            return Ok(());
        };
        let reason = cmd.rest_after(1);
        let reason = (!reason.is_empty()).then_some(reason.as_str());
        let mention = user.mention().to_string();

        let result = match (action, reason) {
            (MemberAction::Ban, Some(reason)) => guild_id.ban_with_reason(&ctx.http, user.id, 0, reason).await,
            (MemberAction::Ban, None) => guild_id.ban(&ctx.http, user.id, 0).await,
            (MemberAction::Kick, Some(reason)) => guild_id.kick_with_reason(&ctx.http, user.id, reason).await,
            (MemberAction::Kick, None) => guild_id.kick(&ctx.http, user.id).await,
        };

        let reply = match result {
            Ok(()) => {
                info!("🔨 {} used {:?} on {} in guild {}", msg.author.id, action, user.id, guild_id);
                match action {
                    MemberAction::Ban => banned_message(&mention, reason),
                    MemberAction::Kick => kicked_message(&mention, reason),
                }
            }
            Err(e) if is_forbidden(&e) => {
                error!("❌ {:?} of {} refused: insufficient permissions", action, user.id);
                action.forbidden_message(&mention)
            }
            Err(e) => {
                error!("❌ {:?} of {} failed: {}", action, user.id, e);
                action.failed_message(&mention)
            }
        };
        msg.channel_id.say(&ctx.http, reply).await?;
        Ok(())
    }

    pub(crate) async fn purge(&self, ctx: &Context, msg: &Message, limit: Option<&str>) -> Result<()> {
        if !self.require_moderator(ctx, msg, Some(PURGE_EXTRA_ROLE)).await? {
            return Ok(());
        }
        let Some(limit) = limit.and_then(|l| l.parse::<i64>().ok()) else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?purge <count>")
                .await;
        };
        if let Some(error) = purge_usage_error(limit) {
            msg.channel_id.say(&ctx.http, error).await?;
            return Ok(());
        }

        match purge(&ctx.http, msg.channel_id, limit as u64).await {
            Ok(deleted) => {
                info!("🧹 {} purged {} message(s) in {}", msg.author.id, deleted, msg.channel_id);
                say_briefly(
                    &ctx.http,
                    msg.channel_id,
                    format!("Deleted {} messages.", deleted),
                    PURGE_NOTICE_LIFETIME,
                )
                .await?;
            }
            Err(e) if serenity_forbidden(&e) => {
                msg.channel_id
                    .say(&ctx.http, "I do not have permission to delete messages in this channel.")
                    .await?;
            }
            Err(e) => {
                error!("❌ Purge in {} failed: {}", msg.channel_id, e);
                msg.channel_id
                    .say(&ctx.http, format!("An HTTP error occurred: {}", e))
                    .await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn dm(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        if !self.require_moderator(ctx, msg, None).await? {
            return Ok(());
        }
        let inv = Invocation::prefix(msg);
        let Some(user) = mentioned_user(ctx, msg, cmd.arg(0)).await else {
            return self.missing_arguments(ctx, &inv, "?dm @user <message>").await;
        };
        let text = cmd.rest_after(1);
        if text.is_empty() {
            return self.missing_arguments(ctx, &inv, "?dm @user <message>").await;
        }

        let mention = user.mention().to_string();
        let reply = match send_dm(&ctx.http, user.id, &text).await {
            Ok(()) => dm_sent_message(&mention),
            Err(e) if serenity_forbidden(&e) => {
                warn!("⚠️ Failed to send DM to {}. User might have DMs disabled.", user.id);
                dm_failed_message(&mention)
            }
            Err(e) => {
                error!("❌ Unexpected error while sending DM to {}: {}", user.id, e);
                format!("An error occurred while trying to send a DM to {}.", mention)
            }
        };
        msg.channel_id.say(&ctx.http, reply).await?;
        Ok(())
    }

    pub(crate) async fn order66(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if !self.config.is_owner(msg.author.id.0) {
            msg.channel_id
                .say(&ctx.http, denial_message(&msg.author.mention().to_string()))
                .await?;
            return Ok(());
        }
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };

        msg.channel_id.say(&ctx.http, ORDER_66).await?;
        info!("🚪 Order 66 from {}: leaving guild {}", msg.author.id, guild_id);
        guild_id.leave(&ctx.http).await?;
        Ok(())
    }

    pub(crate) async fn order55(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if !self.config.is_owner(msg.author.id.0) {
            msg.channel_id.say(&ctx.http, ORDER_55_DENIED).await?;
            return Ok(());
        }

        msg.channel_id.say(&ctx.http, ORDER_55).await?;
        let guilds = ctx.cache.guilds();
        let left = leave_all(&ctx.http, &guilds).await;
        warn!("🚪 Order 55 from {}: left {}/{} guild(s)", msg.author.id, left, guilds.len());
        Ok(())
    }

    /// Closes every shard; `super_` first leaves a signal file so the runner stays down.
    pub(crate) async fn hard_shutdown(&self, ctx: &Context, msg: &Message, super_: bool) -> Result<()> {
        if !self.config.is_owner(msg.author.id.0) {
            msg.channel_id
                .send_message(&ctx.http, |m| m.set_embed(owner_only_embed()))
                .await?;
            return Ok(());
        }

        if super_ {
            write_shutdown_signal(Path::new(".")).await?;
            info!("🛑 Shutdown signal written by {}", msg.author.id);
            msg.channel_id.say(&ctx.http, SHUTDOWN_SIGNAL_SENT).await?;
        } else {
            msg.channel_id
                .send_message(&ctx.http, |m| m.set_embed(shutdown_embed()))
                .await?;
        }
        info!("🛑 Bot shutdown initiated by {} ({})", msg.author.name, msg.author.id);

        let manager = {
            let data = ctx.data.read().await;
            data.get::<ShardManagerContainer>().cloned()
        };
        match manager {
            Some(manager) => manager.lock().await.shutdown_all().await,
            None => error!("❌ Shard manager unavailable; cannot shut down"),
        }
        Ok(())
    }

    pub(crate) async fn orderrole(&self, ctx: &Context, msg: &Message, name: &str) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_role("Admin")).await? {
            return Ok(());
        }
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };
        let name = name.trim();
        if name.is_empty() {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?orderrole <role name>")
                .await;
        }

        if find_role(&ctx.http, guild_id, name).await?.is_some() {
            msg.channel_id.say(&ctx.http, role_exists_message(name)).await?;
            return Ok(());
        }

        let reply = match guild_id.create_role(&ctx.http, |r| r.name(name)).await {
            Ok(_) => {
                info!("🏷️ Role '{}' created in guild {} by {}", name, guild_id, msg.author.id);
                role_created_message(name)
            }
            Err(e) if is_forbidden(&e) => "I do not have permission to create roles.".to_string(),
            Err(e) => format!("Error creating role: {}", e),
        };
        msg.channel_id.say(&ctx.http, reply).await?;
        Ok(())
    }
}
