//! whois, help, features and the bot info commands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use serenity::model::channel::Message;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::model::Timestamp;
use serenity::prelude::Context;

use super::games::mentioned_user;
use crate::command_handler::{cached_totals, shard_latency, CommandHandler};
use crate::commands::invocation::{Invocation, Reply};
use crate::commands::prefix::PrefixCommand;
use crate::features::{features_embed, toggleable_feature, toggled_message};
use crate::help::{about_embed, lookup_embed, overview_embed, quick_reference_embed, BotStats, HelpView};
use crate::whois::{WhoisProfile, WhoisView};

fn to_utc(timestamp: Timestamp) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0).unwrap_or_default()
}

impl CommandHandler {
    pub(crate) async fn whois(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        let Some(guild_id) = msg.guild_id else {
            msg.channel_id.say(&ctx.http, "This command only works in servers.").await?;
            return Ok(());
        };
        let user = match cmd.arg(0) {
            Some(_) => mentioned_user(ctx, msg, cmd.arg(0)).await,
            None => Some(msg.author.clone()),
        };
        let Some(user) = user else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?whois [@user]")
                .await;
        };

        let member = guild_id.member(ctx, user.id).await?;
        let profile = whois_profile(ctx, guild_id, &member).await?;
        let view = WhoisView::new(profile);
        let reply = Reply::embed(view.embed()).with_components(view.components(false));
        let message = Invocation::prefix(msg).send(ctx, reply).await?;

        self.whois_views.insert(message.id.0, message.channel_id.0, view);
        self.whois_views.spawn_expiry(ctx.http.clone(), message.id.0);
        Ok(())
    }

    pub(crate) async fn help(&self, ctx: &Context, inv: &Invocation<'_>, query: Option<&str>) -> Result<()> {
        if let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) {
            inv.send_embed(ctx, lookup_embed(query)).await?;
            return Ok(());
        }

        let view = HelpView::new(inv.user_id());
        let reply = Reply::embed(overview_embed()).with_components(view.components(false));
        let message = inv.send(ctx, reply).await?;

        self.help_views.insert(message.id.0, message.channel_id.0, view);
        self.help_views.spawn_expiry(ctx.http.clone(), message.id.0);
        Ok(())
    }

    pub(crate) async fn commands(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        inv.send_embed(ctx, quick_reference_embed()).await?;
        Ok(())
    }

    pub(crate) async fn about(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let (guilds, members) = cached_totals(ctx);
        let stats = BotStats {
            guilds,
            members,
            latency_ms: shard_latency(ctx).await.map(|l| l.as_millis()),
            avatar_url: Some(ctx.cache.current_user().face()),
        };
        inv.send_embed(ctx, about_embed(&stats)).await?;
        Ok(())
    }

    pub(crate) async fn features(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let settings = match inv.guild_id() {
            Some(guild_id) => Some(self.database.get_guild_settings(&guild_id.to_string()).await?),
            None => None,
        };
        let embed = features_embed(|id| settings.as_ref().map_or(true, |s| s.is_feature_enabled(id)));
        inv.send_embed(ctx, embed).await?;
        Ok(())
    }

    pub(crate) async fn toggle(&self, ctx: &Context, msg: &Message, feature_id: Option<&str>) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.is_admin).await? {
            return Ok(());
        }
        let Some(guild_id) = msg.guild_id else {
            return Ok(());
        };
        let Some(feature_id) = feature_id else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?toggle <feature>")
                .await;
        };

        let feature = match toggleable_feature(&feature_id.to_lowercase()) {
            Ok(feature) => feature,
            Err(e) => {
                msg.channel_id.say(&ctx.http, e.to_string()).await?;
                return Ok(());
            }
        };

        let key = guild_id.to_string();
        let mut settings = self.database.get_guild_settings(&key).await?;
        let enabled = settings.toggle_feature(feature.id);
        self.database.set_guild_settings(&key, &settings).await?;
        info!(
            "🔧 {} toggled {} to {} in guild {}",
            msg.author.id,
            feature.id,
            if enabled { "on" } else { "off" },
            guild_id
        );

        msg.channel_id.say(&ctx.http, toggled_message(feature, enabled)).await?;
        Ok(())
    }
}

async fn whois_profile(ctx: &Context, guild_id: GuildId, member: &Member) -> Result<WhoisProfile> {
    let guild_roles = guild_id.roles(&ctx.http).await?;
    let mut roles: Vec<_> = member
        .roles
        .iter()
        .filter(|id| id.0 != guild_id.0)
        .filter_map(|id| guild_roles.get(id))
        .collect();
    roles.sort_by_key(|r| r.position);

    let presence = ctx
        .cache
        .guild_field(guild_id, |g| g.presences.get(&member.user.id).cloned())
        .flatten();

    Ok(WhoisProfile {
        user_id: member.user.id.0,
        name: member.user.name.clone(),
        tag: member.user.tag(),
        avatar_url: member.user.face(),
        created_at: to_utc(member.user.created_at()),
        joined_at: member.joined_at.map(to_utc),
        bot: member.user.bot,
        system: false,
        roles: roles.iter().map(|r| format!("<@&{}>", r.id)).collect(),
        activity: presence
            .as_ref()
            .and_then(|p| p.activities.first())
            .map(|a| a.name.clone()),
        status: presence.map(|p| p.status.name().to_string()),
    })
}
