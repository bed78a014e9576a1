//! Scheduled events with RSVP buttons.

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use log::info;
use serenity::model::id::UserId;
use serenity::prelude::Context;

use crate::command_handler::CommandHandler;
use crate::commands::invocation::{Invocation, Reply};
use crate::commands::prefix::PrefixCommand;
use crate::events::{
    cancel_embed, error_embed, event_embed, events_list_embed, not_found_embed, parse_datetime, rsvp_components,
    validate, EventData, DEFAULT_DURATION_MINUTES,
};
use crate::permissions::MemberAccess;

const CREATE_USAGE: &str = "?createevent \"<title>\" <date> <time> [duration] [description]";
const NO_DESCRIPTION: &str = "No description provided.";
const SERVER_ONLY: &str = "Events are only available in servers.";

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl CommandHandler {
    /// `?createevent "<title>" <date> <time> [duration] [description]`
    pub(crate) async fn createevent_prefix(&self, ctx: &Context, inv: &Invocation<'_>, cmd: &PrefixCommand) -> Result<()> {
        let (Some(title), Some(date), Some(time)) = (cmd.arg(0), cmd.arg(1), cmd.arg(2)) else {
            return self.missing_arguments(ctx, inv, CREATE_USAGE).await;
        };

        let (duration, description) = match cmd.arg(3).and_then(|d| d.parse::<i64>().ok()) {
            Some(duration) => (Some(duration), cmd.rest_after(4)),
            None => (None, cmd.rest_after(3)),
        };
        self.create_event(ctx, inv, title, date, time, duration, &description)
            .await
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) async fn create_event(
        &self,
        ctx: &Context,
        inv: &Invocation<'_>,
        title: &str,
        date: &str,
        time: &str,
        duration: Option<i64>,
        description: &str,
    ) -> Result<()> {
        let Some(guild_id) = inv.guild_id() else {
            inv.send(ctx, Reply::text(SERVER_ONLY).ephemeral()).await?;
            return Ok(());
        };

        let now = now();
        let duration = duration.unwrap_or(DEFAULT_DURATION_MINUTES);
        let start = match validate(parse_datetime(date, time), duration, now) {
            Ok(start) => start,
            Err(err) => {
                inv.send(ctx, Reply::embed(error_embed(&err)).ephemeral()).await?;
                return Ok(());
            }
        };

        let description = match description.trim() {
            "" => NO_DESCRIPTION,
            text => text,
        };
        let event = EventData::new(
            title.trim(),
            description,
            inv.user_id(),
            guild_id.0,
            inv.channel_id().0,
            start,
            duration,
            now,
        );
        let embed = event_embed(&event, &inv.display_name(), now);
        let components = rsvp_components(&event.event_id);
        let event_id = event.event_id.clone();
        self.events.create(event).await?;

        info!("📅 Event {} created by {} in guild {}", event_id, inv.user_id(), guild_id);
        inv.send(ctx, Reply::embed(embed).with_components(components)).await?;
        Ok(())
    }

    pub(crate) async fn list_events(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let Some(guild_id) = inv.guild_id() else {
            inv.send(ctx, Reply::text(SERVER_ONLY).ephemeral()).await?;
            return Ok(());
        };

        let now = now();
        let events = self.events.upcoming(guild_id.0, now).await;
        inv.send_embed(ctx, events_list_embed(&events, now)).await?;
        Ok(())
    }

    pub(crate) async fn event_info(&self, ctx: &Context, inv: &Invocation<'_>, event_id: Option<&str>) -> Result<()> {
        let Some(event_id) = event_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return self.missing_arguments(ctx, inv, "?eventinfo <event_id>").await;
        };

        let event = self
            .events
            .get(event_id)
            .await
            .filter(|e| Some(e.guild_id) == inv.guild_id().map(|g| g.0));
        let Some(event) = event else {
            inv.send(ctx, Reply::embed(not_found_embed(event_id)).ephemeral()).await?;
            return Ok(());
        };

        let creator_name = match UserId(event.creator_id).to_user(ctx).await {
            Ok(user) => user.name,
            Err(_) => "Unknown User".to_string(),
        };
        let mut reply = Reply::embed(event_embed(&event, &creator_name, now()));
        if !event.is_cancelled {
            reply = reply.with_components(rsvp_components(&event.event_id));
        }
        inv.send(ctx, reply).await?;
        Ok(())
    }

    pub(crate) async fn cancel_event(&self, ctx: &Context, inv: &Invocation<'_>, event_id: Option<&str>) -> Result<()> {
        let Some(event_id) = event_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return self.missing_arguments(ctx, inv, "?cancelevent <event_id>").await;
        };
        let Some(guild_id) = inv.guild_id() else {
            inv.send(ctx, Reply::text(SERVER_ONLY).ephemeral()).await?;
            return Ok(());
        };

        let access = MemberAccess::resolve(ctx, guild_id, inv.user().id).await?;
        let outcome = self
            .events
            .cancel(event_id, guild_id.0, inv.user_id(), access.is_admin)
            .await?;
        info!("📅 Cancel of event {} by {}: {:?}", event_id, inv.user_id(), outcome);
        inv.send_embed(ctx, cancel_embed(&outcome, event_id)).await?;
        Ok(())
    }
}
