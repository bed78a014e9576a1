//! Command implementations, one `impl CommandHandler` block per cog.

mod events;
mod games;
mod grammar;
mod moderation;
mod pomodoro;
mod reference;
mod scripts;
mod social;
mod utility;

use anyhow::Result;
use log::debug;
use serenity::http::Http;
use serenity::model::channel::Message;
use serenity::model::id::ChannelId;
use serenity::prelude::Context;
use std::sync::Arc;
use std::time::Duration;

use crate::command_handler::CommandHandler;
use crate::permissions::{denial_message, MemberAccess};

impl CommandHandler {
    /// Resolves the author's roles and replies with the standard denial
    /// when `allowed` refuses them. Direct messages are always refused.
    pub(crate) async fn require_access(
        &self,
        ctx: &Context,
        msg: &Message,
        allowed: impl Fn(&MemberAccess) -> bool,
    ) -> Result<bool> {
        let granted = match msg.guild_id {
            Some(guild_id) => {
                let access = MemberAccess::resolve(ctx, guild_id, msg.author.id).await?;
                allowed(&access)
            }
            None => false,
        };
        if !granted {
            msg.channel_id
                .say(&ctx.http, denial_message(&format!("<@{}>", msg.author.id)))
                .await?;
        }
        Ok(granted)
    }
}

pub(crate) fn mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

/// Deletes the invoking message; missing permissions are not an error.
pub(crate) async fn delete_invocation(ctx: &Context, msg: &Message) {
    if let Err(e) = msg.channel_id.delete_message(&ctx.http, msg.id).await {
        debug!("Could not delete invocation {}: {}", msg.id, e);
    }
}

/// Posts a line and removes it again after `after`.
pub(crate) async fn say_briefly(http: &Arc<Http>, channel_id: ChannelId, content: impl std::fmt::Display, after: Duration) -> Result<()> {
    let message = channel_id.say(http, content).await?;
    let http = Arc::clone(http);
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        if let Err(e) = channel_id.delete_message(&http, message.id).await {
            debug!("Could not delete transient message {}: {}", message.id, e);
        }
    });
    Ok(())
}
