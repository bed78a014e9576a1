//! One reply path for both prefix and slash invocations.
//!
//! Cog handlers take an [`Invocation`] and answer through [`Invocation::send`].
//! A prefix command posts to its channel. A slash command answers its
//! interaction first (or fills in the deferred response) and sends followups
//! after that.

use anyhow::Result;
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, GuildId};
use serenity::model::user::User;
use serenity::prelude::Context;
use std::sync::atomic::{AtomicBool, Ordering};

/// A message to send back, whichever way the command arrived.
#[derive(Default, Clone)]
pub struct Reply {
    pub content: Option<String>,
    pub embed: Option<CreateEmbed>,
    pub components: Option<CreateComponents>,
    /// Only honoured for slash commands.
    pub ephemeral: bool,
}

impl Reply {
    pub fn text(content: impl Into<String>) -> Self {
        Reply {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn embed(embed: CreateEmbed) -> Self {
        Reply {
            embed: Some(embed),
            ..Default::default()
        }
    }

    pub fn with_components(mut self, components: CreateComponents) -> Self {
        self.components = Some(components);
        self
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

enum Source<'a> {
    Prefix(&'a Message),
    Slash(&'a ApplicationCommandInteraction),
}

pub struct Invocation<'a> {
    source: Source<'a>,
    deferred: AtomicBool,
    responded: AtomicBool,
}

impl<'a> Invocation<'a> {
    pub fn prefix(message: &'a Message) -> Self {
        Self::from_source(Source::Prefix(message))
    }

    pub fn slash(command: &'a ApplicationCommandInteraction) -> Self {
        Self::from_source(Source::Slash(command))
    }

    fn from_source(source: Source<'a>) -> Self {
        Invocation {
            source,
            deferred: AtomicBool::new(false),
            responded: AtomicBool::new(false),
        }
    }

    pub fn is_slash(&self) -> bool {
        matches!(self.source, Source::Slash(_))
    }

    pub fn user(&self) -> &User {
        match self.source {
            Source::Prefix(message) => &message.author,
            Source::Slash(command) => &command.user,
        }
    }

    pub fn user_id(&self) -> u64 {
        self.user().id.0
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id())
    }

    /// Guild nickname when known, else the global name.
    pub fn display_name(&self) -> String {
        let nick = match self.source {
            Source::Prefix(message) => message.member.as_ref().and_then(|m| m.nick.clone()),
            Source::Slash(command) => command.member.as_ref().and_then(|m| m.nick.clone()),
        };
        nick.unwrap_or_else(|| self.user().name.clone())
    }

    pub fn guild_id(&self) -> Option<GuildId> {
        match self.source {
            Source::Prefix(message) => message.guild_id,
            Source::Slash(command) => command.guild_id,
        }
    }

    pub fn channel_id(&self) -> ChannelId {
        match self.source {
            Source::Prefix(message) => message.channel_id,
            Source::Slash(command) => command.channel_id,
        }
    }

    /// Acknowledges a slow slash command; prefix commands show typing instead.
    pub async fn defer(&self, ctx: &Context) -> Result<()> {
        match self.source {
            Source::Prefix(message) => {
                message.channel_id.broadcast_typing(&ctx.http).await?;
            }
            Source::Slash(command) => {
                if !self.responded.load(Ordering::SeqCst) && !self.deferred.swap(true, Ordering::SeqCst) {
                    command.defer(&ctx.http).await?;
                }
            }
        }
        Ok(())
    }

    pub async fn say(&self, ctx: &Context, content: impl Into<String>) -> Result<Message> {
        self.send(ctx, Reply::text(content)).await
    }

    pub async fn send_embed(&self, ctx: &Context, embed: CreateEmbed) -> Result<Message> {
        self.send(ctx, Reply::embed(embed)).await
    }

    pub async fn send(&self, ctx: &Context, reply: Reply) -> Result<Message> {
        match self.source {
            Source::Prefix(message) => {
                let sent = message
                    .channel_id
                    .send_message(&ctx.http, |m| {
                        if let Some(content) = reply.content {
                            m.content(content);
                        }
                        if let Some(embed) = reply.embed {
                            m.set_embed(embed);
                        }
                        if let Some(components) = reply.components {
                            m.set_components(components);
                        }
                        m
                    })
                    .await?;
                Ok(sent)
            }
            Source::Slash(command) => self.send_slash(ctx, command, reply).await,
        }
    }

    async fn send_slash(&self, ctx: &Context, command: &ApplicationCommandInteraction, reply: Reply) -> Result<Message> {
        if self.responded.swap(true, Ordering::SeqCst) {
            let sent = command
                .create_followup_message(&ctx.http, |f| {
                    if let Some(content) = reply.content {
                        f.content(content);
                    }
                    if let Some(embed) = reply.embed {
                        f.add_embed(embed);
                    }
                    if let Some(components) = reply.components {
                        f.components(|c| {
                            *c = components;
                            c
                        });
                    }
                    f.ephemeral(reply.ephemeral)
                })
                .await?;
            return Ok(sent);
        }

        if self.deferred.load(Ordering::SeqCst) {
            let sent = command
                .edit_original_interaction_response(&ctx.http, |r| {
                    if let Some(content) = reply.content {
                        r.content(content);
                    }
                    if let Some(embed) = reply.embed {
                        r.add_embed(embed);
                    }
                    if let Some(components) = reply.components {
                        r.components(|c| {
                            *c = components;
                            c
                        });
                    }
                    r
                })
                .await?;
            return Ok(sent);
        }

        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|d| {
                        if let Some(content) = reply.content {
                            d.content(content);
                        }
                        if let Some(embed) = reply.embed {
                            d.add_embed(embed);
                        }
                        if let Some(components) = reply.components {
                            d.set_components(components);
                        }
                        d.ephemeral(reply.ephemeral)
                    })
            })
            .await?;
        Ok(command.get_interaction_response(&ctx.http).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::title;

    #[test]
    fn test_reply_builders() {
        let reply = Reply::text("hi").ephemeral();
        assert_eq!(reply.content.as_deref(), Some("hi"));
        assert!(reply.ephemeral);
        assert!(reply.embed.is_none());

        let mut embed = CreateEmbed::default();
        embed.title("Card");
        let reply = Reply::embed(embed).with_components(CreateComponents::default());
        assert_eq!(title(reply.embed.as_ref().unwrap()), Some("Card"));
        assert!(reply.components.is_some());
        assert!(!reply.ephemeral);
    }
}
