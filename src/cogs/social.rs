//! GIF reactions, say/replysay, avatar and polls.

use anyhow::Result;
use log::warn;
use serenity::model::channel::{AttachmentType, Message, ReactionType};
use serenity::prelude::Context;
use std::borrow::Cow;
use std::time::Duration;

use super::{delete_invocation, mention, say_briefly};
use crate::command_handler::CommandHandler;
use crate::commands::invocation::{Invocation, Reply};
use crate::social::{
    attachment_too_large, avatar_embed, poll_embed, SocialAction, MAX_ATTACHMENT_BYTES, NOTHING_TO_SAY,
    POLLS_CHANNEL, POLL_CREATED, POLL_REACTIONS, REPLY_REQUIRED,
};

const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

struct Upload {
    data: Vec<u8>,
    filename: String,
}

impl CommandHandler {
    pub(crate) async fn social_action(&self, ctx: &Context, msg: &Message, action: &SocialAction) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_permission()).await? {
            return Ok(());
        }

        let target = msg.mentions.first().map(|u| mention(u.id.0));
        if action.needs_target && target.is_none() {
            let usage = format!("?{} @user", action.name);
            return self.missing_arguments(ctx, &Invocation::prefix(msg), &usage).await;
        }

        delete_invocation(ctx, msg).await;
        let text = action.render(&mut rand::rng(), &mention(msg.author.id.0), target.as_deref());
        msg.channel_id.say(&ctx.http, text).await?;
        Ok(())
    }

    pub(crate) async fn say(&self, ctx: &Context, msg: &Message, text: &str) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_permission()).await? {
            return Ok(());
        }

        let uploads = collect_uploads(ctx, msg, true).await?;
        delete_invocation(ctx, msg).await;

        if text.is_empty() && uploads.is_empty() {
            msg.channel_id.say(&ctx.http, NOTHING_TO_SAY).await?;
            return Ok(());
        }

        msg.channel_id
            .send_message(&ctx.http, |m| {
                if !text.is_empty() {
                    m.content(text);
                }
                for upload in uploads {
                    m.add_file(AttachmentType::Bytes {
                        data: Cow::Owned(upload.data),
                        filename: upload.filename,
                    });
                }
                m
            })
            .await?;
        Ok(())
    }

    pub(crate) async fn replysay(&self, ctx: &Context, msg: &Message, text: &str) -> Result<()> {
        if !self.require_access(ctx, msg, |a| a.has_permission()).await? {
            return Ok(());
        }

        let Some(target) = msg
            .message_reference
            .as_ref()
            .and_then(|r| r.message_id.map(|id| (r.channel_id, id)))
        else {
            msg.channel_id.say(&ctx.http, REPLY_REQUIRED).await?;
            return Ok(());
        };

        let uploads = collect_uploads(ctx, msg, false).await?;
        delete_invocation(ctx, msg).await;

        target
            .0
            .send_message(&ctx.http, |m| {
                m.reference_message(target);
                if !text.is_empty() {
                    m.content(text);
                }
                for upload in uploads {
                    m.add_file(AttachmentType::Bytes {
                        data: Cow::Owned(upload.data),
                        filename: upload.filename,
                    });
                }
                m
            })
            .await?;
        Ok(())
    }

    pub(crate) async fn avatar(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let user = msg.mentions.first().unwrap_or(&msg.author);
        let requested_by = Invocation::prefix(msg).display_name();
        let embed = avatar_embed(&user.name, &user.face(), &requested_by);
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(embed))
            .await?;
        Ok(())
    }

    pub(crate) async fn poll(
        &self,
        ctx: &Context,
        inv: &Invocation<'_>,
        question: &str,
        option_one: &str,
        option_two: &str,
    ) -> Result<()> {
        inv.send(ctx, Reply::text(POLL_CREATED).ephemeral()).await?;

        let Some(guild_id) = inv.guild_id() else {
            return Ok(());
        };
        let channels = guild_id.channels(&ctx.http).await?;
        let Some(polls) = channels.values().find(|c| c.name == POLLS_CHANNEL) else {
            warn!("⚠️ No #{} channel in guild {}", POLLS_CHANNEL, guild_id);
            return Ok(());
        };

        let embed = poll_embed(question, option_one, option_two, &inv.display_name());
        let poll = polls.id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
        for reaction in POLL_REACTIONS {
            polls
                .id
                .create_reaction(&ctx.http, poll.id, ReactionType::Unicode(reaction.to_string()))
                .await?;
        }
        Ok(())
    }
}

/// Downloads the message's attachments up to the upload limit. With `notify`
/// each skipped file gets a short-lived notice.
async fn collect_uploads(ctx: &Context, msg: &Message, notify: bool) -> Result<Vec<Upload>> {
    let mut uploads = Vec::new();
    for attachment in &msg.attachments {
        if attachment.size > MAX_ATTACHMENT_BYTES {
            if notify {
                say_briefly(&ctx.http, msg.channel_id, attachment_too_large(&attachment.filename), NOTICE_LIFETIME)
                    .await?;
            }
            continue;
        }
        match attachment.download().await {
            Ok(data) => uploads.push(Upload {
                data,
                filename: attachment.filename.clone(),
            }),
            Err(e) => {
                warn!("⚠️ Could not download attachment {}: {}", attachment.filename, e);
                if notify {
                    let notice = format!("Attachment `{}` was not found or deleted.", attachment.filename);
                    say_briefly(&ctx.http, msg.channel_id, notice, NOTICE_LIFETIME).await?;
                }
            }
        }
    }
    Ok(uploads)
}
