//! `?script` subcommands for table reads in voice channels.

use anyhow::Result;
use log::{error, info};
use serenity::model::channel::{AttachmentType, Message};
use serenity::builder::CreateEmbed;
use serenity::model::id::{ChannelId, GuildId};
use serenity::prelude::Context;
use std::borrow::Cow;
use std::collections::HashMap;

use super::games::mentioned_user;
use crate::command_handler::CommandHandler;
use crate::commands::invocation::Invocation;
use crate::commands::prefix::PrefixCommand;
use crate::permissions::MemberAccess;
use crate::script_session::{
    assigned_embed, bulk_added_embed, cast_embed, character_added_embed, cleared_embed, ended_embed, exported_embed,
    info_embed, loaded_embed, overview_embed, parse_character_lines, parse_upload, started_embed,
    template_saved_embed, templates_embed, unassigned_embed, upload_help_embed, uploaded_embed, voice_embed, voice_presence,
    ExportFormat, ScriptSession, NO_DESCRIPTION, NO_SESSION,
};

const DEFAULT_TITLE: &str = "Custom Session";

impl CommandHandler {
    pub(crate) async fn script(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        let Some(guild_id) = msg.guild_id else {
            msg.channel_id
                .say(&ctx.http, "Script sessions are only available in servers.")
                .await?;
            return Ok(());
        };

        let subcommand = cmd.arg(0).map(str::to_lowercase);
        match subcommand.as_deref() {
            Some("templates") => self.script_templates(ctx, msg).await,
            Some("load") => self.script_load(ctx, msg, guild_id, cmd.arg(1)).await,
            Some("start") => self.script_start(ctx, msg, guild_id, &cmd.rest_after(1)).await,
            Some("upload") => self.script_upload(ctx, msg, guild_id).await,
            Some("addmultiple") | Some("bulk") => self.script_add_multiple(ctx, msg, guild_id, &cmd.rest_after(1)).await,
            Some("addchar") => self.script_add_character(ctx, msg, guild_id, cmd).await,
            Some("assign") => self.script_assign(ctx, msg, guild_id, cmd).await,
            Some("unassign") => self.script_unassign(ctx, msg, guild_id, cmd.arg(1)).await,
            Some("cast") => self.script_cast(ctx, msg, guild_id).await,
            Some("vc") => self.script_voice(ctx, msg, guild_id).await,
            Some("export") => self.script_export(ctx, msg, guild_id, cmd.arg(1)).await,
            Some("template") => self.script_save_template(ctx, msg, guild_id, cmd.arg(1)).await,
            Some("end") => self.script_end(ctx, msg, guild_id, false).await,
            Some("clear") | Some("reset") => self.script_end(ctx, msg, guild_id, true).await,
            Some("info") => self.script_info(ctx, msg, guild_id).await,
            _ => {
                msg.channel_id
                    .send_message(&ctx.http, |m| m.set_embed(overview_embed()))
                    .await?;
                Ok(())
            }
        }
    }

    async fn script_templates(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let templates = self.scripts.templates();
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(templates_embed(&templates)))
            .await?;
        Ok(())
    }

    async fn script_load(&self, ctx: &Context, msg: &Message, guild_id: GuildId, key: Option<&str>) -> Result<()> {
        let Some(key) = key else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?script load <template>")
                .await;
        };
        let Some(play) = self.scripts.template(key) else {
            msg.channel_id
                .say(
                    &ctx.http,
                    "❌ Template not found! Use `?script templates` to see available templates.",
                )
                .await?;
            return Ok(());
        };

        let voice_channel = user_voice_channel(ctx, guild_id, msg.author.id.0);
        let session = ScriptSession::from_play(&play, msg.author.id.0, voice_channel);
        let embed = loaded_embed(&session);
        self.scripts.replace(guild_id.0, session);
        info!("🎭 Loaded template '{}' in guild {}", key, guild_id);

        msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
        Ok(())
    }

    async fn script_start(&self, ctx: &Context, msg: &Message, guild_id: GuildId, title: &str) -> Result<()> {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        let author = Invocation::prefix(msg).display_name();
        let voice_channel = user_voice_channel(ctx, guild_id, msg.author.id.0);
        let session = ScriptSession::new(title, &author, msg.author.id.0, voice_channel);

        if !self.scripts.start(guild_id.0, session) {
            msg.channel_id
                .say(&ctx.http, "❌ A session is already active! Use `?script end` to end it first.")
                .await?;
            return Ok(());
        }
        info!("🎭 Script session '{}' started in guild {}", title, guild_id);
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(started_embed(title)))
            .await?;
        Ok(())
    }

    async fn script_upload(&self, ctx: &Context, msg: &Message, guild_id: GuildId) -> Result<()> {
        if !self.scripts.is_active(guild_id.0) {
            msg.channel_id
                .say(&ctx.http, "❌ No active session! Use `?script start` first to create a session.")
                .await?;
            return Ok(());
        }
        let Some(attachment) = msg.attachments.first() else {
            msg.channel_id
                .send_message(&ctx.http, |m| m.set_embed(upload_help_embed()))
                .await?;
            return Ok(());
        };

        let content = match attachment.download().await.map(String::from_utf8) {
            Ok(Ok(content)) => content,
            Ok(Err(e)) => {
                error!("❌ Uploaded script is not UTF-8: {}", e);
                msg.channel_id
                    .say(&ctx.http, "❌ Error processing your file! Please check the format and try again.")
                    .await?;
                return Ok(());
            }
            Err(e) => {
                error!("❌ Could not download uploaded script: {}", e);
                msg.channel_id
                    .say(&ctx.http, "❌ Error processing your file! Please check the format and try again.")
                    .await?;
                return Ok(());
            }
        };

        let upload = match parse_upload(&attachment.filename, &content) {
            Ok(upload) => upload,
            Err(e) => {
                msg.channel_id.say(&ctx.http, e.to_string()).await?;
                return Ok(());
            }
        };

        let embed = self.scripts.with_session(guild_id.0, |session| {
            if let Some(title) = upload.title {
                session.title = title;
            }
            if let Some(author) = upload.author {
                session.author = author;
            }
            let added = session.add_characters(&upload.characters);
            uploaded_embed(session, added)
        });
        match embed {
            Some(embed) => {
                msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
            }
            None => {
                msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            }
        }
        Ok(())
    }

    async fn script_add_multiple(&self, ctx: &Context, msg: &Message, guild_id: GuildId, text: &str) -> Result<()> {
        let entries = parse_character_lines(text);
        if entries.is_empty() {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?script addmultiple <Name - Description per line>")
                .await;
        }

        let embed = self.scripts.with_session(guild_id.0, |session| {
            let added = session.add_characters(&entries);
            bulk_added_embed(&session.title, added)
        });
        self.send_or_no_session(ctx, msg, embed).await
    }

    async fn script_add_character(&self, ctx: &Context, msg: &Message, guild_id: GuildId, cmd: &PrefixCommand) -> Result<()> {
        let Some(name) = cmd.arg(1) else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?script addchar <name> [description]")
                .await;
        };
        let description = match cmd.rest_after(2) {
            d if d.is_empty() => NO_DESCRIPTION.to_string(),
            d => d,
        };

        let embed = self.scripts.with_session(guild_id.0, |session| {
            session.add_character(name, &description);
            character_added_embed(name.trim(), &description)
        });
        self.send_or_no_session(ctx, msg, embed).await
    }

    async fn script_assign(&self, ctx: &Context, msg: &Message, guild_id: GuildId, cmd: &PrefixCommand) -> Result<()> {
        let inv = Invocation::prefix(msg);
        let Some(name) = cmd.arg(1) else {
            return self
                .missing_arguments(ctx, &inv, "?script assign <character> @user")
                .await;
        };
        let Some(user) = mentioned_user(ctx, msg, cmd.arg(2)).await else {
            return self
                .missing_arguments(ctx, &inv, "?script assign <character> @user")
                .await;
        };

        let user_channel = user_voice_channel(ctx, guild_id, user.id.0);
        let outcome = self.scripts.with_session(guild_id.0, |session| {
            let presence = voice_presence(session, user_channel);
            session
                .assign(name, user.id.0)
                .map(|character| assigned_embed(character, user.id.0, presence))
        });
        match outcome {
            None => {
                msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            }
            Some(Err(e)) => {
                msg.channel_id.say(&ctx.http, e.message()).await?;
            }
            Some(Ok(embed)) => {
                msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
            }
        }
        Ok(())
    }

    async fn script_unassign(&self, ctx: &Context, msg: &Message, guild_id: GuildId, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?script unassign <character>")
                .await;
        };

        match self.scripts.with_session(guild_id.0, |session| session.unassign(name)) {
            None => {
                msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            }
            Some(Err(e)) => {
                msg.channel_id.say(&ctx.http, e.message()).await?;
            }
            Some(Ok(character)) => {
                msg.channel_id
                    .send_message(&ctx.http, |m| m.set_embed(unassigned_embed(&character)))
                    .await?;
            }
        }
        Ok(())
    }

    async fn script_cast(&self, ctx: &Context, msg: &Message, guild_id: GuildId) -> Result<()> {
        let voice = voice_channels(ctx, guild_id);
        let embed = self
            .scripts
            .snapshot(guild_id.0)
            .map(|session| cast_embed(&session, &voice));
        self.send_or_no_session(ctx, msg, embed).await
    }

    async fn script_voice(&self, ctx: &Context, msg: &Message, guild_id: GuildId) -> Result<()> {
        let Some(session) = self.scripts.snapshot(guild_id.0) else {
            msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            return Ok(());
        };
        let Some(channel_id) = session.voice_channel else {
            msg.channel_id
                .say(&ctx.http, "❌ No voice channel associated with this session!")
                .await?;
            return Ok(());
        };
        let Some(channel) = ctx.cache.guild_channel(ChannelId(channel_id)) else {
            msg.channel_id
                .say(&ctx.http, "❌ Associated voice channel not found!")
                .await?;
            return Ok(());
        };

        let voice = voice_channels(ctx, guild_id);
        let mut members: Vec<u64> = voice
            .iter()
            .filter(|(_, channel)| **channel == channel_id)
            .map(|(user, _)| *user)
            .collect();
        members.sort_unstable();

        let embed = voice_embed(&session, &channel.name, &members, &voice);
        msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
        Ok(())
    }

    async fn script_export(&self, ctx: &Context, msg: &Message, guild_id: GuildId, format: Option<&str>) -> Result<()> {
        let Some(session) = self.scripts.snapshot(guild_id.0) else {
            msg.channel_id.say(&ctx.http, "❌ No active session to export!").await?;
            return Ok(());
        };
        let Some(format) = ExportFormat::from_str(format.unwrap_or("txt")) else {
            msg.channel_id.say(&ctx.http, "❌ Format must be 'txt' or 'json'!").await?;
            return Ok(());
        };

        let names = member_names(ctx, guild_id);
        let content = match session.export(format, |id| {
            names.get(&id).cloned().unwrap_or_else(|| format!("User_{}", id))
        }) {
            Ok(content) => content,
            Err(e) => {
                error!("❌ Error exporting script: {}", e);
                msg.channel_id
                    .say(&ctx.http, "❌ Error exporting script! Please try again.")
                    .await?;
                return Ok(());
            }
        };

        let file_name = session.export_file_name(format);
        let embed = exported_embed(&session, &file_name, format);
        msg.channel_id
            .send_message(&ctx.http, |m| {
                m.set_embed(embed).add_file(AttachmentType::Bytes {
                    data: Cow::Owned(content.into_bytes()),
                    filename: file_name.clone(),
                })
            })
            .await?;
        Ok(())
    }

    async fn script_save_template(&self, ctx: &Context, msg: &Message, guild_id: GuildId, name: Option<&str>) -> Result<()> {
        let Some(name) = name else {
            return self
                .missing_arguments(ctx, &Invocation::prefix(msg), "?script template <name>")
                .await;
        };
        let Some(session) = self.scripts.snapshot(guild_id.0) else {
            msg.channel_id
                .say(&ctx.http, "❌ No active session to save as template!")
                .await?;
            return Ok(());
        };
        if session.characters.is_empty() {
            msg.channel_id
                .say(
                    &ctx.http,
                    "❌ Cannot save empty session as template! Add some characters first.",
                )
                .await?;
            return Ok(());
        }

        let key = self.scripts.save_template(name, session.to_play());
        info!("🎭 Saved template '{}' from guild {}", key, guild_id);
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(template_saved_embed(&session, &key)))
            .await?;
        Ok(())
    }

    /// `end` and `clear` both drop the session; only the summary differs.
    async fn script_end(&self, ctx: &Context, msg: &Message, guild_id: GuildId, clear: bool) -> Result<()> {
        let verb = if clear { "clear" } else { "end" };
        let Some(session) = self.scripts.snapshot(guild_id.0) else {
            msg.channel_id
                .say(&ctx.http, format!("❌ No active session to {}!", verb))
                .await?;
            return Ok(());
        };

        let access = MemberAccess::resolve(ctx, guild_id, msg.author.id).await?;
        if !session.can_manage(msg.author.id.0, access.is_admin) {
            msg.channel_id
                .say(
                    &ctx.http,
                    format!("❌ Only the session creator or administrators can {} the session!", verb),
                )
                .await?;
            return Ok(());
        }

        let Some(session) = self.scripts.end(guild_id.0) else {
            msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            return Ok(());
        };
        info!("🎭 Script session '{}' {}ed in guild {}", session.title, verb, guild_id);
        let embed = if clear { cleared_embed(&session) } else { ended_embed(&session) };
        msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
        Ok(())
    }

    async fn script_info(&self, ctx: &Context, msg: &Message, guild_id: GuildId) -> Result<()> {
        let embed = self.scripts.snapshot(guild_id.0).map(|s| info_embed(&s));
        self.send_or_no_session(ctx, msg, embed).await
    }

    async fn send_or_no_session(&self, ctx: &Context, msg: &Message, embed: Option<CreateEmbed>) -> Result<()> {
        match embed {
            Some(embed) => {
                msg.channel_id.send_message(&ctx.http, |m| m.set_embed(embed)).await?;
            }
            None => {
                msg.channel_id.say(&ctx.http, NO_SESSION).await?;
            }
        }
        Ok(())
    }
}

/// User id to the voice channel they are connected to, from the cache.
fn voice_channels(ctx: &Context, guild_id: GuildId) -> HashMap<u64, u64> {
    ctx.cache
        .guild_field(guild_id, |g| {
            g.voice_states
                .iter()
                .filter_map(|(user, state)| state.channel_id.map(|c| (user.0, c.0)))
                .collect()
        })
        .unwrap_or_default()
}

fn user_voice_channel(ctx: &Context, guild_id: GuildId, user_id: u64) -> Option<u64> {
    voice_channels(ctx, guild_id).get(&user_id).copied()
}

fn member_names(ctx: &Context, guild_id: GuildId) -> HashMap<u64, String> {
    ctx.cache
        .guild_field(guild_id, |g| {
            g.members
                .iter()
                .map(|(id, member)| (id.0, member.display_name().to_string()))
                .collect()
        })
        .unwrap_or_default()
}
