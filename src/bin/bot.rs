use anyhow::Result;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::model::application::interaction::{Interaction, InteractionResponseType};
use serenity::model::channel::Message;
use serenity::model::gateway::{Activity, Ready};
use serenity::model::guild::{Guild, Member, UnavailableGuild};
use serenity::model::id::GuildId;
use serenity::model::user::User;
use serenity::prelude::*;
use std::sync::Arc;

use underland::command_handler::{cached_totals, presence_text, ShardManagerContainer, ERROR_REPLY};
use underland::commands::{register_global_commands, CommandHandler};
use underland::config::Config;
use underland::database::Database;
use underland::events::EventStore;
use underland::message_components::MessageComponentHandler;
use underland::reminder_scheduler::ReminderScheduler;
use underland::welcome::{self, goodbye_message, welcome_message};

struct Handler {
    command_handler: Arc<CommandHandler>,
    component_handler: Arc<MessageComponentHandler>,
}

impl Handler {
    fn new(command_handler: CommandHandler, component_handler: MessageComponentHandler) -> Self {
        Handler {
            command_handler: Arc::new(command_handler),
            component_handler: Arc::new(component_handler),
        }
    }

    async fn update_presence(&self, ctx: &Context) {
        let (guilds, members) = cached_totals(ctx);
        ctx.set_activity(Activity::watching(presence_text(guilds, members)))
            .await;
        debug!("Presence updated: {} members across {} servers", members, guilds);
    }

    /// Posts to the guild's welcome channel when the feature is on.
    async fn announce(&self, ctx: &Context, guild_id: GuildId, text: String) -> Result<()> {
        if !self
            .command_handler
            .feature_enabled(Some(guild_id), welcome::FEATURE_ID)
            .await?
        {
            return Ok(());
        }
        let configured = self.command_handler.config().welcome_channel_id;
        let Some(channel) = welcome::welcome_channel(configured, self.command_handler.database(), guild_id).await? else {
            return Ok(());
        };
        channel.say(&ctx.http, text).await?;
        Ok(())
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        if let Err(e) = self.command_handler.handle_message(&ctx, &msg).await {
            error!("Error handling message: {}", e);
            if let Err(why) = msg.channel_id.say(&ctx.http, ERROR_REPLY).await {
                error!("Failed to send error message: {}", why);
            }
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guilds", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        if let Some(shard) = ready.shard {
            info!("⚡ Shard: {}/{}", shard[0] + 1, shard[1]);
        }

        match register_global_commands(&ctx).await {
            Ok(()) => info!("✅ Successfully registered slash commands globally"),
            Err(e) => error!("❌ Failed to register global slash commands: {}", e),
        }

        self.update_presence(&ctx).await;
    }

    async fn guild_create(&self, ctx: Context, guild: Guild, is_new: bool) {
        if is_new {
            info!("➕ Joined guild {} ({})", guild.name, guild.id);
        }
        self.update_presence(&ctx).await;
    }

    async fn guild_delete(&self, ctx: Context, incomplete: UnavailableGuild, _full: Option<Guild>) {
        info!("➖ Removed from guild {}", incomplete.id);
        self.update_presence(&ctx).await;
    }

    async fn guild_member_addition(&self, ctx: Context, new_member: Member) {
        let text = welcome_message(&format!("<@{}>", new_member.user.id));
        if let Err(e) = self.announce(&ctx, new_member.guild_id, text).await {
            warn!("⚠️ Could not welcome {}: {}", new_member.user.id, e);
        }
    }

    async fn guild_member_removal(&self, ctx: Context, guild_id: GuildId, user: User, _member: Option<Member>) {
        if let Err(e) = self.announce(&ctx, guild_id, goodbye_message(&user.name)).await {
            warn!("⚠️ Could not post goodbye for {}: {}", user.id, e);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match interaction {
            Interaction::ApplicationCommand(command) => {
                if let Err(e) = self.command_handler.handle_slash_command(&ctx, &command).await {
                    error!("Error handling slash command '{}': {}", command.data.name, e);

                    // Deferred commands take an edit; anything else a fresh response.
                    if command
                        .edit_original_interaction_response(&ctx.http, |response| response.content(ERROR_REPLY))
                        .await
                        .is_err()
                    {
                        let _ = command
                            .create_interaction_response(&ctx.http, |response| {
                                response
                                    .kind(InteractionResponseType::ChannelMessageWithSource)
                                    .interaction_response_data(|message| message.content(ERROR_REPLY).ephemeral(true))
                            })
                            .await;
                    }
                }
            }
            Interaction::MessageComponent(component) => {
                if let Err(e) = self.component_handler.handle_component_interaction(&ctx, &component).await {
                    error!("Error handling component interaction '{}': {}", component.data.custom_id, e);
                    let _ = component
                        .create_interaction_response(&ctx.http, |response| {
                            response
                                .kind(InteractionResponseType::ChannelMessageWithSource)
                                .interaction_response_data(|message| {
                                    message
                                        .content("❌ Sorry, I encountered an error processing your interaction. Please try again.")
                                        .ephemeral(true)
                                })
                        })
                        .await;
                }
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level)).init();

    info!("Starting UnderLand Discord Bot...");

    let database = Database::new(&config.database_path).await?;
    let events = EventStore::load(config.events_path.clone()).await;
    let token = config.discord_token.clone();

    let command_handler = CommandHandler::new(config, database, events.clone());
    let component_handler = MessageComponentHandler::new(command_handler.clone());
    let handler = Handler::new(command_handler, component_handler);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MEMBERS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::GUILD_MESSAGE_REACTIONS
        | GatewayIntents::GUILD_VOICE_STATES
        | GatewayIntents::GUILD_PRESENCES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&token, intents)
        .event_handler(handler)
        .await
        .map_err(|e| {
            error!("Failed to create Discord client: {}", e);
            anyhow::anyhow!("Client creation failed: {}", e)
        })?;

    {
        let mut data = client.data.write().await;
        data.insert::<ShardManagerContainer>(client.shard_manager.clone());
    }

    let http = client.cache_and_http.http.clone();
    tokio::spawn(async move {
        ReminderScheduler::new(events).run(http).await;
    });

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("🛑 Ctrl-C received, shutting down");
            shard_manager.lock().await.shutdown_all().await;
        }
    });

    info!("Connecting to Discord gateway with intents {:?}", intents);
    if let Err(why) = client.start().await {
        error!("Gateway connection failed: {:?}", why);
        return Err(anyhow::anyhow!("Failed to establish gateway connection: {}", why));
    }

    Ok(())
}
