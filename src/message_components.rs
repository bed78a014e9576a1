use anyhow::Result;
use chrono::Utc;
use log::{debug, info, warn};
use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::interaction::message_component::MessageComponentInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::UserId;
use serenity::prelude::Context;

use crate::commands::CommandHandler;
use crate::events::{event_embed, parse_rsvp_id, RSVP_PREFIX};
use crate::games::hangman;
use crate::games::tictactoe::{self, outcome_message, parse_position, MoveOutcome};
use crate::grammar::{GrammarAction, GrammarUpdate, BUTTON_PREFIX as GRAMMAR_PREFIX};
use crate::help;
use crate::pomodoro::{StopResult, NOT_PARTICIPANT, STOPPED, STOP_BUTTON_ID};
use crate::whois;

const EXPIRED: &str = "⌛ This interaction has expired.";
const NOT_YOUR_MENU: &str = "Only the person who ran this command can use this menu.";

/// Routes button and select-menu presses to the view behind the message.
pub struct MessageComponentHandler {
    command_handler: CommandHandler,
}

impl MessageComponentHandler {
    pub fn new(command_handler: CommandHandler) -> Self {
        Self { command_handler }
    }

    /// Handle all types of component interactions
    pub async fn handle_component_interaction(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let custom_id = interaction.data.custom_id.as_str();
        debug!("Processing component interaction: {} from user: {}", custom_id, interaction.user.id);

        match custom_id {
            hangman::SELECT_FIRST_HALF | hangman::SELECT_SECOND_HALF => self.handle_hangman(ctx, interaction).await,
            id if id.starts_with(tictactoe::BUTTON_PREFIX) => self.handle_tictactoe(ctx, interaction).await,
            id if id.starts_with(RSVP_PREFIX) => self.handle_rsvp(ctx, interaction).await,
            STOP_BUTTON_ID => self.handle_pomodoro_stop(ctx, interaction).await,
            whois::PREV_ID | whois::NEXT_ID => self.handle_whois(ctx, interaction).await,
            help::SELECT_ID => self.handle_help(ctx, interaction).await,
            id if id.starts_with(GRAMMAR_PREFIX) => self.handle_grammar(ctx, interaction).await,
            _ => ephemeral(ctx, interaction, "Unknown component interaction.").await,
        }
    }

    async fn handle_hangman(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some(letter) = interaction.data.values.first().and_then(|v| v.chars().next()) else {
            return acknowledge(ctx, interaction).await;
        };
        let message_id = interaction.message.id.0;
        let views = &self.command_handler.hangman_views;

        let played = views.with_view(message_id, |view| {
            view.play(letter).map(|turn| (turn, view.player_id, view.guild_id))
        });
        let (turn, player_id, guild_id) = match played {
            None => return ephemeral(ctx, interaction, EXPIRED).await,
            Some(None) => return acknowledge(ctx, interaction).await,
            Some(Some(played)) => played,
        };

        // Only the press that claims the view records the result.
        if let Some(won) = turn.finished {
            if views.remove(message_id).is_some() {
                info!("🎯 Hangman on message {} finished (won: {})", message_id, won);
                if let Some(guild_id) = guild_id {
                    self.command_handler
                        .database()
                        .update_game_stats(&player_id.to_string(), &guild_id.to_string(), "hangman", won)
                        .await?;
                }
            }
        }

        update_message(ctx, interaction, None, Some(turn.embed), turn.components).await
    }

    async fn handle_tictactoe(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some(position) = parse_position(&interaction.data.custom_id) else {
            return acknowledge(ctx, interaction).await;
        };
        let message_id = interaction.message.id.0;
        let views = &self.command_handler.tictactoe_views;

        let played = views.with_view(message_id, |game| {
            game.play(interaction.user.id.0, position)
                .map(|outcome| (outcome, game.components(game.is_finished()), game.guild_id))
        });
        let (outcome, components, guild_id) = match played {
            None => return ephemeral(ctx, interaction, EXPIRED).await,
            Some(Err(e)) => return ephemeral(ctx, interaction, &e.to_string()).await,
            Some(Ok(played)) => played,
        };

        match outcome {
            MoveOutcome::NextTurn(_) => {}
            MoveOutcome::Draw => {
                views.remove(message_id);
            }
            MoveOutcome::Win { winner, loser } => {
                if let (Some(_), Some(guild_id)) = (views.remove(message_id), guild_id) {
                    let guild = guild_id.to_string();
                    let database = self.command_handler.database();
                    database
                        .update_game_stats(&winner.to_string(), &guild, "tictactoe", true)
                        .await?;
                    database
                        .update_game_stats(&loser.to_string(), &guild, "tictactoe", false)
                        .await?;
                }
            }
        }

        update_message(ctx, interaction, Some(outcome_message(outcome)), None, components).await
    }

    async fn handle_rsvp(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some((event_id, choice)) = parse_rsvp_id(&interaction.data.custom_id) else {
            return acknowledge(ctx, interaction).await;
        };
        let events = self.command_handler.events();

        if events.get(event_id).await.map_or(true, |e| e.is_cancelled) {
            return ephemeral(ctx, interaction, "❌ This event is no longer available.").await;
        }
        let Some((changed, event)) = events.rsvp(event_id, interaction.user.id.0, choice).await? else {
            return ephemeral(ctx, interaction, "❌ This event is no longer available.").await;
        };

        ephemeral(ctx, interaction, choice.feedback(changed)).await?;
        if !changed {
            return Ok(());
        }

        let creator_name = match UserId(event.creator_id).to_user(ctx).await {
            Ok(user) => user.name,
            Err(_) => "Unknown User".to_string(),
        };
        let embed = event_embed(&event, &creator_name, Utc::now().naive_utc());
        if let Err(e) = interaction
            .channel_id
            .edit_message(&ctx.http, interaction.message.id, |m| m.set_embed(embed))
            .await
        {
            warn!("⚠️ Could not refresh event message for {}: {}", event_id, e);
        }
        Ok(())
    }

    async fn handle_pomodoro_stop(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let channel_id = interaction.channel_id.0;
        match self.command_handler.pomodoro.stop(channel_id, interaction.user.id.0) {
            StopResult::NotRunning => ephemeral(ctx, interaction, EXPIRED).await,
            StopResult::NotParticipant => ephemeral(ctx, interaction, NOT_PARTICIPANT).await,
            StopResult::Stopped => {
                info!("🍅 Pomodoro in channel {} stopped by {}", channel_id, interaction.user.id);
                update_message(
                    ctx,
                    interaction,
                    Some(STOPPED.to_string()),
                    None,
                    CreateComponents::default(),
                )
                .await
            }
        }
    }

    async fn handle_whois(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let custom_id = interaction.data.custom_id.as_str();
        let turned = self
            .command_handler
            .whois_views
            .with_view(interaction.message.id.0, |view| {
                view.turn(custom_id)
                    .then(|| (view.embed(), view.components(false)))
            });
        match turned {
            None => ephemeral(ctx, interaction, EXPIRED).await,
            Some(None) => acknowledge(ctx, interaction).await,
            Some(Some((embed, components))) => update_message(ctx, interaction, None, Some(embed), components).await,
        }
    }

    async fn handle_help(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some(value) = interaction.data.values.first() else {
            return acknowledge(ctx, interaction).await;
        };
        let user_id = interaction.user.id.0;
        let selected = self
            .command_handler
            .help_views
            .with_view(interaction.message.id.0, |view| {
                (view.author_id == user_id).then(|| (view.select(value), view.components(false)))
            });
        match selected {
            None => ephemeral(ctx, interaction, EXPIRED).await,
            Some(None) => ephemeral(ctx, interaction, NOT_YOUR_MENU).await,
            Some(Some((None, _))) => acknowledge(ctx, interaction).await,
            Some(Some((Some(embed), components))) => update_message(ctx, interaction, None, Some(embed), components).await,
        }
    }

    async fn handle_grammar(&self, ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
        let Some(action) = GrammarAction::parse(&interaction.data.custom_id) else {
            return acknowledge(ctx, interaction).await;
        };
        let message_id = interaction.message.id.0;
        let views = &self.command_handler.grammar_views;

        match views.with_view(message_id, |view| view.handle(action)) {
            None => ephemeral(ctx, interaction, EXPIRED).await,
            Some(GrammarUpdate::Unchanged) => acknowledge(ctx, interaction).await,
            Some(GrammarUpdate::Page(embed, components)) => {
                update_message(ctx, interaction, None, Some(embed), components).await
            }
            Some(GrammarUpdate::Finished(embed)) => {
                views.remove(message_id);
                update_message(ctx, interaction, None, Some(embed), CreateComponents::default()).await
            }
        }
    }
}

/// Replaces the message carrying the component in place.
async fn update_message(
    ctx: &Context,
    interaction: &MessageComponentInteraction,
    content: Option<String>,
    embed: Option<CreateEmbed>,
    components: CreateComponents,
) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|message| {
                    if let Some(content) = content {
                        message.content(content);
                    }
                    if let Some(embed) = embed {
                        message.add_embed(embed);
                    }
                    message.set_components(components)
                })
        })
        .await?;
    Ok(())
}

async fn ephemeral(ctx: &Context, interaction: &MessageComponentInteraction, content: &str) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response
                .kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|message| message.content(content).ephemeral(true))
        })
        .await?;
    Ok(())
}

/// Acknowledges a press that changes nothing.
async fn acknowledge(ctx: &Context, interaction: &MessageComponentInteraction) -> Result<()> {
    interaction
        .create_interaction_response(&ctx.http, |response| {
            response.kind(InteractionResponseType::DeferredUpdateMessage)
        })
        .await?;
    Ok(())
}
