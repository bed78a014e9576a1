//! Hangman, tic-tac-toe, trivia, ship and the score commands.

use anyhow::Result;
use log::{info, warn};
use serenity::model::channel::Message;
use serenity::model::id::{ChannelId, UserId};
use serenity::model::user::User;
use serenity::prelude::Context;

use crate::command_handler::CommandHandler;
use crate::commands::invocation::{Invocation, Reply};
use crate::commands::prefix::{parse_user_mention, PrefixCommand};
use crate::games::hangman::{HangmanGame, HangmanView};
use crate::games::ship::{compatibility_score, random_quote, ship_embed, ShipPair};
use crate::games::tictactoe::TicTacToe;
use crate::games::trivia::{question_embed, random_question, timeout_embed, ANSWER_WINDOW};
use crate::games::{leaderboard_embed, normalize_game, stats_embed, SCORED_GAMES};

const LEADERBOARD_SIZE: i64 = 10;

impl CommandHandler {
    pub(crate) async fn hangman(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let view = HangmanView::new(
            HangmanGame::random(),
            inv.user_id(),
            inv.guild_id().map(|g| g.0),
        );
        let reply = Reply::embed(view.start_embed()).with_components(view.components(false));
        let message = inv.send(ctx, reply).await?;

        self.hangman_views.insert(message.id.0, message.channel_id.0, view);
        self.hangman_views.spawn_expiry(ctx.http.clone(), message.id.0);
        info!("🎯 Hangman started by {} in channel {}", inv.user_id(), message.channel_id);
        Ok(())
    }

    pub(crate) async fn tictactoe(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        let inv = Invocation::prefix(msg);
        let Some(opponent) = mentioned_user(ctx, msg, cmd.arg(0)).await else {
            return self.missing_arguments(ctx, &inv, "?tictactoe @opponent").await;
        };

        if opponent.bot {
            msg.channel_id.say(&ctx.http, "You cannot play against a bot!").await?;
            return Ok(());
        }
        if opponent.id == msg.author.id {
            msg.channel_id.say(&ctx.http, "You cannot play against yourself!").await?;
            return Ok(());
        }

        let game = TicTacToe::new(msg.author.id.0, opponent.id.0, msg.guild_id.map(|g| g.0));
        let reply = Reply::embed(game.start_embed()).with_components(game.components(false));
        let message = inv.send(ctx, reply).await?;

        self.tictactoe_views.insert(message.id.0, message.channel_id.0, game);
        self.tictactoe_views.spawn_expiry(ctx.http.clone(), message.id.0);
        Ok(())
    }

    pub(crate) async fn trivia(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let channel_id = inv.channel_id();
        let (question, answer) = random_question();

        let Some(round_id) = self.trivia.start(channel_id.0, answer) else {
            inv.say(ctx, "A trivia question is already active in this channel!").await?;
            return Ok(());
        };
        inv.send_embed(ctx, question_embed(question)).await?;

        let rounds = self.trivia.clone();
        let http = ctx.http.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ANSWER_WINDOW).await;
            if let Some(answer) = rounds.expire(channel_id.0, round_id) {
                let embed = timeout_embed(&answer);
                if let Err(e) = ChannelId(channel_id.0)
                    .send_message(&http, |m| m.set_embed(embed))
                    .await
                {
                    warn!("⚠️ Failed to post trivia timeout: {}", e);
                }
            }
        });
        Ok(())
    }

    pub(crate) async fn ship(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let (first, second) = match msg.mentions.as_slice() {
            [] => {
                msg.channel_id
                    .say(
                        &ctx.http,
                        format!(
                            "💔 <@{}>, you must mention at least one user to calculate love compatibility!",
                            msg.author.id
                        ),
                    )
                    .await?;
                return Ok(());
            }
            [only] => (&msg.author, only),
            [one, two, ..] => (one, two),
        };

        let requested_by = Invocation::prefix(msg).display_name();
        let score = compatibility_score(&mut rand::rng(), &first.name, &second.name);
        let pair = ShipPair {
            name_one: &first.name,
            name_two: &second.name,
            avatar_one: first.face(),
            avatar_two: second.face(),
            requested_by: &requested_by,
        };
        let embed = ship_embed(&pair, score, random_quote());
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(embed))
            .await?;
        Ok(())
    }

    pub(crate) async fn leaderboard(&self, ctx: &Context, inv: &Invocation<'_>, game: Option<&str>) -> Result<()> {
        let Some(guild_id) = inv.guild_id() else {
            inv.say(ctx, "Leaderboards are only available in servers.").await?;
            return Ok(());
        };
        let Some(game) = game.and_then(normalize_game) else {
            return self
                .missing_arguments(ctx, inv, &format!("?leaderboard <{}>", SCORED_GAMES.join("|")))
                .await;
        };

        let entries = self
            .database
            .get_leaderboard(&guild_id.to_string(), game, LEADERBOARD_SIZE)
            .await?;
        inv.send_embed(ctx, leaderboard_embed(game, &entries)).await?;
        Ok(())
    }

    pub(crate) async fn stats(&self, ctx: &Context, inv: &Invocation<'_>, game: Option<&str>) -> Result<()> {
        let Some(guild_id) = inv.guild_id() else {
            inv.say(ctx, "Stats are only available in servers.").await?;
            return Ok(());
        };

        let games: Vec<&str> = match game {
            None => SCORED_GAMES.to_vec(),
            Some(name) => match normalize_game(name) {
                Some(game) => vec![game],
                None => {
                    return self
                        .missing_arguments(ctx, inv, &format!("?stats [{}]", SCORED_GAMES.join("|")))
                        .await
                }
            },
        };

        let user_id = inv.user_id().to_string();
        let guild_id = guild_id.to_string();
        let mut rows = Vec::with_capacity(games.len());
        for game in games {
            rows.push((game, self.database.get_game_stats(&user_id, &guild_id, game).await?));
        }
        inv.send_embed(ctx, stats_embed(&inv.display_name(), &rows)).await?;
        Ok(())
    }
}

/// First mentioned user, else a mention or id given as an argument.
pub(crate) async fn mentioned_user(ctx: &Context, msg: &Message, arg: Option<&str>) -> Option<User> {
    if let Some(user) = msg.mentions.first() {
        return Some(user.clone());
    }
    let id = arg.and_then(parse_user_mention)?;
    UserId(id).to_user(ctx).await.ok()
}
