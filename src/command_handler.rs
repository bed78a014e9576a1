//! # Command Handler
//!
//! Entry point for every prefix message and slash command. Applies the rate
//! limit and the per-guild feature toggles, then routes to a cog.
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: Cog dispatch with close-match suggestions for unknown commands
//! - 1.0.0: Initial implementation

use anyhow::Result;
use log::{debug, info, warn};
use serenity::builder::CreateEmbed;
use serenity::client::bridge::gateway::{ShardId, ShardManager};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::channel::Message;
use serenity::model::id::GuildId;
use serenity::prelude::{Context, Mutex, TypeMapKey};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::commands::invocation::{Invocation, Reply};
use crate::commands::prefix::{self, parse_prefix_command, PrefixCommand};
use crate::commands::slash::{get_integer_option, get_number_option, get_string_option};
use crate::config::Config;
use crate::database::Database;
use crate::dictionary::DictionaryClient;
use crate::embeds::{BLUE, GREEN, ORANGE, RED, YELLOW};
use crate::events::EventStore;
use crate::features;
use crate::games::hangman::HangmanView;
use crate::games::tictactoe::TicTacToe;
use crate::games::trivia::TriviaRounds;
use crate::grammar::{GrammarClient, GrammarView};
use crate::help::HelpView;
use crate::pomodoro::PomodoroSessions;
use crate::rate_limiter::{RateDecision, RateLimiter};
use crate::script_session::ScriptSessions;
use crate::views::ViewStore;
use crate::whois::WhoisView;
use crate::wiki::WikiClient;
use crate::word_association::DatamuseClient;

/// Gives commands access to the shard manager for latency and shutdown.
pub struct ShardManagerContainer;

impl TypeMapKey for ShardManagerContainer {
    type Value = Arc<Mutex<ShardManager>>;
}

pub const ERROR_REPLY: &str = "❌ Sorry, I encountered an error processing your command. Please try again.";

/// Shared state handed to every cog.
#[derive(Clone)]
pub struct CommandHandler {
    pub(crate) config: Arc<Config>,
    pub(crate) database: Database,
    pub(crate) rate_limiter: RateLimiter,
    pub(crate) hangman_views: ViewStore<HangmanView>,
    pub(crate) tictactoe_views: ViewStore<TicTacToe>,
    pub(crate) grammar_views: ViewStore<GrammarView>,
    pub(crate) help_views: ViewStore<HelpView>,
    pub(crate) whois_views: ViewStore<WhoisView>,
    pub(crate) trivia: TriviaRounds,
    pub(crate) pomodoro: PomodoroSessions,
    pub(crate) events: EventStore,
    pub(crate) scripts: ScriptSessions,
    pub(crate) dictionary: DictionaryClient,
    pub(crate) datamuse: DatamuseClient,
    pub(crate) wiki: WikiClient,
    pub(crate) grammar: GrammarClient,
    pub(crate) started_at: Instant,
}

impl CommandHandler {
    pub fn new(config: Config, database: Database, events: EventStore) -> Self {
        CommandHandler {
            config: Arc::new(config),
            database,
            rate_limiter: RateLimiter::default(),
            hangman_views: ViewStore::new(),
            tictactoe_views: ViewStore::new(),
            grammar_views: ViewStore::new(),
            help_views: ViewStore::new(),
            whois_views: ViewStore::new(),
            trivia: TriviaRounds::new(),
            pomodoro: PomodoroSessions::new(),
            events,
            scripts: ScriptSessions::new(),
            dictionary: DictionaryClient::new(),
            datamuse: DatamuseClient::new(),
            wiki: WikiClient::new(),
            grammar: GrammarClient::new(),
            started_at: Instant::now(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn events(&self) -> &EventStore {
        &self.events
    }

    pub async fn handle_message(&self, ctx: &Context, msg: &Message) -> Result<()> {
        if msg.author.bot {
            return Ok(());
        }

        self.check_trivia_answer(ctx, msg).await?;

        let Some(command) = parse_prefix_command(&msg.content) else {
            return Ok(());
        };

        if let RateDecision::Limited { retry_after } = self.rate_limiter.check(msg.author.id.0) {
            warn!("⚠️ Rate limit exceeded for user: {}", msg.author.id);
            msg.channel_id
                .say(&ctx.http, RateLimiter::limited_message(retry_after))
                .await?;
            return Ok(());
        }

        if !prefix::is_valid_command(&command.name) {
            debug!("Unknown command '{}' from {}", command.invoked_as, msg.author.id);
            msg.channel_id
                .send_message(&ctx.http, |m| m.set_embed(unknown_command_embed(&command.invoked_as)))
                .await?;
            return Ok(());
        }

        if let Some(feature_id) = prefix::feature_for(&command.name) {
            if !self.feature_enabled(msg.guild_id, feature_id).await? {
                if let Some(feature) = features::get_feature(feature_id) {
                    msg.channel_id
                        .say(&ctx.http, features::disabled_message(feature))
                        .await?;
                }
                return Ok(());
            }
        }

        info!("Processing command: {} from user: {}", command.name, msg.author.id);
        self.dispatch_prefix(ctx, msg, &command).await
    }

    async fn dispatch_prefix(&self, ctx: &Context, msg: &Message, cmd: &PrefixCommand) -> Result<()> {
        let inv = Invocation::prefix(msg);

        match cmd.name.as_str() {
            // Games
            "hangman" => self.hangman(ctx, &inv).await,
            "tictactoe" => self.tictactoe(ctx, msg, cmd).await,
            "trivia" => self.trivia(ctx, &inv).await,
            "ship" => self.ship(ctx, msg).await,
            "leaderboard" => self.leaderboard(ctx, &inv, cmd.arg(0)).await,
            "stats" => self.stats(ctx, &inv, cmd.arg(0)).await,

            // Social
            "say" => self.say(ctx, msg, &cmd.raw).await,
            "replysay" => self.replysay(ctx, msg, &cmd.raw).await,
            "avatar" => self.avatar(ctx, msg).await,

            // Learning
            "def" => self.define(ctx, &inv, &cmd.raw).await,
            "associate" => self.associate(ctx, msg, &cmd.raw).await,
            "wiki" => self.wiki_summary(ctx, msg, &cmd.raw).await,
            "grammar" => self.grammar_check(ctx, &inv, &cmd.raw, None).await,
            "quickfix" => self.quickfix(ctx, &inv, &cmd.raw).await,
            "languages" => self.languages(ctx, &inv).await,

            // Productivity
            "pomodoro" => {
                let focus = parse_arg(cmd.arg(0))?;
                let brk = parse_arg(cmd.arg(1))?;
                let cycles = parse_arg(cmd.arg(2))?;
                self.pomodoro(ctx, &inv, focus, brk, cycles).await
            }
            "createevent" => self.createevent_prefix(ctx, &inv, cmd).await,
            "events" => self.list_events(ctx, &inv).await,
            "eventinfo" => self.event_info(ctx, &inv, cmd.arg(0)).await,
            "cancelevent" => self.cancel_event(ctx, &inv, cmd.arg(0)).await,
            "script" => self.script(ctx, msg, cmd).await,

            // Utility
            "whois" => self.whois(ctx, msg, cmd).await,
            "ping" => self.ping(ctx, &inv).await,
            "status" => self.status(ctx, &inv).await,
            "features" => self.features(ctx, &inv).await,
            "toggle" => self.toggle(ctx, msg, cmd.arg(0)).await,
            "help" => self.help(ctx, &inv, Some(cmd.raw.as_str())).await,
            "commands" => self.commands(ctx, &inv).await,
            "about" => self.about(ctx, &inv).await,

            // Moderation
            "mute" => self.mute(ctx, msg, cmd).await,
            "unmute" => self.unmute(ctx, msg, cmd).await,
            "ban" => self.ban_or_kick(ctx, msg, cmd, crate::moderation::MemberAction::Ban).await,
            "kick" => self.ban_or_kick(ctx, msg, cmd, crate::moderation::MemberAction::Kick).await,
            "purge" => self.purge(ctx, msg, cmd.arg(0)).await,
            "dm" => self.dm(ctx, msg, cmd).await,
            "order66" => self.order66(ctx, msg).await,
            "order55" => self.order55(ctx, msg).await,
            "hardshutdown" => self.hard_shutdown(ctx, msg, false).await,
            "superhardshutdown" => self.hard_shutdown(ctx, msg, true).await,
            "orderrole" => self.orderrole(ctx, msg, &cmd.raw).await,

            name => match crate::social::find_action(name) {
                Some(action) => self.social_action(ctx, msg, action).await,
                None => Ok(()),
            },
        }
    }

    pub async fn handle_slash_command(&self, ctx: &Context, command: &ApplicationCommandInteraction) -> Result<()> {
        let inv = Invocation::slash(command);

        if let RateDecision::Limited { retry_after } = self.rate_limiter.check(command.user.id.0) {
            warn!("⚠️ Rate limit exceeded for user: {}", command.user.id);
            inv.send(ctx, Reply::text(RateLimiter::limited_message(retry_after)).ephemeral())
                .await?;
            return Ok(());
        }

        let name = command.data.name.as_str();
        if let Some(feature_id) = prefix::feature_for(name) {
            if !self.feature_enabled(command.guild_id, feature_id).await? {
                if let Some(feature) = features::get_feature(feature_id) {
                    inv.send(ctx, Reply::text(features::disabled_message(feature)).ephemeral())
                        .await?;
                }
                return Ok(());
            }
        }

        info!("Processing slash command: {} from user: {}", name, command.user.id);

        let options = &command.data.options;
        match name {
            "ping" => self.ping(ctx, &inv).await,
            "help" => {
                let query = get_string_option(options, "query");
                self.help(ctx, &inv, query.as_deref()).await
            }
            "poll" => {
                let question = get_string_option(options, "question").unwrap_or_default();
                let option_one = get_string_option(options, "option1").unwrap_or_default();
                let option_two = get_string_option(options, "option2").unwrap_or_default();
                self.poll(ctx, &inv, &question, &option_one, &option_two).await
            }
            "def" => {
                let word = get_string_option(options, "word").unwrap_or_default();
                self.define(ctx, &inv, &word).await
            }
            "grammar" => {
                let text = get_string_option(options, "text").unwrap_or_default();
                let language = get_string_option(options, "language");
                self.grammar_check(ctx, &inv, &text, language.as_deref()).await
            }
            "pomodoro" => {
                let focus = get_number_option(options, "focus");
                let brk = get_number_option(options, "brk");
                let cycles = get_integer_option(options, "cycles");
                self.pomodoro(ctx, &inv, focus, brk, cycles).await
            }
            "createevent" => {
                let title = get_string_option(options, "title").unwrap_or_default();
                let date = get_string_option(options, "date").unwrap_or_default();
                let time = get_string_option(options, "time").unwrap_or_default();
                let description = get_string_option(options, "description").unwrap_or_default();
                let duration = get_integer_option(options, "duration");
                self.create_event(ctx, &inv, &title, &date, &time, duration, &description)
                    .await
            }
            "events" => self.list_events(ctx, &inv).await,
            "eventinfo" => {
                let event_id = get_string_option(options, "event_id");
                self.event_info(ctx, &inv, event_id.as_deref()).await
            }
            "cancelevent" => {
                let event_id = get_string_option(options, "event_id");
                self.cancel_event(ctx, &inv, event_id.as_deref()).await
            }
            _ => {
                inv.send(ctx, Reply::text("Unknown command. Use `/help` to see available commands.").ephemeral())
                    .await?;
                Ok(())
            }
        }
    }

    /// Features are always on outside guilds.
    pub async fn feature_enabled(&self, guild_id: Option<GuildId>, feature_id: &str) -> Result<bool> {
        match guild_id {
            Some(guild_id) => {
                let settings = self.database.get_guild_settings(&guild_id.to_string()).await?;
                Ok(settings.is_feature_enabled(feature_id))
            }
            None => Ok(true),
        }
    }

    async fn check_trivia_answer(&self, ctx: &Context, msg: &Message) -> Result<()> {
        let Some(verdict) = self.trivia.answer(msg.channel_id.0, &msg.content) else {
            return Ok(());
        };
        let embed = crate::games::trivia::verdict_embed(&verdict, &format!("<@{}>", msg.author.id));
        msg.channel_id
            .send_message(&ctx.http, |m| m.set_embed(embed))
            .await?;

        if let Some(guild_id) = msg.guild_id {
            let won = verdict.outcome == crate::games::trivia::TriviaOutcome::Correct;
            self.database
                .update_game_stats(&msg.author.id.to_string(), &guild_id.to_string(), "trivia", won)
                .await?;
        }
        Ok(())
    }

    pub(crate) async fn ping(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let latency = shard_latency(ctx).await;
        let guilds = ctx.cache.guild_count();
        inv.send_embed(ctx, pong_embed(latency, guilds)).await?;
        Ok(())
    }

    pub(crate) async fn status(&self, ctx: &Context, inv: &Invocation<'_>) -> Result<()> {
        let latency = shard_latency(ctx).await;
        let (guilds, members) = cached_totals(ctx);
        inv.send_embed(ctx, status_embed(guilds, members, latency, self.started_at.elapsed()))
            .await?;
        Ok(())
    }

    /// The usage embed sent when a prefix command is missing arguments.
    pub(crate) async fn missing_arguments(&self, ctx: &Context, inv: &Invocation<'_>, usage: &str) -> Result<()> {
        inv.send_embed(ctx, missing_arguments_embed(usage)).await?;
        Ok(())
    }
}

/// Parses an optional numeric argument; a malformed one is an error.
fn parse_arg<T: std::str::FromStr>(arg: Option<&str>) -> Result<Option<T>> {
    arg.map(|a| {
        a.parse::<T>()
            .map_err(|_| anyhow::anyhow!("Invalid number: {}", a))
    })
    .transpose()
}

pub async fn shard_latency(ctx: &Context) -> Option<Duration> {
    let manager = {
        let data = ctx.data.read().await;
        data.get::<ShardManagerContainer>()?.clone()
    };
    let manager = manager.lock().await;
    let runners = manager.runners.lock().await;
    runners.get(&ShardId(ctx.shard_id)).and_then(|runner| runner.latency)
}

/// Guild count and summed member counts from the gateway cache.
pub fn cached_totals(ctx: &Context) -> (usize, u64) {
    let guilds = ctx.cache.guilds();
    let members = guilds
        .iter()
        .filter_map(|id| ctx.cache.guild_field(*id, |g| g.member_count))
        .sum();
    (guilds.len(), members)
}

pub fn presence_text(guilds: usize, members: u64) -> String {
    format!("{} members across {} servers", members, guilds)
}

fn latency_text(latency: Option<Duration>) -> String {
    latency
        .map(|l| format!("{}ms", l.as_millis()))
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn pong_embed(latency: Option<Duration>, guilds: usize) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("🏓 Pong!")
        .colour(GREEN)
        .field("📡 Latency", format!("`{}`", latency_text(latency)), true)
        .field("🌐 Status", "✅ Online", true)
        .field("🏠 Guilds", format!("`{}`", guilds), true);
    embed
}

pub fn status_embed(guilds: usize, members: u64, latency: Option<Duration>, uptime: Duration) -> CreateEmbed {
    let secs = uptime.as_secs();
    let mut embed = CreateEmbed::default();
    embed
        .title("🤖 UnderLand Status")
        .colour(BLUE)
        .field(
            "📊 Statistics",
            format!(
                "🏠 **Guilds:** {}\n👥 **Members:** {}\n⚡ **Latency:** {}\n⏱️ **Uptime:** {}h {}m {}s",
                guilds,
                members,
                latency_text(latency),
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
            false,
        )
        .field(
            "🎮 Available Features",
            "🎲 **Games:** Hangman, Trivia, TicTacToe\n\
             🛠️ **Utilities:** Dictionary, Avatar, Polls\n\
             🎯 **Productivity:** Pomodoro Timer, Events\n\
             🎭 **Interactive:** Script Sessions\n\
             🔨 **Moderation:** Basic mod tools",
            false,
        )
        .footer(|f| f.text(format!("UnderLand v{}", features::get_bot_version())));
    embed
}

pub fn unknown_command_embed(attempted: &str) -> CreateEmbed {
    let suggestions = prefix::suggest(attempted);
    let mut embed = CreateEmbed::default();
    embed.title("❓ Command Not Found");

    if suggestions.is_empty() {
        embed
            .description(format!("🤔 `{}` isn't a valid command.", attempted))
            .colour(RED)
            .field("📚 Get Help", "Type `?help` to see all available commands!", false);
    } else {
        let list: Vec<String> = suggestions.iter().map(|s| format!("• `?{}`", s)).collect();
        embed
            .description(format!("🤔 `{}` isn't available.", attempted))
            .colour(ORANGE)
            .field("💡 Did you mean?", list.join("\n"), false)
            .field("📚 Need Help?", "Type `?help` to see all commands!", false);
    }
    embed
}

pub fn missing_arguments_embed(usage: &str) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed
        .title("⚠️ Missing Arguments")
        .description("You're missing required arguments for this command.")
        .colour(YELLOW)
        .field("📝 Usage", format!("`{}`", usage), false)
        .field("💡 Tip", "Try `?help <command>` for usage examples.", false);
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{colour, description, field, title};

    #[test]
    fn test_unknown_command_with_suggestions() {
        let embed = unknown_command_embed("hangmn");
        assert_eq!(title(&embed), Some("❓ Command Not Found"));
        assert_eq!(colour(&embed), Some(ORANGE.0 as u64));
        assert!(field(&embed, "💡 Did you mean?").unwrap().contains("`?hangman`"));
    }

    #[test]
    fn test_unknown_command_without_suggestions() {
        let embed = unknown_command_embed("xyzzyq");
        assert_eq!(description(&embed), Some("🤔 `xyzzyq` isn't a valid command."));
        assert_eq!(colour(&embed), Some(RED.0 as u64));
        assert!(field(&embed, "💡 Did you mean?").is_none());
    }

    #[test]
    fn test_pong_embed() {
        let embed = pong_embed(Some(Duration::from_millis(42)), 3);
        assert_eq!(title(&embed), Some("🏓 Pong!"));
        assert_eq!(field(&embed, "📡 Latency"), Some("`42ms`"));
        assert_eq!(field(&embed, "🏠 Guilds"), Some("`3`"));
        assert_eq!(field(&pong_embed(None, 0), "📡 Latency"), Some("`N/A`"));
    }

    #[test]
    fn test_status_embed() {
        let embed = status_embed(2, 150, None, Duration::from_secs(3725));
        assert_eq!(title(&embed), Some("🤖 UnderLand Status"));
        let stats = field(&embed, "📊 Statistics").unwrap();
        assert!(stats.contains("**Members:** 150"));
        assert!(stats.contains("1h 2m 5s"));
    }

    #[test]
    fn test_presence_text() {
        assert_eq!(presence_text(3, 120), "120 members across 3 servers");
    }

    #[test]
    fn test_parse_arg() {
        assert_eq!(parse_arg::<f64>(Some("12.5")).unwrap(), Some(12.5));
        assert_eq!(parse_arg::<i64>(None).unwrap(), None);
        assert!(parse_arg::<i64>(Some("four")).is_err());
    }
}
