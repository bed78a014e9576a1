//! Utility slash commands: /ping, /help

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

/// Creates utility commands
pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_ping_command(), create_help_command()]
}

/// Creates the ping command
fn create_ping_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("ping")
        .description("Check the bot's latency")
        .to_owned()
}

/// Creates the help command
fn create_help_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("help")
        .description("Browse commands by category or look one up")
        .create_option(|option| {
            option
                .name("query")
                .description("A category, command or search term")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}
