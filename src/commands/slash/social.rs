//! Social slash commands: /poll

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_poll_command()]
}

fn create_poll_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("poll")
        .description("Create a quick poll.")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("question")
                .description("What are you asking?")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("option1")
                .description("The first choice")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("option2")
                .description("The second choice")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}
