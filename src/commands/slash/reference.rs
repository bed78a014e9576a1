//! Learning slash commands: /def, /grammar

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::grammar::{language_name, SLASH_LANGUAGES};

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![create_def_command(), create_grammar_command()]
}

fn create_def_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("def")
        .description("Define an English word")
        .create_option(|option| {
            option
                .name("word")
                .description("The word you want to define")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

fn create_grammar_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("grammar")
        .description("Check text for grammar and spelling errors")
        .create_option(|option| {
            option
                .name("text")
                .description("The text to check for grammar and spelling errors")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("language")
                .description("Language code (default: en-US)")
                .kind(CommandOptionType::String)
                .required(false);
            for code in SLASH_LANGUAGES {
                option.add_string_choice(language_name(code), *code);
            }
            option
        })
        .to_owned()
}
