//! # Slash Commands (/)
//!
//! Discord native slash commands with choices and validation.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Poll, dictionary, grammar, pomodoro and event commands
//! - 1.0.0: Reorganized from monolithic slash_commands.rs

mod productivity;
mod reference;
mod social;
mod utility;

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::Command;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::prelude::Context;

/// Creates all slash command definitions
pub fn create_slash_commands() -> Vec<CreateApplicationCommand> {
    let mut commands = Vec::new();

    // Utility commands
    commands.extend(utility::create_commands());

    // Social commands
    commands.extend(social::create_commands());

    // Dictionary and grammar
    commands.extend(reference::create_commands());

    // Pomodoro and events
    commands.extend(productivity::create_commands());

    commands
}

/// Registers all slash commands globally
pub async fn register_global_commands(ctx: &Context) -> Result<()> {
    let slash_commands = create_slash_commands();

    Command::set_global_application_commands(&ctx.http, |commands| {
        for command in slash_commands {
            commands.add_application_command(command);
        }
        commands
    })
    .await?;

    info!("✅ Global slash commands registered successfully");
    Ok(())
}

/// Utility function to get string option from slash command
pub fn get_string_option(options: &[CommandDataOption], name: &str) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

/// Utility function to get integer option from slash command
pub fn get_integer_option(options: &[CommandDataOption], name: &str) -> Option<i64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_i64())
}

/// Number options arrive as JSON floats, or integers when whole.
pub fn get_number_option(options: &[CommandDataOption], name: &str) -> Option<f64> {
    options
        .iter()
        .find(|opt| opt.name == name)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_f64())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn command_names() -> Vec<String> {
        create_slash_commands()
            .iter()
            .map(|cmd| cmd.0.get("name").unwrap().as_str().unwrap().to_string())
            .collect()
    }

    fn find_command(name: &str) -> CreateApplicationCommand {
        create_slash_commands()
            .into_iter()
            .find(|cmd| cmd.0.get("name") == Some(&json!(name)))
            .unwrap()
    }

    #[test]
    fn test_create_slash_commands() {
        let names = command_names();
        let expected_commands = vec![
            "ping",
            "help",
            "poll",
            "def",
            "grammar",
            "pomodoro",
            "createevent",
            "events",
            "eventinfo",
            "cancelevent",
        ];

        for expected in &expected_commands {
            assert!(names.contains(&expected.to_string()), "Missing command: {}", expected);
        }
        assert_eq!(names.len(), expected_commands.len());
    }

    #[test]
    fn test_grammar_language_choices() {
        let grammar = find_command("grammar");
        let options = grammar.0.get("options").unwrap().as_array().unwrap();
        let language = options.iter().find(|o| o["name"] == "language").unwrap();
        let choices = language["choices"].as_array().unwrap();
        assert_eq!(choices.len(), 7);
        assert_eq!(choices[0], json!({"name": "English (US)", "value": "en-US"}));
        assert_eq!(language["required"], Value::Bool(false));
    }

    #[test]
    fn test_createevent_required_options() {
        let create = find_command("createevent");
        let options = create.0.get("options").unwrap().as_array().unwrap();
        let required: Vec<&str> = options
            .iter()
            .filter(|o| o["required"] == Value::Bool(true))
            .map(|o| o["name"].as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["title", "date", "time"]);
    }
}
