//! Productivity slash commands: /pomodoro and the event commands

use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;

use crate::events::MAX_DURATION_MINUTES;

pub fn create_commands() -> Vec<CreateApplicationCommand> {
    vec![
        create_pomodoro_command(),
        create_createevent_command(),
        create_events_command(),
        create_eventinfo_command(),
        create_cancelevent_command(),
    ]
}

fn create_pomodoro_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("pomodoro")
        .description("Start a Pomodoro session")
        .create_option(|option| {
            option
                .name("focus")
                .description("Focus time in minutes (default: 25)")
                .kind(CommandOptionType::Number)
                .min_number_value(0.1)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("brk")
                .description("Break time in minutes (default: 5)")
                .kind(CommandOptionType::Number)
                .min_number_value(0.1)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("cycles")
                .description("Number of cycles (default: 4)")
                .kind(CommandOptionType::Integer)
                .min_int_value(1)
                .required(false)
        })
        .to_owned()
}

fn create_createevent_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("createevent")
        .description("Create a new event")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("title")
                .description("Event title")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("date")
                .description("Event date (YYYY-MM-DD, MM/DD/YYYY, or DD/MM/YYYY)")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("time")
                .description("Event time in UTC (HH:MM, H:MM AM/PM)")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .create_option(|option| {
            option
                .name("description")
                .description("Event description")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .create_option(|option| {
            option
                .name("duration")
                .description("Duration in minutes (default: 60)")
                .kind(CommandOptionType::Integer)
                .min_int_value(1)
                .max_int_value(MAX_DURATION_MINUTES)
                .required(false)
        })
        .to_owned()
}

fn create_events_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("events")
        .description("List upcoming events")
        .dm_permission(false)
        .to_owned()
}

fn create_eventinfo_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("eventinfo")
        .description("Get detailed information about an event")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("event_id")
                .description("The ID of the event to view")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}

fn create_cancelevent_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("cancelevent")
        .description("Cancel an event")
        .dm_permission(false)
        .create_option(|option| {
            option
                .name("event_id")
                .description("The ID of the event to cancel")
                .kind(CommandOptionType::String)
                .required(true)
        })
        .to_owned()
}
