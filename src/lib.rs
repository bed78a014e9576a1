pub mod api;
pub mod cogs;
pub mod command_handler;
pub mod commands;
pub mod config;
pub mod database;
pub mod dictionary;
pub mod embeds;
pub mod events;
pub mod features;
pub mod games;
pub mod grammar;
pub mod help;
pub mod message_components;
pub mod moderation;
pub mod permissions;
pub mod pomodoro;
pub mod rate_limiter;
pub mod reminder_scheduler;
pub mod script_session;
pub mod social;
pub mod suggestions;
pub mod views;
pub mod welcome;
pub mod whois;
pub mod wiki;
pub mod word_association;
