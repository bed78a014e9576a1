//! # Command System
//!
//! Unified command handling for slash commands (/) and prefix commands (?).
//!
//! - **Version**: 2.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 2.0.0: `?` prefix commands with aliases, shared `Invocation` replies
//! - 1.0.0: Initial modular command structure

pub mod invocation;
pub mod prefix;
pub mod slash;

pub use crate::command_handler::CommandHandler;

pub use invocation::{Invocation, Reply};
pub use prefix::{parse_prefix_command, PrefixCommand};
pub use slash::{
    create_slash_commands, get_integer_option, get_number_option, get_string_option, register_global_commands,
};
