//! # Prefix Commands
//!
//! Text commands led by one of the bot prefixes (`?`, `!`, `n!`, `nz!`).
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Quoted arguments, aliases and close-match suggestions
//! - 1.0.0: Initial implementation

use crate::config::PREFIXES;
use crate::suggestions::close_matches;

/// Represents a parsed prefix command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixCommand {
    /// Canonical command name, aliases resolved
    pub name: String,
    /// The name exactly as typed, lowercased
    pub invoked_as: String,
    /// Arguments, with "double quoted" runs kept together
    pub args: Vec<String>,
    /// Everything after the command name, untouched
    pub raw: String,
}

impl PrefixCommand {
    /// Check if the command matches a given name
    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Raw text after skipping `skip` arguments, for `*, rest` style parameters.
    pub fn rest_after(&self, skip: usize) -> String {
        let mut rest = self.raw.trim_start();
        for _ in 0..skip {
            rest = skip_token(rest).trim_start();
        }
        rest.trim().to_string()
    }
}

fn skip_token(input: &str) -> &str {
    if let Some(quoted) = input.strip_prefix('"') {
        return match quoted.find('"') {
            Some(end) => &quoted[end + 1..],
            None => "",
        };
    }
    match input.find(char::is_whitespace) {
        Some(end) => &input[end..],
        None => "",
    }
}

/// Splits on whitespace; a "double quoted" run is one argument.
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut rest = input.trim_start();
    while !rest.is_empty() {
        if let Some(quoted) = rest.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => {
                    args.push(quoted[..end].to_string());
                    rest = quoted[end + 1..].trim_start();
                }
                None => {
                    args.push(quoted.to_string());
                    rest = "";
                }
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            args.push(rest[..end].to_string());
            rest = rest[end..].trim_start();
        }
    }
    args
}

/// Strips a known prefix, case-insensitively.
pub fn strip_prefix(content: &str) -> Option<&str> {
    let content = content.trim_start();
    PREFIXES.iter().find_map(|prefix| {
        let head = content.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| &content[prefix.len()..])
    })
}

/// Parse a prefix command from a message, or `None` when it isn't one.
pub fn parse_prefix_command(content: &str) -> Option<PrefixCommand> {
    let body = strip_prefix(content)?;
    if body.starts_with(char::is_whitespace) || body.is_empty() {
        return None;
    }
    let end = body.find(char::is_whitespace).unwrap_or(body.len());
    let invoked_as = body[..end].to_lowercase();
    let raw = body[end..].trim().to_string();

    Some(PrefixCommand {
        name: canonical_name(&invoked_as).to_string(),
        invoked_as,
        args: split_args(&raw),
        raw,
    })
}

/// All canonical prefix command names
pub const COMMANDS: &[&str] = &[
    // Games
    "hangman", "tictactoe", "trivia", "ship", "leaderboard", "stats",
    // Social
    "bonk", "kiss", "hug", "slap", "yeet", "facepalm", "rip", "kidnap", "kill", "punch", "love",
    "dance", "say", "replysay", "avatar",
    // Learning
    "def", "associate", "wiki", "grammar", "quickfix", "languages",
    // Productivity
    "pomodoro", "createevent", "events", "eventinfo", "cancelevent", "script",
    // Utility
    "whois", "ping", "status", "features", "toggle", "help", "commands", "about",
    // Moderation
    "mute", "unmute", "ban", "kick", "purge", "dm", "order66", "order55", "hardshutdown",
    "superhardshutdown", "orderrole",
];

/// Alias to canonical name
pub const ALIASES: &[(&str, &str)] = &[
    ("ttt", "tictactoe"),
    ("lb", "leaderboard"),
    ("check", "grammar"),
    ("spell", "grammar"),
    ("qf", "quickfix"),
    ("langs", "languages"),
    ("session", "script"),
    ("h", "help"),
    ("cmds", "commands"),
    ("commandlist", "commands"),
    ("info", "about"),
    ("botstats", "about"),
];

pub fn canonical_name(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}

/// Check if a string is a valid prefix command or alias
pub fn is_valid_command(name: &str) -> bool {
    let name = name.to_lowercase();
    COMMANDS.contains(&canonical_name(&name))
}

/// Up to three close matches for an unknown command.
pub fn suggest(name: &str) -> Vec<&'static str> {
    close_matches(&name.to_lowercase(), COMMANDS, 3, 0.6)
}

/// Which toggleable feature owns a command.
pub fn feature_for(command: &str) -> Option<&'static str> {
    let feature = match command {
        "hangman" | "tictactoe" | "trivia" | "ship" | "leaderboard" | "stats" => "games",
        "def" => "dictionary",
        "associate" | "wiki" => "reference",
        "grammar" | "quickfix" | "languages" => "grammar",
        "pomodoro" => "pomodoro",
        "createevent" | "events" | "eventinfo" | "cancelevent" => "events",
        "script" => "script_sessions",
        "say" | "replysay" | "avatar" | "poll" => "social",
        other if crate::social::find_action(other).is_some() => "social",
        _ => return None,
    };
    Some(feature)
}

/// Pulls a user id out of `<@id>`, `<@!id>` or a bare id.
pub fn parse_user_mention(arg: &str) -> Option<u64> {
    let inner = arg
        .strip_prefix("<@")
        .and_then(|s| s.strip_suffix('>'))
        .map(|s| s.trim_start_matches('!'))
        .unwrap_or(arg);
    inner.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_command() {
        let cmd = parse_prefix_command("?ping").unwrap();
        assert_eq!(cmd.name, "ping");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_every_prefix() {
        for content in ["?ping", "!ping", "n!ping", "nz!ping", "NZ!ping", "N!ping"] {
            assert_eq!(parse_prefix_command(content).unwrap().name, "ping", "{}", content);
        }
        assert!(parse_prefix_command("ping").is_none());
        assert!(parse_prefix_command("? ping").is_none());
        assert!(parse_prefix_command("?").is_none());
    }

    #[test]
    fn test_aliases_resolve() {
        let cmd = parse_prefix_command("?qf I has a apple").unwrap();
        assert_eq!(cmd.name, "quickfix");
        assert_eq!(cmd.invoked_as, "qf");
        assert_eq!(cmd.raw, "I has a apple");
        assert!(parse_prefix_command("?TTT <@1>").unwrap().is("tictactoe"));
    }

    #[test]
    fn test_quoted_arguments() {
        let cmd = parse_prefix_command("?createevent \"Movie Night\" 2030-01-01 20:00 90 Bring snacks").unwrap();
        assert_eq!(cmd.args[0], "Movie Night");
        assert_eq!(cmd.args[1], "2030-01-01");
        assert_eq!(cmd.arg(3), Some("90"));
        assert_eq!(cmd.rest_after(4), "Bring snacks");
    }

    #[test]
    fn test_rest_after_keeps_spacing() {
        let cmd = parse_prefix_command("?ban <@5> being  rude").unwrap();
        assert_eq!(cmd.rest_after(1), "being  rude");
        assert_eq!(cmd.rest_after(5), "");
    }

    #[test]
    fn test_split_args_unterminated_quote() {
        assert_eq!(split_args("a \"b c"), vec!["a", "b c"]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_is_valid_command() {
        assert!(is_valid_command("ping"));
        assert!(is_valid_command("PING"));
        assert!(is_valid_command("cmds"));
        assert!(!is_valid_command("nonexistent"));
    }

    #[test]
    fn test_suggest() {
        assert_eq!(suggest("hangmn").first(), Some(&"hangman"));
        assert!(suggest("zzzzzz").is_empty());
    }

    #[test]
    fn test_feature_for() {
        assert_eq!(feature_for("bonk"), Some("social"));
        assert_eq!(feature_for("wiki"), Some("reference"));
        assert_eq!(feature_for("ban"), None);
        assert_eq!(feature_for("help"), None);
    }

    #[test]
    fn test_parse_user_mention() {
        assert_eq!(parse_user_mention("<@123>"), Some(123));
        assert_eq!(parse_user_mention("<@!123>"), Some(123));
        assert_eq!(parse_user_mention("123"), Some(123));
        assert_eq!(parse_user_mention("<@&123>"), None);
        assert_eq!(parse_user_mention("bob"), None);
    }
}
