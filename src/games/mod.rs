//! Games: hangman, tic-tac-toe, trivia and ship, plus the stats views
//! shared by the scored ones.

pub mod hangman;
pub mod ship;
pub mod tictactoe;
pub mod trivia;
pub mod trivia_data;

use serenity::builder::CreateEmbed;

use crate::database::{GameStats, LeaderboardEntry};
use crate::embeds::{BLUE, GOLD};

/// Game types recorded in `game_stats`.
pub const SCORED_GAMES: &[&str] = &["hangman", "tictactoe", "trivia"];

pub fn normalize_game(name: &str) -> Option<&'static str> {
    let name = name.trim().to_lowercase();
    let canonical = match name.as_str() {
        "ttt" | "tic-tac-toe" => "tictactoe",
        other => other,
    };
    SCORED_GAMES.iter().copied().find(|g| *g == canonical)
}

fn win_rate(stats: &GameStats) -> f64 {
    if stats.total_games == 0 {
        0.0
    } else {
        stats.wins as f64 * 100.0 / stats.total_games as f64
    }
}

pub fn leaderboard_embed(game: &str, entries: &[LeaderboardEntry]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(format!("🏆 {} Leaderboard", capitalize(game))).colour(GOLD);

    if entries.is_empty() {
        embed.description("No games recorded yet. Be the first!");
        return embed;
    }

    let medals = ["🥇", "🥈", "🥉"];
    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let rank = medals
                .get(i)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("`#{}`", i + 1));
            format!(
                "{} <@{}> **{}W** / {}L ({} played)",
                rank, entry.user_id, entry.stats.wins, entry.stats.losses, entry.stats.total_games
            )
        })
        .collect();
    embed.description(lines.join("\n"));
    embed
}

pub fn stats_embed(display_name: &str, rows: &[(&str, GameStats)]) -> CreateEmbed {
    let mut embed = CreateEmbed::default();
    embed.title(format!("🎮 Game Stats for {}", display_name)).colour(BLUE);
    for (game, stats) in rows {
        embed.field(
            capitalize(game),
            format!(
                "🏅 Wins: **{}**\n💀 Losses: **{}**\n🎲 Played: **{}**\n📈 Win rate: **{:.0}%**",
                stats.wins,
                stats.losses,
                stats.total_games,
                win_rate(stats)
            ),
            true,
        );
    }
    embed
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::test_support::{description, field, title};

    #[test]
    fn test_normalize_game() {
        assert_eq!(normalize_game("TTT"), Some("tictactoe"));
        assert_eq!(normalize_game(" hangman "), Some("hangman"));
        assert_eq!(normalize_game("chess"), None);
    }

    #[test]
    fn test_leaderboard_embed() {
        let entries = vec![
            LeaderboardEntry {
                user_id: "1".to_string(),
                stats: GameStats { wins: 3, losses: 1, total_games: 4 },
            },
            LeaderboardEntry {
                user_id: "2".to_string(),
                stats: GameStats { wins: 1, losses: 0, total_games: 1 },
            },
        ];
        let embed = leaderboard_embed("tictactoe", &entries);
        assert_eq!(title(&embed), Some("🏆 Tictactoe Leaderboard"));
        let text = description(&embed).unwrap();
        assert!(text.starts_with("🥇 <@1> **3W**"));
        assert!(text.contains("🥈 <@2>"));

        let empty = leaderboard_embed("hangman", &[]);
        assert!(description(&empty).unwrap().contains("No games"));
    }

    #[test]
    fn test_stats_embed_win_rate() {
        let embed = stats_embed("ann", &[("trivia", GameStats { wins: 1, losses: 3, total_games: 4 })]);
        assert!(field(&embed, "Trivia").unwrap().contains("Win rate: **25%**"));
    }
}
