//! # Feature: Tic-Tac-Toe
//!
//! Two-player board played on a 3x3 grid of buttons.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.0.0: Initial release

use serenity::builder::{CreateComponents, CreateEmbed};
use serenity::model::application::component::ButtonStyle;
use std::fmt;
use std::time::Duration;

use crate::embeds::GREEN;
use crate::views::{Expiring, ViewTimeout};

pub const VIEW_TIMEOUT: Duration = Duration::from_secs(120);
pub const BUTTON_PREFIX: &str = "ttt:";

const SYMBOLS: [&str; 2] = ["❌", "⭕"];
const EMPTY_LABEL: &str = "\u{200b}";

const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    NotYourTurn,
    CellTaken,
    GameOver,
    InvalidCell,
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            MoveError::NotYourTurn => "It's not your turn!",
            MoveError::CellTaken => "This cell is already taken.",
            MoveError::GameOver => "This game is already over.",
            MoveError::InvalidCell => "That cell does not exist.",
        };
        f.write_str(text)
    }
}

impl std::error::Error for MoveError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Win { winner: u64, loser: u64 },
    Draw,
    NextTurn(u64),
}

#[derive(Debug, Clone)]
pub struct TicTacToe {
    players: [u64; 2],
    board: [Option<usize>; 9],
    current: usize,
    move_count: u8,
    finished: bool,
    pub guild_id: Option<u64>,
}

impl TicTacToe {
    pub fn new(player_one: u64, player_two: u64, guild_id: Option<u64>) -> Self {
        TicTacToe {
            players: [player_one, player_two],
            board: [None; 9],
            current: 0,
            move_count: 0,
            finished: false,
            guild_id,
        }
    }

    pub fn current_player(&self) -> u64 {
        self.players[self.current]
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn play(&mut self, user_id: u64, position: usize) -> Result<MoveOutcome, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }
        if user_id != self.current_player() {
            return Err(MoveError::NotYourTurn);
        }
        let cell = self.board.get_mut(position).ok_or(MoveError::InvalidCell)?;
        if cell.is_some() {
            return Err(MoveError::CellTaken);
        }

        *cell = Some(self.current);
        self.move_count += 1;

        if self.has_won(self.current) {
            self.finished = true;
            return Ok(MoveOutcome::Win {
                winner: self.players[self.current],
                loser: self.players[1 - self.current],
            });
        }
        if self.move_count >= 9 {
            self.finished = true;
            return Ok(MoveOutcome::Draw);
        }

        self.current = 1 - self.current;
        Ok(MoveOutcome::NextTurn(self.current_player()))
    }

    fn has_won(&self, player: usize) -> bool {
        WIN_LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.board[i] == Some(player)))
    }

    pub fn start_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        embed
            .title("⭕ Tic-Tac-Toe Game")
            .description(format!(
                "<@{}> ({}) vs <@{}> ({})",
                self.players[0], SYMBOLS[0], self.players[1], SYMBOLS[1]
            ))
            .colour(GREEN)
            .field("Current Turn", format!("<@{}>", self.current_player()), false)
            .footer(|f| f.text("Click the buttons below to make your move!"));
        embed
    }

    pub fn components(&self, disable_all: bool) -> CreateComponents {
        let mut components = CreateComponents::default();
        for row in 0..3 {
            components.create_action_row(|action_row| {
                for position in row * 3..row * 3 + 3 {
                    let mark = self.board[position];
                    action_row.create_button(|b| {
                        b.custom_id(format!("{}{}", BUTTON_PREFIX, position))
                            .label(mark.map(|p| SYMBOLS[p]).unwrap_or(EMPTY_LABEL))
                            .style(match mark {
                                Some(0) => ButtonStyle::Primary,
                                Some(_) => ButtonStyle::Success,
                                None => ButtonStyle::Secondary,
                            })
                            .disabled(disable_all || mark.is_some())
                    });
                }
                action_row
            });
        }
        components
    }
}

pub fn parse_position(custom_id: &str) -> Option<usize> {
    custom_id
        .strip_prefix(BUTTON_PREFIX)?
        .parse()
        .ok()
        .filter(|p| *p < 9)
}

pub fn outcome_message(outcome: MoveOutcome) -> String {
    match outcome {
        MoveOutcome::Win { winner, .. } => format!("<@{}> wins!", winner),
        MoveOutcome::Draw => "It's a draw!".to_string(),
        MoveOutcome::NextTurn(next) => format!("It's now <@{}>'s turn", next),
    }
}

impl Expiring for TicTacToe {
    fn timeout(&self) -> Duration {
        VIEW_TIMEOUT
    }

    fn on_timeout(&self) -> ViewTimeout {
        ViewTimeout {
            content: Some("Game timed out!".to_string()),
            embed: None,
            components: self.components(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u64 = 1;
    const B: u64 = 2;

    fn play_all(game: &mut TicTacToe, moves: &[usize]) -> MoveOutcome {
        let mut last = MoveOutcome::Draw;
        for (i, &pos) in moves.iter().enumerate() {
            let player = if i % 2 == 0 { A } else { B };
            last = game.play(player, pos).unwrap();
        }
        last
    }

    #[test]
    fn test_every_winning_line_is_detected() {
        for line in WIN_LINES {
            let filler: Vec<usize> = (0..9).filter(|p| !line.contains(p)).take(2).collect();
            let mut game = TicTacToe::new(A, B, None);
            let moves = [line[0], filler[0], line[1], filler[1], line[2]];
            assert_eq!(
                play_all(&mut game, &moves),
                MoveOutcome::Win { winner: A, loser: B },
                "line {:?}",
                line
            );
            assert!(game.is_finished());
        }
    }

    #[test]
    fn test_draw_after_nine_moves() {
        let mut game = TicTacToe::new(A, B, None);
        // X O X / X O O / O X X
        let outcome = play_all(&mut game, &[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert_eq!(outcome, MoveOutcome::Draw);
    }

    #[test]
    fn test_turn_order_and_taken_cells() {
        let mut game = TicTacToe::new(A, B, None);
        assert_eq!(game.play(B, 0), Err(MoveError::NotYourTurn));
        assert_eq!(game.play(A, 4), Ok(MoveOutcome::NextTurn(B)));
        assert_eq!(game.play(B, 4), Err(MoveError::CellTaken));
        assert_eq!(game.play(B, 9), Err(MoveError::InvalidCell));
        assert_eq!(game.current_player(), B);
    }

    #[test]
    fn test_no_moves_after_finish() {
        let mut game = TicTacToe::new(A, B, None);
        play_all(&mut game, &[0, 3, 1, 4, 2]);
        assert_eq!(game.play(B, 8), Err(MoveError::GameOver));
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("ttt:4"), Some(4));
        assert_eq!(parse_position("ttt:9"), None);
        assert_eq!(parse_position("hangman:4"), None);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(outcome_message(MoveOutcome::Win { winner: 1, loser: 2 }), "<@1> wins!");
        assert_eq!(outcome_message(MoveOutcome::Draw), "It's a draw!");
        assert_eq!(outcome_message(MoveOutcome::NextTurn(2)), "It's now <@2>'s turn");
        assert_eq!(MoveError::NotYourTurn.to_string(), "It's not your turn!");
    }

    #[test]
    fn test_components_have_nine_buttons() {
        let mut game = TicTacToe::new(A, B, None);
        game.play(A, 0).unwrap();
        let components = game.components(false);
        assert_eq!(components.0.len(), 3);
        let rendered = serde_json::to_string(&components.0).unwrap();
        assert_eq!(rendered.matches("ttt:").count(), 9);
        assert!(rendered.contains("❌"));
    }
}
