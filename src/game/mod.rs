//! Core Connect Four game logic: board, players, rules, and the value types
//! the controller hands to renderers.

mod board;
mod player;
pub mod rules;
mod state;

pub use board::{Board, Cell, Position, COLS, ROWS};
pub use player::Player;
pub use rules::{find_winning_line, has_connection, is_draw, legal_moves, LegalMoves, WinningLine};
pub use state::{GameOutcome, Move, Phase, Snapshot, Transition};
