use crate::game::{Board, Player};

/// Interface the controller uses to obtain a move for a computer player.
pub trait Agent {
    /// Select a column to play for `me` on the given board.
    /// Returns `None` only when no column can accept a piece.
    fn select_action(&mut self, board: &Board, me: Player) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}
