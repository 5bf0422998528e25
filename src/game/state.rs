use super::board::Board;
use super::player::Player;
use super::rules::WinningLine;

/// A column played by a player. Recorded moves are never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Move {
    pub column: usize,
    pub player: Player,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GameOutcome {
    InProgress,
    Win(Player),
    Draw,
}

impl GameOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameOutcome::InProgress)
    }
}

/// Where the controller is in a turn.
///
/// `MoveInFlight` is held while a move is being applied; no other move is
/// accepted until it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingPlayerMove,
    AwaitingAiMove,
    MoveInFlight,
    GameOver(GameOutcome),
}

impl Phase {
    pub fn is_over(self) -> bool {
        matches!(self, Phase::GameOver(_))
    }
}

/// Everything a renderer needs to draw the game after a state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub winning_line: Option<WinningLine>,
    pub turn: Player,
    pub outcome: GameOutcome,
}

impl Snapshot {
    pub fn initial() -> Self {
        Snapshot {
            board: Board::new(),
            winning_line: None,
            turn: Player::Human,
            outcome: GameOutcome::InProgress,
        }
    }
}

/// One applied move and the state it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub mv: Move,
    pub row: usize,
    pub snapshot: Snapshot,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_terminal() {
        assert!(!GameOutcome::InProgress.is_terminal());
        assert!(GameOutcome::Win(Player::Ai).is_terminal());
        assert!(GameOutcome::Draw.is_terminal());
    }

    #[test]
    fn test_initial_snapshot() {
        let snapshot = Snapshot::initial();
        assert_eq!(snapshot.board, Board::new());
        assert_eq!(snapshot.turn, Player::Human);
        assert_eq!(snapshot.outcome, GameOutcome::InProgress);
        assert!(snapshot.winning_line.is_none());
    }

    #[test]
    fn test_phase_is_over() {
        assert!(Phase::GameOver(GameOutcome::Draw).is_over());
        assert!(!Phase::MoveInFlight.is_over());
    }
}
