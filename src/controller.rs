//! Turn sequencing for a human against the computer.
//!
//! The controller owns the board and applies moves synchronously: every call
//! returns the resulting state immediately, and any staged reveal (drop
//! animations, "thinking" pauses) is left to the renderer working from the
//! returned [`Transition`]s.

use tracing::{debug, info, instrument, warn};

use crate::ai::Agent;
use crate::audio::{AudioSink, SoundCue};
use crate::error::{GameError, StatsError};
use crate::game::{
    find_winning_line, has_connection, is_draw, Board, GameOutcome, Move, Phase, Player,
    Snapshot, Transition, WinningLine,
};
use crate::stats::{GameStats, StatsStore};

pub struct GameController {
    board: Board,
    turn: Player,
    phase: Phase,
    winning_line: Option<WinningLine>,
    history: Vec<Move>,
    agent: Box<dyn Agent>,
    audio: Box<dyn AudioSink>,
    stats: Box<dyn StatsStore>,
}

impl GameController {
    /// Start a new game with the human to move.
    pub fn new(
        agent: Box<dyn Agent>,
        audio: Box<dyn AudioSink>,
        stats: Box<dyn StatsStore>,
    ) -> Self {
        GameController {
            board: Board::new(),
            turn: Player::Human,
            phase: Phase::AwaitingPlayerMove,
            winning_line: None,
            history: Vec::new(),
            agent,
            audio,
            stats,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Player {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> GameOutcome {
        match self.phase {
            Phase::GameOver(outcome) => outcome,
            _ => GameOutcome::InProgress,
        }
    }

    pub fn winning_line(&self) -> Option<WinningLine> {
        self.winning_line
    }

    /// Moves played since the last reset, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn agent_name(&self) -> &str {
        self.agent.name()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board,
            winning_line: self.winning_line,
            turn: self.turn,
            outcome: self.outcome(),
        }
    }

    pub fn stats(&self) -> GameStats {
        self.stats.stats()
    }

    pub fn reset_stats(&mut self) -> Result<(), StatsError> {
        self.stats.reset_stats()
    }

    pub fn sound_enabled(&self) -> bool {
        self.audio.is_enabled()
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.audio.set_enabled(enabled);
    }

    /// Play `column` for `acting`. When the move hands the turn to the
    /// computer, its reply is played too.
    ///
    /// Returns one transition per applied move, in order. On error nothing
    /// changes.
    #[instrument(skip(self))]
    pub fn submit_move(
        &mut self,
        column: usize,
        acting: Player,
    ) -> Result<Vec<Transition>, GameError> {
        let mut transitions = vec![self.apply_move(column, acting)?];

        if self.phase == Phase::AwaitingAiMove {
            match self.play_ai_turn() {
                Ok(Some(reply)) => transitions.push(reply),
                Ok(None) => warn!("agent had no move to offer"),
                Err(err) => warn!(%err, agent = self.agent.name(), "agent move rejected"),
            }
        }

        Ok(transitions)
    }

    /// Ask the agent for its move and apply it. Only valid while the
    /// computer is to move.
    pub fn play_ai_turn(&mut self) -> Result<Option<Transition>, GameError> {
        match self.phase {
            Phase::AwaitingAiMove => {}
            Phase::GameOver(_) => return Err(GameError::GameAlreadyOver),
            Phase::AwaitingPlayerMove | Phase::MoveInFlight => {
                return Err(GameError::NotYourTurn)
            }
        }

        let Some(column) = self.agent.select_action(&self.board, Player::Ai) else {
            return Ok(None);
        };
        self.apply_move(column, Player::Ai).map(Some)
    }

    fn apply_move(&mut self, column: usize, acting: Player) -> Result<Transition, GameError> {
        match self.phase {
            Phase::GameOver(_) => return Err(GameError::GameAlreadyOver),
            Phase::MoveInFlight => return Err(GameError::NotYourTurn),
            Phase::AwaitingPlayerMove | Phase::AwaitingAiMove => {}
        }
        if acting != self.turn {
            return Err(GameError::NotYourTurn);
        }

        let previous = self.phase;
        self.phase = Phase::MoveInFlight;
        let row = match self.board.place(column, acting) {
            Ok(row) => row,
            Err(err) => {
                self.phase = previous;
                return Err(err);
            }
        };

        let mv = Move {
            column,
            player: acting,
        };
        self.history.push(mv);
        self.audio.play(SoundCue::PieceDropped);
        debug!(column, row, player = acting.name(), "piece dropped");

        if has_connection(&self.board, column, row, acting) {
            self.winning_line = find_winning_line(&self.board, acting);
            self.finish(GameOutcome::Win(acting));
        } else if is_draw(&self.board) {
            self.finish(GameOutcome::Draw);
        } else {
            self.turn = acting.other();
            self.phase = match self.turn {
                Player::Human => Phase::AwaitingPlayerMove,
                Player::Ai => Phase::AwaitingAiMove,
            };
        }

        Ok(Transition {
            mv,
            row,
            snapshot: self.snapshot(),
        })
    }

    fn finish(&mut self, outcome: GameOutcome) {
        self.phase = Phase::GameOver(outcome);
        info!(?outcome, moves = self.history.len(), "game over");

        if let GameOutcome::Win(_) = outcome {
            self.audio.play(SoundCue::GameWon);
        }
        if let Err(err) = self.stats.record_outcome(outcome) {
            warn!(%err, "failed to record game outcome");
        }
    }

    /// Start over with an empty board and the human to move. Allowed at any
    /// time, including after the game has ended.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Snapshot {
        self.board = Board::new();
        self.turn = Player::Human;
        self.phase = Phase::AwaitingPlayerMove;
        self.winning_line = None;
        self.history.clear();
        info!("new game");
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::ai::{HeuristicAgent, HeuristicConfig};
    use crate::game::{Position, COLS};
    use crate::stats::InMemoryStats;

    #[derive(Clone, Default)]
    struct CueLog(Rc<RefCell<Vec<SoundCue>>>);

    impl AudioSink for CueLog {
        fn play(&mut self, cue: SoundCue) {
            self.0.borrow_mut().push(cue);
        }
    }

    impl CueLog {
        fn count(&self, cue: SoundCue) -> usize {
            self.0.borrow().iter().filter(|&&c| c == cue).count()
        }
    }

    /// Always plays the same column, legal or not.
    struct Stubborn(usize);

    impl Agent for Stubborn {
        fn select_action(&mut self, _board: &Board, _me: Player) -> Option<usize> {
            Some(self.0)
        }

        fn name(&self) -> &str {
            "Stubborn"
        }
    }

    fn controller() -> (GameController, CueLog) {
        let cues = CueLog::default();
        let agent = HeuristicAgent::new(HeuristicConfig {
            seed: Some(42),
            ..HeuristicConfig::default()
        });
        let controller = GameController::new(
            Box::new(agent),
            Box::new(cues.clone()),
            Box::new(InMemoryStats::new()),
        );
        (controller, cues)
    }

    fn positions(coords: [(usize, usize); 4]) -> WinningLine {
        WinningLine(coords.map(|(c, r)| Position::new(c, r)))
    }

    #[test]
    fn test_initial_state() {
        let (game, _) = controller();
        assert_eq!(game.phase(), Phase::AwaitingPlayerMove);
        assert_eq!(game.turn(), Player::Human);
        assert_eq!(game.outcome(), GameOutcome::InProgress);
        assert_eq!(game.snapshot(), Snapshot::initial());
        assert_eq!(game.agent_name(), "Heuristic");
    }

    #[test]
    fn test_human_move_gets_ai_reply() {
        let (mut game, cues) = controller();
        let transitions = game.submit_move(0, Player::Human).unwrap();

        assert_eq!(transitions.len(), 2);
        assert_eq!(
            transitions[0].mv,
            Move {
                column: 0,
                player: Player::Human
            }
        );
        assert_eq!(transitions[0].row, 0);
        assert_eq!(transitions[0].snapshot.turn, Player::Ai);
        assert_eq!(transitions[1].mv.player, Player::Ai);
        assert_eq!(transitions[1].snapshot.turn, Player::Human);

        // Game still in progress: nothing recorded
        assert_eq!(game.stats().games_played, 0);
        assert_eq!(game.phase(), Phase::AwaitingPlayerMove);
        assert_eq!(game.board().piece_count(), 2);
        assert_eq!(game.history().len(), 2);
        assert_eq!(cues.count(SoundCue::PieceDropped), 2);
    }

    #[test]
    fn test_human_completes_bottom_row() {
        let (mut game, cues) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "AAA....",
            "HHH....",
        ]);

        let transitions = game.submit_move(3, Player::Human).unwrap();
        assert_eq!(transitions.len(), 1);

        let expected = positions([(0, 0), (1, 0), (2, 0), (3, 0)]);
        assert_eq!(game.outcome(), GameOutcome::Win(Player::Human));
        assert_eq!(game.winning_line(), Some(expected));
        assert_eq!(transitions[0].snapshot.winning_line, Some(expected));
        assert_eq!(
            transitions[0].snapshot.outcome,
            GameOutcome::Win(Player::Human)
        );

        let stats = game.stats();
        assert_eq!(stats.player_wins, 1);
        assert_eq!(stats.games_played, 1);
        assert_eq!(cues.count(SoundCue::GameWon), 1);
    }

    #[test]
    fn test_full_board_is_a_draw() {
        let (mut game, cues) = controller();
        game.board = Board::from_diagram(&[
            "AAHAH..",
            "AHAHAAH",
            "HAAAHHH",
            "HAHHHAA",
            "HHHAHHA",
            "AAHAAHA",
        ]);

        let transitions = game.submit_move(6, Player::Human).unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(
            transitions[1].mv,
            Move {
                column: 5,
                player: Player::Ai
            }
        );

        assert!(is_draw(game.board()));
        assert_eq!(game.phase(), Phase::GameOver(GameOutcome::Draw));
        assert_eq!(game.winning_line(), None);

        let stats = game.stats();
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.player_wins, 0);
        assert_eq!(stats.ai_wins, 0);
        assert_eq!(cues.count(SoundCue::GameWon), 0);
    }

    #[test]
    fn test_ai_blocks_open_three() {
        let (mut game, _) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            ".......",
            "AHH..A.",
        ]);

        let transitions = game.submit_move(3, Player::Human).unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(
            transitions[1].mv,
            Move {
                column: 4,
                player: Player::Ai
            }
        );
        assert_eq!(game.outcome(), GameOutcome::InProgress);
    }

    #[test]
    fn test_ai_takes_the_win() {
        let (mut game, cues) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "H......",
            "AAA.HH.",
        ]);

        let transitions = game.submit_move(6, Player::Human).unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(game.outcome(), GameOutcome::Win(Player::Ai));
        assert_eq!(
            game.winning_line(),
            Some(positions([(0, 0), (1, 0), (2, 0), (3, 0)]))
        );
        assert_eq!(game.stats().ai_wins, 1);
        assert_eq!(game.stats().games_played, 1);
        assert_eq!(cues.count(SoundCue::GameWon), 1);
    }

    #[test]
    fn test_ai_cannot_move_on_human_turn() {
        let (mut game, _) = controller();
        let before = game.snapshot();

        assert_eq!(
            game.submit_move(3, Player::Ai),
            Err(GameError::NotYourTurn)
        );
        assert_eq!(game.snapshot(), before);
        assert!(game.history().is_empty());
        assert_eq!(game.play_ai_turn(), Err(GameError::NotYourTurn));
    }

    #[test]
    fn test_moves_rejected_after_game_over() {
        let (mut game, _) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "AAA....",
            "HHH....",
        ]);
        game.submit_move(3, Player::Human).unwrap();
        let finished = game.snapshot();

        assert_eq!(
            game.submit_move(4, Player::Human),
            Err(GameError::GameAlreadyOver)
        );
        assert_eq!(game.play_ai_turn(), Err(GameError::GameAlreadyOver));
        assert_eq!(game.snapshot(), finished);
        // Outcome recorded exactly once
        assert_eq!(game.stats().games_played, 1);
    }

    #[test]
    fn test_full_column_rejected_without_change() {
        let (mut game, _) = controller();
        game.board = Board::from_diagram(&[
            "A......",
            "H......",
            "A......",
            "H......",
            "A......",
            "H......",
        ]);
        let before = game.snapshot();

        assert_eq!(
            game.submit_move(0, Player::Human),
            Err(GameError::ColumnFull { column: 0 })
        );
        assert_eq!(game.snapshot(), before);
        assert_eq!(game.phase(), Phase::AwaitingPlayerMove);
    }

    #[test]
    fn test_out_of_range_column_rejected() {
        let (mut game, _) = controller();
        assert_eq!(
            game.submit_move(COLS, Player::Human),
            Err(GameError::InvalidPosition {
                column: COLS,
                row: 0
            })
        );
        assert_eq!(game.phase(), Phase::AwaitingPlayerMove);
        assert_eq!(game.board().piece_count(), 0);
    }

    #[test]
    fn test_rejected_agent_move_leaves_ai_to_move() {
        let mut game = GameController::new(
            Box::new(Stubborn(COLS + 1)),
            Box::new(CueLog::default()),
            Box::new(InMemoryStats::new()),
        );

        let transitions = game.submit_move(3, Player::Human).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(game.phase(), Phase::AwaitingAiMove);
        assert_eq!(game.turn(), Player::Ai);
        assert_eq!(
            game.submit_move(2, Player::Human),
            Err(GameError::NotYourTurn)
        );
    }

    #[test]
    fn test_reset_returns_to_initial_state() {
        let (mut game, _) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "AAA....",
            "HHH....",
        ]);
        game.submit_move(3, Player::Human).unwrap();
        assert!(game.phase().is_over());

        let snapshot = game.reset();
        assert_eq!(snapshot, Snapshot::initial());
        assert_eq!(game.snapshot(), Snapshot::initial());
        assert_eq!(game.phase(), Phase::AwaitingPlayerMove);
        assert!(game.history().is_empty());
        // Reset does not touch the stats
        assert_eq!(game.stats().games_played, 1);

        // A fresh game can be played after reset
        assert_eq!(game.submit_move(3, Player::Human).unwrap().len(), 2);
    }

    #[test]
    fn test_full_game_against_itself_terminates() {
        let (mut game, _) = controller();
        let mut guard = 0;
        while !game.phase().is_over() {
            let column = crate::game::legal_moves(game.board())[0];
            game.submit_move(column, Player::Human).unwrap();
            guard += 1;
            assert!(guard <= 21, "game should end within 21 human moves");
        }
        assert_eq!(game.stats().games_played, 1);
    }

    #[test]
    fn test_sound_toggle_reaches_sink() {
        let mut game = GameController::new(
            Box::new(HeuristicAgent::default()),
            Box::new(crate::audio::TerminalBell::new(Vec::new(), true, false)),
            Box::new(InMemoryStats::new()),
        );
        assert!(game.sound_enabled());
        game.set_sound_enabled(false);
        assert!(!game.sound_enabled());
    }

    #[test]
    fn test_reset_stats() {
        let (mut game, _) = controller();
        game.board = Board::from_diagram(&[
            ".......",
            ".......",
            ".......",
            ".......",
            "AAA....",
            "HHH....",
        ]);
        game.submit_move(3, Player::Human).unwrap();
        game.reset_stats().unwrap();
        assert_eq!(game.stats(), GameStats::default());
    }
}
