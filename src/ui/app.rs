use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, info, warn};

use super::animation::DropAnimator;
use super::game_view::{self, GameView};
use crate::config::UiConfig;
use crate::controller::GameController;
use crate::error::GameError;
use crate::game::{GameOutcome, Phase, Player, COLS};

/// Redraw interval while idle or animating.
const TICK: Duration = Duration::from_millis(16);

pub struct App {
    controller: GameController,
    animator: DropAnimator,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
}

impl App {
    pub fn new(controller: GameController, ui: &UiConfig) -> Self {
        let animator = DropAnimator::new(
            Duration::from_millis(ui.drop_frame_ms),
            Duration::from_millis(ui.ai_delay_ms),
            controller.snapshot(),
        );
        App {
            controller,
            animator,
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        B::Error: Into<io::Error>,
    {
        loop {
            self.on_tick(Instant::now());
            terminal
                .draw(|f| self.render(f))
                .map_err(Into::<io::Error>::into)?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn on_tick(&mut self, now: Instant) {
        if let Some(landed) = self.animator.tick(now) {
            if !self.animator.is_busy() {
                self.show_outcome(landed.snapshot.outcome);
            }
        }

        // The computer still owes a move once everything has landed
        if !self.animator.is_busy() && self.controller.phase() == Phase::AwaitingAiMove {
            match self.controller.play_ai_turn() {
                Ok(Some(reply)) => self.animator.enqueue([reply], now),
                Ok(None) => {}
                Err(err) => debug!(%err, "computer move retry rejected"),
            }
        }
    }

    fn show_outcome(&mut self, outcome: GameOutcome) {
        self.message = match outcome {
            GameOutcome::InProgress => None,
            GameOutcome::Win(Player::Human) => {
                Some("You connected four! Press 'r' to play again.".to_string())
            }
            GameOutcome::Win(Player::Ai) => {
                Some("Claude connected four. Press 'r' to play again.".to_string())
            }
            GameOutcome::Draw => Some("Board full. Press 'r' to play again.".to_string()),
        };
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < COLS {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_piece();
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_piece();
            }
            KeyCode::Char('r') => {
                let snapshot = self.controller.reset();
                self.animator.reset(snapshot);
                self.selected_column = COLS / 2;
                self.message = Some("New game started!".to_string());
            }
            KeyCode::Char('s') => {
                let enabled = !self.controller.sound_enabled();
                self.controller.set_sound_enabled(enabled);
                self.message = Some(format!("Sound {}", if enabled { "on" } else { "off" }));
            }
            KeyCode::Char('x') => {
                self.message = Some(match self.controller.reset_stats() {
                    Ok(()) => "Statistics reset.".to_string(),
                    Err(err) => {
                        warn!(%err, "failed to reset stats");
                        format!("Could not reset statistics: {err}")
                    }
                });
            }
            _ => {}
        }
    }

    /// Drop piece in selected column
    fn drop_piece(&mut self) {
        if self.animator.is_busy() {
            self.message = Some("Wait for the move to finish.".to_string());
            return;
        }

        match self.controller.submit_move(self.selected_column, Player::Human) {
            Ok(transitions) => {
                self.message = None;
                self.animator.enqueue(transitions, Instant::now());
            }
            Err(err) => {
                info!(%err, column = self.selected_column, "move rejected");
                self.message = Some(match err {
                    GameError::ColumnFull { .. } => "Column is full!".to_string(),
                    GameError::InvalidPosition { .. } => "Invalid column!".to_string(),
                    GameError::NotYourTurn => "Wait for your turn!".to_string(),
                    GameError::GameAlreadyOver => {
                        "Game over! Press 'r' to restart.".to_string()
                    }
                });
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let now = Instant::now();
        let view = GameView {
            snapshot: self.animator.shown(),
            falling: self.animator.falling_disc(now),
            thinking: self.animator.is_thinking(now),
            selected_column: self.selected_column,
            message: self.message.as_deref(),
            stats: self.controller.stats(),
            sound_on: self.controller.sound_enabled(),
        };
        game_view::render(frame, &view);
    }
}
