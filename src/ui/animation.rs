//! Staged reveal of moves the controller has already applied.
//!
//! The controller hands back finished [`Transition`]s; this queue replays
//! them one at a time as discs falling a row per frame, with a pause before
//! each computer move.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::{Player, Position, Snapshot, Transition, ROWS};

#[derive(Debug, Clone, Copy)]
struct FallingDisc {
    transition: Transition,
    row: usize,
    visible_at: Instant,
    next_step: Instant,
}

#[derive(Debug)]
pub struct DropAnimator {
    frame: Duration,
    ai_delay: Duration,
    shown: Snapshot,
    queue: VecDeque<Transition>,
    falling: Option<FallingDisc>,
}

impl DropAnimator {
    pub fn new(frame: Duration, ai_delay: Duration, shown: Snapshot) -> Self {
        DropAnimator {
            frame,
            ai_delay,
            shown,
            queue: VecDeque::new(),
            falling: None,
        }
    }

    /// Drop everything in flight and show `shown` immediately.
    pub fn reset(&mut self, shown: Snapshot) {
        self.shown = shown;
        self.queue.clear();
        self.falling = None;
    }

    /// The last fully revealed state.
    pub fn shown(&self) -> &Snapshot {
        &self.shown
    }

    pub fn is_busy(&self) -> bool {
        self.falling.is_some() || !self.queue.is_empty()
    }

    pub fn enqueue(&mut self, transitions: impl IntoIterator<Item = Transition>, now: Instant) {
        self.queue.extend(transitions);
        if self.falling.is_none() {
            self.start_next(now);
        }
    }

    fn start_next(&mut self, now: Instant) {
        self.falling = self.queue.pop_front().map(|transition| {
            let delay = match transition.mv.player {
                Player::Ai => self.ai_delay,
                Player::Human => Duration::ZERO,
            };
            let visible_at = now + delay;
            FallingDisc {
                transition,
                row: ROWS - 1,
                visible_at,
                next_step: visible_at + self.frame,
            }
        });
    }

    /// Advance the animation. Returns the transition whose disc just landed.
    pub fn tick(&mut self, now: Instant) -> Option<Transition> {
        let disc = self.falling.as_mut()?;

        while now >= disc.next_step && disc.row > disc.transition.row {
            disc.row -= 1;
            disc.next_step += self.frame;
        }
        if disc.row > disc.transition.row || now < disc.next_step {
            return None;
        }

        let landed = disc.transition;
        self.shown = landed.snapshot;
        self.falling = None;
        self.start_next(now);
        Some(landed)
    }

    /// The disc currently in the air, if it has appeared yet.
    pub fn falling_disc(&self, now: Instant) -> Option<(Position, Player)> {
        self.falling
            .filter(|disc| now >= disc.visible_at)
            .map(|disc| {
                (
                    Position::new(disc.transition.mv.column, disc.row),
                    disc.transition.mv.player,
                )
            })
    }

    /// True while the computer's move is queued but not yet visible.
    pub fn is_thinking(&self, now: Instant) -> bool {
        self.falling
            .is_some_and(|disc| disc.transition.mv.player == Player::Ai && now < disc.visible_at)
    }
}
