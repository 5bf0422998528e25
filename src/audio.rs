//! Sound cues. Playback is fire-and-forget: nothing the sink does can affect
//! the game.

use std::io::Write;

use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    PieceDropped,
    GameWon,
}

pub trait AudioSink {
    fn play(&mut self, cue: SoundCue);

    /// Turn output on or off. Sinks that never make a sound can ignore this.
    fn set_enabled(&mut self, _enabled: bool) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Discards every cue.
#[derive(Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, cue: SoundCue) {
        debug!(?cue, "sound cue (silent)");
    }
}

/// Rings the terminal bell. Wins always ring; drops only when `on_drop` is set.
pub struct TerminalBell<W: Write> {
    out: W,
    enabled: bool,
    on_drop: bool,
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout(enabled: bool, on_drop: bool) -> Self {
        Self::new(std::io::stdout(), enabled, on_drop)
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W, enabled: bool, on_drop: bool) -> Self {
        TerminalBell {
            out,
            enabled,
            on_drop,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioSink for TerminalBell<W> {
    fn play(&mut self, cue: SoundCue) {
        if !self.enabled {
            return;
        }
        if cue == SoundCue::PieceDropped && !self.on_drop {
            return;
        }
        let result = self.out.write_all(b"\x07").and_then(|()| self.out.flush());
        if let Err(err) = result {
            warn!(?cue, %err, "failed to ring terminal bell");
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        debug!(enabled, "sound toggled");
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}
