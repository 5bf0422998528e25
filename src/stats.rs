//! Win/loss statistics collaborator. The controller only reports finished
//! games; how and where the counters are kept is up to the store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatsError;
use crate::game::{GameOutcome, Player};

/// Default file name for persisted stats.
pub const DEFAULT_STATS_FILE: &str = "connect_four_stats.json";

/// Counters over completed games. Draws only count towards `games_played`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub player_wins: u64,
    pub ai_wins: u64,
    pub games_played: u64,
}

impl GameStats {
    /// Fold one outcome into the counters. Returns `false` for an
    /// unfinished game, which is not counted.
    pub fn apply(&mut self, outcome: GameOutcome) -> bool {
        match outcome {
            GameOutcome::InProgress => return false,
            GameOutcome::Win(Player::Human) => self.player_wins += 1,
            GameOutcome::Win(Player::Ai) => self.ai_wins += 1,
            GameOutcome::Draw => {}
        }
        self.games_played += 1;
        true
    }

    pub fn draws(&self) -> u64 {
        self.games_played
            .saturating_sub(self.player_wins)
            .saturating_sub(self.ai_wins)
    }
}

/// Storage for [`GameStats`].
pub trait StatsStore {
    /// Record one completed game.
    fn record_outcome(&mut self, outcome: GameOutcome) -> Result<(), StatsError>;

    /// Current counters.
    fn stats(&self) -> GameStats;

    /// Zero every counter.
    fn reset_stats(&mut self) -> Result<(), StatsError>;
}

/// Stats kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryStats {
    stats: GameStats,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsStore for InMemoryStats {
    fn record_outcome(&mut self, outcome: GameOutcome) -> Result<(), StatsError> {
        if !self.stats.apply(outcome) {
            warn!("ignoring stats update for a game still in progress");
        }
        Ok(())
    }

    fn stats(&self) -> GameStats {
        self.stats
    }

    fn reset_stats(&mut self) -> Result<(), StatsError> {
        self.stats = GameStats::default();
        Ok(())
    }
}

/// Stats persisted as a small JSON document, rewritten after every update.
#[derive(Debug)]
pub struct JsonFileStats {
    path: PathBuf,
    stats: GameStats,
}

impl JsonFileStats {
    /// Open the stats file. A missing file starts from zero; a corrupt one is
    /// reported and also starts from zero.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StatsError> {
        let path = path.into();
        let stats = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "unreadable stats file, starting fresh");
                GameStats::default()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => GameStats::default(),
            Err(source) => return Err(StatsError::Read { path, source }),
        };
        debug!(path = %path.display(), ?stats, "loaded stats");
        Ok(JsonFileStats { path, stats })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `stats` to disk. The in-memory counters are left to the caller
    /// so they only move once the file has.
    fn save(&self, stats: &GameStats) -> Result<(), StatsError> {
        let json = serde_json::to_string_pretty(stats)?;
        let write_err = |source| StatsError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // Write then rename so a crash never leaves a truncated file
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)?;
        Ok(())
    }
}

impl StatsStore for JsonFileStats {
    fn record_outcome(&mut self, outcome: GameOutcome) -> Result<(), StatsError> {
        let mut next = self.stats;
        if !next.apply(outcome) {
            warn!("ignoring stats update for a game still in progress");
            return Ok(());
        }
        self.save(&next)?;
        self.stats = next;
        Ok(())
    }

    fn stats(&self) -> GameStats {
        self.stats
    }

    fn reset_stats(&mut self) -> Result<(), StatsError> {
        let next = GameStats::default();
        self.save(&next)?;
        self.stats = next;
        Ok(())
    }
}
