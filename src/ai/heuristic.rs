//! Single-ply heuristic opponent.
//!
//! Rules are tried in priority order and the first one that yields a column
//! wins: take an immediate win, block the opponent's immediate win, play the
//! best-scoring tactical setup if it clears a threshold, keep column heights
//! balanced, fall back to center preference, and finally pick at random.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::error::ConfigError;
use crate::game::rules::AXES;
use crate::game::{has_connection, legal_moves, Board, Cell, Player, COLS, ROWS};

use super::agent::Agent;

/// Column ordering: center-first.
pub const MOVE_ORDER: [usize; COLS] = [3, 2, 4, 1, 5, 0, 6];

const CENTER_COLUMN: usize = COLS / 2;

/// Shortest run along one axis that counts as a threat.
const THREAT_RUN: usize = 3;

/// Tunable constants of the heuristic. The defaults are the empirically chosen
/// values the opponent has always played with.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Minimum score for a scored setup to be played outright.
    pub setup_threshold: f64,
    /// Multiplier applied to each directional threat's `run + open_ends`.
    pub threat_weight: f64,
    /// Fraction of the opponent's threat score at the same cell credited as blocking value.
    pub opponent_threat_factor: f64,
    /// Subtracted when the opponent could win by playing directly on top.
    pub exposure_penalty: f64,
    /// Subtracted per column of distance from the center.
    pub center_weight: f64,
    /// Columns taller than the average height by more than this are skipped by the balance rule.
    pub balance_slack: f64,
    pub preference_order: Vec<usize>,
    /// Seed for the random tie-break. `None` seeds from the OS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            setup_threshold: 5.0,
            threat_weight: 2.0,
            opponent_threat_factor: 0.5,
            exposure_penalty: 3.0,
            center_weight: 0.5,
            balance_slack: 1.0,
            preference_order: MOVE_ORDER.to_vec(),
            seed: None,
        }
    }
}

impl HeuristicConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("heuristic.setup_threshold", self.setup_threshold),
            ("heuristic.threat_weight", self.threat_weight),
            ("heuristic.opponent_threat_factor", self.opponent_threat_factor),
            ("heuristic.exposure_penalty", self.exposure_penalty),
            ("heuristic.center_weight", self.center_weight),
            ("heuristic.balance_slack", self.balance_slack),
        ];
        for (name, value) in weights {
            if !value.is_finite() {
                return Err(ConfigError::Validation(format!("{name} must be finite")));
            }
        }

        if self.preference_order.is_empty() {
            return Err(ConfigError::Validation(
                "heuristic.preference_order must not be empty".into(),
            ));
        }
        let mut seen = [false; COLS];
        for &column in &self.preference_order {
            if column >= COLS {
                return Err(ConfigError::Validation(format!(
                    "heuristic.preference_order entry {column} is not a column (0..{COLS})"
                )));
            }
            if std::mem::replace(&mut seen[column], true) {
                return Err(ConfigError::Validation(format!(
                    "heuristic.preference_order lists column {column} twice"
                )));
            }
        }
        Ok(())
    }
}

/// Which selection rule produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ImmediateWin,
    Block,
    ScoredSetup,
    Balanced,
    CenterPreference,
    Random,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub column: usize,
    pub rule: Rule,
}

/// Score of the threat `owner` would have along one axis through
/// (column, row), treating that cell as `owner`'s piece.
///
/// Walks both signed directions over `owner`'s pieces; the first empty cell
/// met in a direction counts as one open end. A run of at least three with an
/// open end is worth `run + open_ends`, anything else is worth nothing.
fn directional_threat(
    board: &Board,
    column: usize,
    row: usize,
    owner: Player,
    dc: isize,
    dr: isize,
) -> usize {
    let cell = owner.to_cell();
    let mut run = 1;
    let mut open_ends = 0;

    for (sc, sr) in [(dc, dr), (-dc, -dr)] {
        let mut c = column as isize + sc;
        let mut r = row as isize + sr;
        while let Some(found) = board.at_signed(c, r) {
            if found == cell {
                run += 1;
            } else {
                if found == Cell::Empty {
                    open_ends += 1;
                }
                break;
            }
            c += sc;
            r += sr;
        }
    }

    if run >= THREAT_RUN && open_ends > 0 {
        run + open_ends
    } else {
        0
    }
}

/// Sum of directional threats over the four axes through (column, row).
pub fn threat_count(board: &Board, column: usize, row: usize, owner: Player) -> usize {
    AXES.iter()
        .map(|&(dc, dr)| directional_threat(board, column, row, owner, dc, dr))
        .sum()
}

/// First legal column (ascending) where `player` would connect four.
fn winning_column(board: &Board, legal: &[usize], player: Player) -> Option<usize> {
    legal.iter().copied().find(|&column| {
        let mut sim = *board;
        match sim.place(column, player) {
            Ok(row) => has_connection(&sim, column, row, player),
            Err(_) => false,
        }
    })
}

/// Heuristic agent: win, block, tactical setup, balance, center, random.
pub struct HeuristicAgent {
    config: HeuristicConfig,
    rng: StdRng,
}

impl HeuristicAgent {
    pub fn new(config: HeuristicConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        HeuristicAgent { config, rng }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    /// Score a candidate move for `me`. Returns `None` if the column cannot
    /// take a piece.
    pub fn score_move(&self, board: &Board, column: usize, me: Player) -> Option<f64> {
        let opponent = me.other();
        let mut sim = *board;
        let row = sim.place(column, me).ok()?;

        let own = threat_count(&sim, column, row, me) as f64;
        let theirs = threat_count(&sim, column, row, opponent) as f64;
        let mut score = self.config.threat_weight * own
            + self.config.threat_weight * theirs * self.config.opponent_threat_factor;

        // Would this hand the opponent a win on the cell right above?
        if row + 1 < ROWS {
            let mut exposed = sim;
            if let Ok(above) = exposed.place(column, opponent) {
                if has_connection(&exposed, column, above, opponent) {
                    score -= self.config.exposure_penalty;
                }
            }
        }

        score -= self.config.center_weight * column.abs_diff(CENTER_COLUMN) as f64;
        Some(score)
    }

    fn by_preference(&self, candidates: &[usize]) -> Option<usize> {
        self.config
            .preference_order
            .iter()
            .copied()
            .find(|column| candidates.contains(column))
    }

    /// Pick a column for `me`, reporting which rule chose it.
    pub fn decide(&mut self, board: &Board, me: Player) -> Option<Decision> {
        let legal = legal_moves(board);
        if legal.is_empty() {
            return None;
        }

        let decision = self.decide_among(board, &legal, me);
        debug!(
            column = decision.column,
            rule = ?decision.rule,
            player = me.name(),
            "heuristic decision"
        );
        Some(decision)
    }

    fn decide_among(&mut self, board: &Board, legal: &[usize], me: Player) -> Decision {
        if let Some(column) = winning_column(board, legal, me) {
            return Decision { column, rule: Rule::ImmediateWin };
        }
        if let Some(column) = winning_column(board, legal, me.other()) {
            return Decision { column, rule: Rule::Block };
        }

        // Ties keep the lowest column
        let mut best: Option<(usize, f64)> = None;
        for &column in legal {
            if let Some(score) = self.score_move(board, column, me) {
                if best.map_or(true, |(_, top)| score > top) {
                    best = Some((column, score));
                }
            }
        }
        if let Some((column, score)) = best {
            if score >= self.config.setup_threshold {
                return Decision { column, rule: Rule::ScoredSetup };
            }
        }

        let heights = board.heights();
        let average = heights.iter().sum::<usize>() as f64 / COLS as f64;
        let balanced: Vec<usize> = legal
            .iter()
            .copied()
            .filter(|&column| heights[column] as f64 <= average + self.config.balance_slack)
            .collect();
        if let Some(column) = self.by_preference(&balanced) {
            return Decision { column, rule: Rule::Balanced };
        }

        if let Some(column) = self.by_preference(legal) {
            return Decision { column, rule: Rule::CenterPreference };
        }

        let column = legal[self.rng.random_range(0..legal.len())];
        Decision { column, rule: Rule::Random }
    }
}

impl Default for HeuristicAgent {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl Agent for HeuristicAgent {
    fn select_action(&mut self, board: &Board, me: Player) -> Option<usize> {
        self.decide(board, me).map(|decision| decision.column)
    }

    fn name(&self) -> &str {
        "Heuristic"
    }
}
