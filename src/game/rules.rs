//! Win and draw detection over board snapshots. Nothing here mutates its
//! input; simulations work on their own copy of the board.

use super::board::{Board, Cell, Position, COLS, ROWS};
use super::player::Player;

/// Number of pieces in a row needed to win.
pub const CONNECT: usize = 4;

/// The four axes through a cell, as (column step, row step).
pub(crate) const AXES: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];

/// Exactly four coordinates forming a connection, in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct WinningLine(pub [Position; CONNECT]);

impl WinningLine {
    pub fn positions(&self) -> &[Position; CONNECT] {
        &self.0
    }

    pub fn contains(&self, column: usize, row: usize) -> bool {
        self.0.contains(&Position::new(column, row))
    }
}

/// Legal columns in ascending order.
pub type LegalMoves = Vec<usize>;

/// Count contiguous `cell` pieces walking away from (column, row), not
/// counting the origin itself.
fn run_length(board: &Board, column: usize, row: usize, dc: isize, dr: isize, cell: Cell) -> usize {
    let mut count = 0;
    let mut c = column as isize + dc;
    let mut r = row as isize + dr;
    while board.at_signed(c, r) == Some(cell) {
        count += 1;
        c += dc;
        r += dr;
    }
    count
}

/// Check whether the piece just placed at (column, row) completes a
/// connection of four or more for `player`.
///
/// Each axis is scanned outward from the placed cell in both signed
/// directions. Off-board coordinates never connect.
pub fn has_connection(board: &Board, column: usize, row: usize, player: Player) -> bool {
    let cell = player.to_cell();
    if board.cell(column, row) != Ok(cell) {
        return false;
    }

    AXES.iter().any(|&(dc, dr)| {
        let total = 1
            + run_length(board, column, row, dc, dr, cell)
            + run_length(board, column, row, -dc, -dr, cell);
        total >= CONNECT
    })
}

fn line_from(column: usize, row: usize, dc: isize, dr: isize) -> WinningLine {
    WinningLine(std::array::from_fn(|i| {
        Position::new(
            (column as isize + dc * i as isize) as usize,
            (row as isize + dr * i as isize) as usize,
        )
    }))
}

fn line_matches(board: &Board, line: &WinningLine, cell: Cell) -> bool {
    line.0.iter().all(|p| board.at(p.column, p.row) == cell)
}

/// Scan the whole board for the first connection of four for `player`.
///
/// The order is fixed so that a move completing several lines at once always
/// reports the same one: horizontals (top row down, left to right), then
/// verticals (left to right, bottom up), then rising diagonals by increasing
/// start column, then falling diagonals by decreasing start column.
pub fn find_winning_line(board: &Board, player: Player) -> Option<WinningLine> {
    let cell = player.to_cell();

    for row in (0..ROWS).rev() {
        for column in 0..=COLS - CONNECT {
            let line = line_from(column, row, 1, 0);
            if line_matches(board, &line, cell) {
                return Some(line);
            }
        }
    }

    for column in 0..COLS {
        for row in 0..=ROWS - CONNECT {
            let line = line_from(column, row, 0, 1);
            if line_matches(board, &line, cell) {
                return Some(line);
            }
        }
    }

    for column in 0..=COLS - CONNECT {
        for row in 0..=ROWS - CONNECT {
            let line = line_from(column, row, 1, 1);
            if line_matches(board, &line, cell) {
                return Some(line);
            }
        }
    }

    for column in (CONNECT - 1..COLS).rev() {
        for row in 0..=ROWS - CONNECT {
            let line = line_from(column, row, -1, 1);
            if line_matches(board, &line, cell) {
                return Some(line);
            }
        }
    }

    None
}

/// A full board is a draw once no connection was found on the final move.
pub fn is_draw(board: &Board) -> bool {
    board.is_full()
}

/// Columns that can still accept a piece
pub fn legal_moves(board: &Board) -> LegalMoves {
    (0..COLS)
        .filter(|&column| !board.is_column_full(column))
        .collect()
}
