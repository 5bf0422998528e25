use super::player::Player;
use crate::error::GameError;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Human,
    Ai,
}

impl Cell {
    /// The player occupying this cell, if any
    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Human => Some(Player::Human),
            Cell::Ai => Some(Player::Ai),
        }
    }
}

/// A (column, row) coordinate. Row 0 is the bottom of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

impl Position {
    pub const fn new(column: usize, row: usize) -> Self {
        Position { column, row }
    }
}

/// Fixed 7x6 grid stored column-major in a flat array.
///
/// Within a column, occupied cells always form a contiguous run starting at
/// row 0. The only way to add a piece is [`Board::place`], which keeps that
/// invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [Cell; COLS * ROWS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [Cell::Empty; COLS * ROWS],
        }
    }

    fn index(column: usize, row: usize) -> usize {
        column * ROWS + row
    }

    fn check_column(column: usize) -> Result<(), GameError> {
        if column >= COLS {
            return Err(GameError::InvalidPosition { column, row: 0 });
        }
        Ok(())
    }

    /// Bounds-checked cell lookup
    pub fn cell(&self, column: usize, row: usize) -> Result<Cell, GameError> {
        if column >= COLS || row >= ROWS {
            return Err(GameError::InvalidPosition { column, row });
        }
        Ok(self.cells[Self::index(column, row)])
    }

    /// Cell lookup for coordinates already known to be on the board.
    /// Scanning code in this crate only ever calls this with in-range indices.
    pub(crate) fn at(&self, column: usize, row: usize) -> Cell {
        self.cells[Self::index(column, row)]
    }

    /// Signed-coordinate lookup used by direction scans. Off-board is `None`.
    pub(crate) fn at_signed(&self, column: isize, row: isize) -> Option<Cell> {
        if column < 0 || row < 0 || column >= COLS as isize || row >= ROWS as isize {
            return None;
        }
        Some(self.at(column as usize, row as usize))
    }

    /// Lowest empty row in the column, or `None` when the column is full
    pub fn drop_target(&self, column: usize) -> Result<Option<usize>, GameError> {
        Self::check_column(column)?;
        Ok((0..ROWS).find(|&row| self.at(column, row) == Cell::Empty))
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, column: usize) -> bool {
        !matches!(self.drop_target(column), Ok(Some(_)))
    }

    /// Drop a piece in a column, returns the row where it landed
    pub fn place(&mut self, column: usize, player: Player) -> Result<usize, GameError> {
        let row = self
            .drop_target(column)?
            .ok_or(GameError::ColumnFull { column })?;
        self.cells[Self::index(column, row)] = player.to_cell();
        Ok(row)
    }

    /// Number of occupied cells in a column
    pub fn column_height(&self, column: usize) -> Result<usize, GameError> {
        Ok(self.drop_target(column)?.unwrap_or(ROWS))
    }

    /// Occupied-cell count of every column
    pub fn heights(&self) -> [usize; COLS] {
        std::array::from_fn(|column| {
            (0..ROWS)
                .take_while(|&row| self.at(column, row) != Cell::Empty)
                .count()
        })
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&cell| cell != Cell::Empty)
    }

    /// Total number of pieces on the board
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell != Cell::Empty).count()
    }

    /// Build a board from a text diagram, top row first.
    /// `H` is a human piece, `A` an AI piece, `.` empty.
    #[cfg(test)]
    pub(crate) fn from_diagram(rows: &[&str]) -> Self {
        assert_eq!(rows.len(), ROWS, "diagram needs {ROWS} rows");
        let mut board = Board::new();
        for (i, line) in rows.iter().enumerate() {
            let row = ROWS - 1 - i;
            assert_eq!(line.len(), COLS, "diagram row {i} needs {COLS} cells");
            for (column, ch) in line.chars().enumerate() {
                board.cells[Self::index(column, row)] = match ch {
                    'H' => Cell::Human,
                    'A' => Cell::Ai,
                    '.' => Cell::Empty,
                    other => panic!("unexpected diagram character {other:?}"),
                };
            }
        }
        for column in 0..COLS {
            let height = board.heights()[column];
            assert!(
                (height..ROWS).all(|row| board.at(column, row) == Cell::Empty),
                "diagram column {column} has a floating piece"
            );
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
