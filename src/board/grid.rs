//! Board representation and neighbourhood queries

use crate::error::{MinesweeperError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest value a hint can take (all eight neighbours are mines)
pub const MAX_HINT: u8 = 8;

/// Largest board the encoder accepts: every cell needs a positive `i32` variable
pub const MAX_CELLS: usize = i32::MAX as usize;

/// A single board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// Not yet revealed; becomes a SAT variable
    Unknown,
    /// Revealed cell showing the number of adjacent mines
    Hint(u8),
    /// Solved: this cell holds a mine
    Mine,
    /// Solved: this cell is free of mines
    Safe,
}

impl Cell {
    pub fn is_unknown(self) -> bool {
        matches!(self, Cell::Unknown)
    }

    /// Text symbol used by the board file format
    pub fn symbol(self) -> String {
        match self {
            Cell::Unknown => "_".to_string(),
            Cell::Hint(n) => n.to_string(),
            Cell::Mine => "T".to_string(),
            Cell::Safe => "G".to_string(),
        }
    }
}

/// A 0-indexed (row, col) coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Board dimensions as (rows, cols)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub rows: usize,
    pub cols: usize,
}

impl Size {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells, which is also the number of SAT variables
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Position::new(row, col)))
    }
}

/// Moore neighbourhood of `pos` clipped to the board.
///
/// Offsets are scanned row-major from (-1, -1) to (1, 1). The centre offset is
/// skipped, so a cell is never reported as its own neighbour.
pub fn neighbors_of(pos: Position, size: Size) -> Vec<Position> {
    let mut neighbors = Vec::with_capacity(8);

    for dr in -1isize..=1 {
        for dc in -1isize..=1 {
            if dr == 0 && dc == 0 {
                continue;
            }

            let r = pos.row as isize + dr;
            let c = pos.col as isize + dc;

            if r >= 0 && r < size.rows as isize && c >= 0 && c < size.cols as isize {
                neighbors.push(Position::new(r as usize, c as usize));
            }
        }
    }

    neighbors
}

/// A Minesweeper board stored row-major
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Cell>,
}

impl Grid {
    /// Create a board with every cell unknown
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::Unknown; rows * cols],
        }
    }

    /// Create a board from rows of cells, rejecting empty or jagged input
    pub fn from_cells(cells: Vec<Vec<Cell>>) -> Result<Self> {
        if cells.is_empty() {
            return Err(MinesweeperError::MalformedGrid("grid has no rows".to_string()));
        }

        let rows = cells.len();
        let cols = cells[0].len();

        if cols == 0 {
            return Err(MinesweeperError::MalformedGrid("grid rows cannot be empty".to_string()));
        }

        for (i, row) in cells.iter().enumerate() {
            if row.len() != cols {
                return Err(MinesweeperError::MalformedGrid(format!(
                    "row {} has length {}, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
        }

        Ok(Self {
            rows,
            cols,
            cells: cells.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.rows, self.cols)
    }

    #[inline]
    pub fn index(&self, pos: Position) -> usize {
        pos.row * self.cols + pos.col
    }

    /// Cell at `pos`, or `None` when out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.size().contains(pos) {
            Some(self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<()> {
        if !self.size().contains(pos) {
            return Err(MinesweeperError::MalformedGrid(format!(
                "position {} out of bounds for {}x{} grid",
                pos, self.rows, self.cols
            )));
        }
        let idx = self.index(pos);
        self.cells[idx] = cell;
        Ok(())
    }

    /// True iff `pos` is in bounds and still unrevealed
    pub fn is_unknown(&self, pos: Position) -> bool {
        self.get(pos).is_some_and(Cell::is_unknown)
    }

    /// Neighbours of `pos` that are still unknown, in scan order
    pub fn unknown_neighbors(&self, pos: Position) -> Vec<Position> {
        neighbors_of(pos, self.size())
            .into_iter()
            .filter(|&p| self.is_unknown(p))
            .collect()
    }

    /// Reject anything the encoder cannot turn into a sound formula
    pub fn validate_puzzle(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MinesweeperError::MalformedGrid("grid has no cells".to_string()));
        }

        // one SAT variable per cell, numbered from 1
        if self.rows.checked_mul(self.cols).map_or(true, |n| n > MAX_CELLS) {
            return Err(MinesweeperError::MalformedGrid(format!(
                "{}x{} grid exceeds the limit of {} cells",
                self.rows, self.cols, MAX_CELLS
            )));
        }

        if self.cells.len() != self.rows * self.cols {
            return Err(MinesweeperError::MalformedGrid(format!(
                "{} cells stored for a {}x{} grid",
                self.cells.len(),
                self.rows,
                self.cols
            )));
        }

        for pos in self.size().positions() {
            match self.cells[self.index(pos)] {
                Cell::Unknown => {}
                Cell::Hint(value) if value > MAX_HINT => {
                    return Err(MinesweeperError::HintOutOfRange {
                        row: pos.row,
                        col: pos.col,
                        value,
                    });
                }
                Cell::Hint(_) => {}
                Cell::Mine | Cell::Safe => {
                    return Err(MinesweeperError::MalformedGrid(format!(
                        "cell {} is already solved; puzzles may only hold hints and unknowns",
                        pos
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn unknown_count(&self) -> usize {
        self.count(|c| c.is_unknown())
    }

    pub fn hint_count(&self) -> usize {
        self.count(|c| matches!(c, Cell::Hint(_)))
    }

    pub fn mine_count(&self) -> usize {
        self.count(|c| c == Cell::Mine)
    }

    pub fn safe_count(&self) -> usize {
        self.count(|c| c == Cell::Safe)
    }

    /// Positions of all mines, row-major
    pub fn mines(&self) -> Vec<Position> {
        self.size()
            .positions()
            .filter(|&p| self.cells[self.index(p)] == Cell::Mine)
            .collect()
    }

    fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&c| pred(c)).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", self.cells[self.index(Position::new(row, col))].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
