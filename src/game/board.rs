//! 8x8 Reversi board value type.

use super::types::Disc;
use serde::{Deserialize, Serialize};

/// Side length of the board.
pub const BOARD_SIZE: usize = 8;

/// An 8x8 Reversi board.
///
/// Cells are stored row-major: `cells[y][x]`, 0-indexed, x = column,
/// y = row. The board is a value type; rules application always produces
/// a new board and never mutates its input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Disc; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// Creates a board with every cell empty.
    pub fn empty() -> Self {
        Self {
            cells: [[Disc::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// Creates the fixed Othello starting position: dark at (3,3) and
    /// (4,4), light at (3,4) and (4,3), all other cells empty.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        board.set(3, 3, Disc::Dark);
        board.set(4, 4, Disc::Dark);
        board.set(3, 4, Disc::Light);
        board.set(4, 3, Disc::Light);
        board
    }

    /// Creates a board from rows given as `rows[y][x]`.
    pub fn from_rows(cells: [[Disc; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    /// Returns the disc at (x, y), or `None` if the coordinate is off the
    /// board.
    pub fn get(&self, x: usize, y: usize) -> Option<Disc> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    /// Sets the disc at (x, y). Out-of-range coordinates are a caller bug;
    /// rules and storage loading only write validated coordinates.
    pub(crate) fn set(&mut self, x: usize, y: usize, disc: Disc) {
        self.cells[y][x] = disc;
    }

    /// Counts cells holding the given disc value.
    pub fn count(&self, disc: Disc) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|&&cell| cell == disc)
            .count()
    }

    /// Returns the rows of the board, `rows()[y][x]`.
    pub fn rows(&self) -> &[[Disc; BOARD_SIZE]; BOARD_SIZE] {
        &self.cells
    }

    /// Iterates over all cells as `(x, y, disc)`.
    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, Disc)> + '_ {
        self.cells.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &disc)| (x, y, disc))
        })
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}
