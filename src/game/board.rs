//! Board storage and diffing.
//!
//! The board is a fixed 15x15 grid of optional tiles. Once a cell is
//! occupied by a committed turn it is immutable forever; `diff` enforces
//! that invariant by reporting any altered or removed committed tile as
//! tampering rather than folding it into the new-tile set.

use super::error::TurnError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of the board.
pub const BOARD_SIZE: usize = 15;

/// The center square, which the first word must cover.
pub const CENTER: Coord = Coord { row: 7, col: 7 };

/// A board coordinate, 0-based, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// Row index (0..15).
    pub row: usize,
    /// Column index (0..15).
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate. Callers are expected to stay in bounds;
    /// wire input goes through [`Board::from_rows`] which checks shape.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbours that lie on the board.
    pub fn neighbours(self) -> impl Iterator<Item = Coord> {
        let (row, col) = (self.row as isize, self.col as isize);
        [(row - 1, col), (row + 1, col), (row, col - 1), (row, col + 1)]
            .into_iter()
            .filter(|&(r, c)| {
                r >= 0 && c >= 0 && (r as usize) < BOARD_SIZE && (c as usize) < BOARD_SIZE
            })
            .map(|(r, c)| Coord::new(r as usize, c as usize))
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A tile occupying a cell: an uppercase letter plus a blank flag.
///
/// Blank tiles count as their assigned letter for word legality but
/// score zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// The letter this tile shows (A-Z).
    pub letter: char,
    /// Whether this is a blank tile assigned the letter at placement.
    pub is_blank: bool,
}

impl Tile {
    /// Creates a tile for a regular letter.
    pub fn letter(letter: char) -> Self {
        Self {
            letter,
            is_blank: false,
        }
    }

    /// Creates a blank tile assigned the given letter.
    pub fn blank(letter: char) -> Self {
        Self {
            letter,
            is_blank: true,
        }
    }
}

/// A tile at a coordinate, as reconstructed from a board diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTile {
    /// Where the tile sits.
    pub coord: Coord,
    /// The tile itself.
    pub tile: Tile,
}

/// The fixed 15x15 grid. Cells are `None` when empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Option<Tile>>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self {
            cells: vec![None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// Builds a board from wire-shaped rows, rejecting anything that is
    /// not exactly 15x15 of valid tiles.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::MalformedBoard`] on wrong dimensions or a
    /// non-uppercase letter glyph.
    #[instrument(skip(rows))]
    pub fn from_rows(rows: Vec<Vec<Option<Tile>>>) -> Result<Self, TurnError> {
        if rows.len() != BOARD_SIZE {
            return Err(TurnError::MalformedBoard {
                detail: format!("expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }
        let mut cells = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != BOARD_SIZE {
                return Err(TurnError::MalformedBoard {
                    detail: format!(
                        "row {} has {} columns, expected {}",
                        row_idx,
                        row.len(),
                        BOARD_SIZE
                    ),
                });
            }
            for (col_idx, cell) in row.into_iter().enumerate() {
                if let Some(tile) = cell {
                    if !tile.letter.is_ascii_uppercase() {
                        return Err(TurnError::MalformedBoard {
                            detail: format!(
                                "invalid letter {:?} at ({}, {})",
                                tile.letter, row_idx, col_idx
                            ),
                        });
                    }
                }
                cells.push(cell);
            }
        }
        Ok(Self { cells })
    }

    /// Returns the board as wire-shaped rows.
    pub fn to_rows(&self) -> Vec<Vec<Option<Tile>>> {
        self.cells
            .chunks(BOARD_SIZE)
            .map(|chunk| chunk.to_vec())
            .collect()
    }

    /// Gets the tile at a coordinate, if any.
    pub fn get(&self, coord: Coord) -> Option<Tile> {
        self.cells.get(coord.row * BOARD_SIZE + coord.col).copied().flatten()
    }

    /// Checks whether a cell is occupied.
    pub fn is_occupied(&self, coord: Coord) -> bool {
        self.get(coord).is_some()
    }

    /// Sets the tile at a coordinate. Used when building a submission
    /// snapshot; the authoritative board is never mutated this way
    /// directly, only through a committed merge.
    pub fn set(&mut self, coord: Coord, tile: Tile) {
        self.cells[coord.row * BOARD_SIZE + coord.col] = Some(tile);
    }

    /// Number of occupied cells.
    pub fn tile_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Returns a copy of this board with the given tiles merged in.
    ///
    /// This is the only way new tiles reach an authoritative board: the
    /// raw submitted snapshot is never stored.
    pub fn merged(&self, tiles: &[PlacedTile]) -> Board {
        let mut next = self.clone();
        for placed in tiles {
            next.set(placed.coord, placed.tile);
        }
        next
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Compares the authoritative board against a submitted snapshot.
///
/// Pure function; neither board is mutated. Returns the tiles present in
/// `submitted` but absent from `previous`, in row-major order.
///
/// # Errors
///
/// Returns [`TurnError::TamperedHistory`] naming every cell where a
/// committed tile was removed or altered. Committed tiles are immutable,
/// so such a cell can never be part of a legitimate diff.
#[instrument(skip(previous, submitted))]
pub fn diff(previous: &Board, submitted: &Board) -> Result<Vec<PlacedTile>, TurnError> {
    let mut added = Vec::new();
    let mut tampered = Vec::new();

    for row in 0..BOARD_SIZE {
        for col in 0..BOARD_SIZE {
            let coord = Coord::new(row, col);
            match (previous.get(coord), submitted.get(coord)) {
                (None, Some(tile)) => added.push(PlacedTile { coord, tile }),
                (Some(before), after) if after != Some(before) => tampered.push(coord),
                _ => {}
            }
        }
    }

    if !tampered.is_empty() {
        return Err(TurnError::TamperedHistory { cells: tampered });
    }
    Ok(added)
}
