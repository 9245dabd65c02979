//! Placement reconstruction from a board diff.
//!
//! The client-declared word, coordinates, and secondary words are never
//! consulted here. Everything is rederived from the diff between the
//! authoritative board and the submitted snapshot, so a tile smuggled
//! into the snapshot anywhere off the placement line is caught as
//! unauthorized rather than silently persisted.

use super::board::{self, Board, Coord, PlacedTile, BOARD_SIZE};
use super::error::TurnError;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Orientation of the primary word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right along a row.
    Across,
    /// Top to bottom along a column.
    Down,
}

/// A word as it stands on the board after the merge: every cell in
/// order, with the tile occupying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormedWord {
    /// The cells of the word, in reading order.
    pub cells: Vec<PlacedTile>,
}

impl FormedWord {
    /// The word as text, blanks resolved to their assigned letters.
    pub fn text(&self) -> String {
        self.cells.iter().map(|p| p.tile.letter).collect()
    }

    /// Whether the word covers the given coordinate.
    pub fn covers(&self, coord: Coord) -> bool {
        self.cells.iter().any(|p| p.coord == coord)
    }
}

/// The server-reconstructed truth about a turn: which tiles were
/// actually added, and every word they form.
#[derive(Debug, Clone)]
pub struct Placement {
    /// Tiles added by this turn, in row-major order.
    pub new_tiles: Vec<PlacedTile>,
    /// Orientation of the primary word.
    pub direction: Direction,
    /// The full contiguous run along the placement line, including
    /// pre-existing tiles.
    pub primary: FormedWord,
    /// Words formed perpendicular to the line through new tiles.
    pub secondaries: Vec<FormedWord>,
}

impl Placement {
    /// Every word formed by this placement, primary first.
    pub fn words(&self) -> impl Iterator<Item = &FormedWord> {
        std::iter::once(&self.primary).chain(self.secondaries.iter())
    }
}

/// The single row or column a placement occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Row(usize),
    Col(usize),
}

impl Line {
    /// Position of a coordinate along the line.
    fn along(self, coord: Coord) -> usize {
        match self {
            Line::Row(_) => coord.col,
            Line::Col(_) => coord.row,
        }
    }

    /// Coordinate at a position along the line.
    fn coord_at(self, pos: usize) -> Coord {
        match self {
            Line::Row(row) => Coord::new(row, pos),
            Line::Col(col) => Coord::new(pos, col),
        }
    }

    /// Whether a coordinate lies on the line.
    fn contains(self, coord: Coord) -> bool {
        match self {
            Line::Row(row) => coord.row == row,
            Line::Col(col) => coord.col == col,
        }
    }

    /// The perpendicular line through a coordinate.
    fn perpendicular_at(self, coord: Coord) -> Line {
        match self {
            Line::Row(_) => Line::Col(coord.col),
            Line::Col(_) => Line::Row(coord.row),
        }
    }
}

/// Reconstructs the actual placement from the diff between the
/// authoritative board and a submitted snapshot.
///
/// # Errors
///
/// - [`TurnError::TamperedHistory`] when a committed tile was altered.
/// - [`TurnError::EmptyTurn`] when the snapshot adds nothing.
/// - [`TurnError::UnauthorizedTile`] when tiles sit off the dominant
///   placement line (the injection vector).
/// - [`TurnError::InvalidGeometry`] when no single line dominates.
/// - [`TurnError::DiscontiguousWord`] when the run has a gap.
#[instrument(skip(authoritative, submitted))]
pub fn extract(authoritative: &Board, submitted: &Board) -> Result<Placement, TurnError> {
    let added = board::diff(authoritative, submitted)?;
    if added.is_empty() {
        return Err(TurnError::EmptyTurn);
    }

    let merged = authoritative.merged(&added);
    let line = resolve_line(&added, &merged)?;

    let strays: Vec<Coord> = added
        .iter()
        .map(|p| p.coord)
        .filter(|&c| !line.contains(c))
        .collect();
    if !strays.is_empty() {
        return Err(TurnError::UnauthorizedTile { cells: strays });
    }

    let primary = walk_primary(&merged, line, &added)?;

    let mut secondaries = Vec::new();
    for placed in &added {
        let cross = run_through(&merged, line.perpendicular_at(placed.coord), placed.coord);
        if cross.cells.len() > 1 {
            secondaries.push(cross);
        }
    }

    let direction = match line {
        Line::Row(_) => Direction::Across,
        Line::Col(_) => Direction::Down,
    };

    debug!(
        new_tiles = added.len(),
        primary = %primary.text(),
        secondaries = secondaries.len(),
        "Reconstructed placement"
    );

    Ok(Placement {
        new_tiles: added,
        direction,
        primary,
        secondaries,
    })
}

/// Finds the dominant line: the single row or column holding the most
/// new tiles, requiring at least two and no tie. Tiles off that line are
/// the caller's unauthorized set.
fn resolve_line(added: &[PlacedTile], merged: &Board) -> Result<Line, TurnError> {
    let [first, rest @ ..] = added else {
        return Err(TurnError::EmptyTurn);
    };

    if rest.is_empty() {
        // A single tile sits on both axes; prefer the axis where it
        // extends an existing run so the primary word is the longer one.
        let coord = first.coord;
        let across = run_through(merged, Line::Row(coord.row), coord);
        if across.cells.len() > 1 {
            return Ok(Line::Row(coord.row));
        }
        let down = run_through(merged, Line::Col(coord.col), coord);
        if down.cells.len() > 1 {
            return Ok(Line::Col(coord.col));
        }
        return Ok(Line::Row(coord.row));
    }

    if rest.iter().all(|p| p.coord.row == first.coord.row) {
        return Ok(Line::Row(first.coord.row));
    }
    if rest.iter().all(|p| p.coord.col == first.coord.col) {
        return Ok(Line::Col(first.coord.col));
    }

    // Mixed axes: count tiles per row and per column and look for a
    // single dominant line. Anything short of that is not attributable
    // to one placement.
    let mut row_counts = [0usize; BOARD_SIZE];
    let mut col_counts = [0usize; BOARD_SIZE];
    for placed in added {
        row_counts[placed.coord.row] += 1;
        col_counts[placed.coord.col] += 1;
    }

    let mut best: Option<Line> = None;
    let mut best_count = 0;
    let mut tied = false;
    for (idx, &count) in row_counts.iter().enumerate() {
        if count > best_count {
            best = Some(Line::Row(idx));
            best_count = count;
            tied = false;
        } else if count == best_count && count > 0 {
            tied = true;
        }
    }
    for (idx, &count) in col_counts.iter().enumerate() {
        if count > best_count {
            best = Some(Line::Col(idx));
            best_count = count;
            tied = false;
        } else if count == best_count && count > 0 {
            tied = true;
        }
    }

    match best {
        Some(line) if best_count >= 2 && !tied => Ok(line),
        _ => Err(TurnError::InvalidGeometry),
    }
}

/// Walks the full contiguous run along the line through the new tiles,
/// extending through pre-existing tiles on both sides.
fn walk_primary(
    merged: &Board,
    line: Line,
    added: &[PlacedTile],
) -> Result<FormedWord, TurnError> {
    let positions = added.iter().map(|p| line.along(p.coord));
    let (Some(min), Some(max)) = (positions.clone().min(), positions.max()) else {
        return Err(TurnError::EmptyTurn);
    };

    let mut start = min;
    while start > 0 && merged.is_occupied(line.coord_at(start - 1)) {
        start -= 1;
    }

    let mut cells = Vec::new();
    let mut pos = start;
    while pos < BOARD_SIZE {
        let coord = line.coord_at(pos);
        match merged.get(coord) {
            Some(tile) => cells.push(PlacedTile { coord, tile }),
            None => break,
        }
        pos += 1;
    }

    // `pos` now sits on the first empty cell after the run. If the run
    // ended before the furthest new tile, that empty cell is a gap
    // inside the claimed word.
    if pos <= max {
        return Err(TurnError::DiscontiguousWord {
            gap: line.coord_at(pos),
        });
    }

    Ok(FormedWord { cells })
}

/// The contiguous occupied run along `line` through `coord`.
fn run_through(merged: &Board, line: Line, coord: Coord) -> FormedWord {
    let mut start = line.along(coord);
    while start > 0 && merged.is_occupied(line.coord_at(start - 1)) {
        start -= 1;
    }

    let mut cells = Vec::new();
    let mut pos = start;
    while pos < BOARD_SIZE {
        let cell = line.coord_at(pos);
        match merged.get(cell) {
            Some(tile) => cells.push(PlacedTile { coord: cell, tile }),
            None => break,
        }
        pos += 1;
    }
    FormedWord { cells }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::Tile;

    fn board_with(tiles: &[(usize, usize, char)]) -> Board {
        let mut board = Board::new();
        for &(row, col, letter) in tiles {
            board.set(Coord::new(row, col), Tile::letter(letter));
        }
        board
    }

    #[test]
    fn test_extracts_simple_across_word() {
        let authoritative = Board::new();
        let submitted = board_with(&[
            (7, 7, 'H'),
            (7, 8, 'E'),
            (7, 9, 'L'),
            (7, 10, 'L'),
            (7, 11, 'O'),
        ]);

        let placement = extract(&authoritative, &submitted).unwrap();
        assert_eq!(placement.direction, Direction::Across);
        assert_eq!(placement.primary.text(), "HELLO");
        assert_eq!(placement.new_tiles.len(), 5);
        assert!(placement.secondaries.is_empty());
    }

    #[test]
    fn test_primary_includes_existing_tiles() {
        // Board holds HELLO; the player extends the O downward.
        let authoritative = board_with(&[
            (7, 7, 'H'),
            (7, 8, 'E'),
            (7, 9, 'L'),
            (7, 10, 'L'),
            (7, 11, 'O'),
        ]);
        let mut submitted = authoritative.clone();
        submitted.set(Coord::new(8, 11), Tile::letter('N'));
        submitted.set(Coord::new(9, 11), Tile::letter('E'));

        let placement = extract(&authoritative, &submitted).unwrap();
        assert_eq!(placement.direction, Direction::Down);
        assert_eq!(placement.primary.text(), "ONE");
        assert_eq!(placement.new_tiles.len(), 2);
    }

    #[test]
    fn test_discovers_secondary_words() {
        // AT sits across row 7; playing TO across row 8 beneath it
        // forms AT (col 7) and TO (col 8) perpendicular to the primary.
        let authoritative = board_with(&[(7, 7, 'A'), (7, 8, 'T')]);
        let mut submitted = authoritative.clone();
        submitted.set(Coord::new(8, 7), Tile::letter('T'));
        submitted.set(Coord::new(8, 8), Tile::letter('O'));

        let placement = extract(&authoritative, &submitted).unwrap();
        assert_eq!(placement.primary.text(), "TO");
        let secondaries: Vec<String> =
            placement.secondaries.iter().map(|w| w.text()).collect();
        assert_eq!(secondaries, vec!["AT".to_string(), "TO".to_string()]);
    }

    #[test]
    fn test_stray_tile_is_unauthorized() {
        let authoritative = board_with(&[
            (7, 7, 'H'),
            (7, 8, 'E'),
            (7, 9, 'L'),
            (7, 10, 'L'),
            (7, 11, 'O'),
        ]);
        let mut submitted = authoritative.clone();
        // Legitimate-looking column play...
        submitted.set(Coord::new(8, 11), Tile::letter('W'));
        submitted.set(Coord::new(9, 11), Tile::letter('O'));
        submitted.set(Coord::new(10, 11), Tile::letter('R'));
        submitted.set(Coord::new(11, 11), Tile::letter('L'));
        submitted.set(Coord::new(12, 11), Tile::letter('D'));
        // ...with a smuggled tile far away.
        submitted.set(Coord::new(0, 0), Tile::letter('X'));

        let err = extract(&authoritative, &submitted).unwrap_err();
        assert_eq!(
            err,
            TurnError::UnauthorizedTile {
                cells: vec![Coord::new(0, 0)]
            }
        );
    }

    #[test]
    fn test_diagonal_pair_is_invalid_geometry() {
        let authoritative = Board::new();
        let mut submitted = Board::new();
        submitted.set(Coord::new(7, 7), Tile::letter('A'));
        submitted.set(Coord::new(8, 8), Tile::letter('B'));

        let err = extract(&authoritative, &submitted).unwrap_err();
        assert_eq!(err, TurnError::InvalidGeometry);
    }

    #[test]
    fn test_l_shape_off_line_tile_is_unauthorized() {
        let authoritative = Board::new();
        let mut submitted = Board::new();
        submitted.set(Coord::new(7, 7), Tile::letter('A'));
        submitted.set(Coord::new(7, 8), Tile::letter('B'));
        submitted.set(Coord::new(8, 7), Tile::letter('C'));
        submitted.set(Coord::new(9, 7), Tile::letter('D'));
        // Row 7 holds two tiles, col 7 holds three: col 7 dominates, but
        // (7, 8) is then a stray off the column.
        let err = extract(&authoritative, &submitted).unwrap_err();
        assert_eq!(
            err,
            TurnError::UnauthorizedTile {
                cells: vec![Coord::new(7, 8)]
            }
        );
    }

    #[test]
    fn test_even_split_is_invalid_geometry() {
        let authoritative = Board::new();
        let mut submitted = Board::new();
        submitted.set(Coord::new(7, 7), Tile::letter('A'));
        submitted.set(Coord::new(7, 8), Tile::letter('B'));
        submitted.set(Coord::new(8, 10), Tile::letter('C'));
        submitted.set(Coord::new(9, 10), Tile::letter('D'));

        let err = extract(&authoritative, &submitted).unwrap_err();
        assert_eq!(err, TurnError::InvalidGeometry);
    }

    #[test]
    fn test_gap_in_run_is_discontiguous() {
        let authoritative = Board::new();
        let mut submitted = Board::new();
        submitted.set(Coord::new(7, 7), Tile::letter('A'));
        submitted.set(Coord::new(7, 8), Tile::letter('B'));
        submitted.set(Coord::new(7, 10), Tile::letter('C'));

        let err = extract(&authoritative, &submitted).unwrap_err();
        assert_eq!(
            err,
            TurnError::DiscontiguousWord {
                gap: Coord::new(7, 9)
            }
        );
    }

    #[test]
    fn test_gap_filled_by_existing_tile_is_fine() {
        let authoritative = board_with(&[(7, 9, 'X')]);
        let mut submitted = authoritative.clone();
        submitted.set(Coord::new(7, 8), Tile::letter('A'));
        submitted.set(Coord::new(7, 10), Tile::letter('E'));

        let placement = extract(&authoritative, &submitted).unwrap();
        assert_eq!(placement.primary.text(), "AXE");
    }

    #[test]
    fn test_empty_diff_is_empty_turn() {
        let board = board_with(&[(7, 7, 'A')]);
        let err = extract(&board, &board.clone()).unwrap_err();
        assert_eq!(err, TurnError::EmptyTurn);
    }

    #[test]
    fn test_single_tile_prefers_longer_run() {
        // Existing word down col 7; a single tile below extends it.
        let authoritative = board_with(&[(6, 7, 'A'), (7, 7, 'T')]);
        let mut submitted = authoritative.clone();
        submitted.set(Coord::new(8, 7), Tile::letter('E'));

        let placement = extract(&authoritative, &submitted).unwrap();
        assert_eq!(placement.direction, Direction::Down);
        assert_eq!(placement.primary.text(), "ATE");
    }
}
