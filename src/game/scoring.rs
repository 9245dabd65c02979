//! Server-side scoring.
//!
//! The score is computed strictly from tile values and board premiums;
//! the client-claimed score never feeds into it. Premium squares apply
//! only under tiles placed this turn, so a multiplier consumed by an
//! earlier word does not re-apply when a later word runs through it.

use super::board::{Coord, PlacedTile};
use super::placement::Placement;
use super::tiles::{letter_value, RACK_SIZE};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Bonus for playing an entire rack in one turn.
pub const BINGO_BONUS: u32 = 50;

/// A premium square's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Premium {
    /// Letter value doubled.
    DoubleLetter,
    /// Letter value tripled.
    TripleLetter,
    /// Whole word doubled.
    DoubleWord,
    /// Whole word tripled.
    TripleWord,
}

const TRIPLE_WORD: [(usize, usize); 8] = [
    (0, 0),
    (0, 7),
    (0, 14),
    (7, 0),
    (7, 14),
    (14, 0),
    (14, 7),
    (14, 14),
];

const DOUBLE_WORD: [(usize, usize); 17] = [
    (1, 1),
    (2, 2),
    (3, 3),
    (4, 4),
    (7, 7),
    (10, 10),
    (11, 11),
    (12, 12),
    (13, 13),
    (1, 13),
    (2, 12),
    (3, 11),
    (4, 10),
    (10, 4),
    (11, 3),
    (12, 2),
    (13, 1),
];

const TRIPLE_LETTER: [(usize, usize); 12] = [
    (1, 5),
    (1, 9),
    (5, 1),
    (5, 5),
    (5, 9),
    (5, 13),
    (9, 1),
    (9, 5),
    (9, 9),
    (9, 13),
    (13, 5),
    (13, 9),
];

const DOUBLE_LETTER: [(usize, usize); 24] = [
    (0, 3),
    (0, 11),
    (2, 6),
    (2, 8),
    (3, 0),
    (3, 7),
    (3, 14),
    (6, 2),
    (6, 6),
    (6, 8),
    (6, 12),
    (7, 3),
    (7, 11),
    (8, 2),
    (8, 6),
    (8, 8),
    (8, 12),
    (11, 0),
    (11, 7),
    (11, 14),
    (12, 6),
    (12, 8),
    (14, 3),
    (14, 11),
];

/// The premium at a coordinate on the standard board, if any.
pub fn premium_at(coord: Coord) -> Option<Premium> {
    let key = (coord.row, coord.col);
    if TRIPLE_WORD.contains(&key) {
        Some(Premium::TripleWord)
    } else if DOUBLE_WORD.contains(&key) {
        Some(Premium::DoubleWord)
    } else if TRIPLE_LETTER.contains(&key) {
        Some(Premium::TripleLetter)
    } else if DOUBLE_LETTER.contains(&key) {
        Some(Premium::DoubleLetter)
    } else {
        None
    }
}

/// Scores a reconstructed placement.
///
/// Deterministic for a fixed board state and placement: every word
/// (primary and secondary) is summed with letter premiums on new tiles,
/// multiplied by word premiums under new tiles, plus the bingo bonus
/// for a full-rack play. Blank tiles contribute zero.
#[instrument(skip(placement))]
pub fn score(placement: &Placement) -> u32 {
    let new_coords: HashSet<Coord> = placement.new_tiles.iter().map(|p| p.coord).collect();

    let mut total: u32 = placement
        .words()
        .map(|word| score_word(&word.cells, &new_coords))
        .sum();

    if placement.new_tiles.len() == RACK_SIZE {
        total += BINGO_BONUS;
    }

    debug!(score = total, "Scored placement");
    total
}

fn score_word(cells: &[PlacedTile], new_coords: &HashSet<Coord>) -> u32 {
    let mut word_multiplier = 1;
    let mut sum = 0;

    for placed in cells {
        let base = if placed.tile.is_blank {
            0
        } else {
            letter_value(placed.tile.letter)
        };

        // Premiums fire only under freshly placed tiles.
        let premium = new_coords
            .contains(&placed.coord)
            .then(|| premium_at(placed.coord))
            .flatten();

        sum += match premium {
            Some(Premium::DoubleLetter) => base * 2,
            Some(Premium::TripleLetter) => base * 3,
            _ => base,
        };
        match premium {
            Some(Premium::DoubleWord) => word_multiplier *= 2,
            Some(Premium::TripleWord) => word_multiplier *= 3,
            _ => {}
        }
    }

    sum * word_multiplier
}
