//! Tile values, the player rack, and the tile bag.

use super::board::{PlacedTile, Tile};
use super::error::TurnError;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of tiles a full rack holds.
pub const RACK_SIZE: usize = 7;

/// Marker used for a blank tile in racks and the bag.
pub const BLANK: char = '?';

/// Point value of a letter. Blanks are handled by the scorer, which
/// zeroes any tile with the blank flag set.
pub fn letter_value(letter: char) -> u32 {
    match letter {
        'A' | 'E' | 'I' | 'O' | 'U' | 'L' | 'N' | 'S' | 'T' | 'R' => 1,
        'D' | 'G' => 2,
        'B' | 'C' | 'M' | 'P' => 3,
        'F' | 'H' | 'V' | 'W' | 'Y' => 4,
        'K' => 5,
        'J' | 'X' => 8,
        'Q' | 'Z' => 10,
        _ => 0,
    }
}

/// The tiles a player currently holds. A multiset of letters, with
/// blanks stored as [`BLANK`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    tiles: Vec<char>,
}

impl Rack {
    /// Creates a rack from the given letters.
    pub fn new(tiles: Vec<char>) -> Self {
        Self { tiles }
    }

    /// The letters currently on the rack.
    pub fn tiles(&self) -> &[char] {
        &self.tiles
    }

    /// Number of tiles on the rack.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the rack is empty.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Adds drawn tiles to the rack.
    pub fn add(&mut self, drawn: impl IntoIterator<Item = char>) {
        self.tiles.extend(drawn);
    }

    /// Returns a copy of this rack with the given placements consumed.
    ///
    /// A placed blank consumes a [`BLANK`] regardless of its assigned
    /// letter; a regular tile consumes its own letter.
    ///
    /// # Errors
    ///
    /// Returns [`TurnError::InsufficientRackTiles`] naming the first
    /// letter the rack cannot supply. The original rack is untouched.
    #[instrument(skip(self, placements))]
    pub fn consumed(&self, placements: &[PlacedTile]) -> Result<Rack, TurnError> {
        let mut remaining = self.tiles.clone();
        for placed in placements {
            let needed = rack_letter(&placed.tile);
            match remaining.iter().position(|&t| t == needed) {
                Some(idx) => {
                    remaining.swap_remove(idx);
                }
                None => return Err(TurnError::InsufficientRackTiles { letter: needed }),
            }
        }
        Ok(Rack { tiles: remaining })
    }
}

/// The rack letter a placed tile consumes.
fn rack_letter(tile: &Tile) -> char {
    if tile.is_blank {
        BLANK
    } else {
        tile.letter
    }
}

/// The shared pool of undrawn tiles, shuffled at game creation.
///
/// Standard English distribution: 98 letters plus 2 blanks.
#[derive(Debug, Clone)]
pub struct TileBag {
    tiles: Vec<char>,
}

/// (letter, count) pairs for the standard distribution.
const DISTRIBUTION: [(char, usize); 27] = [
    ('A', 9),
    ('B', 2),
    ('C', 2),
    ('D', 4),
    ('E', 12),
    ('F', 2),
    ('G', 3),
    ('H', 2),
    ('I', 9),
    ('J', 1),
    ('K', 1),
    ('L', 4),
    ('M', 2),
    ('N', 6),
    ('O', 8),
    ('P', 2),
    ('Q', 1),
    ('R', 6),
    ('S', 4),
    ('T', 6),
    ('U', 4),
    ('V', 2),
    ('W', 2),
    ('X', 1),
    ('Y', 2),
    ('Z', 1),
    (BLANK, 2),
];

impl TileBag {
    /// Creates a full, shuffled bag.
    #[instrument(skip(rng))]
    pub fn shuffled(rng: &mut impl Rng) -> Self {
        let mut tiles: Vec<char> = DISTRIBUTION
            .iter()
            .flat_map(|&(letter, count)| std::iter::repeat(letter).take(count))
            .collect();
        tiles.shuffle(rng);
        Self { tiles }
    }

    /// Creates a bag with an explicit tile order. Draws come from the
    /// back of the list. Deterministic bags back scripted games and
    /// reproducible tests.
    pub fn from_tiles(tiles: Vec<char>) -> Self {
        Self { tiles }
    }

    /// Draws up to `count` tiles; fewer when the bag runs low.
    pub fn draw(&mut self, count: usize) -> Vec<char> {
        let take = count.min(self.tiles.len());
        self.tiles.split_off(self.tiles.len() - take)
    }

    /// Number of tiles left in the bag.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the bag is exhausted.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
