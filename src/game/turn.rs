//! Turn submissions and commit records.
//!
//! Client-declared fields live in [`ClientClaims`], a deliberately
//! separate structure from anything the engine validates against. The
//! server reconstructs the truth from the board diff; claims exist only
//! for logging and anomaly detection.

use super::board::{Board, PlacedTile};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What the client *says* it played. Never trusted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientClaims {
    /// Claimed primary word.
    pub word: String,
    /// Claimed score.
    pub score: u32,
    /// Claimed start row of the placement.
    pub start_row: usize,
    /// Claimed start column of the placement.
    pub start_col: usize,
    /// Claimed direction, kept as raw text since it is never parsed
    /// for validation.
    pub direction: String,
    /// Claimed secondary words.
    pub secondary_words: Vec<String>,
    /// Claimed blank-tile coordinates.
    pub blank_tiles: Vec<[usize; 2]>,
}

/// A turn as submitted: the player, the full board snapshot they claim
/// results from their move, and their advisory claims.
#[derive(Debug, Clone)]
pub struct ProposedTurn {
    /// The submitting player.
    pub player_id: String,
    /// The candidate board; diffed against the authoritative board,
    /// never stored as-is.
    pub snapshot: Board,
    /// Advisory fields from the client.
    pub claims: ClientClaims,
}

/// The validated, committed record of a turn: server-reconstructed
/// placements and words, the server-computed score, and the turn
/// sequence number the commit was assigned.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct CommittedTurn {
    /// The player whose turn was committed.
    player_id: String,
    /// Exactly the tiles merged into the authoritative board.
    placements: Vec<PlacedTile>,
    /// The primary word actually formed.
    primary_word: String,
    /// Secondary words actually formed.
    secondary_words: Vec<String>,
    /// Server-computed score for the turn.
    score: u32,
    /// The turn sequence number after this commit.
    turn_seq: u64,
}

impl CommittedTurn {
    pub(crate) fn new(
        player_id: String,
        placements: Vec<PlacedTile>,
        primary_word: String,
        secondary_words: Vec<String>,
        score: u32,
        turn_seq: u64,
    ) -> Self {
        Self {
            player_id,
            placements,
            primary_word,
            secondary_words,
            score,
            turn_seq,
        }
    }
}
