//! Error taxonomy for turn validation.
//!
//! Every variant is terminal for the submission that raised it: the engine
//! never retries, and the authoritative board is untouched whenever one of
//! these is returned. Player-caused rule violations (`TurnError`) are kept
//! separate from engine-internal faults (`EngineError`) so the HTTP layer
//! can map them to 4xx and 5xx respectively.

use super::board::Coord;
use derive_more::{Display, Error};

/// A rule violation that rejects an entire turn submission.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TurnError {
    /// The submitted board snapshot has the wrong shape or an invalid glyph.
    #[display("malformed board: {detail}")]
    MalformedBoard {
        /// What was wrong with the snapshot.
        detail: String,
    },

    /// A previously committed tile was altered or removed in the snapshot.
    #[display("committed tiles altered at {}", format_coords(cells))]
    TamperedHistory {
        /// Coordinates whose committed occupant differs in the snapshot.
        cells: Vec<Coord>,
    },

    /// The snapshot is identical to the authoritative board.
    #[display("turn places no tiles")]
    EmptyTurn,

    /// New tiles do not resolve to a single row or column.
    #[display("new tiles do not form a single line")]
    InvalidGeometry,

    /// The claimed line has an empty cell inside the word run.
    #[display("word has a gap at {gap}")]
    DiscontiguousWord {
        /// First empty cell found inside the run.
        gap: Coord,
    },

    /// Tiles appear in the snapshot outside the reconstructed placement.
    /// This is the injection vector the engine exists to close.
    #[display("unauthorized tiles at {}", format_coords(cells))]
    UnauthorizedTile {
        /// Coordinates of the smuggled tiles.
        cells: Vec<Coord>,
    },

    /// The first word of the game must cover the center square.
    #[display("first word must cover the center square")]
    MustCoverCenter,

    /// A later word must connect to tiles already on the board.
    #[display("word does not connect to any existing tile")]
    Disconnected,

    /// The player's rack cannot supply a placed tile.
    #[display("rack does not contain '{letter}'")]
    InsufficientRackTiles {
        /// The letter (or '?' for a blank) the rack is missing.
        letter: char,
    },

    /// The submitting player is not the current-turn player.
    #[display("not your turn, player {player_id}")]
    NotYourTurn {
        /// The player who submitted out of turn.
        player_id: String,
    },

    /// A formed word is not in the lexicon.
    #[display("'{word}' is not a legal word")]
    IllegalWord {
        /// The offending word, exactly as formed on the board.
        word: String,
    },
}

impl TurnError {
    /// Stable machine-readable code for the API boundary.
    pub fn code(&self) -> &'static str {
        match self {
            TurnError::MalformedBoard { .. } => "MALFORMED_BOARD",
            TurnError::TamperedHistory { .. } => "TAMPERED_HISTORY",
            TurnError::EmptyTurn => "EMPTY_TURN",
            TurnError::InvalidGeometry => "INVALID_GEOMETRY",
            TurnError::DiscontiguousWord { .. } => "DISCONTIGUOUS_WORD",
            TurnError::UnauthorizedTile { .. } => "UNAUTHORIZED_TILE",
            TurnError::MustCoverCenter => "MUST_COVER_CENTER",
            TurnError::Disconnected => "DISCONNECTED",
            TurnError::InsufficientRackTiles { .. } => "INSUFFICIENT_RACK_TILES",
            TurnError::NotYourTurn { .. } => "NOT_YOUR_TURN",
            TurnError::IllegalWord { .. } => "ILLEGAL_WORD",
        }
    }
}

/// An engine-internal fault, distinct from any player-caused violation.
#[derive(Debug, Display, Error)]
pub enum EngineError {
    /// The lexicon could not be loaded.
    #[display("failed to load word list from {path}: {source}")]
    LexiconUnavailable {
        /// Path the word list was read from.
        path: String,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
}

fn format_coords(cells: &[Coord]) -> String {
    let parts: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    parts.join(", ")
}
