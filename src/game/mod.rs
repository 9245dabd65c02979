//! The turn validation and board reconciliation engine.
//!
//! A submitted turn carries a full board snapshot. The engine never
//! trusts it: the snapshot is diffed against the authoritative board,
//! the placement and every formed word are reconstructed from the diff,
//! rules and the lexicon are applied, and the score is computed server
//! side. Only the reconstructed tiles are merged on commit.

pub mod board;
pub mod committer;
pub mod error;
pub mod lexicon;
pub mod placement;
pub mod rules;
pub mod scoring;
pub mod tiles;
pub mod turn;

pub use board::{Board, Coord, PlacedTile, Tile, BOARD_SIZE, CENTER};
pub use committer::{commit_turn, Proposed, Turn, Validated};
pub use error::{EngineError, TurnError};
pub use lexicon::{Lexicon, WordList};
pub use placement::{Direction, FormedWord, Placement};
pub use scoring::{premium_at, score, Premium, BINGO_BONUS};
pub use tiles::{letter_value, Rack, TileBag, BLANK, RACK_SIZE};
pub use turn::{ClientClaims, CommittedTurn, ProposedTurn};
