//! Wordgrid - a turn-based word-placement game server.
//!
//! The server holds the authoritative board for every game and treats
//! client turn submissions as untrusted candidates: each submitted
//! snapshot is diffed against the authoritative state, the placement is
//! reconstructed from the diff, and the turn is validated, scored, and
//! committed under a per-game lock.
//!
//! # Architecture
//!
//! - **Engine** (`game`): board diffing, placement reconstruction, rule
//!   validation, lexicon lookup, scoring, and the typestate committer.
//! - **Sessions**: per-game authoritative state behind per-game locks.
//! - **Server**: the axum REST boundary and error mapping.
//!
//! # Example
//!
//! ```
//! use wordgrid::{
//!     commit_turn, ClientClaims, Coord, GameSession, ProposedTurn, Tile, TileBag, WordList,
//! };
//!
//! let mut session = GameSession::with_bag(
//!     "game_1".to_string(),
//!     vec!["One".to_string(), "Two".to_string()],
//!     TileBag::from_tiles("AAAAAAAAAAAAAAHIXXXXX".chars().collect()),
//! );
//! let lexicon = WordList::from_words(["HI"]);
//!
//! // The snapshot a client would send: HI played through the center.
//! let mut snapshot = session.board().clone();
//! snapshot.set(Coord::new(7, 7), Tile::letter('H'));
//! snapshot.set(Coord::new(7, 8), Tile::letter('I'));
//!
//! let player_id = session.players()[0].id().clone();
//! let proposed = ProposedTurn {
//!     player_id,
//!     snapshot,
//!     claims: ClientClaims::default(),
//! };
//!
//! let committed = commit_turn(&mut session, &proposed, &lexicon).unwrap();
//! assert_eq!(committed.primary_word(), "HI");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
pub mod game;
mod server;
mod session;

// Crate-level exports - engine
pub use game::{
    commit_turn, letter_value, premium_at, score, Board, ClientClaims, CommittedTurn, Coord,
    Direction, EngineError, FormedWord, Lexicon, PlacedTile, Placement, ProposedTurn, Rack, Tile,
    TileBag, TurnError, WordList, BINGO_BONUS, BLANK, BOARD_SIZE, CENTER, RACK_SIZE,
};

// Crate-level exports - session management
pub use session::{GameSession, GameStatus, Player, SessionManager, SubmitError};

// Crate-level exports - HTTP boundary
pub use server::{router, ApiError, AppState, CreateGameRequest, GameView, PlayerView, TurnRequest, TurnView};
