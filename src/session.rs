//! Game session state and the per-game locking registry.
//!
//! A `GameSession` owns the authoritative board, racks, and turn order
//! for one game. The `SessionManager` keys every game to its own mutex,
//! so submissions for one game serialize while different games proceed
//! in parallel. The authoritative board is only ever mutated through
//! the turn committer.

use crate::game::board::{Board, PlacedTile};
use crate::game::committer;
use crate::game::error::TurnError;
use crate::game::lexicon::Lexicon;
use crate::game::tiles::{Rack, TileBag, RACK_SIZE};
use crate::game::turn::{CommittedTurn, ProposedTurn};
use derive_getters::Getters;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, info, instrument};

/// Lifecycle of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    /// Created, no turn committed yet.
    Waiting,
    /// At least one turn committed.
    InProgress,
    /// Bag exhausted and a rack emptied out.
    Finished,
}

/// A player in a game.
#[derive(Debug, Clone, Getters, Serialize)]
pub struct Player {
    /// Player's unique ID.
    id: String,
    /// Player's display name.
    name: String,
    /// Cumulative committed score.
    score: u32,
}

/// Authoritative state for one game.
#[derive(Debug, Clone, Getters)]
pub struct GameSession {
    /// Session ID.
    id: String,
    /// The authoritative board; sole source of truth.
    board: Board,
    /// Players in turn order.
    players: Vec<Player>,
    /// Turn sequence number; increments by exactly 1 per commit.
    turn_seq: u64,
    /// Game lifecycle status.
    status: GameStatus,
    #[getter(skip)]
    racks: Vec<Rack>,
    #[getter(skip)]
    bag: TileBag,
    #[getter(skip)]
    current: usize,
}

impl GameSession {
    /// Creates a session with a freshly shuffled bag, dealing each
    /// player an opening rack.
    #[instrument(skip(player_names))]
    pub fn new(id: String, player_names: Vec<String>) -> Self {
        let bag = TileBag::shuffled(&mut rand::thread_rng());
        Self::with_bag(id, player_names, bag)
    }

    /// Creates a session dealing racks from the given bag. Deterministic
    /// bags make scripted games and tests reproducible.
    #[instrument(skip(player_names, bag))]
    pub fn with_bag(id: String, player_names: Vec<String>, bag: TileBag) -> Self {
        let mut bag = bag;
        let mut players = Vec::with_capacity(player_names.len());
        let mut racks = Vec::with_capacity(player_names.len());

        for name in player_names {
            let player_id = format!("{}_{}", id, name.to_lowercase().replace(' ', "_"));
            players.push(Player {
                id: player_id,
                name,
                score: 0,
            });
            let mut rack = Rack::default();
            rack.add(bag.draw(RACK_SIZE));
            racks.push(rack);
        }

        info!(game_id = %id, players = players.len(), "Created game session");
        Self {
            id,
            board: Board::new(),
            players,
            turn_seq: 0,
            status: GameStatus::Waiting,
            racks,
            bag,
            current: 0,
        }
    }

    /// Index of the player whose turn it is.
    pub fn current(&self) -> usize {
        self.current
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Finds a player's index by ID.
    pub fn player_index(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    /// The rack of the player at `index`.
    pub fn rack(&self, index: usize) -> &Rack {
        &self.racks[index]
    }

    /// Writes a validated turn into the session and returns the new
    /// turn sequence number. Only the committer calls this; every step
    /// is infallible so the write is atomic from the caller's view.
    pub(crate) fn apply_commit(
        &mut self,
        player_index: usize,
        new_tiles: &[PlacedTile],
        consumed_rack: Rack,
        score: u32,
    ) -> u64 {
        self.board = self.board.merged(new_tiles);

        let mut rack = consumed_rack;
        rack.add(self.bag.draw(RACK_SIZE.saturating_sub(rack.len())));
        let finished = self.bag.is_empty() && rack.is_empty();
        self.racks[player_index] = rack;

        self.players[player_index].score += score;
        self.turn_seq += 1;
        self.current = (player_index + 1) % self.players.len();
        self.status = if finished {
            GameStatus::Finished
        } else {
            GameStatus::InProgress
        };

        self.turn_seq
    }
}

/// Why a submission could not produce a committed turn.
#[derive(Debug, Display, Error, From)]
pub enum SubmitError {
    /// No game with the given ID.
    #[display("game {game_id} not found")]
    #[from(ignore)]
    GameNotFound {
        /// The unknown game ID.
        game_id: String,
    },
    /// No player with the given ID in the game.
    #[display("player {player_id} not found")]
    #[from(ignore)]
    PlayerNotFound {
        /// The unknown player ID.
        player_id: String,
    },
    /// The engine rejected the turn.
    #[display("{_0}")]
    Rejected(TurnError),
}

/// Registry of live games, each behind its own lock.
#[derive(Debug, Clone, Default)]
pub struct SessionManager {
    games: Arc<RwLock<HashMap<String, Arc<Mutex<GameSession>>>>>,
}

impl SessionManager {
    /// Creates an empty registry.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session manager");
        Self::default()
    }

    /// Creates a new game with a shuffled bag and returns a snapshot of
    /// its initial state.
    #[instrument(skip(self, player_names))]
    pub fn create_game(&self, player_names: Vec<String>) -> GameSession {
        let id = format!("game_{:08x}", rand::random::<u32>());
        let session = GameSession::new(id.clone(), player_names);
        let snapshot = session.clone();
        self.games
            .write()
            .unwrap()
            .insert(id, Arc::new(Mutex::new(session)));
        snapshot
    }

    /// Registers an existing session, replacing any game with the same
    /// ID. Lets scripted games start from a prepared bag.
    #[instrument(skip(self, session), fields(game_id = %session.id()))]
    pub fn insert_game(&self, session: GameSession) {
        self.games
            .write()
            .unwrap()
            .insert(session.id.clone(), Arc::new(Mutex::new(session)));
    }

    /// Snapshot of a game's current state.
    #[instrument(skip(self))]
    pub fn get_game(&self, game_id: &str) -> Option<GameSession> {
        let games = self.games.read().unwrap();
        let snapshot = games.get(game_id).map(|g| g.lock().unwrap().clone());
        if snapshot.is_none() {
            debug!(game_id, "Game not found");
        }
        snapshot
    }

    /// Validates and commits one turn under the game's exclusive lock.
    ///
    /// The lock is held across the entire validate-then-commit sequence,
    /// so two racing submissions cannot both diff against the same board
    /// and commit conflicting turns. The registry lock is released
    /// before the game lock is taken, keeping other games unblocked.
    ///
    /// # Errors
    ///
    /// [`SubmitError::GameNotFound`] for an unknown game,
    /// [`SubmitError::PlayerNotFound`] for a player the game has never
    /// heard of, otherwise the engine's rejection; either way no state
    /// changes. An out-of-turn submission by a known player is the
    /// engine's [`TurnError::NotYourTurn`], not a missing resource.
    #[instrument(skip(self, proposed, lexicon), fields(player_id = %proposed.player_id))]
    pub fn submit_turn(
        &self,
        game_id: &str,
        proposed: &ProposedTurn,
        lexicon: &dyn Lexicon,
    ) -> Result<CommittedTurn, SubmitError> {
        let handle = self
            .games
            .read()
            .unwrap()
            .get(game_id)
            .cloned()
            .ok_or_else(|| SubmitError::GameNotFound {
                game_id: game_id.to_string(),
            })?;

        let mut session = handle.lock().unwrap();
        if session.player_index(&proposed.player_id).is_none() {
            return Err(SubmitError::PlayerNotFound {
                player_id: proposed.player_id.clone(),
            });
        }
        let committed = committer::commit_turn(&mut session, proposed, lexicon)?;
        Ok(committed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::lexicon::WordList;
    use crate::game::turn::ClientClaims;

    #[test]
    fn test_new_game_deals_full_racks() {
        let session = GameSession::new(
            "game_a".to_string(),
            vec!["One".to_string(), "Two".to_string()],
        );
        assert_eq!(session.rack(0).len(), RACK_SIZE);
        assert_eq!(session.rack(1).len(), RACK_SIZE);
        assert_eq!(*session.status(), GameStatus::Waiting);
        assert_eq!(*session.turn_seq(), 0);
        assert_eq!(session.board().tile_count(), 0);
    }

    #[test]
    fn test_player_ids_derive_from_names() {
        let session = GameSession::new("game_b".to_string(), vec!["Player One".to_string()]);
        assert_eq!(session.players()[0].id(), "game_b_player_one");
    }

    #[test]
    fn test_manager_round_trip() {
        let manager = SessionManager::new();
        let created = manager.create_game(vec!["A".to_string(), "B".to_string()]);
        let fetched = manager.get_game(created.id()).unwrap();
        assert_eq!(fetched.id(), created.id());
        assert_eq!(fetched.players().len(), 2);
    }

    #[test]
    fn test_unknown_game_is_reported() {
        let manager = SessionManager::new();
        assert!(manager.get_game("nope").is_none());
    }

    #[test]
    fn test_unknown_player_is_a_missing_resource_not_out_of_turn() {
        let manager = SessionManager::new();
        let created = manager.create_game(vec!["A".to_string(), "B".to_string()]);
        let proposed = ProposedTurn {
            player_id: "ghost_player".to_string(),
            snapshot: created.board().clone(),
            claims: ClientClaims::default(),
        };

        let err = manager
            .submit_turn(created.id(), &proposed, &WordList::from_words(["HELLO"]))
            .unwrap_err();
        assert!(matches!(err, SubmitError::PlayerNotFound { .. }));

        // A real player submitting out of order still gets the engine's
        // turn-order rejection, not a missing resource.
        let out_of_order = ProposedTurn {
            player_id: created.players()[1].id().clone(),
            snapshot: created.board().clone(),
            claims: ClientClaims::default(),
        };
        let err = manager
            .submit_turn(created.id(), &out_of_order, &WordList::from_words(["HELLO"]))
            .unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Rejected(TurnError::NotYourTurn { .. })
        ));
    }
}
