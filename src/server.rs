//! HTTP boundary: REST router, wire DTOs, and error mapping.
//!
//! The wire format mirrors what clients already send: camelCase turn
//! payloads carrying the full board snapshot plus advisory fields, and
//! snake_case game views with a `board_state` grid. Rule violations map
//! to 4xx with a stable error code; 5xx is reserved for engine faults.

use crate::game::board::{Board, PlacedTile, Tile};
use crate::game::error::TurnError;
use crate::game::lexicon::WordList;
use crate::game::turn::{ClientClaims, ProposedTurn};
use crate::session::{GameSession, GameStatus, SessionManager, SubmitError};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Shared state behind every handler.
#[derive(Clone)]
pub struct AppState {
    /// Game registry.
    pub sessions: SessionManager,
    /// The word-legality oracle.
    pub lexicon: Arc<WordList>,
}

/// Builds the REST router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/games", post(create_game))
        .route("/api/games/{game_id}", get(get_game))
        .route("/api/games/{game_id}/turns", post(submit_turn))
        .with_state(state)
}

/// Request to create a game.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    /// Names of the players, in turn order.
    pub player_names: Vec<String>,
}

/// A turn submission, exactly as the client sends it. Everything except
/// `playerId` and `boardState` is advisory.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRequest {
    /// The submitting player.
    pub player_id: String,
    /// Claimed primary word.
    #[serde(default)]
    pub word: String,
    /// Claimed score.
    #[serde(default)]
    pub score: u32,
    /// Full board snapshot after the claimed move.
    pub board_state: Vec<Vec<Option<Tile>>>,
    /// Claimed start row.
    #[serde(default)]
    pub start_row: usize,
    /// Claimed start column.
    #[serde(default)]
    pub start_col: usize,
    /// Claimed direction.
    #[serde(default)]
    pub direction: String,
    /// Claimed secondary words.
    #[serde(default)]
    pub secondary_words: Vec<String>,
    /// Claimed blank-tile coordinates.
    #[serde(default)]
    pub blank_tiles: Vec<[usize; 2]>,
}

/// One player in a game view.
#[derive(Debug, Serialize)]
pub struct PlayerView {
    /// Player ID.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Cumulative score.
    pub score: u32,
    /// The player's current rack.
    pub rack: Vec<char>,
}

/// Full view of a game's authoritative state.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// Game ID.
    pub id: String,
    /// Players in turn order.
    pub players: Vec<PlayerView>,
    /// The authoritative board as a 15x15 grid.
    pub board_state: Vec<Vec<Option<Tile>>>,
    /// Game lifecycle status.
    pub status: GameStatus,
    /// Turn sequence number.
    pub turn_seq: u64,
    /// ID of the player whose turn it is.
    pub current_player: String,
}

impl GameView {
    fn from_session(session: &GameSession) -> Self {
        let players = session
            .players()
            .iter()
            .enumerate()
            .map(|(idx, p)| PlayerView {
                id: p.id().clone(),
                name: p.name().clone(),
                score: *p.score(),
                rack: session.rack(idx).tiles().to_vec(),
            })
            .collect();
        Self {
            id: session.id().clone(),
            players,
            board_state: session.board().to_rows(),
            status: *session.status(),
            turn_seq: *session.turn_seq(),
            current_player: session.current_player().id().clone(),
        }
    }
}

/// Response to a committed turn.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnView {
    /// The tiles the server actually merged.
    pub placements: Vec<PlacedTile>,
    /// The primary word the server reconstructed.
    pub primary_word: String,
    /// Secondary words the server reconstructed.
    pub secondary_words: Vec<String>,
    /// The server-computed score.
    pub score: u32,
    /// The turn sequence number assigned to the commit.
    pub turn_seq: u64,
}

/// Error envelope returned for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub error: String,
    /// Human-readable message with offending details.
    pub message: String,
}

/// A failure at the HTTP boundary.
#[derive(Debug)]
pub enum ApiError {
    /// The requested resource does not exist.
    NotFound(String),
    /// The request was structurally invalid.
    BadRequest(String),
    /// The engine rejected the turn.
    Turn(TurnError),
}

impl From<TurnError> for ApiError {
    fn from(err: TurnError) -> Self {
        ApiError::Turn(err)
    }
}

impl From<SubmitError> for ApiError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::GameNotFound { game_id } => {
                ApiError::NotFound(format!("game {game_id} not found"))
            }
            SubmitError::PlayerNotFound { player_id } => {
                ApiError::NotFound(format!("player {player_id} not found"))
            }
            SubmitError::Rejected(turn_err) => ApiError::Turn(turn_err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND".to_string(), message)
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST".to_string(), message)
            }
            ApiError::Turn(err) => {
                // Turn-order violations are access-control failures;
                // the rest are unprocessable submissions. A malformed
                // snapshot is a plain bad request.
                let status = match err {
                    TurnError::NotYourTurn { .. } => StatusCode::FORBIDDEN,
                    TurnError::MalformedBoard { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.code().to_string(), err.to_string())
            }
        };
        let body = Json(ErrorBody {
            error: code,
            message,
        });
        (status, body).into_response()
    }
}

#[instrument]
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[instrument(skip(state, req))]
async fn create_game(
    State(state): State<AppState>,
    Json(req): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    if req.player_names.len() < 2 || req.player_names.len() > 4 {
        return Err(ApiError::BadRequest(format!(
            "expected 2 to 4 players, got {}",
            req.player_names.len()
        )));
    }

    let session = state.sessions.create_game(req.player_names);
    info!(game_id = %session.id(), "Game created");
    Ok((StatusCode::CREATED, Json(GameView::from_session(&session))))
}

#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
) -> Result<Json<GameView>, ApiError> {
    let session = state
        .sessions
        .get_game(&game_id)
        .ok_or_else(|| ApiError::NotFound(format!("game {game_id} not found")))?;
    Ok(Json(GameView::from_session(&session)))
}

#[instrument(skip(state, req), fields(player_id = %req.player_id))]
async fn submit_turn(
    State(state): State<AppState>,
    Path(game_id): Path<String>,
    Json(req): Json<TurnRequest>,
) -> Result<Json<TurnView>, ApiError> {
    let snapshot = Board::from_rows(req.board_state)?;

    let proposed = ProposedTurn {
        player_id: req.player_id,
        snapshot,
        claims: ClientClaims {
            word: req.word,
            score: req.score,
            start_row: req.start_row,
            start_col: req.start_col,
            direction: req.direction,
            secondary_words: req.secondary_words,
            blank_tiles: req.blank_tiles,
        },
    };

    let committed = state
        .sessions
        .submit_turn(&game_id, &proposed, state.lexicon.as_ref())
        .map_err(|err| {
            warn!(game_id, error = %err, "Turn rejected");
            ApiError::from(err)
        })?;

    Ok(Json(TurnView {
        placements: committed.placements().clone(),
        primary_word: committed.primary_word().clone(),
        secondary_words: committed.secondary_words().clone(),
        score: *committed.score(),
        turn_seq: *committed.turn_seq(),
    }))
}
