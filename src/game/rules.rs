//! Placement legality rules.
//!
//! Pure functions over the reconstructed placement and the authoritative
//! board. Separated from extraction so each rule can be exercised on its
//! own, in the style of the win/draw rule split elsewhere in the crate's
//! lineage.

use super::board::{Board, CENTER};
use super::error::TurnError;
use super::placement::Placement;
use super::tiles::Rack;
use tracing::instrument;

/// First turn of the game: the primary word must cover the center square.
///
/// # Errors
///
/// Returns [`TurnError::MustCoverCenter`] when it does not.
#[instrument(skip(placement))]
pub fn check_center(placement: &Placement) -> Result<(), TurnError> {
    if placement.primary.covers(CENTER) {
        Ok(())
    } else {
        Err(TurnError::MustCoverCenter)
    }
}

/// Later turns: the placement must connect to tiles already on the board,
/// either by running through one or by forming a perpendicular word.
///
/// # Errors
///
/// Returns [`TurnError::Disconnected`] when no new tile touches the
/// existing board.
#[instrument(skip(placement, authoritative))]
pub fn check_connected(placement: &Placement, authoritative: &Board) -> Result<(), TurnError> {
    let runs_through_existing = placement
        .primary
        .cells
        .iter()
        .any(|p| authoritative.is_occupied(p.coord));
    let touches_existing = placement.new_tiles.iter().any(|p| {
        p.coord
            .neighbours()
            .any(|n| authoritative.is_occupied(n))
    });

    if runs_through_existing || touches_existing {
        Ok(())
    } else {
        Err(TurnError::Disconnected)
    }
}

/// The rack must supply every placed tile. Returns the rack as it stands
/// after consumption, so commit can swap it in without re-checking.
///
/// # Errors
///
/// Returns [`TurnError::InsufficientRackTiles`] naming the first letter
/// the rack cannot cover.
#[instrument(skip(placement, rack))]
pub fn check_rack(placement: &Placement, rack: &Rack) -> Result<Rack, TurnError> {
    rack.consumed(&placement.new_tiles)
}
