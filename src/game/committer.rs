//! Typestate turn committer.
//!
//! A submission moves through `Turn<Proposed>` to `Turn<Validated>` to a
//! [`CommittedTurn`], or is rejected at any step. The phase is encoded in
//! the type, so only a fully validated turn has a `commit` method and a
//! partial commit cannot be expressed. Every fallible check happens
//! before `commit`; once commit starts it runs to completion.

use super::error::TurnError;
use super::lexicon::Lexicon;
use super::placement::{self, Placement};
use super::rules;
use super::scoring;
use super::tiles::Rack;
use super::turn::{CommittedTurn, ProposedTurn};
use crate::session::GameSession;
use std::marker::PhantomData;
use tracing::{info, instrument, warn};

/// Typestate marker: the placement has been reconstructed from the diff
/// but not yet checked against the rules.
#[derive(Debug, Clone, Copy)]
pub struct Proposed;

/// Typestate marker: all rules, the lexicon, and the rack have passed;
/// the turn may be committed.
#[derive(Debug, Clone, Copy)]
pub struct Validated;

/// A turn moving through the commit state machine.
#[derive(Debug)]
pub struct Turn<S> {
    player_id: String,
    player_index: usize,
    placement: Placement,
    claimed_score: u32,
    score: u32,
    next_rack: Rack,
    _phase: PhantomData<S>,
}

impl Turn<Proposed> {
    /// Admits a submission into the state machine.
    ///
    /// The turn-order gate runs first, before any board diffing, since
    /// it is an access-control check rather than a geometry check. The
    /// placement is then reconstructed from the snapshot diff.
    ///
    /// # Errors
    ///
    /// [`TurnError::NotYourTurn`] for an out-of-turn player, plus any
    /// extraction error from [`placement::extract`].
    #[instrument(skip(session, proposed), fields(game_id = %session.id(), player_id = %proposed.player_id))]
    pub fn propose(session: &GameSession, proposed: &ProposedTurn) -> Result<Self, TurnError> {
        let player_index = session
            .player_index(&proposed.player_id)
            .filter(|&idx| idx == session.current())
            .ok_or_else(|| TurnError::NotYourTurn {
                player_id: proposed.player_id.clone(),
            })?;

        let placement = placement::extract(session.board(), &proposed.snapshot)?;

        Ok(Self {
            player_id: proposed.player_id.clone(),
            player_index,
            placement,
            claimed_score: proposed.claims.score,
            score: 0,
            next_rack: session.rack(player_index).clone(),
            _phase: PhantomData,
        })
    }

    /// Runs the placement rules, the lexicon, and the rack check,
    /// consuming the proposed turn.
    ///
    /// The client-claimed score is compared against the server-computed
    /// one purely for anomaly logging; it never influences the result.
    ///
    /// # Errors
    ///
    /// Any rule violation from §placement legality, or
    /// [`TurnError::IllegalWord`] for the first word the lexicon
    /// rejects. The whole turn is rejected atomically.
    #[instrument(skip(self, session, lexicon), fields(game_id = %session.id()))]
    pub fn validate(
        self,
        session: &GameSession,
        lexicon: &dyn Lexicon,
    ) -> Result<Turn<Validated>, TurnError> {
        if *session.turn_seq() == 0 {
            rules::check_center(&self.placement)?;
        } else {
            rules::check_connected(&self.placement, session.board())?;
        }

        let next_rack = rules::check_rack(&self.placement, session.rack(self.player_index))?;

        for word in self.placement.words() {
            let text = word.text();
            if !lexicon.contains(&text) {
                return Err(TurnError::IllegalWord { word: text });
            }
        }

        let score = scoring::score(&self.placement);
        if self.claimed_score != score {
            warn!(
                player_id = %self.player_id,
                claimed = self.claimed_score,
                computed = score,
                "Client-claimed score differs from server score"
            );
        }

        Ok(Turn {
            player_id: self.player_id,
            player_index: self.player_index,
            placement: self.placement,
            claimed_score: self.claimed_score,
            score,
            next_rack,
            _phase: PhantomData::<Validated>,
        })
    }
}

impl Turn<Validated> {
    /// Writes the turn into the session: merges exactly the
    /// reconstructed tiles, swaps in the consumed rack (refilled from
    /// the bag), and advances the turn sequence and player index.
    ///
    /// Every operation here is infallible; validation already produced
    /// the post-turn rack, so no partial application is possible.
    #[instrument(skip(self, session), fields(game_id = %session.id(), player_id = %self.player_id))]
    pub fn commit(self, session: &mut GameSession) -> CommittedTurn {
        let turn_seq = session.apply_commit(
            self.player_index,
            &self.placement.new_tiles,
            self.next_rack,
            self.score,
        );

        info!(
            turn_seq,
            score = self.score,
            claimed_score = self.claimed_score,
            primary = %self.placement.primary.text(),
            "Turn committed"
        );

        CommittedTurn::new(
            self.player_id,
            self.placement.new_tiles,
            self.placement.primary.text(),
            self.placement
                .secondaries
                .iter()
                .map(|w| w.text())
                .collect(),
            self.score,
            turn_seq,
        )
    }

    /// The server-computed score for this turn.
    pub fn score(&self) -> u32 {
        self.score
    }
}

/// Validates and commits one turn end to end.
///
/// Callers must hold the game's exclusive section for the whole call;
/// the diff is computed against `session`'s board and the commit writes
/// back into the same borrow, so no other submission can interleave.
///
/// # Errors
///
/// Any [`TurnError`]; the session is untouched on every error path.
#[instrument(skip(session, proposed, lexicon), fields(game_id = %session.id()))]
pub fn commit_turn(
    session: &mut GameSession,
    proposed: &ProposedTurn,
    lexicon: &dyn Lexicon,
) -> Result<CommittedTurn, TurnError> {
    let turn = Turn::propose(session, proposed)?.validate(session, lexicon)?;
    Ok(turn.commit(session))
}
