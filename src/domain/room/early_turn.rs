//! §4.3.10 early-turn requests.

use crate::domain::cards_types::{Rank, Suit};
use crate::domain::room::errors::RoomError;
use crate::domain::room::state::Room;
use crate::domain::room::timeout::tick;

/// Outcome of a granted early-turn request, carried in the `EARLY_TURN_GRANTED`
/// broadcast that the dispatcher emits ahead of the following state frame.
#[derive(Debug, PartialEq)]
pub struct EarlyTurnGrant {
    pub player_id: String,
    pub suit: Suit,
    pub card_ids: Vec<String>,
    pub ranks: Vec<Rank>,
}

impl Room {
    /// A non-current player between tricks, outside the reveal window, may
    /// seize the turn if their hand is exactly 4 cards of `suit` including
    /// at least one Ace and at least three Aces/Tens combined.
    pub fn request_early_turn(
        &mut self,
        player_id: &str,
        suit: Suit,
        round_id: Option<u64>,
        now_ms: u64,
    ) -> Result<EarlyTurnGrant, RoomError> {
        tick(self, now_ms);

        let round = self.round.as_ref().ok_or(RoomError::RoundNotActive)?;
        if !round.round_active {
            return Err(RoomError::RoundNotActive);
        }
        if round.reveal.is_some() {
            return Err(RoomError::AwaitReveal);
        }
        if let Some(expected) = round_id {
            if expected != round.round_id {
                return Err(RoomError::RoundMismatch);
            }
        }
        if round.current_trick.is_some() {
            return Err(RoomError::TrickAlreadyStarted);
        }
        if self.current_player_id().is_some_and(|id| id == player_id) {
            return Err(RoomError::EarlyTurnAlreadyCurrentPlayer);
        }

        let hand = round.hand_of(player_id);
        if hand.len() != 4 || !hand.iter().all(|c| c.suit == suit) {
            return Err(RoomError::EarlyTurnInsufficientCards);
        }
        let ace_count = hand.iter().filter(|c| c.rank == Rank::Ace).count();
        if ace_count < 1 {
            return Err(RoomError::EarlyTurnRequiresAce);
        }
        let high_count = hand.iter().filter(|c| c.rank == Rank::Ace || c.rank == Rank::Ten).count();
        if high_count < 3 {
            return Err(RoomError::EarlyTurnRequiresThreeHighCards);
        }

        let card_ids = hand.iter().map(|c| c.id()).collect();
        let ranks = hand.iter().map(|c| c.rank).collect();

        let seat = self.seat_of(player_id).expect("hand lookup above implies membership");
        let round = self.round.as_mut().unwrap();
        round.turn_index = seat;
        round.turn_deadline_ms = now_ms + self.config.turn_timeout_sec as u64 * 1000;

        Ok(EarlyTurnGrant {
            player_id: player_id.to_string(),
            suit,
            card_ids,
            ranks,
        })
    }
}
