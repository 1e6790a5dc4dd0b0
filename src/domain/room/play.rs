//! §4.3.6 playing cards, §4.3.7 trick completion, and the draw-up/round-end
//! chain a completed trick triggers.

use crate::domain::cards_types::Card;
use crate::domain::evaluator::{classify, PlayOutcome};
use crate::domain::room::errors::RoomError;
use crate::domain::room::round::draw_up;
use crate::domain::room::scoring::end_round;
use crate::domain::room::state::{Room, REVEAL_DELAY_MS};
use crate::domain::room::timeout::tick;
use crate::domain::trick::{Play, RevealSnapshot, Trick};

impl Room {
    /// Validates and applies a play. `round_id`/`trick_index`, if given by
    /// the caller, must match the room's current values (§4.3.6).
    pub fn play_cards(
        &mut self,
        player_id: &str,
        cards: Vec<Card>,
        round_id: Option<u64>,
        trick_index: Option<u32>,
        now_ms: u64,
    ) -> Result<(), RoomError> {
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
        let current = self.current_player_id().ok_or(RoomError::RoundNotActive)?;
        if current != player_id {
            return Err(RoomError::NotYourTurn);
        }

        let round = self.round.as_ref().unwrap();
        for c in &cards {
            if !round.hand_of(player_id).contains(c) {
                return Err(RoomError::CardNotInHand);
            }
        }

        match &round.current_trick {
            None => {
                if let Some(expected) = trick_index {
                    if expected != round.trick_index_counter {
                        return Err(RoomError::TrickMismatch);
                    }
                }
                self.open_trick(player_id, cards, now_ms)
            }
            Some(trick) => {
                if let Some(expected) = trick_index {
                    if expected != trick.trick_index {
                        return Err(RoomError::TrickMismatch);
                    }
                }
                self.follow_trick(player_id, cards, now_ms)
            }
        }
    }

    fn open_trick(&mut self, player_id: &str, cards: Vec<Card>, now_ms: u64) -> Result<(), RoomError> {
        let round = self.round.as_mut().unwrap();
        validate_lead(&cards, round.min_opponent_hand_size(player_id))?;

        let seat = self.seat_of(player_id).expect("player validated above");
        let round = self.round.as_mut().unwrap();
        let trick_index = round.trick_index_counter;
        round.trick_index_counter += 1;
        round.current_trick = Some(Trick::open(trick_index, player_id.to_string(), seat, cards.clone()));

        remove_from_hand(round, player_id, &cards);
        self.advance_turn();
        self.maybe_close_trick(now_ms);
        Ok(())
    }

    fn follow_trick(&mut self, player_id: &str, cards: Vec<Card>, now_ms: u64) -> Result<(), RoomError> {
        let round = self.round.as_ref().unwrap();
        let trick = round.current_trick.as_ref().unwrap();
        if cards.len() != trick.required_count {
            return Err(RoomError::MustMatchRequiredCount);
        }
        let trump = round.trump;
        let outcome = classify(&cards, &trick.owner_cards, trump);

        let seat = self.seat_of(player_id).expect("player validated above");
        let round = self.round.as_mut().unwrap();
        let trick = round.current_trick.as_mut().unwrap();
        if outcome == PlayOutcome::Beat {
            for p in &mut trick.plays {
                p.is_owner = false;
            }
            trick.owner_id = player_id.to_string();
            trick.owner_seat = seat;
            trick.owner_cards = cards.clone();
        }
        trick.plays.push(Play {
            player_id: player_id.to_string(),
            seat,
            cards: cards.clone(),
            outcome,
            is_owner: outcome == PlayOutcome::Beat,
        });

        remove_from_hand(round, player_id, &cards);
        self.advance_turn();
        self.maybe_close_trick(now_ms);
        Ok(())
    }

    fn advance_turn(&mut self) {
        let n = self.players.len();
        if let Some(round) = self.round.as_mut() {
            round.turn_index = (round.turn_index + 1) % n;
        }
    }

    /// Closes the trick once every seat has played, per §4.3.7: cards go to
    /// the owner's taken pile and the discard pile, the reveal snapshot
    /// opens, the turn jumps to the winner, draw-up runs, and either the
    /// round ends or a resume of play is scheduled for reveal completion.
    fn maybe_close_trick(&mut self, now_ms: u64) {
        let n = self.players.len();
        let round = self.round.as_ref().unwrap();
        let Some(trick) = round.current_trick.clone() else {
            return;
        };
        if !trick.is_complete(n) {
            return;
        }

        let winner_id = trick.owner_id.clone();
        let winner_seat = trick.owner_seat;
        let all_cards = trick.all_played_cards();

        let round = self.round.as_mut().unwrap();
        round.current_trick = None;
        round.taken.get_mut(&winner_id).unwrap().extend(all_cards.iter().cloned());
        round.discard_pile.extend(all_cards);
        round.reveal = Some(RevealSnapshot {
            trick,
            winner_id: winner_id.clone(),
            reveal_until_ms: now_ms + REVEAL_DELAY_MS,
        });
        round.turn_index = winner_seat;
        self.last_trick_winner_id = Some(winner_id);

        draw_up(self, winner_seat);

        let round = self.round.as_mut().unwrap();
        let hands_empty = round.hands.values().all(|h| h.is_empty());
        let deck_empty = round.deck.is_empty();
        if hands_empty && deck_empty {
            end_round(self);
        } else {
            round.pending_turn_resume = true;
        }
    }
}

fn remove_from_hand(round: &mut crate::domain::room::state::RoundState, player_id: &str, cards: &[Card]) {
    let hand = round.hands.get_mut(player_id).expect("player has a hand");
    for c in cards {
        if let Some(pos) = hand.iter().position(|h| h == c) {
            hand.remove(pos);
        }
    }
}

fn validate_lead(cards: &[Card], max_lead: usize) -> Result<(), RoomError> {
    if cards.is_empty() || cards.len() > 4 {
        return Err(RoomError::InvalidFourCardThrow);
    }
    if cards.len() > max_lead {
        return Err(RoomError::OpponentsTooShort);
    }
    let same_suit = cards.iter().all(|c| c.suit == cards[0].suit);
    match cards.len() {
        1 | 2 | 3 => {
            if same_suit {
                Ok(())
            } else {
                Err(RoomError::LeaderSuitMismatch)
            }
        }
        4 => {
            if same_suit {
                return Ok(());
            }
            let all_ace = cards.iter().all(|c| c.rank == crate::domain::cards_types::Rank::Ace);
            let all_ten = cards.iter().all(|c| c.rank == crate::domain::cards_types::Rank::Ten);
            let ace_count = cards.iter().filter(|c| c.rank == crate::domain::cards_types::Rank::Ace).count();
            let ten_count = cards.iter().filter(|c| c.rank == crate::domain::cards_types::Rank::Ten).count();
            let mixed_aces_and_tens =
                ace_count + ten_count == 4 && ace_count >= 1 && ten_count >= 1;
            if all_ace || all_ten || mixed_aces_and_tens {
                Ok(())
            } else {
                Err(RoomError::InvalidFourCardThrow)
            }
        }
        _ => unreachable!("checked above"),
    }
}
