//! §4.3.3 round start and §4.3.8 draw-up. Both are pure deck/hand mutations
//! over an already-validated roster; callers (`lobby::start`, trick
//! completion in `play.rs`) own the preconditions.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::cards::shuffled_deck;
use crate::domain::room::state::{Room, RoundState};

/// Deals a fresh round. `initial` selects the round-1 leader rule (seat
/// `dealerIndex + 1`); later rounds lead with the previous round's trick
/// winner.
pub(crate) fn start_new_round(room: &mut Room, initial: bool, now_ms: u64) {
    let n = room.players.len();
    let mut deck: VecDeque<_> = shuffled_deck().into();
    let trump_card = *deck.back().expect("deck is non-empty");
    let trump = trump_card.suit;

    let mut hands: HashMap<String, Vec<_>> = room
        .players
        .iter()
        .map(|p| (p.id.clone(), Vec::with_capacity(4)))
        .collect();
    let deal_start = (room.dealer_index + 1) % n;
    for _ in 0..4 {
        for offset in 0..n {
            let seat = (deal_start + offset) % n;
            let id = &room.players[seat].id;
            let card = deck.pop_front().expect("deck has enough cards to deal");
            hands.get_mut(id).unwrap().push(card);
        }
    }

    let leader_seat = if initial {
        (room.dealer_index + 1) % n
    } else {
        room.last_trick_winner_id
            .as_deref()
            .and_then(|id| room.seat_of(id))
            .unwrap_or((room.dealer_index + 1) % n)
    };

    let taken = room.players.iter().map(|p| (p.id.clone(), Vec::new())).collect();
    let declared_combos: HashMap<String, HashSet<_>> =
        room.players.iter().map(|p| (p.id.clone(), HashSet::new())).collect();

    room.total_rounds += 1;
    let round_number = room.total_rounds;
    let round_id = room.next_round_id();

    room.round = Some(RoundState {
        round_id,
        round_number,
        deck,
        trump,
        trump_card,
        hands,
        taken,
        discard_pile: Vec::new(),
        announcements: Vec::new(),
        declared_combos,
        current_trick: None,
        reveal: None,
        turn_index: leader_seat,
        turn_deadline_ms: now_ms + room.config.turn_timeout_sec as u64 * 1000,
        trick_index_counter: 0,
        round_active: true,
        pending_round_start: false,
        pending_turn_resume: false,
    });
}

/// Draws from the deck in seat-order passes starting at `winner_seat`,
/// topping up any hand below 4 cards. Stops when a full pass grants no card
/// or the deck empties; the reserved trump card is drawn last because it
/// sits at the back of the deque.
pub(crate) fn draw_up(room: &mut Room, winner_seat: usize) {
    let n = room.players.len();
    let player_ids: Vec<String> = room.players.iter().map(|p| p.id.clone()).collect();
    let Some(round) = room.round.as_mut() else {
        return;
    };
    loop {
        let mut any_accepted = false;
        for offset in 0..n {
            if round.deck.is_empty() {
                return;
            }
            let seat = (winner_seat + offset) % n;
            let id = &player_ids[seat];
            if round.hand_of(id).len() < 4 {
                let card = round.deck.pop_front().expect("checked non-empty above");
                round.hands.get_mut(id).unwrap().push(card);
                any_accepted = true;
            }
        }
        if !any_accepted {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table_config::TableConfig;

    fn dealt_room(n: usize) -> Room {
        let mut r = Room::new("r1", "Table", TableConfig::default());
        for i in 0..n {
            r.add_player(format!("p{i}"), format!("P{i}"), None).unwrap();
        }
        r.start(0).unwrap();
        r
    }

    #[test]
    fn deals_four_cards_to_every_seat() {
        let r = dealt_room(3);
        let round = r.round.as_ref().unwrap();
        for p in &r.players {
            assert_eq!(round.hand_of(&p.id).len(), 4);
        }
    }

    #[test]
    fn first_round_leader_is_seat_after_dealer() {
        let r = dealt_room(4);
        let expected = (r.dealer_index + 1) % 4;
        assert_eq!(r.round.as_ref().unwrap().turn_index, expected);
    }

    #[test]
    fn draw_up_tops_every_hand_back_to_four() {
        let mut r = dealt_room(2);
        {
            let round = r.round.as_mut().unwrap();
            round.hands.get_mut("p0").unwrap().clear();
            round.hands.get_mut("p1").unwrap().clear();
        }
        draw_up(&mut r, 0);
        let round = r.round.as_ref().unwrap();
        assert_eq!(round.hand_of("p0").len(), 4);
        assert_eq!(round.hand_of("p1").len(), 4);
    }

    #[test]
    fn draw_up_stops_when_deck_exhausted() {
        let mut r = dealt_room(2);
        {
            let round = r.round.as_mut().unwrap();
            round.hands.get_mut("p0").unwrap().clear();
            round.hands.get_mut("p1").unwrap().clear();
            // Leave only 3 cards in the deck: fewer than the 4 needed to
            // refill both hands to 4.
            while round.deck.len() > 3 {
                round.deck.pop_back();
            }
        }
        draw_up(&mut r, 0);
        let round = r.round.as_ref().unwrap();
        assert!(round.deck.is_empty() || round.hand_of("p0").len() < 4 || round.hand_of("p1").len() < 4);
    }
}
