//! End-to-end Room lifecycle tests driving a whole match to completion with
//! a trivial "always lead/follow with one card" bot, checking the
//! invariants in §8: card conservation, hand-size bound, and that a match
//! eventually ends once some score crosses the threshold.
//!
//! The bot always leads and follows with exactly one card, so every trick
//! removes exactly one card from every hand. Draw-up (§4.3.8) then tops
//! everyone back up in lockstep as long as the deck holds at least
//! `n_players` cards, which it always does at a trick boundary here: 36 is
//! divisible by 2, 3, and 4, so the post-deal deck (`36 - 4*n`) is itself a
//! multiple of `n` and never strands a mid-cycle remainder. Hands therefore
//! stay equal in size for the whole match, so `current_player_id` never
//! points at a player with an empty hand while others still hold cards.

use bura_server::domain::room::{Room, MATCH_OVER_SCORE, REVEAL_DELAY_MS};
use bura_server::domain::table_config::TableConfig;

fn advance_past_reveal(room: &mut Room, now_ms: &mut u64) {
    while room.round.as_ref().map(|r| r.reveal.is_some()).unwrap_or(false) {
        *now_ms += REVEAL_DELAY_MS + 1;
        room.to_state("observer", *now_ms);
    }
}

fn assert_card_conservation(room: &Room) {
    let round = room.round.as_ref().expect("round still present after a finished match");
    let hands: usize = round.hands.values().map(Vec::len).sum();
    let taken: usize = round.taken.values().map(Vec::len).sum();
    let total = round.deck.len() + hands + taken + round.discard_pile.len();
    assert_eq!(total, 36, "deck+hands+taken+discard must always sum to 36");
}

fn play_match_to_completion(n_players: usize) {
    let mut room = Room::new("r1", "Table", TableConfig::default());
    for i in 0..n_players {
        room.add_player(format!("p{i}"), format!("P{i}"), None).unwrap();
    }
    room.start(0).unwrap();

    let mut now_ms = 0u64;
    let mut steps = 0;
    loop {
        steps += 1;
        assert!(steps < 5_000, "match did not converge within a sane step bound");

        advance_past_reveal(&mut room, &mut now_ms);
        if room.match_state.match_over {
            break;
        }
        let Some(current) = room.current_player_id().cloned() else {
            break;
        };
        let round = room.round.as_ref().unwrap();
        for hand in round.hands.values() {
            assert!(hand.len() <= 4, "no hand may exceed 4 cards");
        }
        let card = round.hand_of(&current).first().copied();
        let Some(card) = card else { break };

        room.play_cards(&current, vec![card], None, None, now_ms).unwrap();
        now_ms += 1;
        assert_card_conservation(&room);
    }

    assert!(room.match_state.match_over, "match must eventually end");
    assert!(
        room.match_state.scores.values().any(|&s| s >= MATCH_OVER_SCORE),
        "match-over requires at least one score at or above the threshold"
    );
    assert!(!room.match_state.winners.is_empty() || room.match_state.winner_id.is_none());
}

#[test]
fn two_player_match_runs_to_completion() {
    play_match_to_completion(2);
}

#[test]
fn three_player_match_runs_to_completion() {
    play_match_to_completion(3);
}

#[test]
fn four_player_match_runs_to_completion() {
    play_match_to_completion(4);
}

#[test]
fn reconnect_mid_match_preserves_the_roster() {
    let mut room = Room::new("r1", "Table", TableConfig::default());
    room.add_player("a".into(), "Alice".into(), None).unwrap();
    room.add_player("b".into(), "Bob".into(), None).unwrap();
    room.start(0).unwrap();

    // A Hub-level disconnect never calls remove_player while the match is
    // started (§4.5); only an explicit removal (e.g. after the reaper's
    // grace window) does.
    assert_eq!(room.player_count(), 2);
    room.remove_player("a");
    assert_eq!(room.player_count(), 1);
    assert!(!room.has_player("a"));
}

#[test]
fn viewer_projection_never_reveals_another_players_hand() {
    let mut room = Room::new("r1", "Table", TableConfig::default());
    room.add_player("a".into(), "Alice".into(), None).unwrap();
    room.add_player("b".into(), "Bob".into(), None).unwrap();
    room.start(0).unwrap();

    let snapshot = room.to_state("a", 0);
    let a_hand = room.round.as_ref().unwrap().hand_of("a").to_vec();
    assert_eq!(snapshot.viewer_hand, a_hand);
    assert_ne!(snapshot.viewer_hand, room.round.as_ref().unwrap().hand_of("b").to_vec());
}
