//! §4.3.4 lazy timeout and reveal-window transitions. Every inbound intent
//! and every snapshot call runs `tick` first; nothing else touches the
//! clock inside the engine.

use crate::domain::room::round::start_new_round;
use crate::domain::room::scoring::{apply_match_over_check, zero_round_summary};
use crate::domain::room::state::{Room, TIMEOUT_PENALTY};

/// Runs `_checkTimeout` then `_checkReveal` against `now_ms`.
pub(crate) fn tick(room: &mut Room, now_ms: u64) {
    check_timeout(room, now_ms);
    check_reveal(room, now_ms);
}

fn check_timeout(room: &mut Room, now_ms: u64) {
    let Some(round) = room.round.as_ref() else {
        return;
    };
    if !round.round_active || round.reveal.is_some() {
        return;
    }
    if round.turn_deadline_ms > now_ms {
        return;
    }
    let Some(offender) = room.current_player_id().cloned() else {
        return;
    };

    *room.match_state.scores.entry(offender).or_insert(0) += TIMEOUT_PENALTY;
    zero_round_summary(room);
    apply_match_over_check(room, now_ms);
}

fn check_reveal(room: &mut Room, now_ms: u64) {
    let Some(round) = room.round.as_ref() else {
        return;
    };
    let Some(reveal) = round.reveal.as_ref() else {
        return;
    };
    if reveal.reveal_until_ms > now_ms {
        return;
    }

    let pending_round_start = round.pending_round_start;
    let pending_turn_resume = round.pending_turn_resume;

    room.round.as_mut().unwrap().reveal = None;
    if pending_round_start {
        start_new_round(room, false, now_ms);
    } else if pending_turn_resume {
        let round = room.round.as_mut().unwrap();
        round.pending_turn_resume = false;
        round.turn_deadline_ms = now_ms + room.config.turn_timeout_sec as u64 * 1000;
    }
}
