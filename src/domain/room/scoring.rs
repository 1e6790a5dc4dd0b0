//! §4.3.9 round-end penalty computation and match-over detection.

use crate::domain::cards::point_of;
use crate::domain::room::round::start_new_round;
use crate::domain::room::state::{PlayerId, Room, MATCH_OVER_SCORE};

/// Trick-driven round end: tallies taken-pile points, assigns penalties and
/// `gameWins`, then either closes the match or defers the next round to the
/// reveal window already open for the closing trick.
pub(crate) fn end_round(room: &mut Room) {
    let round = room.round.as_ref().expect("round active");
    let points: std::collections::HashMap<PlayerId, u32> = round
        .taken
        .iter()
        .map(|(id, cards)| (id.clone(), cards.iter().map(|c| point_of(c.rank)).sum()))
        .collect();
    let max_points = points.values().copied().max().unwrap_or(0);
    let leaders: Vec<PlayerId> = points
        .iter()
        .filter(|(_, &p)| p == max_points)
        .map(|(id, _)| id.clone())
        .collect();

    for (id, p) in &points {
        let is_leader = leaders.contains(id);
        let penalty = if is_leader {
            0
        } else if *p == 31 {
            2
        } else if *p == 0 {
            6
        } else {
            4
        };
        *room.match_state.scores.entry(id.clone()).or_insert(0) += penalty;
    }
    for id in &leaders {
        *room.match_state.game_wins.entry(id.clone()).or_insert(0) += 1;
    }

    room.round.as_mut().unwrap().round_active = false;
    if !check_match_over(room) {
        room.round.as_mut().unwrap().pending_round_start = true;
    }
}

/// Timeout-driven round end: the offender's penalty was already applied by
/// the caller; this closes the round with no point tally and, unless the
/// match just ended, starts the next round immediately since no trick
/// reveal window gates it.
pub(crate) fn zero_round_summary(room: &mut Room) {
    if let Some(round) = room.round.as_mut() {
        round.round_active = false;
    }
}

/// Shared tail: checks whether any score crossed the match-over threshold
/// and, if not and a round-end is pending, starts the next round
/// immediately (used only by the timeout path, which has no reveal gate).
pub(crate) fn apply_match_over_check(room: &mut Room, now_ms: u64) -> bool {
    if check_match_over(room) {
        return true;
    }
    start_new_round(room, false, now_ms);
    false
}

fn check_match_over(room: &mut Room) -> bool {
    let losers: Vec<PlayerId> = room
        .match_state
        .scores
        .iter()
        .filter(|(_, &s)| s >= MATCH_OVER_SCORE)
        .map(|(id, _)| id.clone())
        .collect();
    if losers.is_empty() {
        return false;
    }
    let winners: Vec<PlayerId> = room
        .players
        .iter()
        .map(|p| p.id.clone())
        .filter(|id| !losers.contains(id))
        .collect();
    room.match_state.match_over = true;
    room.match_state.winner_id = if winners.len() == 1 {
        Some(winners[0].clone())
    } else {
        None
    };
    room.match_state.winners = winners;
    room.match_state.losers = losers;
    true
}
