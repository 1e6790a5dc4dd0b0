//! L3: the Room game engine (§4.3). Behavior is split across files by
//! operation group, mirroring how a single conceptual engine is usually
//! broken up once it outgrows one file; they all add `impl Room` blocks
//! over the types declared in [`state`].

mod declare;
mod early_turn;
mod errors;
mod lobby;
mod play;
mod round;
mod scoring;
mod snapshot;
mod state;
mod timeout;

pub use early_turn::EarlyTurnGrant;
pub use errors::RoomError;
pub use snapshot::{
    AnnouncementView, BoardView, PlayerView, PlayView, RevealView, RoomSnapshot, SeatTurnInfo, TrickView,
};
pub use state::{MatchState, PlayerId, PlayerInfo, Room, RoundState, MATCH_OVER_SCORE, REVEAL_DELAY_MS, TIMEOUT_PENALTY};

/// Re-exported so callers outside `domain::room` can drive timeout/reveal
/// checks without reaching into the private `timeout` module (used by the
/// Hub's periodic reaper when it probes idle rooms).
pub fn check_timers(room: &mut Room, now_ms: u64) {
    timeout::tick(room, now_ms);
}
