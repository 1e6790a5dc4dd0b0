//! L3 core types: `Room`, its roster, round state, and match state.
//!
//! `Room` owns no I/O; every mutation is a synchronous function over
//! in-memory state, which is what lets the Hub serialize access behind a
//! single `parking_lot::Mutex` per room (§5).

use std::collections::{HashMap, HashSet, VecDeque};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::domain::announcement::Announcement;
use crate::domain::cards_types::{Card, Suit};
use crate::domain::combos::Combo;
use crate::domain::table_config::TableConfig;
use crate::domain::trick::{RevealSnapshot, Trick};

pub type PlayerId = String;

/// Wire-stable reveal window duration (§4.3.7, GLOSSARY).
pub const REVEAL_DELAY_MS: u64 = 5_000;
/// Penalty charged when a turn deadline elapses unresolved (§4.3.4).
pub const TIMEOUT_PENALTY: u32 = 6;
/// Penalty score at which a match ends (§3).
pub const MATCH_OVER_SCORE: u32 = 12;

#[derive(Debug, Clone, Serialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub display_name: String,
    pub avatar: Option<String>,
    pub seat: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MatchState {
    pub scores: HashMap<PlayerId, u32>,
    pub game_wins: HashMap<PlayerId, u32>,
    pub match_over: bool,
    pub winners: Vec<PlayerId>,
    pub losers: Vec<PlayerId>,
    pub winner_id: Option<PlayerId>,
    /// Set by the Hub once it has fired `MatchEndSink::on_match_end` for
    /// this match, so a later broadcast doesn't report it twice.
    pub match_end_reported: bool,
}

/// Per-round mutable state: deck remainder, hands, piles, and the trick or
/// reveal currently in flight.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub round_id: u64,
    pub round_number: u32,
    pub deck: VecDeque<Card>,
    pub trump: Suit,
    pub trump_card: Card,
    pub hands: HashMap<PlayerId, Vec<Card>>,
    pub taken: HashMap<PlayerId, Vec<Card>>,
    pub discard_pile: Vec<Card>,
    pub announcements: Vec<Announcement>,
    pub declared_combos: HashMap<PlayerId, HashSet<Combo>>,
    pub current_trick: Option<Trick>,
    pub reveal: Option<RevealSnapshot>,
    pub turn_index: usize,
    pub turn_deadline_ms: u64,
    pub trick_index_counter: u32,
    pub round_active: bool,
    pub pending_round_start: bool,
    pub pending_turn_resume: bool,
}

pub struct Room {
    pub room_id: String,
    pub name: String,
    pub variant_key: Option<String>,
    pub config: TableConfig,
    pub players: Vec<PlayerInfo>,
    pub started: bool,
    pub dealer_index: usize,
    pub match_state: MatchState,
    pub round: Option<RoundState>,
    pub last_trick_winner_id: Option<PlayerId>,
    pub match_id: Option<u64>,
    pub total_rounds: u32,
    pub(crate) rng: SmallRng,
    round_id_seq: u64,
    match_id_seq: u64,
}

impl Room {
    pub fn new(room_id: impl Into<String>, name: impl Into<String>, config: TableConfig) -> Self {
        Room {
            room_id: room_id.into(),
            name: name.into(),
            variant_key: None,
            config,
            players: Vec::new(),
            started: false,
            dealer_index: 0,
            match_state: MatchState::default(),
            round: None,
            last_trick_winner_id: None,
            match_id: None,
            total_rounds: 0,
            rng: SmallRng::from_os_rng(),
            round_id_seq: 0,
            match_id_seq: 0,
        }
    }

    pub fn with_variant(mut self, variant_key: Option<String>) -> Self {
        self.variant_key = variant_key;
        self
    }

    pub fn next_round_id(&mut self) -> u64 {
        self.round_id_seq += 1;
        self.round_id_seq
    }

    pub fn next_match_id(&mut self) -> u64 {
        self.match_id_seq += 1;
        self.match_id_seq
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn seat_of(&self, player_id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    pub fn player_at_seat(&self, seat: usize) -> Option<&PlayerInfo> {
        self.players.get(seat)
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.iter().any(|p| p.id == player_id)
    }

    pub fn round_active(&self) -> bool {
        self.round.as_ref().is_some_and(|r| r.round_active)
    }

    /// The player whose turn it currently is, if the round is active.
    pub fn current_player_id(&self) -> Option<&PlayerId> {
        let round = self.round.as_ref()?;
        if !round.round_active {
            return None;
        }
        self.players.get(round.turn_index).map(|p| &p.id)
    }
}

impl RoundState {
    pub fn hand_of(&self, player_id: &str) -> &[Card] {
        self.hands
            .get(player_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn min_opponent_hand_size(&self, leader_id: &str) -> usize {
        self.hands
            .iter()
            .filter(|(id, _)| id.as_str() != leader_id)
            .map(|(_, cards)| cards.len())
            .min()
            .unwrap_or(0)
    }
}
