//! Trick and play records kept while a trick is in flight, and the closed
//! trick held during the reveal window.

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::Card;
use crate::domain::evaluator::PlayOutcome;
use crate::domain::room::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Play {
    pub player_id: PlayerId,
    pub seat: usize,
    pub cards: Vec<Card>,
    pub outcome: PlayOutcome,
    pub is_owner: bool,
}

impl Serialize for PlayOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let s = match self {
            PlayOutcome::Lead => "lead",
            PlayOutcome::Beat => "beat",
            PlayOutcome::Partial => "partial",
            PlayOutcome::Discard => "discard",
        };
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for PlayOutcome {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "lead" => Ok(PlayOutcome::Lead),
            "beat" => Ok(PlayOutcome::Beat),
            "partial" => Ok(PlayOutcome::Partial),
            "discard" => Ok(PlayOutcome::Discard),
            other => Err(serde::de::Error::custom(format!("unknown outcome {other}"))),
        }
    }
}

/// A trick currently in flight: leader, current owner, and the append-only
/// play log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trick {
    pub trick_index: u32,
    pub leader_id: PlayerId,
    pub leader_seat: usize,
    pub required_count: usize,
    pub owner_id: PlayerId,
    pub owner_seat: usize,
    pub owner_cards: Vec<Card>,
    pub plays: Vec<Play>,
}

impl Trick {
    pub fn open(trick_index: u32, leader_id: PlayerId, leader_seat: usize, lead_cards: Vec<Card>) -> Self {
        let play = Play {
            player_id: leader_id.clone(),
            seat: leader_seat,
            cards: lead_cards.clone(),
            outcome: PlayOutcome::Lead,
            is_owner: true,
        };
        Trick {
            trick_index,
            leader_id: leader_id.clone(),
            leader_seat,
            required_count: lead_cards.len(),
            owner_id: leader_id,
            owner_seat: leader_seat,
            owner_cards: lead_cards,
            plays: vec![play],
        }
    }

    pub fn is_complete(&self, player_count: usize) -> bool {
        self.plays.len() == player_count
    }

    pub fn all_played_cards(&self) -> Vec<Card> {
        self.plays.iter().flat_map(|p| p.cards.clone()).collect()
    }
}

/// The most recently closed trick, kept visible during the reveal window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealSnapshot {
    pub trick: Trick,
    pub winner_id: PlayerId,
    pub reveal_until_ms: u64,
}
