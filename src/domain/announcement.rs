//! Opening-of-round combination declarations (§3, §4.3.5).

use serde::{Deserialize, Serialize};

use crate::domain::cards_types::Card;
use crate::domain::combos::Combo;
use crate::domain::room::PlayerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub player_id: PlayerId,
    pub combo: Combo,
    pub cards: Vec<Card>,
}
