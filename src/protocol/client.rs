use serde::Deserialize;

use crate::domain::cards_types::{Card, Suit};
use crate::domain::room::PlayerId;

/// Inbound frames a session may send on `/room/{roomId}?playerId=…` (§6).
/// `Play`'s legacy single-`card` shape is accepted via `#[serde(alias)]` on
/// the tag and promoted to `cards` by [`ClientMsg::resolved_cards`].
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    #[serde(alias = "play_cards")]
    Play {
        player_id: PlayerId,
        #[serde(default)]
        cards: Option<Vec<Card>>,
        #[serde(default)]
        card: Option<Card>,
        #[serde(rename = "roundId", default)]
        round_id: Option<u64>,
        #[serde(rename = "trickIndex", default)]
        trick_index: Option<u32>,
    },
    Declare {
        player_id: PlayerId,
        combo: String,
    },
    #[serde(rename = "request_early_turn")]
    RequestEarlyTurn {
        player_id: PlayerId,
        suit: Suit,
        #[serde(rename = "roundId", default)]
        round_id: Option<u64>,
    },
}

impl ClientMsg {
    /// For a `Play` frame, resolves the one-of `cards`/legacy `card` shape
    /// into a single list. `None` if the frame carried neither field.
    pub fn resolved_cards(&self) -> Option<Vec<Card>> {
        match self {
            ClientMsg::Play { cards: Some(cards), .. } => Some(cards.clone()),
            ClientMsg::Play { card: Some(card), .. } => Some(vec![*card]),
            _ => None,
        }
    }

    pub fn player_id(&self) -> &str {
        match self {
            ClientMsg::Play { player_id, .. } => player_id,
            ClientMsg::Declare { player_id, .. } => player_id,
            ClientMsg::RequestEarlyTurn { player_id, .. } => player_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_card_field_is_promoted_to_a_single_element_list() {
        let raw = r#"{"type":"play","player_id":"a","card":{"suit":"spades","rank":"Ace"}}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        let cards = msg.resolved_cards().unwrap();
        assert_eq!(cards, vec![Card::new(Suit::Spades, crate::domain::cards_types::Rank::Ace)]);
    }

    #[test]
    fn play_cards_alias_decodes_into_the_same_variant() {
        let raw = r#"{"type":"play_cards","player_id":"a","cards":[{"suit":"clubs","rank":"Six"}]}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        assert!(matches!(msg, ClientMsg::Play { .. }));
    }

    #[test]
    fn declare_decodes_combo_as_a_plain_string() {
        let raw = r#"{"type":"declare","player_id":"a","combo":"bura"}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        assert!(matches!(msg, ClientMsg::Declare { combo, .. } if combo == "bura"));
    }
}
