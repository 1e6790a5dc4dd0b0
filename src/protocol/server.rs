use serde::Serialize;

use crate::domain::cards_types::Suit;
use crate::domain::room::{PlayerId, RoomSnapshot};

/// Outbound frames sent on `/room/{roomId}` (§6). `EarlyTurnGranted` keeps
/// its screaming-snake-case wire tag verbatim; every other variant is
/// `snake_case` like the rest of the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMsg {
    #[serde(rename = "state")]
    State { payload: Box<RoomSnapshot> },
    #[serde(rename = "error")]
    Error { error: &'static str },
    #[serde(rename = "EARLY_TURN_GRANTED")]
    EarlyTurnGranted {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
        suit: Suit,
        #[serde(rename = "cardIds")]
        card_ids: Vec<String>,
        ranks: Vec<String>,
    },
}

impl ServerMsg {
    pub fn state(snapshot: RoomSnapshot) -> Self {
        ServerMsg::State { payload: Box::new(snapshot) }
    }

    pub fn error(kind: &'static str) -> Self {
        ServerMsg::Error { error: kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_frame_serializes_with_the_bare_kind_string() {
        let msg = ServerMsg::error("notYourTurn");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["error"], "notYourTurn");
    }

    #[test]
    fn early_turn_granted_keeps_its_screaming_snake_case_tag() {
        let msg = ServerMsg::EarlyTurnGranted {
            player_id: "a".into(),
            suit: Suit::Hearts,
            card_ids: vec!["AH".into()],
            ranks: vec!["Ace".into()],
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "EARLY_TURN_GRANTED");
        assert_eq!(json["playerId"], "a");
        assert_eq!(json["cardIds"][0], "AH");
    }
}
