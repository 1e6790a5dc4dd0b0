//! L6: the intent dispatcher (§4.4). Decodes a [`ClientMsg`] already parsed
//! by the session actor, invokes the matching Room operation, and tells the
//! Hub to broadcast on success. Returns the error frame to send back to the
//! originating session only, or `None` on success.

use crate::domain::cards_types::Rank;
use crate::domain::room::RoomError;
use crate::hub::Hub;
use crate::protocol::{ClientMsg, ServerMsg};
use crate::registry::SharedRoom;

pub fn dispatch_intent(hub: &Hub, room_id: &str, room: &SharedRoom, msg: ClientMsg, now_ms: u64) -> Option<ServerMsg> {
    let result = apply(hub, room_id, room, &msg, now_ms);
    match result {
        Ok(()) => {
            hub.broadcast_room(room_id);
            None
        }
        Err(err) => Some(ServerMsg::error(err.wire_kind())),
    }
}

fn apply(hub: &Hub, room_id: &str, room: &SharedRoom, msg: &ClientMsg, now_ms: u64) -> Result<(), RoomError> {
    match msg {
        ClientMsg::Play {
            player_id,
            round_id,
            trick_index,
            ..
        } => {
            let cards = msg.resolved_cards().unwrap_or_default();
            room.lock().play_cards(player_id, cards, *round_id, *trick_index, now_ms)
        }
        ClientMsg::Declare { player_id, combo } => room.lock().declare_combination(player_id, combo, now_ms),
        ClientMsg::RequestEarlyTurn { player_id, suit, round_id } => {
            let grant = room.lock().request_early_turn(player_id, *suit, *round_id, now_ms)?;
            hub.push_room_all(
                room_id,
                ServerMsg::EarlyTurnGranted {
                    player_id: grant.player_id,
                    suit: grant.suit,
                    card_ids: grant.card_ids,
                    ranks: grant.ranks.iter().map(rank_name).collect(),
                },
            );
            Ok(())
        }
    }
}

fn rank_name(rank: &Rank) -> String {
    format!("{rank:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cards_types::{Card, Suit};
    use crate::domain::table_config::TableConfig;
    use crate::persistence::LoggingMatchEndSink;
    use crate::registry::RoomRegistry;
    use std::sync::Arc;

    fn setup() -> (Hub, SharedRoom) {
        let hub = Hub::new(Arc::new(RoomRegistry::new()), Arc::new(LoggingMatchEndSink), 30);
        let room = hub.registry.create_room("r1", "Table", TableConfig::default());
        room.lock().add_player("a".into(), "A".into(), None).unwrap();
        room.lock().add_player("b".into(), "B".into(), None).unwrap();
        room.lock().start(0).unwrap();
        (hub, room)
    }

    #[test]
    fn unknown_combination_is_reported_without_mutating_the_room() {
        let (hub, room) = setup();
        let msg = ClientMsg::Declare { player_id: "a".into(), combo: "nonsense".into() };
        let reply = dispatch_intent(&hub, "r1", &room, msg, 0);
        assert!(matches!(reply, Some(ServerMsg::Error { error: "unknownCombination" })));
    }

    #[test]
    fn not_your_turn_is_reported_as_an_error_frame() {
        let (hub, room) = setup();
        let current = room.lock().current_player_id().cloned().unwrap();
        let other = if current == "a" { "b" } else { "a" };
        let msg = ClientMsg::Play {
            player_id: other.to_string(),
            cards: Some(vec![Card::new(Suit::Clubs, crate::domain::cards_types::Rank::Six)]),
            card: None,
            round_id: None,
            trick_index: None,
        };
        let reply = dispatch_intent(&hub, "r1", &room, msg, 0);
        assert!(matches!(reply, Some(ServerMsg::Error { error: "notYourTurn" })));
    }
}
