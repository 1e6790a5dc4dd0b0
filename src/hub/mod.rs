//! L5: the Session Hub (§4.5). Fans websocket sessions out to rooms/lobby,
//! filters each broadcast through `Room::to_state` per viewer, and tracks
//! disconnected players in a grace window reaped by a background task.

mod dispatch;
mod reaper;

pub use dispatch::dispatch_intent;
pub use reaper::spawn_reaper;

use std::sync::Arc;
use std::time::Instant;

use actix::prelude::*;
use dashmap::DashMap;
use tracing::info;

use crate::domain::room::PlayerId;
use crate::persistence::{MatchEndEvent, MatchEndSink};
use crate::protocol::{LobbyRooms, RoomSummary, ServerMsg};
use crate::registry::{RoomId, RoomRegistry};

/// Pushes one outbound frame into a room session's mailbox. Implemented by
/// `ws::session::RoomSession`.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct PushRoomMsg(pub ServerMsg);

/// Pushes the lobby listing into a `/lobby` session's mailbox.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct PushLobbyMsg(pub LobbyRooms);

type RoomSessionMap = DashMap<PlayerId, Recipient<PushRoomMsg>>;

pub struct Hub {
    pub registry: Arc<RoomRegistry>,
    pub match_end_sink: Arc<dyn MatchEndSink>,
    room_sessions: DashMap<RoomId, RoomSessionMap>,
    lobby_sessions: DashMap<uuid::Uuid, Recipient<PushLobbyMsg>>,
    disconnect_grace: DashMap<(RoomId, PlayerId), Instant>,
    pub disconnect_grace_secs: u64,
}

impl Hub {
    pub fn new(registry: Arc<RoomRegistry>, match_end_sink: Arc<dyn MatchEndSink>, disconnect_grace_secs: u64) -> Self {
        Hub {
            registry,
            match_end_sink,
            room_sessions: DashMap::new(),
            lobby_sessions: DashMap::new(),
            disconnect_grace: DashMap::new(),
            disconnect_grace_secs,
        }
    }

    /// Attaches a duplex session to a room/player. Erases any pending grace
    /// entry for this pair, which is how a reconnect is recognized.
    pub fn attach_room(&self, room_id: &str, player_id: &str, recipient: Recipient<PushRoomMsg>) {
        self.disconnect_grace.remove(&(room_id.to_string(), player_id.to_string()));
        self.room_sessions
            .entry(room_id.to_string())
            .or_default()
            .insert(player_id.to_string(), recipient);
        info!(room_id, player_id, "session attached to room");
    }

    /// Detaches a session. If the match has started, the player enters the
    /// disconnect-grace table instead of being removed immediately.
    pub fn detach_room(&self, room_id: &str, player_id: &str) {
        if let Some(sessions) = self.room_sessions.get_mut(room_id) {
            sessions.remove(player_id);
        }

        let Some(room) = self.registry.get(room_id) else {
            return;
        };
        let started = room.lock().started;

        if started {
            self.disconnect_grace
                .insert((room_id.to_string(), player_id.to_string()), Instant::now());
            info!(room_id, player_id, "session detached, entering disconnect grace");
            self.broadcast_room(room_id);
        } else {
            room.lock().remove_player(player_id);
            info!(room_id, player_id, "session detached, player removed immediately");
            self.broadcast_room(room_id);
            self.broadcast_lobby();
            self.delete_if_empty(room_id);
        }
    }

    pub fn attach_lobby(&self, conn_id: uuid::Uuid, recipient: Recipient<PushLobbyMsg>) {
        self.lobby_sessions.insert(conn_id, recipient);
    }

    pub fn detach_lobby(&self, conn_id: &uuid::Uuid) {
        self.lobby_sessions.remove(conn_id);
    }

    /// Renders `Room::to_state` for every attached viewer and pushes it,
    /// overlaying the disconnect-grace flags this Hub (not Room) tracks.
    pub fn broadcast_room(&self, room_id: &str) {
        let Some(room) = self.registry.get(room_id) else {
            return;
        };
        self.report_match_end_if_needed(&room);
        let Some(sessions) = self.room_sessions.get(room_id) else {
            return;
        };
        let disconnected: Vec<PlayerId> = self
            .disconnect_grace
            .iter()
            .filter(|e| e.key().0 == room_id)
            .map(|e| e.key().1.clone())
            .collect();

        let now_ms = crate::time::now_ms();
        for entry in sessions.iter() {
            let viewer_id = entry.key();
            let mut snapshot = room.lock().to_state(viewer_id, now_ms);
            snapshot.mark_disconnected(disconnected.clone());
            entry.value().do_send(PushRoomMsg(ServerMsg::state(snapshot)));
        }
    }

    pub fn broadcast_lobby(&self) {
        let summaries: Vec<RoomSummary> = self
            .registry
            .list_ids()
            .into_iter()
            .filter_map(|id| self.registry.get(&id))
            .map(|room| {
                let room = room.lock();
                RoomSummary {
                    room_id: room.room_id.clone(),
                    name: room.name.clone(),
                    variant_key: room.variant_key.clone(),
                    player_count: room.player_count(),
                    players_max: room.config.max_players,
                    started: room.started,
                    config: room.config,
                }
            })
            .collect();
        let frame = LobbyRooms::new(summaries);
        for entry in self.lobby_sessions.iter() {
            entry.value().do_send(PushLobbyMsg(frame.clone()));
        }
    }

    /// Pushes one frame to every session currently attached to `room_id`,
    /// used for the `EARLY_TURN_GRANTED` broadcast that precedes the
    /// following state frame (§6).
    pub(crate) fn push_room_all(&self, room_id: &str, msg: ServerMsg) {
        if let Some(sessions) = self.room_sessions.get(room_id) {
            for entry in sessions.iter() {
                entry.value().do_send(PushRoomMsg(msg.clone()));
            }
        }
    }

    /// Fires `MatchEndSink::on_match_end` exactly once per match (§6),
    /// right after the round/score mutation that ended it is observed.
    fn report_match_end_if_needed(&self, room: &crate::registry::SharedRoom) {
        let event = {
            let mut guard = room.lock();
            if !guard.match_state.match_over || guard.match_state.match_end_reported {
                return;
            }
            guard.match_state.match_end_reported = true;
            MatchEndEvent {
                match_id: guard.match_id.unwrap_or(0),
                room_id: guard.room_id.clone(),
                variant_key: guard.variant_key.clone(),
                winner_id: guard.match_state.winner_id.clone(),
                participants: guard.players.iter().map(|p| p.id.clone()).collect(),
                total_rounds: guard.total_rounds,
            }
        };
        self.match_end_sink.on_match_end(event);
    }

    pub fn delete_if_empty(&self, room_id: &str) {
        let has_grace = self.disconnect_grace.iter().any(|e| e.key().0 == room_id);
        if has_grace {
            return;
        }
        let Some(room) = self.registry.get(room_id) else {
            return;
        };
        if room.lock().player_count() == 0 {
            self.registry.remove(room_id);
            self.room_sessions.remove(room_id);
            info!(room_id, "room deleted, roster empty");
        }
    }

    /// One reaper tick (§4.5): evicts every grace entry older than the
    /// configured window, removing the player from their room and
    /// rebroadcasting both that room and the lobby.
    pub fn reap_expired(&self) {
        let cutoff = self.disconnect_grace_secs;
        let expired: Vec<(RoomId, PlayerId)> = self
            .disconnect_grace
            .iter()
            .filter(|e| e.value().elapsed().as_secs() >= cutoff)
            .map(|e| e.key().clone())
            .collect();

        for (room_id, player_id) in expired {
            self.disconnect_grace.remove(&(room_id.clone(), player_id.clone()));
            if let Some(room) = self.registry.get(&room_id) {
                room.lock().remove_player(&player_id);
                info!(room_id = %room_id, player_id = %player_id, "reaper evicted disconnected player");
                self.broadcast_room(&room_id);
                self.broadcast_lobby();
                self.delete_if_empty(&room_id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table_config::TableConfig;
    use crate::persistence::LoggingMatchEndSink;

    fn hub() -> Hub {
        Hub::new(Arc::new(RoomRegistry::new()), Arc::new(LoggingMatchEndSink), 30)
    }

    #[test]
    fn detach_before_start_removes_player_immediately() {
        let h = hub();
        let room = h.registry.create_room("r1", "Table", TableConfig::default());
        room.lock().add_player("a".into(), "A".into(), None).unwrap();
        h.detach_room("r1", "a");
        assert_eq!(room.lock().player_count(), 0);
    }

    #[test]
    fn detach_after_start_enters_grace_not_removal() {
        let h = hub();
        let room = h.registry.create_room("r1", "Table", TableConfig::default());
        room.lock().add_player("a".into(), "A".into(), None).unwrap();
        room.lock().add_player("b".into(), "B".into(), None).unwrap();
        room.lock().start(0).unwrap();
        h.detach_room("r1", "a");
        assert_eq!(room.lock().player_count(), 2);
        assert!(h.disconnect_grace.contains_key(&("r1".to_string(), "a".to_string())));
    }

    #[test]
    fn reaper_evicts_after_the_grace_window_elapses() {
        let h = hub();
        let room = h.registry.create_room("r1", "Table", TableConfig::default());
        room.lock().add_player("a".into(), "A".into(), None).unwrap();
        room.lock().add_player("b".into(), "B".into(), None).unwrap();
        room.lock().start(0).unwrap();
        h.disconnect_grace.insert(
            ("r1".to_string(), "a".to_string()),
            Instant::now() - std::time::Duration::from_secs(31),
        );
        h.reap_expired();
        assert_eq!(room.lock().player_count(), 1);
        assert!(!h.disconnect_grace.contains_key(&("r1".to_string(), "a".to_string())));
    }
}
