//! L4: the process-wide map from room id to its exclusively-locked [`Room`]
//! (§5). Grounded on the teacher's `GameSessionRegistry` concurrent-map
//! pattern, swapped from session tuples to `Arc<Mutex<Room>>` since a Room
//! needs its own critical section rather than a registry of connections.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::domain::room::Room;
use crate::domain::table_config::TableConfig;

pub type RoomId = String;
pub type SharedRoom = Arc<Mutex<Room>>;

/// Holds every live room. A room is created on demand by `create_room` and
/// removed once its roster empties (checked by the Hub after a disconnect
/// reaps the last occupant).
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, SharedRoom>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_room(&self, room_id: impl Into<String>, name: impl Into<String>, config: TableConfig) -> SharedRoom {
        let room_id = room_id.into();
        let room = Arc::new(Mutex::new(Room::new(room_id.clone(), name, config)));
        self.rooms.insert(room_id, room.clone());
        room
    }

    pub fn get(&self, room_id: &str) -> Option<SharedRoom> {
        self.rooms.get(room_id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, room_id: &str) {
        self.rooms.remove(room_id);
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Drops rooms whose roster is empty, typically called after the
    /// reaper evicts a disconnected player. Returns the ids removed.
    pub fn sweep_empty(&self) -> Vec<RoomId> {
        let empty: Vec<RoomId> = self
            .rooms
            .iter()
            .filter(|entry| entry.value().lock().player_count() == 0)
            .map(|entry| entry.key().clone())
            .collect();
        for id in &empty {
            self.rooms.remove(id);
        }
        empty
    }

    pub fn list_ids(&self) -> Vec<RoomId> {
        self.rooms.iter().map(|entry| entry.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_get_returns_the_same_room() {
        let reg = RoomRegistry::new();
        reg.create_room("r1", "Table", TableConfig::default());
        assert!(reg.get("r1").is_some());
        assert!(reg.get("missing").is_none());
    }

    #[test]
    fn sweep_empty_removes_rosterless_rooms() {
        let reg = RoomRegistry::new();
        let room = reg.create_room("r1", "Table", TableConfig::default());
        room.lock().add_player("a".into(), "Alice".into(), None).unwrap();
        reg.create_room("r2", "Empty", TableConfig::default());

        let swept = reg.sweep_empty();
        assert_eq!(swept, vec!["r2".to_string()]);
        assert!(reg.get("r1").is_some());
        assert!(reg.get("r2").is_none());
    }
}
