use serde::Serialize;

use crate::domain::table_config::TableConfig;

/// One row of the lobby listing (§6 "List rooms" and the `/lobby` broadcast).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub room_id: String,
    pub name: String,
    pub variant_key: Option<String>,
    pub player_count: usize,
    pub players_max: u8,
    pub started: bool,
    pub config: TableConfig,
}

/// The sole outbound frame on `/lobby`; inbound frames on that channel are
/// ignored (keep-alive only).
#[derive(Debug, Clone, Serialize)]
pub struct LobbyRooms {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub payload: Vec<RoomSummary>,
}

impl LobbyRooms {
    pub fn new(payload: Vec<RoomSummary>) -> Self {
        LobbyRooms { kind: "rooms", payload }
    }
}
