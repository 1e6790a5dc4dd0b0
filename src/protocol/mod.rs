//! §6 wire protocol: the tagged JSON frames exchanged over `/room/{roomId}`
//! and `/lobby`. Field casing follows §6 literally rather than a single
//! blanket `rename_all`, since the catalog mixes `player_id` with `roomId`.

mod client;
mod server;
mod summary;

pub use client::ClientMsg;
pub use server::ServerMsg;
pub use summary::{LobbyRooms, RoomSummary};
