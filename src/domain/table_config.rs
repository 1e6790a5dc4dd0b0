//! Per-room configuration (§3): immutable once the room is created.

use serde::{Deserialize, Serialize};

use crate::domain::room::RoomError;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscardVisibility {
    Open,
    FaceDown,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConfig {
    pub max_players: u8,
    pub discard_visibility: DiscardVisibility,
    pub enable_four_ends: bool,
    pub turn_timeout_sec: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            max_players: 4,
            discard_visibility: DiscardVisibility::Open,
            enable_four_ends: true,
            turn_timeout_sec: 40,
        }
    }
}

impl TableConfig {
    /// Validates the fields against the allowed sets in §3. Returns a
    /// `RoomError::InvalidConfig` rather than silently clamping.
    pub fn validated(self) -> Result<Self, RoomError> {
        if !(2..=4).contains(&self.max_players) {
            return Err(RoomError::InvalidConfig("maxPlayers must be 2, 3, or 4"));
        }
        if !matches!(self.turn_timeout_sec, 30 | 40 | 50 | 60) {
            return Err(RoomError::InvalidConfig(
                "turnTimeoutSec must be one of 30, 40, 50, 60",
            ));
        }
        Ok(self)
    }

    /// Minimum roster size for the variant implied by `max_players`: every
    /// variant needs at least 2 seated players to start.
    pub fn variant_min(&self) -> u8 {
        2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(TableConfig::default().validated().is_ok());
    }

    #[test]
    fn rejects_out_of_range_max_players() {
        let cfg = TableConfig {
            max_players: 5,
            ..Default::default()
        };
        assert!(cfg.validated().is_err());
    }

    #[test]
    fn rejects_unlisted_timeout() {
        let cfg = TableConfig {
            turn_timeout_sec: 45,
            ..Default::default()
        };
        assert!(cfg.validated().is_err());
    }
}
