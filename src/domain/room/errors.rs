//! Typed domain-rule violations raised by Room operations (§7 tier 1).
//!
//! These are transport-agnostic; the dispatcher maps each variant to the
//! exact wire string from §6 via [`RoomError::wire_kind`]. Never pass an
//! ad-hoc string as an error kind — add a variant here instead.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum RoomError {
    #[error("game already started")]
    GameAlreadyStarted,
    #[error("room is full")]
    RoomFull,
    #[error("not enough players")]
    NotEnoughPlayers,
    #[error("not your turn")]
    NotYourTurn,
    #[error("card not in hand")]
    CardNotInHand,
    #[error("must match required count")]
    MustMatchRequiredCount,
    #[error("leader suit mismatch")]
    LeaderSuitMismatch,
    #[error("invalid four card throw")]
    InvalidFourCardThrow,
    #[error("opponents too short")]
    OpponentsTooShort,
    #[error("round not active")]
    RoundNotActive,
    #[error("trick already started")]
    TrickAlreadyStarted,
    #[error("combination cards missing")]
    CombinationCardsMissing,
    #[error("combination already declared")]
    CombinationAlreadyDeclared,
    #[error("combination not enabled")]
    CombinationNotEnabled,
    #[error("unknown combination")]
    UnknownCombination,
    #[error("await reveal")]
    AwaitReveal,
    #[error("round mismatch")]
    RoundMismatch,
    #[error("trick mismatch")]
    TrickMismatch,
    #[error("early turn insufficient cards")]
    EarlyTurnInsufficientCards,
    #[error("early turn requires ace")]
    EarlyTurnRequiresAce,
    #[error("early turn requires three high cards")]
    EarlyTurnRequiresThreeHighCards,
    #[error("early turn requires a non-current player")]
    EarlyTurnAlreadyCurrentPlayer,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
    #[error("player not found")]
    PlayerNotFound,
}

impl RoomError {
    /// The exact wire string from §6's error-kind catalog.
    pub fn wire_kind(&self) -> &'static str {
        match self {
            RoomError::GameAlreadyStarted => "gameAlreadyStarted",
            RoomError::RoomFull => "roomFull",
            RoomError::NotEnoughPlayers => "notEnoughPlayers",
            RoomError::NotYourTurn => "notYourTurn",
            RoomError::CardNotInHand => "cardNotInHand",
            RoomError::MustMatchRequiredCount => "mustMatchRequiredCount",
            RoomError::LeaderSuitMismatch => "leaderSuitMismatch",
            RoomError::InvalidFourCardThrow => "invalidFourCardThrow",
            RoomError::OpponentsTooShort => "opponentsTooShort",
            RoomError::RoundNotActive => "roundNotActive",
            RoomError::TrickAlreadyStarted => "trickAlreadyStarted",
            RoomError::CombinationCardsMissing => "combinationCardsMissing",
            RoomError::CombinationAlreadyDeclared => "combinationAlreadyDeclared",
            RoomError::CombinationNotEnabled => "combinationNotEnabled",
            RoomError::UnknownCombination => "unknownCombination",
            RoomError::AwaitReveal => "awaitReveal",
            RoomError::RoundMismatch => "roundMismatch",
            RoomError::TrickMismatch => "trickMismatch",
            RoomError::EarlyTurnInsufficientCards => "earlyTurnInsufficientCards",
            RoomError::EarlyTurnRequiresAce => "earlyTurnRequiresAce",
            RoomError::EarlyTurnRequiresThreeHighCards => "earlyTurnRequiresThreeHighCards",
            RoomError::EarlyTurnAlreadyCurrentPlayer => "earlyTurnAlreadyCurrentPlayer",
            RoomError::InvalidConfig(_) => "invalidConfig",
            RoomError::PlayerNotFound => "playerNotFound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_kinds_match_spec_catalog() {
        assert_eq!(RoomError::GameAlreadyStarted.wire_kind(), "gameAlreadyStarted");
        assert_eq!(RoomError::AwaitReveal.wire_kind(), "awaitReveal");
        assert_eq!(
            RoomError::EarlyTurnRequiresThreeHighCards.wire_kind(),
            "earlyTurnRequiresThreeHighCards"
        );
    }
}
