//! Error codes for the HTTP lobby surface. Add new codes here; never pass
//! ad-hoc strings as an error code.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RoomNotFound,
    ValidationError,
    BadRequest,
    EngineError,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::EngineError => "ENGINE_ERROR",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_screaming_snake_case() {
        assert_eq!(ErrorCode::RoomNotFound.as_str(), "ROOM_NOT_FOUND");
        assert_eq!(ErrorCode::EngineError.as_str(), "ENGINE_ERROR");
    }
}
