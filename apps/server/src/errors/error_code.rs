//! Error codes for the HTTP surface of the chess server.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings that
//! appear in problem+json responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request validation
    IllegalMove,
    NotPlayersTurn,
    NotParticipant,
    InvalidCredentials,
    ValidationError,
    BadRequest,

    // Resource not found
    GameNotFound,
    PlayerNotFound,

    // Conflicts
    UsernameTaken,
    Conflict,

    // System errors
    DbError,
    DbUnavailable,
    Internal,
    ConfigError,
    DataCorruption,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::NotPlayersTurn => "NOT_PLAYERS_TURN",
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",

            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
            Self::DataCorruption => "DATA_CORRUPTION",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
