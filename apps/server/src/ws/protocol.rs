use serde::{Deserialize, Serialize};

use crate::domain::{GameSnapshot, Guid, PlayerId, Side};
use crate::errors::{ConflictKind, DomainError};

pub const PROTOCOL_VERSION: i32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Hello {
        protocol: i32,
    },
    Register {
        name: String,
        password: String,
        password_confirm: String,
    },
    Login {
        name: String,
        password: String,
    },
    Authenticate {
        token: String,
    },
    QueueUp,
    Dequeue,
    PollHandoff,
    DirectPair {
        opponent_id: PlayerId,
    },
    Move {
        guid: Guid,
        uci: String,
    },
    GameState {
        guid: Guid,
    },
    CurrentGames,
    MyTurn {
        guid: Guid,
    },
    MySide {
        guid: Guid,
    },
    OpponentName {
        guid: Guid,
    },
    ActiveCount,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    HelloAck {
        protocol: i32,
    },
    Registered {
        player_id: PlayerId,
        token: String,
    },
    LoggedIn {
        player_id: PlayerId,
        token: String,
    },
    Queued,
    AlreadyQueued,
    NewGame {
        guid: Guid,
    },
    Dequeued,
    NotQueued,
    Waiting,
    MoveMade {
        guid: Guid,
    },
    GameState {
        game: GameSnapshot,
    },
    CurrentGames {
        guids: Vec<Guid>,
    },
    MyTurn {
        guid: Guid,
        value: bool,
    },
    MySide {
        guid: Guid,
        side: Side,
    },
    OpponentName {
        guid: Guid,
        name: String,
    },
    ActiveCount {
        count: usize,
    },
    Error {
        code: ErrorCode,
        message: String,
    },
}

impl ServerMsg {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        ServerMsg::Error {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    BadProtocol,
    BadRequest,
    NotLoggedIn,
    IllegalMove,
    NotPlayersTurn,
    NotParticipant,
    GameNotFound,
    PlayerNotFound,
    UsernameTaken,
    Conflict,
    Validation,
    InvalidCredentials,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadProtocol => "bad_protocol",
            ErrorCode::BadRequest => "bad_request",
            ErrorCode::NotLoggedIn => "not_logged_in",
            ErrorCode::IllegalMove => "illegal_move",
            ErrorCode::NotPlayersTurn => "not_players_turn",
            ErrorCode::NotParticipant => "not_participant",
            ErrorCode::GameNotFound => "game_not_found",
            ErrorCode::PlayerNotFound => "player_not_found",
            ErrorCode::UsernameTaken => "username_taken",
            ErrorCode::Conflict => "conflict",
            ErrorCode::Validation => "validation",
            ErrorCode::InvalidCredentials => "invalid_credentials",
            ErrorCode::Internal => "internal",
        }
    }
}

impl From<&DomainError> for ErrorCode {
    fn from(err: &DomainError) -> Self {
        match err {
            DomainError::GameNotFound(_) => ErrorCode::GameNotFound,
            DomainError::IllegalMove(_) => ErrorCode::IllegalMove,
            DomainError::NotPlayersTurn { .. } => ErrorCode::NotPlayersTurn,
            DomainError::NotParticipant(..) => ErrorCode::NotParticipant,
            DomainError::PlayerNotFound(_) => ErrorCode::PlayerNotFound,
            DomainError::InvalidCredentials => ErrorCode::InvalidCredentials,
            DomainError::Validation(_) => ErrorCode::Validation,
            DomainError::Conflict(ConflictKind::UsernameTaken, _) => ErrorCode::UsernameTaken,
            DomainError::Conflict(..) => ErrorCode::Conflict,
            DomainError::Infra(..) => ErrorCode::Internal,
        }
    }
}
